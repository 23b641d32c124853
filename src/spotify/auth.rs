use chrono::Utc;

use crate::{spotify::SpotifyClient, types::AccessTokenResponse};

/// Seconds before the real expiry at which a token is considered stale.
const EXPIRY_MARGIN_SECS: i64 = 60;

#[derive(Debug, Clone)]
pub struct AccessToken {
    pub value: String,
    pub expires_at: i64,
}

impl AccessToken {
    pub fn from_response(response: AccessTokenResponse, obtained_at: i64) -> Self {
        Self {
            value: response.access_token,
            expires_at: obtained_at + response.expires_in as i64 - EXPIRY_MARGIN_SECS,
        }
    }

    pub fn is_expired(&self, now: i64) -> bool {
        now >= self.expires_at
    }
}

impl SpotifyClient {
    /// Returns a valid access token, requesting a new one through the client
    /// credentials grant when none is cached or the cached one expired.
    pub async fn access_token(&mut self) -> Result<String, reqwest::Error> {
        let now = Utc::now().timestamp();
        if let Some(token) = &self.token {
            if !token.is_expired(now) {
                return Ok(token.value.clone());
            }
        }

        let response = self
            .client
            .post(&self.token_url)
            .basic_auth(&self.client_id, Some(&self.client_secret))
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await?
            .error_for_status()?
            .json::<AccessTokenResponse>()
            .await?;

        let token = AccessToken::from_response(response, now);
        let value = token.value.clone();
        self.token = Some(token);
        Ok(value)
    }
}
