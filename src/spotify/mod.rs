//! # Spotify Integration Module
//!
//! Spotify is the release source. The client authenticates with the client
//! credentials grant, so no user interaction is needed, and reads the
//! discography of each tracked artist.
//!
//! ```text
//! Orchestration (cli::retrieve)
//!          ↓
//! SpotifyClient
//!     ├── auth      (client credentials token, refreshed before expiry)
//!     ├── artists   (artist search, artist popularity)
//!     └── releases  (paginated artist albums → MusicRelease)
//!          ↓
//! Spotify Web API
//! ```
//!
//! ## Error Handling
//!
//! - `429 Too Many Requests` waits for `Retry-After` (up to 120 seconds)
//! - `502 Bad Gateway` waits 10 seconds
//! - both are retried at most [`MAX_ATTEMPTS`] times
//! - `404 Not Found` for an artist yields an empty discography
//!
//! Scraped releases carry the highest Spotify popularity among their
//! credited artists, or `NaN` when none is known. That value only decides
//! which of two duplicate scrapes survives; Last.fm replaces it afterwards.
//!
//! Spotify is the only source wired in. Releases of further sources merge
//! with its scrape through
//! [`dedupe_across_sources`](crate::release::dedupe_across_sources).

pub mod artists;
pub mod auth;
pub mod releases;

use std::{collections::HashMap, time::Duration};

use reqwest::{Client, RequestBuilder, Response, StatusCode};
use tokio::time::sleep;

use crate::{config, config::ConfigError, warning};

use auth::AccessToken;

/// Attempts per request before a transient failure is reported.
pub const MAX_ATTEMPTS: u32 = 5;

/// Pause between two page requests.
pub const PAGE_DELAY: Duration = Duration::from_millis(300);

pub struct SpotifyClient {
    client: Client,
    api_url: String,
    token_url: String,
    client_id: String,
    client_secret: String,
    market: String,
    token: Option<AccessToken>,
    artist_popularity: HashMap<String, f64>,
}

impl SpotifyClient {
    pub fn new(
        api_url: String,
        token_url: String,
        client_id: String,
        client_secret: String,
        market: String,
    ) -> Self {
        Self {
            client: Client::new(),
            api_url,
            token_url,
            client_id,
            client_secret,
            market,
            token: None,
            artist_popularity: HashMap::new(),
        }
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self::new(
            config::spotify_api_url(),
            config::spotify_token_url(),
            config::spotify_client_id()?,
            config::spotify_client_secret()?,
            config::spotify_market(),
        ))
    }

    /// Sends a request built by `build`, retrying rate limits and bad
    /// gateways. Other responses are returned as they are.
    async fn send_with_retry<F>(&self, build: F) -> Result<Response, reqwest::Error>
    where
        F: Fn(&Client) -> RequestBuilder,
    {
        let mut attempt = 1;
        loop {
            let response = build(&self.client).send().await?;

            let delay = match response.status() {
                StatusCode::TOO_MANY_REQUESTS => {
                    let retry_after = response
                        .headers()
                        .get("retry-after")
                        .and_then(|value| value.to_str().ok())
                        .and_then(|value| value.parse::<u64>().ok())
                        .unwrap_or(1);
                    if retry_after > 120 {
                        warning!(
                            "Retry after has reached an abnormal high of {} seconds. Try again tomorrow.",
                            retry_after
                        );
                        return Ok(response);
                    }
                    Duration::from_secs(retry_after)
                }
                StatusCode::BAD_GATEWAY => Duration::from_secs(10),
                _ => return Ok(response),
            };

            if attempt >= MAX_ATTEMPTS {
                return Ok(response);
            }
            attempt += 1;
            sleep(delay).await;
        }
    }
}
