use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use tokio::time::sleep;

use crate::{
    config,
    config::ConfigError,
    info,
    social::SocialError,
    text::segment_by,
    types::Post,
    warning,
};

const PLATFORM: &str = "Telegram";

/// UTF-16 code units allowed in one text message.
pub const MAX_MESSAGE_LENGTH: usize = 4096;

/// UTF-16 code units allowed in a photo caption.
pub const MAX_CAPTION_LENGTH: usize = 1024;

const MESSAGE_DELAY: Duration = Duration::from_millis(500);

/// Envelope of every Bot API answer.
#[derive(Debug, Deserialize)]
pub struct ApiResponse<T> {
    pub ok: bool,
    pub description: Option<String>,
    pub result: Option<T>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Message {
    pub message_id: i64,
}

#[derive(Debug, Serialize)]
struct LinkPreviewOptions {
    is_disabled: bool,
}

#[derive(Debug, Serialize)]
struct SendMessageRequest<'a> {
    chat_id: &'a str,
    text: &'a str,
    link_preview_options: LinkPreviewOptions,
}

#[derive(Debug, Serialize)]
struct SendPhotoRequest<'a> {
    chat_id: &'a str,
    photo: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    caption: Option<&'a str>,
}

pub struct TelegramClient {
    client: Client,
    api_url: String,
    token: String,
    channel: String,
}

impl TelegramClient {
    pub fn new(api_url: String, token: String, channel: String) -> Self {
        Self {
            client: Client::new(),
            api_url: api_url.trim_end_matches('/').to_string(),
            token,
            channel,
        }
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self::new(
            config::telegram_api_url(),
            config::telegram_bot_token()?,
            config::telegram_channel()?,
        ))
    }

    async fn call<B: Serialize, T: DeserializeOwned>(
        &self,
        method: &str,
        body: &B,
    ) -> Result<T, SocialError> {
        let response = self
            .client
            .post(format!("{}/bot{}/{}", self.api_url, self.token, method))
            .json(body)
            .send()
            .await
            .map_err(SocialError::http(PLATFORM))?;

        let status = response.status().as_u16();
        let answer: ApiResponse<T> = response
            .json()
            .await
            .map_err(SocialError::http(PLATFORM))?;
        unwrap_answer(answer, status)
    }

    pub async fn get_me(&self) -> Result<User, SocialError> {
        self.call("getMe", &serde_json::json!({})).await
    }

    /// Sends a text to the channel, split into several messages when it is
    /// too long for one.
    pub async fn send_text(&self, text: &str) -> Result<Vec<Message>, SocialError> {
        let parts = segment_by(text, MAX_MESSAGE_LENGTH, message_length);
        let mut messages = Vec::with_capacity(parts.len());

        for (index, part) in parts.iter().enumerate() {
            let message = self
                .call(
                    "sendMessage",
                    &SendMessageRequest {
                        chat_id: &self.channel,
                        text: part,
                        link_preview_options: LinkPreviewOptions { is_disabled: true },
                    },
                )
                .await?;
            messages.push(message);

            if index + 1 < parts.len() {
                sleep(MESSAGE_DELAY).await;
            }
        }

        Ok(messages)
    }

    /// Sends a photo with the text as caption. A caption too long for
    /// Telegram is sent as separate messages after a bare photo.
    pub async fn send_photo(&self, photo_url: &str, text: &str) -> Result<Vec<Message>, SocialError> {
        let fits = fits_caption(text);

        let photo: Message = self
            .call(
                "sendPhoto",
                &SendPhotoRequest {
                    chat_id: &self.channel,
                    photo: photo_url,
                    caption: fits.then_some(text),
                },
            )
            .await?;

        let mut messages = vec![photo];
        if !fits {
            sleep(MESSAGE_DELAY).await;
            messages.extend(self.send_text(text).await?);
        }
        Ok(messages)
    }

    /// Sends every post to the channel. A post that fails is reported and
    /// skipped. Returns how many posts were sent.
    pub async fn publish_posts(&self, posts: &[Post]) -> Result<usize, SocialError> {
        if posts.is_empty() {
            return Ok(0);
        }

        let bot = self.get_me().await?;
        info!(
            "Posting to Telegram as @{}",
            bot.username.unwrap_or_else(|| bot.id.to_string())
        );

        let mut count = 0;
        for (index, post) in posts.iter().enumerate() {
            let text = render(post);
            let sent = match &post.image_url {
                Some(image_url) => self.send_photo(image_url, &text).await,
                None => self.send_text(&text).await,
            };
            match sent {
                Ok(_) => count += 1,
                Err(e) => warning!("Cannot post to Telegram: {}", e),
            }

            if index + 1 < posts.len() {
                sleep(MESSAGE_DELAY).await;
            }
        }
        Ok(count)
    }
}

fn unwrap_answer<T>(answer: ApiResponse<T>, status: u16) -> Result<T, SocialError> {
    match answer {
        ApiResponse {
            ok: true,
            result: Some(result),
            ..
        } => Ok(result),
        ApiResponse { description, .. } => Err(SocialError::Api {
            platform: PLATFORM,
            status,
            message: description.unwrap_or_else(|| "no result".to_string()),
        }),
    }
}

/// Length of a text as Telegram counts it, in UTF-16 code units.
pub fn message_length(text: &str) -> usize {
    text.encode_utf16().count()
}

pub fn fits_caption(text: &str) -> bool {
    message_length(text) <= MAX_CAPTION_LENGTH
}

/// Post text followed by one `TITLE: url` line per link.
pub fn render(post: &Post) -> String {
    let mut text = post.text.clone();
    if !post.links.is_empty() {
        text.push('\n');
        let links = post
            .links
            .iter()
            .map(|link| format!("{}: {}", link.title, link.url))
            .collect::<Vec<_>>();
        text.push_str(&links.join("\n"));
    }
    text
}
