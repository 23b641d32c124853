use std::time::Duration;

use chrono::Utc;
use reqwest::{Client, Response, header::CONTENT_TYPE};
use serde::{Deserialize, Serialize};
use tokio::time::sleep;

use crate::{
    config,
    config::ConfigError,
    info,
    social::SocialError,
    text::{segment, text_length},
    types::Post,
    warning,
};

const PLATFORM: &str = "Bluesky";

/// Graphemes allowed in one Bluesky post.
pub const MAX_POST_LENGTH: usize = 300;

const THREAD_DELAY: Duration = Duration::from_secs(1);

#[derive(Debug, Serialize)]
struct CreateSessionRequest<'a> {
    identifier: &'a str,
    password: &'a str,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Session {
    access_jwt: String,
    did: String,
    handle: String,
}

#[derive(Debug, Deserialize)]
struct UploadBlobResponse {
    blob: serde_json::Value,
}

/// Reference to a published post, as used in reply chains.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StrongRef {
    pub uri: String,
    pub cid: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReplyRef {
    pub root: StrongRef,
    pub parent: StrongRef,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ByteSlice {
    pub byte_start: usize,
    pub byte_end: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "$type")]
pub enum FacetFeature {
    #[serde(rename = "app.bsky.richtext.facet#link")]
    Link { uri: String },
    #[serde(rename = "app.bsky.richtext.facet#tag")]
    Tag { tag: String },
}

/// Rich text annotation over a byte range of the post text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Facet {
    pub index: ByteSlice,
    pub features: Vec<FacetFeature>,
}

#[derive(Debug, Serialize)]
struct ImageEmbed {
    image: serde_json::Value,
    alt: String,
}

#[derive(Debug, Serialize)]
struct ImagesEmbed {
    #[serde(rename = "$type")]
    kind: &'static str,
    images: Vec<ImageEmbed>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PostRecord {
    #[serde(rename = "$type")]
    kind: &'static str,
    text: String,
    created_at: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    facets: Vec<Facet>,
    #[serde(skip_serializing_if = "Option::is_none")]
    reply: Option<ReplyRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    embed: Option<ImagesEmbed>,
}

#[derive(Debug, Serialize)]
struct CreateRecordRequest<'a> {
    repo: &'a str,
    collection: &'static str,
    record: PostRecord,
}

pub struct BlueskyClient {
    client: Client,
    service: String,
    identifier: String,
    password: String,
    session: Option<Session>,
}

impl BlueskyClient {
    pub fn new(service: String, identifier: String, password: String) -> Self {
        Self {
            client: Client::new(),
            service: service.trim_end_matches('/').to_string(),
            identifier,
            password,
            session: None,
        }
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self::new(
            config::bluesky_service(),
            config::bluesky_identifier()?,
            config::bluesky_password()?,
        ))
    }

    fn xrpc(&self, method: &str) -> String {
        format!("{}/xrpc/{}", self.service, method)
    }

    fn session(&self) -> Result<&Session, SocialError> {
        self.session
            .as_ref()
            .ok_or(SocialError::NotAuthenticated(PLATFORM))
    }

    pub async fn login(&mut self) -> Result<(), SocialError> {
        let response = self
            .client
            .post(self.xrpc("com.atproto.server.createSession"))
            .json(&CreateSessionRequest {
                identifier: &self.identifier,
                password: &self.password,
            })
            .send()
            .await
            .map_err(SocialError::http(PLATFORM))?;

        let session: Session = checked(response)
            .await?
            .json()
            .await
            .map_err(SocialError::http(PLATFORM))?;
        info!("Logged in to Bluesky as {}", session.handle);
        self.session = Some(session);
        Ok(())
    }

    async fn upload_image(&self, image_url: &str) -> Result<serde_json::Value, SocialError> {
        let session = self.session()?;

        let image = self
            .client
            .get(image_url)
            .send()
            .await
            .map_err(SocialError::http(PLATFORM))?
            .error_for_status()
            .map_err(SocialError::http(PLATFORM))?;
        let content_type = image
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or("image/jpeg")
            .to_string();
        let bytes = image.bytes().await.map_err(SocialError::http(PLATFORM))?;

        let response = self
            .client
            .post(self.xrpc("com.atproto.repo.uploadBlob"))
            .bearer_auth(&session.access_jwt)
            .header(CONTENT_TYPE, content_type)
            .body(bytes)
            .send()
            .await
            .map_err(SocialError::http(PLATFORM))?;

        let uploaded: UploadBlobResponse = checked(response)
            .await?
            .json()
            .await
            .map_err(SocialError::http(PLATFORM))?;
        Ok(uploaded.blob)
    }

    async fn create_post(
        &self,
        text: &str,
        reply: Option<ReplyRef>,
        image: Option<(&str, &str)>,
    ) -> Result<StrongRef, SocialError> {
        let session = self.session()?;

        let embed = match image {
            Some((image_url, alt)) => Some(ImagesEmbed {
                kind: "app.bsky.embed.images",
                images: vec![ImageEmbed {
                    image: self.upload_image(image_url).await?,
                    alt: alt.to_string(),
                }],
            }),
            None => None,
        };

        let record = PostRecord {
            kind: "app.bsky.feed.post",
            text: text.to_string(),
            created_at: Utc::now().to_rfc3339(),
            facets: detect_facets(text),
            reply,
            embed,
        };

        let response = self
            .client
            .post(self.xrpc("com.atproto.repo.createRecord"))
            .bearer_auth(&session.access_jwt)
            .json(&CreateRecordRequest {
                repo: &session.did,
                collection: "app.bsky.feed.post",
                record,
            })
            .send()
            .await
            .map_err(SocialError::http(PLATFORM))?;

        checked(response)
            .await?
            .json()
            .await
            .map_err(SocialError::http(PLATFORM))
    }

    /// Publishes a text, as a thread when it is longer than one post allows.
    ///
    /// With `previous` the first post replies to it. The image goes on the
    /// first post only. Returns the published posts in order.
    pub async fn publish_text(
        &self,
        text: &str,
        previous: Option<ReplyRef>,
        image: Option<(&str, &str)>,
    ) -> Result<Vec<StrongRef>, SocialError> {
        let parts = segment(text, MAX_POST_LENGTH);
        if parts.len() > 1 {
            info!("Splitting post into a thread of {} parts", parts.len());
        }

        let mut root = previous.as_ref().map(|reply| reply.root.clone());
        let mut parent = previous.map(|reply| reply.parent);
        let mut published = Vec::with_capacity(parts.len());

        for (index, part) in parts.iter().enumerate() {
            let reply = match (&root, &parent) {
                (Some(root), Some(parent)) => Some(ReplyRef {
                    root: root.clone(),
                    parent: parent.clone(),
                }),
                _ => None,
            };

            let post = self
                .create_post(part, reply, if index == 0 { image } else { None })
                .await?;

            if root.is_none() {
                root = Some(post.clone());
            }
            parent = Some(post.clone());
            published.push(post);

            if index + 1 < parts.len() {
                sleep(THREAD_DELAY).await;
            }
        }

        Ok(published)
    }

    /// Publishes posts as one thread: every post replies to the previous
    /// one and the first post is the root of all of them. A post that fails
    /// is reported and skipped. Returns how many posts were published.
    pub async fn publish_posts(
        &mut self,
        posts: &[Post],
        alt_text: &str,
    ) -> Result<usize, SocialError> {
        if posts.is_empty() {
            return Ok(0);
        }
        if self.session.is_none() {
            self.login().await?;
        }

        let mut root: Option<StrongRef> = None;
        let mut parent: Option<StrongRef> = None;
        let mut count = 0;

        for post in posts {
            let text = render(post);
            let previous = match (&root, &parent) {
                (Some(root), Some(parent)) => Some(ReplyRef {
                    root: root.clone(),
                    parent: parent.clone(),
                }),
                _ => None,
            };
            let image = post.image_url.as_deref().map(|url| (url, alt_text));

            match self.publish_text(&text, previous, image).await {
                Ok(published) => {
                    if root.is_none() {
                        root = published.first().cloned();
                    }
                    if let Some(last) = published.last() {
                        parent = Some(last.clone());
                    }
                    count += 1;
                    info!(
                        "Posted to Bluesky ({} characters)",
                        text_length(&text)
                    );
                }
                Err(e) => warning!("Cannot post to Bluesky: {}", e),
            }
        }

        Ok(count)
    }
}

async fn checked(response: Response) -> Result<Response, SocialError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let message = response.text().await.unwrap_or_default();
    Err(SocialError::Api {
        platform: PLATFORM,
        status: status.as_u16(),
        message,
    })
}

/// Post text followed by a blank line and the link URLs, one per line.
pub fn render(post: &Post) -> String {
    if post.links.is_empty() {
        return post.text.clone();
    }
    let links = post
        .links
        .iter()
        .map(|link| link.url.as_str())
        .collect::<Vec<_>>()
        .join("\n");
    format!("{}\n\n{}", post.text, links)
}

/// Finds links and hashtags in a post text. Offsets are UTF-8 byte
/// positions, as the AT Protocol requires.
///
/// Trailing punctuation is not part of a link, and a hashtag consists of
/// letters, digits and underscores after `#`.
pub fn detect_facets(text: &str) -> Vec<Facet> {
    let mut facets = Vec::new();

    for (start, token) in tokens(text) {
        if token.starts_with("https://") || token.starts_with("http://") {
            let uri = token.trim_end_matches(['.', ',', ';', ':', '!', '?', ')', '"', '\'']);
            facets.push(Facet {
                index: ByteSlice {
                    byte_start: start,
                    byte_end: start + uri.len(),
                },
                features: vec![FacetFeature::Link {
                    uri: uri.to_string(),
                }],
            });
        } else if let Some(rest) = token.strip_prefix('#') {
            let tag_len: usize = rest
                .chars()
                .take_while(|c| c.is_alphanumeric() || *c == '_')
                .map(char::len_utf8)
                .sum();
            let tag = &rest[..tag_len];
            if tag.is_empty() || tag.chars().all(|c| c.is_ascii_digit()) {
                continue;
            }
            facets.push(Facet {
                index: ByteSlice {
                    byte_start: start,
                    byte_end: start + 1 + tag_len,
                },
                features: vec![FacetFeature::Tag {
                    tag: tag.to_string(),
                }],
            });
        }
    }

    facets
}

/// Whitespace separated tokens with their byte offsets.
fn tokens(text: &str) -> impl Iterator<Item = (usize, &str)> {
    text.split(char::is_whitespace)
        .scan(0, move |offset, token| {
            let start = *offset;
            // The separator is a single whitespace char; find its width.
            let separator = text[start + token.len()..]
                .chars()
                .next()
                .map_or(0, char::len_utf8);
            *offset = start + token.len() + separator;
            Some((start, token))
        })
        .filter(|(_, token)| !token.is_empty())
}
