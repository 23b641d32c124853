//! # Last.fm Enrichment Module
//!
//! Scraped releases know nothing about how popular their artists are or
//! which genres they play. This module asks Last.fm for both:
//!
//! - `artist.getinfo` gives the listener count, turned into a popularity of
//!   `trunc(log10(listeners))`
//! - `artist.gettoptags` gives weighted tags, turned into at most eight
//!   genre tags per release
//!
//! Answers are kept in an [`ArtistInfoCache`] owned by the client, so an
//! artist credited on many releases is looked up once per run.

mod cache;
mod tags;

pub use cache::ArtistInfoCache;
pub use tags::{
    MAX_TAGS, MIN_TAG_WEIGHT, WeightedTag, merge_tags, normalize_tags, parse_whitelist,
    popularity_from_listeners,
};

use std::{collections::HashSet, path::Path, time::Duration};

use reqwest::Client;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tokio::time::sleep;

use crate::{
    config,
    types::{
        ArtistInfoResponse, EnhancedMusicRelease, LastfmErrorResponse, MusicRelease,
        TopTagsResponse,
    },
    warning,
};

/// Last.fm answers with this code when an artist does not exist.
pub const ARTIST_NOT_FOUND: u32 = 6;

/// Retries after the first failed attempt.
pub const MAX_RETRIES: u32 = 5;

const RETRY_DELAY: Duration = Duration::from_millis(200);
const CALL_DELAY: Duration = Duration::from_millis(100);

#[derive(Debug, Error)]
pub enum LastfmError {
    #[error("request to Last.fm failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Last.fm error {code}: {message}")]
    Api { code: u32, message: String },
    #[error("unexpected Last.fm response: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("artist name is empty")]
    EmptyArtistName,
}

pub struct LastfmClient {
    client: Client,
    api_url: String,
    api_key: String,
    whitelist: Option<HashSet<String>>,
    cache: ArtistInfoCache,
}

impl LastfmClient {
    pub fn new(api_url: String, api_key: String, whitelist: Option<HashSet<String>>) -> Self {
        Self {
            client: Client::new(),
            api_url,
            api_key,
            whitelist,
            cache: ArtistInfoCache::default(),
        }
    }

    /// Builds a client from the environment, reading the tag whitelist when
    /// `RELCAST_TAG_WHITELIST` points to one.
    pub async fn from_env() -> crate::Res<Self> {
        let api_key = config::lastfm_api_key()?;
        let whitelist = match config::tag_whitelist_path() {
            Some(path) => Some(load_whitelist(&path).await?),
            None => None,
        };
        Ok(Self::new(config::lastfm_api_url(), api_key, whitelist))
    }

    /// Calls a Last.fm method. `Ok(None)` means the artist does not exist.
    async fn fetch<T: DeserializeOwned>(
        &self,
        method: &str,
        artist: &str,
    ) -> Result<Option<T>, LastfmError> {
        let mut retries = 0;
        loop {
            match self.fetch_once(method, artist).await {
                Ok(value) => return Ok(Some(value)),
                Err(LastfmError::Api { code, .. }) if code == ARTIST_NOT_FOUND => return Ok(None),
                Err(e) if retries >= MAX_RETRIES => return Err(e),
                Err(_) => {
                    retries += 1;
                    sleep(RETRY_DELAY).await;
                }
            }
        }
    }

    async fn fetch_once<T: DeserializeOwned>(
        &self,
        method: &str,
        artist: &str,
    ) -> Result<T, LastfmError> {
        let body = self
            .client
            .get(&self.api_url)
            .query(&[
                ("method", method),
                ("artist", artist),
                ("api_key", self.api_key.as_str()),
                ("format", "json"),
            ])
            .send()
            .await?
            .text()
            .await?;

        parse_response(&body)
    }

    /// Popularity of the most popular credited artist. Unknown artists count
    /// as zero.
    pub async fn artists_popularity(&mut self, artists: &[String]) -> Result<f64, LastfmError> {
        let mut max_popularity = 0.0_f64;
        for artist in artists {
            let name = artist.trim();
            if name.is_empty() {
                return Err(LastfmError::EmptyArtistName);
            }

            let popularity = match self.cache.popularity(name) {
                Some(popularity) => popularity,
                None => {
                    match self
                        .fetch::<ArtistInfoResponse>("artist.getinfo", name)
                        .await?
                    {
                        Some(info) => {
                            let listeners = info.artist.stats.listeners.trim().parse().unwrap_or(0);
                            let popularity = popularity_from_listeners(listeners);
                            self.cache.insert_popularity(name, popularity);
                            popularity
                        }
                        None => 0.0,
                    }
                }
            };
            max_popularity = max_popularity.max(popularity);
        }
        Ok(max_popularity)
    }

    /// Genre tags shared by the credited artists, heaviest first.
    ///
    /// An artist whose tags cannot be fetched is skipped with a warning.
    pub async fn artists_tags(&mut self, artists: &[String]) -> Result<Vec<String>, LastfmError> {
        let mut per_artist = Vec::with_capacity(artists.len());
        for artist in artists {
            let name = artist.trim();
            if name.is_empty() {
                return Err(LastfmError::EmptyArtistName);
            }

            if let Some(tags) = self.cache.tags(name) {
                per_artist.push(tags.to_vec());
                continue;
            }

            match self
                .fetch::<TopTagsResponse>("artist.gettoptags", name)
                .await
            {
                Ok(response) => {
                    let tags = response
                        .map(|response| normalize_tags(response.toptags.tag, self.whitelist.as_ref()))
                        .unwrap_or_default();
                    self.cache.insert_tags(name, tags.clone());
                    per_artist.push(tags);
                }
                Err(e) => warning!("Cannot fetch tags of {}: {}", name, e),
            }
        }
        Ok(merge_tags(per_artist))
    }

    /// Adds popularity and tags to a release. Failures leave popularity at
    /// zero and the tags empty.
    pub async fn enhance(&mut self, mut release: MusicRelease) -> EnhancedMusicRelease {
        sleep(CALL_DELAY).await;
        release.artists_popularity = match self.artists_popularity(&release.artists).await {
            Ok(popularity) => popularity,
            Err(e) => {
                warning!("Cannot get popularity of \"{}\": {}", release.title, e);
                0.0
            }
        };

        sleep(CALL_DELAY).await;
        let tags = match self.artists_tags(&release.artists).await {
            Ok(tags) => tags,
            Err(e) => {
                warning!("Cannot get tags of \"{}\": {}", release.title, e);
                Vec::new()
            }
        };

        EnhancedMusicRelease { release, tags }
    }

    /// Enhances releases one after another.
    pub async fn enhance_all(&mut self, releases: Vec<MusicRelease>) -> Vec<EnhancedMusicRelease> {
        let mut enhanced = Vec::with_capacity(releases.len());
        for release in releases {
            enhanced.push(self.enhance(release).await);
        }
        enhanced
    }
}

/// Decodes a Last.fm answer. Last.fm reports failures as an `error` object,
/// sometimes with a success status code.
pub fn parse_response<T: DeserializeOwned>(body: &str) -> Result<T, LastfmError> {
    let value: serde_json::Value = serde_json::from_str(body)?;
    if value.get("error").is_some() {
        let error: LastfmErrorResponse = serde_json::from_value(value)?;
        return Err(LastfmError::Api {
            code: error.error,
            message: error.message,
        });
    }
    Ok(serde_json::from_value(value)?)
}

pub async fn load_whitelist(path: &Path) -> Result<HashSet<String>, std::io::Error> {
    let content = async_fs::read_to_string(path).await?;
    Ok(parse_whitelist(&content))
}
