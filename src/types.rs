use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use tabled::Tabled;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReleaseType {
    Album,
    Single,
    Compilation,
}

impl ReleaseType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReleaseType::Album => "album",
            ReleaseType::Single => "single",
            ReleaseType::Compilation => "compilation",
        }
    }
}

impl fmt::Display for ReleaseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A release as scraped from a source during the current run.
///
/// `artists_popularity` is `NaN` when the source could not measure it. It is
/// persisted as JSON `null` and read back as `NaN`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MusicRelease {
    pub artists: Vec<String>,
    #[serde(
        serialize_with = "serialize_popularity",
        deserialize_with = "deserialize_popularity",
        default = "unknown_popularity"
    )]
    pub artists_popularity: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    pub release_date: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_tracks: Option<u32>,
    #[serde(rename = "type")]
    pub release_type: ReleaseType,
    pub url: String,
}

fn unknown_popularity() -> f64 {
    f64::NAN
}

fn serialize_popularity<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    if value.is_nan() {
        serializer.serialize_none()
    } else {
        serializer.serialize_some(value)
    }
}

fn deserialize_popularity<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(f64::NAN))
}

/// A release decorated with scrobbling-service tags.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnhancedMusicRelease {
    #[serde(flatten)]
    pub release: MusicRelease,
    #[serde(default)]
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AppearanceKind {
    Found,
    Lost,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppearanceLogEntry {
    pub time: DateTime<Utc>,
    #[serde(rename = "type")]
    pub kind: AppearanceKind,
}

impl AppearanceLogEntry {
    pub fn found(time: DateTime<Utc>) -> Self {
        Self {
            time,
            kind: AppearanceKind::Found,
        }
    }

    pub fn lost(time: DateTime<Utc>) -> Self {
        Self {
            time,
            kind: AppearanceKind::Lost,
        }
    }
}

/// The persisted form of a release: the enhanced release plus every
/// FOUND/LOST transition observed for it, oldest first.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MusicReleaseRecord {
    #[serde(flatten)]
    pub enhanced: EnhancedMusicRelease,
    pub appearance_log: Vec<AppearanceLogEntry>,
}

impl AsRef<MusicRelease> for MusicRelease {
    fn as_ref(&self) -> &MusicRelease {
        self
    }
}

impl AsRef<MusicRelease> for EnhancedMusicRelease {
    fn as_ref(&self) -> &MusicRelease {
        &self.release
    }
}

impl AsRef<MusicRelease> for MusicReleaseRecord {
    fn as_ref(&self) -> &MusicRelease {
        &self.enhanced.release
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostLink {
    pub title: String,
    pub url: String,
}

/// A platform independent announcement. Publishers decide how links are
/// rendered and how the text is split.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub text: String,
    pub image_url: Option<String>,
    pub links: Vec<PostLink>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtistEntry {
    pub name: String,
    pub spotify_id: Option<String>,
    pub youtube_music_id: Option<String>,
}

#[derive(Tabled)]
pub struct ReleaseTableRow {
    pub date: String,
    pub artists: String,
    pub title: String,
    #[tabled(rename = "type")]
    pub kind: String,
    pub tags: String,
}

#[derive(Tabled)]
pub struct CollectedArtistTableRow {
    pub name: String,
    #[tabled(rename = "spotify id")]
    pub spotify_id: String,
    pub note: String,
}

#[derive(Tabled)]
pub struct MissingArtistTableRow {
    pub artist: String,
    pub collaborator: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessTokenResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtistAlbumsResponse {
    pub items: Vec<Album>,
    pub next: Option<String>,
    pub total: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Album {
    pub id: String,
    pub name: String,
    pub album_type: String,
    pub album_group: Option<String>,
    pub release_date: String,
    pub release_date_precision: String,
    pub total_tracks: Option<u32>,
    pub artists: Vec<AlbumArtist>,
    #[serde(default)]
    pub images: Vec<Image>,
    pub external_urls: ExternalUrls,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlbumArtist {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Image {
    pub url: String,
    pub width: Option<u32>,
    pub height: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExternalUrls {
    pub spotify: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Artist {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub popularity: u32,
}

/// Unknown ids come back as `null` entries.
#[derive(Debug, Clone, Deserialize)]
pub struct SeveralArtistsResponse {
    pub artists: Vec<Option<Artist>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ArtistSearchResponse {
    pub artists: ArtistSearchPage,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ArtistSearchPage {
    #[serde(default)]
    pub items: Vec<Artist>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LastfmErrorResponse {
    pub error: u32,
    pub message: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ArtistInfoResponse {
    pub artist: ArtistInfo,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ArtistInfo {
    pub name: String,
    pub stats: ArtistStats,
}

/// Last.fm reports counters as strings.
#[derive(Debug, Clone, Deserialize)]
pub struct ArtistStats {
    pub listeners: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TopTagsResponse {
    pub toptags: TopTags,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TopTags {
    #[serde(default)]
    pub tag: Vec<TopTag>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopTag {
    pub count: f64,
    pub name: String,
}
