use thiserror::Error;

use crate::{
    release::{Locale, hashtagify},
    types::{EnhancedMusicRelease, Post, PostLink},
};

const SOURCE_TITLES: [(&str, &str); 2] = [
    ("open.spotify.com", "SPOTIFY"),
    ("music.youtube.com", "YOUTUBE MUSIC"),
];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ComposeError {
    #[error("release \"{0}\" credits no artists")]
    NoArtists(String),
    #[error("unknown release source: {0}")]
    UnknownSource(String),
}

/// Name of the platform a release URL points to.
pub fn source_title(url: &str) -> Option<&'static str> {
    let host = url
        .split("://")
        .nth(1)
        .unwrap_or(url)
        .split(['/', '?', '#'])
        .next()
        .unwrap_or_default();

    SOURCE_TITLES
        .iter()
        .find(|(domain, _)| host == *domain || host.ends_with(&format!(".{domain}")))
        .map(|(_, title)| *title)
}

/// Builds the announcement of a single release. The first line opens with
/// the popularity tier of the artists unless their popularity is unknown.
///
/// ```text
/// Проблиск 🎤 Artist A і Artist B
/// 💿 Title (альбом, 2024-03-01)
///
/// #tag_one #tag_two
/// ```
pub fn compose_post(release: &EnhancedMusicRelease, locale: Locale) -> Result<Post, ComposeError> {
    let music = &release.release;
    let artists = locale
        .join_artists(&music.artists)
        .ok_or_else(|| ComposeError::NoArtists(music.title.clone()))?;
    let source = source_title(&music.url)
        .ok_or_else(|| ComposeError::UnknownSource(music.url.clone()))?;

    let mut text = match locale.popularity_label(music.artists_popularity) {
        "" => String::new(),
        label => format!("{label} "),
    };
    text.push_str(&format!(
        "🎤 {artists}\n💿 {title} ({kind}, {date})",
        artists = artists,
        title = music.title,
        kind = locale.release_type_label(music.release_type),
        date = music.release_date,
    ));

    let hashtags = release
        .tags
        .iter()
        .filter_map(|tag| hashtagify(tag))
        .collect::<Vec<_>>();
    if !hashtags.is_empty() {
        text.push_str("\n\n");
        text.push_str(&hashtags.join(" "));
    }

    Ok(Post {
        text,
        image_url: music.image_url.clone(),
        links: vec![PostLink {
            title: source.to_string(),
            url: music.url.clone(),
        }],
    })
}
