use std::collections::HashMap;

use reqwest::StatusCode;
use tokio::time::sleep;

use crate::{
    spotify::{PAGE_DELAY, SpotifyClient},
    types::{Album, ArtistAlbumsResponse, MusicRelease, ReleaseType},
    warning,
};

/// Release groups requested for every artist. Compilations are dropped
/// after mapping.
pub const INCLUDE_GROUPS: &str = "album,single,appears_on";

const PAGE_LIMIT: u32 = 50;

impl SpotifyClient {
    /// Fetches every album, single and appearance of an artist available in
    /// the configured market, rated by the popularity of the credited
    /// artists.
    ///
    /// An unknown artist id yields an empty list.
    pub async fn get_artist_releases(
        &mut self,
        artist_id: &str,
    ) -> Result<Vec<MusicRelease>, reqwest::Error> {
        let albums = self.get_artist_albums(artist_id).await?;

        let mut credited: Vec<String> = albums
            .iter()
            .flat_map(|album| album.artists.iter().map(|artist| artist.id.clone()))
            .filter(|id| !id.is_empty())
            .collect();
        credited.sort();
        credited.dedup();
        let popularity = match self.artists_popularity(&credited).await {
            Ok(popularity) => popularity,
            Err(e) => {
                warning!("Cannot get popularity of credited artists: {}", e);
                HashMap::new()
            }
        };

        Ok(albums
            .into_iter()
            .filter_map(|album| album_to_release(album, &popularity))
            .collect())
    }

    async fn get_artist_albums(&mut self, artist_id: &str) -> Result<Vec<Album>, reqwest::Error> {
        let mut albums = Vec::new();
        let mut offset = 0;

        loop {
            let token = self.access_token().await?;
            let api_url = format!(
                "{uri}/artists/{id}/albums?include_groups={groups}&market={market}&limit={limit}&offset={offset}",
                uri = self.api_url,
                id = artist_id,
                groups = INCLUDE_GROUPS,
                market = self.market,
                limit = PAGE_LIMIT,
                offset = offset,
            );

            let response = self
                .send_with_retry(|client| client.get(&api_url).bearer_auth(&token))
                .await?;
            if response.status() == StatusCode::NOT_FOUND {
                return Ok(albums);
            }

            let page = response
                .error_for_status()?
                .json::<ArtistAlbumsResponse>()
                .await?;

            let count = page.items.len() as u32;
            albums.extend(page.items);

            if page.next.is_none() || count == 0 {
                return Ok(albums);
            }
            offset += count;
            sleep(PAGE_DELAY).await;
        }
    }
}

pub fn parse_release_type(album_type: &str) -> Option<ReleaseType> {
    match album_type.to_lowercase().as_str() {
        "album" => Some(ReleaseType::Album),
        "single" => Some(ReleaseType::Single),
        "compilation" => Some(ReleaseType::Compilation),
        _ => None,
    }
}

/// Maps a Spotify album to a release. Compilations and unknown album types
/// are skipped. The first image is Spotify's widest cover.
///
/// `artists_popularity` is the highest `popularity` entry among the credited
/// artist ids, `NaN` when none of them has one.
pub fn album_to_release(album: Album, popularity: &HashMap<String, f64>) -> Option<MusicRelease> {
    let release_type = parse_release_type(&album.album_type)?;
    if release_type == ReleaseType::Compilation {
        return None;
    }

    let url = album
        .external_urls
        .spotify
        .unwrap_or_else(|| format!("https://open.spotify.com/album/{}", album.id));

    let artists_popularity = album
        .artists
        .iter()
        .filter_map(|artist| popularity.get(&artist.id).copied())
        .fold(f64::NAN, f64::max);

    Some(MusicRelease {
        artists: album
            .artists
            .into_iter()
            .map(|artist| artist.name)
            .filter(|name| !name.trim().is_empty())
            .collect(),
        artists_popularity,
        image_url: album.images.into_iter().next().map(|image| image.url),
        release_date: album.release_date,
        title: album.name,
        total_tracks: album.total_tracks,
        release_type,
        url,
    })
}
