use std::collections::HashMap;

use crate::{
    spotify::SpotifyClient,
    types::{Artist, ArtistSearchResponse, SeveralArtistsResponse},
};

/// Ids accepted by one `/artists` request.
const ARTISTS_BATCH: usize = 50;

/// Search results inspected per artist name.
const SEARCH_LIMIT: u32 = 10;

/// Outcome of looking an artist name up in the search results.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArtistMatch<'a> {
    /// A result carries exactly the name, compared case-sensitively first
    /// and case-insensitively second.
    Exact(&'a Artist),
    /// No result carries the name; this is the most popular one.
    Suggestion(&'a Artist),
    NotFound,
}

/// Picks the search result that stands for `name`.
pub fn select_artist_match<'a>(name: &str, results: &'a [Artist]) -> ArtistMatch<'a> {
    let lowercase = name.to_lowercase();
    let exact = results
        .iter()
        .find(|artist| artist.name == name)
        .or_else(|| {
            results
                .iter()
                .find(|artist| artist.name.to_lowercase() == lowercase)
        });
    if let Some(artist) = exact {
        return ArtistMatch::Exact(artist);
    }

    // first of equally popular results wins
    results
        .iter()
        .fold(None, |best: Option<&Artist>, artist| match best {
            Some(best) if best.popularity >= artist.popularity => Some(best),
            _ => Some(artist),
        })
        .map_or(ArtistMatch::NotFound, ArtistMatch::Suggestion)
}

impl SpotifyClient {
    /// Searches artists by name, most relevant first.
    pub async fn search_artists(&mut self, name: &str) -> Result<Vec<Artist>, reqwest::Error> {
        let token = self.access_token().await?;
        let api_url = format!("{uri}/search", uri = self.api_url);
        let limit = SEARCH_LIMIT.to_string();

        let response = self
            .send_with_retry(|client| {
                client
                    .get(&api_url)
                    .bearer_auth(&token)
                    .query(&[("q", name), ("type", "artist"), ("limit", limit.as_str())])
            })
            .await?;

        Ok(response
            .error_for_status()?
            .json::<ArtistSearchResponse>()
            .await?
            .artists
            .items)
    }

    /// Spotify popularity (0-100) of the given artists. Answers are kept for
    /// the lifetime of the client; unknown ids are absent from the result.
    pub async fn artists_popularity(
        &mut self,
        artist_ids: &[String],
    ) -> Result<HashMap<String, f64>, reqwest::Error> {
        let mut missing: Vec<&String> = artist_ids
            .iter()
            .filter(|id| !self.artist_popularity.contains_key(id.as_str()))
            .collect();
        missing.sort();
        missing.dedup();

        for batch in missing.chunks(ARTISTS_BATCH) {
            let token = self.access_token().await?;
            let ids = batch
                .iter()
                .map(|id| id.as_str())
                .collect::<Vec<_>>()
                .join(",");
            let api_url = format!("{uri}/artists", uri = self.api_url);

            let response = self
                .send_with_retry(|client| {
                    client
                        .get(&api_url)
                        .bearer_auth(&token)
                        .query(&[("ids", ids.as_str())])
                })
                .await?
                .error_for_status()?
                .json::<SeveralArtistsResponse>()
                .await?;

            for artist in response.artists.into_iter().flatten() {
                self.artist_popularity
                    .insert(artist.id, artist.popularity as f64);
            }
        }

        Ok(artist_ids
            .iter()
            .filter_map(|id| {
                self.artist_popularity
                    .get(id)
                    .map(|popularity| (id.clone(), *popularity))
            })
            .collect())
    }
}
