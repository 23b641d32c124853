use std::collections::HashMap;

use crate::lastfm::WeightedTag;

/// Per-artist answers already received from Last.fm, keyed by the trimmed
/// artist name. Lives as long as the client that owns it.
#[derive(Debug, Default)]
pub struct ArtistInfoCache {
    popularity: HashMap<String, f64>,
    tags: HashMap<String, Vec<WeightedTag>>,
}

impl ArtistInfoCache {
    pub fn popularity(&self, artist: &str) -> Option<f64> {
        self.popularity.get(artist).copied()
    }

    pub fn insert_popularity(&mut self, artist: &str, popularity: f64) {
        self.popularity.insert(artist.to_string(), popularity);
    }

    pub fn tags(&self, artist: &str) -> Option<&[WeightedTag]> {
        self.tags.get(artist).map(Vec::as_slice)
    }

    pub fn insert_tags(&mut self, artist: &str, tags: Vec<WeightedTag>) {
        self.tags.insert(artist.to_string(), tags);
    }

    pub fn len(&self) -> usize {
        self.popularity.len().max(self.tags.len())
    }

    pub fn is_empty(&self) -> bool {
        self.popularity.is_empty() && self.tags.is_empty()
    }
}
