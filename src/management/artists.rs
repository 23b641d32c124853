use std::{
    collections::HashSet,
    path::{Path, PathBuf},
};

use thiserror::Error;

use crate::types::ArtistEntry;

#[derive(Debug, Error)]
pub enum ArtistListError {
    #[error("cannot read artist list {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("artist list {0} is empty")]
    Empty(PathBuf),
}

/// The curated list of artists, read from a CSV file with the header
/// `name,spotifyId,youtubeMusicId`.
pub struct ArtistListManager {
    artists: Vec<ArtistEntry>,
}

impl ArtistListManager {
    pub fn new(artists: Vec<ArtistEntry>) -> Self {
        Self { artists }
    }

    pub async fn load(path: &Path) -> Result<Self, ArtistListError> {
        let content = async_fs::read_to_string(path)
            .await
            .map_err(|source| ArtistListError::Io {
                path: path.to_path_buf(),
                source,
            })?;

        let artists = parse_artist_list(&content);
        if artists.is_empty() {
            return Err(ArtistListError::Empty(path.to_path_buf()));
        }
        Ok(Self { artists })
    }

    pub fn all(&self) -> &[ArtistEntry] {
        &self.artists
    }

    pub fn count(&self) -> usize {
        self.artists.len()
    }

    pub fn contains_name(&self, name: &str) -> bool {
        self.artists.iter().any(|artist| artist.name == name)
    }

    /// Artists that have a Spotify id, each id once, as `(name, id)` pairs.
    pub fn spotify_artists(&self) -> Vec<(String, String)> {
        let mut seen = HashSet::new();
        self.artists
            .iter()
            .filter_map(|artist| {
                let id = artist.spotify_id.as_ref()?;
                seen.insert(id.clone())
                    .then(|| (artist.name.clone(), id.clone()))
            })
            .collect()
    }
}

/// Header line of the artist CSV.
pub const ARTIST_LIST_HEADER: &str = "name,spotifyId,youtubeMusicId";

/// Parses the artist CSV. The first line is a header. Names containing a
/// comma or a double quote are wrapped in double quotes, with inner quotes
/// doubled; ids never are.
pub fn parse_artist_list(content: &str) -> Vec<ArtistEntry> {
    content
        .lines()
        .skip(1)
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter_map(parse_artist_line)
        .collect()
}

fn parse_artist_line(line: &str) -> Option<ArtistEntry> {
    let (name, ids) = match line.strip_prefix('"') {
        Some(quoted) => {
            let (name, rest) = quoted.rsplit_once("\",")?;
            (name.replace("\"\"", "\""), rest)
        }
        None => match line.split_once(',') {
            Some((name, rest)) => (name.trim().to_string(), rest),
            None => (line.to_string(), ""),
        },
    };

    if name.is_empty() {
        return None;
    }

    let mut ids = ids.split(',').map(|id| {
        let id = id.trim();
        (!id.is_empty()).then(|| id.to_string())
    });

    Some(ArtistEntry {
        name,
        spotify_id: ids.next().flatten(),
        youtube_music_id: ids.next().flatten(),
    })
}

/// Writes artists in the format [`parse_artist_list`] reads.
pub fn format_artist_list(artists: &[ArtistEntry]) -> String {
    let mut csv = String::from(ARTIST_LIST_HEADER);
    csv.push('\n');
    for artist in artists {
        csv.push_str(&format!(
            "{},{},{}\n",
            escape_csv_field(&artist.name),
            artist.spotify_id.as_deref().unwrap_or_default(),
            artist.youtube_music_id.as_deref().unwrap_or_default(),
        ));
    }
    csv
}

fn escape_csv_field(field: &str) -> String {
    if field.contains([',', '"']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

/// Artist names to look up, one per line. Blank lines and repeated names
/// are dropped; the first occurrence keeps its position.
pub fn parse_artist_names(content: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && seen.insert(line.to_string()))
        .map(str::to_string)
        .collect()
}
