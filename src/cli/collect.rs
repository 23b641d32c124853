use std::{collections::HashMap, io::ErrorKind, path::PathBuf, time::Duration};

use indicatif::{ProgressBar, ProgressStyle};
use tabled::Table;

use crate::{
    error, info,
    management::{format_artist_list, parse_artist_list, parse_artist_names},
    spotify::{
        SpotifyClient,
        artists::{ArtistMatch, select_artist_match},
    },
    success,
    types::{ArtistEntry, CollectedArtistTableRow},
    warning,
};

/// Turns a search outcome into an artist list entry and a report row.
pub fn collected_artist(name: &str, found: &ArtistMatch) -> (ArtistEntry, CollectedArtistTableRow) {
    let (spotify_id, note) = match found {
        ArtistMatch::Exact(artist) => (Some(artist.id.clone()), String::new()),
        ArtistMatch::Suggestion(artist) => (
            None,
            format!(
                "not found, maybe {} (popularity {})",
                artist.name, artist.popularity
            ),
        ),
        ArtistMatch::NotFound => (None, "not found".to_string()),
    };

    let row = CollectedArtistTableRow {
        name: name.to_string(),
        spotify_id: spotify_id.clone().unwrap_or_default(),
        note,
    };
    let entry = ArtistEntry {
        name: name.to_string(),
        spotify_id,
        youtube_music_id: None,
    };
    (entry, row)
}

/// Looks every name of `names_file` up on Spotify and writes the artist list
/// to `out_file`. YouTube Music ids already present in `out_file` are kept.
pub async fn collect(names_file: PathBuf, out_file: PathBuf) {
    let names = match async_fs::read_to_string(&names_file).await {
        Ok(content) => parse_artist_names(&content),
        Err(e) => error!("Cannot read {}: {}", names_file.display(), e),
    };
    if names.is_empty() {
        error!("No artist names in {}", names_file.display());
    }

    let youtube_ids: HashMap<String, String> = match async_fs::read_to_string(&out_file).await {
        Ok(content) => parse_artist_list(&content)
            .into_iter()
            .filter_map(|artist| Some((artist.name, artist.youtube_music_id?)))
            .collect(),
        Err(e) if e.kind() == ErrorKind::NotFound => HashMap::new(),
        Err(e) => error!("Cannot read {}: {}", out_file.display(), e),
    };

    let mut spotify = match SpotifyClient::from_env() {
        Ok(client) => client,
        Err(e) => error!("Cannot configure Spotify: {}", e),
    };

    let pb = ProgressBar::new_spinner();
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_style(
        ProgressStyle::with_template("{spinner:.blue} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"),
    );

    let total = names.len();
    let mut entries = Vec::with_capacity(total);
    let mut rows = Vec::with_capacity(total);

    for (index, name) in names.iter().enumerate() {
        pb.set_message(format!(
            "Searching {name} ({count}/{total})",
            name = name,
            count = index + 1,
            total = total
        ));

        let (mut entry, row) = match spotify.search_artists(name).await {
            Ok(results) => collected_artist(name, &select_artist_match(name, &results)),
            Err(e) => {
                pb.suspend(|| warning!("Cannot search {}: {}", name, e));
                let (entry, mut row) = collected_artist(name, &ArtistMatch::NotFound);
                row.note = format!("search failed: {e}");
                (entry, row)
            }
        };
        entry.youtube_music_id = youtube_ids.get(name).cloned();
        entries.push(entry);
        rows.push(row);
    }

    pb.finish_and_clear();

    let found = entries
        .iter()
        .filter(|entry| entry.spotify_id.is_some())
        .count();
    println!("{}", Table::new(rows));

    if let Err(e) = async_fs::write(&out_file, format_artist_list(&entries)).await {
        error!("Cannot write {}: {}", out_file.display(), e);
    }
    info!("{} of {} artists have no Spotify id", total - found, total);
    success!("Saved {} artists to {}", total, out_file.display());
}
