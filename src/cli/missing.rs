use std::{collections::HashSet, path::PathBuf};

use tabled::Table;

use crate::{
    error, info,
    management::{ArtistListManager, HistoryError, HistoryManager},
    types::{MissingArtistTableRow, MusicReleaseRecord},
    warning,
};

/// Credited artists of `records` that are neither `tracked` nor in the
/// artist list. Each collaborator is reported once per `reported` set.
pub fn find_missing_collaborators(
    tracked: &str,
    records: &[MusicReleaseRecord],
    artist_list: &ArtistListManager,
    reported: &mut HashSet<String>,
) -> Vec<MissingArtistTableRow> {
    let mut rows = Vec::new();
    for record in records {
        for artist in &record.enhanced.release.artists {
            if artist != tracked
                && !artist_list.contains_name(artist)
                && reported.insert(artist.clone())
            {
                rows.push(MissingArtistTableRow {
                    artist: tracked.to_string(),
                    collaborator: artist.clone(),
                });
            }
        }
    }
    rows
}

/// Lists artists credited on stored releases who are missing from the
/// artist list.
pub async fn missing(artists_file: PathBuf, data_dir: PathBuf) {
    let artist_list = match ArtistListManager::load(&artists_file).await {
        Ok(manager) => manager,
        Err(e) => error!("Cannot load artist list: {}", e),
    };
    let history = HistoryManager::new(data_dir);

    let mut reported = HashSet::new();
    let mut rows = Vec::new();
    for (name, id) in artist_list.spotify_artists() {
        let records = match history.load(&name, &id).await {
            Ok(records) => records,
            Err(HistoryError::NotFound(_)) => continue,
            Err(e) => {
                warning!("Skipping {}: {}", name, e);
                continue;
            }
        };
        rows.extend(find_missing_collaborators(
            &name,
            &records,
            &artist_list,
            &mut reported,
        ));
    }

    if rows.is_empty() {
        info!("Every credited artist is in the artist list");
        return;
    }

    let count = rows.len();
    println!("{}", Table::new(rows));
    info!("{} collaborators missing from {}", count, artists_file.display());
}
