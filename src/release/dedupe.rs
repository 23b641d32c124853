use std::{cmp::Ordering, collections::HashMap};

use crate::{release::release_identity, types::MusicRelease};

/// Total order over popularity scores where `NaN` sorts below every number.
pub fn compare_popularity(a: f64, b: f64) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        (false, false) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
    }
}

/// Collapses releases sharing an identity into the one with the highest
/// artist popularity. On a tie the earlier release stays.
///
/// Survivors keep the position where their identity was first seen.
pub fn dedupe_releases<R: AsRef<MusicRelease>>(releases: Vec<R>) -> Vec<R> {
    let mut positions: HashMap<String, usize> = HashMap::new();
    let mut survivors: Vec<R> = Vec::with_capacity(releases.len());

    for release in releases {
        let identity = release_identity(&release);
        match positions.get(&identity) {
            Some(&position) => {
                let current = survivors[position].as_ref().artists_popularity;
                let candidate = release.as_ref().artists_popularity;
                if compare_popularity(candidate, current) == Ordering::Greater {
                    survivors[position] = release;
                }
            }
            None => {
                positions.insert(identity, survivors.len());
                survivors.push(release);
            }
        }
    }

    survivors
}

/// Merges release lists coming from several sources, earlier sources first,
/// using the same identity and popularity rule as [`dedupe_releases`].
///
/// Only Spotify is scraped today. A further source such as YouTube Music
/// plugs in here, with its list after Spotify's.
pub fn dedupe_across_sources<R: AsRef<MusicRelease>>(sources: Vec<Vec<R>>) -> Vec<R> {
    dedupe_releases(sources.into_iter().flatten().collect())
}
