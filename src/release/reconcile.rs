use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::{
    release::release_identity,
    types::{
        AppearanceKind, AppearanceLogEntry, EnhancedMusicRelease, MusicRelease, MusicReleaseRecord,
    },
};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ReconcileError {
    #[error("appearance log of release {identity} is empty")]
    EmptyAppearanceLog { identity: String },
}

/// Outcome of reconciling an artist's history with a fresh scrape.
///
/// `merged` is the new snapshot with exactly one record per identity. `new`
/// and `lost` are copies of records that also appear in `merged`.
#[derive(Debug, Clone, Default)]
pub struct Reconciliation {
    pub new: Vec<MusicReleaseRecord>,
    pub lost: Vec<MusicReleaseRecord>,
    pub merged: Vec<MusicReleaseRecord>,
    /// Identities of stored records dropped because an earlier stored record
    /// already had the same identity.
    pub dropped_duplicates: Vec<String>,
}

impl MusicReleaseRecord {
    /// Wraps a release seen for the first time.
    pub fn first_seen(release: EnhancedMusicRelease, time: DateTime<Utc>) -> Self {
        Self {
            enhanced: release,
            appearance_log: vec![AppearanceLogEntry::found(time)],
        }
    }

    pub fn first_appearance(&self) -> Result<&AppearanceLogEntry, ReconcileError> {
        self.appearance_log.first().ok_or_else(|| self.empty_log())
    }

    pub fn last_appearance(&self) -> Result<&AppearanceLogEntry, ReconcileError> {
        self.appearance_log.last().ok_or_else(|| self.empty_log())
    }

    /// A record is obsolete while its latest transition is LOST.
    pub fn is_obsolete(&self) -> Result<bool, ReconcileError> {
        Ok(self.last_appearance()?.kind == AppearanceKind::Lost)
    }

    fn empty_log(&self) -> ReconcileError {
        ReconcileError::EmptyAppearanceLog {
            identity: release_identity(self),
        }
    }
}

/// Highest four-digit year prefix among the release dates, if any.
pub fn latest_year<R: AsRef<MusicRelease>>(releases: &[R]) -> Option<&str> {
    releases
        .iter()
        .filter_map(|release| release.as_ref().release_date.get(..4))
        .filter(|year| year.bytes().all(|b| b.is_ascii_digit()))
        .max()
}

/// Reconciles the stored records of one artist with the releases scraped now.
///
/// Without stored records every fresh release becomes a FOUND record, but
/// only the ones from the latest year present are reported as new. With
/// stored records each record is matched by identity against the scrape:
///
/// | last entry | matched | result                                      |
/// |------------|---------|---------------------------------------------|
/// | LOST       | yes     | FOUND appended, popularity refreshed        |
/// | LOST       | no      | carried unchanged                           |
/// | FOUND      | yes     | carried unchanged                           |
/// | FOUND      | no      | LOST appended, reported as lost             |
///
/// Fresh releases matching no stored record become new FOUND records.
pub fn reconcile(
    old_records: Vec<MusicReleaseRecord>,
    fresh_releases: Vec<EnhancedMusicRelease>,
    now: DateTime<Utc>,
) -> Result<Reconciliation, ReconcileError> {
    if old_records.is_empty() {
        return Ok(bootstrap(fresh_releases, now));
    }

    let mut result = Reconciliation::default();

    let fresh_identities: Vec<String> = fresh_releases.iter().map(release_identity).collect();
    let mut fresh_index: HashMap<String, usize> = HashMap::new();
    for (position, identity) in fresh_identities.iter().enumerate() {
        fresh_index.entry(identity.clone()).or_insert(position);
    }

    let mut known: HashSet<String> = HashSet::new();

    for mut record in old_records {
        let identity = release_identity(&record);
        if !known.insert(identity.clone()) {
            result.dropped_duplicates.push(identity);
            continue;
        }

        let obsolete = record.is_obsolete()?;
        let matching = fresh_index
            .get(&identity)
            .map(|&position| &fresh_releases[position]);

        match (obsolete, matching) {
            (true, Some(fresh)) => {
                record.appearance_log.push(AppearanceLogEntry::found(now));
                record.enhanced.release.artists_popularity = fresh.release.artists_popularity;
                result.merged.push(record);
            }
            (true, None) | (false, Some(_)) => result.merged.push(record),
            (false, None) => {
                record.appearance_log.push(AppearanceLogEntry::lost(now));
                result.lost.push(record.clone());
                result.merged.push(record);
            }
        }
    }

    for (release, identity) in fresh_releases.into_iter().zip(fresh_identities) {
        if !known.insert(identity) {
            continue;
        }
        let record = MusicReleaseRecord::first_seen(release, now);
        result.new.push(record.clone());
        result.merged.push(record);
    }

    Ok(result)
}

fn bootstrap(fresh_releases: Vec<EnhancedMusicRelease>, now: DateTime<Utc>) -> Reconciliation {
    let year = latest_year(&fresh_releases).map(str::to_string);
    let mut result = Reconciliation::default();
    let mut known: HashSet<String> = HashSet::new();

    for release in fresh_releases {
        if !known.insert(release_identity(&release)) {
            continue;
        }
        let record = MusicReleaseRecord::first_seen(release, now);
        let is_recent = year
            .as_deref()
            .is_some_and(|year| record.enhanced.release.release_date.starts_with(year));
        if is_recent {
            result.new.push(record.clone());
        }
        result.merged.push(record);
    }

    result
}
