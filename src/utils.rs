use chrono::NaiveDate;
use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::types::{MusicRelease, MusicReleaseRecord, ReleaseTableRow};

/// Number of hourly artist groups used by [`artist_group`].
pub const ARTIST_GROUPS: u32 = 24;

pub const MAX_FILENAME_BYTES: usize = 255;

/// Makes an arbitrary string safe to use as a file name on common systems.
///
/// Removes characters forbidden on Windows or Unix and control characters,
/// collapses whitespace and dot runs, trims leading and trailing spaces and
/// dots and caps the result at 255 bytes. An empty result becomes `untitled`.
pub fn normalize_filename(filename: &str) -> String {
    let mut normalized = String::with_capacity(filename.len());
    let mut previous: Option<char> = None;

    for c in filename.chars() {
        if c.is_control() || matches!(c, '<' | '>' | ':' | '"' | '/' | '\\' | '|' | '?' | '*') {
            continue;
        }
        let c = if c.is_whitespace() { ' ' } else { c };
        if (c == ' ' || c == '.') && previous == Some(c) {
            continue;
        }
        normalized.push(c);
        previous = Some(c);
    }

    let trimmed = normalized.trim_matches(|c: char| c == ' ' || c == '.');
    if trimmed.is_empty() {
        return "untitled".to_string();
    }

    truncate_bytes(trimmed, MAX_FILENAME_BYTES).to_string()
}

/// Longest prefix of `text` that fits into `max_bytes` without splitting a
/// character.
pub fn truncate_bytes(text: &str, max_bytes: usize) -> &str {
    let mut end = text.len().min(max_bytes);
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    &text[..end]
}

/// Serializes a value as pretty JSON with object keys sorted at every level.
///
/// Going through [`serde_json::Value`] sorts the keys because its map is
/// ordered. Snapshots written this way only change where records change.
pub fn to_stable_json<T: Serialize>(value: &T) -> Result<String, serde_json::Error> {
    let value = serde_json::to_value(value)?;
    let mut json = serde_json::to_string_pretty(&value)?;
    json.push('\n');
    Ok(json)
}

/// Deterministic hourly group of an artist, derived from the SHA-256 of its id.
pub fn artist_group(artist_id: &str, groups: u32) -> u32 {
    let hash = Sha256::digest(artist_id.as_bytes());
    let prefix = u32::from_be_bytes([hash[0], hash[1], hash[2], hash[3]]);
    prefix % groups.max(1)
}

/// Last day a partial release date can refer to: `2022` is read as
/// `2022-12-31`, `2022-02` as `2022-02-31`. Full dates are kept. Other
/// shapes have no bound.
///
/// The bound is only meant for lexicographic comparison with `YYYY-MM-DD`
/// strings, so the day does not have to exist.
pub fn release_date_upper_bound(release_date: &str) -> Option<String> {
    let bound = match release_date.len() {
        4 => format!("{release_date}-12-31"),
        7 => format!("{release_date}-31"),
        10 => release_date.to_string(),
        _ => return None,
    };
    is_date_shaped(&bound).then_some(bound)
}

/// First day a partial release date can refer to: `2022` is read as
/// `2022-01-01`, `2022-02` as `2022-02-01`.
pub fn release_date_lower_bound(release_date: &str) -> Option<String> {
    let bound = match release_date.len() {
        4 => format!("{release_date}-01-01"),
        7 => format!("{release_date}-01"),
        10 => release_date.to_string(),
        _ => return None,
    };
    is_date_shaped(&bound).then_some(bound)
}

fn is_date_shaped(date: &str) -> bool {
    date.len() == 10
        && date.bytes().enumerate().all(|(i, b)| match i {
            4 | 7 => b == b'-',
            _ => b.is_ascii_digit(),
        })
}

/// Whether a release may have come out on or after `since`. Releases whose
/// date cannot be interpreted are kept.
pub fn is_released_since<R: AsRef<MusicRelease>>(release: &R, since: NaiveDate) -> bool {
    let since = since.format("%Y-%m-%d").to_string();
    match release_date_upper_bound(&release.as_ref().release_date) {
        Some(bound) => bound >= since,
        None => true,
    }
}

/// Drops releases that came out before `since`.
pub fn ignore_releases_before<R: AsRef<MusicRelease>>(releases: Vec<R>, since: NaiveDate) -> Vec<R> {
    releases
        .into_iter()
        .filter(|release| is_released_since(release, since))
        .collect()
}

pub fn release_table_row(record: &MusicReleaseRecord) -> ReleaseTableRow {
    let release = &record.enhanced.release;
    ReleaseTableRow {
        date: release.release_date.clone(),
        artists: release.artists.join(", "),
        title: release.title.clone(),
        kind: release.release_type.to_string(),
        tags: record.enhanced.tags.join(", "),
    }
}

pub fn sort_release_table_rows(rows: &mut [ReleaseTableRow]) {
    rows.sort_by(|a, b| b.date.cmp(&a.date).then_with(|| a.artists.cmp(&b.artists)));
}

pub fn parse_date(date: &str) -> Result<NaiveDate, String> {
    let bound = release_date_lower_bound(date)
        .ok_or_else(|| format!("Expected YYYY, YYYY-MM or YYYY-MM-DD, got {date}"))?;
    NaiveDate::parse_from_str(&bound, "%Y-%m-%d").map_err(|e| e.to_string())
}
