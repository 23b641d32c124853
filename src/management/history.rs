use std::{
    io::ErrorKind,
    path::{Path, PathBuf},
};

use chrono::NaiveDate;
use thiserror::Error;

use crate::{
    release::ReconcileError,
    types::{AppearanceKind, MusicReleaseRecord},
    utils,
};

#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("no release history at {0}")]
    NotFound(PathBuf),
    #[error("cannot parse release history {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("cannot access release history {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

const EXTENSION: &str = ".json";

/// Stores the release history of each artist as one JSON document inside a
/// folder. Documents are written with sorted keys so re-serializing an
/// unchanged history produces an identical file.
pub struct HistoryManager {
    folder: PathBuf,
}

impl HistoryManager {
    pub fn new(folder: impl Into<PathBuf>) -> Self {
        Self {
            folder: folder.into(),
        }
    }

    pub fn folder(&self) -> &Path {
        &self.folder
    }

    /// File of an artist: `<name>-<id>.json`, made filesystem safe. The id
    /// keeps artists sharing a name apart. Overlong names are shortened
    /// before the extension so it always survives.
    pub fn path_for(&self, artist_name: &str, artist_id: &str) -> PathBuf {
        let stem = utils::normalize_filename(&format!("{artist_name}-{artist_id}"));
        let stem = utils::truncate_bytes(&stem, utils::MAX_FILENAME_BYTES - EXTENSION.len())
            .trim_end_matches(['.', ' ']);
        self.folder.join(format!("{stem}{EXTENSION}"))
    }

    pub async fn load(
        &self,
        artist_name: &str,
        artist_id: &str,
    ) -> Result<Vec<MusicReleaseRecord>, HistoryError> {
        Self::load_file(&self.path_for(artist_name, artist_id)).await
    }

    pub async fn load_file(path: &Path) -> Result<Vec<MusicReleaseRecord>, HistoryError> {
        let content = async_fs::read_to_string(path).await.map_err(|source| {
            if source.kind() == ErrorKind::NotFound {
                HistoryError::NotFound(path.to_path_buf())
            } else {
                HistoryError::Io {
                    path: path.to_path_buf(),
                    source,
                }
            }
        })?;

        serde_json::from_str(&content).map_err(|source| HistoryError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Writes the snapshot through a temporary file so an interrupted run
    /// never leaves a truncated history behind.
    pub async fn persist(
        &self,
        artist_name: &str,
        artist_id: &str,
        records: &[MusicReleaseRecord],
    ) -> Result<(), HistoryError> {
        let path = self.path_for(artist_name, artist_id);
        let io_error = |source| HistoryError::Io {
            path: path.clone(),
            source,
        };

        async_fs::create_dir_all(&self.folder)
            .await
            .map_err(io_error)?;

        let json = utils::to_stable_json(&records).map_err(|source| HistoryError::Parse {
            path: path.clone(),
            source,
        })?;

        let temporary = path.with_extension("tmp");
        async_fs::write(&temporary, json).await.map_err(io_error)?;
        async_fs::rename(&temporary, &path)
            .await
            .map_err(io_error)
    }

    /// History files in the folder, sorted by name.
    pub async fn files(&self) -> Result<Vec<PathBuf>, HistoryError> {
        let io_error = |source| HistoryError::Io {
            path: self.folder.clone(),
            source,
        };

        let mut entries = match tokio::fs::read_dir(&self.folder).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(io_error(e)),
        };

        let mut files = Vec::new();
        while let Some(entry) = entries.next_entry().await.map_err(io_error)? {
            let path = entry.path();
            if path.extension().is_some_and(|extension| extension == "json") {
                files.push(path);
            }
        }
        files.sort();
        Ok(files)
    }

    /// Single-pass sequence over the stored histories, reading one file per
    /// step. Call again to start over.
    pub async fn snapshots(&self) -> Result<HistorySnapshots, HistoryError> {
        Ok(HistorySnapshots {
            files: self.files().await?.into_iter(),
        })
    }
}

pub struct HistorySnapshots {
    files: std::vec::IntoIter<PathBuf>,
}

impl HistorySnapshots {
    pub async fn next(
        &mut self,
    ) -> Option<(PathBuf, Result<Vec<MusicReleaseRecord>, HistoryError>)> {
        let path = self.files.next()?;
        let records = HistoryManager::load_file(&path).await;
        Some((path, records))
    }
}

/// Records of one artist history that were (re)found on `day` after the
/// artist's first ingestion.
///
/// Records whose FOUND time equals the earliest first appearance in the
/// history came in with the artist itself and are skipped.
pub fn found_on_day(
    records: &[MusicReleaseRecord],
    day: NaiveDate,
) -> Result<Vec<&MusicReleaseRecord>, ReconcileError> {
    let mut earliest = None;
    for record in records {
        let time = record.first_appearance()?.time;
        if earliest.is_none_or(|earliest| time < earliest) {
            earliest = Some(time);
        }
    }

    let mut found = Vec::new();
    for record in records {
        let last = record.last_appearance()?;
        if last.kind == AppearanceKind::Found
            && Some(last.time) != earliest
            && last.time.date_naive() == day
        {
            found.push(record);
        }
    }
    Ok(found)
}
