use std::path::PathBuf;

use chrono::NaiveDate;
use tabled::Table;

use crate::{
    error, info,
    management::{HistoryManager, found_on_day},
    types::ReleaseTableRow,
    utils, warning,
};

/// Lists releases found on `day` across all stored histories, reading one
/// history at a time.
pub async fn today(data_dir: PathBuf, day: NaiveDate) {
    let history = HistoryManager::new(data_dir);
    let mut snapshots = match history.snapshots().await {
        Ok(snapshots) => snapshots,
        Err(e) => error!("Cannot read release histories: {}", e),
    };

    let mut rows: Vec<ReleaseTableRow> = Vec::new();
    while let Some((path, records)) = snapshots.next().await {
        let records = match records {
            Ok(records) => records,
            Err(e) => {
                warning!("Skipping {}: {}", path.display(), e);
                continue;
            }
        };

        match found_on_day(&records, day) {
            Ok(found) => rows.extend(found.into_iter().map(utils::release_table_row)),
            Err(e) => warning!("Skipping {}: {}", path.display(), e),
        }
    }

    if rows.is_empty() {
        info!("No releases found on {}", day);
        return;
    }

    utils::sort_release_table_rows(&mut rows);
    let count = rows.len();
    println!("{}", Table::new(rows));
    info!("{} releases found on {}", count, day);
}
