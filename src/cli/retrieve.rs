use std::{path::PathBuf, time::Duration};

use chrono::{DateTime, NaiveDate, Timelike, Utc};
use indicatif::{ProgressBar, ProgressStyle};

use crate::{
    error, info,
    lastfm::LastfmClient,
    management::{ArtistListManager, HistoryError, HistoryManager},
    release::{Locale, compose_post, dedupe_releases, reconcile, release_identity},
    social::{BlueskyClient, TelegramClient},
    spotify::SpotifyClient,
    success,
    types::{MusicReleaseRecord, Post},
    utils, warning,
};

/// Which artists of the list a run processes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtistSelection {
    All,
    Group(u32),
    CurrentHour,
}

impl ArtistSelection {
    /// Group to process at `now`, `None` for every artist.
    pub fn group(&self, now: DateTime<Utc>) -> Option<u32> {
        match self {
            ArtistSelection::All => None,
            ArtistSelection::Group(group) => Some(group % utils::ARTIST_GROUPS),
            ArtistSelection::CurrentHour => Some(now.hour() % utils::ARTIST_GROUPS),
        }
    }
}

#[derive(Debug, Clone)]
pub struct RetrieveOptions {
    pub artists_file: PathBuf,
    pub data_dir: PathBuf,
    pub selection: ArtistSelection,
    pub since: Option<NaiveDate>,
    pub locale: Locale,
    pub dry_run: bool,
    pub no_post: bool,
}

/// Snapshot of one artist waiting to be written after posting.
struct PendingSnapshot {
    name: String,
    id: String,
    records: Vec<MusicReleaseRecord>,
}

/// Keeps the `(name, id)` pairs whose id falls into `group`.
pub fn select_artists(artists: Vec<(String, String)>, group: Option<u32>) -> Vec<(String, String)> {
    match group {
        Some(group) => artists
            .into_iter()
            .filter(|(_, id)| utils::artist_group(id, utils::ARTIST_GROUPS) == group)
            .collect(),
        None => artists,
    }
}

pub async fn retrieve(options: RetrieveOptions) {
    let artist_list = match ArtistListManager::load(&options.artists_file).await {
        Ok(manager) => manager,
        Err(e) => error!("Cannot load artist list: {}", e),
    };

    let mut spotify = match SpotifyClient::from_env() {
        Ok(client) => client,
        Err(e) => error!("Cannot configure Spotify: {}", e),
    };

    let mut lastfm = match LastfmClient::from_env().await {
        Ok(client) => client,
        Err(e) => error!("Cannot configure Last.fm: {}", e),
    };

    let history = HistoryManager::new(&options.data_dir);
    let now = Utc::now();
    let group = options.selection.group(now);
    let targets = select_artists(artist_list.spotify_artists(), group);

    match group {
        Some(group) => info!(
            "Processing {} of {} artists (group {}/{})",
            targets.len(),
            artist_list.count(),
            group,
            utils::ARTIST_GROUPS
        ),
        None => info!("Processing all {} artists", targets.len()),
    }

    let pb = ProgressBar::new_spinner();
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_style(
        ProgressStyle::with_template("{spinner:.blue} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"),
    );

    let artists_total = targets.len();
    let mut announcements: Vec<MusicReleaseRecord> = Vec::new();
    let mut pending: Vec<PendingSnapshot> = Vec::new();

    for (index, (name, id)) in targets.into_iter().enumerate() {
        pb.set_message(format!(
            "Retrieving releases of {name} ({count}/{total})",
            name = name,
            count = index + 1,
            total = artists_total
        ));

        let old_records = match history.load(&name, &id).await {
            Ok(records) => records,
            Err(HistoryError::NotFound(_)) => Vec::new(),
            Err(e @ HistoryError::Parse { .. }) => {
                pb.suspend(|| warning!("{}. Starting a new history.", e));
                Vec::new()
            }
            Err(e) => {
                pb.suspend(|| warning!("Skipping {}: {}", name, e));
                continue;
            }
        };
        let known_artist = !old_records.is_empty();

        let releases = match spotify.get_artist_releases(&id).await {
            Ok(releases) => dedupe_releases(releases),
            Err(e) => {
                pb.suspend(|| warning!("Cannot fetch releases of {}: {}", name, e));
                continue;
            }
        };

        pb.set_message(format!(
            "Enriching {releases} releases of {name} ({count}/{total})",
            releases = releases.len(),
            name = name,
            count = index + 1,
            total = artists_total
        ));
        let enhanced = lastfm.enhance_all(releases).await;

        let reconciliation = match reconcile(old_records, enhanced, now) {
            Ok(reconciliation) => reconciliation,
            Err(e) => {
                pb.suspend(|| warning!("Cannot reconcile releases of {}: {}", name, e));
                continue;
            }
        };

        pb.suspend(|| {
            for identity in &reconciliation.dropped_duplicates {
                warning!("Dropped duplicate stored release: {}", identity);
            }
            for record in &reconciliation.new {
                info!("New release: {}", release_identity(record));
            }
            for record in &reconciliation.lost {
                warning!("Lost release: {}", release_identity(record));
            }
        });

        // A first ingestion announces nothing; the artist itself is new.
        if known_artist {
            announcements.extend(reconciliation.new);
        }
        pending.push(PendingSnapshot {
            name,
            id,
            records: reconciliation.merged,
        });
    }

    pb.finish_and_clear();

    if let Some(since) = options.since {
        announcements = utils::ignore_releases_before(announcements, since);
    }
    info!("Found {} new releases", announcements.len());

    let posts = compose_posts(&announcements, options.locale);
    if options.dry_run || options.no_post {
        for post in &posts {
            info!("Not posted:\n{}", post.text);
        }
    } else {
        publish(&posts, options.locale).await;
    }

    if options.dry_run {
        success!("Dry run finished, {} histories left untouched", pending.len());
        return;
    }

    let mut persisted = 0;
    for snapshot in &pending {
        match history
            .persist(&snapshot.name, &snapshot.id, &snapshot.records)
            .await
        {
            Ok(_) => persisted += 1,
            Err(e) => warning!("Cannot save releases of {}: {}", snapshot.name, e),
        }
    }
    success!(
        "Saved {} of {} release histories to {}",
        persisted,
        pending.len(),
        history.folder().display()
    );
}

/// Turns records into posts, skipping the ones that cannot be announced.
pub fn compose_posts(records: &[MusicReleaseRecord], locale: Locale) -> Vec<Post> {
    records
        .iter()
        .filter_map(|record| match compose_post(&record.enhanced, locale) {
            Ok(post) => Some(post),
            Err(e) => {
                warning!("Cannot announce {}: {}", release_identity(record), e);
                None
            }
        })
        .collect()
}

async fn publish(posts: &[Post], locale: Locale) {
    if posts.is_empty() {
        return;
    }

    match BlueskyClient::from_env() {
        Ok(mut bluesky) => match bluesky.publish_posts(posts, locale.cover_alt_text()).await {
            Ok(count) => success!("Posted {} of {} releases to Bluesky", count, posts.len()),
            Err(e) => warning!("Posting to Bluesky failed: {}", e),
        },
        Err(e) => warning!("Skipping Bluesky: {}", e),
    }

    match TelegramClient::from_env() {
        Ok(telegram) => match telegram.publish_posts(posts).await {
            Ok(count) => success!("Posted {} of {} releases to Telegram", count, posts.len()),
            Err(e) => warning!("Posting to Telegram failed: {}", e),
        },
        Err(e) => warning!("Skipping Telegram: {}", e),
    }
}
