use chrono::{DateTime, TimeZone, Utc};
use relcast::release::*;
use relcast::types::{
    AppearanceKind, AppearanceLogEntry, EnhancedMusicRelease, MusicRelease, MusicReleaseRecord,
    ReleaseType,
};

// Helper function to create a test release
fn create_test_release(artists: &[&str], title: &str, date: &str, popularity: f64) -> MusicRelease {
    MusicRelease {
        artists: artists.iter().map(|artist| artist.to_string()).collect(),
        artists_popularity: popularity,
        image_url: Some("https://i.scdn.co/image/cover".to_string()),
        release_date: date.to_string(),
        title: title.to_string(),
        total_tracks: Some(10),
        release_type: ReleaseType::Album,
        url: "https://open.spotify.com/album/abc".to_string(),
    }
}

fn create_test_enhanced(title: &str, date: &str, tags: &[&str]) -> EnhancedMusicRelease {
    EnhancedMusicRelease {
        release: create_test_release(&["Artist"], title, date, 4.0),
        tags: tags.iter().map(|tag| tag.to_string()).collect(),
    }
}

fn create_test_record(title: &str, date: &str, log: Vec<AppearanceLogEntry>) -> MusicReleaseRecord {
    MusicReleaseRecord {
        enhanced: create_test_enhanced(title, date, &["rock"]),
        appearance_log: log,
    }
}

fn at(day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, day, 12, 0, 0).unwrap()
}

#[test]
fn test_identity_ignores_cosmetic_differences() {
    let a = create_test_release(&["Artist  One"], "Some Title", "2024-01-01", 1.0);
    let b = create_test_release(&[" artist one "], "SOME   title", "2024-01-01", 5.0);

    assert_eq!(release_identity(&a), release_identity(&a));
    assert_eq!(release_identity(&a), release_identity(&b));
    assert_eq!(release_identity(&a), "artist one|some title|album|2024-01-01");
}

#[test]
fn test_identity_distinguishes_type_date_and_artist_order() {
    let base = create_test_release(&["A", "B"], "T", "2024-01-01", 1.0);

    let mut single = base.clone();
    single.release_type = ReleaseType::Single;
    let mut partial_date = base.clone();
    partial_date.release_date = "2024".to_string();
    let swapped = create_test_release(&["B", "A"], "T", "2024-01-01", 1.0);

    assert_ne!(release_identity(&base), release_identity(&single));
    assert_ne!(release_identity(&base), release_identity(&partial_date));
    assert_ne!(release_identity(&base), release_identity(&swapped));
}

#[test]
fn test_dedupe_keeps_most_popular() {
    let releases = vec![
        create_test_release(&["A"], "First", "2024-01-01", 2.0),
        create_test_release(&["A"], "Other", "2024-01-01", 1.0),
        create_test_release(&["a"], "first", "2024-01-01", 5.0),
    ];

    let deduped = dedupe_releases(releases);

    assert_eq!(deduped.len(), 2);
    assert_eq!(deduped[0].artists_popularity, 5.0);
    assert_eq!(deduped[1].title, "Other");
}

#[test]
fn test_dedupe_treats_nan_as_lowest() {
    let releases = vec![
        create_test_release(&["A"], "T", "2024", f64::NAN),
        create_test_release(&["A"], "T", "2024", 0.0),
        create_test_release(&["A"], "T", "2024", f64::NAN),
    ];

    let deduped = dedupe_releases(releases);

    assert_eq!(deduped.len(), 1);
    assert_eq!(deduped[0].artists_popularity, 0.0);
}

#[test]
fn test_dedupe_empty_and_ties() {
    assert!(dedupe_releases(Vec::<MusicRelease>::new()).is_empty());

    let mut first = create_test_release(&["A"], "T", "2024", 3.0);
    first.url = "https://open.spotify.com/album/first".to_string();
    let second = create_test_release(&["A"], "T", "2024", 3.0);

    let deduped = dedupe_releases(vec![first, second]);
    assert_eq!(deduped.len(), 1);
    assert_eq!(deduped[0].url, "https://open.spotify.com/album/first");
}

#[test]
fn test_dedupe_across_sources() {
    let spotify = vec![create_test_release(&["A"], "T", "2024", 1.0)];
    let mut youtube = create_test_release(&["A"], "T", "2024", 3.0);
    youtube.url = "https://music.youtube.com/browse/xyz".to_string();
    let other = create_test_release(&["A"], "Other", "2024", 1.0);

    let merged = dedupe_across_sources(vec![spotify, vec![youtube, other]]);

    assert_eq!(merged.len(), 2);
    assert_eq!(merged[0].url, "https://music.youtube.com/browse/xyz");
    assert_eq!(merged[1].title, "Other");
}

#[test]
fn test_reconcile_bootstrap_reports_latest_year_only() {
    let fresh: Vec<EnhancedMusicRelease> = ["2021", "2022-01", "2022-02", "2022-02-23", "2022-02-24", "2023"]
        .iter()
        .enumerate()
        .map(|(i, date)| create_test_enhanced(&format!("Release {i}"), date, &[]))
        .collect();

    let result = reconcile(Vec::new(), fresh, at(1)).unwrap();

    assert_eq!(result.new.len(), 1);
    assert_eq!(result.new[0].enhanced.release.release_date, "2023");
    assert_eq!(result.merged.len(), 6);
    assert!(result.lost.is_empty());
    for record in &result.merged {
        assert_eq!(record.appearance_log, vec![AppearanceLogEntry::found(at(1))]);
    }
}

#[test]
fn test_reconcile_all_lost() {
    let old = vec![
        create_test_record("One", "2020", vec![AppearanceLogEntry::found(at(1))]),
        create_test_record("Two", "2021", vec![AppearanceLogEntry::found(at(1))]),
    ];

    let result = reconcile(old, Vec::new(), at(2)).unwrap();

    assert_eq!(result.lost.len(), 2);
    assert_eq!(result.merged.len(), 2);
    assert!(result.new.is_empty());
    for record in result.lost.iter().chain(&result.merged) {
        assert_eq!(record.appearance_log.len(), 2);
        assert_eq!(record.appearance_log[1], AppearanceLogEntry::lost(at(2)));
    }
}

#[test]
fn test_reconcile_new_release() {
    let old = vec![create_test_record("Old", "2020", vec![AppearanceLogEntry::found(at(1))])];
    let fresh = vec![
        create_test_enhanced("Old", "2020", &["rock"]),
        create_test_enhanced("Fresh", "2024-03-02", &["pop"]),
    ];

    let result = reconcile(old, fresh, at(2)).unwrap();

    assert_eq!(result.new.len(), 1);
    assert_eq!(result.new[0].enhanced.release.title, "Fresh");
    assert_eq!(result.new[0].appearance_log, vec![AppearanceLogEntry::found(at(2))]);
    assert!(result.lost.is_empty());
    assert_eq!(result.merged.len(), 2);

    let carried = &result.merged[0];
    assert_eq!(carried.enhanced.release.title, "Old");
    assert_eq!(carried.appearance_log.len(), 1);
}

#[test]
fn test_reconcile_merged_counts_distinct_identities() {
    let old = vec![
        create_test_record("A", "2020", vec![AppearanceLogEntry::found(at(1))]),
        create_test_record("B", "2020", vec![AppearanceLogEntry::found(at(1))]),
        create_test_record("C", "2020", vec![
            AppearanceLogEntry::found(at(1)),
            AppearanceLogEntry::lost(at(2)),
        ]),
    ];
    let fresh = vec![
        create_test_enhanced("B", "2020", &[]),
        create_test_enhanced("D", "2024", &[]),
    ];

    let result = reconcile(old, fresh, at(3)).unwrap();

    // A, B, C and D
    assert_eq!(result.merged.len(), 4);
    for record in result.new.iter().chain(&result.lost) {
        let identity = release_identity(record);
        assert!(result.merged.iter().any(|merged| release_identity(merged) == identity));
    }
}

#[test]
fn test_reconcile_refound_release() {
    let mut old_record = create_test_record("Back", "2020", vec![
        AppearanceLogEntry::found(at(1)),
        AppearanceLogEntry::lost(at(2)),
    ]);
    old_record.enhanced.release.artists_popularity = 1.0;
    let mut fresh = create_test_enhanced("Back", "2020", &["jazz"]);
    fresh.release.artists_popularity = 6.0;

    let result = reconcile(vec![old_record], vec![fresh], at(3)).unwrap();

    assert!(result.new.is_empty());
    assert!(result.lost.is_empty());
    let record = &result.merged[0];
    assert_eq!(record.appearance_log.len(), 3);
    assert_eq!(record.appearance_log[2].kind, AppearanceKind::Found);
    assert_eq!(record.enhanced.release.artists_popularity, 6.0);
    assert_eq!(record.enhanced.tags, vec!["rock".to_string()]);
}

#[test]
fn test_reconcile_carries_lost_release() {
    let old = vec![create_test_record("Gone", "2020", vec![
        AppearanceLogEntry::found(at(1)),
        AppearanceLogEntry::lost(at(2)),
    ])];

    let result = reconcile(old, vec![create_test_enhanced("Other", "2024", &[])], at(3)).unwrap();

    let gone = &result.merged[0];
    assert_eq!(gone.enhanced.release.title, "Gone");
    assert_eq!(gone.appearance_log.len(), 2);
    assert!(result.lost.is_empty());
}

#[test]
fn test_reconcile_drops_duplicate_stored_records() {
    let old = vec![
        create_test_record("Same", "2020", vec![AppearanceLogEntry::found(at(1))]),
        create_test_record("Same", "2020", vec![AppearanceLogEntry::found(at(2))]),
    ];

    let result = reconcile(old, vec![create_test_enhanced("Same", "2020", &[])], at(3)).unwrap();

    assert_eq!(result.merged.len(), 1);
    assert_eq!(result.merged[0].appearance_log[0].time, at(1));
    assert_eq!(result.dropped_duplicates, vec!["artist|same|album|2020".to_string()]);
}

#[test]
fn test_reconcile_rejects_empty_log() {
    let old = vec![create_test_record("Broken", "2020", Vec::new())];

    let result = reconcile(old, Vec::new(), at(1));

    assert_eq!(
        result.unwrap_err(),
        ReconcileError::EmptyAppearanceLog {
            identity: "artist|broken|album|2020".to_string()
        }
    );
}

#[test]
fn test_latest_year() {
    let releases = vec![
        create_test_release(&["A"], "T", "2021-05-01", 1.0),
        create_test_release(&["A"], "T", "2023", 1.0),
        create_test_release(&["A"], "T", "unknown", 1.0),
    ];
    assert_eq!(latest_year(&releases), Some("2023"));
    assert_eq!(latest_year(&Vec::<MusicRelease>::new()), None);
}

#[test]
fn test_compose_post() {
    let release = EnhancedMusicRelease {
        release: create_test_release(&["Артист", "Гість", "Третій"], "Назва", "2024-03-01", 4.0),
        tags: vec!["post-rock".to_string(), "indie pop".to_string()],
    };

    let post = compose_post(&release, Locale::Ukrainian).unwrap();

    assert_eq!(
        post.text,
        "Проблиск 🎤 Артист, Гість і Третій\n💿 Назва (альбом, 2024-03-01)\n\n#post_rock #indie_pop"
    );
    assert_eq!(post.image_url.as_deref(), Some("https://i.scdn.co/image/cover"));
    assert_eq!(post.links.len(), 1);
    assert_eq!(post.links[0].title, "SPOTIFY");
    assert_eq!(post.links[0].url, "https://open.spotify.com/album/abc");
}

#[test]
fn test_compose_post_without_tags_in_english() {
    let mut release = create_test_enhanced("Title", "2024", &[]);
    release.release.release_type = ReleaseType::Single;

    let post = compose_post(&release, Locale::English).unwrap();

    assert_eq!(post.text, "Glimpse 🎤 Artist\n💿 Title (single, 2024)");
}

#[test]
fn test_compose_post_popularity_prefix() {
    let mut release = create_test_enhanced("Title", "2024", &[]);

    release.release.artists_popularity = 60.0;
    let post = compose_post(&release, Locale::Ukrainian).unwrap();
    assert!(post.text.starts_with("Легенда 🎤 Artist\n"));

    release.release.artists_popularity = 0.0;
    let post = compose_post(&release, Locale::English).unwrap();
    assert!(post.text.starts_with("Mystery 🎤 Artist\n"));

    release.release.artists_popularity = f64::NAN;
    let post = compose_post(&release, Locale::English).unwrap();
    assert_eq!(post.text, "🎤 Artist\n💿 Title (album, 2024)");
}

#[test]
fn test_compose_post_errors() {
    let mut no_artists = create_test_enhanced("Title", "2024", &[]);
    no_artists.release.artists.clear();
    assert_eq!(
        compose_post(&no_artists, Locale::Ukrainian).unwrap_err(),
        ComposeError::NoArtists("Title".to_string())
    );

    let mut unknown = create_test_enhanced("Title", "2024", &[]);
    unknown.release.url = "https://example.com/album".to_string();
    assert_eq!(
        compose_post(&unknown, Locale::Ukrainian).unwrap_err(),
        ComposeError::UnknownSource("https://example.com/album".to_string())
    );
}

#[test]
fn test_source_title() {
    assert_eq!(source_title("https://open.spotify.com/album/1"), Some("SPOTIFY"));
    assert_eq!(source_title("https://music.youtube.com/browse/1"), Some("YOUTUBE MUSIC"));
    assert_eq!(source_title("https://youtube.com/watch?v=1"), None);
}

#[test]
fn test_join_artists_and_hashtags() {
    assert_eq!(
        Locale::Ukrainian.join_artists(&["A", "B", "C"]),
        Some("A, B і C".to_string())
    );
    assert_eq!(Locale::English.join_artists(&["A", "B"]), Some("A & B".to_string()));
    assert_eq!(Locale::Ukrainian.join_artists::<&str>(&[]), None);

    assert_eq!(hashtagify("post-rock"), Some("#post_rock".to_string()));
    assert_eq!(hashtagify("Hip  Hop"), Some("#hip_hop".to_string()));
    assert_eq!(hashtagify("!!!"), None);
}

#[test]
fn test_popularity_labels() {
    assert_eq!(Locale::English.popularity_label(60.0), "Legend");
    assert_eq!(Locale::English.popularity_label(4.0), "Glimpse");
    assert_eq!(Locale::English.popularity_label(0.5), "Mystery");
    assert_eq!(Locale::English.popularity_label(f64::NAN), "");
}
