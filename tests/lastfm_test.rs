use std::collections::HashSet;

use relcast::lastfm::*;
use relcast::types::{ArtistInfoResponse, TopTag, TopTagsResponse};

// Helper function to create a test tag
fn create_test_tag(name: &str, count: f64) -> TopTag {
    TopTag {
        name: name.to_string(),
        count,
    }
}

fn weighted(name: &str, weight: f64) -> WeightedTag {
    WeightedTag {
        name: name.to_string(),
        weight,
    }
}

#[test]
fn test_popularity_from_listeners() {
    assert_eq!(popularity_from_listeners(0), 0.0);
    assert_eq!(popularity_from_listeners(1), 0.0);
    assert_eq!(popularity_from_listeners(1_000), 3.0);
    assert_eq!(popularity_from_listeners(1_000_000), 6.0);
    assert_eq!(popularity_from_listeners(999_999_999), 8.0);
}

#[test]
fn test_normalize_tags_scales_to_heaviest() {
    let tags = vec![create_test_tag("rock", 40.0), create_test_tag("indie", 20.0)];

    let normalized = normalize_tags(tags, None);

    assert_eq!(normalized, vec![weighted("rock", 100.0), weighted("indie", 50.0)]);
}

#[test]
fn test_normalize_tags_applies_whitelist_before_scaling() {
    let whitelist = parse_whitelist("Indie\n\n  post-rock \n");
    let tags = vec![
        create_test_tag("seen live", 100.0),
        create_test_tag("indie", 50.0),
        create_test_tag("Post-Rock", 25.0),
    ];

    let normalized = normalize_tags(tags, Some(&whitelist));

    assert_eq!(normalized, vec![weighted("indie", 100.0), weighted("Post-Rock", 50.0)]);
}

#[test]
fn test_normalize_tags_without_weights() {
    assert!(normalize_tags(Vec::new(), None).is_empty());
    assert!(normalize_tags(vec![create_test_tag("zero", 0.0)], None).is_empty());
}

#[test]
fn test_merge_tags_limits_and_filters() {
    let first: Vec<WeightedTag> = (0..6).map(|i| weighted(&format!("a{i}"), 100.0 - i as f64)).collect();
    let second: Vec<WeightedTag> = (0..6).map(|i| weighted(&format!("b{i}"), 99.5 - i as f64 * 20.0)).collect();

    let merged = merge_tags(vec![first, second]);

    assert!(merged.len() <= MAX_TAGS);
    assert_eq!(merged, vec!["a0", "b0", "a1", "a2", "a3", "a4", "a5", "b1"]);
}

#[test]
fn test_merge_tags_drops_light_and_duplicate_tags() {
    let merged = merge_tags(vec![
        vec![weighted("rock", 100.0), weighted("pop", 30.0)],
        vec![weighted("rock", 60.0), weighted("folk", 50.0)],
    ]);

    assert_eq!(merged, vec!["rock", "folk"]);
}

#[test]
fn test_parse_whitelist() {
    let whitelist = parse_whitelist("Rock\r\nhip hop\n\n");
    let expected: HashSet<String> = ["rock", "hip hop"].iter().map(|s| s.to_string()).collect();
    assert_eq!(whitelist, expected);
}

#[test]
fn test_parse_response_success() {
    let body = r#"{"artist": {"name": "Артист", "stats": {"listeners": "12345", "playcount": "1"}}}"#;
    let info: ArtistInfoResponse = parse_response(body).unwrap();

    assert_eq!(info.artist.name, "Артист");
    assert_eq!(info.artist.stats.listeners, "12345");

    let body = r#"{"toptags": {"tag": [{"count": 100, "name": "rock", "url": "x"}], "@attr": {}}}"#;
    let tags: TopTagsResponse = parse_response(body).unwrap();
    assert_eq!(tags.toptags.tag, vec![create_test_tag("rock", 100.0)]);
}

#[test]
fn test_parse_response_api_error() {
    let body = r#"{"error": 6, "message": "The artist you supplied could not be found"}"#;

    match parse_response::<ArtistInfoResponse>(body) {
        Err(LastfmError::Api { code, message }) => {
            assert_eq!(code, ARTIST_NOT_FOUND);
            assert!(message.contains("could not be found"));
        }
        other => panic!("expected an API error, got {other:?}"),
    }
}

#[test]
fn test_parse_response_garbage() {
    assert!(matches!(
        parse_response::<ArtistInfoResponse>("<html>"),
        Err(LastfmError::Decode(_))
    ));
}
