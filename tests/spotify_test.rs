use std::collections::HashMap;

use relcast::release::dedupe_releases;
use relcast::spotify::artists::{ArtistMatch, select_artist_match};
use relcast::spotify::releases::{album_to_release, parse_release_type};
use relcast::types::{
    Album, AlbumArtist, Artist, ArtistAlbumsResponse, ArtistSearchResponse, ExternalUrls, Image,
    ReleaseType, SeveralArtistsResponse,
};

// Helper function to create a test album
fn create_test_album(id: &str, name: &str, album_type: &str, release_date: &str) -> Album {
    Album {
        id: id.to_string(),
        name: name.to_string(),
        album_type: album_type.to_string(),
        album_group: Some("album".to_string()),
        release_date: release_date.to_string(),
        release_date_precision: "day".to_string(),
        total_tracks: Some(9),
        artists: vec![
            AlbumArtist {
                id: "a1".to_string(),
                name: "Artist".to_string(),
            },
            AlbumArtist {
                id: "a2".to_string(),
                name: "Guest".to_string(),
            },
        ],
        images: vec![
            Image {
                url: "https://i.scdn.co/image/large".to_string(),
                width: Some(640),
                height: Some(640),
            },
            Image {
                url: "https://i.scdn.co/image/small".to_string(),
                width: Some(64),
                height: Some(64),
            },
        ],
        external_urls: ExternalUrls {
            spotify: Some(format!("https://open.spotify.com/album/{id}")),
        },
    }
}

fn create_test_artist(id: &str, name: &str, popularity: u32) -> Artist {
    Artist {
        id: id.to_string(),
        name: name.to_string(),
        popularity,
    }
}

fn no_popularity() -> HashMap<String, f64> {
    HashMap::new()
}

#[test]
fn test_album_to_release() {
    let popularity = HashMap::from([("a1".to_string(), 41.0), ("a2".to_string(), 63.0)]);
    let release =
        album_to_release(create_test_album("abc", "Title", "album", "2024-03-01"), &popularity).unwrap();

    assert_eq!(release.artists, vec!["Artist", "Guest"]);
    assert_eq!(release.artists_popularity, 63.0);
    assert_eq!(release.image_url.as_deref(), Some("https://i.scdn.co/image/large"));
    assert_eq!(release.release_date, "2024-03-01");
    assert_eq!(release.title, "Title");
    assert_eq!(release.total_tracks, Some(9));
    assert_eq!(release.release_type, ReleaseType::Album);
    assert_eq!(release.url, "https://open.spotify.com/album/abc");
}

#[test]
fn test_album_to_release_without_known_popularity() {
    let popularity = HashMap::from([("someone else".to_string(), 90.0)]);
    let release =
        album_to_release(create_test_album("abc", "Title", "album", "2024-03-01"), &popularity).unwrap();

    assert!(release.artists_popularity.is_nan());
}

#[test]
fn test_duplicate_scrapes_keep_most_popular_artists() {
    let mut first = create_test_album("first", "Title", "album", "2024-03-01");
    first.artists = vec![AlbumArtist {
        id: "small".to_string(),
        name: "Artist".to_string(),
    }];
    let mut second = create_test_album("second", "TITLE", "album", "2024-03-01");
    second.artists = vec![AlbumArtist {
        id: "big".to_string(),
        name: "artist".to_string(),
    }];
    let popularity = HashMap::from([("small".to_string(), 12.0), ("big".to_string(), 70.0)]);

    let scraped: Vec<_> = [first, second]
        .into_iter()
        .filter_map(|album| album_to_release(album, &popularity))
        .collect();
    let releases = dedupe_releases(scraped);

    assert_eq!(releases.len(), 1);
    assert_eq!(releases[0].url, "https://open.spotify.com/album/second");
    assert_eq!(releases[0].artists_popularity, 70.0);
}

#[test]
fn test_album_to_release_skips_compilations_and_unknown_types() {
    assert!(album_to_release(create_test_album("c", "Best of", "compilation", "2024"), &no_popularity()).is_none());
    assert!(album_to_release(create_test_album("p", "Pod", "episode", "2024"), &no_popularity()).is_none());
}

#[test]
fn test_album_to_release_without_url_or_images() {
    let mut album = create_test_album("xyz", "Single", "SINGLE", "2024-03");
    album.external_urls.spotify = None;
    album.images.clear();

    let release = album_to_release(album, &no_popularity()).unwrap();

    assert_eq!(release.release_type, ReleaseType::Single);
    assert_eq!(release.url, "https://open.spotify.com/album/xyz");
    assert_eq!(release.image_url, None);
}

#[test]
fn test_parse_release_type() {
    assert_eq!(parse_release_type("album"), Some(ReleaseType::Album));
    assert_eq!(parse_release_type("Single"), Some(ReleaseType::Single));
    assert_eq!(parse_release_type("compilation"), Some(ReleaseType::Compilation));
    assert_eq!(parse_release_type("appears_on"), None);
}

#[test]
fn test_artist_albums_page_deserializes() {
    let body = r#"{
        "href": "https://api.spotify.com/v1/artists/1/albums",
        "items": [{
            "id": "abc",
            "name": "Title",
            "album_type": "single",
            "album_group": "appears_on",
            "release_date": "2024",
            "release_date_precision": "year",
            "total_tracks": 1,
            "artists": [{"id": "a1", "name": "Artist", "type": "artist"}],
            "external_urls": {"spotify": "https://open.spotify.com/album/abc"}
        }],
        "limit": 50,
        "next": null,
        "offset": 0,
        "total": 1
    }"#;

    let page: ArtistAlbumsResponse = serde_json::from_str(body).unwrap();

    assert!(page.next.is_none());
    assert_eq!(page.items.len(), 1);
    assert!(page.items[0].images.is_empty());
    let release = album_to_release(page.items.into_iter().next().unwrap(), &no_popularity()).unwrap();
    assert_eq!(release.release_type, ReleaseType::Single);
}

#[test]
fn test_select_artist_match_prefers_exact_name() {
    let results = vec![
        create_test_artist("1", "Okean Elzy Tribute", 80),
        create_test_artist("2", "okean elzy", 40),
        create_test_artist("3", "Okean Elzy", 60),
    ];

    assert_eq!(
        select_artist_match("Okean Elzy", &results),
        ArtistMatch::Exact(&results[2])
    );
    assert_eq!(
        select_artist_match("OKEAN ELZY", &results),
        ArtistMatch::Exact(&results[1])
    );
}

#[test]
fn test_select_artist_match_suggests_most_popular() {
    let results = vec![
        create_test_artist("1", "Jamala Cover Band", 20),
        create_test_artist("2", "Jamala & Friends", 55),
        create_test_artist("3", "Jamalah", 55),
    ];

    assert_eq!(
        select_artist_match("Jamala", &results),
        ArtistMatch::Suggestion(&results[1])
    );
    assert_eq!(select_artist_match("Jamala", &[]), ArtistMatch::NotFound);
}

#[test]
fn test_artist_responses_deserialize() {
    let several: SeveralArtistsResponse = serde_json::from_str(
        r#"{"artists": [{"id": "a1", "name": "Artist", "popularity": 57, "type": "artist"}, null]}"#,
    )
    .unwrap();
    assert_eq!(several.artists.len(), 2);
    assert_eq!(several.artists[0].as_ref().unwrap().popularity, 57);
    assert!(several.artists[1].is_none());

    let search: ArtistSearchResponse = serde_json::from_str(
        r#"{"artists": {"href": "", "items": [{"id": "a1", "name": "Artist", "popularity": 3}], "total": 1}}"#,
    )
    .unwrap();
    assert_eq!(search.artists.items[0].name, "Artist");
}
