use relcast::social::{Facet, FacetFeature, bluesky, detect_facets, telegram};
use relcast::types::{Post, PostLink};

// Helper function to create a test post
fn create_test_post(text: &str, links: &[(&str, &str)]) -> Post {
    Post {
        text: text.to_string(),
        image_url: None,
        links: links
            .iter()
            .map(|(title, url)| PostLink {
                title: title.to_string(),
                url: url.to_string(),
            })
            .collect(),
    }
}

fn facet_text<'a>(text: &'a str, facet: &Facet) -> &'a str {
    &text[facet.index.byte_start..facet.index.byte_end]
}

#[test]
fn test_bluesky_render_appends_urls() {
    let post = create_test_post(
        "🎤 Artist\n💿 Title (album, 2024)",
        &[("SPOTIFY", "https://open.spotify.com/album/abc")],
    );

    assert_eq!(
        bluesky::render(&post),
        "🎤 Artist\n💿 Title (album, 2024)\n\nhttps://open.spotify.com/album/abc"
    );
    assert_eq!(bluesky::render(&create_test_post("plain", &[])), "plain");
}

#[test]
fn test_telegram_render_appends_titled_links() {
    let post = create_test_post(
        "text",
        &[
            ("SPOTIFY", "https://open.spotify.com/album/abc"),
            ("YOUTUBE MUSIC", "https://music.youtube.com/browse/xyz"),
        ],
    );

    assert_eq!(
        telegram::render(&post),
        "text\nSPOTIFY: https://open.spotify.com/album/abc\nYOUTUBE MUSIC: https://music.youtube.com/browse/xyz"
    );
}

#[test]
fn test_detect_facets_uses_byte_offsets() {
    let text = "🎤 Артист\n\n#інді_поп #rock\n\nhttps://open.spotify.com/album/abc";

    let facets = detect_facets(text);

    assert_eq!(facets.len(), 3);
    assert_eq!(facet_text(text, &facets[0]), "#інді_поп");
    assert_eq!(
        facets[0].features,
        vec![FacetFeature::Tag {
            tag: "інді_поп".to_string()
        }]
    );
    assert_eq!(facet_text(text, &facets[1]), "#rock");
    assert_eq!(facet_text(text, &facets[2]), "https://open.spotify.com/album/abc");
    assert_eq!(
        facets[2].features,
        vec![FacetFeature::Link {
            uri: "https://open.spotify.com/album/abc".to_string()
        }]
    );
}

#[test]
fn test_detect_facets_trims_trailing_punctuation() {
    let text = "see https://example.com/page. #tag, and #123";

    let facets = detect_facets(text);

    assert_eq!(facets.len(), 2);
    assert_eq!(facet_text(text, &facets[0]), "https://example.com/page");
    assert_eq!(facet_text(text, &facets[1]), "#tag");
}

#[test]
fn test_facet_serialization() {
    let facets = detect_facets("#rock https://a.b");
    let value = serde_json::to_value(&facets).unwrap();

    assert_eq!(value[0]["index"]["byteStart"], 0);
    assert_eq!(value[0]["index"]["byteEnd"], 5);
    assert_eq!(value[0]["features"][0]["$type"], "app.bsky.richtext.facet#tag");
    assert_eq!(value[0]["features"][0]["tag"], "rock");
    assert_eq!(value[1]["features"][0]["$type"], "app.bsky.richtext.facet#link");
    assert_eq!(value[1]["features"][0]["uri"], "https://a.b");
}

#[test]
fn test_telegram_counts_utf16_units() {
    assert_eq!(telegram::message_length("привіт"), 6);
    assert_eq!(telegram::message_length("👍🏽"), 4);
    assert_eq!(telegram::message_length("🇺🇦"), 4);
}

#[test]
fn test_telegram_caption_fits_in_utf16_units() {
    assert!(telegram::fits_caption(&"a".repeat(telegram::MAX_CAPTION_LENGTH)));
    assert!(!telegram::fits_caption(&"a".repeat(telegram::MAX_CAPTION_LENGTH + 1)));

    // 300 graphemes, 1200 code units
    assert!(!telegram::fits_caption(&"👍🏽".repeat(300)));
}

#[test]
fn test_telegram_messages_split_by_utf16_units() {
    let text = "👍🏽 ".repeat(1500);

    let parts = relcast::text::segment_by(
        &text,
        telegram::MAX_MESSAGE_LENGTH,
        telegram::message_length,
    );

    assert!(parts.len() > 1);
    assert!(
        parts
            .iter()
            .all(|part| telegram::message_length(part) <= telegram::MAX_MESSAGE_LENGTH)
    );
    let emoji: usize = parts.iter().map(|part| part.matches("👍🏽").count()).sum();
    assert_eq!(emoji, 1500);
}
