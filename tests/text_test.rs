use relcast::text::*;

fn assert_within_limit(chunks: &[String], limit: usize) {
    for chunk in chunks {
        assert!(
            text_length(chunk) <= limit,
            "chunk of {} characters exceeds {}: {:?}",
            text_length(chunk),
            limit,
            chunk
        );
        assert!(!chunk.is_empty());
        assert_eq!(chunk.trim(), chunk);
    }
}

#[test]
fn test_segment_short_text() {
    assert_eq!(segment("short text", 300), vec!["short text".to_string()]);
    assert_eq!(segment("  padded  ", 300), vec!["padded".to_string()]);
}

#[test]
fn test_segment_empty_text() {
    assert!(segment("", 300).is_empty());
    assert!(segment(" \n\n ", 300).is_empty());
}

#[test]
fn test_segment_without_break_points() {
    let text = "x".repeat(650);
    let chunks = segment(&text, 300);

    assert_eq!(chunks.len(), 3);
    assert_eq!(text_length(&chunks[0]), 300);
    assert_eq!(text_length(&chunks[1]), 300);
    assert_eq!(text_length(&chunks[2]), 50);
    assert_eq!(chunks.concat(), text);
}

#[test]
fn test_segment_cuts_at_spaces() {
    let text = "alpha beta gamma delta epsilon zeta eta theta";
    let chunks = segment(text, 20);

    assert_eq!(
        chunks,
        vec![
            "alpha beta gamma".to_string(),
            "delta epsilon zeta".to_string(),
            "eta theta".to_string(),
        ]
    );
    assert_within_limit(&chunks, 20);
    assert_eq!(chunks.join(" "), text);
}

#[test]
fn test_segment_prefers_paragraph_break() {
    let first = "word ".repeat(50).trim_end().to_string();
    let second = "next ".repeat(20);
    let text = format!("{first}\n\n{second}");

    let chunks = segment(&text, 300);

    assert_eq!(chunks.len(), 2);
    assert_eq!(chunks[0], first);
    assert_eq!(chunks[1], second.trim());
}

#[test]
fn test_segment_prefers_sentence_end_over_space() {
    let text = "One sentence here. Another one follows";
    let chunks = segment(text, 30);

    assert_eq!(chunks[0], "One sentence here.");
    assert_within_limit(&chunks, 30);
}

#[test]
fn test_segment_keeps_emoji_whole() {
    let text = "👍🏽".repeat(5);
    let chunks = segment(&text, 2);

    assert_eq!(chunks, vec!["👍🏽👍🏽", "👍🏽👍🏽", "👍🏽"]);
    assert_eq!(chunks.concat(), text);
}

#[test]
fn test_segment_keeps_combining_marks() {
    let text = "йо".repeat(200);
    let chunks = segment(&text, 150);

    assert_within_limit(&chunks, 150);
    assert_eq!(chunks.concat(), text);
}

#[test]
fn test_segment_is_idempotent() {
    let text = "🎤 Артист і Гість\n💿 Назва релізу (альбом, 2024-03-01)\n\n".repeat(10);
    let chunks = segment(&text, 300);
    assert!(chunks.len() > 1);
    assert_within_limit(&chunks, 300);

    for chunk in &chunks {
        assert_eq!(segment(chunk, 300), vec![chunk.clone()]);
    }
}

#[test]
fn test_segment_single_character_limit() {
    assert_eq!(segment("ab c", 1), vec!["a", "b", "c"]);
}

#[test]
fn test_find_break_point_priority() {
    // paragraph break wins over the later space
    assert_eq!(find_break_point("one\n\ntwo three"), Some(5));
    // sentence end wins over a later comma
    assert_eq!(find_break_point("one. two, three"), Some(5));
    assert_eq!(find_break_point("nobreak"), None);
}

#[test]
fn test_find_break_point_ignores_leading_and_distant_breaks() {
    assert_eq!(find_break_point(" leading"), None);

    let buffer = format!("{} {}", "a".repeat(10), "b".repeat(150));
    assert_eq!(find_break_point(&buffer), None);
}

#[test]
fn test_text_length_counts_graphemes() {
    assert_eq!(text_length("hello"), 5);
    assert_eq!(text_length("привіт"), 6);
    assert_eq!(text_length("👨‍👩‍👧"), 1);
    assert_eq!(text_length("🇺🇦"), 1);
}

#[test]
fn test_segment_by_custom_measure() {
    let text = "слово ".repeat(100);

    let chunks = segment_by(&text, 50, str::len);

    assert!(chunks.iter().all(|chunk| chunk.len() <= 50));
    assert_eq!(chunks.join(" "), text.trim());
}

#[test]
fn test_segment_by_graphemes_matches_segment() {
    let text = "Перше речення. Друге речення! Третє? ".repeat(30);

    assert_eq!(segment_by(&text, 120, text_length), segment(&text, 120));
}
