use unicode_segmentation::UnicodeSegmentation;

use super::{find_break_point, text_length};

/// Splits `text` into trimmed, non-empty chunks of at most
/// `max_chunk_length` characters, preferring natural break points.
///
/// Characters are accumulated one grapheme at a time. When the next one does
/// not fit, the buffer is cut at the best break point (or at its end when
/// none qualifies) and the tail plus the overflowing grapheme seeds the next
/// buffer. Text that already fits comes back as a single trimmed chunk.
pub fn segment(text: &str, max_chunk_length: usize) -> Vec<String> {
    segment_by(text, max_chunk_length, text_length)
}

/// Like [`segment`], but chunk lengths are measured with `measure`, for
/// platforms that count something other than graphemes. Chunks are still
/// cut between graphemes only.
pub fn segment_by(text: &str, max_chunk_length: usize, measure: impl Fn(&str) -> usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut buffer = String::new();
    let mut buffer_length = 0;

    for grapheme in text.graphemes(true) {
        let grapheme_length = measure(grapheme);
        loop {
            if buffer_length + grapheme_length <= max_chunk_length {
                buffer.push_str(grapheme);
                buffer_length += grapheme_length;
                break;
            }

            if buffer.is_empty() {
                // the limit cannot hold this character
                push_chunk(&mut chunks, grapheme);
                break;
            }

            match find_break_point(&buffer) {
                Some(cut) => {
                    push_chunk(&mut chunks, &buffer[..cut]);
                    buffer = buffer[cut..].to_string();
                    buffer_length = measure(&buffer);
                }
                None => {
                    push_chunk(&mut chunks, &buffer);
                    buffer.clear();
                    buffer_length = 0;
                }
            }
        }
    }

    push_chunk(&mut chunks, &buffer);
    chunks
}

fn push_chunk(chunks: &mut Vec<String>, chunk: &str) {
    let chunk = chunk.trim();
    if !chunk.is_empty() {
        chunks.push(chunk.to_string());
    }
}
