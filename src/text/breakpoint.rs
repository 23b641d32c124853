use unicode_segmentation::GraphemeCursor;

use super::text_length;

/// Natural break points, best first.
pub const BREAK_POINTS: [&str; 8] = ["\n\n", "\n", ". ", "! ", "? ", "; ", ", ", " "];

/// A break point only counts when it lies within this many characters of
/// the end of the buffer.
pub const BREAK_POINT_WINDOW: usize = 100;

/// Finds where to cut a buffer that is about to overflow.
///
/// Returns the byte offset right after the best break point: the first kind
/// in [`BREAK_POINTS`] whose last occurrence starts inside the trailing
/// [`BREAK_POINT_WINDOW`] characters. A break point at the very start of the
/// buffer is ignored since cutting there would produce an empty chunk.
/// `None` means the caller has to cut at the buffer end.
pub fn find_break_point(buffer: &str) -> Option<usize> {
    for break_point in BREAK_POINTS {
        let Some(start) = buffer.rfind(break_point) else {
            continue;
        };
        if start == 0 || text_length(&buffer[start..]) > BREAK_POINT_WINDOW {
            continue;
        }
        let cut = start + break_point.len();
        if is_grapheme_boundary(buffer, cut) {
            return Some(cut);
        }
    }
    None
}

fn is_grapheme_boundary(text: &str, offset: usize) -> bool {
    GraphemeCursor::new(offset, text.len(), true)
        .is_boundary(text, 0)
        .unwrap_or(false)
}
