use unicode_segmentation::UnicodeSegmentation;

/// Counts user-perceived characters (extended grapheme clusters).
pub fn text_length(text: &str) -> usize {
    text.graphemes(true).count()
}
