//! Grapheme-aware text measurement and segmentation.
//!
//! Social platforms count user-perceived characters, so every length in this
//! module is a count of extended grapheme clusters. A chunk boundary never
//! falls inside a cluster, which keeps emoji sequences and combining marks
//! intact.

mod breakpoint;
mod length;
mod segment;

pub use breakpoint::{BREAK_POINTS, BREAK_POINT_WINDOW, find_break_point};
pub use length::text_length;
pub use segment::{segment, segment_by};
