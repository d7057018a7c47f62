//! Grapheme segmentation and display-width measurement.
//!
//! Every other component addresses the input by *display unit*: one
//! extended grapheme cluster occupying one or two character columns.
//! This module is the single place that decides how a line splits into
//! units and how wide each unit is.

use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

use crate::classify::Mode;

#[cfg(test)]
#[path = "text_test.rs"]
mod text_test;

/// Emoji variation selector (VS16). A preceding glyph is rendered in its
/// emoji presentation, which occupies two columns in rich mode.
const VARIATION_SELECTOR_16: char = '\u{FE0F}';

/// Split a line into extended grapheme clusters, in display order.
#[must_use]
pub fn split_graphemes(text: &str) -> Vec<&str> {
    text.graphemes(true).collect()
}

/// Column width (1 or 2) of a single grapheme cluster.
///
/// Wide East-Asian and emoji graphemes are 2 in both modes. Rich mode
/// additionally widens glyphs carrying an emoji variation selector, which
/// monospace fonts render at emoji width. Unrecognized or zero-width
/// graphemes default to 1; this function never fails.
#[must_use]
pub fn display_width(grapheme: &str, mode: Mode) -> usize {
    if mode.is_rich() && grapheme.contains(VARIATION_SELECTOR_16) {
        return 2;
    }
    match grapheme.width() {
        0 | 1 => 1,
        _ => 2,
    }
}

/// Total display width of a line: the sum of its grapheme widths.
#[must_use]
pub fn text_width(text: &str, mode: Mode) -> usize {
    text.graphemes(true).map(|g| display_width(g, mode)).sum()
}
