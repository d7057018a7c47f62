//! Rectangular box detection and style resolution.
//!
//! Boxes are axis-aligned rectangles whose entire perimeter — every
//! border cell, not just the corners — satisfies the edge predicates.
//! Detection runs on marker-stripped lines using grapheme indices, the
//! same coordinate space style markers record. The scan is
//! O(rows² × cols²) in the worst case, which is fine at diagram sizes
//! (tens of rows and columns).

use std::collections::{HashMap, HashSet};

use crate::classify::{
    is_box_bottom_left, is_box_bottom_right, is_box_horizontal_edge, is_box_top_left, is_box_top_right,
    is_box_vertical_edge,
};
use crate::marker::{MarkerKind, StyleMarker};
use crate::text::split_graphemes;

#[cfg(test)]
#[path = "boxes_test.rs"]
mod boxes_test;

/// A perimeter-validated rectangle, in row/column indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DetectedBox {
    /// Row of the top border.
    pub top: usize,
    /// Column of the left border.
    pub left: usize,
    /// Row of the bottom border.
    pub bottom: usize,
    /// Column of the right border.
    pub right: usize,
}

impl DetectedBox {
    /// Area used for innermost-wins tie-breaking between nested boxes.
    #[must_use]
    pub fn area(&self) -> usize {
        (self.right - self.left) * (self.bottom - self.top)
    }

    /// Whether a (row, column) position lies inside the box, border included.
    #[must_use]
    pub fn contains(&self, row: usize, column: usize) -> bool {
        self.top <= row && row <= self.bottom && self.left <= column && column <= self.right
    }

    /// Whether a (row, column) position lies on the border itself.
    #[must_use]
    pub fn on_perimeter(&self, row: usize, column: usize) -> bool {
        self.contains(row, column)
            && (row == self.top || row == self.bottom || column == self.left || column == self.right)
    }
}

/// Resolved styling for one detected box.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BoxStyle {
    /// Background fill from a `{#bg:V}` marker.
    pub fill: Option<String>,
    /// Border stroke from a `{#stroke:V}` marker.
    pub stroke: Option<String>,
}

/// A box that picked up at least one style marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyledBox {
    /// The styled rectangle.
    pub bounds: DetectedBox,
    /// Its resolved style.
    pub style: BoxStyle,
}

/// Find all perimeter-validated rectangles in marker-stripped lines.
///
/// Nested boxes are all kept; ownership questions are settled later by
/// area. Detection is mode-independent: the edge predicates accept both
/// glyph families.
#[must_use]
pub fn detect_boxes(lines: &[&str]) -> Vec<DetectedBox> {
    let chars: Vec<Vec<char>> = lines
        .iter()
        .map(|line| split_graphemes(line).iter().map(|g| g.chars().next().unwrap_or(' ')).collect())
        .collect();

    let mut boxes = Vec::new();
    for top in 0..chars.len() {
        for left in 0..chars[top].len() {
            if !is_box_top_left(chars[top][left]) {
                continue;
            }
            for right in left + 1..chars[top].len() {
                if !is_box_top_right(chars[top][right]) {
                    continue;
                }
                if !horizontal_edge_between(&chars[top], left, right) {
                    continue;
                }
                for bottom in top + 1..chars.len() {
                    if let Some(found) = validate_bottom(&chars, top, left, bottom, right) {
                        boxes.push(found);
                    }
                }
            }
        }
    }
    boxes
}

/// Check one candidate bottom row and the vertical edges above it.
fn validate_bottom(chars: &[Vec<char>], top: usize, left: usize, bottom: usize, right: usize) -> Option<DetectedBox> {
    let row = &chars[bottom];
    if !is_box_bottom_left(*row.get(left)?) || !is_box_bottom_right(*row.get(right)?) {
        return None;
    }
    if !horizontal_edge_between(row, left, right) {
        return None;
    }
    for r in top + 1..bottom {
        let mid = &chars[r];
        if !mid.get(left).copied().is_some_and(is_box_vertical_edge) {
            return None;
        }
        if !mid.get(right).copied().is_some_and(is_box_vertical_edge) {
            return None;
        }
    }
    Some(DetectedBox { top, left, bottom, right })
}

/// Whether every character strictly between two columns is a horizontal
/// edge character.
fn horizontal_edge_between(row: &[char], left: usize, right: usize) -> bool {
    row[left + 1..right].iter().all(|&c| is_box_horizontal_edge(c))
}

/// Attach `bg`/`stroke` markers to the smallest-area enclosing box.
///
/// A marker outside every box resolves to nothing — geometric
/// inconsistency degrades silently. Later markers for the same box and
/// kind overwrite earlier ones.
#[must_use]
pub fn resolve_styles(boxes: &[DetectedBox], markers_by_row: &[Vec<StyleMarker>]) -> Vec<StyledBox> {
    let mut styles: HashMap<usize, BoxStyle> = HashMap::new();

    for (row, markers) in markers_by_row.iter().enumerate() {
        for marker in markers {
            if marker.kind == MarkerKind::Color {
                continue;
            }
            let innermost = boxes
                .iter()
                .enumerate()
                .filter(|(_, b)| b.contains(row, marker.column))
                .min_by_key(|(_, b)| b.area())
                .map(|(i, _)| i);
            let Some(index) = innermost else {
                continue;
            };
            let style = styles.entry(index).or_default();
            match marker.kind {
                MarkerKind::Bg => style.fill = Some(marker.value.clone()),
                MarkerKind::Stroke => style.stroke = Some(marker.value.clone()),
                MarkerKind::Color => {}
            }
        }
    }

    let mut styled: Vec<StyledBox> = styles
        .into_iter()
        .map(|(index, style)| StyledBox { bounds: boxes[index], style })
        .collect();
    styled.sort_by_key(|s| (s.bounds.top, s.bounds.left));
    styled
}

/// Cells owned by a custom-stroked box perimeter.
///
/// A derived, read-only annotation: run detection stops rather than
/// double-draw over these, and zone layout never treats them as text.
#[derive(Debug, Clone, Default)]
pub struct PerimeterOwnership {
    owned: HashSet<(usize, usize)>,
}

impl PerimeterOwnership {
    /// Mark the perimeters of every stroke-styled box.
    #[must_use]
    pub fn from_styled(styled: &[StyledBox]) -> Self {
        let mut owned = HashSet::new();
        for sb in styled {
            if sb.style.stroke.is_none() {
                continue;
            }
            let b = sb.bounds;
            for col in b.left..=b.right {
                owned.insert((b.top, col));
                owned.insert((b.bottom, col));
            }
            for row in b.top..=b.bottom {
                owned.insert((row, b.left));
                owned.insert((row, b.right));
            }
        }
        Self { owned }
    }

    /// Whether a cell is owned by a stroked perimeter.
    #[must_use]
    pub fn contains(&self, row: usize, column: usize) -> bool {
        self.owned.contains(&(row, column))
    }
}
