//! Text zones: where labels live between walls, and how they align.
//!
//! Each row is partitioned into zones bounded by wall glyphs. Zone text
//! is collected from cells that are not structure (connector runs,
//! stroked-box perimeters, walls and junctions all read as blanks), then
//! placed according to the alignment-marker protocol: `^text^`/`^text`
//! center, `<text` pins left, `>text`/`text>` pins right. Tokens crossing
//! a color-marker column are re-split so every sub-run carries its own
//! fill.

use crate::boxes::{DetectedBox, PerimeterOwnership};
use crate::classify::{joins_at_center, Mode};
use crate::consts::RIGHT_INSET_FACTOR;
use crate::grid::{Grid, Row};
use crate::marker::{MarkerKind, StyleMarker};
use crate::primitive::TextAnchor;
use crate::runs::{connective_v, RunSet};

#[cfg(test)]
#[path = "zone_test.rs"]
mod zone_test;

/// The text-bearing gap between two wall cells in one row, or the whole
/// row if fewer than two walls exist.
#[derive(Debug, Clone, PartialEq)]
pub struct Zone {
    /// First column inside the zone.
    pub start_column: usize,
    /// One past the last column inside the zone.
    pub end_column: usize,
    /// Left pixel bound.
    pub left_bound: f64,
    /// Right pixel bound.
    pub right_bound: f64,
}

/// A positioned text label ready to become a primitive.
#[derive(Debug, Clone, PartialEq)]
pub struct TextNode {
    /// Anchor x in output units.
    pub x: f64,
    /// Vertical center of the owning row.
    pub y: f64,
    /// Label content, marker syntax already stripped.
    pub content: String,
    /// Horizontal anchor.
    pub anchor: TextAnchor,
    /// Resolved fill color, if a color marker applies.
    pub fill: Option<String>,
}

/// Lay out all text nodes for the document.
#[must_use]
pub fn layout_text(
    grid: &Grid,
    mode: Mode,
    markers_by_row: &[Vec<StyleMarker>],
    boxes: &[DetectedBox],
    runs: &RunSet,
    ownership: &PerimeterOwnership,
) -> Vec<TextNode> {
    let mut nodes = Vec::new();
    for (row_index, row) in grid.rows.iter().enumerate() {
        if row.cells.is_empty() {
            continue;
        }
        let markers = markers_by_row.get(row_index).map_or(&[][..], Vec::as_slice);
        for zone in row_zones(grid, mode, row_index, row, boxes) {
            layout_zone(grid, mode, row_index, row, &zone, markers, runs, ownership, &mut nodes);
        }
    }
    nodes
}

/// Partition one row into zones between its wall cells.
fn row_zones(grid: &Grid, mode: Mode, row_index: usize, row: &Row, boxes: &[DetectedBox]) -> Vec<Zone> {
    let walls: Vec<usize> = row
        .cells
        .iter()
        .filter(|c| is_wall(mode, row_index, c.column, c.ch(), boxes))
        .map(|c| c.column)
        .collect();

    if walls.len() < 2 {
        return vec![Zone {
            start_column: 0,
            end_column: row.cells.len(),
            left_bound: 0.0,
            right_bound: grid.pixel_width(),
        }];
    }

    walls
        .windows(2)
        .map(|pair| {
            let left = &row.cells[pair[0]];
            let right = &row.cells[pair[1]];
            Zone {
                start_column: pair[0] + 1,
                end_column: pair[1],
                left_bound: left.x + left.width,
                right_bound: right.x,
            }
        })
        .collect()
}

/// Whether a cell bounds text zones: a vertical wall or corner glyph, or
/// an ascii `+` sitting on a detected box edge.
fn is_wall(mode: Mode, row: usize, column: usize, ch: char, boxes: &[DetectedBox]) -> bool {
    if mode.is_vertical_wall(ch) || mode.is_corner(ch) {
        return true;
    }
    ch == '+' && boxes.iter().any(|b| b.on_perimeter(row, column))
}

/// Lay out the text of one zone.
#[allow(clippy::too_many_arguments)]
fn layout_zone(
    grid: &Grid,
    mode: Mode,
    row_index: usize,
    row: &Row,
    zone: &Zone,
    markers: &[StyleMarker],
    runs: &RunSet,
    ownership: &PerimeterOwnership,
    nodes: &mut Vec<TextNode>,
) {
    // One display unit per column; structure reads as blank so native
    // column positions survive.
    let display: Vec<&str> = (zone.start_column..zone.end_column.min(row.cells.len()))
        .map(|col| {
            let cell = &row.cells[col];
            let ch = cell.ch();
            let structural = runs.consumed.contains(&(row_index, col))
                || ownership.contains(row_index, col)
                || mode.is_vertical_wall(ch)
                || mode.is_corner(ch)
                || joins_at_center(ch)
                || (ch == 'v' && connective_v(grid, mode, row_index, col));
            if structural { " " } else { cell.glyph.as_str() }
        })
        .collect();

    let first = display.iter().position(|g| !g.trim().is_empty());
    let last = display.iter().rposition(|g| !g.trim().is_empty());
    let (Some(first), Some(last)) = (first, last) else {
        return;
    };
    let y = row.cells[zone.start_column.min(row.cells.len() - 1)].center_y();

    let trimmed: String = display[first..=last].concat();
    if trimmed.starts_with('^') && trimmed != "^^" {
        // Whole-zone centering: strip the marker(s), keep interior
        // spaces verbatim, anchor at the zone's pixel midpoint.
        let bounded = trimmed.len() > 2 && trimmed.ends_with('^');
        let content = if bounded {
            display[first + 1..last].concat()
        } else {
            display[first + 1..=last].concat()
        };
        if !content.is_empty() {
            nodes.push(TextNode {
                x: (zone.left_bound + zone.right_bound) / 2.0,
                y,
                content,
                anchor: TextAnchor::Middle,
                fill: fill_at(markers, zone.start_column + first),
            });
        }
        return;
    }

    for (token_start, token_end) in tokenize(&display) {
        layout_token(grid, row_index, row, zone, &display, token_start, token_end, y, markers, nodes);
    }
}

/// Token spans within a zone's display columns. A single interior space
/// binds (`\S+( \S+)*` greedily); two or more spaces split.
fn tokenize(display: &[&str]) -> Vec<(usize, usize)> {
    let blank = |i: usize| display[i].trim().is_empty();
    let mut tokens = Vec::new();
    let mut i = 0;
    while i < display.len() {
        if blank(i) {
            i += 1;
            continue;
        }
        let start = i;
        let mut end = i + 1;
        loop {
            while end < display.len() && !blank(end) {
                end += 1;
            }
            // Bridge exactly one space when a word follows.
            if end + 1 < display.len() && !blank(end + 1) && end < display.len() && blank(end) {
                end += 1;
                continue;
            }
            break;
        }
        tokens.push((start, end));
        i = end;
    }
    tokens
}

/// Lay out one token, applying its alignment marker and color re-splits.
#[allow(clippy::too_many_arguments)]
fn layout_token(
    grid: &Grid,
    row_index: usize,
    row: &Row,
    zone: &Zone,
    display: &[&str],
    token_start: usize,
    token_end: usize,
    y: f64,
    markers: &[StyleMarker],
    nodes: &mut Vec<TextNode>,
) {
    let global_start = zone.start_column + token_start;
    let text: String = display[token_start..token_end].concat();
    let span_mid = {
        let first = &row.cells[global_start];
        let last = &row.cells[zone.start_column + token_end - 1];
        (first.x + last.x + last.width) / 2.0
    };

    // Literal escape for the reserved centering character.
    if text == "^^" {
        nodes.push(TextNode {
            x: row.cells[global_start].x,
            y,
            content: "^".to_owned(),
            anchor: TextAnchor::Start,
            fill: fill_at(markers, global_start),
        });
        return;
    }

    let len = token_end - token_start;
    if text.starts_with('^') {
        let bounded = len > 2 && text.ends_with('^');
        let inner_end = if bounded { token_end - 1 } else { token_end };
        let content: String = display[token_start + 1..inner_end].concat();
        if !content.is_empty() {
            nodes.push(TextNode {
                x: span_mid,
                y,
                content,
                anchor: TextAnchor::Middle,
                fill: fill_at(markers, global_start),
            });
        }
        return;
    }

    if let Some(stripped) = text.strip_prefix('<') {
        if !stripped.is_empty() {
            nodes.push(TextNode {
                x: row.cells[global_start].x,
                y,
                content: stripped.to_owned(),
                anchor: TextAnchor::Start,
                fill: fill_at(markers, global_start),
            });
        }
        return;
    }

    if text.starts_with('>') || text.ends_with('>') {
        let content = text
            .strip_prefix('>')
            .or_else(|| text.strip_suffix('>'))
            .unwrap_or(&text)
            .to_owned();
        if !content.is_empty() {
            nodes.push(TextNode {
                x: zone.right_bound - RIGHT_INSET_FACTOR * grid.cell_width(),
                y,
                content,
                anchor: TextAnchor::End,
                fill: fill_at(markers, global_start),
            });
        }
        return;
    }

    // Plain token at its native column, re-split wherever a color marker
    // lands inside it so each sub-run takes its own fill.
    let global_end = zone.start_column + token_end;
    let mut cuts: Vec<usize> = markers
        .iter()
        .filter(|m| m.kind == MarkerKind::Color && m.column > global_start && m.column < global_end)
        .map(|m| m.column)
        .collect();
    cuts.sort_unstable();
    cuts.dedup();

    let mut run_start = global_start;
    for cut in cuts.into_iter().chain(std::iter::once(global_end)) {
        let content: String = display[run_start - zone.start_column..cut - zone.start_column].concat();
        if !content.trim().is_empty() {
            nodes.push(TextNode {
                x: row.cells[run_start].x,
                y,
                content,
                anchor: TextAnchor::Start,
                fill: fill_at(markers, run_start),
            });
        }
        run_start = cut;
    }
}

/// The most recent color marker at or before a column on this row.
fn fill_at(markers: &[StyleMarker], column: usize) -> Option<String> {
    markers
        .iter()
        .filter(|m| m.kind == MarkerKind::Color && m.column <= column)
        .next_back()
        .map(|m| m.value.clone())
}
