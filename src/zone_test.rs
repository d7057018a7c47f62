//! Tests for zone partitioning and text layout.

use super::{layout_text, TextNode};
use crate::boxes::{detect_boxes, resolve_styles, PerimeterOwnership};
use crate::classify::Mode;
use crate::grid::Grid;
use crate::marker::{parse_line, StyleMarker};
use crate::primitive::TextAnchor;
use crate::runs::find_runs;

fn nodes_for(raw_lines: &[&str]) -> Vec<TextNode> {
    let mode = Mode::detect(&raw_lines.join("\n"));
    let parsed: Vec<_> = raw_lines.iter().map(|l| parse_line(l)).collect();
    let clean: Vec<&str> = parsed.iter().map(|p| p.clean.as_str()).collect();
    let markers: Vec<Vec<StyleMarker>> = parsed.iter().map(|p| p.markers.clone()).collect();

    let grid = Grid::build(&clean, mode, 10.0, 20.0);
    let boxes = detect_boxes(&clean);
    let styled = resolve_styles(&boxes, &markers);
    let ownership = PerimeterOwnership::from_styled(&styled);
    let runs = find_runs(&grid, mode, &ownership);
    layout_text(&grid, mode, &markers, &boxes, &runs, &ownership)
}

// =============================================================================
// ZONE TEXT EXTRACTION
// =============================================================================

#[test]
fn box_label_is_one_left_aligned_token() {
    let nodes = nodes_for(&["+-----+", "|Box  |", "+-----+"]);
    assert_eq!(nodes.len(), 1);
    assert_eq!(nodes[0].content, "Box");
    assert_eq!(nodes[0].anchor, TextAnchor::Start);
    // Native column 1, second row center.
    assert!((nodes[0].x - 10.0).abs() < f64::EPSILON);
    assert!((nodes[0].y - 30.0).abs() < f64::EPSILON);
}

#[test]
fn border_rows_produce_no_text() {
    let nodes = nodes_for(&["+-----+"]);
    assert!(nodes.is_empty());
}

#[test]
fn connector_stub_rows_produce_no_text() {
    let nodes = nodes_for(&["  |", "  +"]);
    assert!(nodes.is_empty());
}

#[test]
fn single_interior_space_binds_a_token() {
    let nodes = nodes_for(&["|one two  three|"]);
    assert_eq!(nodes.len(), 2);
    assert_eq!(nodes[0].content, "one two");
    assert_eq!(nodes[1].content, "three");
}

#[test]
fn prose_without_walls_is_a_whole_row_zone() {
    let nodes = nodes_for(&["hello world"]);
    assert_eq!(nodes.len(), 1);
    assert_eq!(nodes[0].content, "hello world");
    assert!((nodes[0].x - 0.0).abs() < f64::EPSILON);
}

// =============================================================================
// CENTERING MARKERS
// =============================================================================

#[test]
fn bounded_zone_centering_keeps_interior_spaces() {
    let nodes = nodes_for(&["|^Multi word  sentence^     |"]);
    assert_eq!(nodes.len(), 1);
    assert_eq!(nodes[0].content, "Multi word  sentence");
    assert_eq!(nodes[0].anchor, TextAnchor::Middle);
    // Centered at the zone midpoint between the walls (x = 10 and 280).
    let expected_mid = (10.0 + 280.0) / 2.0;
    assert!((nodes[0].x - expected_mid).abs() < f64::EPSILON, "{}", nodes[0].x);
}

#[test]
fn unbounded_marker_centers_the_rest_of_the_zone() {
    let nodes = nodes_for(&["| ^Centered text |"]);
    assert_eq!(nodes.len(), 1);
    assert_eq!(nodes[0].content, "Centered text");
    assert_eq!(nodes[0].anchor, TextAnchor::Middle);
}

#[test]
fn caret_escape_renders_a_literal_caret() {
    let nodes = nodes_for(&["| ^^ |"]);
    assert_eq!(nodes.len(), 1);
    assert_eq!(nodes[0].content, "^");
    assert_eq!(nodes[0].anchor, TextAnchor::Start);
}

#[test]
fn token_level_centering_uses_the_token_span() {
    let nodes = nodes_for(&["|label  ^mid^  |"]);
    assert_eq!(nodes.len(), 2);
    assert_eq!(nodes[0].content, "label");
    assert_eq!(nodes[1].content, "mid");
    assert_eq!(nodes[1].anchor, TextAnchor::Middle);
    // Token spans columns 8..=12 of the row; centered on that span.
    assert!((nodes[1].x - 105.0).abs() < f64::EPSILON, "{}", nodes[1].x);
}

// =============================================================================
// LEFT / RIGHT ALIGNMENT
// =============================================================================

#[test]
fn left_marker_pins_at_its_own_column() {
    let nodes = nodes_for(&["|  <pin    |"]);
    assert_eq!(nodes.len(), 1);
    assert_eq!(nodes[0].content, "pin");
    assert_eq!(nodes[0].anchor, TextAnchor::Start);
    assert!((nodes[0].x - 30.0).abs() < f64::EPSILON);
}

#[test]
fn right_marker_pins_to_the_zone_right_bound() {
    let nodes = nodes_for(&["|ok>       |"]);
    assert_eq!(nodes.len(), 1);
    assert_eq!(nodes[0].content, "ok");
    assert_eq!(nodes[0].anchor, TextAnchor::End);
    // Right wall at column 11 (x = 110), minus the 0.8-cell inset.
    assert!((nodes[0].x - 102.0).abs() < f64::EPSILON, "{}", nodes[0].x);
}

#[test]
fn leading_right_marker_also_pins_right() {
    let nodes = nodes_for(&["|  >ok     |"]);
    assert_eq!(nodes.len(), 1);
    assert_eq!(nodes[0].content, "ok");
    assert_eq!(nodes[0].anchor, TextAnchor::End);
}

// =============================================================================
// COLOR RE-SPLITTING
// =============================================================================

#[test]
fn token_splits_at_color_marker_columns() {
    let nodes = nodes_for(&["|{#color:red}ab{#color:blue}cd  |"]);
    assert_eq!(nodes.len(), 2);
    assert_eq!(nodes[0].content, "ab");
    assert_eq!(nodes[0].fill.as_deref(), Some("red"));
    assert_eq!(nodes[1].content, "cd");
    assert_eq!(nodes[1].fill.as_deref(), Some("blue"));
    // The second run starts at its own column.
    assert!((nodes[1].x - 30.0).abs() < f64::EPSILON);
}

#[test]
fn most_recent_marker_on_the_row_wins() {
    let nodes = nodes_for(&["|{#color:red}ab  cd|"]);
    assert_eq!(nodes.len(), 2);
    assert_eq!(nodes[0].fill.as_deref(), Some("red"));
    // The later token on the same row inherits the same marker.
    assert_eq!(nodes[1].fill.as_deref(), Some("red"));
}

#[test]
fn rows_without_markers_use_the_default_fill() {
    let nodes = nodes_for(&["|plain|"]);
    assert_eq!(nodes.len(), 1);
    assert!(nodes[0].fill.is_none());
}

// =============================================================================
// STRUCTURE SUPPRESSION
// =============================================================================

#[test]
fn connective_arrowheads_never_reach_text() {
    let nodes = nodes_for(&["|", "v", "ok"]);
    assert_eq!(nodes.len(), 1);
    assert_eq!(nodes[0].content, "ok");
}

#[test]
fn letter_v_inside_words_stays_text() {
    let nodes = nodes_for(&["|Service    |"]);
    assert_eq!(nodes.len(), 1);
    assert_eq!(nodes[0].content, "Service");
}

#[test]
fn stroked_perimeter_cells_never_reach_text() {
    let nodes = nodes_for(&["+----+", "|{#stroke:navy}ab  |", "+----+"]);
    assert_eq!(nodes.len(), 1);
    assert_eq!(nodes[0].content, "ab");
}
