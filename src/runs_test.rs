//! Tests for connector run detection.

use super::{connective_v, find_runs, RunSet};
use crate::boxes::{detect_boxes, resolve_styles, PerimeterOwnership};
use crate::classify::Mode;
use crate::grid::Grid;
use crate::marker::parse_line;

fn runs_for(lines: &[&str]) -> RunSet {
    let mode = Mode::detect(&lines.join("\n"));
    let grid = Grid::build(lines, mode, 10.0, 20.0);
    find_runs(&grid, mode, &PerimeterOwnership::default())
}

// =============================================================================
// VERTICAL RUNS
// =============================================================================

#[test]
fn stacked_bars_form_one_vertical_run() {
    let set = runs_for(&["|", "|"]);
    assert_eq!(set.polylines.len(), 1);
    let line = &set.polylines[0];
    // Top edge of the first cell down to the bottom edge of the last,
    // passing through both cell centers.
    assert_eq!(line.first().copied(), Some((5.0, 0.0)));
    assert_eq!(line.last().copied(), Some((5.0, 40.0)));
    assert!(set.consumed.contains(&(0, 0)));
    assert!(set.consumed.contains(&(1, 0)));
}

#[test]
fn single_bar_is_not_a_run() {
    let set = runs_for(&["|"]);
    assert!(set.polylines.is_empty());
}

#[test]
fn lone_plus_under_a_word_draws_nothing() {
    let set = runs_for(&["Service", "   +"]);
    assert!(set.polylines.is_empty());
    assert!(set.consumed.is_empty());
}

#[test]
fn slightly_staggered_bars_still_chain() {
    // One column of drift is inside the wide fallback tolerance.
    let set = runs_for(&["|", " |", "|"]);
    assert_eq!(set.polylines.len(), 1);
    let line = &set.polylines[0];
    assert_eq!(line.len(), 3);
    assert_eq!(line.first().copied(), Some((5.0, 0.0)));
    // Middle point follows the staggered cell's center.
    assert_eq!(line[1], (15.0, 30.0));
    assert_eq!(line.last().copied(), Some((5.0, 60.0)));
}

#[test]
fn distant_columns_never_merge() {
    let set = runs_for(&["|", "                        |"]);
    assert!(set.polylines.is_empty());
}

#[test]
fn arrowhead_terminates_a_vertical_run() {
    let set = runs_for(&["|", "|", "v"]);
    assert_eq!(set.polylines.len(), 1);
    let line = &set.polylines[0];
    // The run ends at the arrow cell's center, not its bottom edge.
    assert_eq!(line.last().copied(), Some((5.0, 50.0)));
}

#[test]
fn corner_runs_start_and_end_at_cell_centers() {
    let set = runs_for(&["┌", "│", "┘"]);
    assert_eq!(set.polylines.len(), 1);
    let line = &set.polylines[0];
    assert_eq!(line.first().copied(), Some((5.0, 10.0)));
    assert_eq!(line.last().copied(), Some((5.0, 50.0)));
}

#[test]
fn no_duplicate_run_from_the_second_row() {
    let set = runs_for(&["|", "|", "|"]);
    assert_eq!(set.polylines.len(), 1);
    assert_eq!(set.polylines[0].len(), 3);
}

// =============================================================================
// HORIZONTAL RUNS
// =============================================================================

#[test]
fn dash_arrowhead_dash_is_one_segment() {
    let set = runs_for(&["-v-"]);
    assert_eq!(set.polylines.len(), 1);
    let line = &set.polylines[0];
    assert_eq!(line.first().copied(), Some((0.0, 10.0)));
    assert_eq!(line.last().copied(), Some((30.0, 10.0)));
}

#[test]
fn border_row_spans_corner_centers() {
    let set = runs_for(&["+--+"]);
    assert_eq!(set.polylines.len(), 1);
    let line = &set.polylines[0];
    assert_eq!(line.first().copied(), Some((5.0, 10.0)));
    assert_eq!(line.last().copied(), Some((35.0, 10.0)));
}

#[test]
fn adjacent_walls_are_not_a_horizontal_segment() {
    let set = runs_for(&["||"]);
    assert!(set.polylines.is_empty());
}

#[test]
fn words_break_horizontal_chains() {
    let set = runs_for(&["-- ab --"]);
    assert_eq!(set.polylines.len(), 2);
}

// =============================================================================
// ARROWHEAD DISAMBIGUATION
// =============================================================================

#[test]
fn v_inside_a_word_is_text() {
    let mode = Mode::Ascii;
    let grid = Grid::build(&["Service"], mode, 10.0, 20.0);
    assert!(!connective_v(&grid, mode, 0, 3));
}

#[test]
fn v_with_structural_neighbor_is_connective() {
    let mode = Mode::Ascii;
    let grid = Grid::build(&["-v-"], mode, 10.0, 20.0);
    assert!(connective_v(&grid, mode, 0, 1));
}

#[test]
fn v_under_a_connector_is_connective() {
    let mode = Mode::Ascii;
    let grid = Grid::build(&["o|o", "avb"], mode, 10.0, 20.0);
    assert!(connective_v(&grid, mode, 1, 1));
}

#[test]
fn bare_v_between_spaces_is_connective() {
    let mode = Mode::Ascii;
    let grid = Grid::build(&[" v "], mode, 10.0, 20.0);
    assert!(connective_v(&grid, mode, 0, 1));
}

#[test]
fn v_is_always_text_in_rich_mode() {
    let mode = Mode::Rich;
    let grid = Grid::build(&["─v─"], mode, 10.0, 20.0);
    assert!(!connective_v(&grid, mode, 0, 1));
}

// =============================================================================
// STROKED-BOX SUPPRESSION
// =============================================================================

#[test]
fn stroked_box_borders_are_not_double_drawn() {
    let raw = ["+----+", "|{#stroke:navy}    |", "+----+"];
    let parsed: Vec<_> = raw.iter().map(|l| parse_line(l)).collect();
    let clean: Vec<&str> = parsed.iter().map(|p| p.clean.as_str()).collect();
    let markers: Vec<_> = parsed.iter().map(|p| p.markers.clone()).collect();

    let mode = Mode::Ascii;
    let grid = Grid::build(&clean, mode, 10.0, 20.0);
    let boxes = detect_boxes(&clean);
    let styled = resolve_styles(&boxes, &markers);
    let ownership = PerimeterOwnership::from_styled(&styled);

    let set = find_runs(&grid, mode, &ownership);
    assert!(
        set.polylines.is_empty(),
        "owned perimeter must not produce runs: {:?}",
        set.polylines
    );

    // The same diagram without the marker draws its border.
    let plain = runs_for(&["+----+", "|    |", "+----+"]);
    assert!(!plain.polylines.is_empty());
}
