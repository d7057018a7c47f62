//! Connector run detection: maximal chains of connected structural cells.
//!
//! A run of two or more cells becomes one polyline in the output path.
//! Vertical chains tolerate slightly uneven indentation through a
//! two-tier neighbor search; horizontal chains require contiguous
//! structural cells in one row. The ascii arrowhead `v` is classified by
//! one predicate, [`connective_v`], shared with zone layout so the two
//! passes can never disagree about what is an arrow and what is a word.

use std::collections::HashSet;

use crate::boxes::PerimeterOwnership;
use crate::classify::{self, Mode};
use crate::consts::{FAR_TOLERANCE_FACTOR, HORIZONTAL_GAP_LIMIT, NEAR_TOLERANCE_FACTOR};
use crate::grid::{Cell, Grid};

#[cfg(test)]
#[path = "runs_test.rs"]
mod runs_test;

/// All detected runs plus the set of cells they consumed.
///
/// Zone layout skips consumed cells when collecting text, which is what
/// keeps arrows and borders out of rendered labels.
#[derive(Debug, Clone, Default)]
pub struct RunSet {
    /// One polyline per run, in output units.
    pub polylines: Vec<Vec<(f64, f64)>>,
    /// (row, column) of every cell belonging to some run.
    pub consumed: HashSet<(usize, usize)>,
}

/// Detect all vertical and horizontal runs in the grid.
#[must_use]
pub fn find_runs(grid: &Grid, mode: Mode, ownership: &PerimeterOwnership) -> RunSet {
    let mut set = RunSet::default();
    find_vertical_runs(grid, mode, ownership, &mut set);
    find_horizontal_runs(grid, mode, ownership, &mut set);
    tracing::debug!(runs = set.polylines.len(), "connector runs detected");
    set
}

// ── Vertical runs ───────────────────────────────────────────────

fn find_vertical_runs(grid: &Grid, mode: Mode, ownership: &PerimeterOwnership, set: &mut RunSet) {
    for row in 0..grid.row_count() {
        for start in &grid.rows[row].cells {
            if !mode.connects_down(start.ch()) && !mode.connects_up(start.ch()) {
                continue;
            }
            if has_incoming(grid, mode, ownership, row, start) {
                continue;
            }

            let mut cells: Vec<(usize, &Cell)> = vec![(row, start)];
            let mut current = start;
            let mut current_row = row;
            while let Some(next) = next_in_chain(grid, mode, ownership, current_row, current) {
                current_row += 1;
                cells.push((current_row, next));
                current = next;
            }

            if cells.len() < 2 {
                continue;
            }
            set.polylines.push(vertical_polyline(mode, &cells));
            for (r, c) in &cells {
                set.consumed.insert((*r, c.column));
            }
        }
    }
}

/// Whether a chain from the row above already covers this cell.
///
/// Uses the same neighbor search as the chain itself, so a cell is
/// skipped exactly when an earlier run reaches it.
fn has_incoming(grid: &Grid, mode: Mode, ownership: &PerimeterOwnership, row: usize, cell: &Cell) -> bool {
    let Some(above_row) = row.checked_sub(1) else {
        return false;
    };
    grid.rows[above_row]
        .cells
        .iter()
        .any(|above| {
            next_in_chain(grid, mode, ownership, above_row, above)
                .is_some_and(|next| next.column == cell.column)
        })
}

/// The next cell a vertical chain reaches from `cell`, if any.
fn next_in_chain<'g>(
    grid: &'g Grid,
    mode: Mode,
    ownership: &PerimeterOwnership,
    row: usize,
    cell: &Cell,
) -> Option<&'g Cell> {
    if !mode.connects_down(cell.ch()) {
        return None;
    }
    let next_row = row + 1;
    let next = nearest_connectable(grid, mode, next_row, cell.center_x())?;
    // Two consecutive owned cells would redraw a custom-stroked border.
    if ownership.contains(row, cell.column) && ownership.contains(next_row, next.column) {
        return None;
    }
    Some(next)
}

/// Nearest cell in a row that can receive a vertical connection, within
/// the two-tier tolerance around `x`: first a tight radius, then a wide
/// fallback that bridges uneven indentation without merging unrelated
/// columns.
fn nearest_connectable(grid: &Grid, mode: Mode, row: usize, x: f64) -> Option<&Cell> {
    let near = NEAR_TOLERANCE_FACTOR * grid.cell_width();
    let far = FAR_TOLERANCE_FACTOR * grid.cell_width();
    nearest_within(grid, mode, row, x, near).or_else(|| nearest_within(grid, mode, row, x, far))
}

fn nearest_within(grid: &Grid, mode: Mode, row: usize, x: f64, tolerance: f64) -> Option<&Cell> {
    grid.rows
        .get(row)?
        .cells
        .iter()
        .filter(|c| (c.center_x() - x).abs() <= tolerance)
        .filter(|c| mode.connects_up(c.ch()) && (c.ch() != 'v' || connective_v(grid, mode, row, c.column)))
        .min_by(|a, b| {
            let da = (a.center_x() - x).abs();
            let db = (b.center_x() - x).abs();
            da.partial_cmp(&db).unwrap_or(std::cmp::Ordering::Equal)
        })
}

/// Polyline for a vertical chain: top edge (or center, at corners and
/// junctions) of the first cell down to the bottom edge (or center) of
/// the last, passing through intermediate cell centers so slightly
/// staggered columns still draw as one line.
fn vertical_polyline(mode: Mode, cells: &[(usize, &Cell)]) -> Vec<(f64, f64)> {
    let (_, first) = cells[0];
    let (_, last) = cells[cells.len() - 1];
    let start_y = if mode.starts_at_center(first.ch()) {
        first.center_y()
    } else {
        first.y
    };
    let end_y = if mode.ends_at_center(last.ch()) {
        last.center_y()
    } else {
        last.y + last.height
    };

    let mut points = vec![(first.center_x(), start_y)];
    for (_, cell) in &cells[1..cells.len() - 1] {
        points.push((cell.center_x(), cell.center_y()));
    }
    points.push((last.center_x(), end_y));
    points
}

// ── Horizontal runs ─────────────────────────────────────────────

fn find_horizontal_runs(grid: &Grid, mode: Mode, ownership: &PerimeterOwnership, set: &mut RunSet) {
    for (row, cells) in grid.rows.iter().enumerate() {
        let mut chain: Vec<&Cell> = Vec::new();
        for cell in &cells.cells {
            let structural = mode.is_structure(cell.ch())
                && (cell.ch() != 'v' || connective_v(grid, mode, row, cell.column));
            let touching = chain.last().is_none_or(|prev| cell.x - (prev.x + prev.width) < HORIZONTAL_GAP_LIMIT);
            let owned_pair = chain
                .last()
                .is_some_and(|prev| ownership.contains(row, prev.column) && ownership.contains(row, cell.column));

            if structural && touching && !owned_pair {
                chain.push(cell);
            } else {
                flush_horizontal(row, &chain, set);
                chain.clear();
                if structural {
                    chain.push(cell);
                }
            }
        }
        flush_horizontal(row, &chain, set);
    }
}

/// Emit a horizontal chain as one segment if it qualifies as a line.
///
/// A chain must contain at least one rule or corner glyph; this is what
/// keeps adjacent vertical walls (`||`) from producing a spurious
/// horizontal segment.
fn flush_horizontal(row: usize, chain: &[&Cell], set: &mut RunSet) {
    if chain.len() < 2 {
        return;
    }
    let anchored = chain.iter().any(|c| {
        classify::is_horizontal_rule(c.ch()) || classify::joins_at_center(c.ch())
    });
    if !anchored {
        return;
    }

    let first = chain[0];
    let last = chain[chain.len() - 1];
    let x0 = if classify::joins_at_center(first.ch()) { first.center_x() } else { first.x };
    let x1 = if classify::joins_at_center(last.ch()) { last.center_x() } else { last.x + last.width };
    let y = first.center_y();

    set.polylines.push(vec![(x0, y), (x1, y)]);
    for cell in chain {
        set.consumed.insert((row, cell.column));
    }
}

// ── Arrowhead disambiguation ────────────────────────────────────

/// Whether a `v` at (row, column) is a connective arrowhead rather than
/// the letter "v" inside a word.
///
/// True when it has a structural neighbor to its immediate left or
/// right, or a vertical connector cell directly above, or it is not
/// flanked on both sides by alphanumeric characters. Rich-mode documents
/// draw arrowheads with dedicated glyphs, so `v` there is always text.
#[must_use]
pub fn connective_v(grid: &Grid, mode: Mode, row: usize, column: usize) -> bool {
    if mode.is_rich() {
        return false;
    }
    let Some(cell) = grid.cell(row, column) else {
        return false;
    };
    if cell.ch() != 'v' {
        return false;
    }

    let left = column.checked_sub(1).and_then(|c| grid.cell(row, c));
    let right = grid.cell(row, column + 1);
    let structural_neighbor = |n: Option<&Cell>| n.is_some_and(|c| c.ch() != 'v' && mode.is_structure(c.ch()));
    if structural_neighbor(left) || structural_neighbor(right) {
        return true;
    }

    if let Some(above_row) = row.checked_sub(1) {
        let tolerance = NEAR_TOLERANCE_FACTOR * grid.cell_width();
        let has_connector_above = grid
            .rows
            .get(above_row)
            .is_some_and(|r| {
                r.cells.iter().any(|c| {
                    mode.connects_down(c.ch()) && (c.center_x() - cell.center_x()).abs() <= tolerance
                })
            });
        if has_connector_above {
            return true;
        }
    }

    let flanked = left.is_some_and(|c| c.ch().is_alphanumeric()) && right.is_some_and(|c| c.ch().is_alphanumeric());
    !flanked
}
