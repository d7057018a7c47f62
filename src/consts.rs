//! Shared numeric constants for the rendering engine.

// ── Cell metrics ────────────────────────────────────────────────

/// Default width of one logical character column, in output units.
pub const DEFAULT_CELL_WIDTH: f64 = 10.0;

/// Default height of one text row, in output units.
pub const DEFAULT_CELL_HEIGHT: f64 = 20.0;

// ── Stroke & text defaults ──────────────────────────────────────

/// Default stroke color for structural lines.
pub const DEFAULT_STROKE: &str = "#1F1A17";

/// Default stroke width for structural lines, in output units.
pub const DEFAULT_STROKE_WIDTH: f64 = 1.5;

/// Default fill color for text nodes.
pub const DEFAULT_TEXT_FILL: &str = "#1F1A17";

/// Default font size for text nodes, in output units.
pub const DEFAULT_FONT_SIZE: f64 = 14.0;

// ── Connectivity tolerances ─────────────────────────────────────
//
// Empirically tuned against hand-drawn diagrams; treat as calibration
// candidates rather than derived values.

/// Tight vertical-neighbor search radius, as a fraction of cell width.
pub const NEAR_TOLERANCE_FACTOR: f64 = 0.5;

/// Fallback vertical-neighbor search radius, as a fraction of cell width.
/// Bridges slightly uneven indentation without merging unrelated columns.
pub const FAR_TOLERANCE_FACTOR: f64 = 2.0;

/// Maximum pixel gap between horizontally chained cells.
pub const HORIZONTAL_GAP_LIMIT: f64 = 2.0;

/// Inset from a zone's right bound for right-aligned tokens, as a
/// fraction of cell width.
pub const RIGHT_INSET_FACTOR: f64 = 0.8;
