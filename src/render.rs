//! The renderer: raw text in, drawing surface out.
//!
//! Orchestrates the full pipeline — marker stripping, grid building, box
//! and run detection, zone layout — and emits primitives onto a
//! [`Surface`]. Everything is rebuilt from scratch per call; the only
//! state a renderer holds is its construction-time options.

use crate::boxes::{detect_boxes, resolve_styles, PerimeterOwnership, StyledBox};
use crate::classify::Mode;
use crate::consts::{
    DEFAULT_CELL_HEIGHT, DEFAULT_CELL_WIDTH, DEFAULT_FONT_SIZE, DEFAULT_STROKE, DEFAULT_STROKE_WIDTH,
    DEFAULT_TEXT_FILL,
};
use crate::format;
use crate::grid::Grid;
use crate::marker::{parse_line, StyleMarker};
use crate::primitive::Primitive;
use crate::runs::find_runs;
use crate::svg::{num, Surface, SurfaceError, SvgSurface};
use crate::zone::layout_text;

#[cfg(test)]
#[path = "render_test.rs"]
mod render_test;

#[cfg(test)]
#[path = "render_props_test.rs"]
mod render_props_test;

/// Error rendering a document.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// No drawing surface could be constructed. The one fatal condition:
    /// malformed input always degrades instead.
    #[error(transparent)]
    Surface(#[from] SurfaceError),
}

/// Construction-time renderer configuration.
///
/// Values are accepted as-is; callers own keeping them sane.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct RenderOptions {
    /// Width of one character column, in output units.
    pub cell_width: f64,
    /// Height of one text row, in output units.
    pub cell_height: f64,
    /// Stroke color for structural lines.
    pub stroke: String,
    /// Stroke width for structural lines, in output units.
    pub stroke_width: f64,
    /// Font size for text nodes, in output units.
    pub font_size: f64,
    /// Default fill color for text nodes.
    pub text_fill: String,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            cell_width: DEFAULT_CELL_WIDTH,
            cell_height: DEFAULT_CELL_HEIGHT,
            stroke: DEFAULT_STROKE.to_owned(),
            stroke_width: DEFAULT_STROKE_WIDTH,
            font_size: DEFAULT_FONT_SIZE,
            text_fill: DEFAULT_TEXT_FILL.to_owned(),
        }
    }
}

/// The transformation engine. Stateless between calls.
pub struct Renderer {
    options: RenderOptions,
}

impl Renderer {
    /// Create a renderer with the given options.
    #[must_use]
    pub fn new(options: RenderOptions) -> Self {
        Self { options }
    }

    /// This renderer's configuration.
    #[must_use]
    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    /// Width-normalize raw input; see [`format::normalize`].
    #[must_use]
    pub fn normalize(&self, input: &str) -> String {
        format::normalize(input)
    }

    /// Render onto a new surface of type `S`.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::Surface`] when the surface cannot be
    /// constructed; no partial output is produced.
    pub fn render<S: Surface>(&self, input: &str) -> Result<S, RenderError> {
        let (width, height, primitives) = self.scene(input);
        let mut surface = S::create(width, height)?;
        for primitive in &primitives {
            surface.append(primitive);
        }
        Ok(surface)
    }

    /// Render to standalone SVG markup.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::Surface`] when the surface cannot be
    /// constructed.
    pub fn render_svg(&self, input: &str) -> Result<String, RenderError> {
        self.render::<SvgSurface>(input).map(Surface::finish)
    }

    /// The pure core: primitives for a document, no surface involved.
    #[must_use]
    pub fn primitives(&self, input: &str) -> Vec<Primitive> {
        self.scene(input).2
    }

    /// Run the pipeline and collect canvas dimensions plus primitives.
    fn scene(&self, input: &str) -> (f64, f64, Vec<Primitive>) {
        let mode = Mode::detect(input);
        let parsed: Vec<_> = input.lines().map(parse_line).collect();
        let clean: Vec<&str> = parsed.iter().map(|p| p.clean.as_str()).collect();
        let markers_by_row: Vec<Vec<StyleMarker>> = parsed.iter().map(|p| p.markers.clone()).collect();

        let grid = Grid::build(&clean, mode, self.options.cell_width, self.options.cell_height);
        let boxes = detect_boxes(&clean);
        let styled = resolve_styles(&boxes, &markers_by_row);
        let ownership = PerimeterOwnership::from_styled(&styled);
        let runs = find_runs(&grid, mode, &ownership);
        let texts = layout_text(&grid, mode, &markers_by_row, &boxes, &runs, &ownership);
        tracing::debug!(
            rich = mode.is_rich(),
            boxes = boxes.len(),
            styled = styled.len(),
            texts = texts.len(),
            "scene assembled"
        );

        // Paint order: box rects beneath, then the structural path, then
        // text on top.
        let mut primitives = Vec::with_capacity(styled.len() + texts.len() + 1);
        for sb in &styled {
            if let Some(rect) = self.styled_rect(&grid, sb) {
                primitives.push(rect);
            }
        }
        primitives.push(Primitive::path(
            assemble_path(&runs.polylines),
            &self.options.stroke,
            self.options.stroke_width,
        ));
        for node in texts {
            primitives.push(Primitive::text(
                node.x,
                node.y,
                &node.content,
                node.anchor,
                node.fill.as_deref().unwrap_or(&self.options.text_fill),
                self.options.font_size,
            ));
        }

        (grid.pixel_width(), grid.pixel_height(), primitives)
    }

    /// Rectangle primitive for a styled box, through its corner cell
    /// centers. A box whose corners fell off the grid resolves to
    /// nothing.
    fn styled_rect(&self, grid: &Grid, sb: &StyledBox) -> Option<Primitive> {
        let b = sb.bounds;
        let tl = grid.cell(b.top, b.left)?;
        let br = grid.cell(b.bottom, b.right)?;
        let x = tl.center_x();
        let y = tl.center_y();
        Some(Primitive::rect(
            x,
            y,
            br.center_x() - x,
            br.center_y() - y,
            sb.style.fill.as_deref(),
            sb.style.stroke.as_deref(),
            self.options.stroke_width,
        ))
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new(RenderOptions::default())
    }
}

/// Join run polylines into one path data string of move/line commands.
fn assemble_path(polylines: &[Vec<(f64, f64)>]) -> String {
    let mut d = String::new();
    for points in polylines {
        let mut iter = points.iter();
        let Some((x, y)) = iter.next() else {
            continue;
        };
        if !d.is_empty() {
            d.push(' ');
        }
        d.push_str(&format!("M{} {}", num(*x), num(*y)));
        for (x, y) in iter {
            d.push_str(&format!(" L{} {}", num(*x), num(*y)));
        }
    }
    d
}
