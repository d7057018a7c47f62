//! Vector primitives emitted by the renderer.
//!
//! A primitive is a kind tag, a bounding position, and an open-ended
//! `props` JSON bag; the surface backend reads the bag back through the
//! typed [`Props`] accessor. Keeping the bag open-ended lets surface
//! implementations pass through attributes the engine does not interpret.

use serde::{Deserialize, Serialize};

use crate::consts::{DEFAULT_FONT_SIZE, DEFAULT_STROKE_WIDTH, DEFAULT_TEXT_FILL};

#[cfg(test)]
#[path = "primitive_test.rs"]
mod primitive_test;

/// The kind of an emitted primitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrimitiveKind {
    /// All structural line segments as one move/line command sequence.
    Path,
    /// A filled and/or stroked rectangle for box styling.
    Rect,
    /// A positioned text label.
    Text,
}

/// Horizontal anchor of a text primitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAnchor {
    /// Anchor at the left edge of the text.
    Start,
    /// Anchor at the horizontal center of the text.
    Middle,
    /// Anchor at the right edge of the text.
    End,
}

impl TextAnchor {
    /// The SVG `text-anchor` attribute value.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Middle => "middle",
            Self::End => "end",
        }
    }
}

/// One drawable element, positioned in output units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Primitive {
    /// What to draw.
    pub kind: PrimitiveKind,
    /// Anchor x in output units (left edge for rects, anchor point for text).
    pub x: f64,
    /// Anchor y in output units.
    pub y: f64,
    /// Width in output units; 0 for paths and text.
    pub width: f64,
    /// Height in output units; 0 for paths and text.
    pub height: f64,
    /// Open-ended per-kind properties (path data, colors, anchor, text).
    pub props: serde_json::Value,
}

impl Primitive {
    /// A path primitive carrying the full structural line data.
    #[must_use]
    pub fn path(d: String, stroke: &str, stroke_width: f64) -> Self {
        Self {
            kind: PrimitiveKind::Path,
            x: 0.0,
            y: 0.0,
            width: 0.0,
            height: 0.0,
            props: serde_json::json!({
                "d": d,
                "stroke": stroke,
                "strokeWidth": stroke_width,
            }),
        }
    }

    /// A rectangle primitive for box fill/stroke styling.
    #[must_use]
    pub fn rect(x: f64, y: f64, width: f64, height: f64, fill: Option<&str>, stroke: Option<&str>, stroke_width: f64) -> Self {
        let mut props = serde_json::json!({ "strokeWidth": stroke_width });
        if let Some(obj) = props.as_object_mut() {
            if let Some(fill) = fill {
                obj.insert("fill".into(), serde_json::json!(fill));
            }
            if let Some(stroke) = stroke {
                obj.insert("stroke".into(), serde_json::json!(stroke));
            }
        }
        Self { kind: PrimitiveKind::Rect, x, y, width, height, props }
    }

    /// A text primitive anchored at `(x, y)`.
    #[must_use]
    pub fn text(x: f64, y: f64, content: &str, anchor: TextAnchor, fill: &str, font_size: f64) -> Self {
        Self {
            kind: PrimitiveKind::Text,
            x,
            y,
            width: 0.0,
            height: 0.0,
            props: serde_json::json!({
                "text": content,
                "anchor": anchor.as_str(),
                "fill": fill,
                "fontSize": font_size,
            }),
        }
    }

    /// Typed view of this primitive's props.
    #[must_use]
    pub fn props(&self) -> Props<'_> {
        Props::new(&self.props)
    }
}

/// Typed access to common props fields from a [`Primitive::props`] bag.
pub struct Props<'a> {
    value: &'a serde_json::Value,
}

impl<'a> Props<'a> {
    /// Wrap a reference to a `props` JSON value for typed access.
    #[must_use]
    pub fn new(value: &'a serde_json::Value) -> Self {
        Self { value }
    }

    /// Path data (`d` attribute). Empty string when absent.
    #[must_use]
    pub fn d(&self) -> &str {
        self.value.get("d").and_then(|v| v.as_str()).unwrap_or("")
    }

    /// Fill color, if set. Rects without a fill are not filled.
    #[must_use]
    pub fn fill(&self) -> Option<&str> {
        self.value.get("fill").and_then(|v| v.as_str())
    }

    /// Stroke color, if set. Rects without a stroke are not stroked.
    #[must_use]
    pub fn stroke(&self) -> Option<&str> {
        self.value.get("stroke").and_then(|v| v.as_str())
    }

    /// Stroke width in output units.
    #[must_use]
    pub fn stroke_width(&self) -> f64 {
        self.value
            .get("strokeWidth")
            .and_then(serde_json::Value::as_f64)
            .unwrap_or(DEFAULT_STROKE_WIDTH)
    }

    /// Label text. Empty string when absent.
    #[must_use]
    pub fn text(&self) -> &str {
        self.value.get("text").and_then(|v| v.as_str()).unwrap_or("")
    }

    /// Horizontal text anchor. Defaults to start.
    #[must_use]
    pub fn anchor(&self) -> TextAnchor {
        match self.value.get("anchor").and_then(|v| v.as_str()) {
            Some("middle") => TextAnchor::Middle,
            Some("end") => TextAnchor::End,
            _ => TextAnchor::Start,
        }
    }

    /// Text fill color with the engine default.
    #[must_use]
    pub fn text_fill(&self) -> &str {
        self.fill().unwrap_or(DEFAULT_TEXT_FILL)
    }

    /// Font size in output units.
    #[must_use]
    pub fn font_size(&self) -> f64 {
        self.value
            .get("fontSize")
            .and_then(serde_json::Value::as_f64)
            .unwrap_or(DEFAULT_FONT_SIZE)
    }
}
