//! Drawing surfaces: where primitives land.
//!
//! This module is the only place that produces output markup. The engine
//! hands finished [`Primitive`]s across the [`Surface`] trait and never
//! retains the surface; hosts with their own document model implement
//! the trait, everyone else uses [`SvgSurface`].

use crate::primitive::{Primitive, PrimitiveKind};

#[cfg(test)]
#[path = "svg_test.rs"]
mod svg_test;

/// Error constructing a drawing surface.
///
/// This is the engine's only fatal error: input malformation never fails,
/// but without a surface there is nothing to render onto.
#[derive(Debug, thiserror::Error)]
#[error("cannot construct drawing surface: {0}")]
pub struct SurfaceError(pub String);

/// A drawing surface that accepts primitives and yields final output.
pub trait Surface: Sized {
    /// Construct a surface of the given pixel dimensions.
    ///
    /// # Errors
    ///
    /// Returns [`SurfaceError`] when the environment cannot provide a
    /// surface (for example, non-finite dimensions for a markup surface).
    fn create(width: f64, height: f64) -> Result<Self, SurfaceError>;

    /// Append one primitive to the output tree.
    fn append(&mut self, primitive: &Primitive);

    /// Consume the surface and return its serialized output.
    fn finish(self) -> String;
}

/// A [`Surface`] that builds standalone SVG markup.
#[derive(Debug, Clone)]
pub struct SvgSurface {
    width: f64,
    height: f64,
    body: String,
}

impl Surface for SvgSurface {
    fn create(width: f64, height: f64) -> Result<Self, SurfaceError> {
        if !width.is_finite() || !height.is_finite() {
            return Err(SurfaceError(format!("non-finite dimensions {width}x{height}")));
        }
        Ok(Self { width, height, body: String::new() })
    }

    fn append(&mut self, primitive: &Primitive) {
        let props = primitive.props();
        match primitive.kind {
            PrimitiveKind::Path => {
                self.body.push_str(&format!(
                    "<path d=\"{}\" fill=\"none\" stroke=\"{}\" stroke-width=\"{}\" stroke-linecap=\"round\"/>",
                    escape(props.d()),
                    escape(props.stroke().unwrap_or("none")),
                    num(props.stroke_width()),
                ));
            }
            PrimitiveKind::Rect => {
                let mut attrs = format!(
                    "x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\"",
                    num(primitive.x),
                    num(primitive.y),
                    num(primitive.width),
                    num(primitive.height),
                );
                match props.fill() {
                    Some(fill) => attrs.push_str(&format!(" fill=\"{}\"", escape(fill))),
                    None => attrs.push_str(" fill=\"none\""),
                }
                if let Some(stroke) = props.stroke() {
                    attrs.push_str(&format!(
                        " stroke=\"{}\" stroke-width=\"{}\"",
                        escape(stroke),
                        num(props.stroke_width()),
                    ));
                }
                self.body.push_str(&format!("<rect {attrs}/>"));
            }
            PrimitiveKind::Text => {
                self.body.push_str(&format!(
                    "<text x=\"{}\" y=\"{}\" text-anchor=\"{}\" dominant-baseline=\"central\" \
                     fill=\"{}\" font-family=\"monospace\" font-size=\"{}\">{}</text>",
                    num(primitive.x),
                    num(primitive.y),
                    props.anchor().as_str(),
                    escape(props.text_fill()),
                    num(props.font_size()),
                    escape(props.text()),
                ));
            }
        }
    }

    fn finish(self) -> String {
        format!(
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{w}\" height=\"{h}\" viewBox=\"0 0 {w} {h}\">{body}</svg>",
            w = num(self.width),
            h = num(self.height),
            body = self.body,
        )
    }
}

/// Format a coordinate, rounding away float noise.
pub(crate) fn num(v: f64) -> String {
    let rounded = (v * 100.0).round() / 100.0;
    format!("{rounded}")
}

/// Escape text for XML attribute and content positions.
fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(ch),
        }
    }
    out
}
