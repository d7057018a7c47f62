//! Inline styling markers: `{#color:V}`, `{#bg:V}`, `{#stroke:V}`.
//!
//! Markers are stripped from the visible text before the grid is built,
//! so no later component ever sees marker syntax. Each accepted marker
//! records the grapheme column it occupied in the *stripped* line; that
//! is the coordinate space every downstream consumer works in.

use crate::text::split_graphemes;

#[cfg(test)]
#[path = "marker_test.rs"]
mod marker_test;

/// What a style marker controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerKind {
    /// Text fill color from this column onward on the same row.
    Color,
    /// Background fill of the innermost enclosing box.
    Bg,
    /// Border stroke of the innermost enclosing box.
    Stroke,
}

impl MarkerKind {
    fn from_key(key: &str) -> Option<Self> {
        match key.to_ascii_lowercase().as_str() {
            "color" => Some(Self::Color),
            "bg" => Some(Self::Bg),
            "stroke" => Some(Self::Stroke),
            _ => None,
        }
    }

    /// Marker key as written in source text.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Color => "color",
            Self::Bg => "bg",
            Self::Stroke => "stroke",
        }
    }
}

/// One accepted style marker from one source line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleMarker {
    /// What the marker controls.
    pub kind: MarkerKind,
    /// Validated color value (lowercased).
    pub value: String,
    /// Grapheme index into the stripped line where the marker occurred.
    pub column: usize,
}

impl StyleMarker {
    /// The marker's literal source syntax.
    #[must_use]
    pub fn to_syntax(&self) -> String {
        format!("{{#{}:{}}}", self.kind.as_str(), self.value)
    }
}

/// Result of stripping style markers from one raw line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedLine {
    /// The line with all marker syntax removed.
    pub clean: String,
    /// Accepted markers in source order.
    pub markers: Vec<StyleMarker>,
    /// Whether any marker syntax (accepted or not) was removed.
    pub had_markers: bool,
}

/// Strip style markers from a raw line.
///
/// Unknown kinds and rejected values are zero-width no-ops: their syntax
/// is removed from the clean line but no marker is recorded. Text that
/// merely resembles a marker (no `#`, no `:`, unterminated) is kept
/// verbatim. Re-parsing the clean line finds no markers.
#[must_use]
pub fn parse_line(raw: &str) -> ParsedLine {
    let graphemes = split_graphemes(raw);
    let mut clean = String::with_capacity(raw.len());
    let mut column = 0;
    let mut markers = Vec::new();
    let mut had_markers = false;

    let mut i = 0;
    while i < graphemes.len() {
        if graphemes[i] == "{" {
            if let Some((consumed, parsed)) = scan_marker(&graphemes[i..]) {
                had_markers = true;
                if let Some((kind, value)) = parsed {
                    markers.push(StyleMarker { kind, value, column });
                }
                i += consumed;
                continue;
            }
        }
        clean.push_str(graphemes[i]);
        column += 1;
        i += 1;
    }

    ParsedLine { clean, markers, had_markers }
}

/// Try to scan `{#kind:value}` at the start of `graphemes`.
///
/// Returns the number of graphemes consumed and, for accepted markers,
/// the kind/value pair. `None` means this is not marker syntax at all.
fn scan_marker(graphemes: &[&str]) -> Option<(usize, Option<(MarkerKind, String)>)> {
    if graphemes.get(1).copied() != Some("#") {
        return None;
    }
    let close = graphemes.iter().position(|g| *g == "}")?;
    let body: String = graphemes[2..close].concat();
    let (key, value) = body.split_once(':')?;
    if key.is_empty() || body.contains('{') {
        return None;
    }

    let accepted = MarkerKind::from_key(key).and_then(|kind| {
        if is_safe_color(value) {
            Some((kind, value.trim().to_ascii_lowercase()))
        } else {
            None
        }
    });
    Some((close + 1, accepted))
}

/// Re-insert marker syntax into a clean line at the recorded columns.
///
/// Inverse of [`parse_line`] up to value formatting; used to serialize
/// normalized lines back out. Columns past the end of the line append.
#[must_use]
pub fn inject_markers(clean: &str, markers: &[StyleMarker]) -> String {
    if markers.is_empty() {
        return clean.to_owned();
    }
    let graphemes = split_graphemes(clean);
    let mut out = String::with_capacity(clean.len() + markers.len() * 12);
    let mut pending = markers.iter().peekable();
    for (i, g) in graphemes.iter().enumerate() {
        while let Some(m) = pending.next_if(|m| m.column <= i) {
            out.push_str(&m.to_syntax());
        }
        out.push_str(g);
    }
    for m in pending {
        out.push_str(&m.to_syntax());
    }
    out
}

/// CSS named colors accepted as marker values. Sorted for binary search.
const NAMED_COLORS: [&str; 52] = [
    "aqua",
    "aquamarine",
    "beige",
    "black",
    "blue",
    "brown",
    "chocolate",
    "coral",
    "crimson",
    "cyan",
    "darkblue",
    "darkgray",
    "darkgreen",
    "darkorange",
    "darkred",
    "dimgray",
    "fuchsia",
    "gainsboro",
    "gold",
    "gray",
    "green",
    "hotpink",
    "indigo",
    "ivory",
    "khaki",
    "lavender",
    "lightblue",
    "lightgray",
    "lightgreen",
    "lightyellow",
    "lime",
    "magenta",
    "maroon",
    "navy",
    "olive",
    "orange",
    "orchid",
    "pink",
    "plum",
    "purple",
    "red",
    "salmon",
    "silver",
    "skyblue",
    "slategray",
    "tan",
    "teal",
    "tomato",
    "turquoise",
    "violet",
    "white",
    "yellow",
];

/// Whether a marker value is a safe, renderable color.
///
/// Allowed: 3- or 6-digit hex (`#abc`, `#aabbcc`) and the named-color
/// allow-list. Anything containing `(`, `)`, `{`, `}`, `;` or the
/// substring `url(` is rejected outright.
#[must_use]
pub fn is_safe_color(value: &str) -> bool {
    let v = value.trim();
    if v.is_empty() || v.contains(['(', ')', '{', '}', ';']) || v.to_ascii_lowercase().contains("url(") {
        return false;
    }
    if let Some(hex) = v.strip_prefix('#') {
        return matches!(hex.len(), 3 | 6) && hex.chars().all(|c| c.is_ascii_hexdigit());
    }
    NAMED_COLORS.binary_search(&v.to_ascii_lowercase().as_str()).is_ok()
}
