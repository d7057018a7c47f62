//! Property tests: normalizer/renderer consistency and marker safety.

use proptest::prelude::*;

use super::Renderer;
use crate::marker::{inject_markers, is_safe_color, parse_line};

/// A simple aligned ascii box diagram: label padded to the border width.
fn aligned_box() -> impl Strategy<Value = String> {
    ("[a-z]{1,8}", 0usize..4).prop_map(|(label, extra)| {
        let inner = label.len() + extra + 2;
        let border = format!("+{}+", "-".repeat(inner));
        let row = format!("| {label}{} |", " ".repeat(extra));
        format!("{border}\n{row}\n{border}")
    })
}

proptest! {
    #[test]
    fn normalize_never_panics(input in ".{0,200}") {
        let _ = Renderer::default().normalize(&input);
    }

    #[test]
    fn normalize_is_identity_on_aligned_boxes(input in aligned_box()) {
        prop_assert_eq!(Renderer::default().normalize(&input), input);
    }

    #[test]
    fn render_agrees_before_and_after_normalize(input in aligned_box()) {
        let engine = Renderer::default();
        let direct = engine.primitives(&input);
        let normalized = engine.normalize(&input);
        let roundabout = engine.primitives(&normalized);
        prop_assert_eq!(direct, roundabout);
    }

    #[test]
    fn values_with_call_syntax_are_never_safe(
        prefix in "[a-z]{0,6}",
        bad in prop::sample::select(vec!["(", ")", "{", "}", ";", "url("]),
        suffix in "[a-z]{0,6}",
    ) {
        let candidate = format!("{}{}{}", prefix, bad, suffix);
        prop_assert!(!is_safe_color(&candidate));
    }

    #[test]
    fn marker_parse_inject_round_trips(
        label in "[a-z ]{0,12}",
        column in 0usize..8,
        value in prop::sample::select(vec!["red", "#abc", "#aabbcc", "navy"]),
    ) {
        let mut raw = String::new();
        for (i, g) in label.chars().enumerate() {
            if i == column {
                raw.push_str(&format!("{{#color:{value}}}"));
            }
            raw.push(g);
        }
        let parsed = parse_line(&raw);
        let reinjected = inject_markers(&parsed.clean, &parsed.markers);
        let reparsed = parse_line(&reinjected);
        prop_assert_eq!(reparsed.clean, parsed.clean);
        prop_assert_eq!(reparsed.markers, parsed.markers);
    }
}
