//! Auto-format: width normalization of raw diagram text before rendering.
//!
//! Works on raw lines, never the grid, but classifies characters through
//! the same predicates the renderer uses — that shared table is the only
//! thing keeping the two passes in agreement about what is structure.
//! Style markers are stripped for measuring and re-injected into the
//! final text, so marker syntax never skews widths.

use crate::classify::{self, Mode};
use crate::marker::{inject_markers, parse_line, ParsedLine};
use crate::text::text_width;

#[cfg(test)]
#[path = "format_test.rs"]
mod format_test;

/// Normalize a whole document. Total: never fails, returns the input
/// shape (blank lines and block gaps verbatim) with block widths aligned.
#[must_use]
pub fn normalize(input: &str) -> String {
    let mode = Mode::detect(input);
    let lines: Vec<&str> = input.lines().collect();
    let mut out: Vec<String> = Vec::with_capacity(lines.len());

    let mut i = 0;
    while i < lines.len() {
        if lines[i].trim().is_empty() {
            out.push(lines[i].to_owned());
            i += 1;
            continue;
        }
        let mut j = i;
        while j < lines.len() && !lines[j].trim().is_empty() {
            j += 1;
        }
        normalize_block(&lines[i..j], mode, &mut out);
        i = j;
    }

    let mut result = out.join("\n");
    if input.ends_with('\n') {
        result.push('\n');
    }
    result
}

/// Normalize one block: a maximal run of non-blank lines.
fn normalize_block(block: &[&str], mode: Mode, out: &mut Vec<String>) {
    let parsed: Vec<ParsedLine> = block.iter().map(|line| parse_line(line)).collect();
    let widths: Vec<usize> = parsed
        .iter()
        .map(|p| text_width(p.clean.trim_end(), mode))
        .collect();
    let max_width = widths.iter().copied().max().unwrap_or(0);

    for ((raw, parsed), width) in block.iter().zip(&parsed).zip(widths) {
        out.push(normalize_line(raw, parsed, width, max_width, mode));
    }
}

/// Normalize one line. First matching rule wins; most lines pass
/// through untouched.
fn normalize_line(raw: &str, parsed: &ParsedLine, width: usize, max_width: usize, mode: Mode) -> String {
    let clean = parsed.clean.trim_end();
    let trimmed = clean.trim_start();
    if trimmed.is_empty() {
        return raw.to_owned();
    }

    // 1. Bare connector stubs keep their indentation exactly.
    if trimmed == "|" || trimmed == "+" {
        return raw.to_owned();
    }

    // 2. Pure connector rows (walls, stubs, joints) with no rule glyph
    // to extend are never reshaped.
    let all_structural = trimmed.chars().all(|c| c.is_whitespace() || mode.is_structure(c));
    if all_structural && !trimmed.chars().any(classify::is_horizontal_rule) {
        return raw.to_owned();
    }

    // 3. Plain prose outside boxes is never reflowed.
    let first = trimmed.chars().next().unwrap_or(' ');
    let last = trimmed.chars().next_back().unwrap_or(' ');
    if !mode.is_structure(first) && !mode.is_structure(last) && !is_center_form(trimmed) {
        return raw.to_owned();
    }

    let prefix = mode.is_structure(first).then_some(first);
    let suffix = (trimmed.chars().count() > 1 && mode.is_structure(last)).then_some(last);
    let indent = clean.chars().take_while(|c| c.is_whitespace()).count();

    // 4. Indentation-driven nested boxes (and all rich-mode boxes) are
    // not forced to full width.
    if prefix.is_some() && suffix.is_some() && (indent > 0 || mode.is_rich()) && width < max_width {
        return raw.to_owned();
    }

    let interior = strip_ends(trimmed, prefix.is_some(), suffix.is_some());
    let interior_trimmed = interior.trim();

    // 5. Centered content is balanced out to the block width, extra
    // space flooring to the left.
    if is_center_form(interior_trimmed) {
        let fixed = indent + usize::from(prefix.is_some()) + usize::from(suffix.is_some());
        let content_width = text_width(interior_trimmed, mode);
        let total_pad = max_width.saturating_sub(fixed + content_width);
        let left = total_pad / 2;
        let right = total_pad - left;

        let mut new_clean = " ".repeat(indent);
        if let Some(p) = prefix {
            new_clean.push(p);
        }
        new_clean.push_str(&" ".repeat(left));
        new_clean.push_str(interior_trimmed);
        new_clean.push_str(&" ".repeat(right));
        if let Some(s) = suffix {
            new_clean.push(s);
        }
        return reinject(parsed, new_clean);
    }

    // 6. Border rows stretch with their dominant rule character.
    let empty_between_joints = interior_trimmed.is_empty()
        && prefix.is_some_and(classify::joins_at_center)
        && suffix.is_some_and(classify::joins_at_center);
    if suffix.is_some() && (is_rule_pattern(interior_trimmed) || empty_between_joints) {
        let needed = max_width.saturating_sub(width);
        if needed == 0 {
            return raw.to_owned();
        }
        let rule = dominant_rule(interior_trimmed, mode);
        let mut new_clean: String = clean.chars().take(clean.chars().count() - 1).collect();
        new_clean.push_str(&rule.to_string().repeat(needed));
        new_clean.push(last);
        tracing::debug!(width, max_width, "stretched border row");
        return reinject(parsed, new_clean);
    }

    raw.to_owned()
}

/// Whether trimmed text is a centering marker: `^...^` or unbounded
/// `^...`, excluding the literal escape `^^`.
fn is_center_form(trimmed: &str) -> bool {
    trimmed.starts_with('^') && trimmed != "^^" && trimmed.chars().count() > 1
}

/// Whether text is purely a horizontal-rule pattern (rules plus the
/// joints that interrupt them).
fn is_rule_pattern(text: &str) -> bool {
    !text.is_empty()
        && text
            .chars()
            .all(|c| classify::is_horizontal_rule(c) || classify::joins_at_center(c))
}

/// The rule character used to extend a border: `═` over `─` over `-`,
/// whichever is present.
fn dominant_rule(interior: &str, mode: Mode) -> char {
    if interior.contains('═') {
        '═'
    } else if interior.contains('─') {
        '─'
    } else if interior.contains('-') {
        '-'
    } else if mode.is_rich() {
        '─'
    } else {
        '-'
    }
}

/// Drop the first and/or last character of trimmed text.
fn strip_ends(trimmed: &str, drop_first: bool, drop_last: bool) -> &str {
    let mut s = trimmed;
    if drop_first {
        let mut chars = s.chars();
        chars.next();
        s = chars.as_str();
    }
    if drop_last {
        let mut chars = s.chars();
        chars.next_back();
        s = chars.as_str();
    }
    s
}

/// Re-insert this line's style markers into rebuilt text.
fn reinject(parsed: &ParsedLine, new_clean: String) -> String {
    if parsed.markers.is_empty() {
        // No accepted markers; no-op marker syntax stays dropped.
        return new_clean;
    }
    inject_markers(&new_clean, &parsed.markers)
}
