//! Whitespace normalization (P4 step 2).

use once_cell::sync::Lazy;
use regex::Regex;

static TRAILING_CR: Lazy<Regex> = Lazy::new(|| Regex::new(r"\r\n?").unwrap());
static LINE_EDGE_HSPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[ \t]*\n[ \t]*").unwrap());
static HSPACE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"[ \t]+").unwrap());
static NEWLINE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{3,}").unwrap());

/// Applies the fixed whitespace normalization sub-order: newline
/// normalization, edge-trim around newlines, horizontal-space collapse,
/// excess-newline collapse, then outer trim.
pub fn normalize_whitespace(text: &str) -> String {
    let step_a = TRAILING_CR.replace_all(text, "\n");
    let step_b = LINE_EDGE_HSPACE.replace_all(&step_a, "\n");
    let step_c = HSPACE_RUN.replace_all(&step_b, " ");
    let step_d = NEWLINE_RUN.replace_all(&step_c, "\n\n");
    step_d.trim().to_string()
}
