//! Noise removal (P4 step 3).

use once_cell::sync::Lazy;
use regex::Regex;

static PAGE_BREAK: Lazy<Regex> = Lazy::new(|| Regex::new(r"[\x0C\x0B]+").unwrap());
static OCR_ARTIFACT_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"[|~\u{00AC}\u{00A6}]+").unwrap());
static PUNCTUATION_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"[.…\-_=]{5,}").unwrap());

/// Strips runs of OCR artifact characters that sit at a word boundary
/// (start-of-line/string or preceded by whitespace, and followed by
/// whitespace or end-of-line/string). The `regex` crate has no lookaround,
/// so boundaries are checked against the surrounding characters directly.
fn strip_ocr_artifacts(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len());
    let mut cursor = 0usize;

    for m in OCR_ARTIFACT_RUN.find_iter(text) {
        let start = text[..m.start()].chars().count();
        let end = text[..m.end()].chars().count();
        let before_ok = start == 0 || chars[start - 1].is_whitespace();
        let after_ok = end == chars.len() || chars[end].is_whitespace();

        if before_ok && after_ok {
            out.push_str(&text[cursor..m.start()]);
            cursor = m.end();
        }
    }
    out.push_str(&text[cursor..]);
    out
}

static SPACE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r" {2,}").unwrap());

/// Removes OCR/page-break noise without removing any word.
pub fn remove_noise(text: &str) -> String {
    let step_a = PAGE_BREAK.replace_all(text, "\n");
    let step_b = strip_ocr_artifacts(&step_a);
    let step_c = SPACE_RUN.replace_all(&step_b, " ");
    let step_d = PUNCTUATION_RUN.replace_all(&step_c, |caps: &regex::Captures| {
        let matched = &caps[0];
        let ch = matched.chars().next().unwrap();
        ch.to_string().repeat(3)
    });
    step_d.to_string()
}
