//! Section header detection (P3).

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;

const MAX_SECTION_HEADER_LENGTH: usize = 50;

static CANONICAL_SECTIONS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "STATEMENT", "INTERVIEW", "OBSERVATIONS", "SUMMARY", "BACKGROUND",
        "EVIDENCE", "CONCLUSION", "WITNESS STATEMENT", "INCIDENT REPORT",
        "NARRATIVE", "INTRODUCTION", "FINDINGS", "ANALYSIS", "TIMELINE",
        "SCENE DESCRIPTION", "SUSPECT INFORMATION", "VICTIM INFORMATION",
        "PHYSICAL EVIDENCE", "DIGITAL EVIDENCE", "FOLLOW-UP", "FOLLOW UP",
        "DISPOSITION", "RECOMMENDATIONS", "CASE SUMMARY", "CASE DETAILS",
        "REPORTING OFFICER", "INVESTIGATING OFFICER", "PERSONS INVOLVED",
        "NARRATIVE SUMMARY", "SUPPLEMENTAL REPORT", "ARREST REPORT",
        "PROBABLE CAUSE", "CHAIN OF CUSTODY", "EXHIBIT LIST", "APPENDIX",
        "ATTACHMENTS", "NOTES", "ADDITIONAL INFORMATION", "DISCLAIMER",
        "CERTIFICATION", "SIGNATURE", "REVIEW", "APPROVAL", "CLOSING STATEMENT",
        "PRELIMINARY FINDINGS", "SUPPORTING DOCUMENTS",
    ]
    .into_iter()
    .collect()
});

static STRUCTURAL_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        Regex::new(r"^\d+\.\s").unwrap(),
        Regex::new(r"^[A-Z]\.\s").unwrap(),
        Regex::new(r"^[-_=]{3,}$").unwrap(),
        Regex::new(r"^[IVXLCDM]+\.\s").unwrap(),
    ]
});

fn is_mostly_uppercase(text: &str) -> bool {
    let alpha: Vec<char> = text.chars().filter(|c| c.is_alphabetic()).collect();
    if alpha.is_empty() {
        return false;
    }
    let upper = alpha.iter().filter(|c| c.is_uppercase()).count();
    (upper as f64) / (alpha.len() as f64) >= 0.9
}

/// Returns true if `text` should be treated as a section header.
pub fn is_section_header(text: &str) -> bool {
    let trimmed = text.trim();
    if trimmed.len() > MAX_SECTION_HEADER_LENGTH {
        return false;
    }
    let normalized = trimmed.split_whitespace().collect::<Vec<_>>().join(" ").to_uppercase();
    if CANONICAL_SECTIONS.contains(normalized.as_str()) {
        return true;
    }
    if STRUCTURAL_PATTERNS.iter().any(|p| p.is_match(trimmed)) {
        return true;
    }
    trimmed.len() <= 30 && is_mostly_uppercase(trimmed)
}

/// Returns the canonical section label for a detected header (its
/// normalized, whitespace-collapsed uppercase form).
pub fn canonical_label(text: &str) -> String {
    text.trim().split_whitespace().collect::<Vec<_>>().join(" ").to_uppercase()
}
