//! Timestamp span grammar shared by P3 (raw extraction) and P4 (normalization).
//!
//! Patterns are grouped DATETIME, DATE, TIME, RELATIVE and matched in that
//! priority order; overlapping spans resolve to the longer match.

use once_cell::sync::Lazy;
use regex::Regex;

/// One timestamp-shaped span found in text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimestampSpan {
    pub start: usize,
    pub end: usize,
    pub text: String,
}

fn rx(pattern: &str) -> Regex {
    Regex::new(pattern).expect("static timestamp pattern must compile")
}

static DATETIME_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        rx(r"(?i)\b[A-Z][a-z]+ \d{1,2}(?:st|nd|rd|th)?,? \d{4} at \d{1,2}:\d{2}(?::\d{2})? ?[AaPp][Mm]\b"),
        rx(r"\b\d{1,2}[-/]\d{1,2}[-/]\d{2,4} \d{1,2}:\d{2}(?::\d{2})?\b"),
        rx(r"\b\d{4}-\d{2}-\d{2}[T ]\d{2}:\d{2}(?::\d{2})?(?:[+-]\d{2}:\d{2}|Z)?\b"),
    ]
});

static DATE_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        rx(r"(?i)\b\d{1,2}(?:st|nd|rd|th)? (?:of )?(?:January|February|March|April|May|June|July|August|September|October|November|December)(?:,? \d{4})?\b"),
        rx(r"(?i)\b(?:January|February|March|April|May|June|July|August|September|October|November|December) \d{1,2}(?:st|nd|rd|th)?(?:,? \d{4})?\b"),
        rx(r"(?i)\b\d{1,2}(?:st|nd|rd|th)? (?:of )?(?:Jan|Feb|Mar|Apr|Jun|Jul|Aug|Sep|Sept|Oct|Nov|Dec)\.?(?:,? \d{4})?\b"),
        rx(r"(?i)\b(?:Jan|Feb|Mar|Apr|Jun|Jul|Aug|Sep|Sept|Oct|Nov|Dec)\.? \d{1,2}(?:st|nd|rd|th)?(?:,? \d{4})?\b"),
        rx(r"\b\d{4}-\d{2}-\d{2}\b"),
        rx(r"\b\d{1,2}/\d{1,2}/\d{2,4}\b"),
        rx(r"\b\d{1,2}[-/]\d{1,2}[-/]\d{2,4}\b"),
        rx(r"\b\d{1,2}\.\d{1,2}\.\d{2,4}\b"),
        rx(r"(?i)\b(?:January|February|March|April|May|June|July|August|September|October|November|December) \d{4}\b"),
    ]
});

static TIME_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        rx(r"(?i)\b\d{1,2}:\d{2}(?::\d{2})? ?[AaPp][Mm]\b"),
        rx(r"\b\d{1,2}:\d{2}(?::\d{2})?\b"),
        rx(r"(?i)\b\d{4} ?(?:hours|hrs)\b"),
        rx(r"(?i)\b\d{1,2} o'clock(?: ?[AaPp][Mm])?\b"),
        rx(r"(?i)\b(?:around|approximately|about|approx\.?) \d{1,2}(?::\d{2})? ?[AaPp][Mm]\b"),
    ]
});

static RELATIVE_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        rx(r"(?i)\b(?:last|this|next) (?:monday|tuesday|wednesday|thursday|friday|saturday|sunday|week|month|year|night|morning|evening|afternoon)\b"),
        rx(r"(?i)\byesterday\b|\btoday\b|\btonight\b|\btomorrow\b"),
        rx(r"(?i)\bthe (?:night|morning|afternoon|evening) of\b"),
    ]
});

/// Extracts all timestamp-shaped spans from `text`, applying the fixed
/// DATETIME > DATE > TIME > RELATIVE priority and longer-span-wins overlap
/// resolution. Output is sorted by start position.
pub fn extract_timestamp_spans(text: &str) -> Vec<TimestampSpan> {
    let mut accepted: Vec<TimestampSpan> = Vec::new();

    let groups: [&Lazy<Vec<Regex>>; 4] = [
        &DATETIME_PATTERNS,
        &DATE_PATTERNS,
        &TIME_PATTERNS,
        &RELATIVE_PATTERNS,
    ];

    for group in groups {
        for pattern in group.iter() {
            for m in pattern.find_iter(text) {
                let candidate = TimestampSpan {
                    start: m.start(),
                    end: m.end(),
                    text: m.as_str().to_string(),
                };
                let overlap_idx = accepted
                    .iter()
                    .position(|a| spans_overlap(a.start, a.end, candidate.start, candidate.end));

                match overlap_idx {
                    None => accepted.push(candidate),
                    Some(idx) => {
                        let existing_len = accepted[idx].end - accepted[idx].start;
                        let candidate_len = candidate.end - candidate.start;
                        if candidate_len > existing_len {
                            accepted[idx] = candidate;
                        }
                    }
                }
            }
        }
    }

    accepted.sort_by_key(|s| s.start);
    accepted
}

fn spans_overlap(a_start: usize, a_end: usize, b_start: usize, b_end: usize) -> bool {
    a_start < b_end && b_start < a_end
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_simple_date() {
        let spans = extract_timestamp_spans("Where were you on March 15?");
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].text, "March 15");
    }

    #[test]
    fn extracts_time() {
        let spans = extract_timestamp_spans("It happened at 8:15 PM near the store.");
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].text, "8:15 PM");
    }

    #[test]
    fn longer_span_wins_on_overlap() {
        // "March 15, 2024 at 8:15 PM" should be captured whole by DATETIME,
        // not split into separate DATE + TIME spans.
        let spans = extract_timestamp_spans("March 15, 2024 at 8:15 PM");
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].text, "March 15, 2024 at 8:15 PM");
    }

    #[test]
    fn relative_reference_detected() {
        let spans = extract_timestamp_spans("I saw him yesterday evening.");
        assert!(spans.iter().any(|s| s.text.to_lowercase() == "yesterday"));
    }

    #[test]
    fn no_false_positive_on_mid_sentence_colon() {
        let spans = extract_timestamp_spans("He said 8:15 PM was when it started.");
        assert_eq!(spans.len(), 1);
    }
}
