//! Speaker-label detection and normalization (P3).

use once_cell::sync::Lazy;
use regex::Regex;

/// Ordered specific -> general speaker-prefix patterns. Rank prefixes are
/// tried first so "DET. SMITH:" doesn't fall through to the generic
/// all-caps or catch-all rules.
static SPEAKER_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        Regex::new(r"^(DET\.?|DETECTIVE|OFFICER|OFC\.?|SGT\.?|SERGEANT|LT\.?|LIEUTENANT|DR\.?|DOCTOR)\s+([A-Z][A-Za-z'\-]*(?:\s+[A-Z][A-Za-z'\-]*)?):\s*")
            .unwrap(),
        Regex::new(r"^([A-Z][a-z]+\s+[A-Z][a-z]+):\s*").unwrap(),
        Regex::new(r"^([A-Z][A-Z'\-]+(?:\s+[A-Z][A-Z'\-]+)*):\s*").unwrap(),
        Regex::new(r"^([A-Za-z][A-Za-z'\-]*):\s*").unwrap(),
    ]
});

/// Collapses internal whitespace and upper-cases. Rank abbreviations
/// ("DET.", "SGT.") are left as written in the source - the detection
/// path does not expand them.
fn normalize_speaker(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ").to_uppercase()
}

/// Splits a block's text into `(speaker, remainder)`. If no pattern
/// matches, returns `(None, original_text)`.
pub fn split_speaker(text: &str) -> (Option<String>, String) {
    for pattern in SPEAKER_PATTERNS.iter() {
        if let Some(caps) = pattern.captures(text) {
            let whole = caps.get(0).unwrap();
            let prefix = if caps.len() > 2 {
                // rank-prefix pattern: group 1 is the rank, group 2 the name
                format!("{} {}", caps.get(1).unwrap().as_str(), caps.get(2).unwrap().as_str())
            } else {
                caps.get(1).unwrap().as_str().to_string()
            };
            let remainder = text[whole.end()..].to_string();
            return (Some(normalize_speaker(&prefix)), remainder);
        }
    }
    (None, text.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_rank_prefixed_speaker() {
        let (speaker, rest) = split_speaker("DET. SMITH: Where were you on March 15?");
        assert_eq!(speaker.as_deref(), Some("DET. SMITH"));
        assert_eq!(rest, "Where were you on March 15?");
    }

    #[test]
    fn detects_two_word_name() {
        let (speaker, rest) = split_speaker("John Smith: I was at home.");
        assert_eq!(speaker.as_deref(), Some("JOHN SMITH"));
        assert_eq!(rest, "I was at home.");
    }

    #[test]
    fn does_not_trigger_on_time_colon() {
        let (speaker, rest) = split_speaker("8:15 PM is when I arrived.");
        assert_eq!(speaker, None);
        assert_eq!(rest, "8:15 PM is when I arrived.");
    }

    #[test]
    fn no_match_returns_full_text() {
        let (speaker, rest) = split_speaker("a plain sentence with no label");
        assert_eq!(speaker, None);
        assert_eq!(rest, "a plain sentence with no label");
    }
}
