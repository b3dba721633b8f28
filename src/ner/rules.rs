//! Rule-based entity extractors: PHONE, ADDRESS, WEAPON, EVIDENCE (P6).

use super::models::EntityType;
use once_cell::sync::Lazy;
use regex::Regex;

/// One rule-based match before chunk-confidence scaling is applied.
pub struct RuleMatch {
    pub entity_type: EntityType,
    pub text: String,
    pub start: usize,
    pub end: usize,
    pub base_confidence: f64,
}

static PHONE_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        Regex::new(r"\(?\d{3}\)?[-.\s]?\d{3}[-.\s]?\d{4}").unwrap(),
        Regex::new(r"\+\d{1,3}[-.\s]?\d{1,4}[-.\s]?\d{1,4}[-.\s]?\d{1,9}").unwrap(),
        Regex::new(r"\b\d{10}\b").unwrap(),
    ]
});

static ADDRESS_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        Regex::new(r"(?i)\b\d+\s+[A-Za-z0-9' ]+\s(?:Street|St|Avenue|Ave|Road|Rd|Boulevard|Blvd|Lane|Ln|Drive|Dr|Court|Ct|Place|Pl|Way|Circle|Cir|Terrace|Ter|Highway|Hwy)\.?\b")
            .unwrap(),
        Regex::new(r"(?i)\bP\.?O\.?\s*Box\s+\d+\b").unwrap(),
    ]
});

const WEAPON_KEYWORDS: &[&str] = &[
    "gun", "pistol", "revolver", "rifle", "shotgun", "firearm", "knife", "blade", "dagger",
    "machete", "sword", "baseball bat", "bat", "club", "hammer", "axe", "crowbar",
    "brass knuckles", "taser", "stun gun", "pepper spray", "mace",
];

const EVIDENCE_KEYWORDS: &[&str] = &[
    "fingerprint", "fingerprints", "dna", "blood", "hair", "fiber", "fibers", "footprint",
    "footprints", "shell casing", "shell casings", "bullet", "bullets", "cufflink", "cufflinks",
    "wallet", "id card", "driver's license", "license plate", "surveillance", "cctv", "camera",
    "photograph", "photographs", "document", "receipt", "phone records", "text messages", "email",
    "emails",
];

fn word_boundary_ok(text: &str, start: usize, end: usize) -> bool {
    let before_ok = text[..start].chars().last().map_or(true, |c| !c.is_alphanumeric());
    let after_ok = text[end..].chars().next().map_or(true, |c| !c.is_alphanumeric());
    before_ok && after_ok
}

fn keyword_matches(text: &str, keywords: &[&str], entity_type: EntityType, base_confidence: f64) -> Vec<RuleMatch> {
    let lower = text.to_lowercase();
    let mut matches = Vec::new();
    let mut seen_spans: Vec<(usize, usize)> = Vec::new();

    for keyword in keywords {
        let mut start = 0;
        while let Some(pos) = lower[start..].find(keyword) {
            let abs_start = start + pos;
            let abs_end = abs_start + keyword.len();
            if word_boundary_ok(&lower, abs_start, abs_end)
                && !seen_spans.iter().any(|(s, e)| *s < abs_end && abs_start < *e)
            {
                matches.push(RuleMatch {
                    entity_type,
                    text: text[abs_start..abs_end].to_string(),
                    start: abs_start,
                    end: abs_end,
                    base_confidence,
                });
                seen_spans.push((abs_start, abs_end));
            }
            start = abs_start + keyword.len().max(1);
        }
    }

    matches
}

/// Runs all four rule-based extractors over `text`, concatenating and
/// sorting the results by `start_char`. No cross-category dedup.
pub fn extract(text: &str) -> Vec<RuleMatch> {
    let mut out = Vec::new();

    let mut phone_spans: Vec<(usize, usize)> = Vec::new();
    for pattern in PHONE_PATTERNS.iter() {
        for m in pattern.find_iter(text) {
            if m.as_str().len() < 7 {
                continue;
            }
            if phone_spans.iter().any(|(s, e)| *s < m.end() && m.start() < *e) {
                continue;
            }
            phone_spans.push((m.start(), m.end()));
            out.push(RuleMatch {
                entity_type: EntityType::Phone,
                text: m.as_str().to_string(),
                start: m.start(),
                end: m.end(),
                base_confidence: 0.85,
            });
        }
    }

    let mut address_spans: Vec<(usize, usize)> = Vec::new();
    for pattern in ADDRESS_PATTERNS.iter() {
        for m in pattern.find_iter(text) {
            if address_spans.iter().any(|(s, e)| *s < m.end() && m.start() < *e) {
                continue;
            }
            address_spans.push((m.start(), m.end()));
            out.push(RuleMatch {
                entity_type: EntityType::Address,
                text: m.as_str().to_string(),
                start: m.start(),
                end: m.end(),
                base_confidence: 0.80,
            });
        }
    }

    out.extend(keyword_matches(text, WEAPON_KEYWORDS, EntityType::Weapon, 0.90));
    out.extend(keyword_matches(text, EVIDENCE_KEYWORDS, EntityType::Evidence, 0.85));

    out.sort_by_key(|m| m.start);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_phone_number() {
        let matches = extract("Call me at (555) 123-4567 tomorrow.");
        assert!(matches.iter().any(|m| m.entity_type == EntityType::Phone));
    }

    #[test]
    fn detects_address() {
        let matches = extract("She lives at 221 Baker Street.");
        assert!(matches.iter().any(|m| m.entity_type == EntityType::Address));
    }

    #[test]
    fn detects_weapon_keyword_case_preserved() {
        let matches = extract("He pulled out a Knife and threatened her.");
        let weapon = matches.iter().find(|m| m.entity_type == EntityType::Weapon).unwrap();
        assert_eq!(weapon.text, "Knife");
    }

    #[test]
    fn detects_evidence_keyword() {
        let matches = extract("Officers collected a fingerprint from the scene.");
        assert!(matches.iter().any(|m| m.entity_type == EntityType::Evidence));
    }

    #[test]
    fn results_sorted_by_start_char() {
        let matches = extract("The knife was found near the fingerprint and a wallet.");
        let starts: Vec<usize> = matches.iter().map(|m| m.start).collect();
        let mut sorted = starts.clone();
        sorted.sort();
        assert_eq!(starts, sorted);
    }
}
