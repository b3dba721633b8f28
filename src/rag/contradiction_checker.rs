//! Step 4: contradiction awareness (P11). Contradictions surface only as
//! limitations - never as prompt context, never resolved.

use super::models::{Contradiction, ContradictionSeverity};

/// Returns one limitation string per contradiction touching a retrieved
/// chunk, plus whether any of them is CRITICAL severity.
pub fn check(contradictions: &[Contradiction], retrieved_chunk_ids: &std::collections::HashSet<&str>) -> (Vec<String>, bool) {
    let mut limitations = Vec::new();
    let mut has_critical = false;

    for c in contradictions {
        if !retrieved_chunk_ids.contains(c.chunk_a.as_str()) && !retrieved_chunk_ids.contains(c.chunk_b.as_str()) {
            continue;
        }
        let limitation = match &c.explanation {
            Some(explanation) => format!("Evidence contradiction ({}): {}", c.severity.as_str(), explanation),
            None => format!("Evidence contradiction detected: {}", c.contradiction_type),
        };
        limitations.push(limitation);
        if c.severity == ContradictionSeverity::Critical {
            has_critical = true;
        }
    }

    (limitations, has_critical)
}
