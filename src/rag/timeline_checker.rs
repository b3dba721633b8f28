//! Step 3: timeline consult (P11). Surfaces gaps/conflicts that fall
//! within the retrieved evidence's time range - never resolves them.

use crate::timeline::{GapSeverity, TimelineConflict, TimelineEvent, TimelineGap};
use std::collections::HashSet;

/// A timeline event filtered to the retrieved chunk set, ready for
/// prompt-context rendering.
pub struct RelevantEvent<'a> {
    pub timestamp: &'a str,
    pub description: &'a str,
}

fn severity_str(severity: &GapSeverity) -> &'static str {
    match severity {
        GapSeverity::Moderate => "MODERATE",
        GapSeverity::Significant => "SIGNIFICANT",
    }
}

/// Returns the timeline events relevant to the retrieved chunks (sorted
/// by timestamp string), plus any gap/conflict limitation strings.
pub fn consult<'a>(
    events: &'a [TimelineEvent],
    gaps: &[TimelineGap],
    conflicts: &[TimelineConflict],
    retrieved_chunk_ids: &HashSet<&str>,
) -> (Vec<RelevantEvent<'a>>, Vec<String>) {
    let mut relevant: Vec<&TimelineEvent> = events.iter().filter(|e| retrieved_chunk_ids.contains(e.chunk_id.as_str())).collect();
    relevant.sort_by(|a, b| a.iso.cmp(&b.iso));

    let mut limitations = Vec::new();

    if relevant.len() >= 2 {
        let range_min = relevant.first().unwrap().iso.as_str();
        let range_max = relevant.last().unwrap().iso.as_str();

        for gap in gaps {
            if gap.start.as_str() >= range_min && gap.end.as_str() <= range_max {
                limitations.push(format!(
                    "Timeline contains a {}-minute gap between {} and {} ({})",
                    gap.duration_minutes,
                    gap.start,
                    gap.end,
                    severity_str(&gap.severity)
                ));
            }
        }
    }

    for conflict in conflicts {
        if conflict.conflicting_chunks.iter().any(|c| retrieved_chunk_ids.contains(c.as_str())) {
            limitations.push(format!("Conflicting information at {}", conflict.timestamp));
        }
    }

    let relevant_events = relevant
        .into_iter()
        .map(|e| RelevantEvent { timestamp: e.iso.as_str(), description: e.description.as_str() })
        .collect();

    (relevant_events, limitations)
}
