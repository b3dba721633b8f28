//! Conflict flagging (P9 step 4). Conflicts are reported, never resolved.

use super::models::{TimelineConflict, TimelineEvent};
use std::collections::HashMap;

/// Buckets events by exact `iso` string equality; any bucket with ≥ 2
/// distinct non-null speakers becomes one conflict. Buckets need not be
/// built from pre-sorted input.
pub fn detect_conflicts(events: &[TimelineEvent]) -> Vec<TimelineConflict> {
    let mut buckets: HashMap<&str, Vec<&TimelineEvent>> = HashMap::new();
    for e in events {
        buckets.entry(e.iso.as_str()).or_default().push(e);
    }

    let mut isos: Vec<&&str> = buckets.keys().collect();
    isos.sort();

    let mut conflicts = Vec::new();
    for iso in isos {
        let bucket = &buckets[iso];
        if bucket.len() < 2 {
            continue;
        }
        let mut speakers: Vec<&str> = bucket
            .iter()
            .filter_map(|e| e.speaker.as_deref())
            .collect::<std::collections::HashSet<_>>()
            .into_iter()
            .collect();
        if speakers.len() < 2 {
            continue;
        }
        speakers.sort();

        let mut chunks: Vec<String> = bucket.iter().map(|e| e.chunk_id.clone()).collect();
        let mut event_ids: Vec<String> = bucket.iter().map(|e| e.event_id.clone()).collect();
        chunks.dedup();
        event_ids.dedup();

        let confidence = bucket.iter().map(|e| e.confidence).fold(f64::INFINITY, f64::min);

        conflicts.push(TimelineConflict {
            timestamp: iso.to_string(),
            conflicting_chunks: chunks,
            conflicting_event_ids: event_ids,
            reason: format!("Multiple events at same time with different speakers: {}", speakers.join(", ")),
            confidence,
        });
    }

    conflicts
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(event_id: &str, chunk_id: &str, iso: &str, speaker: Option<&str>, confidence: f64) -> TimelineEvent {
        TimelineEvent {
            event_id: event_id.to_string(),
            chunk_id: chunk_id.to_string(),
            document_id: "doc-1".to_string(),
            page_range: [1, 1],
            iso: iso.to_string(),
            speaker: speaker.map(String::from),
            description: "text".to_string(),
            confidence,
            original_index: 0,
        }
    }

    #[test]
    fn s8_three_events_two_distinct_speakers_one_conflict() {
        let events = vec![
            event("EVT_0001", "C-0001", "2024-03-15T09:00:00", Some("ALICE"), 0.9),
            event("EVT_0002", "C-0002", "2024-03-15T09:00:00", Some("BOB"), 0.8),
            event("EVT_0003", "C-0003", "2024-03-15T09:00:00", None, 0.95),
        ];
        let conflicts = detect_conflicts(&events);
        assert_eq!(conflicts.len(), 1);
        assert_eq!(conflicts[0].reason, "Multiple events at same time with different speakers: ALICE, BOB");
        assert_eq!(conflicts[0].confidence, 0.8);
        assert_eq!(conflicts[0].conflicting_event_ids.len(), 3);
    }

    #[test]
    fn same_speaker_bucket_is_not_a_conflict() {
        let events = vec![
            event("EVT_0001", "C-0001", "2024-03-15T09:00:00", Some("ALICE"), 0.9),
            event("EVT_0002", "C-0002", "2024-03-15T09:00:00", Some("ALICE"), 0.8),
        ];
        assert!(detect_conflicts(&events).is_empty());
    }

    #[test]
    fn null_only_speakers_are_not_a_conflict() {
        let events = vec![
            event("EVT_0001", "C-0001", "2024-03-15T09:00:00", None, 0.9),
            event("EVT_0002", "C-0002", "2024-03-15T09:00:00", None, 0.8),
        ];
        assert!(detect_conflicts(&events).is_empty());
    }
}
