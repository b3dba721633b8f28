//! Event materialisation (P9 step 1).

use super::models::TimelineEvent;
use crate::chunking::Chunk;
use crate::cleaning::NormalizedTimestampRecord;
use crate::ids;

/// Emits one event per chunk per non-null-iso timestamp, in chunk-then-
/// timestamp input order. The event-id counter runs across the whole
/// call, not per chunk.
pub fn build_events(case_id: &str, chunks: &[Chunk], timestamps_by_chunk: &[(String, Vec<NormalizedTimestampRecord>)]) -> Vec<TimelineEvent> {
    let mut counter = 0usize;
    let mut events = Vec::new();

    let chunk_by_id: std::collections::HashMap<&str, &Chunk> = chunks.iter().map(|c| (c.chunk_id.as_str(), c)).collect();

    for (chunk_id, timestamps) in timestamps_by_chunk {
        let Some(chunk) = chunk_by_id.get(chunk_id.as_str()) else { continue };
        for ts in timestamps {
            let Some(iso) = &ts.iso else { continue };
            counter += 1;
            events.push(TimelineEvent {
                event_id: ids::event_id(case_id, counter),
                chunk_id: chunk.chunk_id.clone(),
                document_id: chunk.document_id.clone(),
                page_range: chunk.page_range,
                iso: iso.clone(),
                speaker: chunk.speaker.clone(),
                description: chunk.text.clone(),
                confidence: chunk.chunk_confidence.min(ts.confidence),
                original_index: events.len(),
            });
        }
    }

    events
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunk(id: &str, text: &str, speaker: Option<&str>) -> Chunk {
        Chunk {
            chunk_id: id.to_string(),
            case_id: "case-1".to_string(),
            document_id: "doc-1".to_string(),
            page_range: [1, 1],
            speaker: speaker.map(String::from),
            text: text.to_string(),
            source_block_ids: vec!["b1".to_string()],
            token_count: text.split_whitespace().count(),
            chunk_confidence: 0.9,
        }
    }

    fn ts(iso: Option<&str>, confidence: f64) -> NormalizedTimestampRecord {
        NormalizedTimestampRecord { original: "x".to_string(), iso: iso.map(String::from), confidence }
    }

    #[test]
    fn event_ids_are_globally_sequential() {
        let chunks = vec![chunk("C-0001", "a", None), chunk("C-0002", "b", None)];
        let timestamps = vec![
            ("C-0001".to_string(), vec![ts(Some("2024-03-15T10:00:00"), 0.9)]),
            ("C-0002".to_string(), vec![ts(Some("2024-03-15T11:00:00"), 0.9)]),
        ];
        let events = build_events("case-1", &chunks, &timestamps);
        assert_eq!(events[0].event_id, "EVT_case_1_0001");
        assert_eq!(events[1].event_id, "EVT_case_1_0002");
    }

    #[test]
    fn null_iso_timestamps_are_skipped() {
        let chunks = vec![chunk("C-0001", "a", None)];
        let timestamps = vec![("C-0001".to_string(), vec![ts(None, 0.1)])];
        let events = build_events("case-1", &chunks, &timestamps);
        assert!(events.is_empty());
    }

    #[test]
    fn confidence_is_min_of_chunk_and_timestamp() {
        let chunks = vec![chunk("C-0001", "a", None)];
        let timestamps = vec![("C-0001".to_string(), vec![ts(Some("2024-03-15T10:00:00"), 0.5)])];
        let events = build_events("case-1", &chunks, &timestamps);
        assert_eq!(events[0].confidence, 0.5);
    }
}
