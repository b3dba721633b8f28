//! Gap detection over a sorted event sequence (P9 step 3).

use super::models::{GapSeverity, TimelineEvent, TimelineGap};
use chrono::{DateTime, NaiveDateTime};

fn parse(iso: &str) -> Option<NaiveDateTime> {
    DateTime::parse_from_rfc3339(iso)
        .map(|dt| dt.naive_utc())
        .or_else(|_| NaiveDateTime::parse_from_str(iso, "%Y-%m-%dT%H:%M:%S"))
        .ok()
}

/// Detects gaps between consecutive sorted events. Pairs where either
/// side fails to parse are skipped entirely (not even considered a gap
/// of unknown length). Gaps shorter than `gap_threshold_minutes` are not
/// tracked at all.
pub fn detect_gaps(sorted_events: &[TimelineEvent], gap_threshold_minutes: i64, significant_gap_minutes: i64) -> Vec<TimelineGap> {
    let mut gaps = Vec::new();
    for pair in sorted_events.windows(2) {
        let (a, b) = (&pair[0], &pair[1]);
        let (Some(t1), Some(t2)) = (parse(&a.iso), parse(&b.iso)) else { continue };
        let elapsed_seconds = (t2 - t1).num_seconds();
        let duration_minutes = elapsed_seconds / 60;
        if duration_minutes < gap_threshold_minutes {
            continue;
        }
        let severity = if duration_minutes >= significant_gap_minutes {
            GapSeverity::Significant
        } else {
            GapSeverity::Moderate
        };
        gaps.push(TimelineGap {
            start: a.iso.clone(),
            end: b.iso.clone(),
            duration_minutes,
            severity,
        });
    }
    gaps
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(iso: &str) -> TimelineEvent {
        TimelineEvent {
            event_id: "EVT_0001".to_string(),
            chunk_id: "C-0001".to_string(),
            document_id: "doc-1".to_string(),
            page_range: [1, 1],
            iso: iso.to_string(),
            speaker: None,
            description: "text".to_string(),
            confidence: 0.9,
            original_index: 0,
        }
    }

    #[test]
    fn s8_ninety_minute_gap_is_moderate() {
        let events = vec![event("2024-03-15T09:00:00"), event("2024-03-15T10:30:00")];
        let gaps = detect_gaps(&events, 60, 120);
        assert_eq!(gaps.len(), 1);
        assert_eq!(gaps[0].duration_minutes, 90);
        assert_eq!(gaps[0].severity, GapSeverity::Moderate);
    }

    #[test]
    fn gap_below_threshold_is_not_tracked() {
        let events = vec![event("2024-03-15T09:00:00"), event("2024-03-15T09:30:00")];
        let gaps = detect_gaps(&events, 60, 120);
        assert!(gaps.is_empty());
    }

    #[test]
    fn gap_at_or_above_significant_threshold_is_significant() {
        let events = vec![event("2024-03-15T09:00:00"), event("2024-03-15T11:00:00")];
        let gaps = detect_gaps(&events, 60, 120);
        assert_eq!(gaps[0].severity, GapSeverity::Significant);
    }

    #[test]
    fn unparseable_pair_is_skipped() {
        let events = vec![event("garbage"), event("2024-03-15T11:00:00")];
        let gaps = detect_gaps(&events, 60, 120);
        assert!(gaps.is_empty());
    }
}
