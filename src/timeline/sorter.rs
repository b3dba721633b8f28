//! Stable chronological sort (P9 step 2).

use super::models::TimelineEvent;
use chrono::{DateTime, NaiveDateTime};

/// Parses an `iso` string to a comparable key. Unparseable strings sort
/// as the minimum possible value (`None`, which sorts before `Some`).
fn parse_key(iso: &str) -> Option<NaiveDateTime> {
    DateTime::parse_from_rfc3339(iso)
        .map(|dt| dt.naive_utc())
        .or_else(|_| NaiveDateTime::parse_from_str(iso, "%Y-%m-%dT%H:%M:%S"))
        .ok()
}

/// Stable sort by `(parsed timestamp, original_index)`. Events with
/// equal parsed timestamps keep their pre-sort relative order because
/// `sort_by_key` is stable and `original_index` is the final tiebreak.
pub fn sort_events(mut events: Vec<TimelineEvent>) -> Vec<TimelineEvent> {
    events.sort_by_key(|e| (parse_key(&e.iso), e.original_index));
    events
}
