//! Timeline record shapes (P9).

use serde::{Deserialize, Serialize};

/// One point on the case timeline. `description` is the exact chunk
/// text - no summarisation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimelineEvent {
    pub event_id: String,
    pub chunk_id: String,
    pub document_id: String,
    pub page_range: [u32; 2],
    pub iso: String,
    pub speaker: Option<String>,
    pub description: String,
    pub confidence: f64,
    /// Position in the build-call's input order, before sorting. Used to
    /// break ties between events with equal parsed timestamps.
    pub original_index: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum GapSeverity {
    Moderate,
    Significant,
}

/// A gap carries no confidence field by design.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimelineGap {
    pub start: String,
    pub end: String,
    pub duration_minutes: i64,
    pub severity: GapSeverity,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimelineConflict {
    pub timestamp: String,
    pub conflicting_chunks: Vec<String>,
    pub conflicting_event_ids: Vec<String>,
    pub reason: String,
    pub confidence: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct TimelineResult {
    pub events: Vec<TimelineEvent>,
    pub gaps: Vec<TimelineGap>,
    pub conflicts: Vec<TimelineConflict>,
}
