//! Stage P9: timeline reconstruction.
//!
//! Pure given chunks and their per-chunk normalised timestamps. Runs the
//! four authoritative steps in order: build events, sort, detect gaps,
//! detect conflicts. Never resolves a conflict - only reports it.

pub mod conflicts;
pub mod events;
pub mod gaps;
pub mod models;
pub mod sorter;

use crate::chunking::Chunk;
use crate::cleaning::NormalizedTimestampRecord;
pub use models::{GapSeverity, TimelineConflict, TimelineEvent, TimelineGap, TimelineResult};

#[derive(Debug, Clone)]
pub struct TimelineConfig {
    pub gap_threshold_minutes: i64,
    pub significant_gap_minutes: i64,
}

impl Default for TimelineConfig {
    fn default() -> Self {
        Self { gap_threshold_minutes: 60, significant_gap_minutes: 120 }
    }
}

/// Builds the full timeline for one case.
pub fn build(
    case_id: &str,
    chunks: &[Chunk],
    timestamps_by_chunk: &[(String, Vec<NormalizedTimestampRecord>)],
    config: &TimelineConfig,
) -> TimelineResult {
    let built = events::build_events(case_id, chunks, timestamps_by_chunk);
    let sorted = sorter::sort_events(built);
    let gaps = gaps::detect_gaps(&sorted, config.gap_threshold_minutes, config.significant_gap_minutes);
    let conflicts = conflicts::detect_conflicts(&sorted);

    TimelineResult { events: sorted, gaps, conflicts }
}
