//! Stage P4: semantic cleaning.
//!
//! Pure, lossless text normalization plus timestamp normalization to
//! ISO-8601 with confidence. No word is ever removed.

pub mod encoding;
pub mod noise;
pub mod timestamp_normalizer;
pub mod whitespace;

use crate::parsing::ParsedBlock;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub use timestamp_normalizer::NormalizedTimestamp;

/// Configuration for P4.
#[derive(Debug, Clone, Default)]
pub struct CleaningConfig {
    /// Reference date used to anchor time-only timestamps. Must be
    /// supplied explicitly for determinism; `None` falls back to a fixed
    /// epoch date rather than the wall clock.
    pub reference_date: Option<NaiveDate>,
}

/// A cleaned block: same shape as `ParsedBlock` with normalized text and
/// timestamps aligned 1:1 with the source `raw_timestamps`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CleanedBlock {
    pub block_id: String,
    pub page: u32,
    pub clean_text: String,
    pub confidence: f64,
    pub speaker: Option<String>,
    pub is_header: bool,
    pub is_footer: bool,
    pub section: Option<String>,
    pub normalized_timestamps: Vec<NormalizedTimestampRecord>,
}

/// Serializable mirror of `NormalizedTimestamp` (chrono types stay internal).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NormalizedTimestampRecord {
    pub original: String,
    pub iso: Option<String>,
    pub confidence: f64,
}

impl From<NormalizedTimestamp> for NormalizedTimestampRecord {
    fn from(t: NormalizedTimestamp) -> Self {
        Self {
            original: t.original,
            iso: t.iso,
            confidence: t.confidence,
        }
    }
}

/// Cleans one parsed block's text through the fixed normalization order:
/// fix_encoding -> normalize_whitespace -> remove_noise, and normalizes
/// every raw timestamp extracted in P3.
pub fn clean_block(block: &ParsedBlock, config: &CleaningConfig) -> CleanedBlock {
    let step1 = encoding::fix_encoding(&block.text);
    let step2 = whitespace::normalize_whitespace(&step1);
    let clean_text = noise::remove_noise(&step2);

    let normalized_timestamps = block
        .raw_timestamps
        .iter()
        .map(|raw| timestamp_normalizer::normalize(raw, config.reference_date).into())
        .collect();

    CleanedBlock {
        block_id: block.block_id.clone(),
        page: block.page,
        clean_text,
        confidence: block.confidence,
        speaker: block.speaker.clone(),
        is_header: block.is_header,
        is_footer: block.is_footer,
        section: block.section.clone(),
        normalized_timestamps,
    }
}

/// Cleans a full sequence of parsed blocks.
pub fn clean(blocks: &[ParsedBlock], config: &CleaningConfig) -> Vec<CleanedBlock> {
    blocks.iter().map(|b| clean_block(b, config)).collect()
}
