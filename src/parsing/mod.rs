//! Stage P3: structural parsing.
//!
//! Pure, deterministic annotation of raw extracted text blocks: header/
//! footer flags, section propagation, speaker splitting, raw timestamp
//! spans. Never mutates `text` beyond stripping a detected speaker prefix.

pub mod header_footer;
pub mod section;
pub mod speaker;
pub mod timestamp_regex;

use serde::{Deserialize, Serialize};

pub use header_footer::HeaderFooterFlags;
pub use timestamp_regex::TimestampSpan;

/// A raw extracted text block, as delivered by the (out-of-scope) document
/// extractor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentBlock {
    pub block_id: String,
    pub page: u32,
    pub text: String,
    pub confidence: f64,
}

/// Configuration for P3.
#[derive(Debug, Clone)]
pub struct ParsingConfig {
    pub min_page_repetition: usize,
}

impl Default for ParsingConfig {
    fn default() -> Self {
        Self {
            min_page_repetition: 2,
        }
    }
}

/// Structurally annotated block, output of P3.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParsedBlock {
    pub block_id: String,
    pub page: u32,
    pub text: String,
    pub confidence: f64,
    pub speaker: Option<String>,
    pub is_header: bool,
    pub is_footer: bool,
    pub section: Option<String>,
    pub raw_timestamps: Vec<String>,
}

/// Parses a sequence of content blocks into structurally annotated blocks.
///
/// Pure and deterministic: the same input sequence always yields the same
/// output sequence, in the same order.
pub fn parse(blocks: &[ContentBlock], config: &ParsingConfig) -> Vec<ParsedBlock> {
    let views: Vec<header_footer::BlockView> = blocks
        .iter()
        .map(|b| header_footer::BlockView {
            page: b.page,
            text: &b.text,
        })
        .collect();
    let hf_flags = header_footer::detect(&views, config.min_page_repetition);

    let mut current_section: Option<String> = None;
    let mut out = Vec::with_capacity(blocks.len());

    for (block, flags) in blocks.iter().zip(hf_flags.into_iter()) {
        if block.block_id.is_empty() {
            log::warn!("skipping block with missing block_id on page {}", block.page);
            continue;
        }

        if section::is_section_header(&block.text) {
            current_section = Some(section::canonical_label(&block.text));
        }

        let (speaker, remainder) = speaker::split_speaker(&block.text);
        let raw_timestamps: Vec<String> = timestamp_regex::extract_timestamp_spans(&remainder)
            .into_iter()
            .map(|s| s.text)
            .collect();

        out.push(ParsedBlock {
            block_id: block.block_id.clone(),
            page: block.page,
            text: remainder,
            confidence: block.confidence,
            speaker,
            is_header: flags.is_header,
            is_footer: flags.is_footer,
            section: current_section.clone(),
            raw_timestamps,
        });
    }

    out
}
