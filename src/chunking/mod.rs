//! Stage P5: logical chunker.
//!
//! Groups cleaned blocks under hard page and speaker boundaries with
//! exact token accounting. Pure and deterministic given a deterministic
//! tokenizer.

pub mod rules;
pub mod tokenizer;

use crate::cleaning::CleanedBlock;
use crate::ids;
use serde::{Deserialize, Serialize};
pub use tokenizer::Encoding;

/// Configuration for P5.
#[derive(Debug, Clone)]
pub struct ChunkingConfig {
    pub max_tokens: usize,
    /// Advisory only; never used as a gate in the chunking algorithm.
    pub min_tokens: usize,
    pub chunk_id_prefix: String,
    pub encoding: Encoding,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            max_tokens: 1000,
            min_tokens: 300,
            chunk_id_prefix: "C-".to_string(),
            encoding: Encoding::default(),
        }
    }
}

/// A logical chunk: a page- and speaker-bounded group of cleaned blocks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chunk {
    pub chunk_id: String,
    pub case_id: String,
    pub document_id: String,
    pub page_range: [u32; 2],
    pub speaker: Option<String>,
    pub text: String,
    pub source_block_ids: Vec<String>,
    pub token_count: usize,
    pub chunk_confidence: f64,
}

/// Chunks a document's cleaned blocks. The per-document chunk counter
/// resets at the start of every call.
pub fn chunk(
    blocks: &[CleanedBlock],
    case_id: &str,
    document_id: &str,
    config: &ChunkingConfig,
) -> Vec<Chunk> {
    let raw_chunks = rules::build_chunks(blocks, config.max_tokens, config.encoding);

    raw_chunks
        .into_iter()
        .enumerate()
        .map(|(i, raw)| Chunk {
            chunk_id: ids::chunk_id(&config.chunk_id_prefix, i + 1),
            case_id: case_id.to_string(),
            document_id: document_id.to_string(),
            page_range: [raw.page, raw.page],
            speaker: raw.speaker,
            text: raw.text,
            source_block_ids: raw.source_block_ids,
            token_count: raw.token_count,
            chunk_confidence: raw.chunk_confidence,
        })
        .collect()
}
