//! Page/speaker grouping and chunk-splitting rules (P5).

use super::tokenizer::{count_tokens, split_by_tokens, Encoding};
use crate::cleaning::CleanedBlock;
use std::collections::HashMap;

/// One chunk accumulator key: blocks are grouped by their shared
/// `(page, speaker)` pair, in first-appearance order.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GroupKey {
    pub page: u32,
    pub speaker: Option<String>,
}

/// A built chunk, pre-identifier-assignment.
pub struct RawChunk {
    pub page: u32,
    pub speaker: Option<String>,
    pub text: String,
    pub source_block_ids: Vec<String>,
    pub token_count: usize,
    pub chunk_confidence: f64,
}

struct Accumulator {
    texts: Vec<String>,
    block_ids: Vec<String>,
    confidences: Vec<f64>,
}

impl Accumulator {
    fn new() -> Self {
        Self { texts: Vec::new(), block_ids: Vec::new(), confidences: Vec::new() }
    }

    fn is_empty(&self) -> bool {
        self.texts.is_empty()
    }

    fn joined_text(&self) -> String {
        self.texts.join(" ")
    }
}

fn flush(acc: &mut Accumulator, page: u32, speaker: &Option<String>, encoding: Encoding, out: &mut Vec<RawChunk>) {
    if acc.is_empty() {
        return;
    }
    let text = acc.joined_text();
    let token_count = count_tokens(&text, encoding);
    let chunk_confidence = acc
        .confidences
        .iter()
        .cloned()
        .fold(f64::INFINITY, f64::min);
    out.push(RawChunk {
        page,
        speaker: speaker.clone(),
        text,
        source_block_ids: std::mem::take(&mut acc.block_ids),
        token_count,
        chunk_confidence: if chunk_confidence.is_finite() { chunk_confidence } else { 1.0 },
    });
    acc.texts.clear();
    acc.confidences.clear();
}

/// Groups cleaned blocks by `(page, speaker)` in first-appearance order,
/// then walks each group applying the max-token chunk-building rules.
pub fn build_chunks(blocks: &[CleanedBlock], max_tokens: usize, encoding: Encoding) -> Vec<RawChunk> {
    let mut order: Vec<GroupKey> = Vec::new();
    let mut groups: HashMap<GroupKey, Vec<&CleanedBlock>> = HashMap::new();

    for block in blocks {
        let key = GroupKey { page: block.page, speaker: block.speaker.clone() };
        if !groups.contains_key(&key) {
            order.push(key.clone());
        }
        groups.entry(key).or_default().push(block);
    }

    let mut out = Vec::new();

    for key in order {
        let group_blocks = &groups[&key];
        let mut acc = Accumulator::new();

        for block in group_blocks.iter() {
            let block_tokens = count_tokens(&block.clean_text, encoding);

            if block_tokens > max_tokens {
                flush(&mut acc, key.page, &key.speaker, encoding, &mut out);
                for piece in split_by_tokens(&block.clean_text, max_tokens, encoding) {
                    let token_count = count_tokens(&piece, encoding);
                    out.push(RawChunk {
                        page: key.page,
                        speaker: key.speaker.clone(),
                        text: piece,
                        source_block_ids: vec![block.block_id.clone()],
                        token_count,
                        chunk_confidence: block.confidence,
                    });
                }
                continue;
            }

            let candidate_text = if acc.is_empty() {
                block.clean_text.clone()
            } else {
                format!("{} {}", acc.joined_text(), block.clean_text)
            };
            let candidate_tokens = count_tokens(&candidate_text, encoding);

            if candidate_tokens > max_tokens && !acc.is_empty() {
                flush(&mut acc, key.page, &key.speaker, encoding, &mut out);
            }

            acc.texts.push(block.clean_text.clone());
            acc.block_ids.push(block.block_id.clone());
            acc.confidences.push(block.confidence);
        }

        flush(&mut acc, key.page, &key.speaker, encoding, &mut out);
    }

    out
}
