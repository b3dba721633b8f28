//! Step 1: vector retrieval with defense-in-depth case filtering (P11).

use super::models::RetrievedChunk;
use crate::chunking::Chunk;
use crate::embedding::{EmbeddingConfig, VectorStore};
use std::collections::HashMap;

/// Embeds `question`, searches the index for the top-k nearest chunks,
/// applies the `min_score` floor, then strictly filters to `case_id` -
/// this filter runs after scoring regardless of any case partitioning
/// already applied at the index level.
pub fn retrieve(
    query_vector: &[f32],
    store: &VectorStore,
    chunks_by_id: &HashMap<&str, &Chunk>,
    case_id: &str,
    k: usize,
    min_score: f64,
) -> Vec<RetrievedChunk> {
    store
        .search(query_vector, k)
        .into_iter()
        .filter(|(_, score)| *score >= min_score)
        .filter(|(record, _)| record.case_id == case_id)
        .filter_map(|(record, score)| {
            let chunk = chunks_by_id.get(record.chunk_id.as_str())?;
            Some(RetrievedChunk {
                chunk_id: record.chunk_id,
                document_id: record.document_id,
                page_range: record.page_range,
                speaker: record.speaker,
                text: chunk.text.clone(),
                score,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embedding::HashingEmbedder;

    fn chunk(id: &str, case_id: &str, text: &str) -> Chunk {
        Chunk {
            chunk_id: id.to_string(),
            case_id: case_id.to_string(),
            document_id: "doc-1".to_string(),
            page_range: [1, 1],
            speaker: None,
            text: text.to_string(),
            source_block_ids: vec!["b1".to_string()],
            token_count: text.split_whitespace().count(),
            chunk_confidence: 0.9,
        }
    }

    #[test]
    fn cross_case_chunks_are_dropped_even_if_they_score_higher() {
        let embedder = HashingEmbedder { dim: 8 };
        let mut store = VectorStore::new(std::path::Path::new("/tmp"), &EmbeddingConfig::default());
        let c1 = chunk("CA1", "case-a", "the knife was found");
        let c2 = chunk("CB1", "case-b", "the knife was found");
        store.append(&c1, &embedder);
        store.append(&c2, &embedder);

        let chunks_by_id: HashMap<&str, &Chunk> = [("CA1", &c1), ("CB1", &c2)].into_iter().collect();
        let query = embedder.embed("the knife was found");
        let results = retrieve(&query, &store, &chunks_by_id, "case-a", 5, 0.0);
        assert!(results.iter().all(|r| chunks_by_id[r.chunk_id.as_str()].case_id == "case-a"));
    }

    #[test]
    fn min_score_floor_filters_low_scores() {
        let embedder = HashingEmbedder { dim: 8 };
        let mut store = VectorStore::new(std::path::Path::new("/tmp"), &EmbeddingConfig::default());
        let c1 = chunk("CA1", "case-a", "alpha");
        store.append(&c1, &embedder);
        let chunks_by_id: HashMap<&str, &Chunk> = [("CA1", &c1)].into_iter().collect();
        let query = embedder.embed("alpha");
        let results = retrieve(&query, &store, &chunks_by_id, "case-a", 5, 1.1);
        assert!(results.is_empty());
    }
}
