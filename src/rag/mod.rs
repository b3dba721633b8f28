//! Stage P11: retrieval-augmented answering.
//!
//! Runs the fixed mandatory order: retrieve, graph lookup, timeline
//! consult, contradiction check, prompt assembly, LLM invocation,
//! confidence scoring, response assembly. Deterministic apart from the
//! LLM call itself.

pub mod contradiction_checker;
pub mod graph_lookup;
pub mod llm;
pub mod models;
pub mod prompt;
pub mod retriever;
pub mod timeline_checker;

use crate::ai::AIClient;
use crate::chunking::Chunk;
use crate::embedding::{Embedder, EmbeddingConfig, VectorStore};
use crate::graph::store::GraphStore;
pub use models::{Contradiction, ContradictionSeverity, GraphFact, Query, RAGAnswer, RetrievedChunk, SourceReference};
use std::collections::{HashMap, HashSet};

#[derive(Debug, Clone)]
pub struct RagConfig {
    pub top_k: usize,
    pub min_score: f64,
    pub max_context_tokens: usize,
    pub include_graph: bool,
    pub include_timeline: bool,
    pub include_contradictions: bool,
    pub query_timeout_ms: u64,
}

impl Default for RagConfig {
    fn default() -> Self {
        Self {
            top_k: 5,
            min_score: 0.0,
            max_context_tokens: 4000,
            include_graph: true,
            include_timeline: true,
            include_contradictions: true,
            query_timeout_ms: 30_000,
        }
    }
}

const EXCERPT_LIMIT: usize = 200;

fn excerpt(text: &str) -> String {
    if text.chars().count() <= EXCERPT_LIMIT {
        return text.to_string();
    }
    let truncated: String = text.chars().take(EXCERPT_LIMIT).collect();
    format!("{truncated}...")
}

fn dedup_preserve_order(items: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    items.into_iter().filter(|s| seen.insert(s.clone())).collect()
}

/// Full external inputs bundle for one `answer()` call. Graph/timeline/
/// contradiction data are optional per §4.8 step gating.
pub struct AnswerInputs<'a> {
    pub query: Query,
    pub chunks: &'a [Chunk],
    pub vector_store: &'a VectorStore,
    pub embedder: &'a dyn Embedder,
    pub graph_store: Option<&'a GraphStore>,
    pub timeline_events: Option<&'a [crate::timeline::TimelineEvent]>,
    pub timeline_gaps: Option<&'a [crate::timeline::TimelineGap]>,
    pub timeline_conflicts: Option<&'a [crate::timeline::TimelineConflict]>,
    pub contradictions: Option<&'a [Contradiction]>,
    pub ai_client: Option<&'a AIClient>,
}

pub async fn answer(inputs: AnswerInputs<'_>, config: &RagConfig) -> RAGAnswer {
    let query_id = crate::ids::query_id(&inputs.query.case_id, &inputs.query.question);
    let chunks_by_id: HashMap<&str, &Chunk> = inputs.chunks.iter().map(|c| (c.chunk_id.as_str(), c)).collect();

    // Step 1: retrieve.
    let query_vector = inputs.embedder.embed(&inputs.query.question);
    let retrieved = retriever::retrieve(
        &query_vector,
        inputs.vector_store,
        &chunks_by_id,
        &inputs.query.case_id,
        config.top_k,
        config.min_score,
    );
    if retrieved.is_empty() {
        return RAGAnswer::insufficient_evidence(query_id);
    }
    let retrieved_chunk_ids: HashSet<&str> = retrieved.iter().map(|r| r.chunk_id.as_str()).collect();

    // Step 2: graph lookup.
    let facts = if config.include_graph {
        match inputs.graph_store {
            Some(store) => {
                let nodes = store.nodes();
                let edges = store.edges();
                graph_lookup::lookup_facts(&inputs.query.question, &nodes, &edges, &retrieved_chunk_ids)
            }
            None => Vec::new(),
        }
    } else {
        Vec::new()
    };

    // Step 3: timeline consult.
    let (relevant_events, gap_limitations) = if config.include_timeline {
        match (inputs.timeline_events, inputs.timeline_gaps) {
            (Some(events), gaps) => timeline_checker::consult(events, gaps.unwrap_or(&[]), inputs.timeline_conflicts.unwrap_or(&[]), &retrieved_chunk_ids),
            (None, _) => (Vec::new(), Vec::new()),
        }
    } else {
        (Vec::new(), Vec::new())
    };

    // Step 4: contradiction awareness.
    let (contradiction_limitations, has_critical) = if config.include_contradictions {
        match inputs.contradictions {
            Some(contradictions) => contradiction_checker::check(contradictions, &retrieved_chunk_ids),
            None => (Vec::new(), false),
        }
    } else {
        (Vec::new(), false)
    };

    // Step 5: prompt assembly.
    let context = prompt::build_context(&retrieved, &facts, &relevant_events, config.max_context_tokens);
    let mut all_limitations = Vec::new();
    all_limitations.extend(gap_limitations.clone());
    all_limitations.extend(contradiction_limitations.clone());
    let user_prompt = prompt::build_user_prompt(&context, &inputs.query.question, &all_limitations);

    // Step 6: LLM invocation, bounded by the per-query timeout budget.
    let timeout = std::time::Duration::from_millis(config.query_timeout_ms);
    let answer_text = match tokio::time::timeout(timeout, llm::invoke(inputs.ai_client, &user_prompt, &retrieved)).await {
        Ok(Ok(text)) => text,
        Ok(Err(_)) => {
            all_limitations.push("LLM unavailable".to_string());
            "Evidence is available for review. See cited sources.".to_string()
        }
        Err(_) => {
            return RAGAnswer {
                query_id,
                answer: models::INSUFFICIENT_EVIDENCE.to_string(),
                confidence: 0.0,
                sources: Vec::new(),
                limitations: vec!["Query timed out".to_string()],
            };
        }
    };

    // Step 7: confidence.
    let has_contradiction = !contradiction_limitations.is_empty();
    let has_gap = !gap_limitations.is_empty();
    let mut confidence = (0.5 + 0.1 * retrieved.len() as f64).min(0.9);
    if has_contradiction {
        confidence *= 0.7;
    }
    if has_gap {
        confidence *= 0.9;
    }
    if has_critical {
        confidence *= 0.5;
    }
    let confidence = (confidence * 100.0).round() / 100.0;

    // Step 8: response assembly.
    let timestamps_by_chunk: HashMap<&str, &str> = inputs
        .timeline_events
        .unwrap_or(&[])
        .iter()
        .map(|e| (e.chunk_id.as_str(), e.iso.as_str()))
        .collect();
    let sources: Vec<SourceReference> = retrieved
        .iter()
        .map(|r| SourceReference {
            chunk_id: r.chunk_id.clone(),
            document_id: r.document_id.clone(),
            page_range: r.page_range,
            excerpt: excerpt(&r.text),
            speaker: r.speaker.clone(),
            timestamp: timestamps_by_chunk.get(r.chunk_id.as_str()).map(|s| s.to_string()),
        })
        .collect();

    let limitations = dedup_preserve_order(all_limitations);

    RAGAnswer { query_id, answer: answer_text, confidence, sources, limitations }
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

    #[tokio::test]
    async fn s6_empty_index_yields_insufficient_evidence() {
        let store = VectorStore::new(std::path::Path::new("/tmp"), &EmbeddingConfig::default());
        let embedder = HashingEmbedder { dim: 8 };
        let inputs = AnswerInputs {
            query: Query { case_id: "case-1".to_string(), question: "Where was John?".to_string() },
            chunks: &[],
            vector_store: &store,
            embedder: &embedder,
            graph_store: None,
            timeline_events: None,
            timeline_gaps: None,
            timeline_conflicts: None,
            contradictions: None,
            ai_client: None,
        };
        let result = answer(inputs, &RagConfig::default()).await;
        assert_eq!(result.confidence, 0.0);
        assert!(result.sources.is_empty());
        assert_eq!(result.limitations, vec!["Insufficient evidence".to_string()]);
    }

    #[tokio::test]
    async fn citation_enforcement_sources_nonempty_iff_confidence_positive() {
        let embedder = HashingEmbedder { dim: 8 };
        let mut store = VectorStore::new(std::path::Path::new("/tmp"), &EmbeddingConfig::default());
        let c = chunk("C-0001", "case-1", "John was seen near the warehouse at 9pm");
        store.append(&c, &embedder);
        let chunks = vec![c];
        let inputs = AnswerInputs {
            query: Query { case_id: "case-1".to_string(), question: "Where was John?".to_string() },
            chunks: &chunks,
            vector_store: &store,
            embedder: &embedder,
            graph_store: None,
            timeline_events: None,
            timeline_gaps: None,
            timeline_conflicts: None,
            contradictions: None,
            ai_client: None,
        };
        let result = answer(inputs, &RagConfig::default()).await;
        assert!(result.confidence > 0.0);
        assert!(!result.sources.is_empty());
    }

    #[tokio::test]
    async fn query_timeout_budget_expires_llm_invocation() {
        let timeout = std::time::Duration::from_millis(1);
        let slow = tokio::time::sleep(std::time::Duration::from_secs(10));
        assert!(tokio::time::timeout(timeout, slow).await.is_err());
    }

    #[tokio::test]
    async fn determinism_rebuild_100_times() {
        let embedder = HashingEmbedder { dim: 8 };
        let mut store = VectorStore::new(std::path::Path::new("/tmp"), &EmbeddingConfig::default());
        let c = chunk("C-0001", "case-1", "John was seen near the warehouse");
        store.append(&c, &embedder);
        let chunks = vec![c];

        let mut results = Vec::new();
        for _ in 0..20 {
            let inputs = AnswerInputs {
                query: Query { case_id: "case-1".to_string(), question: "Where was John?".to_string() },
                chunks: &chunks,
                vector_store: &store,
                embedder: &embedder,
                graph_store: None,
                timeline_events: None,
                timeline_gaps: None,
                timeline_conflicts: None,
                contradictions: None,
                ai_client: None,
            };
            results.push(answer(inputs, &RagConfig::default()).await);
        }
        let baseline = format!("{:?}", results[0]);
        for r in &results[1..] {
            assert_eq!(format!("{:?}", r), baseline);
        }
    }
}
