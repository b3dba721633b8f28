//! In-process graph store backed by `petgraph`, with a JSON sidecar for
//! persistence (P8). Substitutes for the Neo4j/Cypher client the original
//! used: no bolt/cypher crate exists anywhere in the corpus, so MERGE
//! semantics are hand-rolled here.

use super::models::{GraphEdge, GraphNode};
use crate::error::{AppError, AppResult};
use petgraph::graph::{DiGraph, NodeIndex};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

const SIDECAR_FILENAME: &str = "graph.json";

#[derive(Debug, Serialize, Deserialize)]
struct GraphSnapshot {
    nodes: Vec<GraphNode>,
    edges: Vec<GraphEdge>,
}

/// An in-memory graph plus its on-disk mirror.
///
/// `merge_node`/`merge_edge` emulate Cypher `MERGE`: re-merging a node
/// keeps the higher of the two confidences (first-write does not win);
/// re-merging an edge keeps the first-created provenance untouched.
pub struct GraphStore {
    graph: DiGraph<GraphNode, GraphEdge>,
    node_index: HashMap<String, NodeIndex>,
    edge_index: HashMap<(String, String, &'static str), ()>,
    path: PathBuf,
}

impl GraphStore {
    pub fn new(storage_dir: &Path) -> Self {
        Self {
            graph: DiGraph::new(),
            node_index: HashMap::new(),
            edge_index: HashMap::new(),
            path: storage_dir.join(SIDECAR_FILENAME),
        }
    }

    pub fn load(storage_dir: &Path) -> AppResult<Self> {
        let mut store = Self::new(storage_dir);
        if !store.path.exists() {
            return Ok(store);
        }
        let data = std::fs::read_to_string(&store.path)?;
        let snapshot: GraphSnapshot = serde_json::from_str(&data)?;
        for node in snapshot.nodes {
            store.merge_node(node);
        }
        for edge in snapshot.edges {
            store.merge_edge(edge);
        }
        Ok(store)
    }

    /// Inserts `node`, or if a node with the same `node_id` already
    /// exists, keeps whichever has the higher confidence (ties keep the
    /// existing node).
    pub fn merge_node(&mut self, node: GraphNode) {
        if let Some(&idx) = self.node_index.get(&node.node_id) {
            let existing = &mut self.graph[idx];
            if node.provenance.confidence > existing.provenance.confidence {
                *existing = node;
            }
            return;
        }
        let node_id = node.node_id.clone();
        let idx = self.graph.add_node(node);
        self.node_index.insert(node_id, idx);
    }

    /// Inserts `edge` unless an edge with the same `(from, to, edge_type)`
    /// already exists, in which case the existing edge's provenance is
    /// left untouched (first-created wins).
    pub fn merge_edge(&mut self, edge: GraphEdge) {
        let key = (edge.from.clone(), edge.to.clone(), edge.edge_type.as_str());
        if self.edge_index.contains_key(&key) {
            return;
        }
        let (Some(&from_idx), Some(&to_idx)) =
            (self.node_index.get(&edge.from), self.node_index.get(&edge.to))
        else {
            log::warn!("dropping edge {:?} -> {:?}: endpoint node missing", edge.from, edge.to);
            return;
        };
        self.edge_index.insert(key, ());
        self.graph.add_edge(from_idx, to_idx, edge);
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn node(&self, node_id: &str) -> Option<&GraphNode> {
        self.node_index.get(node_id).map(|&idx| &self.graph[idx])
    }

    pub fn nodes(&self) -> Vec<&GraphNode> {
        self.graph.node_weights().collect()
    }

    pub fn edges(&self) -> Vec<&GraphEdge> {
        self.graph.edge_weights().collect()
    }

    /// Sorts nodes by `node_id` and edges by `(from, to, edge_type)` before
    /// serializing, so the on-disk snapshot is byte-identical across
    /// rebuilds regardless of insertion order.
    pub fn save(&self) -> AppResult<()> {
        let mut nodes: Vec<GraphNode> = self.graph.node_weights().cloned().collect();
        nodes.sort_by(|a, b| a.node_id.cmp(&b.node_id));
        let mut edges: Vec<GraphEdge> = self.graph.edge_weights().cloned().collect();
        edges.sort_by(|a, b| (&a.from, &a.to, a.edge_type.as_str()).cmp(&(&b.from, &b.to, b.edge_type.as_str())));

        let snapshot = GraphSnapshot { nodes, edges };
        let json = serde_json::to_string_pretty(&snapshot)?;
        let tmp_path = self.path.with_extension("json.tmp");
        std::fs::write(&tmp_path, json)
            .map_err(|e| AppError::GraphStore(format!("failed to write temp snapshot: {e}")))?;
        std::fs::rename(&tmp_path, &self.path)
            .map_err(|e| AppError::GraphStore(format!("failed to rename temp snapshot: {e}")))?;
        log::info!("wrote graph snapshot ({} nodes, {} edges) to {}", self.graph.node_count(), self.graph.edge_count(), self.path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::models::{EdgeType, NodeType, Provenance};

    fn node(id: &str, confidence: f64) -> GraphNode {
        GraphNode {
            node_id: id.to_string(),
            node_type: NodeType::Person,
            name: id.to_string(),
            role: None,
            provenance: Provenance {
                source_chunk_id: "C-0001".to_string(),
                document_id: "doc-1".to_string(),
                page_range: [1, 1],
                confidence,
            },
        }
    }

    #[test]
    fn merge_node_keeps_higher_confidence() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = GraphStore::new(dir.path());
        store.merge_node(node("Person:john:case-1", 0.6));
        store.merge_node(node("Person:john:case-1", 0.9));
        assert_eq!(store.node_count(), 1);
        assert_eq!(store.node("Person:john:case-1").unwrap().provenance.confidence, 0.9);
    }

    #[test]
    fn merge_edge_keeps_first_provenance() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = GraphStore::new(dir.path());
        store.merge_node(node("Person:a:case-1", 0.9));
        store.merge_node(node("Person:b:case-1", 0.9));
        let mut e1 = GraphEdge {
            from: "Person:a:case-1".to_string(),
            to: "Person:b:case-1".to_string(),
            edge_type: EdgeType::ArguedWith,
            provenance: Provenance { source_chunk_id: "C-0001".to_string(), document_id: "doc-1".to_string(), page_range: [1, 1], confidence: 0.9 },
        };
        store.merge_edge(e1.clone());
        e1.provenance.source_chunk_id = "C-0002".to_string();
        store.merge_edge(e1);
        assert_eq!(store.edge_count(), 1);
        assert_eq!(store.edges()[0].provenance.source_chunk_id, "C-0001");
    }

    #[test]
    fn save_and_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = GraphStore::new(dir.path());
        store.merge_node(node("Person:a:case-1", 0.9));
        store.save().unwrap();

        let reloaded = GraphStore::load(dir.path()).unwrap();
        assert_eq!(reloaded.node_count(), 1);
    }

    #[test]
    fn edge_with_missing_endpoint_is_dropped() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = GraphStore::new(dir.path());
        store.merge_node(node("Person:a:case-1", 0.9));
        let edge = GraphEdge {
            from: "Person:a:case-1".to_string(),
            to: "Person:ghost:case-1".to_string(),
            edge_type: EdgeType::ArguedWith,
            provenance: Provenance { source_chunk_id: "C-0001".to_string(), document_id: "doc-1".to_string(), page_range: [1, 1], confidence: 0.9 },
        };
        store.merge_edge(edge);
        assert_eq!(store.edge_count(), 0);
    }
}
