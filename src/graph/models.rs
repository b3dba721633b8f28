//! Graph node/edge/provenance shapes (P8).

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeType {
    Person,
    Evidence,
    Location,
    Event,
    Document,
}

impl NodeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeType::Person => "Person",
            NodeType::Evidence => "Evidence",
            NodeType::Location => "Location",
            NodeType::Event => "Event",
            NodeType::Document => "Document",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EdgeType {
    Witnessed,
    FoundIn,
    Owns,
    AccompaniedBy,
    ArguedWith,
}

impl EdgeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EdgeType::Witnessed => "WITNESSED",
            EdgeType::FoundIn => "FOUND_IN",
            EdgeType::Owns => "OWNS",
            EdgeType::AccompaniedBy => "ACCOMPANIED_BY",
            EdgeType::ArguedWith => "ARGUED_WITH",
        }
    }
}

/// Mandatory chain-of-custody tuple carried by every node and edge.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Provenance {
    pub source_chunk_id: String,
    pub document_id: String,
    pub page_range: [u32; 2],
    pub confidence: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphNode {
    pub node_id: String,
    pub node_type: NodeType,
    pub name: String,
    pub role: Option<String>,
    pub provenance: Provenance,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphEdge {
    pub from: String,
    pub to: String,
    pub edge_type: EdgeType,
    pub provenance: Provenance,
}
