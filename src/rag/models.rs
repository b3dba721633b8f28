//! RAG answer and supporting record shapes (P11).

use serde::{Deserialize, Serialize};

pub const INSUFFICIENT_EVIDENCE: &str =
    "The available evidence does not contain sufficient information to answer this question.";

#[derive(Debug, Clone)]
pub struct Query {
    pub case_id: String,
    pub question: String,
}

/// A chunk pulled back by vector search, with its similarity score.
#[derive(Debug, Clone)]
pub struct RetrievedChunk {
    pub chunk_id: String,
    pub document_id: String,
    pub page_range: [u32; 2],
    pub speaker: Option<String>,
    pub text: String,
    pub score: f64,
}

/// A `(subject, predicate, object)` fact surfaced from the knowledge graph.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GraphFact {
    pub subject: String,
    pub predicate: String,
    pub object: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceReference {
    pub chunk_id: String,
    pub document_id: String,
    pub page_range: [u32; 2],
    pub excerpt: String,
    pub speaker: Option<String>,
    pub timestamp: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RAGAnswer {
    pub query_id: String,
    pub answer: String,
    pub confidence: f64,
    pub sources: Vec<SourceReference>,
    pub limitations: Vec<String>,
}

impl RAGAnswer {
    pub fn insufficient_evidence(query_id: String) -> Self {
        Self {
            query_id,
            answer: INSUFFICIENT_EVIDENCE.to_string(),
            confidence: 0.0,
            sources: Vec::new(),
            limitations: vec!["Insufficient evidence".to_string()],
        }
    }
}

/// A contradiction record supplied externally (produced upstream of P11;
/// this crate only consumes and surfaces it, never resolves it).
#[derive(Debug, Clone)]
pub struct Contradiction {
    pub chunk_a: String,
    pub chunk_b: String,
    pub contradiction_type: String,
    pub severity: ContradictionSeverity,
    pub explanation: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContradictionSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl ContradictionSeverity {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContradictionSeverity::Low => "LOW",
            ContradictionSeverity::Medium => "MEDIUM",
            ContradictionSeverity::High => "HIGH",
            ContradictionSeverity::Critical => "CRITICAL",
        }
    }
}
