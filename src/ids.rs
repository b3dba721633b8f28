//! Deterministic identifier generation.
//!
//! Every artifact identifier in this crate is a pure function of its
//! inputs. No random UUIDs, no wall-clock timestamps - re-running any
//! stage on the same input reproduces the same identifiers.

use sha2::{Digest, Sha256};

/// Generates a chunk identifier: `{prefix}{counter:04}`, e.g. `C-0001`.
pub fn chunk_id(prefix: &str, counter: usize) -> String {
    format!("{prefix}{counter:04}")
}

/// Generates a timeline event identifier: `EVT_{safe(case_id)}_{counter:04}`.
///
/// `safe` replaces `-` and spaces with `_` so the id is a single token.
pub fn event_id(case_id: &str, counter: usize) -> String {
    let safe: String = case_id
        .chars()
        .map(|c| if c == '-' || c == ' ' { '_' } else { c })
        .collect();
    format!("EVT_{safe}_{counter:04}")
}

/// Generates an entity identifier as a content hash, replacing the
/// upstream system's random `uuid4()` so entity IDs stay deterministic.
///
/// `ENT_{first 8 hex chars of sha256(chunk_id || entity_type || start || end || text)}`
pub fn entity_id(chunk_id: &str, entity_type: &str, start_char: usize, end_char: usize, text: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(chunk_id.as_bytes());
    hasher.update(entity_type.as_bytes());
    hasher.update(start_char.to_le_bytes());
    hasher.update(end_char.to_le_bytes());
    hasher.update(text.as_bytes());
    let digest = hasher.finalize();
    let hex = hex::encode(digest);
    format!("ENT_{}", hex[..8].to_uppercase())
}

/// Generates a query identifier as a content hash of its case and
/// question text, so re-running the same query reproduces the same id
/// rather than a fresh random one each call.
///
/// `Q_{first 8 hex chars of sha256(case_id || question)}`
pub fn query_id(case_id: &str, question: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(case_id.as_bytes());
    hasher.update(question.as_bytes());
    let digest = hasher.finalize();
    let hex = hex::encode(digest);
    format!("Q_{}", hex[..8].to_uppercase())
}

/// Generates a graph node identifier: `{NodeType}:{normalize(name)}:{case_id}`.
pub fn node_id(node_type: &str, name: &str, case_id: &str) -> String {
    format!("{node_type}:{}:{case_id}", normalize_name(name))
}

/// Generates a document node identifier. `document_id` is used verbatim,
/// not normalized, unlike entity-derived node names.
pub fn document_node_id(document_id: &str, case_id: &str) -> String {
    format!("Document:{document_id}:{case_id}")
}

/// Lowercases, trims, and collapses internal whitespace - used for
/// case-insensitive, whitespace-insensitive node identity.
pub fn normalize_name(name: &str) -> String {
    name.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}
