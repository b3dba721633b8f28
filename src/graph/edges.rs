//! Edge derivation from chunk text and co-occurring entities (P8).

use super::models::{EdgeType, GraphEdge, Provenance};
use crate::ids;
use crate::ner::{EntityType, ExtractedEntity};
use once_cell::sync::Lazy;
use regex::Regex;

static ARGUED_WITH: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(\w+(?:\s+\w+)?)\s+(?:argued|fought|quarreled|had an argument)\s+with\s+(\w+(?:\s+\w+)?)").unwrap()
});
static WITNESS_VERB: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\b(?:saw|witnessed|observed|noticed|watched)\b").unwrap());
static FOUND_VERB: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\b(?:found|located|discovered)\b.*\b(?:at|in|near)\b").unwrap());
static ACCOMPANIED_BY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(\w+(?:\s+\w+)?)\s+(?:with|accompanied by|together with|alongside)\s+(\w+(?:\s+\w+)?)").unwrap()
});
static OWNS_POSSESSIVE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:his|her|their)\s+\w+|\w+'s\s+\w+|owned by\s+\w+|belongs to\s+\w+|possession of\s+\w+").unwrap()
});

fn is_person_like(t: EntityType) -> bool {
    matches!(t, EntityType::Person | EntityType::Witness | EntityType::Suspect)
}
fn is_evidence_like(t: EntityType) -> bool {
    matches!(t, EntityType::Evidence | EntityType::Weapon | EntityType::Phone)
}
fn is_location_like(t: EntityType) -> bool {
    matches!(t, EntityType::Location | EntityType::Address)
}
fn is_event_like(t: EntityType) -> bool {
    matches!(t, EntityType::Time)
}

fn fuzzy_resolve<'a>(name: &str, candidates: &'a [&ExtractedEntity]) -> Option<&'a ExtractedEntity> {
    let name_lower = name.to_lowercase();
    candidates
        .iter()
        .find(|e| {
            let text_lower = e.text.to_lowercase();
            text_lower.contains(&name_lower) || name_lower.contains(&text_lower)
        })
        .copied()
}

fn edge(from: &ExtractedEntity, to: &ExtractedEntity, edge_type: EdgeType, chunk_id: &str, chunk_text_confidence: f64) -> GraphEdge {
    GraphEdge {
        from: ids::node_id(node_type_str(from.entity_type), &from.text, &from.case_id),
        to: ids::node_id(node_type_str(to.entity_type), &to.text, &to.case_id),
        edge_type,
        provenance: Provenance {
            source_chunk_id: chunk_id.to_string(),
            document_id: from.document_id.clone(),
            page_range: from.page_range,
            confidence: chunk_text_confidence,
        },
    }
}

fn node_type_str(entity_type: EntityType) -> &'static str {
    if is_person_like(entity_type) {
        "Person"
    } else if is_evidence_like(entity_type) {
        "Evidence"
    } else if is_location_like(entity_type) {
        "Location"
    } else {
        "Event"
    }
}

/// Derives edges from one chunk's text and its own entities. `confidence`
/// is the chunk's confidence (edges carry chunk-level, not entity-level,
/// confidence as their provenance).
pub fn derive_edges_for_chunk(chunk_id: &str, chunk_text: &str, confidence: f64, entities: &[ExtractedEntity]) -> Vec<GraphEdge> {
    let persons: Vec<&ExtractedEntity> = entities.iter().filter(|e| is_person_like(e.entity_type)).collect();
    let evidence: Vec<&ExtractedEntity> = entities.iter().filter(|e| is_evidence_like(e.entity_type)).collect();
    let locations: Vec<&ExtractedEntity> = entities.iter().filter(|e| is_location_like(e.entity_type)).collect();
    let events: Vec<&ExtractedEntity> = entities.iter().filter(|e| is_event_like(e.entity_type)).collect();

    let mut out = Vec::new();

    if let Some(caps) = ARGUED_WITH.captures(chunk_text) {
        let a = fuzzy_resolve(&caps[1], &persons);
        let b = fuzzy_resolve(&caps[2], &persons);
        if let (Some(a), Some(b)) = (a, b) {
            out.push(edge(a, b, EdgeType::ArguedWith, chunk_id, confidence));
        }
    }

    if WITNESS_VERB.is_match(chunk_text) && !persons.is_empty() && !events.is_empty() {
        for p in &persons {
            for ev in &events {
                out.push(edge(p, ev, EdgeType::Witnessed, chunk_id, confidence));
            }
        }
    }

    if FOUND_VERB.is_match(chunk_text) && !evidence.is_empty() && !locations.is_empty() {
        for ev in &evidence {
            for loc in &locations {
                out.push(edge(ev, loc, EdgeType::FoundIn, chunk_id, confidence));
            }
        }
    }

    if let Some(caps) = ACCOMPANIED_BY.captures(chunk_text) {
        let a = fuzzy_resolve(&caps[1], &persons);
        let b = fuzzy_resolve(&caps[2], &persons);
        if let (Some(a), Some(b)) = (a, b) {
            out.push(edge(a, b, EdgeType::AccompaniedBy, chunk_id, confidence));
        }
    }

    if OWNS_POSSESSIVE.is_match(chunk_text) {
        if let Some(first_person) = persons.first() {
            for ev in &evidence {
                out.push(edge(first_person, ev, EdgeType::Owns, chunk_id, confidence));
            }
        }
    }

    out
}

/// Deduplicates edges across a whole build by `(from, to, edge_type)`,
/// keeping the first occurrence.
pub fn dedup_edges(edges: Vec<GraphEdge>) -> Vec<GraphEdge> {
    let mut seen = std::collections::HashSet::new();
    edges
        .into_iter()
        .filter(|e| seen.insert((e.from.clone(), e.to.clone(), e.edge_type.as_str())))
        .collect()
}
