//! Step 2: graph fact lookup (P11). A crude, explicitly "no NLP
//! inference" heuristic - candidate tokens are capitalized words minus a
//! fixed stoplist.

use super::models::GraphFact;
use crate::graph::{GraphEdge, GraphNode, NodeType};
use std::collections::HashSet;

const STOPLIST: &[&str] = &[
    "who", "what", "when", "where", "why", "how", "did", "does", "do", "was", "were", "is", "are",
    "the", "a", "an", "to", "from", "with", "and", "or", "of", "in", "on", "at", "by", "for",
];

fn candidate_tokens(question: &str) -> Vec<String> {
    question
        .split_whitespace()
        .map(|w| w.trim_end_matches(|c| "?.,!\"'".contains(c)))
        .filter(|w| !w.is_empty())
        .filter(|w| !STOPLIST.contains(&w.to_lowercase().as_str()))
        .filter(|w| w.chars().next().map(|c| c.is_uppercase()).unwrap_or(false))
        .map(String::from)
        .collect()
}

fn is_person_like(node_type: NodeType) -> bool {
    matches!(node_type, NodeType::Person)
}

/// Finds person nodes matching question tokens, unions with nodes whose
/// `source_chunk_id` is among the retrieved chunks, then collects every
/// edge touching the union as a deduplicated `GraphFact` set.
pub fn lookup_facts(question: &str, nodes: &[&GraphNode], edges: &[&GraphEdge], retrieved_chunk_ids: &HashSet<&str>) -> Vec<GraphFact> {
    let candidates = candidate_tokens(question);

    let mut matched_ids: HashSet<&str> = HashSet::new();
    for node in nodes {
        if is_person_like(node.node_type) {
            let name_lower = node.name.to_lowercase();
            if candidates.iter().any(|c| {
                let c_lower = c.to_lowercase();
                name_lower.contains(&c_lower) || c_lower.contains(&name_lower)
            }) {
                matched_ids.insert(&node.node_id);
            }
        }
        if retrieved_chunk_ids.contains(node.provenance.source_chunk_id.as_str()) {
            matched_ids.insert(&node.node_id);
        }
    }

    let node_name: std::collections::HashMap<&str, &str> = nodes.iter().map(|n| (n.node_id.as_str(), n.name.as_str())).collect();

    let mut seen = HashSet::new();
    let mut facts = Vec::new();
    for edge in edges {
        if !matched_ids.contains(edge.from.as_str()) && !matched_ids.contains(edge.to.as_str()) {
            continue;
        }
        let subject = node_name.get(edge.from.as_str()).copied().unwrap_or(&edge.from).to_string();
        let object = node_name.get(edge.to.as_str()).copied().unwrap_or(&edge.to).to_string();
        let fact = GraphFact { subject, predicate: edge.edge_type.as_str().to_string(), object };
        if seen.insert((fact.subject.clone(), fact.predicate.clone(), fact.object.clone())) {
            facts.push(fact);
        }
    }

    facts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{EdgeType, Provenance};

    fn node(id: &str, node_type: NodeType, name: &str, source_chunk_id: &str) -> GraphNode {
        GraphNode {
            node_id: id.to_string(),
            node_type,
            name: name.to_string(),
            role: None,
            provenance: Provenance { source_chunk_id: source_chunk_id.to_string(), document_id: "doc-1".to_string(), page_range: [1, 1], confidence: 0.9 },
        }
    }

    #[test]
    fn candidate_tokens_drops_stoplist_and_lowercase_words() {
        let tokens = candidate_tokens("Who saw John Smith near the house?");
        assert_eq!(tokens, vec!["John".to_string(), "Smith".to_string()]);
    }

    #[test]
    fn matches_person_node_by_name_overlap() {
        let n1 = node("Person:john smith:case-1", NodeType::Person, "John Smith", "C-0001");
        let n2 = node("Location:house:case-1", NodeType::Location, "house", "C-0002");
        let nodes = vec![&n1, &n2];
        let edge = GraphEdge {
            from: n1.node_id.clone(),
            to: n2.node_id.clone(),
            edge_type: EdgeType::Witnessed,
            provenance: n1.provenance.clone(),
        };
        let edges = vec![&edge];
        let facts = lookup_facts("Where was John Smith?", &nodes, &edges, &HashSet::new());
        assert_eq!(facts.len(), 1);
        assert_eq!(facts[0].subject, "John Smith");
        assert_eq!(facts[0].predicate, "WITNESSED");
    }
}
