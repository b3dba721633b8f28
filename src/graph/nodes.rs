//! Node derivation from entities and documents (P8).

use super::models::{GraphNode, NodeType, Provenance};
use crate::ids;
use crate::ner::{EntityType, ExtractedEntity};
use std::collections::HashMap;

fn node_type_for(entity_type: EntityType) -> Option<NodeType> {
    match entity_type {
        EntityType::Person | EntityType::Witness | EntityType::Suspect => Some(NodeType::Person),
        EntityType::Location | EntityType::Address => Some(NodeType::Location),
        EntityType::Time => Some(NodeType::Event),
        EntityType::Evidence | EntityType::Weapon | EntityType::Phone => Some(NodeType::Evidence),
    }
}

/// Derives nodes from a case's entities, deduplicated by `node_id`
/// (first-write-wins within this call).
pub fn derive_entity_nodes(case_id: &str, entities: &[ExtractedEntity]) -> Vec<GraphNode> {
    let mut seen: HashMap<String, ()> = HashMap::new();
    let mut out = Vec::new();

    for entity in entities {
        let Some(node_type) = node_type_for(entity.entity_type) else { continue };
        let node_id = ids::node_id(node_type.as_str(), &entity.text, case_id);
        if seen.contains_key(&node_id) {
            continue;
        }
        seen.insert(node_id.clone(), ());
        out.push(GraphNode {
            node_id,
            node_type,
            name: entity.text.clone(),
            role: entity.role.clone(),
            provenance: Provenance {
                source_chunk_id: entity.chunk_id.clone(),
                document_id: entity.document_id.clone(),
                page_range: entity.page_range,
                confidence: entity.confidence,
            },
        });
    }

    out
}

/// One document's first-seen chunk provenance, used to build its
/// Document node.
pub struct DocumentChunkRef<'a> {
    pub document_id: &'a str,
    pub chunk_id: &'a str,
    pub page_range: [u32; 2],
}

/// Derives one Document node per unique `document_id`, using the first
/// occurrence's provenance. Always confidence 1.0; `document_id` used
/// verbatim in the node_id, not normalized.
pub fn derive_document_nodes(case_id: &str, chunk_refs: &[DocumentChunkRef]) -> Vec<GraphNode> {
    let mut seen: HashMap<&str, ()> = HashMap::new();
    let mut out = Vec::new();

    for chunk_ref in chunk_refs {
        if seen.contains_key(chunk_ref.document_id) {
            continue;
        }
        seen.insert(chunk_ref.document_id, ());
        out.push(GraphNode {
            node_id: ids::document_node_id(chunk_ref.document_id, case_id),
            node_type: NodeType::Document,
            name: chunk_ref.document_id.to_string(),
            role: None,
            provenance: Provenance {
                source_chunk_id: chunk_ref.chunk_id.to_string(),
                document_id: chunk_ref.document_id.to_string(),
                page_range: chunk_ref.page_range,
                confidence: 1.0,
            },
        });
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ner::EntitySource;

    fn entity(text: &str, entity_type: EntityType, chunk_id: &str, confidence: f64) -> ExtractedEntity {
        ExtractedEntity {
            entity_id: format!("ENT_{text}"),
            entity_type,
            text: text.to_string(),
            chunk_id: chunk_id.to_string(),
            document_id: "doc-1".to_string(),
            case_id: "case-1".to_string(),
            page_range: [1, 1],
            start_char: 0,
            end_char: text.len(),
            confidence,
            source: EntitySource::RuleBased,
            role: None,
        }
    }

    #[test]
    fn dedups_by_node_id() {
        let entities = vec![
            entity("John Smith", EntityType::Witness, "C-0001", 0.8),
            entity("John Smith", EntityType::Witness, "C-0002", 0.9),
        ];
        let nodes = derive_entity_nodes("case-1", &entities);
        assert_eq!(nodes.len(), 1);
        assert_eq!(nodes[0].provenance.source_chunk_id, "C-0001");
    }

    #[test]
    fn document_node_uses_document_id_verbatim() {
        let refs = vec![DocumentChunkRef { document_id: "Doc_ABC", chunk_id: "C-0001", page_range: [1, 1] }];
        let nodes = derive_document_nodes("case-1", &refs);
        assert_eq!(nodes[0].node_id, "Document:Doc_ABC:case-1");
        assert_eq!(nodes[0].provenance.confidence, 1.0);
    }
}
