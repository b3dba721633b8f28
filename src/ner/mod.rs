//! Stage P6: entity annotator.
//!
//! Pure per chunk: combines a statistical labeller with rule-based
//! pattern extractors, merges spans (rule-based wins overlaps), scores
//! confidence, and assigns `role` from speaker metadata only.

pub mod models;
pub mod rules;
pub mod statistical;

use crate::chunking::Chunk;
use crate::ids;
pub use models::{EntitySource, EntityType, ExtractedEntity};
use statistical::StatisticalNer;

/// Configuration for P6.
pub struct NerConfig {
    pub statistical_base_confidence: f64,
}

impl Default for NerConfig {
    fn default() -> Self {
        Self {
            statistical_base_confidence: 0.85,
        }
    }
}

fn spans_overlap(a_start: usize, a_end: usize, b_start: usize, b_end: usize) -> bool {
    a_start < b_end && b_start < a_end
}

fn assign_role(entity_type: EntityType, speaker: &Option<String>) -> Option<String> {
    if entity_type != EntityType::Person {
        return None;
    }
    let speaker = speaker.as_ref()?;
    let upper = speaker.to_uppercase();
    if upper.contains("WITNESS") {
        Some("WITNESS".to_string())
    } else if upper.contains("SUSPECT") {
        Some("SUSPECT".to_string())
    } else if upper.contains("VICTIM") {
        Some("VICTIM".to_string())
    } else if upper.contains("OFFICER") || upper.contains("DETECTIVE") || upper.contains("DET") {
        Some("OFFICER".to_string())
    } else {
        None
    }
}

/// Annotates a single chunk's entities.
pub fn annotate(chunk: &Chunk, statistical: &dyn StatisticalNer, config: &NerConfig) -> Vec<ExtractedEntity> {
    let rule_matches = rules::extract(&chunk.text);
    let rule_spans: Vec<(usize, usize)> = rule_matches.iter().map(|m| (m.start, m.end)).collect();

    let statistical_spans: Vec<_> = statistical
        .label(&chunk.text)
        .into_iter()
        .filter_map(|s| statistical::map_label(&s.label).map(|t| (t, s)))
        .filter(|(_, s)| !rule_spans.iter().any(|(rs, re)| spans_overlap(*rs, *re, s.start, s.end)))
        .collect();

    let mut combined: Vec<ExtractedEntity> = Vec::new();

    for (entity_type, span) in statistical_spans {
        let confidence = (config.statistical_base_confidence * chunk.chunk_confidence).clamp(0.0, 1.0);
        let confidence = (confidence * 100.0).round() / 100.0;
        let text = chunk.text[span.start..span.end].to_string();
        let entity_id = ids::entity_id(&chunk.chunk_id, entity_type.as_str(), span.start, span.end, &text);
        combined.push(ExtractedEntity {
            entity_id,
            entity_type,
            text,
            chunk_id: chunk.chunk_id.clone(),
            document_id: chunk.document_id.clone(),
            case_id: chunk.case_id.clone(),
            page_range: chunk.page_range,
            start_char: span.start,
            end_char: span.end,
            confidence,
            source: EntitySource::Statistical,
            role: assign_role(entity_type, &chunk.speaker),
        });
    }

    for m in rule_matches {
        let confidence = (m.base_confidence * chunk.chunk_confidence).clamp(0.0, 1.0);
        let confidence = (confidence * 100.0).round() / 100.0;
        let entity_id = ids::entity_id(&chunk.chunk_id, m.entity_type.as_str(), m.start, m.end, &m.text);
        combined.push(ExtractedEntity {
            entity_id,
            entity_type: m.entity_type,
            text: m.text,
            chunk_id: chunk.chunk_id.clone(),
            document_id: chunk.document_id.clone(),
            case_id: chunk.case_id.clone(),
            page_range: chunk.page_range,
            start_char: m.start,
            end_char: m.end,
            confidence,
            source: EntitySource::RuleBased,
            role: assign_role(m.entity_type, &chunk.speaker),
        });
    }

    combined.sort_by_key(|e| e.start_char);
    combined
}

#[cfg(test)]
mod tests {
    use super::*;
    use statistical::NullStatisticalNer;

    fn chunk(text: &str, speaker: Option<&str>) -> Chunk {
        Chunk {
            chunk_id: "C-0001".to_string(),
            case_id: "case-1".to_string(),
            document_id: "doc-1".to_string(),
            page_range: [1, 1],
            speaker: speaker.map(String::from),
            text: text.to_string(),
            source_block_ids: vec!["b1".to_string()],
            token_count: text.split_whitespace().count(),
            chunk_confidence: 1.0,
        }
    }

    #[test]
    fn s9_rule_based_wins_overlap() {
        struct FakeNer;
        impl StatisticalNer for FakeNer {
            fn label(&self, _text: &str) -> Vec<statistical::StatisticalSpan> {
                vec![statistical::StatisticalSpan { label: "PERSON".to_string(), start: 0, end: 13 }]
            }
        }
        let c = chunk("555-123-4567 called", None);
        let entities = annotate(&c, &FakeNer, &NerConfig::default());
        assert!(entities.iter().all(|e| e.entity_type != EntityType::Person));
        assert!(entities.iter().any(|e| e.entity_type == EntityType::Phone));
    }

    #[test]
    fn role_assigned_only_from_speaker() {
        let c = chunk("fingerprint found", Some("WITNESS JONES"));
        let entities = annotate(&c, &NullStatisticalNer, &NerConfig::default());
        // Evidence entities never get a role (role is PERSON-only).
        assert!(entities.iter().all(|e| e.role.is_none()));
    }

    #[test]
    fn confidence_scaled_by_chunk_confidence() {
        let mut c = chunk("a knife was found", None);
        c.chunk_confidence = 0.5;
        let entities = annotate(&c, &NullStatisticalNer, &NerConfig::default());
        let weapon = entities.iter().find(|e| e.entity_type == EntityType::Weapon).unwrap();
        assert_eq!(weapon.confidence, 0.45);
    }

    #[test]
    fn entity_ids_are_deterministic() {
        let c = chunk("a knife was found", None);
        let first = annotate(&c, &NullStatisticalNer, &NerConfig::default());
        let second = annotate(&c, &NullStatisticalNer, &NerConfig::default());
        assert_eq!(
            first.iter().map(|e| &e.entity_id).collect::<Vec<_>>(),
            second.iter().map(|e| &e.entity_id).collect::<Vec<_>>()
        );
    }
}
