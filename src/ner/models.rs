//! Entity type vocabulary and record shape (P6).
//!
//! Closed vocabulary - do not extend without explicit sign-off.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum EntityType {
    Person,
    Witness,
    Suspect,
    Location,
    Time,
    Evidence,
    Weapon,
    Phone,
    Address,
}

impl EntityType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityType::Person => "PERSON",
            EntityType::Witness => "WITNESS",
            EntityType::Suspect => "SUSPECT",
            EntityType::Location => "LOCATION",
            EntityType::Time => "TIME",
            EntityType::Evidence => "EVIDENCE",
            EntityType::Weapon => "WEAPON",
            EntityType::Phone => "PHONE",
            EntityType::Address => "ADDRESS",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum EntitySource {
    Statistical,
    RuleBased,
    Metadata,
}

impl EntitySource {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntitySource::Statistical => "STATISTICAL",
            EntitySource::RuleBased => "RULE_BASED",
            EntitySource::Metadata => "METADATA",
        }
    }
}

/// A per-chunk extracted entity with full provenance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractedEntity {
    pub entity_id: String,
    pub entity_type: EntityType,
    pub text: String,
    pub chunk_id: String,
    pub document_id: String,
    pub case_id: String,
    pub page_range: [u32; 2],
    pub start_char: usize,
    pub end_char: usize,
    pub confidence: f64,
    pub source: EntitySource,
    pub role: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entity_type_as_str_round_trips_vocabulary() {
        assert_eq!(EntityType::Witness.as_str(), "WITNESS");
        assert_eq!(EntityType::Weapon.as_str(), "WEAPON");
    }
}
