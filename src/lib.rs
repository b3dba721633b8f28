//! Forensic Case Intelligence Pipeline
//!
//! A deterministic, chain-of-custody-preserving pipeline that turns
//! investigative case documents into a queryable evidence graph: parse,
//! clean, chunk, annotate, embed, link, reconstruct a timeline, and
//! answer questions with mandatory source citation. Every derived
//! artefact traces back to a source document, page range, and chunk
//! identifier; nothing is ever invented, summarised, or reconciled on
//! the pipeline's behalf.

pub mod ai;
pub mod chunking;
pub mod cleaning;
pub mod embedding;
pub mod error;
pub mod graph;
pub mod ids;
pub mod ner;
pub mod parsing;
pub mod rag;
pub mod timeline;

use chrono::NaiveDate;

/// Aggregates every stage's configuration. Each field has the same
/// defaults as the stage's own `*Config::default()`; `from_env` overlays
/// environment variables (see the crate's external-interface docs for
/// the full `FCIP_*` table) on top of those defaults.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub parsing: parsing::ParsingConfig,
    pub cleaning: cleaning::CleaningConfig,
    pub chunking: chunking::ChunkingConfig,
    pub ner: NerConfigValues,
    pub embedding: EmbeddingConfigValues,
    /// Shared root for P7's vector metadata sidecar and P8's graph
    /// sidecar; each stage is rooted at its own subdirectory.
    pub storage_dir: std::path::PathBuf,
    pub timeline: timeline::TimelineConfig,
    pub rag: rag::RagConfig,
}

impl PipelineConfig {
    pub fn embedding_storage_dir(&self) -> std::path::PathBuf {
        self.storage_dir.join("vectors")
    }

    pub fn graph_storage_dir(&self) -> std::path::PathBuf {
        self.storage_dir.join("graph")
    }
}

/// Plain-data mirror of `ner::NerConfig` (kept `Clone`/`Debug` for
/// aggregation; `ner::NerConfig` itself stays minimal).
#[derive(Debug, Clone)]
pub struct NerConfigValues {
    pub statistical_base_confidence: f64,
}

impl From<&NerConfigValues> for ner::NerConfig {
    fn from(v: &NerConfigValues) -> Self {
        ner::NerConfig { statistical_base_confidence: v.statistical_base_confidence }
    }
}

#[derive(Debug, Clone)]
pub struct EmbeddingConfigValues {
    pub dimension: usize,
    pub index_type: embedding::IndexType,
}

impl From<&EmbeddingConfigValues> for embedding::EmbeddingConfig {
    fn from(v: &EmbeddingConfigValues) -> Self {
        embedding::EmbeddingConfig { dimension: v.dimension, index_type: v.index_type }
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            parsing: parsing::ParsingConfig::default(),
            cleaning: cleaning::CleaningConfig::default(),
            chunking: chunking::ChunkingConfig::default(),
            ner: NerConfigValues { statistical_base_confidence: 0.85 },
            embedding: EmbeddingConfigValues { dimension: 384, index_type: embedding::IndexType::Flat },
            storage_dir: std::path::PathBuf::from("./storage"),
            timeline: timeline::TimelineConfig::default(),
            rag: rag::RagConfig::default(),
        }
    }
}

fn env_usize(key: &str, default: usize) -> usize {
    std::env::var(key).ok().and_then(|v| v.parse().ok()).unwrap_or(default)
}

fn env_f64(key: &str, default: f64) -> f64 {
    std::env::var(key).ok().and_then(|v| v.parse().ok()).unwrap_or(default)
}

fn env_bool(key: &str, default: bool) -> bool {
    std::env::var(key).ok().and_then(|v| v.parse().ok()).unwrap_or(default)
}

impl PipelineConfig {
    /// Loads configuration, overlaying `FCIP_*` environment variables on
    /// top of the documented defaults. `reference_date` has no sane
    /// environment-variable encoding for determinism and is left `None`
    /// unless `FCIP_REFERENCE_DATE` (`YYYY-MM-DD`) is set.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        config.parsing.min_page_repetition = env_usize("FCIP_MIN_PAGE_REPETITION", config.parsing.min_page_repetition);
        config.cleaning.reference_date = std::env::var("FCIP_REFERENCE_DATE")
            .ok()
            .and_then(|v| NaiveDate::parse_from_str(&v, "%Y-%m-%d").ok());
        config.chunking.max_tokens = env_usize("FCIP_MAX_TOKENS", config.chunking.max_tokens);
        config.chunking.min_tokens = env_usize("FCIP_MIN_TOKENS", config.chunking.min_tokens);
        config.ner.statistical_base_confidence = env_f64("FCIP_NER_BASE_CONFIDENCE", config.ner.statistical_base_confidence);
        if let Ok(index_type) = std::env::var("FCIP_INDEX_TYPE") {
            config.embedding.index_type = match index_type.as_str() {
                "hnsw" => embedding::IndexType::Hnsw,
                _ => embedding::IndexType::Flat,
            };
        }
        if let Ok(dir) = std::env::var("FCIP_STORAGE_DIR") {
            config.storage_dir = std::path::PathBuf::from(dir);
        }
        config.timeline.gap_threshold_minutes = env_usize("FCIP_GAP_THRESHOLD_MINUTES", config.timeline.gap_threshold_minutes as usize) as i64;
        config.timeline.significant_gap_minutes = env_usize("FCIP_SIGNIFICANT_GAP_MINUTES", config.timeline.significant_gap_minutes as usize) as i64;
        config.rag.top_k = env_usize("FCIP_TOP_K", config.rag.top_k);
        config.rag.min_score = env_f64("FCIP_MIN_SCORE", config.rag.min_score);
        config.rag.max_context_tokens = env_usize("FCIP_MAX_CONTEXT_TOKENS", config.rag.max_context_tokens);
        config.rag.include_graph = env_bool("FCIP_INCLUDE_GRAPH", config.rag.include_graph);
        config.rag.include_timeline = env_bool("FCIP_INCLUDE_TIMELINE", config.rag.include_timeline);
        config.rag.include_contradictions = env_bool("FCIP_INCLUDE_CONTRADICTIONS", config.rag.include_contradictions);

        config
    }
}
