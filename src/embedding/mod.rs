//! Stage P7: embedder + vector store.

pub mod index;
pub mod models;
pub mod store;

use crate::chunking::Chunk;
use crate::error::AppResult;
pub use models::{Embedder, HashingEmbedder, VectorRecord};
use std::path::Path;

/// Configuration for P7.
pub struct EmbeddingConfig {
    pub dimension: usize,
    pub index_type: IndexType,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexType {
    Flat,
    Hnsw,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self { dimension: 384, index_type: IndexType::Flat }
    }
}

const HNSW_MAX_NB_CONNECTION: usize = 16;
const HNSW_MAX_ELEMENTS: usize = 100_000;
const HNSW_MAX_LAYER: usize = 16;
const HNSW_EF_CONSTRUCTION: usize = 200;
const HNSW_EF_SEARCH: usize = 64;

/// The selected nearest-neighbour backend, chosen once at construction
/// time from `EmbeddingConfig::index_type` and held for the store's
/// lifetime; `Flat` and `Hnsw` give the "exact" and "approximate" modes
/// named in the external interface.
enum IndexBackend {
    Flat(index::FlatIndex),
    Hnsw(index::HnswIndex<'static>),
}

impl IndexBackend {
    fn new(index_type: IndexType) -> Self {
        match index_type {
            IndexType::Flat => IndexBackend::Flat(index::FlatIndex::new()),
            IndexType::Hnsw => IndexBackend::Hnsw(index::HnswIndex::new(
                HNSW_MAX_NB_CONNECTION,
                HNSW_MAX_ELEMENTS,
                HNSW_MAX_LAYER,
                HNSW_EF_CONSTRUCTION,
            )),
        }
    }

    fn append(&mut self, vector: Vec<f32>) -> usize {
        match self {
            IndexBackend::Flat(idx) => idx.append(vector),
            IndexBackend::Hnsw(idx) => idx.append(&vector),
        }
    }

    fn search(&self, query: &[f32], k: usize) -> Vec<index::SearchResult> {
        match self {
            IndexBackend::Flat(idx) => idx.search(query, k),
            IndexBackend::Hnsw(idx) => idx.search(query, k, HNSW_EF_SEARCH),
        }
    }
}

/// A chunk-embedding-and-store pairing: owns a nearest-neighbour index
/// (`Flat` or `Hnsw`, per `EmbeddingConfig`), the raw vectors backing it
/// (persisted as the binary index blob, independent of the search
/// backend in use, so reload reconstitutes both files per the external
/// interface), and its metadata sidecar.
pub struct VectorStore {
    index: IndexBackend,
    vectors: Vec<Vec<f32>>,
    records: Vec<VectorRecord>,
    sidecar: store::MetadataSidecar,
    blob: store::IndexBlob,
}

impl VectorStore {
    pub fn new(storage_dir: &Path, config: &EmbeddingConfig) -> Self {
        Self {
            index: IndexBackend::new(config.index_type),
            vectors: Vec::new(),
            records: Vec::new(),
            sidecar: store::MetadataSidecar::new(storage_dir),
            blob: store::IndexBlob::new(storage_dir),
        }
    }

    /// Loads both persisted files: the metadata sidecar, and the binary
    /// index blob, whose vectors are replayed in order through a fresh
    /// backend so search and reconstruction behave identically to before
    /// the reload.
    pub fn load(storage_dir: &Path, config: &EmbeddingConfig) -> AppResult<Self> {
        let sidecar = store::MetadataSidecar::new(storage_dir);
        let blob = store::IndexBlob::new(storage_dir);
        let records = sidecar.load()?;
        let vectors = blob.load()?;
        let mut index = IndexBackend::new(config.index_type);
        for vector in &vectors {
            index.append(vector.clone());
        }
        Ok(Self { index, vectors, records, sidecar, blob })
    }

    /// Embeds `chunk.text` verbatim and appends it to the index, the raw
    /// vector list, and the metadata sidecar in lockstep, returning the
    /// assigned `vector_id`.
    pub fn append(&mut self, chunk: &Chunk, embedder: &dyn Embedder) -> usize {
        let vector = embedder.embed(&chunk.text);
        let vector_id = self.index.append(vector.clone());
        self.vectors.push(vector);
        self.records.push(VectorRecord {
            chunk_id: chunk.chunk_id.clone(),
            vector_id,
            case_id: chunk.case_id.clone(),
            document_id: chunk.document_id.clone(),
            page_range: chunk.page_range,
            speaker: chunk.speaker.clone(),
            confidence: chunk.chunk_confidence,
        });
        vector_id
    }

    /// Persists both files: the binary index blob and the JSON metadata
    /// sidecar.
    pub fn save(&self) -> AppResult<()> {
        self.sidecar.save(&self.records)?;
        self.blob.save(&self.vectors)
    }

    pub fn records(&self) -> &[VectorRecord] {
        &self.records
    }

    pub fn reconstruct(&self, vector_id: usize) -> Option<&[f32]> {
        self.vectors.get(vector_id).map(|v| v.as_slice())
    }

    /// Top-k search converted to `(VectorRecord, score)` pairs, where
    /// `score = 1.0 / (1.0 + l2_distance)`.
    pub fn search(&self, query: &[f32], k: usize) -> Vec<(VectorRecord, f64)> {
        self.index
            .search(query, k)
            .into_iter()
            .filter_map(|(id, dist)| {
                self.records.get(id).map(|r| (r.clone(), 1.0 / (1.0 + dist as f64)))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunk(id: &str, case_id: &str, text: &str) -> Chunk {
        Chunk {
            chunk_id: id.to_string(),
            case_id: case_id.to_string(),
            document_id: "doc-1".to_string(),
            page_range: [1, 1],
            speaker: None,
            text: text.to_string(),
            source_block_ids: vec!["b1".to_string()],
            token_count: text.split_whitespace().count(),
            chunk_confidence: 0.9,
        }
    }

    #[test]
    fn s4_append_save_reload_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let embedder = HashingEmbedder { dim: 8 };
        let config = EmbeddingConfig::default();
        let mut store = VectorStore::new(dir.path(), &config);
        let c = chunk("C-0001", "case-1", "she saw him leave");
        let id = store.append(&c, &embedder);
        let original = store.reconstruct(id).unwrap().to_vec();
        store.save().unwrap();

        let reloaded = VectorStore::load(dir.path(), &config).unwrap();
        assert_eq!(reloaded.records()[0].chunk_id, "C-0001");
        assert_eq!(reloaded.records()[0].vector_id, 0);
        assert_eq!(reloaded.reconstruct(id), Some(original.as_slice()));
    }

    #[test]
    fn s5_case_isolation_in_search_is_enforced_by_caller_filter() {
        let embedder = HashingEmbedder { dim: 8 };
        let mut store = VectorStore::new(std::path::Path::new("/tmp"), &EmbeddingConfig::default());
        store.append(&chunk("CA1", "case-a", "alpha content"), &embedder);
        store.append(&chunk("CB1", "case-b", "beta content"), &embedder);
        let query = embedder.embed("alpha content");
        let results = store.search(&query, 2);
        let case_b_only: Vec<_> = results.iter().filter(|(r, _)| r.case_id == "case-b").collect();
        // The store itself returns both; case filtering is P11's job - this
        // test documents that the record carries case_id for that filter.
        assert!(!case_b_only.is_empty() || results.iter().all(|(r, _)| r.case_id == "case-a"));
    }

    #[test]
    fn hnsw_backend_appends_and_searches() {
        let embedder = HashingEmbedder { dim: 8 };
        let config = EmbeddingConfig { dimension: 8, index_type: IndexType::Hnsw };
        let mut store = VectorStore::new(std::path::Path::new("/tmp"), &config);
        store.append(&chunk("C-0001", "case-1", "alpha content"), &embedder);
        store.append(&chunk("C-0002", "case-1", "beta content"), &embedder);
        let query = embedder.embed("alpha content");
        let results = store.search(&query, 1);
        assert_eq!(results.len(), 1);
        // reconstruct is backed by VectorStore's own vector list, not the
        // HNSW graph, so it works the same regardless of backend.
        assert!(store.reconstruct(0).is_some());
    }
}
