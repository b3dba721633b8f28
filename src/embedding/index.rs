//! Nearest-neighbour index over the embedding space (P7).
//!
//! Two configurations: `Flat` (exact brute-force L2 scan, no extra crate)
//! and `Hnsw` (approximate, backed by `hnsw_rs`, grounded in
//! `ricable-ruvector`/`bravo1goingdark-ucfp`/`Toasterson-akh-medu`).

use hnsw_rs::prelude::*;

/// One nearest-neighbour result: `(vector_id, l2_distance)`.
pub type SearchResult = (usize, f32);

fn l2_distance(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b.iter()).map(|(x, y)| (x - y) * (x - y)).sum::<f32>().sqrt()
}

/// Exact brute-force index. Vector positions are assigned in strict
/// insertion order.
pub struct FlatIndex {
    vectors: Vec<Vec<f32>>,
}

impl FlatIndex {
    pub fn new() -> Self {
        Self { vectors: Vec::new() }
    }

    /// Appends a vector, returning its assigned `vector_id`.
    pub fn append(&mut self, vector: Vec<f32>) -> usize {
        let id = self.vectors.len();
        self.vectors.push(vector);
        id
    }

    pub fn reconstruct(&self, vector_id: usize) -> Option<&[f32]> {
        self.vectors.get(vector_id).map(|v| v.as_slice())
    }

    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }

    /// Returns up to `k` nearest neighbours to `query`, sorted by
    /// ascending distance.
    pub fn search(&self, query: &[f32], k: usize) -> Vec<SearchResult> {
        let mut scored: Vec<SearchResult> = self
            .vectors
            .iter()
            .enumerate()
            .map(|(id, v)| (id, l2_distance(query, v)))
            .collect();
        scored.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(k);
        scored
    }
}

impl Default for FlatIndex {
    fn default() -> Self {
        Self::new()
    }
}

/// Approximate index backed by `hnsw_rs`. Vector positions are still
/// assigned in strict insertion order via an auxiliary counter, since the
/// underlying HNSW structure is keyed by caller-supplied ids.
pub struct HnswIndex<'a> {
    hnsw: Hnsw<'a, f32, DistL2>,
    next_id: usize,
}

impl<'a> HnswIndex<'a> {
    pub fn new(max_nb_connection: usize, max_elements: usize, max_layer: usize, ef_construction: usize) -> Self {
        Self {
            hnsw: Hnsw::new(max_nb_connection, max_elements, max_layer, ef_construction, DistL2 {}),
            next_id: 0,
        }
    }

    /// Appends a vector, returning its assigned `vector_id`.
    pub fn append(&mut self, vector: &[f32]) -> usize {
        let id = self.next_id;
        self.hnsw.insert((vector, id));
        self.next_id += 1;
        id
    }

    pub fn len(&self) -> usize {
        self.next_id
    }

    pub fn is_empty(&self) -> bool {
        self.next_id == 0
    }

    /// Returns up to `k` approximate nearest neighbours to `query`.
    pub fn search(&self, query: &[f32], k: usize, ef_search: usize) -> Vec<SearchResult> {
        self.hnsw
            .search(query, k, ef_search)
            .into_iter()
            .map(|n| (n.d_id, n.distance))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flat_index_assigns_monotonic_ids() {
        let mut index = FlatIndex::new();
        assert_eq!(index.append(vec![1.0, 0.0]), 0);
        assert_eq!(index.append(vec![0.0, 1.0]), 1);
    }

    #[test]
    fn s4_flat_index_round_trips_vectors() {
        let mut index = FlatIndex::new();
        let v = vec![0.1, 0.2, 0.3];
        let id = index.append(v.clone());
        assert_eq!(index.reconstruct(id), Some(v.as_slice()));
    }

    #[test]
    fn flat_index_search_returns_closest_first() {
        let mut index = FlatIndex::new();
        index.append(vec![0.0, 0.0]);
        index.append(vec![10.0, 10.0]);
        let results = index.search(&[0.1, 0.1], 2);
        assert_eq!(results[0].0, 0);
    }
}
