//! Vector record shape and embedding capability boundary (P7).

use serde::{Deserialize, Serialize};

/// A stored vector's metadata. `vector_id` must equal its position in the
/// sidecar array, which must equal its position in the index.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VectorRecord {
    pub chunk_id: String,
    pub vector_id: usize,
    pub case_id: String,
    pub document_id: String,
    pub page_range: [u32; 2],
    pub speaker: Option<String>,
    pub confidence: f64,
}

/// Injected embedding capability: text -> fixed-dimension vector.
pub trait Embedder: Send + Sync {
    fn dimension(&self) -> usize;
    fn embed(&self, text: &str) -> Vec<f32>;
}

/// A deterministic hashing embedder used when no real model is
/// configured. Not semantically meaningful, but stable and dependency-
/// free, matching the pipeline's "capability bundle" framing for a
/// swappable black-box model.
pub struct HashingEmbedder {
    pub dim: usize,
}

impl Embedder for HashingEmbedder {
    fn dimension(&self) -> usize {
        self.dim
    }

    fn embed(&self, text: &str) -> Vec<f32> {
        use sha2::{Digest, Sha256};
        let mut vector = vec![0f32; self.dim];
        for (i, word) in text.split_whitespace().enumerate() {
            let mut hasher = Sha256::new();
            hasher.update(word.as_bytes());
            hasher.update(i.to_le_bytes());
            let digest = hasher.finalize();
            for (j, slot) in vector.iter_mut().enumerate() {
                let byte = digest[j % digest.len()];
                *slot += (byte as f32 / 255.0) - 0.5;
            }
        }
        let norm: f32 = vector.iter().map(|v| v * v).sum::<f32>().sqrt();
        if norm > 0.0 {
            for v in vector.iter_mut() {
                *v /= norm;
            }
        }
        vector
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hashing_embedder_is_deterministic() {
        let embedder = HashingEmbedder { dim: 16 };
        let a = embedder.embed("hello world");
        let b = embedder.embed("hello world");
        assert_eq!(a, b);
    }

    #[test]
    fn hashing_embedder_is_normalized() {
        let embedder = HashingEmbedder { dim: 16 };
        let v = embedder.embed("some text here");
        let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 1e-4);
    }
}
