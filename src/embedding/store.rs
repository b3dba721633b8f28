//! Binary index blob + JSON sidecar persistence for P7.
//!
//! Atomic tmp-file + rename writes for both files.

use super::models::VectorRecord;
use crate::error::{AppError, AppResult};
use std::path::{Path, PathBuf};

const SIDECAR_FILENAME: &str = "metadata.json";
const BLOB_FILENAME: &str = "index.bin";

pub struct MetadataSidecar {
    path: PathBuf,
}

impl MetadataSidecar {
    pub fn new(storage_dir: &Path) -> Self {
        Self { path: storage_dir.join(SIDECAR_FILENAME) }
    }

    /// Writes `records` atomically: write to a temp file, then rename.
    pub fn save(&self, records: &[VectorRecord]) -> AppResult<()> {
        for (i, record) in records.iter().enumerate() {
            if record.vector_id != i {
                return Err(AppError::Index(format!(
                    "metadata[{i}].vector_id ({}) does not equal its array position",
                    record.vector_id
                )));
            }
        }
        let json = serde_json::to_string_pretty(records)?;
        let tmp_path = self.path.with_extension("json.tmp");
        std::fs::write(&tmp_path, json)?;
        std::fs::rename(&tmp_path, &self.path)?;
        log::info!("wrote {} vector records to {}", records.len(), self.path.display());
        Ok(())
    }

    pub fn load(&self) -> AppResult<Vec<VectorRecord>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let data = std::fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&data)?)
    }
}

/// The binary index blob: every raw embedding vector, in insertion order,
/// as length-prefixed little-endian `f32` records (`u32` element count
/// followed by that many `f32`s). Reloading replays these through a fresh
/// backend so `reconstruct`/`search` work identically after restart.
pub struct IndexBlob {
    path: PathBuf,
}

impl IndexBlob {
    pub fn new(storage_dir: &Path) -> Self {
        Self { path: storage_dir.join(BLOB_FILENAME) }
    }

    pub fn save(&self, vectors: &[Vec<f32>]) -> AppResult<()> {
        let mut buf = Vec::new();
        for vector in vectors {
            buf.extend_from_slice(&(vector.len() as u32).to_le_bytes());
            for x in vector {
                buf.extend_from_slice(&x.to_le_bytes());
            }
        }
        let tmp_path = self.path.with_extension("bin.tmp");
        std::fs::write(&tmp_path, &buf)?;
        std::fs::rename(&tmp_path, &self.path)?;
        log::info!("wrote {} vectors to {}", vectors.len(), self.path.display());
        Ok(())
    }

    pub fn load(&self) -> AppResult<Vec<Vec<f32>>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let data = std::fs::read(&self.path)?;
        let mut vectors = Vec::new();
        let mut offset = 0;
        while offset < data.len() {
            let header = data.get(offset..offset + 4).ok_or_else(|| {
                AppError::Index("truncated index blob: incomplete length prefix".to_string())
            })?;
            let len = u32::from_le_bytes(header.try_into().unwrap()) as usize;
            offset += 4;
            let body_len = len * 4;
            let body = data.get(offset..offset + body_len).ok_or_else(|| {
                AppError::Index("truncated index blob: incomplete vector body".to_string())
            })?;
            let vector = body.chunks_exact(4).map(|b| f32::from_le_bytes(b.try_into().unwrap())).collect();
            vectors.push(vector);
            offset += body_len;
        }
        Ok(vectors)
    }
}
