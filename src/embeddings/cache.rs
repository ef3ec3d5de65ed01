//! Persisted document embeddings.
//!
//! The matrix is stored as one JSON document together with the model id, the
//! vector dimension and a fingerprint of the texts it was computed from. A
//! stored matrix is reused only when all of these match the current catalog
//! and embedder; anything else is a [`CacheMiss`] and the caller recomputes.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

/// Bumped whenever the on-disk layout changes
pub const CACHE_FORMAT_VERSION: u32 = 1;

/// Why a persisted matrix could not be used.
#[derive(Debug, Error)]
pub enum CacheMiss {
    #[error("no cache file at {0}")]
    Missing(PathBuf),

    #[error("cache file is unreadable: {0}")]
    Corrupt(String),

    #[error("cache format version {found} does not match {expected}")]
    Version { found: u32, expected: u32 },

    #[error("cache was built with model '{found}', current model is '{expected}'")]
    Model { found: String, expected: String },

    #[error("catalog contents changed since the cache was written")]
    Fingerprint,

    #[error("cache holds {found} rows but the catalog has {expected} products")]
    RowCount { found: usize, expected: usize },

    #[error("cache row {row} has dimension {found}, expected {expected}")]
    Dimension {
        row: usize,
        found: usize,
        expected: usize,
    },
}

#[derive(Debug, Serialize, Deserialize)]
struct CacheFile {
    version: u32,
    model: String,
    fingerprint: String,
    dimension: usize,
    vectors: Vec<Vec<f32>>,
}

/// What the cache has to agree with before it is trusted.
#[derive(Debug, Clone)]
pub struct CacheKey<'a> {
    pub model_id: &'a str,
    pub fingerprint: &'a str,
    pub rows: usize,
    pub dimension: usize,
}

/// Fingerprint of the searchable texts, in order.
///
/// Every text is length-prefixed so that `["ab", "c"]` and `["a", "bc"]`
/// hash differently.
pub fn fingerprint(texts: &[String]) -> String {
    let mut hasher = blake3::Hasher::new();
    hasher.update(&(texts.len() as u64).to_le_bytes());
    for text in texts {
        hasher.update(&(text.len() as u64).to_le_bytes());
        hasher.update(text.as_bytes());
    }
    hasher.finalize().to_hex().to_string()
}

/// File-backed embedding cache.
#[derive(Debug, Clone)]
pub struct EmbeddingCache {
    path: PathBuf,
}

impl EmbeddingCache {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the persisted matrix if it matches `key`.
    pub fn load(&self, key: &CacheKey<'_>) -> std::result::Result<Vec<Vec<f32>>, CacheMiss> {
        if !self.path.exists() {
            return Err(CacheMiss::Missing(self.path.clone()));
        }

        let content = std::fs::read_to_string(&self.path)
            .map_err(|e| CacheMiss::Corrupt(e.to_string()))?;
        let file: CacheFile =
            serde_json::from_str(&content).map_err(|e| CacheMiss::Corrupt(e.to_string()))?;

        if file.version != CACHE_FORMAT_VERSION {
            return Err(CacheMiss::Version {
                found: file.version,
                expected: CACHE_FORMAT_VERSION,
            });
        }
        if file.model != key.model_id {
            return Err(CacheMiss::Model {
                found: file.model,
                expected: key.model_id.to_string(),
            });
        }
        if file.fingerprint != key.fingerprint {
            return Err(CacheMiss::Fingerprint);
        }
        if file.vectors.len() != key.rows {
            return Err(CacheMiss::RowCount {
                found: file.vectors.len(),
                expected: key.rows,
            });
        }
        if file.dimension != key.dimension {
            return Err(CacheMiss::Dimension {
                row: 0,
                found: file.dimension,
                expected: key.dimension,
            });
        }
        if let Some((row, vector)) = file
            .vectors
            .iter()
            .enumerate()
            .find(|(_, v)| v.len() != key.dimension)
        {
            return Err(CacheMiss::Dimension {
                row,
                found: vector.len(),
                expected: key.dimension,
            });
        }

        debug!(rows = file.vectors.len(), path = %self.path.display(), "Embedding cache validated");
        Ok(file.vectors)
    }

    /// Persist `vectors` under `key`, replacing any previous file atomically.
    pub fn store(&self, key: &CacheKey<'_>, vectors: &[Vec<f32>]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).with_context(|| {
                    format!("Failed to create cache directory {:?}", parent)
                })?;
            }
        }

        let file = CacheFile {
            version: CACHE_FORMAT_VERSION,
            model: key.model_id.to_string(),
            fingerprint: key.fingerprint.to_string(),
            dimension: key.dimension,
            vectors: vectors.to_vec(),
        };
        let content =
            serde_json::to_string(&file).with_context(|| "Failed to serialize embeddings")?;

        let tmp_path = self.path.with_extension("tmp");
        std::fs::write(&tmp_path, content)
            .with_context(|| format!("Failed to write embeddings to {:?}", tmp_path))?;
        std::fs::rename(&tmp_path, &self.path)
            .with_context(|| format!("Failed to move embeddings into {:?}", self.path))?;

        info!(rows = vectors.len(), path = %self.path.display(), "Embedding cache written");
        Ok(())
    }
}
