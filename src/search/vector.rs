//! Semantic scoring against the document embedding matrix.
//!
//! Document vectors are L2-normalized by the embedder, so the dot product with
//! a query vector is their cosine similarity.

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info, warn};

use super::SearchError;
use crate::embeddings::{fingerprint, CacheKey, EmbeddingCache, Embedder};
use crate::metrics::{CACHE_HITS, CACHE_MISSES};

/// Where the document matrix of a freshly built index came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatrixSource {
    /// Loaded from a matching embedding cache
    Cache,
    /// Computed with the embedder
    Computed,
}

/// One embedding row per catalog entry, all of equal dimension.
pub struct VectorIndex {
    matrix: Vec<Vec<f32>>,
    dimension: usize,
}

impl VectorIndex {
    /// Wrap an existing matrix, checking every row against `dimension`.
    pub fn from_matrix(matrix: Vec<Vec<f32>>, dimension: usize) -> Result<Self, SearchError> {
        if let Some(row) = matrix.iter().find(|row| row.len() != dimension) {
            return Err(SearchError::DimensionMismatch {
                found: row.len(),
                expected: dimension,
            });
        }
        Ok(Self { matrix, dimension })
    }

    /// Embed `texts`, reusing `cache` when it matches the texts and model.
    ///
    /// A cache that cannot be used is logged and rewritten after the matrix is
    /// recomputed. Failing to write the cache does not fail the build.
    pub fn build(
        texts: &[String],
        embedder: &dyn Embedder,
        cache: Option<&EmbeddingCache>,
    ) -> Result<(Self, MatrixSource)> {
        let dimension = embedder.embedding_dimension();

        let Some(cache) = cache else {
            let matrix = embed_corpus(texts, embedder)?;
            return Ok((Self::from_matrix(matrix, dimension)?, MatrixSource::Computed));
        };

        let fingerprint = fingerprint(texts);
        let key = CacheKey {
            model_id: embedder.model_id(),
            fingerprint: &fingerprint,
            rows: texts.len(),
            dimension,
        };

        match cache.load(&key) {
            Ok(matrix) => {
                CACHE_HITS.inc();
                info!(
                    "Loaded {} embeddings from cache {:?}",
                    matrix.len(),
                    cache.path()
                );
                Ok((Self::from_matrix(matrix, dimension)?, MatrixSource::Cache))
            }
            Err(miss) => {
                CACHE_MISSES.inc();
                info!("Embedding cache not used: {}", miss);

                let matrix = embed_corpus(texts, embedder)?;
                if let Err(e) = cache.store(&key, &matrix) {
                    warn!("Failed to write embedding cache {:?}: {:#}", cache.path(), e);
                }
                Ok((Self::from_matrix(matrix, dimension)?, MatrixSource::Computed))
            }
        }
    }

    pub fn len(&self) -> usize {
        self.matrix.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matrix.is_empty()
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Dot product of `query` with every row, in catalog order.
    pub fn score(&self, query: &[f32]) -> Result<Vec<f32>, SearchError> {
        if query.len() != self.dimension {
            return Err(SearchError::DimensionMismatch {
                found: query.len(),
                expected: self.dimension,
            });
        }

        Ok(self
            .matrix
            .iter()
            .map(|row| row.iter().zip(query).map(|(a, b)| a * b).sum())
            .collect())
    }
}

/// Embed every text in batches, checking count and dimension of the output.
fn embed_corpus(texts: &[String], embedder: &dyn Embedder) -> Result<Vec<Vec<f32>>> {
    let dimension = embedder.embedding_dimension();
    let batch_size = embedder.max_batch_size().max(1);

    info!(
        "Embedding {} products with {}",
        texts.len(),
        embedder.model_id()
    );

    let progress = ProgressBar::new(texts.len() as u64);
    if let Ok(style) = ProgressStyle::with_template(
        "{spinner:.green} [{elapsed_precise}] Embedding: [{bar:40.cyan/blue}] {pos}/{len}",
    ) {
        progress.set_style(style.progress_chars("#>-"));
    }

    let mut matrix = Vec::with_capacity(texts.len());
    for batch in texts.chunks(batch_size) {
        let vectors = embedder
            .embed(batch)
            .with_context(|| format!("Failed to embed a batch of {} products", batch.len()))?;

        if vectors.len() != batch.len() {
            progress.abandon();
            return Err(SearchError::EmbeddingCount {
                found: vectors.len(),
                expected: batch.len(),
            }
            .into());
        }
        if let Some(vector) = vectors.iter().find(|v| v.len() != dimension) {
            progress.abandon();
            return Err(SearchError::DimensionMismatch {
                found: vector.len(),
                expected: dimension,
            }
            .into());
        }

        matrix.extend(vectors);
        progress.inc(batch.len() as u64);
    }

    progress.finish_and_clear();
    debug!("Computed {} embeddings of dimension {}", matrix.len(), dimension);

    Ok(matrix)
}
