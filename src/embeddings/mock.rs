use anyhow::Result;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicUsize, Ordering};

use super::provider::{l2_normalize, Embedder};

/// Deterministic embedder for tests and offline development.
///
/// Each whitespace token is hashed onto a few signed buckets, so texts that
/// share words get similar vectors. No model download is needed.
pub struct MockEmbedder {
    dimension: usize,
    model_id: String,
    embedded_texts: AtomicUsize,
}

/// Buckets touched per token
const BUCKETS_PER_TOKEN: usize = 4;

impl MockEmbedder {
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension: dimension.max(1),
            model_id: format!("mock:d{}", dimension.max(1)),
            embedded_texts: AtomicUsize::new(0),
        }
    }

    /// Total number of texts embedded so far, queries included
    pub fn embedded_texts(&self) -> usize {
        self.embedded_texts.load(Ordering::SeqCst)
    }

    fn text_to_vector(&self, text: &str) -> Vec<f32> {
        let mut vector = vec![0.0f32; self.dimension];

        for token in text.split_whitespace() {
            let mut hasher = DefaultHasher::new();
            token.hash(&mut hasher);
            let mut seed = hasher.finish();

            for _ in 0..BUCKETS_PER_TOKEN {
                seed = seed
                    .wrapping_mul(6364136223846793005)
                    .wrapping_add(1442695040888963407);
                let bucket = ((seed >> 33) as usize) % self.dimension;
                let sign = if (seed >> 40) & 1 == 0 { 1.0 } else { -1.0 };
                vector[bucket] += sign;
            }
        }

        l2_normalize(&mut vector);
        vector
    }
}

impl Embedder for MockEmbedder {
    fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        self.embedded_texts.fetch_add(texts.len(), Ordering::SeqCst);
        Ok(texts.iter().map(|t| self.text_to_vector(t)).collect())
    }

    fn embedding_dimension(&self) -> usize {
        self.dimension
    }

    fn model_id(&self) -> &str {
        &self.model_id
    }

    fn max_batch_size(&self) -> usize {
        1000
    }
}
