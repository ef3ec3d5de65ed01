//! Embedding backends and the persisted document-embedding cache.

pub mod cache;
mod fastembed_provider;
mod mock;
mod provider;

pub use cache::{fingerprint, CacheKey, CacheMiss, EmbeddingCache};
pub use fastembed_provider::FastEmbedProvider;
pub use mock::MockEmbedder;
pub use provider::{l2_normalize, Embedder};

use anyhow::Result;
use std::sync::Arc;
use tracing::warn;

use crate::config::{EmbeddingProvider, EmbeddingsConfig};

/// Dimension used by the mock backend, matching all-MiniLM-L6-v2
const MOCK_DIMENSION: usize = 384;

/// Create the configured embedder.
pub fn create_embedder(config: &EmbeddingsConfig) -> Result<Arc<dyn Embedder>> {
    match config.provider {
        EmbeddingProvider::FastEmbed => Ok(Arc::new(FastEmbedProvider::new(config)?)),
        EmbeddingProvider::Mock => {
            warn!("Using the mock embedder: semantic scores are hash-based, not model-based");
            Ok(Arc::new(MockEmbedder::new(MOCK_DIMENSION)))
        }
    }
}
