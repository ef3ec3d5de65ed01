use anyhow::{bail, Result};
use std::sync::atomic::{AtomicBool, Ordering};

use catalog_search::embeddings::{Embedder, MockEmbedder};

/// Wraps a [`MockEmbedder`] and can be switched to fail every call.
pub struct FlakyEmbedder {
    inner: MockEmbedder,
    failing: AtomicBool,
}

impl FlakyEmbedder {
    pub fn new(dimension: usize) -> Self {
        Self {
            inner: MockEmbedder::new(dimension),
            failing: AtomicBool::new(false),
        }
    }

    pub fn failing(dimension: usize) -> Self {
        let embedder = Self::new(dimension);
        embedder.set_failing(true);
        embedder
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }
}

impl Embedder for FlakyEmbedder {
    fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        if self.failing.load(Ordering::SeqCst) {
            bail!("embedding backend unavailable");
        }
        self.inner.embed(texts)
    }

    fn embedding_dimension(&self) -> usize {
        self.inner.embedding_dimension()
    }

    fn model_id(&self) -> &str {
        self.inner.model_id()
    }

    fn max_batch_size(&self) -> usize {
        4
    }
}
