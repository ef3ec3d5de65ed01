use anyhow::Result;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;

use catalog_search::embeddings::{Embedder, MockEmbedder};
use catalog_search::{Catalog, EngineOptions, SearchEngine};

use super::test_utils::fixture_catalog;

/// Dimension used by the mock embedder in integration tests
pub const TEST_DIMENSION: usize = 64;

/// A temporary project directory with an embedding cache location.
pub struct TestHarness {
    pub temp_dir: TempDir,
    pub catalog: Catalog,
}

impl TestHarness {
    pub fn new() -> Result<Self> {
        Ok(Self {
            temp_dir: TempDir::new()?,
            catalog: fixture_catalog(),
        })
    }

    pub fn with_catalog(catalog: Catalog) -> Result<Self> {
        Ok(Self {
            temp_dir: TempDir::new()?,
            catalog,
        })
    }

    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn cache_path(&self) -> PathBuf {
        self.temp_dir.path().join("embeddings.json")
    }

    /// Build an engine over the harness catalog, caching to `cache_path()`
    pub fn build_with(&self, embedder: Arc<dyn Embedder>) -> Result<SearchEngine> {
        let options = EngineOptions {
            cache_path: Some(self.cache_path()),
            ..EngineOptions::default()
        };
        SearchEngine::build(self.catalog.clone(), embedder, options)
    }

    /// Build with a fresh mock embedder
    pub fn build(&self) -> Result<SearchEngine> {
        self.build_with(Arc::new(MockEmbedder::new(TEST_DIMENSION)))
    }
}
