//! The search engine facade.
//!
//! A [`SearchEngine`] owns the catalog together with its lexical index and
//! embedding matrix. It is built once and is immutable afterwards, so any
//! number of threads can search it through an `Arc` without locking.

use anyhow::{Context, Result};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

use super::bm25::Bm25Index;
use super::fusion::{min_max_normalize, rank, FusionWeights, ScoreFusion};
use super::vector::{MatrixSource, VectorIndex};
use super::DEFAULT_RESULTS;
use crate::catalog::{Catalog, Product};
use crate::config::Config;
use crate::embeddings::{EmbeddingCache, Embedder};
use crate::metrics::{CATALOG_PRODUCTS, SEARCH_LATENCY, SEARCH_REQUESTS, SEARCH_RESULTS};
use crate::text::{normalize, tokenize};

/// Settings fixed at engine construction.
#[derive(Debug, Clone)]
pub struct EngineOptions {
    pub weights: FusionWeights,
    /// Results returned by [`SearchEngine::search`]
    pub default_limit: usize,
    /// Embedding cache file, `None` to always recompute
    pub cache_path: Option<PathBuf>,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            weights: FusionWeights::default(),
            default_limit: DEFAULT_RESULTS,
            cache_path: None,
        }
    }
}

impl EngineOptions {
    /// Options from a loaded configuration, resolving paths against `root`.
    pub fn from_config(config: &Config, root: &Path) -> Result<Self> {
        Ok(Self {
            weights: config.search.weights()?,
            default_limit: config.search.default_limit.max(1),
            cache_path: config.cache_path(root),
        })
    }
}

/// A ranked product with the scores that placed it.
#[derive(Debug, Clone, Serialize)]
pub struct ScoredProduct {
    pub product: Product,
    /// Index of the product in the catalog
    pub position: usize,
    /// Fused score
    pub score: f32,
    /// Min-max normalized BM25 score
    pub lexical: f32,
    /// Min-max normalized embedding similarity
    pub semantic: f32,
}

/// Hybrid BM25 + embedding search over an in-memory catalog.
pub struct SearchEngine {
    catalog: Catalog,
    bm25: Bm25Index,
    vectors: VectorIndex,
    embedder: Arc<dyn Embedder>,
    fusion: ScoreFusion,
    default_limit: usize,
    matrix_source: MatrixSource,
}

impl SearchEngine {
    /// Index `catalog` for lexical and semantic search.
    ///
    /// Embeddings come from the cache at `options.cache_path` when it matches
    /// the catalog and model, and are computed otherwise. An embedder failure
    /// fails the build.
    pub fn build(
        catalog: Catalog,
        embedder: Arc<dyn Embedder>,
        options: EngineOptions,
    ) -> Result<Self> {
        let start = Instant::now();
        let texts = catalog.searchable_texts();

        let bm25 = Bm25Index::build(&texts).with_context(|| "Failed to build BM25 index")?;

        let cache = options.cache_path.map(EmbeddingCache::new);
        let (vectors, matrix_source) = VectorIndex::build(&texts, embedder.as_ref(), cache.as_ref())
            .with_context(|| "Failed to build embedding matrix")?;

        CATALOG_PRODUCTS.set(catalog.len() as f64);
        info!(
            products = catalog.len(),
            dimension = vectors.dimension(),
            source = ?matrix_source,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Search engine ready"
        );

        Ok(Self {
            catalog,
            bm25,
            vectors,
            embedder,
            fusion: ScoreFusion::with_weights(options.weights),
            default_limit: options.default_limit.max(1),
            matrix_source,
        })
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn len(&self) -> usize {
        self.catalog.len()
    }

    pub fn is_empty(&self) -> bool {
        self.catalog.is_empty()
    }

    pub fn default_limit(&self) -> usize {
        self.default_limit
    }

    /// Whether the embedding matrix was loaded from cache or computed
    pub fn matrix_source(&self) -> MatrixSource {
        self.matrix_source
    }

    pub fn model_id(&self) -> &str {
        self.embedder.model_id()
    }

    /// Top products for `query`, at most the default limit.
    pub fn search(&self, query: &str) -> Result<Vec<Product>> {
        self.search_with_limit(query, self.default_limit)
    }

    /// Top `limit` products for `query`, clamped to the catalog size.
    pub fn search_with_limit(&self, query: &str, limit: usize) -> Result<Vec<Product>> {
        Ok(self
            .search_scored(query, limit)?
            .into_iter()
            .map(|hit| hit.product)
            .collect())
    }

    /// Rank the catalog against `query` and return the top `limit` hits with
    /// their scores.
    ///
    /// Any query string is accepted. The only error is a failure of the
    /// embedding backend.
    pub fn search_scored(&self, query: &str, limit: usize) -> Result<Vec<ScoredProduct>> {
        SEARCH_REQUESTS.inc();
        let start = Instant::now();

        if self.catalog.is_empty() {
            SEARCH_RESULTS.observe(0.0);
            return Ok(Vec::new());
        }

        let normalized = normalize(query);
        let tokens = tokenize(&normalized);

        let lexical = self.bm25.score(&tokens)?;
        let query_vector = self
            .embedder
            .embed_query(&normalized)
            .with_context(|| "Failed to embed query")?;
        let semantic = self.vectors.score(&query_vector)?;

        let fused = self.fusion.fuse(&lexical, &semantic);
        let lexical = min_max_normalize(&lexical);
        let semantic = min_max_normalize(&semantic);

        let results: Vec<ScoredProduct> = rank(&fused, limit)
            .into_iter()
            .filter_map(|position| {
                self.catalog.get(position).map(|product| ScoredProduct {
                    product: product.clone(),
                    position,
                    score: fused[position],
                    lexical: lexical[position],
                    semantic: semantic[position],
                })
            })
            .collect();

        let elapsed = start.elapsed();
        SEARCH_LATENCY.observe(elapsed.as_secs_f64());
        SEARCH_RESULTS.observe(results.len() as f64);
        debug!(
            query = %normalized,
            tokens = tokens.len(),
            results = results.len(),
            elapsed_ms = elapsed.as_millis() as u64,
            "Search completed"
        );

        Ok(results)
    }
}
