//! Hybrid product search.
//!
//! This module contains:
//! - `bm25` - BM25 keyword scoring using Tantivy
//! - `vector` - Dot-product scoring against the document embedding matrix
//! - `fusion` - Min-max normalization, weighted fusion and top-K ranking
//! - `engine` - The `SearchEngine` facade tying the above together

pub mod bm25;
pub mod engine;
pub mod fusion;
pub mod vector;

use thiserror::Error;

pub use bm25::Bm25Index;
pub use engine::{EngineOptions, ScoredProduct, SearchEngine};
pub use fusion::{min_max_normalize, rank, FusionWeights, ScoreFusion};
pub use vector::{MatrixSource, VectorIndex};

/// Number of products returned by a search unless configured otherwise.
pub const DEFAULT_RESULTS: usize = 10;

/// Errors raised by the ranking components.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("invalid fusion weights (lexical={lexical}, semantic={semantic}): weights must be finite, non-negative and not both zero")]
    InvalidWeights { lexical: f32, semantic: f32 },

    #[error("embedding has dimension {found}, index expects {expected}")]
    DimensionMismatch { found: usize, expected: usize },

    #[error("embedder returned {found} vectors for {expected} texts")]
    EmbeddingCount { found: usize, expected: usize },
}
