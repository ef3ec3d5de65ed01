//! Prometheus metrics for catalog search
//!
//! This module provides observability through Prometheus-compatible metrics
//! for search requests, embedding generation and the embedding cache.

use lazy_static::lazy_static;
use prometheus::{Counter, Encoder, Gauge, Histogram, HistogramOpts, Opts, Registry, TextEncoder};
use std::sync::Once;

lazy_static! {
    /// Global metrics registry
    pub static ref REGISTRY: Registry = Registry::new();

    // ============================================================================
    // Search metrics
    // ============================================================================

    /// Total number of search requests
    pub static ref SEARCH_REQUESTS: Counter = Counter::with_opts(
        Opts::new(
            "catalog_search_requests_total",
            "Total number of search requests"
        )
    ).expect("Failed to create SEARCH_REQUESTS counter");

    /// Search request latency in seconds
    pub static ref SEARCH_LATENCY: Histogram = Histogram::with_opts(
        HistogramOpts::new(
            "catalog_search_latency_seconds",
            "Search request latency in seconds"
        ).buckets(vec![0.001, 0.005, 0.01, 0.05, 0.1, 0.25, 0.5, 1.0])
    ).expect("Failed to create SEARCH_LATENCY histogram");

    /// Number of search results returned per request
    pub static ref SEARCH_RESULTS: Histogram = Histogram::with_opts(
        HistogramOpts::new(
            "catalog_search_results_count",
            "Number of search results returned per request"
        ).buckets(vec![0.0, 1.0, 5.0, 10.0, 20.0, 50.0])
    ).expect("Failed to create SEARCH_RESULTS histogram");

    // ============================================================================
    // Catalog metrics
    // ============================================================================

    /// Number of products in the loaded catalog
    pub static ref CATALOG_PRODUCTS: Gauge = Gauge::with_opts(
        Opts::new(
            "catalog_search_products_total",
            "Number of products in the loaded catalog"
        )
    ).expect("Failed to create CATALOG_PRODUCTS gauge");

    // ============================================================================
    // Embedding metrics
    // ============================================================================

    /// Total embedding generation requests
    pub static ref EMBEDDING_REQUESTS: Counter = Counter::with_opts(
        Opts::new(
            "catalog_search_embedding_requests_total",
            "Total embedding generation requests"
        )
    ).expect("Failed to create EMBEDDING_REQUESTS counter");

    /// Embedding generation latency in seconds
    pub static ref EMBEDDING_LATENCY: Histogram = Histogram::with_opts(
        HistogramOpts::new(
            "catalog_search_embedding_latency_seconds",
            "Embedding generation latency in seconds"
        ).buckets(vec![0.01, 0.05, 0.1, 0.5, 1.0, 2.0, 10.0])
    ).expect("Failed to create EMBEDDING_LATENCY histogram");

    /// Engine builds that reused the persisted embedding matrix
    pub static ref CACHE_HITS: Counter = Counter::with_opts(
        Opts::new(
            "catalog_search_embedding_cache_hits_total",
            "Engine builds that reused persisted embeddings"
        )
    ).expect("Failed to create CACHE_HITS counter");

    /// Engine builds that had to recompute the embedding matrix
    pub static ref CACHE_MISSES: Counter = Counter::with_opts(
        Opts::new(
            "catalog_search_embedding_cache_misses_total",
            "Engine builds that recomputed embeddings"
        )
    ).expect("Failed to create CACHE_MISSES counter");
}

static REGISTER: Once = Once::new();

/// Register all metrics with the global registry
///
/// Safe to call more than once; only the first call registers.
/// Panics if metrics registration fails.
pub fn register_metrics() {
    REGISTER.call_once(|| {
        REGISTRY
            .register(Box::new(SEARCH_REQUESTS.clone()))
            .expect("Failed to register SEARCH_REQUESTS");
        REGISTRY
            .register(Box::new(SEARCH_LATENCY.clone()))
            .expect("Failed to register SEARCH_LATENCY");
        REGISTRY
            .register(Box::new(SEARCH_RESULTS.clone()))
            .expect("Failed to register SEARCH_RESULTS");
        REGISTRY
            .register(Box::new(CATALOG_PRODUCTS.clone()))
            .expect("Failed to register CATALOG_PRODUCTS");
        REGISTRY
            .register(Box::new(EMBEDDING_REQUESTS.clone()))
            .expect("Failed to register EMBEDDING_REQUESTS");
        REGISTRY
            .register(Box::new(EMBEDDING_LATENCY.clone()))
            .expect("Failed to register EMBEDDING_LATENCY");
        REGISTRY
            .register(Box::new(CACHE_HITS.clone()))
            .expect("Failed to register CACHE_HITS");
        REGISTRY
            .register(Box::new(CACHE_MISSES.clone()))
            .expect("Failed to register CACHE_MISSES");
    });
}

/// Gather all metrics and encode them in Prometheus text format
///
/// Returns an empty string if encoding fails.
pub fn gather_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();

    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        tracing::error!("Failed to encode metrics: {}", e);
        return String::new();
    }

    String::from_utf8(buffer).unwrap_or_else(|e| {
        tracing::error!("Metrics contained invalid UTF-8: {}", e);
        String::new()
    })
}
