//! HTTP request handlers.

use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
    Json,
};
use rust_embed::Embed;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{error, info};

use super::state::AppState;
use crate::catalog::Product;
use crate::metrics;
use crate::search::ScoredProduct;

/// Embedded static files for the search page.
#[derive(Embed)]
#[folder = "src/web/static/"]
struct StaticAssets;

/// Query string accepted by both search endpoints.
#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    /// The search query; missing is the same as empty
    #[serde(default)]
    pub q: String,
    /// Maximum number of results, defaults to the configured limit
    pub limit: Option<usize>,
}

/// Response of `GET /search`.
#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub query: String,
    pub results: Vec<Product>,
}

/// Response of `GET /api/search`.
#[derive(Debug, Serialize)]
pub struct ScoredSearchResponse {
    pub query: String,
    pub results: Vec<ScoredProduct>,
    /// Time taken in milliseconds
    pub took_ms: u64,
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    /// Products in the loaded catalog
    pub products: usize,
    /// Embedding model identifier
    pub model: String,
}

/// Serve the main index page.
pub async fn index_page() -> impl IntoResponse {
    match StaticAssets::get("index.html") {
        Some(content) => Html(content.data.to_vec()).into_response(),
        None => (StatusCode::NOT_FOUND, "Index page not found").into_response(),
    }
}

/// Run a search on the blocking pool.
async fn run_search(
    state: &AppState,
    query: String,
    limit: usize,
) -> Result<Vec<ScoredProduct>, Response> {
    let engine = state.engine.clone();

    let outcome = tokio::task::spawn_blocking(move || engine.search_scored(&query, limit)).await;

    match outcome {
        Ok(Ok(results)) => Ok(results),
        Ok(Err(e)) => {
            error!(error = %e, "Search failed");
            Err(internal_error(format!("Search failed: {:#}", e)))
        }
        Err(e) => {
            error!(error = %e, "Search task panicked");
            Err(internal_error("Search task failed".to_string()))
        }
    }
}

fn internal_error(message: String) -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(serde_json::json!({ "error": message })),
    )
        .into_response()
}

/// Top products for a query.
///
/// GET /search?q=...
pub async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Response {
    let limit = params.limit.unwrap_or(state.engine.default_limit());

    match run_search(&state, params.q.clone(), limit).await {
        Ok(results) => Json(SearchResponse {
            query: params.q,
            results: results.into_iter().map(|hit| hit.product).collect(),
        })
        .into_response(),
        Err(response) => response,
    }
}

/// Top products with fused and per-signal scores.
///
/// GET /api/search?q=...&limit=N
pub async fn api_search(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Response {
    let start = Instant::now();
    let limit = params.limit.unwrap_or(state.engine.default_limit());

    info!(query = %params.q, limit = limit, "Processing search request");

    match run_search(&state, params.q.clone(), limit).await {
        Ok(results) => {
            let took_ms = start.elapsed().as_millis() as u64;
            info!(results = results.len(), took_ms = took_ms, "Search completed");

            Json(ScoredSearchResponse {
                query: params.q,
                results,
                took_ms,
            })
            .into_response()
        }
        Err(response) => response,
    }
}

/// Health check endpoint.
///
/// GET /health
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        products: state.engine.len(),
        model: state.engine.model_id().to_string(),
    })
}

/// Prometheus metrics endpoint.
///
/// GET /metrics
pub async fn metrics_handler() -> impl IntoResponse {
    let output = metrics::gather_metrics();
    ([(header::CONTENT_TYPE, "text/plain; charset=utf-8")], output)
}
