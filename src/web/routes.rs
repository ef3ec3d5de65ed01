//! Route definitions for the web server.

use axum::{routing::get, Router};

use super::handlers;
use super::state::AppState;

/// Create the router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Main page
        .route("/", get(handlers::index_page))
        // Search endpoints
        .route("/search", get(handlers::search))
        .route("/api/search", get(handlers::api_search))
        // Health and metrics
        .route("/health", get(handlers::health))
        .route("/metrics", get(handlers::metrics_handler))
        .with_state(state)
}
