//! HTTP interface for the search engine.
//!
//! This module provides:
//! - A small HTML search page
//! - `GET /search` returning plain product records
//! - `GET /api/search` returning scored results with timing
//! - Health and Prometheus metrics endpoints
//!
//! # Example
//!
//! ```rust,ignore
//! use catalog_search::web::{AppState, WebServer};
//!
//! let server = WebServer::new(AppState::new(engine, config));
//! server.start("127.0.0.1", 8000).await?;
//! ```

pub mod handlers;
pub mod routes;
pub mod state;

pub use state::AppState;

use anyhow::{Context, Result};
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

/// HTTP server wrapping a built search engine.
pub struct WebServer {
    state: AppState,
}

impl WebServer {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }

    /// Bind to `host:port` and serve until the process is stopped.
    pub async fn start(self, host: &str, port: u16) -> Result<()> {
        let addr = format!("{}:{}", host, port);

        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);

        let app = routes::create_router(self.state).layer(cors);

        let listener = tokio::net::TcpListener::bind(&addr)
            .await
            .with_context(|| format!("Failed to bind to {}", addr))?;

        info!("Serving catalog search at http://{}", addr);

        axum::serve(listener, app)
            .await
            .with_context(|| "Web server failed")?;

        Ok(())
    }
}
