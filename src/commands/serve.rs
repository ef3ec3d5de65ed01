//! HTTP server command.

use anyhow::Result;
use std::env;
use std::sync::Arc;
use tracing::info;

use super::build_engine_blocking;
use crate::web::{AppState, WebServer};
use crate::Config;

/// Build the engine and serve it over HTTP.
///
/// # Arguments
/// * `host` - Overrides `server.host` from the config
/// * `port` - Overrides `server.port` from the config
pub async fn run(host: Option<String>, port: Option<u16>) -> Result<()> {
    let root = env::current_dir()?;
    let config = Config::load(&root)?;

    let host = host.unwrap_or_else(|| config.server.host.clone());
    let port = port.unwrap_or(config.server.port);

    let engine = Arc::new(build_engine_blocking(root, config.clone()).await?);
    info!(products = engine.len(), "Engine built, starting server");

    println!("Catalog search running at http://{}:{}", host, port);
    println!("Press Ctrl+C to stop\n");

    WebServer::new(AppState::new(engine, config))
        .start(&host, port)
        .await
}
