//! Application state for the web server.

use std::sync::Arc;

use crate::config::Config;
use crate::search::SearchEngine;

/// Shared application state for the web server.
///
/// Cloned per request; the engine and configuration are shared through `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// The built search engine
    pub engine: Arc<SearchEngine>,
    /// Configuration
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(engine: Arc<SearchEngine>, config: Config) -> Self {
        Self {
            engine,
            config: Arc::new(config),
        }
    }
}
