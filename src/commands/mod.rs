//! CLI command implementations.

pub mod index;
pub mod init;
pub mod search;
pub mod serve;

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use crate::catalog::Catalog;
use crate::embeddings::create_embedder;
use crate::search::{EngineOptions, SearchEngine};
use crate::Config;

/// Load the catalog and embedder named by `config` and build the engine.
///
/// Blocks while the model loads and the catalog is embedded.
pub fn build_engine(root: &Path, config: &Config) -> Result<SearchEngine> {
    let catalog = Catalog::load(&config.catalog_path(root))?;
    let embedder = create_embedder(&config.embeddings)?;
    let options = EngineOptions::from_config(config, root)?;

    SearchEngine::build(catalog, embedder, options)
}

/// [`build_engine`] on the blocking thread pool.
pub async fn build_engine_blocking(root: PathBuf, config: Config) -> Result<SearchEngine> {
    tokio::task::spawn_blocking(move || build_engine(&root, &config))
        .await
        .context("Engine build task failed")?
}
