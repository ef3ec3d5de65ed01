use anyhow::{Context, Result};
use std::env;
use std::time::Instant;
use tracing::info;

use super::build_engine_blocking;
use crate::search::MatrixSource;
use crate::Config;

/// Build the engine once so the embedding cache is written.
pub async fn run(force: bool) -> Result<()> {
    let root = env::current_dir()?;
    let config = Config::load(&root)?;

    let cache_path = config.cache_path(&root);
    if force {
        if let Some(path) = cache_path.as_ref().filter(|p| p.exists()) {
            std::fs::remove_file(path)
                .with_context(|| format!("Failed to remove embedding cache {:?}", path))?;
            info!("Removed embedding cache {:?}", path);
        }
    }

    let start = Instant::now();
    let engine = build_engine_blocking(root, config).await?;
    let elapsed = start.elapsed();

    let source = match engine.matrix_source() {
        MatrixSource::Cache => "loaded from cache",
        MatrixSource::Computed => "computed",
    };

    println!("Indexed {} products in {:.2}s", engine.len(), elapsed.as_secs_f64());
    println!("  Model:      {}", engine.model_id());
    println!("  Embeddings: {}", source);
    match cache_path {
        Some(path) => println!("  Cache:      {}", path.display()),
        None => println!("  Cache:      disabled"),
    }

    Ok(())
}
