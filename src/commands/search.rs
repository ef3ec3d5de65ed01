use anyhow::Result;
use std::env;

use super::build_engine_blocking;
use crate::Config;

/// Run a single query and print the ranked products.
pub async fn run(query: &str, limit: Option<usize>) -> Result<()> {
    let root = env::current_dir()?;
    let config = Config::load(&root)?;

    let engine = build_engine_blocking(root, config).await?;
    let limit = limit.unwrap_or(engine.default_limit());

    let results = engine.search_scored(query, limit)?;

    if results.is_empty() {
        println!("No products in the catalog");
        return Ok(());
    }

    println!("Top {} results for: \"{}\"\n", results.len(), query);

    for (i, hit) in results.iter().enumerate() {
        println!(
            "{}. {} [{}] ${:.2} (score: {:.3}, lexical: {:.3}, semantic: {:.3})",
            i + 1,
            hit.product.name,
            hit.product.id,
            hit.product.price,
            hit.score,
            hit.lexical,
            hit.semantic
        );
        println!("   {}", hit.product.description);
    }

    Ok(())
}
