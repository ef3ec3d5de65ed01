use anyhow::{bail, Result};
use std::env;
use tracing::info;

use crate::Config;

pub async fn run(force: bool) -> Result<()> {
    let root = env::current_dir()?;

    if Config::is_initialized(&root) && !force {
        bail!(
            "Already initialized at {:?} (use --force to overwrite)",
            Config::config_path(&root)
        );
    }

    let config = Config::default();
    config.save(&root)?;

    info!("Initialized catalog search in {:?}", Config::config_dir(&root));
    println!(
        "✓ Created {} with default configuration",
        Config::config_path(&root).display()
    );
    println!("\nNext steps:");
    println!(
        "  1. Put your catalog at {} (a JSON array of products)",
        config.catalog.path
    );
    println!("  2. Run 'catalog-search index' to embed the catalog");
    println!("  3. Run 'catalog-search serve' to start the HTTP server");

    Ok(())
}
