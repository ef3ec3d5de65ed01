use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

use catalog_search::cli::{Cli, Commands};
use catalog_search::config::Config;
use catalog_search::logging::init_logging;
use catalog_search::metrics;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let project_root = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));

    // An invalid config is reported by the command itself
    let config = Config::load(&project_root).unwrap_or_default();

    // The guard MUST be held until program exit to ensure logs are flushed
    let _logging_guard = init_logging(&config.logging, &project_root)?;

    tracing::debug!("Project root: {}", project_root.display());

    metrics::register_metrics();

    match cli.command {
        Commands::Init { force } => {
            catalog_search::commands::init::run(force).await?;
        }
        Commands::Index { force } => {
            catalog_search::commands::index::run(force).await?;
        }
        Commands::Search { query, limit } => {
            catalog_search::commands::search::run(&query, limit).await?;
        }
        Commands::Serve { port, host } => {
            catalog_search::commands::serve::run(host, port).await?;
        }
    }

    Ok(())
}
