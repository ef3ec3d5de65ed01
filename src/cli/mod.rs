use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "catalog-search")]
#[command(author, version, about = "Hybrid keyword and semantic product catalog search")]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write a default configuration in the current directory
    Init {
        /// Overwrite an existing configuration
        #[arg(short, long)]
        force: bool,
    },

    /// Embed the catalog and refresh the embedding cache
    Index {
        /// Discard the existing cache and recompute every embedding
        #[arg(short, long)]
        force: bool,
    },

    /// Search the catalog
    Search {
        /// Search query
        query: String,

        /// Maximum number of results to return
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Start the HTTP server
    Serve {
        /// Port to listen on (default from config)
        #[arg(short, long)]
        port: Option<u16>,

        /// Host to bind to (default from config)
        #[arg(long)]
        host: Option<String>,
    },
}
