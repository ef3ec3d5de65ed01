pub mod catalog;
pub mod cli;
pub mod commands;
pub mod config;
pub mod embeddings;
pub mod logging;
pub mod metrics;
pub mod search;
pub mod text;
pub mod web;

pub use catalog::{Catalog, Product, ProductId};
pub use config::Config;
pub use search::{EngineOptions, ScoredProduct, SearchEngine};
