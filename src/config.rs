use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::search::fusion::{FusionWeights, DEFAULT_LEXICAL_WEIGHT, DEFAULT_SEMANTIC_WEIGHT};
use crate::search::DEFAULT_RESULTS;

const CONFIG_DIR: &str = ".catalog-search";
const CONFIG_FILE: &str = "config.toml";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub catalog: CatalogConfig,

    #[serde(default)]
    pub embeddings: EmbeddingsConfig,

    #[serde(default)]
    pub cache: CacheConfig,

    #[serde(default)]
    pub search: SearchConfig,

    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Path to the product catalog JSON (relative to the project root)
    #[serde(default = "default_catalog_path")]
    pub path: String,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            path: default_catalog_path(),
        }
    }
}

fn default_catalog_path() -> String {
    "data/products.json".to_string()
}

/// Embedding backend selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmbeddingProvider {
    /// Local ONNX model through fastembed
    #[default]
    FastEmbed,
    /// Deterministic hash-based vectors, for offline development
    Mock,
}

impl std::fmt::Display for EmbeddingProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::FastEmbed => write!(f, "fastembed"),
            Self::Mock => write!(f, "mock"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingsConfig {
    /// Embedding backend
    #[serde(default)]
    pub provider: EmbeddingProvider,

    /// Embedding model name
    #[serde(default = "default_model")]
    pub model: String,

    /// Batch size for embedding generation
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
}

impl Default for EmbeddingsConfig {
    fn default() -> Self {
        Self {
            provider: EmbeddingProvider::default(),
            model: default_model(),
            batch_size: default_batch_size(),
        }
    }
}

fn default_model() -> String {
    "all-MiniLM-L6-v2".to_string()
}

fn default_batch_size() -> usize {
    32
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Persist document embeddings between runs
    #[serde(default = "default_cache_enabled")]
    pub enabled: bool,

    /// Cache file (relative to .catalog-search/)
    #[serde(default = "default_cache_path")]
    pub path: String,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: default_cache_enabled(),
            path: default_cache_path(),
        }
    }
}

fn default_cache_enabled() -> bool {
    true
}

fn default_cache_path() -> String {
    "embeddings.json".to_string()
}

/// Ranking configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Weight of the min-max normalized BM25 score
    #[serde(default = "default_lexical_weight")]
    pub lexical_weight: f32,

    /// Weight of the min-max normalized embedding similarity
    #[serde(default = "default_semantic_weight")]
    pub semantic_weight: f32,

    /// Number of results returned by a search
    #[serde(default = "default_search_limit")]
    pub default_limit: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            lexical_weight: default_lexical_weight(),
            semantic_weight: default_semantic_weight(),
            default_limit: default_search_limit(),
        }
    }
}

fn default_lexical_weight() -> f32 {
    DEFAULT_LEXICAL_WEIGHT
}

fn default_semantic_weight() -> f32 {
    DEFAULT_SEMANTIC_WEIGHT
}

fn default_search_limit() -> usize {
    DEFAULT_RESULTS
}

impl SearchConfig {
    /// Validated fusion weights
    pub fn weights(&self) -> Result<FusionWeights> {
        Ok(FusionWeights::new(self.lexical_weight, self.semantic_weight)?)
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to
    #[serde(default = "default_http_host")]
    pub host: String,

    /// Port to bind to
    #[serde(default = "default_http_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_http_host(),
            port: default_http_port(),
        }
    }
}

fn default_http_host() -> String {
    "127.0.0.1".to_string()
}

fn default_http_port() -> u16 {
    8000
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Write logs to rolling files
    #[serde(default)]
    pub enabled: bool,

    /// Write logs to stderr (filtered by RUST_LOG)
    #[serde(default = "default_log_stderr")]
    pub stderr: bool,

    /// File log level: trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log directory (relative to the project root unless absolute)
    #[serde(default = "default_log_directory")]
    pub directory: PathBuf,

    /// Log file name prefix
    #[serde(default = "default_log_file_prefix")]
    pub file_prefix: String,

    /// Rotation: minutely, hourly, daily, never
    #[serde(default = "default_log_rotation")]
    pub rotation: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            stderr: default_log_stderr(),
            level: default_log_level(),
            directory: default_log_directory(),
            file_prefix: default_log_file_prefix(),
            rotation: default_log_rotation(),
        }
    }
}

fn default_log_stderr() -> bool {
    true
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_directory() -> PathBuf {
    PathBuf::from(CONFIG_DIR).join("logs")
}

fn default_log_file_prefix() -> String {
    "catalog-search.log".to_string()
}

fn default_log_rotation() -> String {
    "daily".to_string()
}

impl Config {
    /// Load configuration from the .catalog-search directory
    pub fn load(root: &Path) -> Result<Self> {
        let config_path = root.join(CONFIG_DIR).join(CONFIG_FILE);

        let config: Config = if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)
                .with_context(|| format!("Failed to read config from {:?}", config_path))?;

            toml::from_str(&content)
                .with_context(|| format!("Failed to parse config from {:?}", config_path))?
        } else {
            Config::default()
        };

        config.validate()?;
        Ok(config)
    }

    /// Save configuration to the .catalog-search directory
    pub fn save(&self, root: &Path) -> Result<()> {
        let config_dir = Self::config_dir(root);
        let config_path = config_dir.join(CONFIG_FILE);

        std::fs::create_dir_all(&config_dir)
            .with_context(|| format!("Failed to create config directory {:?}", config_dir))?;

        let content =
            toml::to_string_pretty(self).with_context(|| "Failed to serialize config")?;

        std::fs::write(&config_path, content)
            .with_context(|| format!("Failed to write config to {:?}", config_path))?;

        Ok(())
    }

    /// Reject settings the engine cannot run with
    pub fn validate(&self) -> Result<()> {
        self.search.weights()?;
        if self.search.default_limit == 0 {
            bail!("search.default_limit must be at least 1");
        }
        if self.embeddings.batch_size == 0 {
            bail!("embeddings.batch_size must be at least 1");
        }
        Ok(())
    }

    /// Check if a configuration has been written under `root`
    pub fn is_initialized(root: &Path) -> bool {
        Self::config_path(root).exists()
    }

    /// Get the path to the .catalog-search directory
    pub fn config_dir(root: &Path) -> PathBuf {
        root.join(CONFIG_DIR)
    }

    /// Get the path to the config file
    pub fn config_path(root: &Path) -> PathBuf {
        Self::config_dir(root).join(CONFIG_FILE)
    }

    /// Get the path to the product catalog
    pub fn catalog_path(&self, root: &Path) -> PathBuf {
        root.join(&self.catalog.path)
    }

    /// Get the path to the embedding cache, or `None` when caching is disabled
    pub fn cache_path(&self, root: &Path) -> Option<PathBuf> {
        self.cache
            .enabled
            .then(|| Self::config_dir(root).join(&self.cache.path))
    }
}
