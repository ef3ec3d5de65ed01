use anyhow::{bail, Context, Result};
use fastembed::{EmbeddingModel, InitOptions, TextEmbedding};
use std::time::Instant;
use tracing::info;

use super::provider::{l2_normalize, Embedder};
use crate::config::EmbeddingsConfig;
use crate::metrics::{EMBEDDING_LATENCY, EMBEDDING_REQUESTS};

/// Local ONNX embedder backed by fastembed.
pub struct FastEmbedProvider {
    model: TextEmbedding,
    model_id: String,
    dimension: usize,
    batch_size: usize,
}

impl FastEmbedProvider {
    /// Load the configured model.
    ///
    /// This will download the model on first run if not cached. Failure to
    /// load is returned to the caller: the engine never runs without its
    /// semantic scorer.
    pub fn new(config: &EmbeddingsConfig) -> Result<Self> {
        let (model_type, canonical) = Self::parse_model_name(&config.model)?;

        info!("Loading embedding model: {}", canonical);

        let model = TextEmbedding::try_new(
            InitOptions::new(model_type).with_show_download_progress(true),
        )
        .with_context(|| format!("Failed to initialize embedding model: {}", config.model))?;

        info!("Embedding model loaded successfully");

        Ok(Self {
            model,
            model_id: format!("fastembed:{}", canonical),
            dimension: Self::get_model_dimension(canonical),
            batch_size: config.batch_size.max(1),
        })
    }

    /// Parse model name string to the fastembed enum and its canonical name
    fn parse_model_name(name: &str) -> Result<(EmbeddingModel, &'static str)> {
        match name {
            "all-MiniLM-L6-v2" | "all-minilm-l6-v2" | "sentence-transformers/all-MiniLM-L6-v2" => {
                Ok((EmbeddingModel::AllMiniLML6V2, "all-MiniLM-L6-v2"))
            }
            "bge-small-en-v1.5" | "bge-small" | "BAAI/bge-small-en-v1.5" => {
                Ok((EmbeddingModel::BGESmallENV15, "bge-small-en-v1.5"))
            }
            "bge-base-en-v1.5" | "bge-base" | "BAAI/bge-base-en-v1.5" => {
                Ok((EmbeddingModel::BGEBaseENV15, "bge-base-en-v1.5"))
            }
            "nomic-embed-text-v1.5" | "nomic-embed-text" | "nomic-ai/nomic-embed-text-v1.5" => {
                Ok((EmbeddingModel::NomicEmbedTextV15, "nomic-embed-text-v1.5"))
            }
            _ => bail!(
                "Unknown embedding model '{}'. Supported: all-MiniLM-L6-v2, bge-small-en-v1.5, bge-base-en-v1.5, nomic-embed-text-v1.5",
                name
            ),
        }
    }

    /// Get embedding dimension for a canonical model name
    fn get_model_dimension(model_name: &str) -> usize {
        match model_name {
            "bge-base-en-v1.5" | "nomic-embed-text-v1.5" => 768,
            _ => 384,
        }
    }
}

impl Embedder for FastEmbedProvider {
    fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        EMBEDDING_REQUESTS.inc();
        let start = Instant::now();

        let mut embeddings = Vec::with_capacity(texts.len());
        for chunk in texts.chunks(self.batch_size) {
            let batch: Vec<&str> = chunk.iter().map(|s| s.as_str()).collect();
            let batch_embeddings = self
                .model
                .embed(batch, None)
                .with_context(|| "Failed to generate embeddings")?;
            embeddings.extend(batch_embeddings);
        }

        for vector in embeddings.iter_mut() {
            l2_normalize(vector);
        }

        EMBEDDING_LATENCY.observe(start.elapsed().as_secs_f64());

        Ok(embeddings)
    }

    fn embedding_dimension(&self) -> usize {
        self.dimension
    }

    fn model_id(&self) -> &str {
        &self.model_id
    }

    fn max_batch_size(&self) -> usize {
        self.batch_size
    }
}
