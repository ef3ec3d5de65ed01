use anyhow::Result;

/// Core trait for embedding backends.
///
/// Implementations must be deterministic for a fixed model and return
/// L2-normalized vectors of `embedding_dimension()` length, so that a dot
/// product between two embeddings is their cosine similarity.
pub trait Embedder: Send + Sync {
    /// Generate embeddings for multiple texts, one vector per input in order
    fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>>;

    /// Generate embedding for a single query
    fn embed_query(&self, query: &str) -> Result<Vec<f32>> {
        self.embed(&[query.to_string()])?
            .into_iter()
            .next()
            .ok_or_else(|| anyhow::anyhow!("No embedding generated for query"))
    }

    /// Dimension of the vectors this embedder produces
    fn embedding_dimension(&self) -> usize;

    /// Stable identifier of the backend and model (e.g. `fastembed:all-MiniLM-L6-v2`).
    ///
    /// Persisted embeddings are only reused when this matches.
    fn model_id(&self) -> &str;

    /// Preferred number of texts per `embed` call
    fn max_batch_size(&self) -> usize;
}

/// Scale a vector to unit length in place. Zero vectors are left untouched.
pub fn l2_normalize(vector: &mut [f32]) {
    let magnitude: f32 = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
    if magnitude > 0.0 {
        for v in vector.iter_mut() {
            *v /= magnitude;
        }
    }
}
