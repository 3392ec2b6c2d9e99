//! Embedding provider port.
//!
//! Defines the capability trait for providers that map text into a
//! fixed-dimension vector space for similarity search. All vectors in one
//! index must come from the same provider model; the index enforces this at
//! load time via its stored metadata.

use async_trait::async_trait;

use crate::domain::errors::EngineResult;

/// A single embedding request item.
#[derive(Debug, Clone)]
pub struct EmbeddingInput {
    /// Unique client-side ID for correlation.
    pub id: String,
    /// Text to embed.
    pub text: String,
}

/// A single embedding result.
#[derive(Debug, Clone)]
pub struct EmbeddingOutput {
    /// Correlation ID matching the input.
    pub id: String,
    /// The embedding vector.
    pub vector: Vec<f32>,
}

/// Trait for embedding providers.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Provider name (e.g., "openai", "stub").
    fn name(&self) -> &'static str;

    /// Model identifier, recorded in index metadata to prevent mixing
    /// embedding spaces across rebuilds.
    fn model(&self) -> &str;

    /// Embedding dimension for this provider/model.
    fn dimension(&self) -> usize;

    /// Generate an embedding for a single text.
    async fn embed(&self, text: &str) -> EngineResult<Vec<f32>>;

    /// Generate embeddings for multiple texts.
    ///
    /// Implementations must preserve input order and handle chunking if the
    /// provider has per-request limits.
    async fn embed_batch(&self, inputs: &[EmbeddingInput]) -> EngineResult<Vec<EmbeddingOutput>>;

    /// Maximum number of texts per single API call.
    fn max_batch_size(&self) -> usize;
}
