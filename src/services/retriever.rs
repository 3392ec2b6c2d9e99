//! Similarity retrieval over the vector index.

use std::sync::Arc;

use tracing::debug;

use crate::domain::errors::EngineResult;
use crate::domain::ports::embedding::EmbeddingProvider;
use crate::infrastructure::index::{ScoredChunk, VectorIndex};
use crate::infrastructure::retry::RetryPolicy;

/// Retrieved context for one question.
#[derive(Debug, Clone)]
pub struct RetrievedContext {
    pub question: String,
    pub chunks: Vec<ScoredChunk>,
}

impl RetrievedContext {
    /// Chunk texts joined with blank lines, ready for prompt assembly.
    pub fn context_text(&self) -> String {
        self.chunks
            .iter()
            .map(|s| s.chunk.text.as_str())
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

/// Embeds a question and returns the top-k most similar indexed chunks.
pub struct Retriever {
    embedder: Arc<dyn EmbeddingProvider>,
    index: Arc<VectorIndex>,
    top_k: usize,
    retry: RetryPolicy,
}

impl Retriever {
    pub fn new(
        embedder: Arc<dyn EmbeddingProvider>,
        index: Arc<VectorIndex>,
        top_k: usize,
        retry: RetryPolicy,
    ) -> Self {
        Self {
            embedder,
            index,
            top_k,
            retry,
        }
    }

    pub fn top_k(&self) -> usize {
        self.top_k
    }

    /// Retrieve context for a question. An empty index yields an empty
    /// chunk list, not an error.
    pub async fn retrieve(&self, question: &str) -> EngineResult<RetrievedContext> {
        let vector = self
            .retry
            .execute(|| self.embedder.embed(question))
            .await?;

        let chunks = self.index.query(&vector, self.top_k).await;
        debug!(
            "Retrieved {} chunks for question ({} chars)",
            chunks.len(),
            question.len()
        );

        Ok(RetrievedContext {
            question: question.to_string(),
            chunks,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::stub::HashEmbedding;
    use crate::domain::models::Chunk;
    use crate::infrastructure::index::{IndexEntry, IndexMeta};
    use tempfile::TempDir;

    async fn indexed_retriever(dir: &TempDir, texts: &[&str], top_k: usize) -> Retriever {
        let embedder = Arc::new(HashEmbedding::new(64));
        let index = Arc::new(
            VectorIndex::open(
                dir.path(),
                IndexMeta {
                    embedding_model: embedder.model().to_string(),
                    dimension: embedder.dimension(),
                },
            )
            .await
            .unwrap(),
        );

        let mut entries = Vec::new();
        for (i, text) in texts.iter().enumerate() {
            entries.push(IndexEntry {
                chunk: Chunk::new("doc.pdf", i, *text, 0, text.len()),
                vector: embedder.embed(text).await.unwrap(),
            });
        }
        index.replace_all(entries).await.unwrap();

        Retriever::new(embedder, index, top_k, RetryPolicy::none())
    }

    #[tokio::test]
    async fn test_retrieves_most_similar_first() {
        let dir = TempDir::new().unwrap();
        let retriever = indexed_retriever(
            &dir,
            &[
                "payment terms are net thirty days from invoice",
                "the governing law of this agreement is delaware",
                "confidentiality obligations survive termination",
            ],
            2,
        )
        .await;

        let ctx = retriever
            .retrieve("what is the governing law")
            .await
            .unwrap();
        assert_eq!(ctx.chunks.len(), 2);
        assert!(ctx.chunks[0].chunk.text.contains("governing law"));
    }

    #[tokio::test]
    async fn test_empty_index_yields_empty_context() {
        let dir = TempDir::new().unwrap();
        let retriever = indexed_retriever(&dir, &[], 4).await;

        let ctx = retriever.retrieve("anything").await.unwrap();
        assert!(ctx.chunks.is_empty());
        assert_eq!(ctx.context_text(), "");
    }

    #[tokio::test]
    async fn test_context_text_joins_with_blank_lines() {
        let dir = TempDir::new().unwrap();
        let retriever = indexed_retriever(&dir, &["alpha clause", "beta clause"], 4).await;

        let ctx = retriever.retrieve("clause").await.unwrap();
        let joined = ctx.context_text();
        assert!(joined.contains("\n\n"));
        assert!(joined.contains("alpha clause"));
        assert!(joined.contains("beta clause"));
    }
}
