//! Deterministic stub providers.
//!
//! Used by tests and offline smoke runs in place of a real LLM backend.
//! `HashEmbedding` maps text to a bag-of-words vector so that texts sharing
//! vocabulary land close together in the embedding space, which is enough
//! for retrieval ordering to be meaningful in tests.

use std::sync::Mutex;

use async_trait::async_trait;

use crate::domain::errors::EngineResult;
use crate::domain::ports::completion::CompletionProvider;
use crate::domain::ports::embedding::{EmbeddingInput, EmbeddingOutput, EmbeddingProvider};

/// Completion provider that replays canned responses.
///
/// Responses are consumed in order; the last one is repeated once the queue
/// runs out. Prompts are recorded for assertions.
pub struct CannedCompletion {
    responses: Mutex<Vec<String>>,
    prompts: Mutex<Vec<String>>,
}

impl CannedCompletion {
    pub fn new(response: impl Into<String>) -> Self {
        Self::with_responses(vec![response.into()])
    }

    pub fn with_responses(responses: Vec<String>) -> Self {
        Self {
            responses: Mutex::new(responses),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Prompts received so far, in call order.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().expect("prompt lock poisoned").clone()
    }
}

#[async_trait]
impl CompletionProvider for CannedCompletion {
    fn name(&self) -> &'static str {
        "stub"
    }

    async fn complete(&self, prompt: &str) -> EngineResult<String> {
        self.prompts
            .lock()
            .expect("prompt lock poisoned")
            .push(prompt.to_string());

        let mut responses = self.responses.lock().expect("response lock poisoned");
        let response = if responses.len() > 1 {
            responses.remove(0)
        } else {
            responses
                .first()
                .cloned()
                .unwrap_or_default()
        };
        Ok(response)
    }
}

/// Deterministic embedding provider hashing words into dimension buckets.
pub struct HashEmbedding {
    dimension: usize,
}

impl HashEmbedding {
    pub fn new(dimension: usize) -> Self {
        Self { dimension }
    }

    fn embed_text(&self, text: &str) -> Vec<f32> {
        let mut vector = vec![0.0f32; self.dimension];

        for word in text.split_whitespace() {
            let bucket = Self::hash_word(&word.to_lowercase()) as usize % self.dimension;
            vector[bucket] += 1.0;
        }

        // L2-normalize so cosine similarity reduces to a dot product
        let norm: f32 = vector.iter().map(|v| v * v).sum::<f32>().sqrt();
        if norm > 0.0 {
            for v in &mut vector {
                *v /= norm;
            }
        }

        vector
    }

    // FNV-1a, stable across runs unlike the std hasher
    fn hash_word(word: &str) -> u64 {
        let mut hash: u64 = 0xcbf2_9ce4_8422_2325;
        for byte in word.bytes() {
            hash ^= u64::from(byte);
            hash = hash.wrapping_mul(0x0000_0100_0000_01b3);
        }
        hash
    }
}

impl Default for HashEmbedding {
    fn default() -> Self {
        Self::new(64)
    }
}

#[async_trait]
impl EmbeddingProvider for HashEmbedding {
    fn name(&self) -> &'static str {
        "stub"
    }

    fn model(&self) -> &str {
        "hash-bag-of-words"
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    async fn embed(&self, text: &str) -> EngineResult<Vec<f32>> {
        Ok(self.embed_text(text))
    }

    async fn embed_batch(&self, inputs: &[EmbeddingInput]) -> EngineResult<Vec<EmbeddingOutput>> {
        Ok(inputs
            .iter()
            .map(|input| EmbeddingOutput {
                id: input.id.clone(),
                vector: self.embed_text(&input.text),
            })
            .collect())
    }

    fn max_batch_size(&self) -> usize {
        usize::MAX
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_canned_completion_replays_in_order() {
        let stub = CannedCompletion::with_responses(vec!["one".to_string(), "two".to_string()]);
        assert_eq!(stub.complete("a").await.unwrap(), "one");
        assert_eq!(stub.complete("b").await.unwrap(), "two");
        // Last response repeats
        assert_eq!(stub.complete("c").await.unwrap(), "two");
        assert_eq!(stub.prompts(), vec!["a", "b", "c"]);
    }

    #[tokio::test]
    async fn test_hash_embedding_deterministic() {
        let embedder = HashEmbedding::new(32);
        let a = embedder.embed("payment terms net thirty").await.unwrap();
        let b = embedder.embed("payment terms net thirty").await.unwrap();
        assert_eq!(a, b);
        assert_eq!(a.len(), 32);
    }

    #[tokio::test]
    async fn test_hash_embedding_shared_vocabulary_is_closer() {
        let embedder = HashEmbedding::new(64);
        let query = embedder.embed("governing law delaware").await.unwrap();
        let related = embedder
            .embed("the governing law of this agreement is delaware")
            .await
            .unwrap();
        let unrelated = embedder.embed("purple elephants dance nightly").await.unwrap();

        let dot = |a: &[f32], b: &[f32]| -> f32 { a.iter().zip(b).map(|(x, y)| x * y).sum() };
        assert!(dot(&query, &related) > dot(&query, &unrelated));
    }

    #[tokio::test]
    async fn test_hash_embedding_normalized() {
        let embedder = HashEmbedding::new(16);
        let v = embedder.embed("alpha beta gamma").await.unwrap();
        let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 1e-5);
    }
}
