//! OpenAI embedding provider adapter.
//!
//! Calls the OpenAI `/v1/embeddings` endpoint. Compatible with any
//! OpenAI-compatible embedding API (e.g., Azure OpenAI, local servers).

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::errors::{EngineError, EngineResult};
use crate::domain::models::ProviderConfig;
use crate::domain::ports::embedding::{EmbeddingInput, EmbeddingOutput, EmbeddingProvider};

use super::{classify_status, resolve_api_key};

/// Maximum texts per single embeddings request.
const MAX_BATCH_SIZE: usize = 2048;

/// OpenAI embedding provider.
pub struct OpenAiEmbeddingProvider {
    config: ProviderConfig,
    client: reqwest::Client,
}

impl OpenAiEmbeddingProvider {
    pub fn new(config: ProviderConfig) -> EngineResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| EngineError::Config(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self { config, client })
    }

    async fn call_embeddings_api(&self, texts: Vec<String>) -> EngineResult<Vec<Vec<f32>>> {
        let api_key = resolve_api_key(&self.config)?;
        let url = format!("{}/embeddings", self.config.base_url);

        let request_body = EmbeddingsRequest {
            model: self.config.embedding_model.clone(),
            input: texts,
        };

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {api_key}"))
            .header("Content-Type", "application/json")
            .json(&request_body)
            .send()
            .await
            .map_err(|e| EngineError::TransientService(format!("Embedding request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "unable to read response body".to_string());
            return Err(classify_status(
                status,
                format!("Embedding API returned {status}: {body}"),
            ));
        }

        let result: EmbeddingsResponse = response
            .json()
            .await
            .map_err(|e| EngineError::Service(format!("Failed to parse embedding response: {e}")))?;

        // Sort by index to maintain input order
        let mut data = result.data;
        data.sort_by_key(|d| d.index);

        Ok(data.into_iter().map(|d| d.embedding).collect())
    }
}

#[async_trait]
impl EmbeddingProvider for OpenAiEmbeddingProvider {
    fn name(&self) -> &'static str {
        "openai"
    }

    fn model(&self) -> &str {
        &self.config.embedding_model
    }

    fn dimension(&self) -> usize {
        self.config.embedding_dimension
    }

    async fn embed(&self, text: &str) -> EngineResult<Vec<f32>> {
        let results = self.call_embeddings_api(vec![text.to_string()]).await?;
        results
            .into_iter()
            .next()
            .ok_or_else(|| EngineError::Service("Empty embedding response".to_string()))
    }

    async fn embed_batch(&self, inputs: &[EmbeddingInput]) -> EngineResult<Vec<EmbeddingOutput>> {
        if inputs.is_empty() {
            return Ok(Vec::new());
        }

        let texts: Vec<String> = inputs.iter().map(|i| i.text.clone()).collect();
        let mut all_outputs = Vec::with_capacity(inputs.len());

        // Chunk by max_batch_size
        for chunk_start in (0..texts.len()).step_by(MAX_BATCH_SIZE) {
            let chunk_end = (chunk_start + MAX_BATCH_SIZE).min(texts.len());
            let chunk_texts = texts[chunk_start..chunk_end].to_vec();
            let chunk_inputs = &inputs[chunk_start..chunk_end];

            let vectors = self.call_embeddings_api(chunk_texts).await?;

            for (input, vector) in chunk_inputs.iter().zip(vectors) {
                all_outputs.push(EmbeddingOutput {
                    id: input.id.clone(),
                    vector,
                });
            }
        }

        Ok(all_outputs)
    }

    fn max_batch_size(&self) -> usize {
        MAX_BATCH_SIZE
    }
}

// -- OpenAI API request/response types --

#[derive(Debug, Serialize)]
struct EmbeddingsRequest {
    model: String,
    input: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingsResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
    index: usize,
}
