//! Engine configuration model.
//!
//! Loaded by [`ConfigLoader`](crate::infrastructure::config::ConfigLoader)
//! with hierarchical merging (defaults, yaml file, environment).

use serde::{Deserialize, Serialize};

use super::chunking::ChunkingConfig;

/// Top-level engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Directory holding the ingested PDF corpus.
    pub corpus_dir: String,

    pub index: IndexConfig,
    pub chunking: ChunkingConfig,
    pub retrieval: RetrievalConfig,
    pub provider: ProviderConfig,
    pub retry: RetryConfig,
    pub logging: LoggingConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            corpus_dir: "data".to_string(),
            index: IndexConfig::default(),
            chunking: ChunkingConfig::default(),
            retrieval: RetrievalConfig::default(),
            provider: ProviderConfig::default(),
            retry: RetryConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

/// Vector index persistence settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexConfig {
    /// Directory for the on-disk index. Presence of a populated index here
    /// signals "already built" at startup.
    pub dir: String,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            dir: "vectordb".to_string(),
        }
    }
}

/// Retrieval settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalConfig {
    /// Number of chunks retrieved per question.
    pub top_k: usize,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self { top_k: 4 }
    }
}

/// LLM and embedding provider settings (OpenAI-compatible API).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// API key. Falls back to the `OPENAI_API_KEY` env var when unset.
    pub api_key: Option<String>,
    /// Base URL for the API.
    pub base_url: String,
    /// Chat completion model.
    pub completion_model: String,
    /// Sampling temperature for completions.
    pub temperature: f32,
    /// Embedding model.
    pub embedding_model: String,
    /// Expected embedding dimension.
    pub embedding_dimension: usize,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: "https://api.openai.com/v1".to_string(),
            completion_model: "gpt-4o-mini".to_string(),
            temperature: 0.0,
            embedding_model: "text-embedding-3-small".to_string(),
            embedding_dimension: 1536,
            timeout_secs: 60,
        }
    }
}

/// Retry settings for transient provider errors.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    pub max_retries: u32,
    pub initial_backoff_ms: u64,
    pub max_backoff_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_backoff_ms: 500,
            max_backoff_ms: 30_000,
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// One of: trace, debug, info, warn, error.
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.corpus_dir, "data");
        assert_eq!(config.index.dir, "vectordb");
        assert_eq!(config.retrieval.top_k, 4);
        assert_eq!(config.chunking.chunk_size, 500);
        assert_eq!(config.chunking.chunk_overlap, 200);
        assert_eq!(config.provider.completion_model, "gpt-4o-mini");
        assert!((config.provider.temperature - 0.0).abs() < f32::EPSILON);
        assert_eq!(config.provider.embedding_dimension, 1536);
        assert_eq!(config.retry.max_retries, 3);
        assert_eq!(config.logging.level, "info");
    }
}
