//! OpenAI-compatible provider adapters.
//!
//! Both adapters share the provider configuration: any endpoint that speaks
//! the OpenAI wire format (Azure OpenAI, local inference servers) works by
//! overriding `base_url`.

pub mod completions;
pub mod embeddings;

pub use completions::OpenAiCompletionProvider;
pub use embeddings::OpenAiEmbeddingProvider;

use reqwest::StatusCode;

use crate::domain::errors::{EngineError, EngineResult};
use crate::domain::models::ProviderConfig;

/// Resolve the API key from config or the `OPENAI_API_KEY` env var.
pub(crate) fn resolve_api_key(config: &ProviderConfig) -> EngineResult<String> {
    config
        .api_key
        .clone()
        .or_else(|| std::env::var("OPENAI_API_KEY").ok())
        .ok_or_else(|| {
            EngineError::Config(
                "API key not set. Set OPENAI_API_KEY env var or configure provider.api_key."
                    .to_string(),
            )
        })
}

/// Map an HTTP error status to the engine error taxonomy.
///
/// Retry on: 429 (rate limit) and 5xx (server errors).
/// Do NOT retry: 4xx client errors.
pub(crate) fn classify_status(status: StatusCode, message: String) -> EngineError {
    if status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error() {
        EngineError::TransientService(message)
    } else {
        EngineError::Service(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_status() {
        assert!(classify_status(StatusCode::TOO_MANY_REQUESTS, String::new()).is_transient());
        assert!(classify_status(StatusCode::BAD_GATEWAY, String::new()).is_transient());
        assert!(!classify_status(StatusCode::UNAUTHORIZED, String::new()).is_transient());
        assert!(!classify_status(StatusCode::NOT_FOUND, String::new()).is_transient());
    }
}
