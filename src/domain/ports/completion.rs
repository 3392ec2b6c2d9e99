//! LLM completion port.
//!
//! The engine consumes the language model as a black-box capability:
//! `complete(prompt) -> text`. Provider specifics (endpoints, auth,
//! streaming) live in adapters.

use async_trait::async_trait;

use crate::domain::errors::EngineResult;

/// Trait for LLM completion providers.
///
/// Implementations must be `Send + Sync`; requests are independent and may
/// run concurrently across tokio tasks.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Provider name (e.g., "openai", "stub").
    fn name(&self) -> &'static str;

    /// Generate a completion for the given prompt.
    ///
    /// # Errors
    /// - `EngineError::TransientService` — rate limit, server error, or
    ///   network failure (caller may retry)
    /// - `EngineError::Service` — non-retryable provider failure
    async fn complete(&self, prompt: &str) -> EngineResult<String>;
}
