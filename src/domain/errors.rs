//! Domain errors for the contract intelligence engine.

use thiserror::Error;

/// Engine-level errors.
///
/// The taxonomy follows the request paths: invalid caller input, index
/// persistence, and LLM/embedding provider failures. Malformed model output
/// on the extraction paths is deliberately *not* an error — it degrades to
/// an [`Unparsed`](crate::domain::models::StructuredOutcome::Unparsed)
/// result instead.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Invalid caller input: non-PDF upload, unknown document id.
    #[error("Invalid input: {0}")]
    Input(String),

    /// Index persistence or load failure. Fatal during startup.
    #[error("Storage error: {0}")]
    Storage(String),

    /// Provider failure that is not worth retrying (auth, bad request).
    #[error("Provider error: {0}")]
    Service(String),

    /// Transient provider failure (rate limit, server error, network).
    /// Eligible for bounded retry with backoff.
    #[error("Transient provider error: {0}")]
    TransientService(String),

    /// Invalid configuration detected after loading.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl EngineError {
    /// Whether a retry with backoff may succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, EngineError::TransientService(_))
    }
}

pub type EngineResult<T> = Result<T, EngineError>;

impl From<sqlx::Error> for EngineError {
    fn from(err: sqlx::Error) -> Self {
        EngineError::Storage(err.to_string())
    }
}

impl From<std::io::Error> for EngineError {
    fn from(err: std::io::Error) -> Self {
        EngineError::Storage(err.to_string())
    }
}
