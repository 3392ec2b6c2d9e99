//! Contract Intelligence Engine
//!
//! Indexes a corpus of contract PDFs for retrieval-augmented question
//! answering, structured field extraction, and risk auditing.
//!
//! # Architecture
//!
//! This crate follows Clean Architecture / Hexagonal Architecture principles:
//!
//! - **Domain Layer** (`domain`): Models, provider ports, and the error
//!   taxonomy
//! - **Adapters Layer** (`adapters`): OpenAI-compatible provider
//!   implementations and deterministic stubs
//! - **Infrastructure Layer** (`infrastructure`): Configuration, PDF text
//!   extraction, chunking, the vector index, retry policy
//! - **Service Layer** (`services`): Ingestion, retrieval, answering,
//!   structured extraction, and the [`Engine`](services::Engine) façade
//! - **CLI Layer** (`cli`): Command-line interface
//!
//! # Example
//!
//! ```ignore
//! use contract_intel::infrastructure::config::ConfigLoader;
//! use contract_intel::services::Engine;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = ConfigLoader::load()?;
//!     let engine = Engine::init(&config).await?;
//!     engine.load_or_build().await?;
//!     let result = engine.ask("What are the payment terms?").await?;
//!     println!("{}", result.answer);
//!     Ok(())
//! }
//! ```

pub mod adapters;
pub mod cli;
pub mod domain;
pub mod infrastructure;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::errors::{EngineError, EngineResult};
pub use domain::models::{
    Chunk, ChunkingConfig, Config, ContractFields, Document, FieldValue, RiskFinding, RiskReport,
    StructuredOutcome,
};
pub use domain::ports::{CompletionProvider, EmbeddingProvider};
pub use infrastructure::config::{ConfigError, ConfigLoader};
pub use services::{Engine, EngineStatus, IngestReport, RagAnswer};
