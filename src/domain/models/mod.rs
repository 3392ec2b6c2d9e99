//! Domain models for the contract intelligence engine.

pub mod chunking;
pub mod config;
pub mod document;
pub mod extraction;

pub use chunking::{Chunk, ChunkingConfig};
pub use config::{
    Config, IndexConfig, LoggingConfig, ProviderConfig, RetrievalConfig, RetryConfig,
};
pub use document::Document;
pub use extraction::{ContractFields, FieldValue, RiskFinding, RiskReport, StructuredOutcome};
