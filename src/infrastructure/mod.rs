//! Infrastructure: configuration, PDF access, chunking, vector index,
//! retry policy.

pub mod config;
pub mod index;
pub mod pdf;
pub mod retry;

pub use config::{ConfigError, ConfigLoader};
pub use index::{IndexEntry, IndexMeta, RecursiveChunker, ScoredChunk, VectorIndex};
pub use retry::RetryPolicy;
