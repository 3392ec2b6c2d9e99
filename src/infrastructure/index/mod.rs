//! Chunking and vector index infrastructure.

pub mod chunker;
pub mod store;

pub use chunker::RecursiveChunker;
pub use store::{cosine_similarity, IndexEntry, IndexMeta, ScoredChunk, VectorIndex};
