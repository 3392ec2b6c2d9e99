//! Port trait definitions (Hexagonal Architecture)
//!
//! Async trait interfaces that adapters must implement:
//! - `CompletionProvider`: LLM completion calls
//! - `EmbeddingProvider`: text-to-vector embedding calls
//!
//! These contracts keep the domain independent of any specific LLM or
//! embedding backend; tests substitute deterministic stubs.

pub mod completion;
pub mod embedding;

pub use completion::CompletionProvider;
pub use embedding::{EmbeddingInput, EmbeddingOutput, EmbeddingProvider};
