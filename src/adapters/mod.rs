//! Provider adapters for external LLM and embedding backends.

pub mod openai;
pub mod stub;

pub use openai::{OpenAiCompletionProvider, OpenAiEmbeddingProvider};
pub use stub::{CannedCompletion, HashEmbedding};
