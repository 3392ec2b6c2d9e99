//! Engine services: ingestion, retrieval, answering, structured
//! extraction.

pub mod answerer;
pub mod engine;
pub mod extractor;
pub mod ingest;
pub mod retriever;

pub use answerer::{RagAnswer, RagAnswerer};
pub use engine::{Engine, EngineStatus};
pub use extractor::StructuredExtractor;
pub use ingest::{IngestReport, IngestService};
pub use retriever::{RetrievedContext, Retriever};
