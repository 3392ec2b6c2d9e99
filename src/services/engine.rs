//! Engine façade wiring providers, index, and services together.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::info;

use crate::adapters::openai::{OpenAiCompletionProvider, OpenAiEmbeddingProvider};
use crate::domain::errors::EngineResult;
use crate::domain::models::{Config, ContractFields, RiskReport, StructuredOutcome};
use crate::domain::ports::completion::CompletionProvider;
use crate::domain::ports::embedding::EmbeddingProvider;
use crate::infrastructure::index::{IndexMeta, RecursiveChunker, VectorIndex};
use crate::infrastructure::retry::RetryPolicy;
use crate::services::answerer::{RagAnswer, RagAnswerer};
use crate::services::extractor::StructuredExtractor;
use crate::services::ingest::{IngestReport, IngestService};
use crate::services::retriever::Retriever;

/// Snapshot of what the index currently holds.
#[derive(Debug, Clone)]
pub struct EngineStatus {
    pub indexed_chunks: usize,
    /// (document_id, chunk count) per indexed document.
    pub documents: Vec<(String, usize)>,
}

/// The contract intelligence engine.
///
/// Owns the ingestion pipeline, the vector index, and the answering and
/// extraction services, all sharing one pair of provider handles.
pub struct Engine {
    ingest: IngestService,
    answerer: RagAnswerer,
    extractor: StructuredExtractor,
    index: Arc<VectorIndex>,
}

impl Engine {
    /// Build an engine from configuration, wiring the OpenAI-compatible
    /// providers.
    pub async fn init(config: &Config) -> EngineResult<Self> {
        let embedder: Arc<dyn EmbeddingProvider> =
            Arc::new(OpenAiEmbeddingProvider::new(config.provider.clone())?);
        let completer: Arc<dyn CompletionProvider> =
            Arc::new(OpenAiCompletionProvider::new(config.provider.clone())?);

        info!(
            "Engine providers: completion={}, embedding={} (dim {})",
            config.provider.completion_model,
            config.provider.embedding_model,
            config.provider.embedding_dimension
        );

        Self::with_providers(config, embedder, completer).await
    }

    /// Build an engine with explicit provider implementations. Tests use
    /// this with deterministic stubs.
    pub async fn with_providers(
        config: &Config,
        embedder: Arc<dyn EmbeddingProvider>,
        completer: Arc<dyn CompletionProvider>,
    ) -> EngineResult<Self> {
        let index = Arc::new(
            VectorIndex::open(
                Path::new(&config.index.dir),
                IndexMeta {
                    embedding_model: embedder.model().to_string(),
                    dimension: embedder.dimension(),
                },
            )
            .await?,
        );

        let retry = RetryPolicy::from_config(&config.retry);
        let chunker = RecursiveChunker::new(config.chunking.clone())?;

        let ingest = IngestService::new(
            PathBuf::from(&config.corpus_dir),
            chunker,
            embedder.clone(),
            index.clone(),
            retry.clone(),
        );

        let retriever = Retriever::new(
            embedder,
            index.clone(),
            config.retrieval.top_k,
            retry.clone(),
        );
        let answerer = RagAnswerer::new(retriever, completer.clone(), retry.clone());
        let extractor = StructuredExtractor::new(completer, retry);

        Ok(Self {
            ingest,
            answerer,
            extractor,
            index,
        })
    }

    /// Load the persisted index or rebuild it from the corpus.
    pub async fn load_or_build(&self) -> EngineResult<()> {
        self.ingest.load_or_build().await
    }

    /// Rebuild the index from the corpus directory.
    pub async fn rebuild(&self) -> EngineResult<IngestReport> {
        self.ingest.rebuild().await
    }

    /// Copy files into the corpus and rebuild. Returns assigned document
    /// IDs.
    pub async fn ingest_files(&self, files: &[PathBuf]) -> EngineResult<Vec<String>> {
        self.ingest.ingest_files(files).await
    }

    /// Answer a question against the indexed corpus.
    pub async fn ask(&self, question: &str) -> EngineResult<RagAnswer> {
        self.answerer.answer(question).await
    }

    /// Answer a question, returning the answer in fixed-size character
    /// windows.
    pub async fn ask_chunked(&self, question: &str) -> EngineResult<Vec<String>> {
        self.answerer.answer_chunked(question).await
    }

    /// Extract structured fields from one corpus document.
    pub async fn extract(
        &self,
        document_id: &str,
    ) -> EngineResult<StructuredOutcome<ContractFields>> {
        let text = self.ingest.document_text(document_id)?;
        self.extractor.extract_fields(&text).await
    }

    /// Audit one corpus document for contractual risks.
    pub async fn audit(&self, document_id: &str) -> EngineResult<StructuredOutcome<RiskReport>> {
        let text = self.ingest.document_text(document_id)?;
        self.extractor.audit_risks(&text).await
    }

    /// Current index contents.
    pub async fn status(&self) -> EngineStatus {
        EngineStatus {
            indexed_chunks: self.index.len().await,
            documents: self.index.document_stats().await,
        }
    }
}
