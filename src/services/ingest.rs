//! Corpus ingestion and index building.
//!
//! A rebuild is always a full pass: every PDF in the corpus directory is
//! re-extracted, re-chunked, re-embedded, and the index generation is
//! replaced wholesale. Incremental updates are not worth their bookkeeping
//! at this corpus size and full rebuilds keep the index trivially
//! consistent with the directory contents.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{info, warn};
use uuid::Uuid;

use crate::domain::errors::{EngineError, EngineResult};
use crate::domain::ports::embedding::{EmbeddingInput, EmbeddingProvider};
use crate::infrastructure::index::{IndexEntry, RecursiveChunker, VectorIndex};
use crate::infrastructure::pdf;
use crate::infrastructure::retry::RetryPolicy;

/// Outcome of a corpus rebuild.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestReport {
    /// Documents successfully indexed.
    pub documents: usize,
    /// Documents skipped because they could not be read.
    pub skipped: usize,
    /// Total chunks in the new index generation.
    pub chunks: usize,
}

/// Builds and maintains the vector index from the PDF corpus.
pub struct IngestService {
    corpus_dir: PathBuf,
    chunker: RecursiveChunker,
    embedder: Arc<dyn EmbeddingProvider>,
    index: Arc<VectorIndex>,
    retry: RetryPolicy,
}

impl IngestService {
    pub fn new(
        corpus_dir: PathBuf,
        chunker: RecursiveChunker,
        embedder: Arc<dyn EmbeddingProvider>,
        index: Arc<VectorIndex>,
        retry: RetryPolicy,
    ) -> Self {
        Self {
            corpus_dir,
            chunker,
            embedder,
            index,
            retry,
        }
    }

    pub fn corpus_dir(&self) -> &Path {
        &self.corpus_dir
    }

    /// Copy uploaded files into the corpus under a fresh unique name, then
    /// rebuild the index.
    ///
    /// Non-PDF files are rejected before anything is copied, so a bad batch
    /// leaves the corpus untouched. Returns the corpus-relative document IDs
    /// assigned to the new files.
    pub async fn ingest_files(&self, files: &[PathBuf]) -> EngineResult<Vec<String>> {
        for file in files {
            if !pdf::is_pdf(file) {
                return Err(EngineError::Input(format!(
                    "Only PDF files are accepted: {}",
                    file.display()
                )));
            }
        }

        std::fs::create_dir_all(&self.corpus_dir)?;

        let mut ids = Vec::with_capacity(files.len());
        for file in files {
            let original_name = file
                .file_name()
                .and_then(|name| name.to_str())
                .ok_or_else(|| {
                    EngineError::Input(format!("Invalid file name: {}", file.display()))
                })?;

            let id = format!("{}_{original_name}", Uuid::new_v4().simple());
            std::fs::copy(file, self.corpus_dir.join(&id))?;
            ids.push(id);
        }

        info!("Ingested {} files into {}", ids.len(), self.corpus_dir.display());

        self.rebuild().await?;
        Ok(ids)
    }

    /// Rebuild the index from every PDF in the corpus directory.
    ///
    /// Unreadable PDFs are skipped with a warning; one corrupt upload must
    /// not block the rest of the corpus.
    pub async fn rebuild(&self) -> EngineResult<IngestReport> {
        let paths = pdf::discover_pdfs(&self.corpus_dir)?;
        info!(
            "Rebuilding index from {} PDFs in {}",
            paths.len(),
            self.corpus_dir.display()
        );

        let mut documents = 0;
        let mut skipped = 0;
        let mut chunks = Vec::new();

        for path in &paths {
            match pdf::load_document(path) {
                Ok(document) => {
                    let doc_chunks = self.chunker.chunk(&document.text, &document.id);
                    if doc_chunks.is_empty() {
                        warn!("No extractable text in {}, skipping", path.display());
                        skipped += 1;
                        continue;
                    }
                    chunks.extend(doc_chunks);
                    documents += 1;
                }
                Err(e) => {
                    warn!("Skipping {}: {e}", path.display());
                    skipped += 1;
                }
            }
        }

        let entries = self.embed_chunks(chunks).await?;
        let report = IngestReport {
            documents,
            skipped,
            chunks: entries.len(),
        };

        self.index.replace_all(entries).await?;
        info!(
            "Index rebuilt: {} documents, {} chunks, {} skipped",
            report.documents, report.chunks, report.skipped
        );

        Ok(report)
    }

    /// Load the persisted index, rebuilding from the corpus when it is
    /// absent, empty, or was built with a different embedding model.
    pub async fn load_or_build(&self) -> EngineResult<()> {
        if self.index.load().await? {
            return Ok(());
        }

        info!("No usable persisted index, rebuilding from corpus");
        self.rebuild().await?;
        Ok(())
    }

    /// Full extracted text of one corpus document, for the structured
    /// extraction operations that work on whole documents rather than
    /// retrieved chunks.
    pub fn document_text(&self, document_id: &str) -> EngineResult<String> {
        let path = self.corpus_dir.join(document_id);
        if !path.is_file() {
            return Err(EngineError::Input(format!(
                "Document not found: {document_id}"
            )));
        }

        Ok(pdf::load_document(&path)?.text)
    }

    async fn embed_chunks(
        &self,
        chunks: Vec<crate::domain::models::Chunk>,
    ) -> EngineResult<Vec<IndexEntry>> {
        if chunks.is_empty() {
            return Ok(Vec::new());
        }

        let inputs: Vec<EmbeddingInput> = chunks
            .iter()
            .map(|chunk| EmbeddingInput {
                id: chunk.id.clone(),
                text: chunk.text.clone(),
            })
            .collect();

        let outputs = self
            .retry
            .execute(|| self.embedder.embed_batch(&inputs))
            .await?;

        if outputs.len() != chunks.len() {
            return Err(EngineError::Service(format!(
                "Embedding provider returned {} vectors for {} chunks",
                outputs.len(),
                chunks.len()
            )));
        }

        Ok(chunks
            .into_iter()
            .zip(outputs)
            .map(|(chunk, output)| IndexEntry {
                chunk,
                vector: output.vector,
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::stub::HashEmbedding;
    use crate::domain::models::ChunkingConfig;
    use crate::infrastructure::index::IndexMeta;
    use tempfile::TempDir;

    async fn service(corpus: &TempDir, index_dir: &TempDir) -> IngestService {
        let embedder = Arc::new(HashEmbedding::new(32));
        let index = Arc::new(
            VectorIndex::open(
                index_dir.path(),
                IndexMeta {
                    embedding_model: embedder.model().to_string(),
                    dimension: embedder.dimension(),
                },
            )
            .await
            .unwrap(),
        );

        IngestService::new(
            corpus.path().to_path_buf(),
            RecursiveChunker::new(ChunkingConfig::new(500, 200)).unwrap(),
            embedder,
            index,
            RetryPolicy::none(),
        )
    }

    #[tokio::test]
    async fn test_rebuild_empty_corpus() {
        let corpus = TempDir::new().unwrap();
        let index_dir = TempDir::new().unwrap();
        let svc = service(&corpus, &index_dir).await;

        let report = svc.rebuild().await.unwrap();
        assert_eq!(
            report,
            IngestReport {
                documents: 0,
                skipped: 0,
                chunks: 0
            }
        );
    }

    #[tokio::test]
    async fn test_rebuild_skips_corrupt_pdf() {
        let corpus = TempDir::new().unwrap();
        let index_dir = TempDir::new().unwrap();
        std::fs::write(corpus.path().join("broken.pdf"), b"not a pdf").unwrap();

        let svc = service(&corpus, &index_dir).await;
        let report = svc.rebuild().await.unwrap();
        assert_eq!(report.documents, 0);
        assert_eq!(report.skipped, 1);
    }

    #[tokio::test]
    async fn test_ingest_rejects_non_pdf_before_copying() {
        let corpus = TempDir::new().unwrap();
        let index_dir = TempDir::new().unwrap();
        let upload_dir = TempDir::new().unwrap();

        let pdf_path = upload_dir.path().join("good.pdf");
        let txt_path = upload_dir.path().join("bad.txt");
        std::fs::write(&pdf_path, b"x").unwrap();
        std::fs::write(&txt_path, b"x").unwrap();

        let svc = service(&corpus, &index_dir).await;
        let err = svc
            .ingest_files(&[pdf_path, txt_path])
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::Input(_)));

        // Nothing was copied
        assert!(pdf::discover_pdfs(corpus.path()).unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_ingest_assigns_unique_ids() {
        let corpus = TempDir::new().unwrap();
        let index_dir = TempDir::new().unwrap();
        let upload_dir = TempDir::new().unwrap();

        // Corrupt content: ingest copies and rebuild skips, but IDs are
        // still assigned and files land in the corpus.
        let path = upload_dir.path().join("contract.pdf");
        std::fs::write(&path, b"x").unwrap();

        let svc = service(&corpus, &index_dir).await;
        let ids = svc
            .ingest_files(&[path.clone(), path.clone()])
            .await
            .unwrap();

        assert_eq!(ids.len(), 2);
        assert_ne!(ids[0], ids[1]);
        assert!(ids[0].ends_with("_contract.pdf"));
        assert_eq!(pdf::discover_pdfs(corpus.path()).unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_document_text_missing_file() {
        let corpus = TempDir::new().unwrap();
        let index_dir = TempDir::new().unwrap();
        let svc = service(&corpus, &index_dir).await;

        let err = svc.document_text("nope.pdf").unwrap_err();
        assert!(matches!(err, EngineError::Input(_)));
    }
}
