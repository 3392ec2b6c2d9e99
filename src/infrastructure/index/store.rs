//! SQLite-backed vector index.
//!
//! Stores (chunk, embedding) pairs with embeddings encoded as little-endian
//! f32 BLOBs. Queries run as a full scan over an in-memory generation with
//! pure-Rust cosine similarity, which is plenty for a corpus of contracts.
//!
//! Rebuilds are published atomically: `replace_all` persists the new
//! generation inside one transaction, then swaps the in-memory `Arc` under
//! a write lock. Concurrent queries keep reading the previous generation
//! until the swap, so a partially replaced index is never observable.
//!
//! The index records the embedding model and dimension in a metadata table.
//! `load` refuses to resurrect an index built by a different model —
//! similarity scores across embedding spaces are meaningless — and reports
//! it as absent so the caller rebuilds.

use std::cmp::Ordering;
use std::path::Path;
use std::sync::Arc;

use sqlx::{Row, SqlitePool};
use tokio::sync::RwLock;
use tracing::{info, warn};

use crate::domain::errors::{EngineError, EngineResult};
use crate::domain::models::Chunk;

const META_MODEL_KEY: &str = "embedding_model";
const META_DIMENSION_KEY: &str = "dimension";

/// Identity of the embedding space the index holds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexMeta {
    pub embedding_model: String,
    pub dimension: usize,
}

/// One indexed chunk with its embedding vector.
#[derive(Debug, Clone)]
pub struct IndexEntry {
    pub chunk: Chunk,
    pub vector: Vec<f32>,
}

/// A query hit: chunk plus cosine similarity against the query vector.
#[derive(Debug, Clone)]
pub struct ScoredChunk {
    pub chunk: Chunk,
    pub score: f32,
}

/// The published state of the index at one point in time.
#[derive(Debug, Default)]
struct Generation {
    entries: Vec<IndexEntry>,
}

/// SQLite-backed vector index with atomic generation swap.
pub struct VectorIndex {
    pool: SqlitePool,
    meta: IndexMeta,
    generation: RwLock<Arc<Generation>>,
}

impl VectorIndex {
    /// Open (creating if needed) the index under `dir`.
    ///
    /// The in-memory generation starts empty; call [`load`](Self::load) to
    /// populate it from disk.
    pub async fn open(dir: &Path, meta: IndexMeta) -> EngineResult<Self> {
        std::fs::create_dir_all(dir).map_err(|e| {
            EngineError::Storage(format!("Failed to create index dir {}: {e}", dir.display()))
        })?;

        let db_path = dir.join("index.db");
        let pool = SqlitePool::connect(&format!("sqlite://{}?mode=rwc", db_path.display()))
            .await
            .map_err(|e| {
                EngineError::Storage(format!("Failed to open index at {}: {e}", db_path.display()))
            })?;

        sqlx::query(
            "CREATE TABLE IF NOT EXISTS index_meta (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
            )",
        )
        .execute(&pool)
        .await?;

        sqlx::query(
            "CREATE TABLE IF NOT EXISTS index_entries (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                chunk_id TEXT NOT NULL,
                document_id TEXT NOT NULL,
                chunk_index INTEGER NOT NULL,
                content TEXT NOT NULL,
                start_offset INTEGER NOT NULL,
                end_offset INTEGER NOT NULL,
                embedding BLOB NOT NULL
            )",
        )
        .execute(&pool)
        .await?;

        Ok(Self {
            pool,
            meta,
            generation: RwLock::new(Arc::new(Generation::default())),
        })
    }

    pub fn meta(&self) -> &IndexMeta {
        &self.meta
    }

    /// Reconstruct the in-memory generation from durable storage.
    ///
    /// Returns `true` when a non-empty index built with the configured
    /// embedding model was loaded, `false` when the index is absent, empty,
    /// or belongs to a different embedding space.
    pub async fn load(&self) -> EngineResult<bool> {
        let Some(stored) = self.stored_meta().await? else {
            return Ok(false);
        };

        if stored != self.meta {
            warn!(
                "Index at hand was built with model '{}' (dim {}), configured model is '{}' (dim {}); treating as empty",
                stored.embedding_model,
                stored.dimension,
                self.meta.embedding_model,
                self.meta.dimension
            );
            return Ok(false);
        }

        let rows = sqlx::query(
            "SELECT chunk_id, document_id, chunk_index, content, start_offset, end_offset, embedding
             FROM index_entries ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;

        let mut entries = Vec::with_capacity(rows.len());
        for row in rows {
            let document_id: String = row.get("document_id");
            let chunk_index: i64 = row.get("chunk_index");
            let content: String = row.get("content");
            let start_offset: i64 = row.get("start_offset");
            let end_offset: i64 = row.get("end_offset");
            let blob: Vec<u8> = row.get("embedding");

            let chunk = Chunk::new(
                document_id,
                usize::try_from(chunk_index).unwrap_or(0),
                content,
                usize::try_from(start_offset).unwrap_or(0),
                usize::try_from(end_offset).unwrap_or(0),
            );

            entries.push(IndexEntry {
                chunk,
                vector: bytes_to_embedding(&blob)?,
            });
        }

        if entries.is_empty() {
            return Ok(false);
        }

        info!("Loaded {} index entries from disk", entries.len());

        let mut generation = self.generation.write().await;
        *generation = Arc::new(Generation { entries });

        Ok(true)
    }

    /// Replace the entire index contents (full-rebuild semantics).
    ///
    /// Persists the new generation in a single transaction, then publishes
    /// it to queries by swapping the in-memory pointer.
    pub async fn replace_all(&self, entries: Vec<IndexEntry>) -> EngineResult<()> {
        for entry in &entries {
            if entry.vector.len() != self.meta.dimension {
                return Err(EngineError::Storage(format!(
                    "Embedding for chunk {} has dimension {}, index expects {}",
                    entry.chunk.id,
                    entry.vector.len(),
                    self.meta.dimension
                )));
            }
        }

        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM index_entries")
            .execute(&mut *tx)
            .await?;

        sqlx::query("INSERT OR REPLACE INTO index_meta (key, value) VALUES (?1, ?2)")
            .bind(META_MODEL_KEY)
            .bind(&self.meta.embedding_model)
            .execute(&mut *tx)
            .await?;

        sqlx::query("INSERT OR REPLACE INTO index_meta (key, value) VALUES (?1, ?2)")
            .bind(META_DIMENSION_KEY)
            .bind(self.meta.dimension.to_string())
            .execute(&mut *tx)
            .await?;

        for entry in &entries {
            sqlx::query(
                "INSERT INTO index_entries
                 (chunk_id, document_id, chunk_index, content, start_offset, end_offset, embedding)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            )
            .bind(&entry.chunk.id)
            .bind(&entry.chunk.document_id)
            .bind(i64::try_from(entry.chunk.chunk_index).unwrap_or(i64::MAX))
            .bind(&entry.chunk.text)
            .bind(i64::try_from(entry.chunk.start_offset).unwrap_or(i64::MAX))
            .bind(i64::try_from(entry.chunk.end_offset).unwrap_or(i64::MAX))
            .bind(embedding_to_bytes(&entry.vector))
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        info!("Persisted index generation with {} entries", entries.len());

        // Publish: queries in flight keep the old generation
        let mut generation = self.generation.write().await;
        *generation = Arc::new(Generation { entries });

        Ok(())
    }

    /// Return up to `k` chunks ranked by cosine similarity, ties broken by
    /// insertion order. An empty index yields an empty result set.
    pub async fn query(&self, vector: &[f32], k: usize) -> Vec<ScoredChunk> {
        let generation = self.generation.read().await.clone();

        let mut scored: Vec<(usize, f32)> = generation
            .entries
            .iter()
            .enumerate()
            .map(|(i, entry)| (i, cosine_similarity(vector, &entry.vector)))
            .collect();

        scored.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.0.cmp(&b.0))
        });

        scored
            .into_iter()
            .take(k)
            .map(|(i, score)| ScoredChunk {
                chunk: generation.entries[i].chunk.clone(),
                score,
            })
            .collect()
    }

    /// Number of entries in the published generation.
    pub async fn len(&self) -> usize {
        self.generation.read().await.entries.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Per-document chunk counts, in first-seen order.
    pub async fn document_stats(&self) -> Vec<(String, usize)> {
        let generation = self.generation.read().await.clone();

        let mut order: Vec<String> = Vec::new();
        let mut counts: std::collections::HashMap<String, usize> = std::collections::HashMap::new();

        for entry in &generation.entries {
            let id = &entry.chunk.document_id;
            if !counts.contains_key(id) {
                order.push(id.clone());
            }
            *counts.entry(id.clone()).or_insert(0) += 1;
        }

        order
            .into_iter()
            .map(|id| {
                let count = counts[&id];
                (id, count)
            })
            .collect()
    }

    async fn stored_meta(&self) -> EngineResult<Option<IndexMeta>> {
        let model = self.meta_value(META_MODEL_KEY).await?;
        let dimension = self.meta_value(META_DIMENSION_KEY).await?;

        match (model, dimension) {
            (Some(model), Some(dimension)) => {
                let dimension = dimension.parse::<usize>().map_err(|_| {
                    EngineError::Storage(format!("Corrupt index metadata: dimension = {dimension}"))
                })?;
                Ok(Some(IndexMeta {
                    embedding_model: model,
                    dimension,
                }))
            }
            _ => Ok(None),
        }
    }

    async fn meta_value(&self, key: &str) -> EngineResult<Option<String>> {
        let row = sqlx::query("SELECT value FROM index_meta WHERE key = ?1")
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(|r| r.get("value")))
    }
}

/// Cosine similarity between two vectors. Mismatched or zero-magnitude
/// vectors score 0.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        return 0.0;
    }

    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let mag_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let mag_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if mag_a == 0.0 || mag_b == 0.0 {
        return 0.0;
    }

    dot / (mag_a * mag_b)
}

/// Serialize an embedding vector to little-endian f32 bytes.
fn embedding_to_bytes(embedding: &[f32]) -> Vec<u8> {
    embedding.iter().flat_map(|f| f.to_le_bytes()).collect()
}

/// Deserialize an embedding vector from little-endian f32 bytes.
fn bytes_to_embedding(bytes: &[u8]) -> EngineResult<Vec<f32>> {
    if bytes.len() % 4 != 0 {
        return Err(EngineError::Storage(
            "Invalid embedding bytes length".to_string(),
        ));
    }

    Ok(bytes
        .chunks_exact(4)
        .map(|chunk| f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
        .collect())
}
