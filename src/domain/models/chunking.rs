//! Chunking domain models.
//!
//! A chunk is the unit of retrieval: a bounded, possibly-overlapping text
//! segment derived from one document.

use serde::{Deserialize, Serialize};

/// Configuration for document chunking.
///
/// Sizes are measured in characters. Each chunk after the first repeats the
/// last `chunk_overlap` characters of its predecessor so that context is
/// preserved across chunk boundaries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkingConfig {
    /// Maximum characters per chunk.
    pub chunk_size: usize,

    /// Characters carried over from the end of the previous chunk.
    /// Must be strictly smaller than `chunk_size`.
    pub chunk_overlap: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            chunk_size: 500,
            chunk_overlap: 200,
        }
    }
}

impl ChunkingConfig {
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Self {
        Self {
            chunk_size,
            chunk_overlap,
        }
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.chunk_size == 0 {
            return Err("chunk_size must be greater than 0".to_string());
        }

        if self.chunk_overlap >= self.chunk_size {
            return Err("chunk_overlap must be less than chunk_size".to_string());
        }

        Ok(())
    }
}

/// A chunk of text extracted from a document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chunk {
    /// Unique identifier, `{document_id}:chunk:{index}`.
    pub id: String,

    /// Id of the owning document. Provenance only; the chunk does not
    /// control the document's lifecycle.
    pub document_id: String,

    /// Position of this chunk within the document (0-based).
    pub chunk_index: usize,

    /// The text of this chunk, including any overlap with its predecessor.
    pub text: String,

    /// Start position in the document text (character offset).
    pub start_offset: usize,

    /// End position in the document text (character offset, exclusive).
    pub end_offset: usize,
}

impl Chunk {
    pub fn new(
        document_id: impl Into<String>,
        chunk_index: usize,
        text: impl Into<String>,
        start_offset: usize,
        end_offset: usize,
    ) -> Self {
        let document_id = document_id.into();
        let id = format!("{document_id}:chunk:{chunk_index}");

        Self {
            id,
            document_id,
            chunk_index,
            text: text.into(),
            start_offset,
            end_offset,
        }
    }

    pub fn is_first(&self) -> bool {
        self.chunk_index == 0
    }

    /// Character length of the chunk text.
    pub fn len_chars(&self) -> usize {
        self.text.chars().count()
    }
}
