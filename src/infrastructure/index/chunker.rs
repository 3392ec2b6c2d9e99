//! Recursive character chunker.
//!
//! Splits document text into overlapping windows of at most `chunk_size`
//! characters. Window ends prefer coarse boundaries — paragraph, then line,
//! then sentence — and fall back to an arbitrary character boundary only
//! when no separator exists in the window. The overlap carried into the
//! next chunk is always exactly `chunk_overlap` characters, so stripping
//! the leading overlap from every chunk after the first reconstructs the
//! original text without loss.

use crate::domain::errors::{EngineError, EngineResult};
use crate::domain::models::{Chunk, ChunkingConfig};

/// Boundary preference, coarsest first.
const SEPARATORS: [&str; 3] = ["\n\n", "\n", ". "];

/// Character-based recursive chunker.
pub struct RecursiveChunker {
    config: ChunkingConfig,
}

impl RecursiveChunker {
    pub fn new(config: ChunkingConfig) -> EngineResult<Self> {
        config
            .validate()
            .map_err(|e| EngineError::Config(format!("Invalid chunking config: {e}")))?;

        Ok(Self { config })
    }

    pub fn config(&self) -> &ChunkingConfig {
        &self.config
    }

    /// Chunk a document's text.
    ///
    /// Empty text yields no chunks; text of at most `chunk_size` characters
    /// yields exactly one chunk with no overlap.
    pub fn chunk(&self, text: &str, document_id: &str) -> Vec<Chunk> {
        if text.is_empty() {
            return Vec::new();
        }

        let chars: Vec<char> = text.chars().collect();
        let size = self.config.chunk_size;
        let overlap = self.config.chunk_overlap;

        let mut chunks = Vec::new();
        let mut start = 0;
        let mut chunk_index = 0;

        loop {
            let raw_end = (start + size).min(chars.len());

            let end = if raw_end < chars.len() {
                // The boundary must leave the window strictly past the
                // overlapped prefix, otherwise the next chunk would not
                // advance.
                self.snap_to_boundary(&chars, start + overlap, raw_end)
                    .unwrap_or(raw_end)
            } else {
                raw_end
            };

            let chunk_text: String = chars[start..end].iter().collect();
            chunks.push(Chunk::new(document_id, chunk_index, chunk_text, start, end));

            if end >= chars.len() {
                break;
            }

            start = end - overlap;
            chunk_index += 1;
        }

        chunks
    }

    /// Find the end position of the last separator occurrence inside
    /// `(min_end, max_end]`, trying coarser separators first.
    fn snap_to_boundary(&self, chars: &[char], min_end: usize, max_end: usize) -> Option<usize> {
        for separator in SEPARATORS {
            let sep: Vec<char> = separator.chars().collect();

            if let Some(end) = last_separator_end(chars, &sep, min_end, max_end) {
                return Some(end);
            }
        }

        None
    }
}

/// Scan backwards for the last position where `sep` ends within
/// `(min_end, max_end]`.
fn last_separator_end(
    chars: &[char],
    sep: &[char],
    min_end: usize,
    max_end: usize,
) -> Option<usize> {
    if sep.is_empty() || max_end < sep.len() {
        return None;
    }

    let mut match_start = max_end - sep.len();
    loop {
        let match_end = match_start + sep.len();
        if match_end <= min_end {
            return None;
        }

        if chars[match_start..match_end] == *sep {
            return Some(match_end);
        }

        if match_start == 0 {
            return None;
        }
        match_start -= 1;
    }
}
