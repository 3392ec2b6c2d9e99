//! Contract document model.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A contract document as stored in the corpus directory.
///
/// The id is the on-disk file name, which carries a random prefix applied at
/// ingest time to avoid collisions between uploads with the same name.
/// Documents are immutable once stored; re-ingestion regenerates chunks and
/// embeddings wholesale.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    /// Opaque identifier; equals the corpus file name.
    pub id: String,

    /// Path of the source PDF in the corpus directory.
    pub path: PathBuf,

    /// Raw extracted text, one segment per page joined with newlines.
    /// Pages with no extractable text contribute an empty segment.
    pub text: String,

    /// When the document was loaded for indexing.
    pub ingested_at: DateTime<Utc>,
}

impl Document {
    pub fn new(id: impl Into<String>, path: PathBuf, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            path,
            text: text.into(),
            ingested_at: Utc::now(),
        }
    }

    /// Character length of the extracted text.
    pub fn len_chars(&self) -> usize {
        self.text.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_new() {
        let doc = Document::new("abc_contract.pdf", PathBuf::from("data/abc_contract.pdf"), "body");
        assert_eq!(doc.id, "abc_contract.pdf");
        assert_eq!(doc.len_chars(), 4);
        assert!(!doc.is_empty());
    }
}
