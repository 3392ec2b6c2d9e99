//! PDF corpus access: discovery and per-page text extraction.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::domain::errors::{EngineError, EngineResult};
use crate::domain::models::Document;

/// Discover PDF files directly under `corpus_dir`, sorted by file name for
/// deterministic rebuild order.
pub fn discover_pdfs(corpus_dir: &Path) -> EngineResult<Vec<PathBuf>> {
    if !corpus_dir.exists() {
        return Ok(Vec::new());
    }

    let mut paths = Vec::new();
    for entry in std::fs::read_dir(corpus_dir)? {
        let path = entry?.path();
        if path.is_file() && is_pdf(&path) {
            paths.push(path);
        }
    }

    paths.sort();
    Ok(paths)
}

/// Whether a path looks like a PDF (case-insensitive extension check).
pub fn is_pdf(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"))
}

/// Load one PDF and extract its text page by page.
///
/// A page that yields no extractable text contributes an empty segment and
/// processing continues; only a document that cannot be opened at all is an
/// error (the ingestion pipeline skips those with a warning).
pub fn load_document(path: &Path) -> EngineResult<Document> {
    let id = path
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| EngineError::Input(format!("Invalid file name: {}", path.display())))?
        .to_string();

    let pdf = lopdf::Document::load(path)
        .map_err(|e| EngineError::Input(format!("Failed to open {}: {e}", path.display())))?;

    let mut pages = Vec::new();
    for page_number in pdf.get_pages().keys() {
        // Tolerate pages with no extractable text
        let text = pdf.extract_text(&[*page_number]).unwrap_or_default();
        pages.push(text);
    }

    debug!("Extracted {} pages from {}", pages.len(), path.display());

    Ok(Document::new(id, path.to_path_buf(), pages.join("\n")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_pdf() {
        assert!(is_pdf(Path::new("contract.pdf")));
        assert!(is_pdf(Path::new("CONTRACT.PDF")));
        assert!(!is_pdf(Path::new("contract.docx")));
        assert!(!is_pdf(Path::new("contract")));
    }

    #[test]
    fn test_discover_missing_dir_is_empty() {
        let paths = discover_pdfs(Path::new("/nonexistent/corpus")).unwrap();
        assert!(paths.is_empty());
    }

    #[test]
    fn test_discover_filters_and_sorts() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("b.pdf"), b"x").unwrap();
        std::fs::write(dir.path().join("a.pdf"), b"x").unwrap();
        std::fs::write(dir.path().join("notes.txt"), b"x").unwrap();

        let paths = discover_pdfs(dir.path()).unwrap();
        let names: Vec<_> = paths
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap())
            .collect();
        assert_eq!(names, vec!["a.pdf", "b.pdf"]);
    }

    #[test]
    fn test_load_document_rejects_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.pdf");
        std::fs::write(&path, b"this is not a pdf").unwrap();

        let err = load_document(&path).unwrap_err();
        assert!(matches!(err, EngineError::Input(_)));
    }
}
