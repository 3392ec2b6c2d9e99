//! Property tests for the recursive chunker.

use proptest::prelude::*;

use contract_intel::domain::models::{Chunk, ChunkingConfig};
use contract_intel::infrastructure::index::RecursiveChunker;

/// Strip the overlap prefix from every chunk after the first and
/// concatenate.
fn reconstruct(chunks: &[Chunk], overlap: usize) -> String {
    let mut out = String::new();
    for chunk in chunks {
        let skip = if chunk.is_first() { 0 } else { overlap };
        out.extend(chunk.text.chars().skip(skip));
    }
    out
}

/// (size, overlap) pairs with overlap strictly below size.
fn chunking_params() -> impl Strategy<Value = (usize, usize)> {
    (2usize..200).prop_flat_map(|size| (Just(size), 0..size))
}

/// Contract-ish text: words, newlines, sentence breaks, some punctuation.
fn corpus_text() -> impl Strategy<Value = String> {
    proptest::string::string_regex("[a-zA-Z0-9,;() \\n.]{0,1500}").expect("valid regex")
}

proptest! {
    #[test]
    fn chunks_never_exceed_size((size, overlap) in chunking_params(), text in corpus_text()) {
        let chunker = RecursiveChunker::new(ChunkingConfig::new(size, overlap)).unwrap();
        for chunk in chunker.chunk(&text, "doc") {
            prop_assert!(chunk.len_chars() <= size);
        }
    }

    #[test]
    fn reconstruction_is_lossless((size, overlap) in chunking_params(), text in corpus_text()) {
        let chunker = RecursiveChunker::new(ChunkingConfig::new(size, overlap)).unwrap();
        let chunks = chunker.chunk(&text, "doc");
        prop_assert_eq!(reconstruct(&chunks, overlap), text);
    }

    #[test]
    fn indices_are_sequential((size, overlap) in chunking_params(), text in corpus_text()) {
        let chunker = RecursiveChunker::new(ChunkingConfig::new(size, overlap)).unwrap();
        let chunks = chunker.chunk(&text, "doc");

        for (i, chunk) in chunks.iter().enumerate() {
            prop_assert_eq!(chunk.chunk_index, i);
        }
        if let Some(first) = chunks.first() {
            prop_assert_eq!(first.start_offset, 0);
        }
        if let Some(last) = chunks.last() {
            prop_assert_eq!(last.end_offset, text.chars().count());
        }
    }

    #[test]
    fn offsets_advance_monotonically((size, overlap) in chunking_params(), text in corpus_text()) {
        let chunker = RecursiveChunker::new(ChunkingConfig::new(size, overlap)).unwrap();
        let chunks = chunker.chunk(&text, "doc");

        for window in chunks.windows(2) {
            prop_assert!(window[1].start_offset > window[0].start_offset);
            prop_assert!(window[1].end_offset > window[0].end_offset);
            // Constant overlap between consecutive chunks
            prop_assert_eq!(window[0].end_offset - window[1].start_offset, overlap);
        }
    }

    #[test]
    fn chunk_count_monotone_in_input_length(
        (size, overlap) in chunking_params(),
        text in corpus_text(),
        extension in corpus_text(),
    ) {
        let chunker = RecursiveChunker::new(ChunkingConfig::new(size, overlap)).unwrap();
        let shorter = chunker.chunk(&text, "doc").len();
        let longer = chunker.chunk(&format!("{text}{extension}"), "doc").len();
        prop_assert!(longer >= shorter);
    }

    #[test]
    fn empty_text_only_for_empty_input((size, overlap) in chunking_params(), text in corpus_text()) {
        let chunker = RecursiveChunker::new(ChunkingConfig::new(size, overlap)).unwrap();
        let chunks = chunker.chunk(&text, "doc");

        prop_assert_eq!(chunks.is_empty(), text.is_empty());
        for chunk in &chunks {
            prop_assert!(!chunk.text.is_empty());
        }
    }
}
