//! Unit and property tests for the recursive character chunker.

use std::collections::HashSet;

use docchat::chunking::{Chunker, RecursiveChunker};
use proptest::prelude::*;

#[test]
fn empty_text_produces_no_chunks() {
    let chunker = RecursiveChunker::new(1000, 200);
    assert!(chunker.chunk("").is_empty());
}

#[test]
fn whitespace_only_text_produces_no_chunks() {
    let chunker = RecursiveChunker::new(1000, 200);
    assert!(chunker.chunk("  \n\n   \n").is_empty());
}

#[test]
fn short_text_is_a_single_chunk() {
    let chunker = RecursiveChunker::new(1000, 200);
    let chunks = chunker.chunk("a short document");

    assert_eq!(chunks.len(), 1);
    assert_eq!(chunks[0].text, "a short document");
    assert_eq!(chunks[0].index, 0);
    assert!(!chunks[0].id.is_empty());
}

#[test]
fn unbroken_text_falls_back_to_overlapping_windows() {
    let chunker = RecursiveChunker::new(10, 3);
    let chunks = chunker.chunk("abcdefghijklmnopqrst");

    let texts: Vec<&str> = chunks.iter().map(|c| c.text.as_str()).collect();
    assert_eq!(texts, vec!["abcdefghij", "hijklmnopq", "opqrst"]);
}

#[test]
fn multibyte_text_falls_back_to_windows_without_splitting_code_points() {
    let text = "€".repeat(20);
    let chunker = RecursiveChunker::new(10, 3);
    let chunks = chunker.chunk(&text);

    let texts: Vec<&str> = chunks.iter().map(|c| c.text.as_str()).collect();
    assert_eq!(texts, vec!["€".repeat(10), "€".repeat(10), "€".repeat(6)]);
}

#[test]
fn cjk_text_is_chunked_by_character_count() {
    // CJK prose carries no spaces, so it always reaches the window fallback.
    let text = "語".repeat(25);
    let chunker = RecursiveChunker::new(10, 0);
    let chunks = chunker.chunk(&text);

    assert_eq!(chunks.len(), 3);
    for chunk in &chunks {
        assert!(chunk.text.chars().count() <= 10);
        assert!(text.contains(&chunk.text));
    }
}

#[test]
fn word_level_splitting_keeps_the_spaces() {
    let chunker = RecursiveChunker::new(10, 3);
    let chunks = chunker.chunk("aa bb cc dd ee ff");

    let texts: Vec<&str> = chunks.iter().map(|c| c.text.as_str()).collect();
    assert_eq!(texts, vec!["aa bb cc ", "dd ee ff"]);
}

#[test]
fn paragraphs_are_kept_separate_when_they_fit() {
    let first = "alpha bravo charlie delta echo.";
    let second = "foxtrot golf hotel india juliet.";
    let text = format!("{first}\n\n{second}");

    let chunker = RecursiveChunker::new(40, 5);
    let chunks = chunker.chunk(&text);

    assert_eq!(chunks.len(), 2);
    assert!(chunks[0].text.starts_with(first));
    assert_eq!(chunks[1].text, second);
}

#[test]
fn chunk_ids_are_unique_and_indexes_are_contiguous() {
    let text = "word ".repeat(500);
    let chunker = RecursiveChunker::new(100, 20);
    let chunks = chunker.chunk(&text);

    assert!(chunks.len() > 1);
    let ids: HashSet<&str> = chunks.iter().map(|c| c.id.as_str()).collect();
    assert_eq!(ids.len(), chunks.len());
    for (expected, chunk) in chunks.iter().enumerate() {
        assert_eq!(chunk.index, expected);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// No chunk ever exceeds the configured chunk size, counted in
    /// characters. The alphabet mixes ASCII with multi-byte code points.
    #[test]
    fn chunks_never_exceed_chunk_size(text in "[a-zé€語 .!?\n]{0,1500}") {
        let chunk_size = 100;
        let chunker = RecursiveChunker::new(chunk_size, 20);
        for chunk in chunker.chunk(&text) {
            let chars = chunk.text.chars().count();
            prop_assert!(
                chars <= chunk_size,
                "chunk of {chars} chars exceeds limit {chunk_size}",
            );
        }
    }

    /// Every non-whitespace character of the input appears in some chunk.
    #[test]
    fn chunks_cover_the_input(text in "[a-zé語]{1,400}") {
        let chunker = RecursiveChunker::new(50, 10);
        let chunks = chunker.chunk(&text);
        let total: usize = chunks.iter().map(|c| c.text.chars().count()).sum();
        prop_assert!(total >= text.chars().count());
    }

    /// Every chunk is a verbatim substring of the input, so the stored
    /// metadata text can reconstruct real document content.
    #[test]
    fn chunks_are_substrings_of_the_input(text in "[a-zé€語 .!?\n]{0,1500}") {
        let chunker = RecursiveChunker::new(100, 20);
        for chunk in chunker.chunk(&text) {
            prop_assert!(
                text.contains(&chunk.text),
                "chunk {:?} is not a substring of the input",
                chunk.text,
            );
        }
    }
}
