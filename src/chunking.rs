//! Document chunking.
//!
//! Provides the [`Chunker`] trait and [`RecursiveChunker`], a recursive
//! character splitter that breaks text by paragraphs, then sentences, then
//! words, falling back to raw character windows for unbroken runs.

use uuid::Uuid;

use crate::config::RagConfig;
use crate::document::Chunk;

/// Separator hierarchy tried in order when splitting oversized text.
const SEPARATORS: [&str; 5] = ["\n\n", ". ", "! ", "? ", " "];

/// A strategy for splitting document text into chunks.
///
/// Each returned [`Chunk`] carries a fresh UUID and its position in the
/// source text. Embeddings are attached later by the pipeline.
pub trait Chunker: Send + Sync {
    /// Split text into chunks. Returns an empty `Vec` for empty text.
    fn chunk(&self, text: &str) -> Vec<Chunk>;
}

/// A recursive character splitter with configurable size and overlap.
///
/// Splits by paragraph separators first; segments still exceeding
/// `chunk_size` are split by sentence boundaries, then words, and finally
/// by fixed character windows with `chunk_overlap` carried between windows.
///
/// # Example
///
/// ```rust,ignore
/// use docchat::RecursiveChunker;
///
/// let chunker = RecursiveChunker::new(1000, 200);
/// let chunks = chunker.chunk(&text);
/// ```
#[derive(Debug, Clone)]
pub struct RecursiveChunker {
    chunk_size: usize,
    chunk_overlap: usize,
}

impl RecursiveChunker {
    /// Create a new `RecursiveChunker`.
    ///
    /// # Arguments
    ///
    /// * `chunk_size` — maximum number of characters per chunk
    /// * `chunk_overlap` — overlapping characters between consecutive chunks
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Self {
        Self { chunk_size, chunk_overlap }
    }

    /// Create a chunker from the pipeline configuration.
    pub fn from_config(config: &RagConfig) -> Self {
        Self::new(config.chunk_size, config.chunk_overlap)
    }
}

impl Chunker for RecursiveChunker {
    fn chunk(&self, text: &str) -> Vec<Chunk> {
        if text.is_empty() {
            return Vec::new();
        }

        split_recursive(text, self.chunk_size, self.chunk_overlap, &SEPARATORS)
            .into_iter()
            .filter(|piece| !piece.trim().is_empty())
            .enumerate()
            .map(|(index, text)| Chunk { id: Uuid::new_v4().to_string(), text, index })
            .collect()
    }
}

/// Split `text` at the first separator level, merging adjacent pieces up to
/// `chunk_size`. Pieces that still exceed the limit descend to the next
/// separator level; the last level falls back to character windows.
fn split_recursive(
    text: &str,
    chunk_size: usize,
    chunk_overlap: usize,
    separators: &[&str],
) -> Vec<String> {
    if char_len(text) <= chunk_size || separators.is_empty() {
        return split_windows(text, chunk_size, chunk_overlap);
    }

    let separator = separators[0];
    let deeper = &separators[1..];

    // Separators stay attached to the preceding piece, so every merged
    // chunk is a verbatim substring of the input.
    let pieces = split_after(text, separator);

    let mut out = Vec::new();
    let mut current = String::new();
    let mut current_chars = 0;

    let flush = |current: &mut String, out: &mut Vec<String>| {
        if current.is_empty() {
            return;
        }
        if char_len(current) > chunk_size {
            out.extend(split_recursive(current, chunk_size, chunk_overlap, deeper));
        } else {
            out.push(std::mem::take(current));
        }
        current.clear();
    };

    for piece in pieces {
        let piece_chars = char_len(piece);
        if !current.is_empty() && current_chars + piece_chars > chunk_size {
            flush(&mut current, &mut out);
            current_chars = 0;
        }
        current.push_str(piece);
        current_chars += piece_chars;
    }
    flush(&mut current, &mut out);

    out
}

/// Chunk sizes are measured in characters, not bytes.
fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// Split text at each occurrence of `separator`, keeping the separator
/// attached to the preceding piece.
fn split_after<'a>(text: &'a str, separator: &str) -> Vec<&'a str> {
    let mut pieces = Vec::new();
    let mut start = 0;

    while let Some(pos) = text[start..].find(separator) {
        let end = start + pos + separator.len();
        pieces.push(&text[start..end]);
        start = end;
    }
    if start < text.len() {
        pieces.push(&text[start..]);
    }

    pieces
}

/// Fixed character windows with overlap, used when no separator applies.
/// Windows are counted in characters so multi-byte text never splits
/// inside a code point.
fn split_windows(text: &str, chunk_size: usize, chunk_overlap: usize) -> Vec<String> {
    if text.is_empty() {
        return Vec::new();
    }

    let chars: Vec<char> = text.chars().collect();
    let mut windows = Vec::new();
    let mut start = 0;

    while start < chars.len() {
        let end = (start + chunk_size).min(chars.len());
        windows.push(chars[start..end].iter().collect());
        let step = chunk_size.saturating_sub(chunk_overlap);
        if step == 0 {
            break;
        }
        start += step;
    }

    windows
}
