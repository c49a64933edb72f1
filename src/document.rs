//! Data types for chunks, vector records, and query matches.

use serde::{Deserialize, Serialize};

/// A bounded segment of a source document's text.
///
/// Chunks exist only between splitting and embedding; once their vectors
/// are upserted they are discarded.
#[derive(Debug, Clone, PartialEq)]
pub struct Chunk {
    /// Fresh unique identifier (UUID v4) assigned at split time.
    pub id: String,
    /// The text content of the chunk.
    pub text: String,
    /// Zero-based position of the chunk within the source document.
    pub index: usize,
}

/// Metadata stored alongside each vector in the remote index.
///
/// The chunk text is the only retrievable payload besides the similarity
/// score, so it must always be carried here verbatim.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RecordMetadata {
    /// The original chunk text.
    pub text: String,
}

/// A vector record as serialized on the insert wire (one NDJSON line each).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VectorRecord {
    /// Unique identifier for the record.
    pub id: String,
    /// The embedding values.
    pub values: Vec<f32>,
    /// Metadata carrying the chunk text.
    pub metadata: RecordMetadata,
}

/// A single match returned by a top-K vector query.
///
/// Matches arrive ranked by descending similarity; no local re-ranking
/// is applied.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct QueryMatch {
    /// Metadata carrying the matched chunk's text.
    pub metadata: RecordMetadata,
    /// The similarity score reported by the index.
    pub score: f32,
}
