//! Error types for the `docchat` crate.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while ingesting a document or answering a question.
#[derive(Debug, Error)]
pub enum DocChatError {
    /// The document path does not exist.
    #[error("file not found: {}", path.display())]
    FileNotFound {
        /// The path that was requested.
        path: PathBuf,
    },

    /// The document file exists but contains zero bytes.
    #[error("file is empty: {}", path.display())]
    EmptyFile {
        /// The path that was requested.
        path: PathBuf,
    },

    /// Text extraction from the document failed.
    #[error("failed to extract text from {}: {message}", path.display())]
    Extraction {
        /// The path that was being extracted.
        path: PathBuf,
        /// A description of the failure.
        message: String,
    },

    /// An error occurred during embedding generation.
    #[error("embedding error ({provider}): {message}")]
    Embedding {
        /// The embedding provider that produced the error.
        provider: String,
        /// A description of the failure.
        message: String,
    },

    /// A write to the remote vector index failed.
    #[error("vector index write failed: {message}")]
    RemoteWrite {
        /// A description of the failure, including the response body when available.
        message: String,
    },

    /// A query against the remote vector index failed.
    #[error("vector index query failed: {message}")]
    RemoteQuery {
        /// A description of the failure, including the response body when available.
        message: String,
    },

    /// The LLM completion stream failed to open or was interrupted.
    #[error("LLM stream error: {0}")]
    LlmStream(String),

    /// A configuration validation error.
    #[error("configuration error: {0}")]
    Config(String),

    /// A record could not be serialized for the wire.
    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// A convenience result type for docchat operations.
pub type Result<T> = std::result::Result<T, DocChatError>;
