//! Terminal RAG chat for PDF documents.
//!
//! This crate provides:
//! - PDF text extraction with path and size validation
//! - Recursive character chunking with overlap
//! - Gemini embeddings and streaming completions
//! - A Cloudflare Vectorize client (batch NDJSON insert, top-K query)
//! - The ingestion pipeline and the retrieval-augmented chat loop

pub mod chat;
pub mod chunking;
pub mod config;
pub mod document;
pub mod embedding;
pub mod error;
pub mod extract;
pub mod llm;
pub mod pipeline;
pub mod vectorize;

pub use chat::{ChatSession, Turn, build_context, classify, render_prompt};
pub use chunking::{Chunker, RecursiveChunker};
pub use config::{Credentials, RagConfig, RagConfigBuilder};
pub use document::{Chunk, QueryMatch, RecordMetadata, VectorRecord};
pub use embedding::{EmbeddingProvider, GeminiEmbedder};
pub use error::{DocChatError, Result};
pub use extract::extract_pdf_text;
pub use llm::{ChatModel, FragmentStream, GeminiChat};
pub use pipeline::{IngestReport, IngestionPipeline, IngestionPipelineBuilder};
pub use vectorize::{VectorIndex, VectorizeClient};
