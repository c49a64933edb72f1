//! Ingestion pipeline orchestrator.
//!
//! [`IngestionPipeline`] composes extraction, chunking, embedding, and the
//! vector index: extract full text, split it, embed each chunk one request
//! at a time, then persist all records in a single batch upsert.

use std::path::Path;
use std::sync::Arc;

use tracing::{error, info};

use crate::chunking::Chunker;
use crate::config::RagConfig;
use crate::document::{RecordMetadata, VectorRecord};
use crate::embedding::EmbeddingProvider;
use crate::error::{DocChatError, Result};
use crate::extract::extract_pdf_text;
use crate::vectorize::VectorIndex;

/// Confirmation of a completed ingestion.
#[derive(Debug, Clone, PartialEq)]
pub struct IngestReport {
    /// Opaque identifier of the queued insertion, absent when the document
    /// produced no chunks and nothing was upserted.
    pub mutation_id: Option<String>,
    /// Number of chunks embedded and persisted.
    pub chunk_count: usize,
}

/// The ingestion pipeline orchestrator.
///
/// Construct one via [`IngestionPipeline::builder()`]. Failures abort the
/// remaining work for the document; records already accepted by the remote
/// index are not rolled back.
pub struct IngestionPipeline {
    chunker: Arc<dyn Chunker>,
    embedder: Arc<dyn EmbeddingProvider>,
    index: Arc<dyn VectorIndex>,
}

impl std::fmt::Debug for IngestionPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IngestionPipeline").finish_non_exhaustive()
    }
}

impl IngestionPipeline {
    /// Create a new [`IngestionPipelineBuilder`].
    pub fn builder() -> IngestionPipelineBuilder {
        IngestionPipelineBuilder::default()
    }

    /// Ingest a PDF document: extract → chunk → embed → batch upsert.
    ///
    /// # Errors
    ///
    /// - [`DocChatError::FileNotFound`] / [`DocChatError::EmptyFile`] /
    ///   [`DocChatError::Extraction`] before any network call is made.
    /// - [`DocChatError::Embedding`] if any chunk fails to embed.
    /// - [`DocChatError::RemoteWrite`] if the batch upsert fails.
    pub async fn ingest(&self, path: &Path) -> Result<IngestReport> {
        let text = extract_pdf_text(path)?;
        self.ingest_text(&text).await
    }

    /// Ingest already-extracted document text.
    ///
    /// Exposed so callers with non-PDF sources can reuse the chunk → embed →
    /// upsert flow.
    pub async fn ingest_text(&self, text: &str) -> Result<IngestReport> {
        let chunks = self.chunker.chunk(text);
        if chunks.is_empty() {
            info!(chunk_count = 0, "document produced no chunks, nothing to upsert");
            return Ok(IngestReport { mutation_id: None, chunk_count: 0 });
        }

        info!(chunk_count = chunks.len(), "processing chunks");

        // One embedding request per chunk, sequential.
        let texts: Vec<&str> = chunks.iter().map(|c| c.text.as_str()).collect();
        let embeddings = self.embedder.embed_batch(&texts).await.inspect_err(|e| {
            error!(error = %e, "embedding failed during ingestion");
        })?;

        let records: Vec<VectorRecord> = chunks
            .iter()
            .zip(embeddings)
            .map(|(chunk, values)| VectorRecord {
                id: chunk.id.clone(),
                values,
                metadata: RecordMetadata { text: chunk.text.clone() },
            })
            .collect();

        // Exactly one batch upsert for the whole document.
        let mutation_id = self.index.upsert_batch(&records).await.inspect_err(|e| {
            error!(error = %e, "upsert failed during ingestion");
        })?;

        let chunk_count = records.len();
        info!(chunk_count, %mutation_id, "vectors queued for insertion");

        Ok(IngestReport { mutation_id: Some(mutation_id), chunk_count })
    }
}

/// Builder for constructing an [`IngestionPipeline`].
#[derive(Default)]
pub struct IngestionPipelineBuilder {
    config: Option<RagConfig>,
    chunker: Option<Arc<dyn Chunker>>,
    embedder: Option<Arc<dyn EmbeddingProvider>>,
    index: Option<Arc<dyn VectorIndex>>,
}

impl IngestionPipelineBuilder {
    /// Set the pipeline configuration, used to derive the default chunker.
    pub fn config(mut self, config: RagConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Set the document chunker. Defaults to a [`RecursiveChunker`]
    /// derived from the configuration.
    ///
    /// [`RecursiveChunker`]: crate::chunking::RecursiveChunker
    pub fn chunker(mut self, chunker: Arc<dyn Chunker>) -> Self {
        self.chunker = Some(chunker);
        self
    }

    /// Set the embedding provider.
    pub fn embedder(mut self, embedder: Arc<dyn EmbeddingProvider>) -> Self {
        self.embedder = Some(embedder);
        self
    }

    /// Set the vector index backend.
    pub fn index(mut self, index: Arc<dyn VectorIndex>) -> Self {
        self.index = Some(index);
        self
    }

    /// Build the [`IngestionPipeline`], validating that all required fields
    /// are set.
    ///
    /// # Errors
    ///
    /// Returns [`DocChatError::Config`] if any required field is missing.
    pub fn build(self) -> Result<IngestionPipeline> {
        let config = self.config.unwrap_or_default();
        let chunker = self
            .chunker
            .unwrap_or_else(|| Arc::new(crate::chunking::RecursiveChunker::from_config(&config)));
        let embedder = self
            .embedder
            .ok_or_else(|| DocChatError::Config("embedder is required".to_string()))?;
        let index =
            self.index.ok_or_else(|| DocChatError::Config("index is required".to_string()))?;

        Ok(IngestionPipeline { chunker, embedder, index })
    }
}
