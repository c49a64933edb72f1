//! Ingestion pipeline tests using fake collaborators.

use std::io::Write;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use docchat::chunking::{Chunker, RecursiveChunker};
use docchat::document::{QueryMatch, VectorRecord};
use docchat::embedding::EmbeddingProvider;
use docchat::error::{DocChatError, Result};
use docchat::pipeline::IngestionPipeline;
use docchat::vectorize::VectorIndex;
use tokio::sync::Mutex;

/// Deterministic embedder that counts how many embedding calls it serves.
struct CountingEmbedder {
    calls: AtomicUsize,
}

impl CountingEmbedder {
    fn new() -> Self {
        Self { calls: AtomicUsize::new(0) }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl EmbeddingProvider for CountingEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(vec![text.len() as f32, 1.0])
    }
}

/// In-memory index that records every upsert batch it receives.
#[derive(Default)]
struct RecordingIndex {
    batches: Mutex<Vec<Vec<VectorRecord>>>,
}

#[async_trait]
impl VectorIndex for RecordingIndex {
    async fn upsert_batch(&self, records: &[VectorRecord]) -> Result<String> {
        self.batches.lock().await.push(records.to_vec());
        Ok("mutation-1".to_string())
    }

    async fn query_top_k(&self, _vector: &[f32], _top_k: usize) -> Result<Vec<QueryMatch>> {
        Ok(Vec::new())
    }
}

fn pipeline(
    embedder: Arc<CountingEmbedder>,
    index: Arc<RecordingIndex>,
) -> IngestionPipeline {
    IngestionPipeline::builder()
        .chunker(Arc::new(RecursiveChunker::new(50, 10)) as Arc<dyn Chunker>)
        .embedder(embedder)
        .index(index)
        .build()
        .expect("all collaborators provided")
}

#[tokio::test]
async fn missing_file_fails_before_any_network_call() {
    let embedder = Arc::new(CountingEmbedder::new());
    let index = Arc::new(RecordingIndex::default());
    let pipeline = pipeline(embedder.clone(), index.clone());

    let err = pipeline
        .ingest(Path::new("/definitely/not/here.pdf"))
        .await
        .expect_err("missing file must fail");

    assert!(matches!(err, DocChatError::FileNotFound { .. }));
    assert_eq!(embedder.calls(), 0);
    assert!(index.batches.lock().await.is_empty());
}

#[tokio::test]
async fn empty_file_fails_before_extraction() {
    let file = tempfile::NamedTempFile::new().expect("temp file");

    let embedder = Arc::new(CountingEmbedder::new());
    let index = Arc::new(RecordingIndex::default());
    let pipeline = pipeline(embedder.clone(), index.clone());

    let err = pipeline.ingest(file.path()).await.expect_err("empty file must fail");

    assert!(matches!(err, DocChatError::EmptyFile { .. }));
    assert_eq!(embedder.calls(), 0);
}

#[tokio::test]
async fn non_pdf_content_fails_extraction() {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    file.write_all(b"plain text, not a PDF").expect("write");

    let embedder = Arc::new(CountingEmbedder::new());
    let index = Arc::new(RecordingIndex::default());
    let pipeline = pipeline(embedder.clone(), index.clone());

    let err = pipeline.ingest(file.path()).await.expect_err("bad content must fail");

    assert!(matches!(err, DocChatError::Extraction { .. }));
    assert_eq!(embedder.calls(), 0);
}

#[tokio::test]
async fn n_chunks_mean_n_embeddings_and_one_upsert() {
    let embedder = Arc::new(CountingEmbedder::new());
    let index = Arc::new(RecordingIndex::default());
    let pipeline = pipeline(embedder.clone(), index.clone());

    let text = "sentence one. ".repeat(30);
    let report = pipeline.ingest_text(&text).await.expect("ingestion succeeds");

    assert!(report.chunk_count > 1, "expected multiple chunks");
    assert_eq!(report.mutation_id.as_deref(), Some("mutation-1"));
    assert_eq!(embedder.calls(), report.chunk_count);

    let batches = index.batches.lock().await;
    assert_eq!(batches.len(), 1, "exactly one batch upsert");
    assert_eq!(batches[0].len(), report.chunk_count);
}

#[tokio::test]
async fn record_metadata_carries_the_chunk_text_verbatim() {
    let embedder = Arc::new(CountingEmbedder::new());
    let index = Arc::new(RecordingIndex::default());
    let pipeline = pipeline(embedder, index.clone());

    pipeline.ingest_text("the quick brown fox").await.expect("ingestion succeeds");

    let batches = index.batches.lock().await;
    assert_eq!(batches[0].len(), 1);
    assert_eq!(batches[0][0].metadata.text, "the quick brown fox");
    assert_eq!(batches[0][0].values, vec![19.0, 1.0]);
    assert!(!batches[0][0].id.is_empty());
}

#[tokio::test]
async fn empty_text_skips_the_upsert() {
    let embedder = Arc::new(CountingEmbedder::new());
    let index = Arc::new(RecordingIndex::default());
    let pipeline = pipeline(embedder.clone(), index.clone());

    let report = pipeline.ingest_text("").await.expect("empty text is not an error");

    assert_eq!(report.chunk_count, 0);
    assert_eq!(report.mutation_id, None);
    assert_eq!(embedder.calls(), 0);
    assert!(index.batches.lock().await.is_empty());
}

#[tokio::test]
async fn builder_requires_embedder_and_index() {
    let err = IngestionPipeline::builder().build().expect_err("missing fields must fail");
    assert!(matches!(err, DocChatError::Config(_)));
}
