//! Embedding providers for generating vector embeddings from text.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::error::{DocChatError, Result};

/// The default Gemini API base URL.
const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// The default Gemini embedding model.
const DEFAULT_MODEL: &str = "embedding-001";

/// A provider that generates vector embeddings from text input.
///
/// The default [`embed_batch`](EmbeddingProvider::embed_batch) calls
/// [`embed`](EmbeddingProvider::embed) sequentially, one request in flight
/// at a time.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Generate an embedding vector for a single text input.
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Generate embedding vectors for a batch of text inputs, sequentially.
    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        let mut results = Vec::with_capacity(texts.len());
        for text in texts {
            results.push(self.embed(text).await?);
        }
        Ok(results)
    }
}

/// An [`EmbeddingProvider`] backed by the Gemini `embedContent` endpoint.
///
/// # Example
///
/// ```rust,ignore
/// use docchat::GeminiEmbedder;
///
/// let embedder = GeminiEmbedder::new("your-api-key")?;
/// let embedding = embedder.embed("hello world").await?;
/// ```
#[derive(Debug)]
pub struct GeminiEmbedder {
    client: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GeminiEmbedder {
    /// Create a new embedder with the given API key and the default
    /// `embedding-001` model.
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.is_empty() {
            return Err(DocChatError::Embedding {
                provider: "Gemini".into(),
                message: "API key must not be empty".into(),
            });
        }

        Ok(Self {
            client: reqwest::Client::new(),
            api_key,
            model: DEFAULT_MODEL.into(),
            base_url: GEMINI_BASE_URL.into(),
        })
    }

    /// Set the embedding model name.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Override the API base URL. Intended for tests and proxies.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

// ── Gemini API request/response types ──────────────────────────────

#[derive(Serialize)]
struct EmbedRequest<'a> {
    content: ContentParts<'a>,
}

#[derive(Serialize)]
struct ContentParts<'a> {
    parts: Vec<TextPart<'a>>,
}

#[derive(Serialize)]
struct TextPart<'a> {
    text: &'a str,
}

#[derive(Deserialize)]
struct EmbedResponse {
    embedding: ContentEmbedding,
}

#[derive(Deserialize)]
struct ContentEmbedding {
    values: Vec<f32>,
}

// ── EmbeddingProvider implementation ───────────────────────────────

#[async_trait]
impl EmbeddingProvider for GeminiEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        debug!(provider = "Gemini", text_len = text.len(), "embedding text");

        let url = format!("{}/models/{}:embedContent", self.base_url, self.model);
        let request_body =
            EmbedRequest { content: ContentParts { parts: vec![TextPart { text }] } };

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&request_body)
            .send()
            .await
            .map_err(|e| {
                error!(provider = "Gemini", error = %e, "embedding request failed");
                DocChatError::Embedding {
                    provider: "Gemini".into(),
                    message: format!("request failed: {e}"),
                }
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            error!(provider = "Gemini", %status, "embedding API error");
            return Err(DocChatError::Embedding {
                provider: "Gemini".into(),
                message: format!("API returned {status}: {body}"),
            });
        }

        let embed_response: EmbedResponse = response.json().await.map_err(|e| {
            error!(provider = "Gemini", error = %e, "failed to parse embedding response");
            DocChatError::Embedding {
                provider: "Gemini".into(),
                message: format!("failed to parse response: {e}"),
            }
        })?;

        Ok(embed_response.embedding.values)
    }
}
