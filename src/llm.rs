//! Streaming Gemini completions.
//!
//! The answer is surfaced as a lazy stream of text fragments, one per SSE
//! event. The initial request is attempted up to twice; a stream that fails
//! after it has opened is not restarted.

use async_trait::async_trait;
use eventsource_stream::Eventsource;
use futures::StreamExt;
use futures::stream::BoxStream;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, warn};

use crate::error::{DocChatError, Result};

/// The default Gemini API base URL.
const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// The default completion model.
const DEFAULT_MODEL: &str = "gemini-1.5-flash";

/// Attempts for the initial streaming request.
const MAX_ATTEMPTS: u32 = 2;

/// A stream of answer fragments.
pub type FragmentStream = BoxStream<'static, Result<String>>;

/// A language model that streams completions for a rendered prompt.
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Open a completion stream for `prompt`.
    ///
    /// The returned stream yields text fragments in arrival order and is
    /// finite and non-restartable.
    async fn stream_answer(&self, prompt: &str) -> Result<FragmentStream>;
}

/// A [`ChatModel`] backed by the Gemini `streamGenerateContent` endpoint.
///
/// Requests use SSE delivery (`alt=sse`) and temperature 0.
///
/// # Example
///
/// ```rust,ignore
/// use docchat::{ChatModel, GeminiChat};
/// use futures::StreamExt;
///
/// let llm = GeminiChat::new("your-api-key")?;
/// let mut stream = llm.stream_answer("why is the sky blue?").await?;
/// while let Some(fragment) = stream.next().await {
///     print!("{}", fragment?);
/// }
/// ```
pub struct GeminiChat {
    client: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GeminiChat {
    /// Create a new client with the given API key and the default
    /// `gemini-1.5-flash` model.
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.is_empty() {
            return Err(DocChatError::LlmStream("API key must not be empty".into()));
        }

        Ok(Self {
            client: reqwest::Client::new(),
            api_key,
            model: DEFAULT_MODEL.into(),
            base_url: GEMINI_BASE_URL.into(),
        })
    }

    /// Set the completion model name.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Override the API base URL. Intended for tests and proxies.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    async fn open_stream(&self, prompt: &str) -> Result<reqwest::Response> {
        let url = format!("{}/models/{}:streamGenerateContent", self.base_url, self.model);
        let request_body = GenerateRequest {
            contents: vec![RequestContent { parts: vec![RequestPart { text: prompt }] }],
            generation_config: GenerationConfig { temperature: 0.0 },
        };

        let response = self
            .client
            .post(&url)
            .query(&[("alt", "sse")])
            .header("x-goog-api-key", &self.api_key)
            .json(&request_body)
            .send()
            .await
            .map_err(|e| DocChatError::LlmStream(format!("request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(DocChatError::LlmStream(format!("API returned {status}: {body}")));
        }

        Ok(response)
    }
}

// ── Gemini API request/response types ──────────────────────────────

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    contents: Vec<RequestContent<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct RequestContent<'a> {
    parts: Vec<RequestPart<'a>>,
}

#[derive(Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Serialize)]
struct GenerationConfig {
    temperature: f32,
}

/// One decoded SSE event of a streaming generation.
#[derive(Debug, Deserialize)]
pub struct StreamChunk {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

impl StreamChunk {
    /// Concatenate the text parts of the first candidate, if any.
    pub fn into_fragment(self) -> Option<String> {
        let content = self.candidates.into_iter().next()?.content?;
        let fragment: String =
            content.parts.into_iter().filter_map(|part| part.text).collect();
        if fragment.is_empty() { None } else { Some(fragment) }
    }
}

// ── ChatModel implementation ───────────────────────────────────────

#[async_trait]
impl ChatModel for GeminiChat {
    async fn stream_answer(&self, prompt: &str) -> Result<FragmentStream> {
        debug!(model = %self.model, prompt_len = prompt.len(), "opening completion stream");

        let mut attempt = 0;
        let response = loop {
            attempt += 1;
            match self.open_stream(prompt).await {
                Ok(response) => break response,
                Err(e) if attempt < MAX_ATTEMPTS => {
                    warn!(attempt, error = %e, "completion request failed, retrying");
                }
                Err(e) => {
                    error!(attempt, error = %e, "completion request failed");
                    return Err(e);
                }
            }
        };

        let stream = response
            .bytes_stream()
            .eventsource()
            .map(|event| {
                event
                    .map_err(|e| DocChatError::LlmStream(format!("stream interrupted: {e}")))
                    .and_then(|event| {
                        serde_json::from_str::<StreamChunk>(&event.data).map_err(|e| {
                            DocChatError::LlmStream(format!("malformed stream event: {e}"))
                        })
                    })
            })
            .filter_map(|decoded| async move {
                match decoded {
                    Ok(chunk) => chunk.into_fragment().map(Ok),
                    Err(e) => Some(Err(e)),
                }
            });

        Ok(stream.boxed())
    }
}
