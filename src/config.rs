//! Configuration: environment-derived credentials and chunking parameters.

use serde::{Deserialize, Serialize};

use crate::error::{DocChatError, Result};

/// Environment variable holding the Gemini API key.
pub const GEMINI_API_KEY_VAR: &str = "GOOGLE_GENAI_API_KEY";
/// Environment variable holding the Cloudflare API token.
pub const CLOUDFLARE_API_TOKEN_VAR: &str = "CLOUDFLARE_API_TOKEN";
/// Environment variable holding the Cloudflare account identifier.
pub const CLOUDFLARE_ACCOUNT_ID_VAR: &str = "CLOUDFLARE_ACCOUNT_ID";
/// Environment variable holding the target Vectorize index name.
pub const VECTORIZE_INDEX_NAME_VAR: &str = "VECTORIZE_INDEX_NAME";

/// API credentials and remote identifiers, read once at startup.
///
/// Immutable after construction; every collaborator that needs a credential
/// receives it from here rather than reading the environment itself.
#[derive(Debug, Clone)]
pub struct Credentials {
    /// API key for the Gemini embedding and completion endpoints.
    pub gemini_api_key: String,
    /// Bearer token for the Cloudflare Vectorize API.
    pub cloudflare_api_token: String,
    /// Cloudflare account identifier.
    pub cloudflare_account_id: String,
    /// Name of the target Vectorize index.
    pub index_name: String,
}

impl Credentials {
    /// Read all credentials from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`DocChatError::Config`] naming the first variable that is
    /// missing or empty.
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            gemini_api_key: require(GEMINI_API_KEY_VAR)?,
            cloudflare_api_token: require(CLOUDFLARE_API_TOKEN_VAR)?,
            cloudflare_account_id: require(CLOUDFLARE_ACCOUNT_ID_VAR)?,
            index_name: require(VECTORIZE_INDEX_NAME_VAR)?,
        })
    }
}

fn require(name: &str) -> Result<String> {
    match std::env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(DocChatError::Config(format!("{name} environment variable not set"))),
    }
}

/// Chunking and retrieval parameters for the RAG pipeline.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RagConfig {
    /// Maximum chunk size in characters.
    pub chunk_size: usize,
    /// Number of overlapping characters between consecutive chunks.
    pub chunk_overlap: usize,
    /// Number of top results to retrieve per query.
    pub top_k: usize,
}

impl Default for RagConfig {
    fn default() -> Self {
        Self { chunk_size: 1000, chunk_overlap: 200, top_k: 5 }
    }
}

impl RagConfig {
    /// Create a new builder for constructing a [`RagConfig`].
    pub fn builder() -> RagConfigBuilder {
        RagConfigBuilder::default()
    }
}

/// Builder for constructing a validated [`RagConfig`].
#[derive(Debug, Clone, Default)]
pub struct RagConfigBuilder {
    config: RagConfig,
}

impl RagConfigBuilder {
    /// Set the maximum chunk size in characters.
    pub fn chunk_size(mut self, size: usize) -> Self {
        self.config.chunk_size = size;
        self
    }

    /// Set the overlap between consecutive chunks in characters.
    pub fn chunk_overlap(mut self, overlap: usize) -> Self {
        self.config.chunk_overlap = overlap;
        self
    }

    /// Set the number of top results to retrieve per query.
    pub fn top_k(mut self, k: usize) -> Self {
        self.config.top_k = k;
        self
    }

    /// Build the [`RagConfig`], validating that parameters are consistent.
    ///
    /// # Errors
    ///
    /// Returns [`DocChatError::Config`] if:
    /// - `chunk_overlap >= chunk_size`
    /// - `top_k == 0`
    pub fn build(self) -> Result<RagConfig> {
        if self.config.chunk_overlap >= self.config.chunk_size {
            return Err(DocChatError::Config(format!(
                "chunk_overlap ({}) must be less than chunk_size ({})",
                self.config.chunk_overlap, self.config.chunk_size
            )));
        }
        if self.config.top_k == 0 {
            return Err(DocChatError::Config("top_k must be greater than zero".to_string()));
        }
        Ok(self.config)
    }
}
