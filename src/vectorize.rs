//! Cloudflare Vectorize client.
//!
//! Two operations, each a single authenticated HTTP call with no retries,
//! caching, or circuit breaking: a batch NDJSON insert and a top-K query.
//! The [`VectorIndex`] trait is the seam the pipeline and chat loop depend
//! on, so tests can substitute an in-memory fake.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::document::{QueryMatch, VectorRecord};
use crate::error::{DocChatError, Result};

/// The default Cloudflare API base URL.
const CLOUDFLARE_BASE_URL: &str = "https://api.cloudflare.com/client/v4";

/// A remote index of vectors supporting batch upsert and top-K search.
#[async_trait]
pub trait VectorIndex: Send + Sync {
    /// Upsert a batch of records in one call, returning the mutation ID
    /// the remote service assigns to the queued insertion.
    async fn upsert_batch(&self, records: &[VectorRecord]) -> Result<String>;

    /// Return the `top_k` nearest matches for `vector`, with metadata,
    /// in the order ranked by the remote service.
    async fn query_top_k(&self, vector: &[f32], top_k: usize) -> Result<Vec<QueryMatch>>;
}

/// A [`VectorIndex`] backed by the Cloudflare Vectorize v2 HTTP API.
///
/// # Example
///
/// ```rust,ignore
/// use docchat::VectorizeClient;
///
/// let index = VectorizeClient::new(token, account_id, index_name);
/// let mutation_id = index.upsert_batch(&records).await?;
/// ```
pub struct VectorizeClient {
    client: reqwest::Client,
    api_token: String,
    account_id: String,
    index_name: String,
    base_url: String,
}

impl VectorizeClient {
    /// Create a new client for the given account and index.
    pub fn new(
        api_token: impl Into<String>,
        account_id: impl Into<String>,
        index_name: impl Into<String>,
    ) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_token: api_token.into(),
            account_id: account_id.into(),
            index_name: index_name.into(),
            base_url: CLOUDFLARE_BASE_URL.into(),
        }
    }

    /// Override the API base URL. Intended for tests and proxies.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn endpoint(&self, operation: &str) -> String {
        format!(
            "{}/accounts/{}/vectorize/v2/indexes/{}/{operation}",
            self.base_url, self.account_id, self.index_name
        )
    }
}

// ── Vectorize API request/response types ───────────────────────────

#[derive(Deserialize)]
struct InsertResponse {
    result: InsertResult,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct InsertResult {
    mutation_id: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct QueryRequest<'a> {
    vector: &'a [f32],
    top_k: usize,
    return_metadata: &'a str,
}

#[derive(Deserialize)]
struct QueryResponse {
    result: QueryResult,
}

#[derive(Deserialize)]
struct QueryResult {
    matches: Vec<QueryMatch>,
}

// ── VectorIndex implementation ─────────────────────────────────────

#[async_trait]
impl VectorIndex for VectorizeClient {
    async fn upsert_batch(&self, records: &[VectorRecord]) -> Result<String> {
        debug!(record_count = records.len(), index = %self.index_name, "upserting batch");

        // One JSON object per line, newline-delimited.
        let lines: Vec<String> =
            records.iter().map(serde_json::to_string).collect::<serde_json::Result<_>>()?;
        let body = lines.join("\n");

        let response = self
            .client
            .post(self.endpoint("insert"))
            .bearer_auth(&self.api_token)
            .header(reqwest::header::CONTENT_TYPE, "application/x-ndjson")
            .body(body)
            .send()
            .await
            .map_err(|e| {
                error!(error = %e, "insert request failed");
                DocChatError::RemoteWrite { message: format!("request failed: {e}") }
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            error!(%status, "insert rejected by remote index");
            return Err(DocChatError::RemoteWrite {
                message: format!("API returned {status}: {body}"),
            });
        }

        let insert_response: InsertResponse = response.json().await.map_err(|e| {
            error!(error = %e, "failed to parse insert response");
            DocChatError::RemoteWrite { message: format!("failed to parse response: {e}") }
        })?;

        Ok(insert_response.result.mutation_id)
    }

    async fn query_top_k(&self, vector: &[f32], top_k: usize) -> Result<Vec<QueryMatch>> {
        debug!(top_k, index = %self.index_name, "querying index");

        let request_body = QueryRequest { vector, top_k, return_metadata: "all" };

        let response = self
            .client
            .post(self.endpoint("query"))
            .bearer_auth(&self.api_token)
            .json(&request_body)
            .send()
            .await
            .map_err(|e| {
                error!(error = %e, "query request failed");
                DocChatError::RemoteQuery { message: format!("request failed: {e}") }
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            error!(%status, "query rejected by remote index");
            return Err(DocChatError::RemoteQuery {
                message: format!("API returned {status}: {body}"),
            });
        }

        let query_response: QueryResponse = response.json().await.map_err(|e| {
            error!(error = %e, "failed to parse query response");
            DocChatError::RemoteQuery { message: format!("failed to parse response: {e}") }
        })?;

        Ok(query_response.result.matches)
    }
}
