//! Client for the documentation retrieval service.
//!
//! The index itself is built and served elsewhere; this module only issues
//! similarity queries and deserializes the passages that come back.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::error::RetrievalError;

/// A retrieved documentation passage. Plain text; the sequence order is the
/// store's relevance order and is preserved as-is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Passage {
    pub text: String,
    /// Where the passage came from, when the store reports it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

impl Passage {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            source: None,
        }
    }
}

/// A store of Kubernetes documentation queryable by similarity.
#[async_trait]
pub trait DocStore: Send + Sync {
    /// Return up to `top_k` passages relevant to `query`, most relevant first.
    async fn query(&self, query: &str, top_k: usize) -> Result<Vec<Passage>, RetrievalError>;
}

/// HTTP client for a retrieval service exposing `POST /query`.
pub struct HttpDocStore {
    client: Client,
    base_url: String,
}

impl HttpDocStore {
    pub fn new(base_url: impl Into<String>) -> Self {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            base_url: base_url.into(),
        }
    }
}

#[derive(Debug, Serialize)]
struct QueryRequest<'a> {
    query: &'a str,
    top_k: usize,
}

#[derive(Debug, Deserialize)]
struct QueryResponse {
    passages: Vec<Passage>,
}

#[async_trait]
impl DocStore for HttpDocStore {
    async fn query(&self, query: &str, top_k: usize) -> Result<Vec<Passage>, RetrievalError> {
        let url = format!("{}/query", self.base_url.trim_end_matches('/'));

        tracing::debug!(top_k, "Querying retrieval store at {}", url);

        let response = self
            .client
            .post(&url)
            .json(&QueryRequest { query, top_k })
            .send()
            .await
            .map_err(|e| RetrievalError::RequestFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RetrievalError::RequestFailed(format!(
                "HTTP {}: {}",
                status, body
            )));
        }

        let parsed: QueryResponse = response
            .json()
            .await
            .map_err(|e| RetrievalError::InvalidResponse(e.to_string()))?;

        Ok(parsed.passages)
    }
}
