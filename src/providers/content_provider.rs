use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use crate::providers::error::{ProviderError, ProviderResult};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SearchHit {
    pub id: String,
    pub url: String,
    #[serde(default)]
    pub title: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DocumentContent {
    pub id: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    /// Raw HTML (or text) of the page body.
    #[serde(default)]
    pub extract: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    pub query: String,
    pub num_results: u32,
    pub use_autoprompt: bool,
}

impl SearchQuery {
    pub fn new(query: impl Into<String>, num_results: u32) -> Self {
        Self {
            query: query.into(),
            num_results,
            use_autoprompt: false,
        }
    }

    pub fn with_autoprompt(mut self) -> Self {
        self.use_autoprompt = true;
        self
    }
}

/// Web search and page-content retrieval.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ContentProvider: Send + Sync {
    async fn search(&self, query: &SearchQuery) -> ProviderResult<Vec<SearchHit>>;
    async fn get_contents(&self, id: &str) -> ProviderResult<DocumentContent>;
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SearchRequestBody<'a> {
    query: &'a str,
    num_results: u32,
    use_autoprompt: bool,
}

#[derive(Deserialize)]
struct SearchResponseBody {
    #[serde(default)]
    results: Vec<SearchHit>,
}

#[derive(Deserialize)]
struct ContentsResponseBody {
    #[serde(default)]
    contents: Vec<DocumentContent>,
}

/// Metaphor search API client, scoped to one caller's key.
pub struct MetaphorClient {
    http: reqwest::Client,
    base_url: String,
    api_key: SecretString,
}

impl MetaphorClient {
    pub fn new(http: reqwest::Client, base_url: &str, api_key: SecretString) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        }
    }

    async fn check(response: reqwest::Response) -> ProviderResult<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let message = response
            .text()
            .await
            .unwrap_or_else(|_| "Could not read response body".to_string());
        Err(ProviderError::Api {
            status: Some(status.as_u16()),
            message,
        })
    }
}

#[async_trait]
impl ContentProvider for MetaphorClient {
    async fn search(&self, query: &SearchQuery) -> ProviderResult<Vec<SearchHit>> {
        log::debug!(
            "Searching for '{}' ({} results, autoprompt={})",
            query.query,
            query.num_results,
            query.use_autoprompt
        );

        let response = self
            .http
            .post(format!("{}/search", self.base_url))
            .header("x-api-key", self.api_key.expose_secret())
            .json(&SearchRequestBody {
                query: &query.query,
                num_results: query.num_results,
                use_autoprompt: query.use_autoprompt,
            })
            .send()
            .await?;

        let body: SearchResponseBody = Self::check(response).await?.json().await?;
        Ok(body.results)
    }

    async fn get_contents(&self, id: &str) -> ProviderResult<DocumentContent> {
        let response = self
            .http
            .get(format!("{}/contents", self.base_url))
            .header("x-api-key", self.api_key.expose_secret())
            .query(&[("ids", id)])
            .send()
            .await?;

        let body: ContentsResponseBody = Self::check(response).await?.json().await?;
        body.contents
            .into_iter()
            .next()
            .ok_or_else(|| ProviderError::EmptyResponse(format!("no contents returned for {}", id)))
    }
}
