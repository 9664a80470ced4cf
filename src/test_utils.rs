#[cfg(test)]
pub mod fixtures {
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use secrecy::SecretString;

    use crate::{
        models::PlanRequest,
        providers::{
            ChatMessage, ContentProvider, DocumentContent, ModelProvider, ProviderError,
            ProviderFactory, ProviderResult, Providers, SearchHit, SearchQuery,
        },
    };

    /// A standard request for "Rust ownership" at beginner level.
    pub fn plan_request() -> PlanRequest {
        PlanRequest {
            topic: "Rust ownership".to_string(),
            level: "beginner".to_string(),
            search_api_key: SecretString::from("search-key".to_string()),
            llm_api_key: SecretString::from("llm-key".to_string()),
        }
    }

    /// Search returns two fetchable pages for the topic query and three links
    /// for every other query.
    pub struct StubContent {
        pub fail_search: bool,
    }

    #[async_trait]
    impl ContentProvider for StubContent {
        async fn search(&self, query: &SearchQuery) -> ProviderResult<Vec<SearchHit>> {
            if self.fail_search {
                return Err(ProviderError::Transport("connection refused".to_string()));
            }
            let count = if query.use_autoprompt { 2 } else { query.num_results };
            Ok((0..count)
                .map(|i| SearchHit {
                    id: format!("doc-{}", i),
                    url: format!("https://example.com/{}/{}", query.query.replace(' ', "-"), i),
                    title: None,
                })
                .collect())
        }

        async fn get_contents(&self, id: &str) -> ProviderResult<DocumentContent> {
            Ok(DocumentContent {
                id: id.to_string(),
                url: None,
                title: None,
                extract: Some(format!("<p>Content of {}.</p>", id)),
            })
        }
    }

    /// Replies with an outline, then a mapping, then a quiz.
    pub struct StubModel {
        calls: Mutex<usize>,
    }

    impl StubModel {
        pub fn new() -> Self {
            Self {
                calls: Mutex::new(0),
            }
        }
    }

    #[async_trait]
    impl ModelProvider for StubModel {
        async fn complete(&self, _messages: Vec<ChatMessage>) -> ProviderResult<String> {
            let call = {
                let mut calls = self.calls.lock().unwrap();
                *calls += 1;
                *calls
            };
            Ok(match call {
                1 => "1. Chapter 1: Basics\n- ownership\n- borrowing".to_string(),
                2 => "{\"Chapter 1: Basics\": [\"ownership\", \"borrowing\"]}".to_string(),
                _ => "1. Who owns a value?\nAnswer key: 1-a".to_string(),
            })
        }
    }

    /// Builds fresh stub providers for each request.
    pub struct StubFactory {
        pub fail_search: bool,
    }

    impl ProviderFactory for StubFactory {
        fn build(&self, _request: &PlanRequest) -> Providers {
            Providers {
                content: Arc::new(StubContent {
                    fail_search: self.fail_search,
                }),
                model: Arc::new(StubModel::new()),
            }
        }
    }
}

#[cfg(test)]
pub mod test_helpers {
    use actix_web::http::StatusCode;

    /// Asserts that a status code represents an error (4xx or 5xx)
    pub fn assert_error_status(status: StatusCode) {
        assert!(
            status.is_client_error() || status.is_server_error(),
            "Expected error status, got: {}",
            status
        );
    }

    /// Asserts that a status code represents success (2xx)
    pub fn assert_success_status(status: StatusCode) {
        assert!(
            status.is_success(),
            "Expected success status, got: {}",
            status
        );
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use crate::providers::{ContentProvider, SearchQuery};

    #[tokio::test]
    async fn test_stub_content_returns_two_sources_for_autoprompt_queries() {
        let content = StubContent { fail_search: false };
        let hits = content
            .search(&SearchQuery::new("Rust", 5).with_autoprompt())
            .await
            .unwrap();
        assert_eq!(hits.len(), 2);
    }

    #[test]
    fn test_fixtures_plan_request() {
        let request = plan_request();
        assert_eq!(request.topic, "Rust ownership");
        assert_eq!(request.level, "beginner");
    }
}
