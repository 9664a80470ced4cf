pub mod content_provider;
pub mod error;
pub mod model_provider;

use std::sync::Arc;

pub use content_provider::{ContentProvider, DocumentContent, MetaphorClient, SearchHit, SearchQuery};
pub use error::{ProviderError, ProviderResult};
pub use model_provider::{ChatMessage, ModelProvider, OpenAiModel, Role};

use crate::{config::Config, models::PlanRequest};

/// The pair of outbound clients one request runs against.
#[derive(Clone)]
pub struct Providers {
    pub content: Arc<dyn ContentProvider>,
    pub model: Arc<dyn ModelProvider>,
}

/// Builds request-scoped providers from the caller's keys.
pub trait ProviderFactory: Send + Sync {
    fn build(&self, request: &PlanRequest) -> Providers;
}

pub struct HttpProviderFactory {
    http: reqwest::Client,
    config: Arc<Config>,
}

impl HttpProviderFactory {
    pub fn new(config: Arc<Config>) -> Result<Self, ProviderError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.http_timeout() {
            builder = builder.timeout(timeout);
        }
        let http = builder.build()?;

        Ok(Self { http, config })
    }
}

impl ProviderFactory for HttpProviderFactory {
    fn build(&self, request: &PlanRequest) -> Providers {
        Providers {
            content: Arc::new(MetaphorClient::new(
                self.http.clone(),
                &self.config.search_api_base,
                request.search_api_key.clone(),
            )),
            model: Arc::new(OpenAiModel::new(
                &self.config.llm_api_base,
                &self.config.llm_model,
                request.llm_api_key.clone(),
            )),
        }
    }
}
