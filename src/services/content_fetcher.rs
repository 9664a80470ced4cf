use std::sync::Arc;

use crate::{
    errors::{PipelineError, PipelineResult, PipelineStage},
    models::KnowledgeBase,
    providers::{ContentProvider, ProviderError, SearchQuery},
    services::html_text::html_to_text,
};

pub const DEFAULT_SOURCE_COUNT: u32 = 5;

pub fn knowledge_query(topic: &str, level: &str) -> String {
    format!("Latest articles on for learning {} for {} level.", topic, level)
}

/// Builds a knowledge base from the top search results for a topic.
pub struct ContentFetcher {
    provider: Arc<dyn ContentProvider>,
    source_count: u32,
    max_chars: Option<usize>,
}

impl ContentFetcher {
    pub fn new(provider: Arc<dyn ContentProvider>) -> Self {
        Self {
            provider,
            source_count: DEFAULT_SOURCE_COUNT,
            max_chars: None,
        }
    }

    pub fn with_source_count(mut self, source_count: u32) -> Self {
        self.source_count = source_count;
        self
    }

    pub fn with_max_chars(mut self, max_chars: Option<usize>) -> Self {
        self.max_chars = max_chars;
        self
    }

    /// The search itself must succeed. Individual documents that fail to
    /// load are skipped.
    pub async fn fetch(&self, topic: &str, level: &str) -> PipelineResult<KnowledgeBase> {
        let query = SearchQuery::new(knowledge_query(topic, level), self.source_count).with_autoprompt();
        let hits = self
            .provider
            .search(&query)
            .await
            .map_err(PipelineError::upstream(PipelineStage::Search))?;

        if hits.is_empty() {
            log::warn!("No search results found for topic '{}'", topic);
            return Ok(KnowledgeBase::default());
        }

        let mut text = String::new();
        let mut fetched = 0usize;
        for hit in &hits {
            match self.fetch_document_text(&hit.id).await {
                Ok(extract) => {
                    text.push_str(&extract);
                    fetched += 1;
                }
                Err(e) => {
                    log::warn!("Skipping search result {} ({}): {}", hit.id, hit.url, e);
                }
            }
        }

        if let Some(max_chars) = self.max_chars {
            if let Some((cut, _)) = text.char_indices().nth(max_chars) {
                log::info!("Truncating knowledge base to {} characters", max_chars);
                text.truncate(cut);
            }
        }

        let knowledge_base = KnowledgeBase::new(text);
        log::info!(
            "Built knowledge base from {}/{} sources ({} bytes)",
            fetched,
            hits.len(),
            knowledge_base.len()
        );
        Ok(knowledge_base)
    }

    async fn fetch_document_text(&self, id: &str) -> Result<String, ProviderError> {
        let document = self.provider.get_contents(id).await?;
        let html = document
            .extract
            .ok_or_else(|| ProviderError::EmptyResponse(format!("document {} has no extract", id)))?;
        Ok(html_to_text(&html))
    }
}
