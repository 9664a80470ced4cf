use std::sync::Arc;

use reqwest::Url;

use crate::{
    models::{EnrichedChapter, EnrichedStudyPlan, StudyPlan},
    providers::{ContentProvider, SearchHit, SearchQuery},
};

pub const DEFAULT_LINKS_PER_SUBTOPIC: u32 = 3;

/// Attaches resource links to every subtopic of a plan, one search per subtopic.
pub struct LinkEnricher {
    provider: Arc<dyn ContentProvider>,
    links_per_subtopic: u32,
}

impl LinkEnricher {
    pub fn new(provider: Arc<dyn ContentProvider>) -> Self {
        Self {
            provider,
            links_per_subtopic: DEFAULT_LINKS_PER_SUBTOPIC,
        }
    }

    pub fn with_links_per_subtopic(mut self, links_per_subtopic: u32) -> Self {
        self.links_per_subtopic = links_per_subtopic;
        self
    }

    /// A failed search leaves that subtopic with no links; the rest of the
    /// plan is still enriched.
    pub async fn enrich(&self, plan: &StudyPlan) -> EnrichedStudyPlan {
        let mut enriched = EnrichedStudyPlan::new();

        for chapter in plan.chapters() {
            let mut links = EnrichedChapter::new(chapter.name.clone());
            for subtopic in &chapter.subtopics {
                let urls = self.links_for(subtopic).await;
                links.insert(subtopic.clone(), urls);
            }
            enriched.push(links);
        }

        enriched
    }

    async fn links_for(&self, subtopic: &str) -> Vec<String> {
        let query = SearchQuery::new(subtopic, self.links_per_subtopic);
        match self.provider.search(&query).await {
            Ok(hits) => well_formed_urls(hits, self.links_per_subtopic as usize),
            Err(e) => {
                log::warn!("Link search failed for subtopic '{}': {}", subtopic, e);
                Vec::new()
            }
        }
    }
}

fn well_formed_urls(hits: Vec<SearchHit>, limit: usize) -> Vec<String> {
    hits.into_iter()
        .filter(|hit| {
            Url::parse(&hit.url)
                .map(|url| matches!(url.scheme(), "http" | "https"))
                .unwrap_or(false)
        })
        .map(|hit| hit.url)
        .take(limit)
        .collect()
}
