use std::sync::Arc;

use crate::{
    config::Config,
    errors::{PipelineError, PipelineResult},
    models::{PlanFailure, PlanRequest, PlanResult, PlanSuccess},
    providers::{ProviderFactory, Providers},
    services::{
        content_fetcher::ContentFetcher, link_enricher::LinkEnricher,
        plan_generator::PlanGenerator, plan_parser::PlanOutcome, quiz_generator::QuizGenerator,
    },
};

/// Runs fetch -> plan -> enrich -> quiz for one request, strictly in sequence.
pub struct PlanOrchestrator {
    factory: Arc<dyn ProviderFactory>,
    config: Arc<Config>,
}

impl PlanOrchestrator {
    pub fn new(factory: Arc<dyn ProviderFactory>, config: Arc<Config>) -> Self {
        Self { factory, config }
    }

    /// Never fails: any stage error becomes `PlanResult::Failed`.
    pub async fn run(&self, request: &PlanRequest) -> PlanResult {
        match self.try_run(request).await {
            Ok(success) => PlanResult::Success(success),
            Err(e) => PlanResult::Failed(PlanFailure::new(e.to_string())),
        }
    }

    pub async fn try_run(&self, request: &PlanRequest) -> PipelineResult<PlanSuccess> {
        log::info!(
            "Generating study plan for topic '{}' at level '{}'",
            request.topic,
            request.level
        );

        let Providers { content, model } = self.factory.build(request);

        let knowledge_base = ContentFetcher::new(Arc::clone(&content))
            .with_source_count(self.config.knowledge_base_results)
            .with_max_chars(self.config.max_knowledge_base_chars)
            .fetch(&request.topic, &request.level)
            .await
            .inspect_err(|e| log::error!("Knowledge base stage failed: {}", e))?;

        let plan = match PlanGenerator::new(Arc::clone(&model))
            .generate(&request.topic, &request.level, &knowledge_base)
            .await
            .inspect_err(|e| log::error!("Plan generation failed: {}", e))?
        {
            PlanOutcome::Structured(plan) if plan.is_empty() => return Err(PipelineError::EmptyPlan),
            PlanOutcome::Structured(plan) => plan,
            PlanOutcome::Malformed { raw, .. } => return Err(PipelineError::MalformedPlan { raw }),
        };

        let study_plan = LinkEnricher::new(content)
            .with_links_per_subtopic(self.config.links_per_subtopic)
            .enrich(&plan)
            .await;

        let quiz = QuizGenerator::new(model)
            .generate(&request.topic, &plan, &knowledge_base)
            .await
            .inspect_err(|e| log::error!("Quiz generation failed: {}", e))?;

        log::info!(
            "Study plan for '{}' complete: {} chapters",
            request.topic,
            study_plan.len()
        );
        Ok(PlanSuccess { study_plan, quiz })
    }
}
