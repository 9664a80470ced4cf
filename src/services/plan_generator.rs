use std::sync::Arc;

use crate::{
    constants::prompts::{
        render_template, STRUCTURING_PROMPT, STRUCTURING_SYSTEM_PROMPT, STUDY_PLAN_PROMPT,
        STUDY_PLAN_SYSTEM_PROMPT,
    },
    errors::{PipelineError, PipelineResult, PipelineStage},
    models::KnowledgeBase,
    providers::{ChatMessage, ModelProvider},
    services::plan_parser::PlanOutcome,
};

/// Two model passes: a prose outline, then the same outline as a mapping.
pub struct PlanGenerator {
    model: Arc<dyn ModelProvider>,
}

impl PlanGenerator {
    pub fn new(model: Arc<dyn ModelProvider>) -> Self {
        Self { model }
    }

    pub async fn generate(
        &self,
        topic: &str,
        level: &str,
        knowledge_base: &KnowledgeBase,
    ) -> PipelineResult<PlanOutcome> {
        let draft = self.draft(topic, level, knowledge_base).await?;
        let structured = self.structure(&draft).await?;

        let outcome = PlanOutcome::from_model_output(&structured);
        match &outcome {
            PlanOutcome::Structured(plan) => log::info!(
                "Parsed study plan for '{}': {} chapters, {} subtopics",
                topic,
                plan.len(),
                plan.subtopic_count()
            ),
            PlanOutcome::Malformed { reason, .. } => {
                log::warn!("Could not parse study plan for '{}': {}", topic, reason)
            }
        }
        Ok(outcome)
    }

    pub async fn draft(
        &self,
        topic: &str,
        level: &str,
        knowledge_base: &KnowledgeBase,
    ) -> PipelineResult<String> {
        let prompt = render_template(
            STUDY_PLAN_PROMPT,
            &[
                ("topic", topic),
                ("level", level),
                ("knowledge_base", knowledge_base.as_str()),
            ],
        );

        self.model
            .complete(vec![
                ChatMessage::system(STUDY_PLAN_SYSTEM_PROMPT),
                ChatMessage::user(prompt),
            ])
            .await
            .map_err(PipelineError::upstream(PipelineStage::DraftPlan))
    }

    pub async fn structure(&self, draft: &str) -> PipelineResult<String> {
        let prompt = render_template(STRUCTURING_PROMPT, &[("plan_text", draft)]);

        self.model
            .complete(vec![
                ChatMessage::system(STRUCTURING_SYSTEM_PROMPT),
                ChatMessage::user(prompt),
            ])
            .await
            .map_err(PipelineError::upstream(PipelineStage::StructurePlan))
    }
}
