use std::sync::Arc;

use crate::{
    constants::prompts::{render_template, QUIZ_PROMPT, QUIZ_SYSTEM_PROMPT},
    errors::{PipelineError, PipelineResult, PipelineStage},
    models::{KnowledgeBase, Quiz, StudyPlan},
    providers::{ChatMessage, ModelProvider},
};

pub struct QuizGenerator {
    model: Arc<dyn ModelProvider>,
}

impl QuizGenerator {
    pub fn new(model: Arc<dyn ModelProvider>) -> Self {
        Self { model }
    }

    /// Returns the model's quiz text verbatim. Question count and format are not checked.
    pub async fn generate(
        &self,
        topic: &str,
        plan: &StudyPlan,
        knowledge_base: &KnowledgeBase,
    ) -> PipelineResult<Quiz> {
        let learning_plan = encode_plan(plan)?;
        let prompt = render_template(
            QUIZ_PROMPT,
            &[
                ("topic", topic),
                ("knowledge_base", knowledge_base.as_str()),
                ("learning_plan", &learning_plan),
            ],
        );

        let text = self
            .model
            .complete(vec![
                ChatMessage::system(QUIZ_SYSTEM_PROMPT),
                ChatMessage::user(prompt),
            ])
            .await
            .map_err(PipelineError::upstream(PipelineStage::GenerateQuiz))?;

        log::info!("Generated quiz for '{}' ({} bytes)", topic, text.len());
        Ok(Quiz::new(text))
    }
}

fn encode_plan(plan: &StudyPlan) -> PipelineResult<String> {
    serde_json::to_string(plan).map_err(PipelineError::encode(PipelineStage::GenerateQuiz))
}
