use secrecy::SecretString;
use serde::Deserialize;
use validator::Validate;

use crate::models::plan::PlanRequest;

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct GeneratePlanRequestDto {
    #[validate(length(min = 1, max = 200))]
    pub topic: String,

    // beginner / intermediate / advanced, passed through to the prompts as-is
    #[validate(length(min = 1, max = 50))]
    pub level: String,

    #[serde(alias = "metaphor_api_key")]
    #[validate(length(min = 1, message = "Search API key is required"))]
    pub search_api_key: String,

    #[serde(alias = "openai_api_key")]
    #[validate(length(min = 1, message = "LLM API key is required"))]
    pub llm_api_key: String,
}

impl From<GeneratePlanRequestDto> for PlanRequest {
    fn from(dto: GeneratePlanRequestDto) -> Self {
        PlanRequest {
            topic: dto.topic.trim().to_string(),
            level: dto.level.trim().to_string(),
            search_api_key: SecretString::from(dto.search_api_key),
            llm_api_key: SecretString::from(dto.llm_api_key),
        }
    }
}
