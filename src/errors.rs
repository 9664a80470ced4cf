use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde::Serialize;
use thiserror::Error;

use crate::providers::ProviderError;

/// Pipeline stage an error originated from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStage {
    Search,
    DraftPlan,
    StructurePlan,
    EnrichLinks,
    GenerateQuiz,
}

impl std::fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PipelineStage::Search => write!(f, "search"),
            PipelineStage::DraftPlan => write!(f, "draft_plan"),
            PipelineStage::StructurePlan => write!(f, "structure_plan"),
            PipelineStage::EnrichLinks => write!(f, "enrich_links"),
            PipelineStage::GenerateQuiz => write!(f, "generate_quiz"),
        }
    }
}

#[derive(Debug, Clone, Error)]
pub enum PipelineError {
    #[error("{stage} failed: {source}")]
    Upstream {
        stage: PipelineStage,
        #[source]
        source: ProviderError,
    },

    #[error("Model returned a study plan that could not be parsed")]
    MalformedPlan { raw: String },

    #[error("Model returned an empty study plan")]
    EmptyPlan,

    #[error("{stage} failed to encode prompt input: {message}")]
    Encode {
        stage: PipelineStage,
        message: String,
    },
}

impl PipelineError {
    pub fn upstream(stage: PipelineStage) -> impl FnOnce(ProviderError) -> Self {
        move |source| PipelineError::Upstream { stage, source }
    }

    pub fn encode(stage: PipelineStage) -> impl FnOnce(serde_json::Error) -> Self {
        move |err| PipelineError::Encode {
            stage,
            message: err.to_string(),
        }
    }

    pub fn stage(&self) -> PipelineStage {
        match self {
            PipelineError::Upstream { stage, .. } | PipelineError::Encode { stage, .. } => *stage,
            PipelineError::MalformedPlan { .. } | PipelineError::EmptyPlan => {
                PipelineStage::StructurePlan
            }
        }
    }

    /// Whether the same request might succeed if sent again.
    pub fn is_retryable(&self) -> bool {
        match self {
            PipelineError::Upstream { source, .. } => source.is_retryable(),
            PipelineError::MalformedPlan { .. }
            | PipelineError::EmptyPlan
            | PipelineError::Encode { .. } => false,
        }
    }
}

pub type PipelineResult<T> = Result<T, PipelineError>;

#[derive(Debug, Clone, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error(transparent)]
    Pipeline(#[from] PipelineError),

    #[error("Internal server error: {0}")]
    InternalError(String),
}

impl AppError {
    fn is_retryable(&self) -> bool {
        match self {
            AppError::Pipeline(err) => err.is_retryable(),
            AppError::ValidationError(_) | AppError::InternalError(_) => false,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub status: &'static str,
    pub error: String,
    pub retryable: bool,
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_) => StatusCode::BAD_REQUEST,
            AppError::Pipeline(PipelineError::Encode { .. }) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Pipeline(_) => StatusCode::BAD_GATEWAY,
            AppError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorResponse {
            status: "failed",
            error: self.to_string(),
            retryable: self.is_retryable(),
        })
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::ValidationError(err.to_string())
    }
}

impl From<ProviderError> for AppError {
    fn from(err: ProviderError) -> Self {
        AppError::InternalError(err.to_string())
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_status_codes() {
        assert_eq!(
            AppError::ValidationError("test".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::Pipeline(PipelineError::EmptyPlan).status_code(),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            AppError::InternalError("test".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_error_messages() {
        let err = PipelineError::Upstream {
            stage: PipelineStage::Search,
            source: ProviderError::Transport("connection refused".into()),
        };
        assert_eq!(err.to_string(), "search failed: Transport error: connection refused");
        assert_eq!(AppError::from(err).to_string(), "search failed: Transport error: connection refused");
    }

    #[test]
    fn test_pipeline_error_retryability() {
        let network = PipelineError::upstream(PipelineStage::GenerateQuiz)(ProviderError::Transport(
            "reset".into(),
        ));
        assert!(network.is_retryable());
        assert_eq!(network.stage(), PipelineStage::GenerateQuiz);

        let malformed = PipelineError::MalformedPlan {
            raw: "not a plan".into(),
        };
        assert!(!malformed.is_retryable());
        assert_eq!(malformed.stage(), PipelineStage::StructurePlan);
    }

    #[test]
    fn test_encode_error_is_internal_and_not_retryable() {
        let source = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = PipelineError::encode(PipelineStage::GenerateQuiz)(source);

        assert!(!err.is_retryable());
        assert_eq!(err.stage(), PipelineStage::GenerateQuiz);
        assert!(err
            .to_string()
            .starts_with("generate_quiz failed to encode prompt input:"));
        assert_eq!(
            AppError::from(err).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
