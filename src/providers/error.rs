use thiserror::Error;

/// Failure talking to one of the outbound APIs (search or model).
#[derive(Debug, Clone, Error)]
pub enum ProviderError {
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("API error ({}): {message}", status_label(.status))]
    Api { status: Option<u16>, message: String },

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Empty response: {0}")]
    EmptyResponse(String),
}

fn status_label(status: &Option<u16>) -> String {
    status
        .map(|s| s.to_string())
        .unwrap_or_else(|| "no status".to_string())
}

impl ProviderError {
    /// Network failures, rate limiting and upstream 5xx are worth retrying by the caller.
    pub fn is_retryable(&self) -> bool {
        match self {
            ProviderError::Transport(_) => true,
            ProviderError::Api { status: Some(s), .. } => *s == 429 || *s >= 500,
            ProviderError::Api { status: None, .. } => false,
            ProviderError::Decode(_) | ProviderError::EmptyResponse(_) => false,
        }
    }
}

impl From<reqwest::Error> for ProviderError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            return ProviderError::Decode(err.to_string());
        }
        match err.status() {
            Some(status) => ProviderError::Api {
                status: Some(status.as_u16()),
                message: err.to_string(),
            },
            None => ProviderError::Transport(err.to_string()),
        }
    }
}

impl From<async_openai::error::OpenAIError> for ProviderError {
    fn from(err: async_openai::error::OpenAIError) -> Self {
        use async_openai::error::OpenAIError;

        match err {
            OpenAIError::Reqwest(e) => ProviderError::Transport(e.to_string()),
            OpenAIError::ApiError(api) => ProviderError::Api {
                status: None,
                message: api.message,
            },
            other => ProviderError::Decode(other.to_string()),
        }
    }
}

pub type ProviderResult<T> = Result<T, ProviderError>;
