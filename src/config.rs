use std::env;
use std::time::Duration;

pub const DEFAULT_SEARCH_API_BASE: &str = "https://api.metaphor.systems";
pub const DEFAULT_LLM_API_BASE: &str = "https://api.openai.com/v1";
pub const DEFAULT_LLM_MODEL: &str = "gpt-3.5-turbo";

#[derive(Clone, Debug)]
pub struct Config {
    pub web_server_host: String,
    pub web_server_port: u16,
    pub search_api_base: String,
    pub llm_api_base: String,
    pub llm_model: String,
    pub knowledge_base_results: u32,
    pub links_per_subtopic: u32,
    pub http_timeout_secs: Option<u64>,
    pub max_knowledge_base_chars: Option<usize>,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            web_server_host: env::var("WEB_SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            web_server_port: env::var("WEB_SERVER_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8000),
            search_api_base: env::var("SEARCH_API_BASE")
                .unwrap_or_else(|_| DEFAULT_SEARCH_API_BASE.to_string()),
            llm_api_base: env::var("LLM_API_BASE")
                .unwrap_or_else(|_| DEFAULT_LLM_API_BASE.to_string()),
            llm_model: env::var("LLM_MODEL").unwrap_or_else(|_| DEFAULT_LLM_MODEL.to_string()),
            knowledge_base_results: env::var("KNOWLEDGE_BASE_RESULTS")
                .ok()
                .and_then(|n| n.parse().ok())
                .unwrap_or(5),
            links_per_subtopic: env::var("LINKS_PER_SUBTOPIC")
                .ok()
                .and_then(|n| n.parse().ok())
                .unwrap_or(3),
            http_timeout_secs: env::var("HTTP_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok()),
            max_knowledge_base_chars: env::var("MAX_KNOWLEDGE_BASE_CHARS")
                .ok()
                .and_then(|s| s.parse().ok()),
        }
    }

    /// Timeout applied to outbound search requests. `None` leaves the client default.
    pub fn http_timeout(&self) -> Option<Duration> {
        self.http_timeout_secs.map(Duration::from_secs)
    }

    pub fn bind_address(&self) -> (String, u16) {
        (self.web_server_host.clone(), self.web_server_port)
    }

    pub fn test_config() -> Self {
        Self {
            web_server_host: "127.0.0.1".to_string(),
            web_server_port: 8000,
            search_api_base: "http://127.0.0.1:9".to_string(),
            llm_api_base: "http://127.0.0.1:9/v1".to_string(),
            llm_model: "test-model".to_string(),
            knowledge_base_results: 5,
            links_per_subtopic: 3,
            http_timeout_secs: None,
            max_knowledge_base_chars: None,
        }
    }
}
