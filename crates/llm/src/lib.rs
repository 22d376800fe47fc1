//! ChronoChem LLM Service
//!
//! Thin adapter over a hosted chat-completion API:
//! - `LlmService` trait consumed by the chat domain
//! - OpenAI-compatible implementation (`/v1/chat/completions`)
//! - Mock implementation for tests and offline development

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod mock;
pub mod openai;

pub use mock::MockLlmService;
pub use openai::OpenAiService;

/// Default request timeout for the completion call
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Error, Debug)]
pub enum LlmError {
    #[error("LLM configuration error: {0}")]
    Configuration(String),

    #[error("LLM request failed: {0}")]
    Request(String),

    #[error("LLM request timed out after {0:?}")]
    Timeout(Duration),

    #[error("LLM authentication failed: {0}")]
    Authentication(String),

    #[error("LLM rate limit exceeded")]
    RateLimit,

    #[error("LLM response error: {0}")]
    Response(String),
}

/// Role of a message in a completion request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LlmRole {
    System,
    User,
    Assistant,
}

impl LlmRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            LlmRole::System => "system",
            LlmRole::User => "user",
            LlmRole::Assistant => "assistant",
        }
    }
}

impl fmt::Display for LlmRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single (role, content) pair sent to the model
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LlmMessage {
    pub role: LlmRole,
    pub content: String,
}

impl LlmMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: LlmRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: LlmRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: LlmRole::Assistant,
            content: content.into(),
        }
    }
}

/// Completion request: an ordered message list plus generation parameters.
///
/// `None` parameters fall back to the service configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub model: String,
    pub messages: Vec<LlmMessage>,
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
}

/// Completion response (first choice only)
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionResponse {
    pub content: String,
    pub model: String,
    pub input_tokens: Option<i32>,
    pub output_tokens: Option<i32>,
    pub finish_reason: Option<String>,
}

/// LLM service configuration
#[derive(Clone)]
pub struct LlmConfig {
    /// Provider (openai, mock)
    pub provider: String,
    /// API key for the hosted provider
    pub api_key: Option<String>,
    /// Base URL override (OpenAI-compatible gateways, tests)
    pub base_url: Option<String>,
    /// Model used when a request does not name one
    pub default_model: String,
    /// Default max-token cap
    pub max_tokens: u32,
    /// Default sampling temperature
    pub temperature: f32,
    /// Bound on a single completion call
    pub timeout: Duration,
}

impl fmt::Debug for LlmConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LlmConfig")
            .field("provider", &self.provider)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .field("default_model", &self.default_model)
            .field("max_tokens", &self.max_tokens)
            .field("temperature", &self.temperature)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: "mock".to_string(),
            api_key: None,
            base_url: None,
            default_model: "gpt-4o-mini".to_string(),
            max_tokens: 500,
            temperature: 0.7,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl LlmConfig {
    /// Create LLM config from environment variables
    pub fn from_env() -> Result<Self, LlmError> {
        dotenvy::dotenv().ok();

        let defaults = Self::default();

        let provider = std::env::var("LLM_PROVIDER").unwrap_or_else(|_| "openai".to_string());
        let api_key = std::env::var("OPENAI_API_KEY")
            .ok()
            .filter(|k| !k.trim().is_empty());
        let base_url = std::env::var("OPENAI_BASE_URL")
            .ok()
            .filter(|u| !u.trim().is_empty());
        let default_model =
            std::env::var("MODEL_NAME").unwrap_or_else(|_| defaults.default_model.clone());

        let max_tokens = parse_var("MAX_TOKENS", defaults.max_tokens)?;
        let temperature = parse_var("TEMPERATURE", defaults.temperature)?;
        let timeout_secs = parse_var("LLM_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS)?;

        if !(0.0..=2.0).contains(&temperature) {
            return Err(LlmError::Configuration(format!(
                "TEMPERATURE must be between 0 and 2, got {}",
                temperature
            )));
        }
        if timeout_secs == 0 {
            return Err(LlmError::Configuration(
                "LLM_TIMEOUT_SECS must be at least 1".to_string(),
            ));
        }

        Ok(Self {
            provider,
            api_key,
            base_url,
            default_model,
            max_tokens,
            temperature,
            timeout: Duration::from_secs(timeout_secs),
        })
    }
}

fn parse_var<T: std::str::FromStr>(key: &str, default: T) -> Result<T, LlmError> {
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|_| LlmError::Configuration(format!("{} has an invalid value: {}", key, raw))),
        Err(_) => Ok(default),
    }
}

/// Chat-completion service
#[async_trait::async_trait]
pub trait LlmService: Send + Sync {
    /// Run one request/response cycle and return the first choice
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError>;

    /// Model used when a request leaves `model` empty
    fn default_model(&self) -> &str;
}

/// LLM service factory
pub struct LlmServiceFactory;

impl LlmServiceFactory {
    /// Create LLM service based on configuration
    pub fn create(config: LlmConfig) -> Result<Box<dyn LlmService>, LlmError> {
        match config.provider.as_str() {
            "openai" => {
                tracing::info!(model = %config.default_model, "Creating OpenAI LLM service");
                Ok(Box::new(OpenAiService::new(config)?))
            }
            "mock" => {
                tracing::info!("Creating mock LLM service");
                Ok(Box::new(MockLlmService::new()))
            }
            provider => Err(LlmError::Configuration(format!(
                "Unknown LLM provider: {}. Supported providers: openai, mock",
                provider
            ))),
        }
    }
}
