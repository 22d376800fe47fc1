//! Mock LLM Service Implementation
//!
//! Used by `LlmServiceFactory` when provider is `"mock"` and by the chat
//! domain tests. Records every request so tests can inspect the composed
//! message list.

use std::sync::{Arc, Mutex};

use crate::{CompletionRequest, CompletionResponse, LlmError, LlmService};

const MOCK_MODEL: &str = "mock-model";

#[derive(Debug, Clone)]
enum Behavior {
    /// Echo the last message back
    Echo,
    /// Always answer with the given text
    Reply(String),
    /// Always fail with a response error carrying this detail
    Fail(String),
}

/// Mock LLM service for testing
#[derive(Debug, Clone)]
pub struct MockLlmService {
    behavior: Behavior,
    requests: Arc<Mutex<Vec<CompletionRequest>>>,
}

impl MockLlmService {
    /// Create a mock that echoes the last message
    pub fn new() -> Self {
        Self {
            behavior: Behavior::Echo,
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Create a mock that always answers with `reply`
    pub fn with_reply(reply: impl Into<String>) -> Self {
        Self {
            behavior: Behavior::Reply(reply.into()),
            ..Self::new()
        }
    }

    /// Create a mock whose every call fails
    pub fn failing(detail: impl Into<String>) -> Self {
        Self {
            behavior: Behavior::Fail(detail.into()),
            ..Self::new()
        }
    }

    /// Requests received so far, oldest first
    pub fn recorded_requests(&self) -> Vec<CompletionRequest> {
        self.requests
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }

    /// Number of completion calls made
    pub fn call_count(&self) -> usize {
        self.requests.lock().map(|guard| guard.len()).unwrap_or(0)
    }
}

impl Default for MockLlmService {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl LlmService for MockLlmService {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError> {
        tracing::info!(
            messages = request.messages.len(),
            "Mock LLM service processing completion request"
        );

        let model = if request.model.is_empty() {
            MOCK_MODEL.to_string()
        } else {
            request.model.clone()
        };

        let last_message = request
            .messages
            .last()
            .map(|m| m.content.clone())
            .unwrap_or_else(|| "empty".to_string());

        if let Ok(mut guard) = self.requests.lock() {
            guard.push(request);
        }

        let content = match &self.behavior {
            Behavior::Echo => format!("Mock response to: {}", last_message),
            Behavior::Reply(text) => text.clone(),
            Behavior::Fail(detail) => return Err(LlmError::Response(detail.clone())),
        };

        Ok(CompletionResponse {
            content,
            model,
            input_tokens: None,
            output_tokens: None,
            finish_reason: Some("stop".to_string()),
        })
    }

    fn default_model(&self) -> &str {
        MOCK_MODEL
    }
}
