//! Conversation turn handling
//!
//! One call to [`ChatTurnService::submit_message`] is one exchange: the user
//! turn is stored, the persona prompt and recent history are sent to the
//! completion service, and the reply (or a fixed apology when the completion
//! fails) is stored as the assistant turn.

use std::sync::Arc;

use chronochem_common::{config::DEFAULT_CHAT_HISTORY_LIMIT, Error, Result};
use chronochem_llm::{CompletionRequest, LlmConfig, LlmService};
use uuid::Uuid;

use super::entities::ChatMessage;
use super::prompt::{chronological, compose_messages};
use crate::repository::ChatStore;

/// Assistant turn stored when the completion call fails
pub const FALLBACK_REPLY: &str = "抱歉，我現在無法回應您的問題。請稍後再試。";

/// Longest accepted user message, in characters
pub const MAX_MESSAGE_LENGTH: usize = 1000;

/// Generation parameters and history window for chat turns
#[derive(Debug, Clone, PartialEq)]
pub struct ChatSettings {
    /// Prior turns sent with each new message
    pub history_limit: i64,
    /// Empty means the completion service's default model
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl Default for ChatSettings {
    fn default() -> Self {
        Self::from_llm_config(&LlmConfig::default(), DEFAULT_CHAT_HISTORY_LIMIT)
    }
}

impl ChatSettings {
    pub fn from_llm_config(config: &LlmConfig, history_limit: i64) -> Self {
        Self {
            history_limit,
            model: config.default_model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        }
    }
}

/// Both turns of one exchange
#[derive(Debug, Clone, PartialEq)]
pub struct ChatExchange {
    pub user_message: ChatMessage,
    pub assistant_message: ChatMessage,
}

/// Orchestrates chat turns over an injected store and completion service
#[derive(Clone)]
pub struct ChatTurnService {
    store: Arc<dyn ChatStore>,
    llm: Arc<dyn LlmService>,
    settings: ChatSettings,
}

impl ChatTurnService {
    pub fn new(store: Arc<dyn ChatStore>, llm: Arc<dyn LlmService>, settings: ChatSettings) -> Self {
        Self {
            store,
            llm,
            settings,
        }
    }

    pub fn settings(&self) -> &ChatSettings {
        &self.settings
    }

    /// Run one exchange with the chemist.
    ///
    /// Completion failures never surface as errors: the fallback reply is
    /// stored and returned instead. Concurrent calls for the same chemist are
    /// not serialized.
    pub async fn submit_message(
        &self,
        chemist_id: Uuid,
        text: &str,
        user_id: Option<Uuid>,
    ) -> Result<ChatExchange> {
        let content = validate_message(text)?;

        let persona = self
            .store
            .find_persona(chemist_id)
            .await?
            .ok_or_else(|| Error::not_found("Chemist"))?;

        let recent = self
            .store
            .recent_turns(chemist_id, self.settings.history_limit)
            .await?;
        let history = chronological(recent);

        let user_turn = ChatMessage::user(
            chemist_id,
            content.to_string(),
            user_id,
            history.last().map(|m| m.timestamp),
        );
        let user_turn = self.store.insert_turn(&user_turn).await?;

        let messages = compose_messages(&persona, &history, &user_turn.content);
        let request = CompletionRequest {
            model: self.settings.model.clone(),
            messages: messages.clone(),
            temperature: Some(self.settings.temperature),
            max_tokens: Some(self.settings.max_tokens),
        };

        tracing::info!(
            chemist_id = %chemist_id,
            chemist = %persona.name,
            history = history.len(),
            "Requesting persona reply"
        );

        let reply = match self.llm.complete(request).await {
            Ok(response) => match usable_reply(&response.content) {
                Some(text) => {
                    tracing::debug!(
                        chemist_id = %chemist_id,
                        model = %response.model,
                        finish_reason = ?response.finish_reason,
                        "Persona reply received"
                    );
                    text
                }
                None => {
                    tracing::error!(
                        chemist_id = %chemist_id,
                        model = %response.model,
                        messages = ?messages,
                        "Completion returned no usable text, storing fallback"
                    );
                    FALLBACK_REPLY.to_string()
                }
            },
            Err(e) => {
                tracing::error!(
                    chemist_id = %chemist_id,
                    error = %e,
                    messages = ?messages,
                    "Completion failed, storing fallback"
                );
                FALLBACK_REPLY.to_string()
            }
        };

        let assistant_turn = ChatMessage::assistant_reply(&user_turn, reply);
        let assistant_turn = self.store.insert_turn(&assistant_turn).await?;

        Ok(ChatExchange {
            user_message: user_turn,
            assistant_message: assistant_turn,
        })
    }

    /// Full transcript for a chemist, oldest first
    pub async fn history(&self, chemist_id: Uuid) -> Result<Vec<ChatMessage>> {
        self.ensure_chemist(chemist_id).await?;
        self.store.list_turns(chemist_id).await
    }

    /// Delete a chemist's transcript; returns the number of turns removed
    pub async fn clear_history(&self, chemist_id: Uuid) -> Result<u64> {
        self.ensure_chemist(chemist_id).await?;
        let removed = self.store.clear_turns(chemist_id).await?;
        tracing::info!(chemist_id = %chemist_id, removed, "Chat history cleared");
        Ok(removed)
    }

    async fn ensure_chemist(&self, chemist_id: Uuid) -> Result<()> {
        if self.store.chemist_exists(chemist_id).await? {
            Ok(())
        } else {
            Err(Error::not_found("Chemist"))
        }
    }
}

/// Trimmed message text, or a validation error
fn validate_message(text: &str) -> Result<&str> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(Error::Validation("content must not be empty".to_string()));
    }
    if trimmed.contains('\0') {
        return Err(Error::Validation(
            "content must not contain NUL characters".to_string(),
        ));
    }
    if trimmed.chars().count() > MAX_MESSAGE_LENGTH {
        return Err(Error::Validation(format!(
            "content must be at most {} characters",
            MAX_MESSAGE_LENGTH
        )));
    }
    Ok(trimmed)
}

/// Generated text with NUL characters removed; `None` when nothing is left
fn usable_reply(content: &str) -> Option<String> {
    let cleaned: String = content.chars().filter(|&c| c != '\0').collect();
    if cleaned.trim().is_empty() {
        None
    } else {
        Some(cleaned)
    }
}
