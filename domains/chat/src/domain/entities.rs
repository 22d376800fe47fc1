//! Domain entities for the Chat domain

use chrono::{DateTime, Duration, SubsecRound, Utc};
use chronochem_llm::LlmMessage;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Speaker of a chat turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "chat_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

impl std::fmt::Display for ChatRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChatRole::User => write!(f, "user"),
            ChatRole::Assistant => write!(f, "assistant"),
        }
    }
}

/// One persisted turn of a chemist's transcript.
///
/// Timestamps carry millisecond precision so the value stored, the value
/// returned over HTTP and the value used for ordering are identical.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct ChatMessage {
    pub id: Uuid,
    pub chemist_id: Uuid,
    pub role: ChatRole,
    pub content: String,
    pub timestamp: DateTime<Utc>,
    pub user_id: Option<Uuid>,
}

impl ChatMessage {
    /// User turn stamped no earlier than 1ms after `after`
    pub fn user(
        chemist_id: Uuid,
        content: String,
        user_id: Option<Uuid>,
        after: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            chemist_id,
            role: ChatRole::User,
            content,
            timestamp: next_timestamp(after),
            user_id,
        }
    }

    /// Assistant reply, always stamped strictly after the turn it answers
    pub fn assistant_reply(reply_to: &ChatMessage, content: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            chemist_id: reply_to.chemist_id,
            role: ChatRole::Assistant,
            content,
            timestamp: next_timestamp(Some(reply_to.timestamp)),
            user_id: reply_to.user_id,
        }
    }

    pub fn to_llm_message(&self) -> LlmMessage {
        match self.role {
            ChatRole::User => LlmMessage::user(self.content.clone()),
            ChatRole::Assistant => LlmMessage::assistant(self.content.clone()),
        }
    }
}

/// Current time at millisecond precision, bumped past `after` if needed
pub(crate) fn next_timestamp(after: Option<DateTime<Utc>>) -> DateTime<Utc> {
    let now = Utc::now().trunc_subsecs(3);
    match after {
        Some(prev) if now <= prev => prev + Duration::milliseconds(1),
        _ => now,
    }
}
