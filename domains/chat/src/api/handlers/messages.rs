//! Chat message API handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use chronochem_auth::MaybeUser;
use chronochem_common::{Result, ValidatedJson};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::api::middleware::ChatState;
use crate::domain::entities::{ChatMessage, ChatRole};
use crate::domain::service::ChatExchange;

/// Request for sending a message to a chemist.
///
/// Missing, null and blank text are all rejected by the turn service, so the
/// error message is the same for each. `Validate` carries no rules here; it
/// only satisfies [`ValidatedJson`].
#[derive(Debug, Deserialize, Validate)]
pub struct SendMessageRequest {
    #[serde(default, alias = "content")]
    pub message: Option<String>,
}

impl SendMessageRequest {
    pub fn text(&self) -> &str {
        self.message.as_deref().unwrap_or_default()
    }
}

/// `{"status": "success", "data": ...}` wrapper used by chat endpoints
#[derive(Debug, Serialize)]
pub struct Envelope<T> {
    pub status: &'static str,
    pub data: T,
}

impl<T> Envelope<T> {
    pub fn success(data: T) -> Self {
        Self {
            status: "success",
            data,
        }
    }
}

/// Chat turn as returned to clients; timestamp in epoch milliseconds
#[derive(Debug, Serialize)]
pub struct ChatMessageResponse {
    pub role: ChatRole,
    pub content: String,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub timestamp: DateTime<Utc>,
}

impl From<ChatMessage> for ChatMessageResponse {
    fn from(m: ChatMessage) -> Self {
        Self {
            role: m.role,
            content: m.content,
            timestamp: m.timestamp,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ExchangeResponse {
    pub user_message: ChatMessageResponse,
    pub assistant_message: ChatMessageResponse,
}

impl From<ChatExchange> for ExchangeResponse {
    fn from(e: ChatExchange) -> Self {
        Self {
            user_message: e.user_message.into(),
            assistant_message: e.assistant_message.into(),
        }
    }
}

/// Send a message and receive the chemist's reply
pub async fn send_message(
    user: MaybeUser,
    State(state): State<ChatState>,
    Path(chemist_id): Path<Uuid>,
    ValidatedJson(req): ValidatedJson<SendMessageRequest>,
) -> Result<(StatusCode, Json<Envelope<ExchangeResponse>>)> {
    let exchange = state
        .service
        .submit_message(chemist_id, req.text(), user.user_id())
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(Envelope::success(exchange.into())),
    ))
}

/// List a chemist's transcript, oldest first
pub async fn list_messages(
    State(state): State<ChatState>,
    Path(chemist_id): Path<Uuid>,
) -> Result<Json<Envelope<Vec<ChatMessageResponse>>>> {
    let messages = state.service.history(chemist_id).await?;
    Ok(Json(Envelope::success(
        messages.into_iter().map(Into::into).collect(),
    )))
}

/// Delete a chemist's transcript
pub async fn clear_messages(
    State(state): State<ChatState>,
    Path(chemist_id): Path<Uuid>,
) -> Result<StatusCode> {
    state.service.clear_history(chemist_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
