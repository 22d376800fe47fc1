//! Route definitions for Chat domain API

use axum::{routing::get, Router};

use super::handlers::messages;
use super::middleware::ChatState;

/// Create all Chat domain API routes
pub fn routes() -> Router<ChatState> {
    Router::new().route(
        "/v1/chemists/{id}/messages",
        get(messages::list_messages)
            .post(messages::send_message)
            .delete(messages::clear_messages),
    )
}
