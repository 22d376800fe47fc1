//! Chat domain state and auth backend integration

use std::sync::Arc;

use axum::extract::FromRef;
use chronochem_auth::AuthBackend;

use crate::ChatTurnService;

/// Application state for the Chat domain
#[derive(Clone)]
pub struct ChatState {
    pub service: Arc<ChatTurnService>,
    pub auth: AuthBackend,
}

impl FromRef<ChatState> for AuthBackend {
    fn from_ref(state: &ChatState) -> Self {
        state.auth.clone()
    }
}
