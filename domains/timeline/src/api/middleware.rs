//! Timeline domain state and auth backend integration

use crate::TimelineRepositories;
use axum::extract::FromRef;
use chronochem_auth::AuthBackend;

/// Application state for the Timeline domain
#[derive(Clone)]
pub struct TimelineState {
    pub repos: TimelineRepositories,
    pub auth: AuthBackend,
}

impl FromRef<TimelineState> for AuthBackend {
    fn from_ref(state: &TimelineState) -> Self {
        state.auth.clone()
    }
}
