//! Axum extractors for authentication
//!
//! Generic over any state `S` where `AuthBackend: FromRef<S>`.
//! This is axum's idiomatic nested-state pattern.

use axum::{
    extract::{FromRef, FromRequestParts},
    http::{header::AUTHORIZATION, request::Parts},
};

use crate::backend::AuthBackend;
use crate::context::AuthContext;
use crate::error::AuthError;
use crate::jwt::extract_bearer_token;

/// Optional caller identity.
///
/// - no `Authorization` header → `MaybeUser(None)`
/// - valid bearer JWT → `MaybeUser(Some(ctx))`
/// - malformed header or bad token → 401
#[derive(Debug)]
pub struct MaybeUser(pub Option<AuthContext>);

impl MaybeUser {
    pub fn user_id(&self) -> Option<uuid::Uuid> {
        self.0.as_ref().map(|ctx| ctx.user_id)
    }
}

impl<S> FromRequestParts<S> for MaybeUser
where
    AuthBackend: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &S,
    ) -> std::result::Result<Self, Self::Rejection> {
        let Some(auth_header) = parts.headers.get(AUTHORIZATION) else {
            return Ok(MaybeUser(None));
        };

        let backend = AuthBackend::from_ref(state);
        let token = extract_bearer_token(auth_header)?;
        let auth_context = backend.authenticate_jwt(&token)?;

        Ok(MaybeUser(auth_context))
    }
}
