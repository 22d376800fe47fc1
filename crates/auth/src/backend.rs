//! Concrete authentication backend
//!
//! Token verification only: there is no user table, the JWT subject is
//! trusted as the caller's id once the signature checks out.

use std::sync::Arc;

use uuid::Uuid;

use crate::config::AuthConfig;
use crate::context::AuthContext;
use crate::error::AuthError;

/// Authentication backend shared by all domain states.
///
/// Domain states expose this via `FromRef`:
/// ```ignore
/// impl FromRef<MyDomainState> for AuthBackend {
///     fn from_ref(state: &MyDomainState) -> Self {
///         state.auth.clone()
///     }
/// }
/// ```
#[derive(Debug, Clone, Default)]
pub struct AuthBackend {
    config: Option<Arc<AuthConfig>>,
}

impl AuthBackend {
    pub fn new(config: AuthConfig) -> Self {
        Self {
            config: Some(Arc::new(config)),
        }
    }

    /// Backend without a signing secret: every request is anonymous.
    pub fn disabled() -> Self {
        Self { config: None }
    }

    pub fn is_enabled(&self) -> bool {
        self.config.is_some()
    }

    /// Verify a bearer token and resolve the caller.
    ///
    /// Returns `Ok(None)` when verification is disabled.
    pub(crate) fn authenticate_jwt(&self, token: &str) -> Result<Option<AuthContext>, AuthError> {
        let Some(config) = &self.config else {
            tracing::debug!("JWT secret not configured, treating caller as anonymous");
            return Ok(None);
        };

        let claims = crate::jwt::validate_jwt_token(token, config)?;
        let user_id = Uuid::parse_str(&claims.sub).map_err(|_| AuthError::InvalidUserId)?;

        Ok(Some(AuthContext::new(user_id, claims.email)))
    }
}
