//! Caller identity for the ChronoChem API
//!
//! The backend has no authorization model: a request may carry a bearer JWT,
//! in which case its subject becomes the optional user id attached to chat
//! turns and feedback. Extractors work with any domain state implementing
//! `FromRef<S>` for `AuthBackend`.

mod backend;
mod claims;
mod config;
mod context;
mod error;
mod extractors;
mod jwt;

pub use backend::AuthBackend;
pub use claims::AccessTokenClaims;
pub use config::AuthConfig;
pub use context::AuthContext;
pub use error::AuthError;
pub use extractors::MaybeUser;
