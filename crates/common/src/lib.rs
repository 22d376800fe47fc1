//! Shared utilities, configuration, and error handling for ChronoChem
//!
//! This crate provides common functionality used across the ChronoChem backend:
//! - Configuration management following 12-factor principles
//! - Error types and their HTTP mapping
//! - Request extractors (validated JSON, pagination)
//! - Helpers for partial-update payloads

pub mod config;
pub mod db;
pub mod error;
pub mod extractors;
pub mod patch;

pub use db::RepositoryError;
pub use error::{Error, Result};
pub use extractors::{Pagination, ValidatedJson};
pub use patch::double_option;
