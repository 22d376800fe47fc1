//! Shared database types for ChronoChem
//!
//! Repositories return `sqlx::Error` through `?`; writes that can trip a
//! constraint go through [`RepositoryError::from_write`] so that bad input
//! surfaces as a 4xx instead of a generic database failure.

use crate::error::Error;
use thiserror::Error;

/// Postgres SQLSTATE codes we translate explicitly
const FOREIGN_KEY_VIOLATION: &str = "23503";
const UNIQUE_VIOLATION: &str = "23505";
const CHECK_VIOLATION: &str = "23514";

/// Database-specific error types
#[derive(Error, Debug)]
pub enum RepositoryError {
    #[error("Record not found")]
    NotFound,

    #[error("Record already exists")]
    AlreadyExists,

    #[error("Referenced record does not exist: {0}")]
    MissingReference(String),

    #[error("Database connection error: {0}")]
    Connection(#[from] sqlx::Error),

    #[error("Invalid data: {0}")]
    InvalidData(String),
}

impl RepositoryError {
    /// Classify an error raised by an INSERT/UPDATE by its SQLSTATE
    pub fn from_write(err: sqlx::Error) -> Self {
        let Some(db_err) = err.as_database_error() else {
            return RepositoryError::Connection(err);
        };

        let constraint = db_err.constraint().unwrap_or("unknown").to_string();
        match db_err.code().as_deref() {
            Some(FOREIGN_KEY_VIOLATION) => RepositoryError::MissingReference(constraint),
            Some(UNIQUE_VIOLATION) => RepositoryError::AlreadyExists,
            Some(CHECK_VIOLATION) => {
                RepositoryError::InvalidData(format!("constraint {} violated", constraint))
            }
            _ => RepositoryError::Connection(err),
        }
    }
}

impl From<RepositoryError> for Error {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound => Error::NotFound("Record not found".to_string()),
            RepositoryError::AlreadyExists => Error::Conflict("Record already exists".to_string()),
            RepositoryError::MissingReference(constraint) => Error::Validation(format!(
                "Referenced record does not exist ({})",
                constraint
            )),
            RepositoryError::Connection(e) => Error::Database(e),
            RepositoryError::InvalidData(msg) => Error::Validation(msg),
        }
    }
}
