//! Repository Module
//!
//! CRUD operations as free functions over the SQLite pool. Handlers convert
//! [`RepoError`] into HTTP-facing errors; repositories never touch axum
//! types.

pub mod attendance;
pub mod member;
pub mod payment;
pub mod price_list;
pub mod user;

use thiserror::Error;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Duplicate(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<sqlx::Error> for RepoError {
    fn from(err: sqlx::Error) -> Self {
        if let Some(db_err) = err.as_database_error()
            && db_err.is_unique_violation()
        {
            return RepoError::Duplicate(db_err.to_string());
        }
        RepoError::Database(err.to_string())
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;
