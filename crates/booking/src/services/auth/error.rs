//! Authentication error types.

use thiserror::Error;

use crate::db::RepositoryError;

/// Errors that can occur during authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Invalid email format.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] solara_core::EmailError),

    /// Invalid credentials (wrong password or client not found).
    #[error("invalid credentials")]
    InvalidCredentials,

    /// Client not found.
    #[error("client not found")]
    ClientNotFound,

    /// Client already exists.
    #[error("client already exists")]
    ClientAlreadyExists,

    /// Password too weak or invalid.
    #[error("password validation failed: {0}")]
    WeakPassword(String),

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),

    /// Password hashing error.
    #[error("password hashing error")]
    PasswordHash,
}
