//! Authentication error types.

use thiserror::Error;

use crate::api::ApiError;
use crate::storage::StorageError;

/// Errors that can occur during login, registration and session checks.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Invalid email format.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] newtab_core::EmailError),

    /// Invalid credentials (wrong password or user not found).
    #[error("invalid credentials")]
    InvalidCredentials,

    /// User already exists.
    #[error("user already exists")]
    UserAlreadyExists,

    /// The backend accepted the credentials but issued an empty token.
    #[error("backend issued an empty session token")]
    EmptyToken,

    /// Backend API error.
    #[error("api error: {0}")]
    Api(#[from] ApiError),

    /// Client storage error.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}
