//! Authentication error types.

use thiserror::Error;

use crate::db::RepositoryError;

/// Errors that can occur during authentication and account operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// No `Authorization` header on the request.
    #[error("missing authorization header")]
    MissingToken,

    /// `Authorization` header present but carries no token.
    #[error("invalid token format")]
    MalformedToken,

    /// No live user holds the presented token.
    #[error("invalid token")]
    InvalidToken,

    /// The presented token is past its expiry.
    #[error("token expired")]
    TokenExpired,

    /// Username is already registered.
    #[error("username already exists")]
    UsernameTaken,

    /// Wrong username or wrong password (deliberately indistinguishable).
    #[error("username or password is wrong")]
    InvalidCredentials,

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),

    /// Password hashing error.
    #[error("password hashing error")]
    PasswordHash,
}

impl From<sqlx::Error> for AuthError {
    fn from(err: sqlx::Error) -> Self {
        Self::Repository(RepositoryError::Database(err))
    }
}
