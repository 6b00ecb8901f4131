//! User domain types and request/response bodies.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use rolodex_core::UserId;

use super::empty_as_none;

/// A registered account.
///
/// Implements `Debug` manually to redact the password hash and token.
#[derive(Clone)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub password_hash: String,
    pub name: String,
    /// Current session token; `None` once logged out.
    pub token: Option<String>,
    /// Token expiry in epoch milliseconds; 0 once logged out.
    pub token_exp: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl std::fmt::Debug for User {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("User")
            .field("id", &self.id)
            .field("username", &self.username)
            .field("password_hash", &"[REDACTED]")
            .field("name", &self.name)
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .field("token_exp", &self.token_exp)
            .field("created_at", &self.created_at)
            .field("updated_at", &self.updated_at)
            .finish()
    }
}

/// Body of `POST /api/users/register`.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RegisterUser {
    #[validate(length(min = 3, max = 100, message = "must be between 3 and 100 characters"))]
    pub username: String,
    #[validate(length(min = 3, max = 100, message = "must be between 3 and 100 characters"))]
    pub password: String,
    #[validate(length(min = 3, max = 100, message = "must be between 3 and 100 characters"))]
    pub name: String,
}

/// Body of `POST /api/users/login`.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LoginUser {
    #[validate(length(min = 3, max = 100, message = "must be between 3 and 100 characters"))]
    pub username: String,
    #[validate(length(min = 3, max = 100, message = "must be between 3 and 100 characters"))]
    pub password: String,
}

/// Body of `PATCH /api/users/current`. Empty or omitted fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateUser {
    #[serde(default, deserialize_with = "empty_as_none")]
    #[validate(length(min = 3, max = 100, message = "must be between 3 and 100 characters"))]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    #[validate(length(min = 3, max = 100, message = "must be between 3 and 100 characters"))]
    pub password: Option<String>,
}

/// A freshly issued session token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenResponse {
    pub token: String,
    pub token_exp: i64,
}

/// Public profile of the current user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserResponse {
    pub username: String,
    pub name: String,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            username: user.username.clone(),
            name: user.name.clone(),
        }
    }
}
