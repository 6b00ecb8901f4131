//! Account service: registration, login, bearer-token sessions and profile updates.
//!
//! Passwords are hashed with Argon2id. Session tokens are 32 random bytes,
//! hex-encoded, stored on the user row with an expiry in epoch milliseconds.
//! A user holds at most one token; logging in again replaces it.

mod error;

pub use error::AuthError;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use chrono::Utc;
use rand::Rng;
use sqlx::PgPool;
use validator::Validate;

use crate::db::{RepositoryError, users};
use crate::error::{Result, clear_sentry_user};
use crate::models::{LoginUser, RegisterUser, TokenResponse, UpdateUser, User, UserResponse};

const MILLIS_PER_DAY: i64 = 24 * 60 * 60 * 1000;

/// Account service.
///
/// Every method that touches the database runs in its own transaction.
pub struct UserService<'a> {
    pool: &'a PgPool,
    token_ttl_days: u32,
}

impl<'a> UserService<'a> {
    /// Create a new account service.
    #[must_use]
    pub const fn new(pool: &'a PgPool, token_ttl_days: u32) -> Self {
        Self {
            pool,
            token_ttl_days,
        }
    }

    /// Register a new user and issue their first session token.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Validation` if a field is out of bounds.
    /// Returns `AuthError::UsernameTaken` if the username is already registered.
    pub async fn register(&self, request: RegisterUser) -> Result<TokenResponse> {
        request.validate()?;

        let mut tx = self.pool.begin().await?;

        if users::count_by_username(&mut *tx, &request.username).await? > 0 {
            return Err(AuthError::UsernameTaken.into());
        }

        let password_hash = hash_password(&request.password)?;
        let token = generate_token();
        let token_exp = token_expiry(now_millis(), self.token_ttl_days);

        let user = users::create(
            &mut *tx,
            users::NewUser {
                username: &request.username,
                password_hash: &password_hash,
                name: &request.name,
                token: Some(&token),
                token_exp,
            },
        )
        .await
        .map_err(|e| match e {
            RepositoryError::Conflict(_) => AuthError::UsernameTaken,
            other => AuthError::Repository(other),
        })?;

        tx.commit().await?;

        tracing::info!(user_id = %user.id, "User registered");
        Ok(TokenResponse { token, token_exp })
    }

    /// Verify credentials and issue a fresh session token.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Validation` if a field is out of bounds.
    /// Returns `AuthError::InvalidCredentials` for an unknown username or a wrong password.
    pub async fn login(&self, request: LoginUser) -> Result<TokenResponse> {
        request.validate()?;

        let mut tx = self.pool.begin().await?;

        let user = users::find_by_username(&mut *tx, &request.username)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        verify_password(&request.password, &user.password_hash)?;

        let token = generate_token();
        let token_exp = token_expiry(now_millis(), self.token_ttl_days);

        users::set_token(&mut *tx, user.id, &token, token_exp).await?;
        tx.commit().await?;

        tracing::info!(user_id = %user.id, "User logged in");
        Ok(TokenResponse { token, token_exp })
    }

    /// Resolve a raw `Authorization` header value to a logged-in user.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::MissingToken`, `MalformedToken`, `InvalidToken` or
    /// `TokenExpired` when the request is not authenticated.
    pub async fn authenticate(&self, header: Option<&str>) -> std::result::Result<User, AuthError> {
        let token = extract_token(header)?;

        let mut tx = self.pool.begin().await?;

        let user = users::find_by_token(&mut *tx, token)
            .await?
            .ok_or(AuthError::InvalidToken)?;

        if is_expired(user.token_exp, now_millis()) {
            return Err(AuthError::TokenExpired);
        }

        tx.commit().await?;
        Ok(user)
    }

    /// Public profile of the current user.
    #[must_use]
    pub fn current(&self, user: &User) -> UserResponse {
        UserResponse::from(user)
    }

    /// Invalidate the session token `user` was authenticated with.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Database` if the update fails.
    pub async fn logout(&self, user: User) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        if let Some(token) = user.token.as_deref() {
            users::clear_token(&mut *tx, user.id, token).await?;
        }

        tx.commit().await?;

        clear_sentry_user();
        tracing::info!(user_id = %user.id, "User logged out");
        Ok(())
    }

    /// Change the current user's name and/or password.
    ///
    /// Only the profile columns are written, so a login or logout that lands
    /// between authentication and this call keeps its token.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Validation` if a present field is out of bounds.
    pub async fn update(&self, user: User, request: UpdateUser) -> Result<UserResponse> {
        request.validate()?;

        let password_hash = request
            .password
            .as_deref()
            .map(hash_password)
            .transpose()?;

        let mut tx = self.pool.begin().await?;
        let user = users::update_profile(
            &mut *tx,
            user.id,
            request.name.as_deref(),
            password_hash.as_deref(),
        )
        .await?;
        tx.commit().await?;

        tracing::info!(user_id = %user.id, "User updated");
        Ok(UserResponse::from(&user))
    }
}

/// Pull the token out of an `Authorization` header value.
///
/// A leading `Bearer ` is stripped; any other value is used verbatim.
///
/// # Errors
///
/// Returns `AuthError::MissingToken` for no header and
/// `AuthError::MalformedToken` for an empty token.
pub fn extract_token(header: Option<&str>) -> std::result::Result<&str, AuthError> {
    let header = header.ok_or(AuthError::MissingToken)?;
    let token = header.strip_prefix("Bearer ").unwrap_or(header);

    if token.is_empty() {
        return Err(AuthError::MalformedToken);
    }
    Ok(token)
}

/// Generate a 256-bit random session token, hex-encoded.
#[must_use]
pub fn generate_token() -> String {
    let bytes: [u8; 32] = rand::rng().random();
    hex::encode(bytes)
}

/// Expiry timestamp `ttl_days` after `now_millis`.
#[must_use]
pub fn token_expiry(now_millis: i64, ttl_days: u32) -> i64 {
    now_millis.saturating_add(i64::from(ttl_days).saturating_mul(MILLIS_PER_DAY))
}

/// Whether a token expiring at `token_exp` is no longer valid at `now_millis`.
#[must_use]
pub const fn is_expired(token_exp: i64, now_millis: i64) -> bool {
    token_exp < now_millis
}

fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// Hash a password using Argon2id.
///
/// # Errors
///
/// Returns `AuthError::PasswordHash` if hashing fails.
pub fn hash_password(password: &str) -> std::result::Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthError::PasswordHash)
}

/// Verify a password against a hash.
fn verify_password(password: &str, hash: &str) -> std::result::Result<(), AuthError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| AuthError::InvalidCredentials)?;
    let argon2 = Argon2::default();

    argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AuthError::InvalidCredentials)
}
