//! User management commands.
//!
//! # Usage
//!
//! ```bash
//! # Create a user without a session token (they log in normally afterwards)
//! ROLODEX_USER_PASSWORD='...' rolodex user create -u alice -n "Alice Doe"
//! ```
//!
//! # Environment Variables
//!
//! - `ROLODEX_DATABASE_URL` - `PostgreSQL` connection string
//! - `ROLODEX_USER_PASSWORD` - Password for the new user (kept off the command line)

use secrecy::{ExposeSecret, SecretString};
use sqlx::PgPool;
use thiserror::Error;
use validator::Validate;

use rolodex_api::config::{ApiConfig, ConfigError};
use rolodex_api::db::{RepositoryError, users};
use rolodex_api::models::RegisterUser;
use rolodex_api::services::auth::{AuthError, hash_password};

const PASSWORD_ENV: &str = "ROLODEX_USER_PASSWORD";

/// Errors that can occur during user operations.
#[derive(Debug, Error)]
pub enum UserError {
    /// Required environment variable is missing.
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Database connection error.
    #[error("Database connection error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),

    #[error("Invalid user: {0}")]
    Invalid(#[from] validator::ValidationErrors),

    #[error("Password hashing failed: {0}")]
    Hash(#[from] AuthError),

    /// User already exists.
    #[error("User already exists with username: {0}")]
    UserExists(String),
}

/// Create a new user.
///
/// # Returns
///
/// The ID of the created user.
///
/// # Errors
///
/// Returns `UserError` if the password is missing, a field is out of bounds,
/// the username is taken, or the database fails.
pub async fn create_user(username: &str, name: &str) -> Result<i64, UserError> {
    let config = ApiConfig::from_env()?;

    let password = std::env::var(PASSWORD_ENV)
        .map(SecretString::from)
        .map_err(|_| UserError::MissingEnvVar(PASSWORD_ENV))?;

    RegisterUser {
        username: username.to_owned(),
        password: password.expose_secret().to_owned(),
        name: name.to_owned(),
    }
    .validate()?;

    tracing::info!("Connecting to database...");
    let pool = PgPool::connect(config.database_url.expose_secret()).await?;
    let mut tx = pool.begin().await?;

    if users::count_by_username(&mut *tx, username).await? > 0 {
        return Err(UserError::UserExists(username.to_owned()));
    }

    let password_hash = hash_password(password.expose_secret())?;
    let user = users::create(
        &mut *tx,
        users::NewUser {
            username,
            password_hash: &password_hash,
            name,
            token: None,
            token_exp: 0,
        },
    )
    .await
    .map_err(|e| match e {
        RepositoryError::Conflict(_) => UserError::UserExists(username.to_owned()),
        other => UserError::Repository(other),
    })?;

    tx.commit().await?;

    tracing::info!(
        "User created successfully! ID: {}, Username: {}",
        user.id,
        user.username
    );

    Ok(user.id.as_i64())
}
