//! Database operations for the Rolodex `PostgreSQL` store.
//!
//! ## Tables
//!
//! - `users` - Accounts and their current session token
//! - `contacts` - Contacts owned by a user
//! - `addresses` - Addresses attached to a contact
//!
//! Every table carries a `deleted_at` timestamp. Rows are soft-deleted and all
//! reads filter on `deleted_at IS NULL`.
//!
//! Repository functions take a `&mut PgConnection` so services can run several
//! of them inside one transaction (`&mut *tx`).
//!
//! # Migrations
//!
//! Migrations are stored in `crates/api/migrations/` and run via:
//! ```bash
//! cargo run -p rolodex-cli -- migrate
//! ```

pub mod addresses;
pub mod contacts;
pub mod users;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::migrate::Migrator;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

use crate::config::{ApiConfig, PoolConfig};

/// Embedded schema migrations.
pub static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., unique username).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

impl RepositoryError {
    /// Map a unique-constraint violation to `Conflict`, anything else to `Database`.
    pub(crate) fn from_unique_violation(e: sqlx::Error, message: &str) -> Self {
        if let sqlx::Error::Database(ref db_err) = e
            && db_err.is_unique_violation()
        {
            return Self::Conflict(message.to_owned());
        }
        Self::Database(e)
    }
}

/// Create a `PostgreSQL` connection pool using the configured bounds.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(config: &ApiConfig) -> Result<PgPool, sqlx::Error> {
    pool_options(&config.pool)
        .connect(config.database_url.expose_secret())
        .await
}

/// Create a pool that only connects when a query first needs a connection.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection URL cannot be parsed.
pub fn create_lazy_pool(config: &ApiConfig) -> Result<PgPool, sqlx::Error> {
    pool_options(&config.pool).connect_lazy(config.database_url.expose_secret())
}

fn pool_options(pool: &PoolConfig) -> PgPoolOptions {
    PgPoolOptions::new()
        .max_connections(pool.max_connections)
        .min_connections(pool.min_connections)
        .acquire_timeout(pool.acquire_timeout)
        .idle_timeout(pool.idle_timeout)
        .max_lifetime(pool.max_lifetime)
}

/// Escape `LIKE` wildcards so user input matches literally, then wrap it for a
/// substring match.
pub(crate) fn contains_pattern(input: &str) -> String {
    let mut pattern = String::with_capacity(input.len() + 2);
    pattern.push('%');
    for c in input.chars() {
        if matches!(c, '\\' | '%' | '_') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}
