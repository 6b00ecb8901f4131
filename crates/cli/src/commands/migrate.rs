//! Database migration command.
//!
//! # Usage
//!
//! ```bash
//! rolodex migrate
//! ```
//!
//! # Environment Variables
//!
//! - `ROLODEX_DATABASE_URL` - `PostgreSQL` connection string (falls back to `DATABASE_URL`)
//!
//! # Migration Files
//!
//! Migrations live in `crates/api/migrations/` and are embedded into the
//! binary at compile time.

use secrecy::ExposeSecret;
use sqlx::PgPool;
use thiserror::Error;

use rolodex_api::config::{ApiConfig, ConfigError};
use rolodex_api::db::MIGRATOR;

/// Errors that can occur while migrating.
#[derive(Debug, Error)]
pub enum MigrationError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

/// Apply every pending migration.
///
/// # Errors
///
/// Returns `MigrationError` if the database is unreachable or a migration fails.
pub async fn run() -> Result<(), MigrationError> {
    let config = ApiConfig::from_env()?;

    tracing::info!("Connecting to database...");
    let pool = PgPool::connect(config.database_url.expose_secret()).await?;

    tracing::info!("Running migrations...");
    MIGRATOR.run(&pool).await?;

    tracing::info!("Migrations complete!");
    Ok(())
}
