//! API configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `ROLODEX_DATABASE_URL` - `PostgreSQL` connection string (falls back to `DATABASE_URL`)
//!
//! ## Optional
//! - `ROLODEX_HOST` - Bind address (default: 127.0.0.1)
//! - `ROLODEX_PORT` - Listen port (default: 3000)
//! - `ROLODEX_TOKEN_TTL_DAYS` - Session token lifetime in days (default: 30)
//! - `ROLODEX_DB_MAX_CONNECTIONS` - Pool size upper bound (default: 10)
//! - `ROLODEX_DB_MIN_CONNECTIONS` - Idle connections kept open (default: 2)
//! - `ROLODEX_DB_ACQUIRE_TIMEOUT_SECS` - Wait for a pooled connection (default: 10)
//! - `ROLODEX_DB_IDLE_TIMEOUT_SECS` - Close idle connections after (default: 600)
//! - `ROLODEX_DB_MAX_LIFETIME_SECS` - Recycle connections after (default: 1800)
//! - `ROLODEX_CORS_ALLOW_ANY` - Allow any origin (default: false)
//! - `ROLODEX_LOG_FORMAT` - `json` for structured logs, anything else for text
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Error sample rate (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Transaction sample rate (default: 0.0)

use std::fmt::Display;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;
use std::time::Duration;

use secrecy::SecretString;
use thiserror::Error;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// API server configuration.
///
/// Implements `Debug` manually to redact the database URL.
#[derive(Clone)]
pub struct ApiConfig {
    /// `PostgreSQL` database connection URL (contains password)
    pub database_url: SecretString,
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// How long an issued session token stays valid, in days
    pub token_ttl_days: u32,
    /// Connection pool tuning
    pub pool: PoolConfig,
    /// Attach a permissive CORS layer
    pub cors_allow_any: bool,
    /// Emit JSON logs instead of human-readable text
    pub log_json: bool,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
    /// Fraction of errors sent to Sentry
    pub sentry_sample_rate: f32,
    /// Fraction of transactions sent to Sentry
    pub sentry_traces_sample_rate: f32,
}

/// Database connection pool bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolConfig {
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout: Duration,
    pub idle_timeout: Duration,
    pub max_lifetime: Duration,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            max_connections: 10,
            min_connections: 2,
            acquire_timeout: Duration::from_secs(10),
            idle_timeout: Duration::from_secs(600),
            max_lifetime: Duration::from_secs(1800),
        }
    }
}

impl std::fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiConfig")
            .field("database_url", &"[REDACTED]")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("token_ttl_days", &self.token_ttl_days)
            .field("pool", &self.pool)
            .field("cors_allow_any", &self.cors_allow_any)
            .field("log_json", &self.log_json)
            .field("sentry_dsn", &self.sentry_dsn.as_ref().map(|_| "[REDACTED]"))
            .field("sentry_environment", &self.sentry_environment)
            .field("sentry_sample_rate", &self.sentry_sample_rate)
            .field("sentry_traces_sample_rate", &self.sentry_traces_sample_rate)
            .finish()
    }
}

impl ApiConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the database URL is missing or any variable
    /// fails to parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let database_url = get_database_url("ROLODEX_DATABASE_URL")?;
        let host = parse_env("ROLODEX_HOST", "127.0.0.1")?;
        let port = parse_env("ROLODEX_PORT", "3000")?;

        let token_ttl_days: u32 = parse_env("ROLODEX_TOKEN_TTL_DAYS", "30")?;
        validate_token_ttl(token_ttl_days)?;

        let pool = PoolConfig {
            max_connections: parse_env("ROLODEX_DB_MAX_CONNECTIONS", "10")?,
            min_connections: parse_env("ROLODEX_DB_MIN_CONNECTIONS", "2")?,
            acquire_timeout: Duration::from_secs(parse_env(
                "ROLODEX_DB_ACQUIRE_TIMEOUT_SECS",
                "10",
            )?),
            idle_timeout: Duration::from_secs(parse_env("ROLODEX_DB_IDLE_TIMEOUT_SECS", "600")?),
            max_lifetime: Duration::from_secs(parse_env("ROLODEX_DB_MAX_LIFETIME_SECS", "1800")?),
        };
        validate_pool(&pool)?;

        let cors_allow_any = parse_env("ROLODEX_CORS_ALLOW_ANY", "false")?;
        let log_json = get_optional_env("ROLODEX_LOG_FORMAT")
            .is_some_and(|format| format.eq_ignore_ascii_case("json"));

        Ok(Self {
            database_url,
            host,
            port,
            token_ttl_days,
            pool,
            cors_allow_any,
            log_json,
            sentry_dsn: get_optional_env("SENTRY_DSN"),
            sentry_environment: get_optional_env("SENTRY_ENVIRONMENT"),
            sentry_sample_rate: parse_env("SENTRY_SAMPLE_RATE", "1.0")?,
            sentry_traces_sample_rate: parse_env("SENTRY_TRACES_SAMPLE_RATE", "0.0")?,
        })
    }

    /// Configuration for tests and tools that build the router directly.
    #[must_use]
    pub fn for_database(database_url: impl Into<String>) -> Self {
        Self {
            database_url: SecretString::from(database_url.into()),
            host: IpAddr::from([127, 0, 0, 1]),
            port: 3000,
            token_ttl_days: 30,
            pool: PoolConfig::default(),
            cors_allow_any: false,
            log_json: false,
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 1.0,
            sentry_traces_sample_rate: 0.0,
        }
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get database URL with fallback to generic `DATABASE_URL`.
fn get_database_url(primary_key: &str) -> Result<SecretString, ConfigError> {
    if let Ok(value) = std::env::var(primary_key) {
        return Ok(SecretString::from(value));
    }
    if let Ok(value) = std::env::var("DATABASE_URL") {
        return Ok(SecretString::from(value));
    }
    Err(ConfigError::MissingEnvVar(primary_key.to_string()))
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Read and parse an environment variable, using `default` when unset.
fn parse_env<T>(key: &str, default: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: Display,
{
    parse_value(key, &get_env_or_default(key, default))
}

fn parse_value<T>(key: &str, raw: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: Display,
{
    raw.trim()
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

fn validate_token_ttl(days: u32) -> Result<(), ConfigError> {
    if days == 0 {
        return Err(ConfigError::InvalidEnvVar(
            "ROLODEX_TOKEN_TTL_DAYS".to_string(),
            "must be at least 1".to_string(),
        ));
    }
    Ok(())
}

fn validate_pool(pool: &PoolConfig) -> Result<(), ConfigError> {
    if pool.max_connections == 0 {
        return Err(ConfigError::InvalidEnvVar(
            "ROLODEX_DB_MAX_CONNECTIONS".to_string(),
            "must be at least 1".to_string(),
        ));
    }
    if pool.min_connections > pool.max_connections {
        return Err(ConfigError::InvalidEnvVar(
            "ROLODEX_DB_MIN_CONNECTIONS".to_string(),
            format!(
                "must not exceed ROLODEX_DB_MAX_CONNECTIONS ({})",
                pool.max_connections
            ),
        ));
    }
    Ok(())
}
