//! Application state shared across handlers.

use std::sync::Arc;

use sqlx::PgPool;

use crate::config::ApiConfig;
use crate::services::{AddressService, ContactService, UserService};

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources like database connections and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: ApiConfig,
    pool: PgPool,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(config: ApiConfig, pool: PgPool) -> Self {
        Self {
            inner: Arc::new(AppStateInner { config, pool }),
        }
    }

    /// Get a reference to the API configuration.
    #[must_use]
    pub fn config(&self) -> &ApiConfig {
        &self.inner.config
    }

    /// Get a reference to the database connection pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    /// Account service bound to this state's pool and token lifetime.
    #[must_use]
    pub fn users(&self) -> UserService<'_> {
        UserService::new(self.pool(), self.config().token_ttl_days)
    }

    #[must_use]
    pub fn contacts(&self) -> ContactService<'_> {
        ContactService::new(self.pool())
    }

    #[must_use]
    pub fn addresses(&self) -> AddressService<'_> {
        AddressService::new(self.pool())
    }
}
