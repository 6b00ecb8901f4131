//! HTTP middleware and extractors.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (capture errors, added in `main`)
//! 2. `TraceLayer` (request span with `request_id` and `user_id` fields)
//! 3. Request ID (fill `request_id`, echo `x-request-id`)
//! 4. CORS (only when `ROLODEX_CORS_ALLOW_ANY` is set)
//!
//! Authentication is not a layer: handlers that need a user take the
//! [`RequireUser`] extractor.

pub mod auth;
pub mod request_id;

pub use auth::RequireUser;
pub use request_id::{REQUEST_ID_HEADER, request_id_middleware};
