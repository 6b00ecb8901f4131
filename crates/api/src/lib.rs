//! Rolodex API library.
//!
//! A contact-management REST backend: users register and log in to receive a
//! bearer token, then manage their own contacts and each contact's addresses.
//! Layered as route handler → service → repository → `PostgreSQL`.
//!
//! The binary in `main.rs` adds Sentry and serves [`app`]; tests drive the same
//! service in-process.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod extractors;
pub mod middleware;
pub mod models;
pub mod response;
pub mod routes;
pub mod services;
pub mod state;

use axum::{Router, http::Request};
use tower::Layer;
use tower_http::cors::CorsLayer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};
use tower_http::trace::{DefaultOnResponse, OnResponse, TraceLayer};
use tracing::Span;

use crate::middleware::request_id_middleware;
use crate::state::AppState;

/// Build the router with tracing, request-id and optional CORS layers.
pub fn router(state: AppState) -> Router {
    let mut router = Router::new().merge(routes::routes());
    if state.config().cors_allow_any {
        router = router.layer(CorsLayer::permissive());
    }

    router
        .layer(axum::middleware::from_fn(request_id_middleware))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        uri = %request.uri(),
                        request_id = tracing::field::Empty,
                        user_id = tracing::field::Empty,
                        status = tracing::field::Empty,
                        latency_ms = tracing::field::Empty,
                    )
                })
                .on_response(
                    |response: &axum::http::Response<_>,
                     latency: std::time::Duration,
                     span: &Span| {
                        span.record("status", response.status().as_u16());
                        span.record(
                            "latency_ms",
                            u64::try_from(latency.as_millis()).unwrap_or(u64::MAX),
                        );
                        DefaultOnResponse::default().on_response(response, latency, span);
                    },
                ),
        )
        .with_state(state)
}

/// The complete service: [`router`] behind trailing-slash normalisation.
pub fn app(state: AppState) -> NormalizePath<Router> {
    normalize_trailing_slash(router(state))
}

/// Strip trailing slashes before routing, so `/api/contacts/` and
/// `/api/contacts` match the same route.
pub fn normalize_trailing_slash(router: Router) -> NormalizePath<Router> {
    NormalizePathLayer::trim_trailing_slash().layer(router)
}
