//! The `{code, status, data}` envelope wrapped around every API response.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

/// JSON body shared by successful and failed responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope<T> {
    /// Numeric HTTP status.
    pub code: u16,
    /// Canonical reason phrase, e.g. `"Not Found"`.
    pub status: String,
    pub data: T,
}

impl<T> Envelope<T> {
    #[must_use]
    pub fn new(status: StatusCode, data: T) -> Self {
        Self {
            code: status.as_u16(),
            status: status.canonical_reason().unwrap_or("Unknown").to_owned(),
            data,
        }
    }
}

/// A handler result rendered as an [`Envelope`] with the given status.
#[derive(Debug)]
pub struct ApiResponse<T> {
    status: StatusCode,
    data: T,
}

impl<T> ApiResponse<T> {
    pub const fn new(status: StatusCode, data: T) -> Self {
        Self { status, data }
    }

    /// `200 OK`.
    pub const fn ok(data: T) -> Self {
        Self::new(StatusCode::OK, data)
    }

    /// `201 Created`.
    pub const fn created(data: T) -> Self {
        Self::new(StatusCode::CREATED, data)
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        (self.status, Json(Envelope::new(self.status, self.data))).into_response()
    }
}
