//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET    /health                                           - Liveness check
//! GET    /health/ready                                     - Readiness check (database)
//!
//! # Users
//! POST   /api/users/register                               - Register, returns a token
//! POST   /api/users/login                                  - Login, returns a token
//! GET    /api/users/current                                - Current profile (auth)
//! PATCH  /api/users/current                                - Update name/password (auth)
//! DELETE /api/users/current                                - Logout (auth)
//!
//! # Contacts (auth)
//! POST   /api/contacts                                     - Create
//! GET    /api/contacts?name=&email=&phone=&page=&size=     - Search
//! GET    /api/contacts/{contact_id}                        - Get
//! PATCH  /api/contacts/{contact_id}                        - Update
//! DELETE /api/contacts/{contact_id}                        - Delete
//!
//! # Addresses (auth)
//! POST   /api/contacts/{contact_id}/addresses              - Create
//! GET    /api/contacts/{contact_id}/addresses              - List
//! GET    /api/contacts/{contact_id}/addresses/{address_id} - Get
//! PATCH  /api/contacts/{contact_id}/addresses/{address_id} - Update
//! DELETE /api/contacts/{contact_id}/addresses/{address_id} - Delete
//! ```

pub mod addresses;
pub mod contacts;
pub mod health;
pub mod users;

use axum::Router;

use crate::state::AppState;

/// Create the full API router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(health::routes())
        .merge(users::routes())
        .merge(contacts::routes())
        .merge(addresses::routes())
}
