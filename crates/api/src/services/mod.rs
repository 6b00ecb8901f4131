//! Business logic layer.
//!
//! Services validate input, open one transaction per call, enforce ownership
//! and shape the response. Routes stay thin.

pub mod addresses;
pub mod auth;
pub mod contacts;

pub use addresses::AddressService;
pub use auth::UserService;
pub use contacts::ContactService;
