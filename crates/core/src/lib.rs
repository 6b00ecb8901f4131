//! Rolodex Core - Shared types library.
//!
//! This crate provides common types used across all Rolodex components:
//! - `api` - The contact management HTTP service
//! - `cli` - Command-line tools for migrations and user bootstrap
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no database
//! access, no HTTP. The optional `postgres` feature adds `sqlx` encode/decode
//! impls so the types can be bound and fetched directly.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs, the contact `Email` type, and pagination math

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
