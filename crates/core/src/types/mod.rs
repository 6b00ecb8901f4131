//! Core types for Rolodex.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod email;
pub mod id;
pub mod paging;

pub use email::{Email, EmailError};
pub use id::*;
pub use paging::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE, PageRequest, Paging, PagingError, total_pages};
