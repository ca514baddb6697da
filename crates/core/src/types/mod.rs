//! Core types for the pet store.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod authority;
pub mod cost;
pub mod email;
pub mod id;

pub use authority::{Authority, AuthorityParseError};
pub use cost::{Cost, CostError};
pub use email::{Email, EmailError};
pub use id::*;
