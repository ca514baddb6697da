//! Pet Store Core - Shared domain types.
//!
//! This crate provides the value types used across all pet store components:
//! - `server` - JSON REST API over stores, stocks, products, users and carts
//! - `cli` - Command-line tools for migrations, seeding and user bootstrap
//!
//! # Architecture
//!
//! The core crate contains only types and validation - no I/O, no database
//! access, no HTTP. With the `postgres` feature enabled the types also
//! implement the `sqlx` encode/decode traits so repositories can bind them
//! directly.
//!
//! # Modules
//!
//! - [`types`] - Opaque entity IDs, email addresses, costs and authorities

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;

#[doc(hidden)]
pub use uuid as __uuid;
