//! Domain types.
//!
//! These types represent validated domain objects, separate from both the
//! database row types in [`crate::db`] and the JSON DTOs in [`crate::routes`].

pub mod cart;
pub mod product;
pub mod stock;
pub mod store;
pub mod user;

pub use cart::{Cart, CartLine};
pub use product::{Product, ProductInput};
pub use stock::{ProductStock, Stock, StockInput};
pub use store::{Store, StoreInput};
pub use user::{CurrentUser, User, UserInput};
