//! Product catalogue types.

use pet_store_core::{Cost, ProductId};

/// A product in the catalogue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    /// Free-form category, e.g. "food" or "toy".
    pub product_type: Option<String>,
    pub details: Option<String>,
    /// Unit cost.
    pub cost: Cost,
    /// Image URL.
    pub image: Option<String>,
}

/// Unvalidated product attributes.
#[derive(Debug, Clone, Default)]
pub struct ProductInput {
    pub name: Option<String>,
    pub product_type: Option<String>,
    pub details: Option<String>,
    pub cost: Option<Cost>,
    pub image: Option<String>,
}
