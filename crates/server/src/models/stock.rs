//! Stock (warehouse) types.

use pet_store_core::{ProductId, ProductStockId, StockId, UserId};

/// A stock: a warehouse holding product quantities, run by a manager.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stock {
    pub id: StockId,
    /// User responsible for this stock.
    pub manager: Option<UserId>,
    /// What the stock specialises in (e.g. "aquaristics").
    pub specialize: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
}

/// Unvalidated stock attributes, as submitted by a client.
#[derive(Debug, Clone, Default)]
pub struct StockInput {
    pub manager: Option<UserId>,
    pub specialize: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
}

/// Units of one product held by one stock.
///
/// Owned by the stock: removed when the stock is deleted or its count drains
/// to zero. At most one row exists per (stock, product) pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductStock {
    pub id: ProductStockId,
    pub stock_id: StockId,
    pub product_id: ProductId,
    pub products_count: u32,
}
