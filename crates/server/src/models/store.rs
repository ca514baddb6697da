//! Store aggregate.

use indexmap::IndexSet;

use pet_store_core::{Email, StockId, StoreId};

/// A pet store.
///
/// The store is the aggregate root of its stock associations: `stocks` is the
/// only place the Store↔Stock relationship is recorded. It holds references
/// only; the stocks themselves live independently and outlive the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Store {
    pub id: StoreId,
    /// Display name. Never blank.
    pub name: String,
    pub address: Option<String>,
    pub details: Option<String>,
    /// Whether the store currently runs discounts.
    pub discounts: bool,
    /// Logo image URL.
    pub logo: Option<String>,
    pub mail: Option<Email>,
    pub phone: Option<String>,
    pub skype: Option<String>,
    /// Associated stocks in insertion order, each at most once.
    pub stocks: IndexSet<StockId>,
}

impl Store {
    /// Whether `stock_id` is associated with this store.
    #[must_use]
    pub fn has_stock(&self, stock_id: &StockId) -> bool {
        self.stocks.contains(stock_id)
    }
}

/// Unvalidated store attributes, as submitted by a client.
///
/// Association state is deliberately absent: it can only change through the
/// stock-management operations.
#[derive(Debug, Clone, Default)]
pub struct StoreInput {
    pub name: Option<String>,
    pub address: Option<String>,
    pub details: Option<String>,
    pub discounts: bool,
    pub logo: Option<String>,
    pub mail: Option<String>,
    pub phone: Option<String>,
    pub skype: Option<String>,
}
