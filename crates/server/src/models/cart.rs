//! Shopping cart types.

use pet_store_core::{CartId, ProductStockId, UserId};

/// A user's shopping cart. Every user owns exactly one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cart {
    pub id: CartId,
    pub user_id: UserId,
    /// Lines in the order they were first added.
    pub lines: Vec<CartLine>,
}

impl Cart {
    /// An empty cart for `user_id`.
    #[must_use]
    pub fn empty(user_id: UserId) -> Self {
        Self {
            id: CartId::generate(),
            user_id,
            lines: Vec::new(),
        }
    }

    /// The line for `product_stock_id`, if the cart has one.
    #[must_use]
    pub fn line(&self, product_stock_id: &ProductStockId) -> Option<&CartLine> {
        self.lines
            .iter()
            .find(|line| &line.product_stock_id == product_stock_id)
    }
}

/// Units of one product stock placed in a cart. Owned by the cart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartLine {
    pub product_stock_id: ProductStockId,
    /// Always greater than zero.
    pub count: u32,
}
