//! Shopping cart management.
//!
//! Every user owns exactly one cart, created with the account. A cart line
//! reserves nothing: it records how many units of a product stock the user
//! wants, bounded by what the stock currently holds. The total cost is
//! computed from the lines on every read, so it cannot drift from them.

use pet_store_core::{CartId, Cost, ProductStockId, UserId};
use tracing::instrument;

use super::ServiceError;
use crate::db::Storage;
use crate::models::{Cart, CartLine};

/// A cart together with its computed total.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartView {
    pub cart: Cart,
    pub total_cost: Cost,
}

pub struct CartManager<'a> {
    storage: &'a dyn Storage,
}

impl<'a> CartManager<'a> {
    #[must_use]
    pub const fn new(storage: &'a dyn Storage) -> Self {
        Self { storage }
    }

    /// The cart owned by `user_id`.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::NotFound` if the user has no cart.
    pub async fn find_cart(&self, user_id: &UserId) -> Result<CartView, ServiceError> {
        let cart = self
            .storage
            .find_cart_by_user(user_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("cart of user", user_id))?;
        self.view(cart).await
    }

    /// Load a cart by id, without computing its total.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::NotFound` if the cart does not exist.
    pub async fn load(&self, cart_id: &CartId) -> Result<Cart, ServiceError> {
        self.storage
            .find_cart(cart_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("cart", cart_id))
    }

    /// Add `count` units of `product_stock_id` to the cart.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::NotFound` if the cart or product stock does not
    /// exist, and `ServiceError::Validation` if `count` is zero or the line
    /// would exceed the units the stock holds.
    #[instrument(skip(self), fields(cart_id = %cart_id, product_stock_id = %product_stock_id))]
    pub async fn add_product(
        &self,
        cart_id: &CartId,
        product_stock_id: &ProductStockId,
        count: u32,
    ) -> Result<CartView, ServiceError> {
        if count == 0 {
            return Err(ServiceError::Validation("count must be positive".to_owned()));
        }

        let cart = self.load(cart_id).await?;
        let held = self
            .storage
            .find_product_stock(product_stock_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("product stock", product_stock_id))?;

        let current = cart.line(product_stock_id).map_or(0, |line| line.count);
        let wanted = current.saturating_add(count);
        if wanted > held.products_count {
            return Err(ServiceError::Validation(format!(
                "only {} units of {product_stock_id} are in stock",
                held.products_count
            )));
        }

        let line = CartLine {
            product_stock_id: product_stock_id.clone(),
            count: wanted,
        };
        self.storage.save_cart_line(cart_id, &line).await?;
        tracing::info!(count = wanted, "Product added to cart");

        self.reload(cart_id).await
    }

    /// Take `count` units of `product_stock_id` out of the cart.
    ///
    /// The line disappears when its count reaches zero.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::NotFound` if the cart does not exist or has no
    /// such line, and `ServiceError::Validation` if `count` is zero or
    /// exceeds the line's count.
    #[instrument(skip(self), fields(cart_id = %cart_id, product_stock_id = %product_stock_id))]
    pub async fn remove_product(
        &self,
        cart_id: &CartId,
        product_stock_id: &ProductStockId,
        count: u32,
    ) -> Result<CartView, ServiceError> {
        if count == 0 {
            return Err(ServiceError::Validation("count must be positive".to_owned()));
        }

        let cart = self.load(cart_id).await?;
        let line = cart
            .line(product_stock_id)
            .ok_or_else(|| ServiceError::not_found("cart line", product_stock_id))?;

        if count > line.count {
            return Err(ServiceError::Validation(format!(
                "cart holds only {} units of {product_stock_id}",
                line.count
            )));
        }

        let left = line.count - count;
        if left == 0 {
            self.storage
                .delete_cart_line(cart_id, product_stock_id)
                .await?;
        } else {
            let line = CartLine {
                product_stock_id: product_stock_id.clone(),
                count: left,
            };
            self.storage.save_cart_line(cart_id, &line).await?;
        }
        tracing::info!(count = left, "Product removed from cart");

        self.reload(cart_id).await
    }

    /// Remove every line from the cart.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::NotFound` if the cart does not exist.
    #[instrument(skip(self), fields(cart_id = %cart_id))]
    pub async fn clear(&self, cart_id: &CartId) -> Result<CartView, ServiceError> {
        self.load(cart_id).await?;
        self.storage.clear_cart(cart_id).await?;
        tracing::info!("Cart cleared");
        self.reload(cart_id).await
    }

    async fn reload(&self, cart_id: &CartId) -> Result<CartView, ServiceError> {
        let cart = self.load(cart_id).await?;
        self.view(cart).await
    }

    /// Σ(product cost × line count). Lines whose product stock vanished in
    /// between contribute nothing.
    async fn view(&self, cart: Cart) -> Result<CartView, ServiceError> {
        let mut total_cost = Cost::ZERO;
        for line in &cart.lines {
            let Some(held) = self.storage.find_product_stock(&line.product_stock_id).await? else {
                continue;
            };
            if let Some(product) = self.storage.find_product(&held.product_id).await? {
                total_cost = total_cost + product.cost.times(line.count);
            }
        }
        Ok(CartView { cart, total_cost })
    }
}
