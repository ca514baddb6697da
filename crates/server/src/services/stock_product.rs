//! Product quantities held by a stock.
//!
//! A stock holds at most one [`ProductStock`] row per product. Adding units of
//! a product already held increases its count; removing units drains it, and
//! a row whose count reaches zero is deleted together with any cart lines that
//! referenced it.

use pet_store_core::{ProductId, ProductStockId, StockId};
use tracing::instrument;

use super::ServiceError;
use crate::db::Storage;
use crate::models::ProductStock;

pub struct StockProductManager<'a> {
    storage: &'a dyn Storage,
}

impl<'a> StockProductManager<'a> {
    #[must_use]
    pub const fn new(storage: &'a dyn Storage) -> Self {
        Self { storage }
    }

    /// Product quantities held by `stock_id`.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::NotFound` if the stock does not exist.
    #[instrument(skip(self), fields(stock_id = %stock_id))]
    pub async fn list_products(
        &self,
        stock_id: &StockId,
    ) -> Result<Vec<ProductStock>, ServiceError> {
        self.ensure_stock(stock_id).await?;
        Ok(self.storage.list_product_stocks(stock_id).await?)
    }

    /// Put `count` units of `product_id` into `stock_id`.
    ///
    /// Returns the resulting row.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::NotFound` if either id does not resolve and
    /// `ServiceError::Validation` if `count` is zero or the total overflows.
    #[instrument(skip(self), fields(stock_id = %stock_id, product_id = %product_id))]
    pub async fn add_product(
        &self,
        stock_id: &StockId,
        product_id: &ProductId,
        count: u32,
    ) -> Result<ProductStock, ServiceError> {
        if count == 0 {
            return Err(ServiceError::Validation("count must be positive".to_owned()));
        }

        self.ensure_stock(stock_id).await?;
        if self.storage.find_product(product_id).await?.is_none() {
            return Err(ServiceError::not_found("product", product_id));
        }

        let row = match self
            .storage
            .find_product_stock_for(stock_id, product_id)
            .await?
        {
            Some(mut existing) => {
                existing.products_count =
                    existing.products_count.checked_add(count).ok_or_else(|| {
                        ServiceError::Validation(format!(
                            "stock {stock_id} cannot hold that many units of {product_id}"
                        ))
                    })?;
                existing
            }
            None => ProductStock {
                id: ProductStockId::generate(),
                stock_id: stock_id.clone(),
                product_id: product_id.clone(),
                products_count: count,
            },
        };

        self.storage.save_product_stock(&row).await?;
        tracing::info!(products_count = row.products_count, "Product added to stock");
        Ok(row)
    }

    /// Take `count` units of `product_id` out of `stock_id`.
    ///
    /// Returns the remaining row, or `None` when the stock no longer holds
    /// the product.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::NotFound` if the stock does not exist or does
    /// not hold the product, and `ServiceError::Validation` if `count` is
    /// zero or exceeds the units held.
    #[instrument(skip(self), fields(stock_id = %stock_id, product_id = %product_id))]
    pub async fn remove_product(
        &self,
        stock_id: &StockId,
        product_id: &ProductId,
        count: u32,
    ) -> Result<Option<ProductStock>, ServiceError> {
        if count == 0 {
            return Err(ServiceError::Validation("count must be positive".to_owned()));
        }

        self.ensure_stock(stock_id).await?;
        let mut row = self
            .storage
            .find_product_stock_for(stock_id, product_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("product", product_id))?;

        if count > row.products_count {
            return Err(ServiceError::Validation(format!(
                "stock {stock_id} holds only {} units of {product_id}",
                row.products_count
            )));
        }

        row.products_count -= count;
        if row.products_count == 0 {
            self.storage.delete_product_stock(&row.id).await?;
            tracing::info!("Product drained from stock");
            return Ok(None);
        }

        self.storage.save_product_stock(&row).await?;
        tracing::info!(products_count = row.products_count, "Product removed from stock");
        Ok(Some(row))
    }

    async fn ensure_stock(&self, stock_id: &StockId) -> Result<(), ServiceError> {
        match self.storage.find_stock(stock_id).await? {
            Some(_) => Ok(()),
            None => Err(ServiceError::not_found("stock", stock_id)),
        }
    }
}
