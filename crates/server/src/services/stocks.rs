//! Stock CRUD.

use pet_store_core::{StockId, UserId};
use tracing::instrument;

use super::{ServiceError, optional};
use crate::db::{RepositoryError, Storage};
use crate::models::{Stock, StockInput};

pub struct StockService<'a> {
    storage: &'a dyn Storage,
}

impl<'a> StockService<'a> {
    #[must_use]
    pub const fn new(storage: &'a dyn Storage) -> Self {
        Self { storage }
    }

    /// # Errors
    ///
    /// Returns `ServiceError::Repository` if storage fails.
    pub async fn list(&self) -> Result<Vec<Stock>, ServiceError> {
        Ok(self.storage.list_stocks().await?)
    }

    /// # Errors
    ///
    /// Returns `ServiceError::NotFound` if the stock does not exist.
    pub async fn find(&self, id: &StockId) -> Result<Stock, ServiceError> {
        self.storage
            .find_stock(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("stock", id))
    }

    /// # Errors
    ///
    /// Returns `ServiceError::NotFound` if the manager does not exist.
    #[instrument(skip(self, input))]
    pub async fn create(&self, input: StockInput) -> Result<Stock, ServiceError> {
        let stock = self.build(StockId::generate(), input).await?;
        self.storage.insert_stock(&stock).await?;
        tracing::info!(stock_id = %stock.id, "Stock created");
        Ok(stock)
    }

    /// # Errors
    ///
    /// Returns `ServiceError::NotFound` if the stock or the manager does not
    /// exist.
    #[instrument(skip(self, input), fields(stock_id = %id))]
    pub async fn update(&self, id: &StockId, input: StockInput) -> Result<Stock, ServiceError> {
        self.find(id).await?;
        let stock = self.build(id.clone(), input).await?;
        self.storage
            .update_stock(&stock)
            .await
            .map_err(|e| missing(e, id))?;
        tracing::info!("Stock updated");
        Ok(stock)
    }

    /// Delete a stock, its product quantities, and its store associations.
    /// The stores themselves survive.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::NotFound` if the stock does not exist.
    #[instrument(skip(self), fields(stock_id = %id))]
    pub async fn delete(&self, id: &StockId) -> Result<(), ServiceError> {
        self.storage
            .delete_stock(id)
            .await
            .map_err(|e| missing(e, id))?;
        tracing::info!("Stock deleted");
        Ok(())
    }

    async fn build(&self, id: StockId, input: StockInput) -> Result<Stock, ServiceError> {
        if let Some(manager) = &input.manager {
            self.ensure_user(manager).await?;
        }

        Ok(Stock {
            id,
            manager: input.manager,
            specialize: optional(input.specialize),
            address: optional(input.address),
            phone: optional(input.phone),
        })
    }

    async fn ensure_user(&self, id: &UserId) -> Result<(), ServiceError> {
        match self.storage.find_user(id).await? {
            Some(_) => Ok(()),
            None => Err(ServiceError::not_found("user", id)),
        }
    }
}

fn missing(e: RepositoryError, id: &StockId) -> ServiceError {
    match e {
        RepositoryError::NotFound => ServiceError::not_found("stock", id),
        other => other.into(),
    }
}
