//! Store↔Stock association management.
//!
//! A store records the stocks it works with as an ordered set of stock ids.
//! The manager guards that set:
//!
//! - both ids must resolve before a pair is recorded
//! - a pair is recorded at most once; a second add is a `Conflict`
//! - removing a pair that is not recorded is a `NotFound`
//!
//! Stocks themselves are never created or deleted here.

use pet_store_core::{StockId, StoreId};
use tracing::instrument;

use super::ServiceError;
use crate::db::{RepositoryError, Storage};
use crate::models::{Stock, Store};

/// Add, remove and list the stocks associated with a store.
pub struct StoreStockManager<'a> {
    storage: &'a dyn Storage,
}

impl<'a> StoreStockManager<'a> {
    #[must_use]
    pub const fn new(storage: &'a dyn Storage) -> Self {
        Self { storage }
    }

    /// The stocks associated with `store_id`, in the order they were added.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::NotFound` if the store does not exist.
    #[instrument(skip(self), fields(store_id = %store_id))]
    pub async fn list_associations(&self, store_id: &StoreId) -> Result<Vec<Stock>, ServiceError> {
        let store = self.load_store(store_id).await?;
        let ids: Vec<StockId> = store.stocks.into_iter().collect();
        Ok(self.storage.find_stocks(&ids).await?)
    }

    /// Associate `stock_id` with `store_id`.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::NotFound` if either id does not resolve and
    /// `ServiceError::Conflict` if the pair is already associated.
    #[instrument(skip(self), fields(store_id = %store_id, stock_id = %stock_id))]
    pub async fn add_association(
        &self,
        store_id: &StoreId,
        stock_id: &StockId,
    ) -> Result<(), ServiceError> {
        let store = self.load_store(store_id).await?;

        if self.storage.find_stock(stock_id).await?.is_none() {
            return Err(ServiceError::not_found("stock", stock_id));
        }

        if store.has_stock(stock_id) {
            return Err(duplicate(store_id, stock_id));
        }

        // The pair can still appear between the read and the write; storage
        // reports that as a conflict too.
        match self.storage.attach_stock(store_id, stock_id).await {
            Ok(()) => {
                tracing::info!("Stock associated with store");
                Ok(())
            }
            Err(RepositoryError::Conflict(_)) => Err(duplicate(store_id, stock_id)),
            Err(RepositoryError::NotFound) => Err(ServiceError::not_found("stock", stock_id)),
            Err(e) => Err(e.into()),
        }
    }

    /// Remove the association between `store_id` and `stock_id`.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::NotFound` if the store does not exist or the
    /// pair is not associated.
    #[instrument(skip(self), fields(store_id = %store_id, stock_id = %stock_id))]
    pub async fn remove_association(
        &self,
        store_id: &StoreId,
        stock_id: &StockId,
    ) -> Result<(), ServiceError> {
        self.load_store(store_id).await?;

        if !self.storage.detach_stock(store_id, stock_id).await? {
            return Err(ServiceError::not_found(
                "association",
                format!("{store_id}/{stock_id}"),
            ));
        }

        tracing::info!("Stock detached from store");
        Ok(())
    }

    async fn load_store(&self, store_id: &StoreId) -> Result<Store, ServiceError> {
        self.storage
            .find_store(store_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("store", store_id))
    }
}

fn duplicate(store_id: &StoreId, stock_id: &StockId) -> ServiceError {
    ServiceError::Conflict(format!(
        "stock {stock_id} is already associated with store {store_id}"
    ))
}
