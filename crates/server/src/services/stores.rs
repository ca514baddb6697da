//! Store CRUD.

use pet_store_core::{Email, StoreId};
use tracing::instrument;

use super::{ServiceError, optional, required};
use crate::db::{RepositoryError, Storage};
use crate::models::{Store, StoreInput};

pub struct StoreService<'a> {
    storage: &'a dyn Storage,
}

impl<'a> StoreService<'a> {
    #[must_use]
    pub const fn new(storage: &'a dyn Storage) -> Self {
        Self { storage }
    }

    /// # Errors
    ///
    /// Returns `ServiceError::Repository` if storage fails.
    pub async fn list(&self) -> Result<Vec<Store>, ServiceError> {
        Ok(self.storage.list_stores().await?)
    }

    /// # Errors
    ///
    /// Returns `ServiceError::NotFound` if the store does not exist.
    pub async fn find(&self, id: &StoreId) -> Result<Store, ServiceError> {
        self.storage
            .find_store(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("store", id))
    }

    /// Create a store with no associated stocks.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Validation` if the name is missing or the mail
    /// address is invalid.
    #[instrument(skip(self, input))]
    pub async fn create(&self, input: StoreInput) -> Result<Store, ServiceError> {
        let store = build(StoreId::generate(), input)?;
        self.storage.insert_store(&store).await?;
        tracing::info!(store_id = %store.id, "Store created");
        Ok(store)
    }

    /// Replace a store's attributes. Its associations are kept.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::NotFound` if the store does not exist and
    /// `ServiceError::Validation` for invalid input.
    #[instrument(skip(self, input), fields(store_id = %id))]
    pub async fn update(&self, id: &StoreId, input: StoreInput) -> Result<Store, ServiceError> {
        let existing = self.find(id).await?;
        let mut store = build(id.clone(), input)?;
        store.stocks = existing.stocks;

        self.storage
            .update_store(&store)
            .await
            .map_err(|e| missing(e, id))?;
        tracing::info!("Store updated");
        Ok(store)
    }

    /// Delete a store. Its stocks are left alone.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::NotFound` if the store does not exist.
    #[instrument(skip(self), fields(store_id = %id))]
    pub async fn delete(&self, id: &StoreId) -> Result<(), ServiceError> {
        self.storage
            .delete_store(id)
            .await
            .map_err(|e| missing(e, id))?;
        tracing::info!("Store deleted");
        Ok(())
    }
}

fn build(id: StoreId, input: StoreInput) -> Result<Store, ServiceError> {
    let mail = optional(input.mail)
        .map(|m| Email::parse(&m))
        .transpose()?;

    Ok(Store {
        id,
        name: required("name", input.name)?,
        address: optional(input.address),
        details: optional(input.details),
        discounts: input.discounts,
        logo: optional(input.logo),
        mail,
        phone: optional(input.phone),
        skype: optional(input.skype),
        stocks: Default::default(),
    })
}

fn missing(e: RepositoryError, id: &StoreId) -> ServiceError {
    match e {
        RepositoryError::NotFound => ServiceError::not_found("store", id),
        other => other.into(),
    }
}
