//! Product catalogue CRUD.

use pet_store_core::ProductId;
use tracing::instrument;

use super::{ServiceError, optional, required};
use crate::db::{RepositoryError, Storage};
use crate::models::{Product, ProductInput};

pub struct ProductService<'a> {
    storage: &'a dyn Storage,
}

impl<'a> ProductService<'a> {
    #[must_use]
    pub const fn new(storage: &'a dyn Storage) -> Self {
        Self { storage }
    }

    /// # Errors
    ///
    /// Returns `ServiceError::Repository` if storage fails.
    pub async fn list(&self) -> Result<Vec<Product>, ServiceError> {
        Ok(self.storage.list_products().await?)
    }

    /// # Errors
    ///
    /// Returns `ServiceError::NotFound` if the product does not exist.
    pub async fn find(&self, id: &ProductId) -> Result<Product, ServiceError> {
        self.storage
            .find_product(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("product", id))
    }

    /// # Errors
    ///
    /// Returns `ServiceError::Validation` if the name or cost is missing.
    #[instrument(skip(self, input))]
    pub async fn create(&self, input: ProductInput) -> Result<Product, ServiceError> {
        let product = build(ProductId::generate(), input)?;
        self.storage.insert_product(&product).await?;
        tracing::info!(product_id = %product.id, "Product created");
        Ok(product)
    }

    /// # Errors
    ///
    /// Returns `ServiceError::NotFound` if the product does not exist and
    /// `ServiceError::Validation` for invalid input.
    #[instrument(skip(self, input), fields(product_id = %id))]
    pub async fn update(
        &self,
        id: &ProductId,
        input: ProductInput,
    ) -> Result<Product, ServiceError> {
        let product = build(id.clone(), input)?;
        self.storage
            .update_product(&product)
            .await
            .map_err(|e| missing(e, id))?;
        tracing::info!("Product updated");
        Ok(product)
    }

    /// Delete a product and every stock quantity of it.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::NotFound` if the product does not exist.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn delete(&self, id: &ProductId) -> Result<(), ServiceError> {
        self.storage
            .delete_product(id)
            .await
            .map_err(|e| missing(e, id))?;
        tracing::info!("Product deleted");
        Ok(())
    }
}

fn build(id: ProductId, input: ProductInput) -> Result<Product, ServiceError> {
    Ok(Product {
        id,
        name: required("name", input.name)?,
        product_type: optional(input.product_type),
        details: optional(input.details),
        cost: input
            .cost
            .ok_or_else(|| ServiceError::Validation("cost is required".to_owned()))?,
        image: optional(input.image),
    })
}

fn missing(e: RepositoryError, id: &ProductId) -> ServiceError {
    match e {
        RepositoryError::NotFound => ServiceError::not_found("product", id),
        other => other.into(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal::Decimal;

    use pet_store_core::Cost;

    use super::*;
    use crate::db::MemoryStorage;

    fn input() -> ProductInput {
        ProductInput {
            name: Some("Parrot seed".to_string()),
            product_type: Some("food".to_string()),
            cost: Some(Cost::new(Decimal::new(499, 2)).unwrap()),
            ..ProductInput::default()
        }
    }

    #[tokio::test]
    async fn test_create_and_update() {
        let storage = MemoryStorage::new();
        let service = ProductService::new(&storage);

        let product = service.create(input()).await.unwrap();
        assert_eq!(service.list().await.unwrap().len(), 1);

        let mut changed = input();
        changed.name = Some("Budgie seed".to_string());
        let updated = service.update(&product.id, changed).await.unwrap();
        assert_eq!(updated.name, "Budgie seed");
        assert_eq!(service.find(&product.id).await.unwrap(), updated);
    }

    #[tokio::test]
    async fn test_cost_and_name_required() {
        let storage = MemoryStorage::new();
        let service = ProductService::new(&storage);

        let mut no_cost = input();
        no_cost.cost = None;
        assert!(matches!(
            service.create(no_cost).await.unwrap_err(),
            ServiceError::Validation(_)
        ));

        let mut no_name = input();
        no_name.name = None;
        assert!(matches!(
            service.create(no_name).await.unwrap_err(),
            ServiceError::Validation(_)
        ));
    }

    #[tokio::test]
    async fn test_update_missing_is_not_found() {
        let storage = MemoryStorage::new();
        let service = ProductService::new(&storage);

        let err = service
            .update(&ProductId::new("missing"), input())
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::NotFound { entity: "product", .. }));
    }
}
