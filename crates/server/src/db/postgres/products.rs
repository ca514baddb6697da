//! Product catalogue queries.

use async_trait::async_trait;

use pet_store_core::{Cost, ProductId};

use super::{PgStorage, expect_affected, map_write_error};
use crate::db::{ProductRepository, RepositoryError};
use crate::models::Product;

#[derive(Debug, sqlx::FromRow)]
struct ProductRow {
    id: ProductId,
    name: String,
    product_type: Option<String>,
    details: Option<String>,
    cost: Cost,
    image: Option<String>,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            product_type: row.product_type,
            details: row.details,
            cost: row.cost,
            image: row.image,
        }
    }
}

#[async_trait]
impl ProductRepository for PgStorage {
    async fn list_products(&self) -> Result<Vec<Product>, RepositoryError> {
        let rows = sqlx::query_as::<_, ProductRow>(
            r"
            SELECT id, name, product_type, details, cost, image
            FROM pms.product
            ORDER BY created_at, id
            ",
        )
        .fetch_all(self.pool())
        .await?;

        Ok(rows.into_iter().map(Product::from).collect())
    }

    async fn find_product(&self, id: &ProductId) -> Result<Option<Product>, RepositoryError> {
        let row = sqlx::query_as::<_, ProductRow>(
            r"
            SELECT id, name, product_type, details, cost, image
            FROM pms.product
            WHERE id = $1
            ",
        )
        .bind(id)
        .fetch_optional(self.pool())
        .await?;

        Ok(row.map(Product::from))
    }

    async fn insert_product(&self, product: &Product) -> Result<(), RepositoryError> {
        sqlx::query(
            r"
            INSERT INTO pms.product (id, name, product_type, details, cost, image)
            VALUES ($1, $2, $3, $4, $5, $6)
            ",
        )
        .bind(&product.id)
        .bind(&product.name)
        .bind(&product.product_type)
        .bind(&product.details)
        .bind(product.cost)
        .bind(&product.image)
        .execute(self.pool())
        .await
        .map_err(|e| map_write_error(e, "product already exists"))?;

        Ok(())
    }

    async fn update_product(&self, product: &Product) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            r"
            UPDATE pms.product
            SET name = $2, product_type = $3, details = $4, cost = $5, image = $6
            WHERE id = $1
            ",
        )
        .bind(&product.id)
        .bind(&product.name)
        .bind(&product.product_type)
        .bind(&product.details)
        .bind(product.cost)
        .bind(&product.image)
        .execute(self.pool())
        .await?;

        expect_affected(result.rows_affected())
    }

    async fn delete_product(&self, id: &ProductId) -> Result<(), RepositoryError> {
        // product_stock rows (and the cart lines on them) cascade
        let result = sqlx::query("DELETE FROM pms.product WHERE id = $1")
            .bind(id)
            .execute(self.pool())
            .await?;

        expect_affected(result.rows_affected())
    }
}
