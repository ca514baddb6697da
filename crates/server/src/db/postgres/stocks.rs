//! Stock and product stock queries.

use async_trait::async_trait;

use pet_store_core::{ProductId, ProductStockId, StockId, UserId};

use super::{PgStorage, count_from_db, count_to_db, expect_affected, map_write_error};
use crate::db::{RepositoryError, StockRepository};
use crate::models::{ProductStock, Stock};

#[derive(Debug, sqlx::FromRow)]
struct StockRow {
    id: StockId,
    manager_id: Option<UserId>,
    specialize: Option<String>,
    address: Option<String>,
    phone: Option<String>,
}

impl From<StockRow> for Stock {
    fn from(row: StockRow) -> Self {
        Self {
            id: row.id,
            manager: row.manager_id,
            specialize: row.specialize,
            address: row.address,
            phone: row.phone,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct ProductStockRow {
    id: ProductStockId,
    stock_id: StockId,
    product_id: ProductId,
    products_count: i32,
}

impl TryFrom<ProductStockRow> for ProductStock {
    type Error = RepositoryError;

    fn try_from(row: ProductStockRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id,
            stock_id: row.stock_id,
            product_id: row.product_id,
            products_count: count_from_db(row.products_count, "products_count")?,
        })
    }
}

const STOCK_COLUMNS: &str = "id, manager_id, specialize, address, phone";

#[async_trait]
impl StockRepository for PgStorage {
    async fn list_stocks(&self) -> Result<Vec<Stock>, RepositoryError> {
        let rows = sqlx::query_as::<_, StockRow>(&format!(
            "SELECT {STOCK_COLUMNS} FROM pms.stock ORDER BY created_at, id"
        ))
        .fetch_all(self.pool())
        .await?;

        Ok(rows.into_iter().map(Stock::from).collect())
    }

    async fn find_stock(&self, id: &StockId) -> Result<Option<Stock>, RepositoryError> {
        let row = sqlx::query_as::<_, StockRow>(&format!(
            "SELECT {STOCK_COLUMNS} FROM pms.stock WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool())
        .await?;

        Ok(row.map(Stock::from))
    }

    async fn find_stocks(&self, ids: &[StockId]) -> Result<Vec<Stock>, RepositoryError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let raw: Vec<&str> = ids.iter().map(StockId::as_str).collect();
        let rows = sqlx::query_as::<_, StockRow>(&format!(
            r"
            SELECT {STOCK_COLUMNS}
            FROM pms.stock s
            JOIN unnest($1::text[]) WITH ORDINALITY AS wanted(id, ord) USING (id)
            ORDER BY wanted.ord
            "
        ))
        .bind(&raw)
        .fetch_all(self.pool())
        .await?;

        Ok(rows.into_iter().map(Stock::from).collect())
    }

    async fn insert_stock(&self, stock: &Stock) -> Result<(), RepositoryError> {
        sqlx::query(
            r"
            INSERT INTO pms.stock (id, manager_id, specialize, address, phone)
            VALUES ($1, $2, $3, $4, $5)
            ",
        )
        .bind(&stock.id)
        .bind(stock.manager.as_ref())
        .bind(&stock.specialize)
        .bind(&stock.address)
        .bind(&stock.phone)
        .execute(self.pool())
        .await
        .map_err(|e| map_write_error(e, "stock already exists"))?;

        Ok(())
    }

    async fn update_stock(&self, stock: &Stock) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            r"
            UPDATE pms.stock
            SET manager_id = $2, specialize = $3, address = $4, phone = $5
            WHERE id = $1
            ",
        )
        .bind(&stock.id)
        .bind(stock.manager.as_ref())
        .bind(&stock.specialize)
        .bind(&stock.address)
        .bind(&stock.phone)
        .execute(self.pool())
        .await
        .map_err(|e| map_write_error(e, "stock conflicts with an existing row"))?;

        expect_affected(result.rows_affected())
    }

    async fn delete_stock(&self, id: &StockId) -> Result<(), RepositoryError> {
        // store_stock, product_stock and cart lines cascade
        let result = sqlx::query("DELETE FROM pms.stock WHERE id = $1")
            .bind(id)
            .execute(self.pool())
            .await?;

        expect_affected(result.rows_affected())
    }

    async fn list_product_stocks(
        &self,
        stock_id: &StockId,
    ) -> Result<Vec<ProductStock>, RepositoryError> {
        let rows = sqlx::query_as::<_, ProductStockRow>(
            r"
            SELECT id, stock_id, product_id, products_count
            FROM pms.product_stock
            WHERE stock_id = $1
            ORDER BY created_at, id
            ",
        )
        .bind(stock_id)
        .fetch_all(self.pool())
        .await?;

        rows.into_iter().map(ProductStock::try_from).collect()
    }

    async fn find_product_stock(
        &self,
        id: &ProductStockId,
    ) -> Result<Option<ProductStock>, RepositoryError> {
        let row = sqlx::query_as::<_, ProductStockRow>(
            r"
            SELECT id, stock_id, product_id, products_count
            FROM pms.product_stock
            WHERE id = $1
            ",
        )
        .bind(id)
        .fetch_optional(self.pool())
        .await?;

        row.map(ProductStock::try_from).transpose()
    }

    async fn find_product_stock_for(
        &self,
        stock_id: &StockId,
        product_id: &ProductId,
    ) -> Result<Option<ProductStock>, RepositoryError> {
        let row = sqlx::query_as::<_, ProductStockRow>(
            r"
            SELECT id, stock_id, product_id, products_count
            FROM pms.product_stock
            WHERE stock_id = $1 AND product_id = $2
            ",
        )
        .bind(stock_id)
        .bind(product_id)
        .fetch_optional(self.pool())
        .await?;

        row.map(ProductStock::try_from).transpose()
    }

    async fn save_product_stock(&self, row: &ProductStock) -> Result<(), RepositoryError> {
        let count = count_to_db(row.products_count, "products_count")?;

        sqlx::query(
            r"
            INSERT INTO pms.product_stock (id, stock_id, product_id, products_count)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (id) DO UPDATE SET products_count = EXCLUDED.products_count
            ",
        )
        .bind(&row.id)
        .bind(&row.stock_id)
        .bind(&row.product_id)
        .bind(count)
        .execute(self.pool())
        .await
        .map_err(|e| {
            map_write_error(
                e,
                &format!(
                    "stock {} already holds product {}",
                    row.stock_id, row.product_id
                ),
            )
        })?;

        Ok(())
    }

    async fn delete_product_stock(&self, id: &ProductStockId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM pms.product_stock WHERE id = $1")
            .bind(id)
            .execute(self.pool())
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
