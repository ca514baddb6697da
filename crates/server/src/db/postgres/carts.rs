//! Cart and cart line queries.

use async_trait::async_trait;

use pet_store_core::{CartId, ProductStockId, UserId};

use super::{PgStorage, count_from_db, count_to_db, map_write_error};
use crate::db::{CartRepository, RepositoryError};
use crate::models::{Cart, CartLine};

#[derive(Debug, sqlx::FromRow)]
struct CartRow {
    id: CartId,
    user_id: UserId,
}

#[derive(Debug, sqlx::FromRow)]
struct CartLineRow {
    product_stock_id: ProductStockId,
    count: i32,
}

impl TryFrom<CartLineRow> for CartLine {
    type Error = RepositoryError;

    fn try_from(row: CartLineRow) -> Result<Self, Self::Error> {
        Ok(Self {
            product_stock_id: row.product_stock_id,
            count: count_from_db(row.count, "count")?,
        })
    }
}

impl PgStorage {
    async fn load_cart(&self, row: Option<CartRow>) -> Result<Option<Cart>, RepositoryError> {
        let Some(row) = row else {
            return Ok(None);
        };

        let lines = sqlx::query_as::<_, CartLineRow>(
            r"
            SELECT product_stock_id, count
            FROM pms.cart_product_stock
            WHERE cart_id = $1
            ORDER BY position
            ",
        )
        .bind(&row.id)
        .fetch_all(self.pool())
        .await?
        .into_iter()
        .map(CartLine::try_from)
        .collect::<Result<Vec<_>, _>>()?;

        Ok(Some(Cart {
            id: row.id,
            user_id: row.user_id,
            lines,
        }))
    }
}

#[async_trait]
impl CartRepository for PgStorage {
    async fn find_cart(&self, id: &CartId) -> Result<Option<Cart>, RepositoryError> {
        let row = sqlx::query_as::<_, CartRow>("SELECT id, user_id FROM pms.cart WHERE id = $1")
            .bind(id)
            .fetch_optional(self.pool())
            .await?;

        self.load_cart(row).await
    }

    async fn find_cart_by_user(&self, user_id: &UserId) -> Result<Option<Cart>, RepositoryError> {
        let row =
            sqlx::query_as::<_, CartRow>("SELECT id, user_id FROM pms.cart WHERE user_id = $1")
                .bind(user_id)
                .fetch_optional(self.pool())
                .await?;

        self.load_cart(row).await
    }

    async fn save_cart_line(
        &self,
        cart_id: &CartId,
        line: &CartLine,
    ) -> Result<(), RepositoryError> {
        let count = count_to_db(line.count, "count")?;

        // An existing line keeps its position
        sqlx::query(
            r"
            INSERT INTO pms.cart_product_stock (cart_id, product_stock_id, count)
            VALUES ($1, $2, $3)
            ON CONFLICT (cart_id, product_stock_id) DO UPDATE SET count = EXCLUDED.count
            ",
        )
        .bind(cart_id)
        .bind(&line.product_stock_id)
        .bind(count)
        .execute(self.pool())
        .await
        .map_err(|e| map_write_error(e, "cart line conflicts with an existing row"))?;

        Ok(())
    }

    async fn delete_cart_line(
        &self,
        cart_id: &CartId,
        product_stock_id: &ProductStockId,
    ) -> Result<bool, RepositoryError> {
        let result = sqlx::query(
            r"
            DELETE FROM pms.cart_product_stock
            WHERE cart_id = $1 AND product_stock_id = $2
            ",
        )
        .bind(cart_id)
        .bind(product_stock_id)
        .execute(self.pool())
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn clear_cart(&self, cart_id: &CartId) -> Result<(), RepositoryError> {
        sqlx::query("DELETE FROM pms.cart_product_stock WHERE cart_id = $1")
            .bind(cart_id)
            .execute(self.pool())
            .await?;

        Ok(())
    }
}
