//! Store and Store↔Stock association queries.

use std::collections::HashMap;

use async_trait::async_trait;
use indexmap::IndexSet;

use pet_store_core::{Email, StockId, StoreId};

use super::{PgStorage, expect_affected, map_write_error};
use crate::db::{RepositoryError, StoreRepository};
use crate::models::Store;

// =============================================================================
// Internal Row Types
// =============================================================================

#[derive(Debug, sqlx::FromRow)]
struct StoreRow {
    id: StoreId,
    name: String,
    address: Option<String>,
    details: Option<String>,
    discounts: bool,
    logo: Option<String>,
    mail: Option<String>,
    phone: Option<String>,
    skype: Option<String>,
}

impl StoreRow {
    fn into_store(self, stocks: IndexSet<StockId>) -> Result<Store, RepositoryError> {
        let mail = self
            .mail
            .map(|m| Email::parse(&m))
            .transpose()
            .map_err(|e| {
                RepositoryError::DataCorruption(format!("invalid store mail in database: {e}"))
            })?;

        Ok(Store {
            id: self.id,
            name: self.name,
            address: self.address,
            details: self.details,
            discounts: self.discounts,
            logo: self.logo,
            mail,
            phone: self.phone,
            skype: self.skype,
            stocks,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct AssociationRow {
    store_id: StoreId,
    stock_id: StockId,
}

#[async_trait]
impl StoreRepository for PgStorage {
    async fn list_stores(&self) -> Result<Vec<Store>, RepositoryError> {
        let rows = sqlx::query_as::<_, StoreRow>(
            r"
            SELECT id, name, address, details, discounts, logo, mail, phone, skype
            FROM pms.store
            ORDER BY created_at, id
            ",
        )
        .fetch_all(self.pool())
        .await?;

        let associations = sqlx::query_as::<_, AssociationRow>(
            r"
            SELECT store_id, stock_id
            FROM pms.store_stock
            ORDER BY position
            ",
        )
        .fetch_all(self.pool())
        .await?;

        let mut by_store: HashMap<StoreId, IndexSet<StockId>> = HashMap::new();
        for row in associations {
            by_store.entry(row.store_id).or_default().insert(row.stock_id);
        }

        rows.into_iter()
            .map(|row| {
                let stocks = by_store.remove(&row.id).unwrap_or_default();
                row.into_store(stocks)
            })
            .collect()
    }

    async fn find_store(&self, id: &StoreId) -> Result<Option<Store>, RepositoryError> {
        let row = sqlx::query_as::<_, StoreRow>(
            r"
            SELECT id, name, address, details, discounts, logo, mail, phone, skype
            FROM pms.store
            WHERE id = $1
            ",
        )
        .bind(id)
        .fetch_optional(self.pool())
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let stocks: Vec<StockId> = sqlx::query_scalar(
            r"
            SELECT stock_id
            FROM pms.store_stock
            WHERE store_id = $1
            ORDER BY position
            ",
        )
        .bind(id)
        .fetch_all(self.pool())
        .await?;

        row.into_store(stocks.into_iter().collect()).map(Some)
    }

    async fn insert_store(&self, store: &Store) -> Result<(), RepositoryError> {
        sqlx::query(
            r"
            INSERT INTO pms.store (id, name, address, details, discounts, logo, mail, phone, skype)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            ",
        )
        .bind(&store.id)
        .bind(&store.name)
        .bind(&store.address)
        .bind(&store.details)
        .bind(store.discounts)
        .bind(&store.logo)
        .bind(store.mail.as_ref())
        .bind(&store.phone)
        .bind(&store.skype)
        .execute(self.pool())
        .await
        .map_err(|e| map_write_error(e, "store already exists"))?;

        Ok(())
    }

    async fn update_store(&self, store: &Store) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            r"
            UPDATE pms.store
            SET name = $2, address = $3, details = $4, discounts = $5,
                logo = $6, mail = $7, phone = $8, skype = $9
            WHERE id = $1
            ",
        )
        .bind(&store.id)
        .bind(&store.name)
        .bind(&store.address)
        .bind(&store.details)
        .bind(store.discounts)
        .bind(&store.logo)
        .bind(store.mail.as_ref())
        .bind(&store.phone)
        .bind(&store.skype)
        .execute(self.pool())
        .await?;

        expect_affected(result.rows_affected())
    }

    async fn delete_store(&self, id: &StoreId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM pms.store WHERE id = $1")
            .bind(id)
            .execute(self.pool())
            .await?;

        expect_affected(result.rows_affected())
    }

    async fn attach_stock(
        &self,
        store_id: &StoreId,
        stock_id: &StockId,
    ) -> Result<(), RepositoryError> {
        sqlx::query(
            r"
            INSERT INTO pms.store_stock (store_id, stock_id)
            VALUES ($1, $2)
            ",
        )
        .bind(store_id)
        .bind(stock_id)
        .execute(self.pool())
        .await
        .map_err(|e| {
            map_write_error(
                e,
                &format!("stock {stock_id} is already associated with store {store_id}"),
            )
        })?;

        Ok(())
    }

    async fn detach_stock(
        &self,
        store_id: &StoreId,
        stock_id: &StockId,
    ) -> Result<bool, RepositoryError> {
        let result = sqlx::query(
            r"
            DELETE FROM pms.store_stock
            WHERE store_id = $1 AND stock_id = $2
            ",
        )
        .bind(store_id)
        .bind(stock_id)
        .execute(self.pool())
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
