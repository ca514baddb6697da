//! Integration tests for the `PostgreSQL` storage backend.
//!
//! These tests require a real `PostgreSQL` database and use SQLx test macros,
//! so every test runs against a freshly migrated database of its own.
//!
//! Run with: `DATABASE_URL=postgres://... cargo test -p pet-store-server --test postgres_storage`

#![allow(clippy::unwrap_used)]

use indexmap::IndexSet;

use pet_store_core::{Cost, ProductId, ProductStockId, StockId, StoreId};
use pet_store_server::db::{
    PgStorage, ProductRepository, RepositoryError, StockRepository, StoreRepository,
};
use pet_store_server::models::{Product, ProductStock, Stock, Store};

fn make_store(id: &str) -> Store {
    Store {
        id: StoreId::new(id),
        name: "Central".to_string(),
        address: None,
        details: None,
        discounts: false,
        logo: None,
        mail: None,
        phone: None,
        skype: None,
        stocks: IndexSet::new(),
    }
}

fn make_stock(id: &str) -> Stock {
    Stock {
        id: StockId::new(id),
        manager: None,
        specialize: Some("aquaristics".to_string()),
        address: None,
        phone: None,
    }
}

/// A store `S1` and the given stocks, none associated yet.
async fn seed(storage: &PgStorage, stocks: &[&str]) {
    storage.insert_store(&make_store("S1")).await.unwrap();
    for id in stocks {
        storage.insert_stock(&make_stock(id)).await.unwrap();
    }
}

// ============================================================================
// Store↔Stock associations
// ============================================================================

#[sqlx::test(migrations = "./migrations")]
async fn test_duplicate_association_is_conflict(pool: sqlx::PgPool) {
    let storage = PgStorage::new(pool.clone());
    seed(&storage, &["K1"]).await;
    let sid = StoreId::new("S1");
    let kid = StockId::new("K1");

    storage.attach_stock(&sid, &kid).await.unwrap();
    let err = storage.attach_stock(&sid, &kid).await.unwrap_err();
    assert!(matches!(err, RepositoryError::Conflict(_)), "{err:?}");

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM pms.store_stock")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 1);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_association_with_unknown_side_is_not_found(pool: sqlx::PgPool) {
    let storage = PgStorage::new(pool);
    seed(&storage, &["K1"]).await;

    let err = storage
        .attach_stock(&StoreId::new("S1"), &StockId::new("missing"))
        .await
        .unwrap_err();
    assert!(matches!(err, RepositoryError::NotFound), "{err:?}");

    let err = storage
        .attach_stock(&StoreId::new("missing"), &StockId::new("K1"))
        .await
        .unwrap_err();
    assert!(matches!(err, RepositoryError::NotFound), "{err:?}");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_store_stocks_keep_insertion_order(pool: sqlx::PgPool) {
    let storage = PgStorage::new(pool);
    seed(&storage, &["K1", "K2", "K3"]).await;
    let sid = StoreId::new("S1");

    // Attach out of id order so sorting by id would be caught
    for id in ["K3", "K1", "K2"] {
        storage.attach_stock(&sid, &StockId::new(id)).await.unwrap();
    }
    assert!(storage.detach_stock(&sid, &StockId::new("K1")).await.unwrap());
    storage.attach_stock(&sid, &StockId::new("K1")).await.unwrap();

    let store = storage.find_store(&sid).await.unwrap().unwrap();
    let order: Vec<&str> = store.stocks.iter().map(StockId::as_str).collect();
    assert_eq!(order, vec!["K3", "K2", "K1"]);

    let listed = storage.list_stores().await.unwrap();
    assert_eq!(listed[0].stocks, store.stocks);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_deleting_stock_cascades_to_associations(pool: sqlx::PgPool) {
    let storage = PgStorage::new(pool.clone());
    seed(&storage, &["K1", "K2"]).await;
    let sid = StoreId::new("S1");
    storage.attach_stock(&sid, &StockId::new("K1")).await.unwrap();
    storage.attach_stock(&sid, &StockId::new("K2")).await.unwrap();

    storage.delete_stock(&StockId::new("K1")).await.unwrap();

    let store = storage.find_store(&sid).await.unwrap().unwrap();
    assert!(!store.has_stock(&StockId::new("K1")));
    assert!(store.has_stock(&StockId::new("K2")));

    let rows: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM pms.store_stock WHERE stock_id = 'K1'")
            .fetch_one(&pool)
            .await
            .unwrap();
    assert_eq!(rows, 0);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_deleting_store_keeps_stocks(pool: sqlx::PgPool) {
    let storage = PgStorage::new(pool);
    seed(&storage, &["K1"]).await;
    storage
        .attach_stock(&StoreId::new("S1"), &StockId::new("K1"))
        .await
        .unwrap();

    storage.delete_store(&StoreId::new("S1")).await.unwrap();

    assert!(storage.find_store(&StoreId::new("S1")).await.unwrap().is_none());
    assert!(storage.find_stock(&StockId::new("K1")).await.unwrap().is_some());
}

// ============================================================================
// Product stocks
// ============================================================================

#[sqlx::test(migrations = "./migrations")]
async fn test_deleting_stock_cascades_to_product_stocks(pool: sqlx::PgPool) {
    let storage = PgStorage::new(pool);
    seed(&storage, &["K1"]).await;
    storage
        .insert_product(&Product {
            id: ProductId::new("P1"),
            name: "Fish food".to_string(),
            product_type: None,
            details: None,
            cost: Cost::ZERO,
            image: None,
        })
        .await
        .unwrap();
    storage
        .save_product_stock(&ProductStock {
            id: ProductStockId::new("PS1"),
            stock_id: StockId::new("K1"),
            product_id: ProductId::new("P1"),
            products_count: 5,
        })
        .await
        .unwrap();

    storage.delete_stock(&StockId::new("K1")).await.unwrap();

    let row = storage
        .find_product_stock(&ProductStockId::new("PS1"))
        .await
        .unwrap();
    assert!(row.is_none());
    assert!(storage.find_product(&ProductId::new("P1")).await.unwrap().is_some());
}
