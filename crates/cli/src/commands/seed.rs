//! Seed the database with demo data.
//!
//! Inserts one store supplied by one stock holding one product, enough to
//! exercise every endpoint by hand.

use rust_decimal::Decimal;
use tracing::info;

use pet_store_core::Cost;
use pet_store_server::models::{ProductInput, StockInput, StoreInput};
use pet_store_server::services::{
    ProductService, ServiceError, StockProductManager, StockService, StoreService,
    StoreStockManager,
};

use super::{CliError, connect};

/// Units of the demo product placed in the demo stock.
const DEMO_UNITS: u32 = 25;

/// Insert the demo store, stock and product.
///
/// Running it twice inserts a second, independent set.
///
/// # Errors
///
/// Returns `CliError` if the database is unreachable or an insert fails.
pub async fn demo() -> Result<(), CliError> {
    let storage = connect().await?;

    let store = StoreService::new(&storage)
        .create(StoreInput {
            name: Some("Central Pet Store".to_owned()),
            address: Some("1 Main Street".to_owned()),
            discounts: true,
            mail: Some("central@example.com".to_owned()),
            ..StoreInput::default()
        })
        .await?;
    info!(store_id = %store.id, "Store created");

    let stock = StockService::new(&storage)
        .create(StockInput {
            specialize: Some("aquaristics".to_owned()),
            address: Some("2 Depot Road".to_owned()),
            ..StockInput::default()
        })
        .await?;
    info!(stock_id = %stock.id, "Stock created");

    let cost = Cost::new(Decimal::new(499, 2)).map_err(ServiceError::from)?;
    let product = ProductService::new(&storage)
        .create(ProductInput {
            name: Some("Fish food".to_owned()),
            product_type: Some("food".to_owned()),
            cost: Some(cost),
            ..ProductInput::default()
        })
        .await?;
    info!(product_id = %product.id, "Product created");

    StoreStockManager::new(&storage)
        .add_association(&store.id, &stock.id)
        .await?;
    StockProductManager::new(&storage)
        .add_product(&stock.id, &product.id, DEMO_UNITS)
        .await?;

    info!("Seed complete!");
    Ok(())
}
