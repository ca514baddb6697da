//! Stock route handlers, including the products a stock holds.

use axum::{
    extract::{Path, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use pet_store_core::{ProductId, ProductStockId, StockId, UserId};

use crate::error::{AppError, Result};
use crate::extract::{Json, Query};
use crate::middleware::{RequireAuth, RequireStockManager};
use crate::models::{ProductStock, Stock, StockInput};
use crate::services::{StockProductManager, StockService};
use crate::state::AppState;

// =============================================================================
// Request/Response Types
// =============================================================================

/// Stock as returned to clients.
#[derive(Debug, Serialize, Deserialize)]
pub struct StockDto {
    pub id: StockId,
    pub manager_id: Option<UserId>,
    pub specialize: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
}

impl From<&Stock> for StockDto {
    fn from(stock: &Stock) -> Self {
        Self {
            id: stock.id.clone(),
            manager_id: stock.manager.clone(),
            specialize: stock.specialize.clone(),
            address: stock.address.clone(),
            phone: stock.phone.clone(),
        }
    }
}

/// Create/update request body. `id` is required on update only.
#[derive(Debug, Default, Deserialize)]
pub struct StockRequest {
    pub id: Option<StockId>,
    #[serde(alias = "managerId")]
    pub manager_id: Option<UserId>,
    pub specialize: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
}

impl StockRequest {
    fn into_parts(self) -> (Option<StockId>, StockInput) {
        let input = StockInput {
            manager: self.manager_id,
            specialize: self.specialize,
            address: self.address,
            phone: self.phone,
        };
        (self.id, input)
    }
}

/// Units of a product held by a stock.
#[derive(Debug, Serialize, Deserialize)]
pub struct ProductStockDto {
    pub id: ProductStockId,
    pub stock_id: StockId,
    pub product_id: ProductId,
    pub products_count: u32,
}

impl From<&ProductStock> for ProductStockDto {
    fn from(row: &ProductStock) -> Self {
        Self {
            id: row.id.clone(),
            stock_id: row.stock_id.clone(),
            product_id: row.product_id.clone(),
            products_count: row.products_count,
        }
    }
}

/// Query for product quantity changes. `count` defaults to one unit.
#[derive(Debug, Deserialize)]
pub struct ProductManageQuery {
    #[serde(alias = "stockId")]
    pub stock_id: StockId,
    #[serde(alias = "productId")]
    pub product_id: ProductId,
    #[serde(default = "one")]
    pub count: u32,
}

const fn one() -> u32 {
    1
}

// =============================================================================
// Stock CRUD
// =============================================================================

/// GET /stock
#[instrument(skip_all)]
pub async fn list(
    State(state): State<AppState>,
    RequireAuth(_): RequireAuth,
) -> Result<Json<Vec<StockDto>>> {
    tracing::info!("Start getAllStocks");
    let stocks = StockService::new(state.storage()).list().await?;
    Ok(Json(stocks.iter().map(StockDto::from).collect()))
}

/// GET /stock/{id}
#[instrument(skip_all, fields(stock_id = %id))]
pub async fn show(
    State(state): State<AppState>,
    RequireAuth(_): RequireAuth,
    Path(id): Path<StockId>,
) -> Result<Json<StockDto>> {
    tracing::info!("Start findStockById");
    let stock = StockService::new(state.storage()).find(&id).await?;
    Ok(Json(StockDto::from(&stock)))
}

/// POST /stock
#[instrument(skip_all)]
pub async fn create(
    State(state): State<AppState>,
    RequireStockManager(_): RequireStockManager,
    Json(body): Json<StockRequest>,
) -> Result<(StatusCode, Json<StockDto>)> {
    tracing::info!("Start createStock");
    let (_, input) = body.into_parts();
    let stock = StockService::new(state.storage()).create(input).await?;
    Ok((StatusCode::CREATED, Json(StockDto::from(&stock))))
}

/// PUT /stock
#[instrument(skip_all)]
pub async fn update(
    State(state): State<AppState>,
    RequireStockManager(_): RequireStockManager,
    Json(body): Json<StockRequest>,
) -> Result<Json<StockDto>> {
    tracing::info!("Start updateStock");
    let (id, input) = body.into_parts();
    let id = id.ok_or_else(|| AppError::BadRequest("id is required".to_string()))?;
    let stock = StockService::new(state.storage()).update(&id, input).await?;
    Ok(Json(StockDto::from(&stock)))
}

/// DELETE /stock/{id}
#[instrument(skip_all, fields(stock_id = %id))]
pub async fn delete(
    State(state): State<AppState>,
    RequireStockManager(_): RequireStockManager,
    Path(id): Path<StockId>,
) -> Result<StatusCode> {
    tracing::info!("Start deleteStock");
    StockService::new(state.storage()).delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// =============================================================================
// Product Quantities
// =============================================================================

/// GET /stock/{id}/product-manage
#[instrument(skip_all, fields(stock_id = %id))]
pub async fn list_products(
    State(state): State<AppState>,
    RequireAuth(_): RequireAuth,
    Path(id): Path<StockId>,
) -> Result<Json<Vec<ProductStockDto>>> {
    tracing::info!("Start getProducts");
    let rows = StockProductManager::new(state.storage())
        .list_products(&id)
        .await?;
    Ok(Json(rows.iter().map(ProductStockDto::from).collect()))
}

/// PUT /stock/product-manage?stock_id=..&product_id=..&count=..
#[instrument(skip_all, fields(stock_id = %query.stock_id, product_id = %query.product_id, count = query.count))]
pub async fn add_product(
    State(state): State<AppState>,
    RequireStockManager(_): RequireStockManager,
    Query(query): Query<ProductManageQuery>,
) -> Result<StatusCode> {
    tracing::info!("Start addProduct");
    StockProductManager::new(state.storage())
        .add_product(&query.stock_id, &query.product_id, query.count)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /stock/product-manage?stock_id=..&product_id=..&count=..
#[instrument(skip_all, fields(stock_id = %query.stock_id, product_id = %query.product_id, count = query.count))]
pub async fn remove_product(
    State(state): State<AppState>,
    RequireStockManager(_): RequireStockManager,
    Query(query): Query<ProductManageQuery>,
) -> Result<StatusCode> {
    tracing::info!("Start deleteProduct");
    StockProductManager::new(state.storage())
        .remove_product(&query.stock_id, &query.product_id, query.count)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
