//! Store route handlers, including Store↔Stock association management.

use axum::{
    extract::{Path, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use pet_store_core::{StockId, StoreId};

use super::stocks::StockDto;
use crate::error::{AppError, Result};
use crate::extract::{Json, Query};
use crate::middleware::{RequireAuth, RequireStoreManager};
use crate::models::{Store, StoreInput};
use crate::services::{StoreService, StoreStockManager};
use crate::state::AppState;

// =============================================================================
// Request/Response Types
// =============================================================================

/// Store as returned to clients.
#[derive(Debug, Serialize, Deserialize)]
pub struct StoreDto {
    pub id: StoreId,
    pub name: String,
    pub address: Option<String>,
    pub details: Option<String>,
    pub discounts: bool,
    pub logo: Option<String>,
    pub mail: Option<String>,
    pub phone: Option<String>,
    pub skype: Option<String>,
}

impl From<&Store> for StoreDto {
    fn from(store: &Store) -> Self {
        Self {
            id: store.id.clone(),
            name: store.name.clone(),
            address: store.address.clone(),
            details: store.details.clone(),
            discounts: store.discounts,
            logo: store.logo.clone(),
            mail: store.mail.as_ref().map(ToString::to_string),
            phone: store.phone.clone(),
            skype: store.skype.clone(),
        }
    }
}

/// Create/update request body. `id` is required on update only.
#[derive(Debug, Default, Deserialize)]
pub struct StoreRequest {
    pub id: Option<StoreId>,
    pub name: Option<String>,
    pub address: Option<String>,
    pub details: Option<String>,
    #[serde(default)]
    pub discounts: bool,
    pub logo: Option<String>,
    pub mail: Option<String>,
    pub phone: Option<String>,
    pub skype: Option<String>,
}

impl StoreRequest {
    fn into_parts(self) -> (Option<StoreId>, StoreInput) {
        let input = StoreInput {
            name: self.name,
            address: self.address,
            details: self.details,
            discounts: self.discounts,
            logo: self.logo,
            mail: self.mail,
            phone: self.phone,
            skype: self.skype,
        };
        (self.id, input)
    }
}

/// Query for association mutations. Accepts `store_id` or `storeId`.
#[derive(Debug, Deserialize)]
pub struct AssociationQuery {
    #[serde(alias = "storeId")]
    pub store_id: StoreId,
    #[serde(alias = "stockId")]
    pub stock_id: StockId,
}

// =============================================================================
// Store CRUD
// =============================================================================

/// GET /store
#[instrument(skip_all)]
pub async fn list(
    State(state): State<AppState>,
    RequireAuth(_): RequireAuth,
) -> Result<Json<Vec<StoreDto>>> {
    tracing::info!("Start getAllStores");
    let stores = StoreService::new(state.storage()).list().await?;
    Ok(Json(stores.iter().map(StoreDto::from).collect()))
}

/// GET /store/{id}
#[instrument(skip_all, fields(store_id = %id))]
pub async fn show(
    State(state): State<AppState>,
    RequireAuth(_): RequireAuth,
    Path(id): Path<StoreId>,
) -> Result<Json<StoreDto>> {
    tracing::info!("Start findStoreById");
    let store = StoreService::new(state.storage()).find(&id).await?;
    Ok(Json(StoreDto::from(&store)))
}

/// POST /store
#[instrument(skip_all)]
pub async fn create(
    State(state): State<AppState>,
    RequireStoreManager(_): RequireStoreManager,
    Json(body): Json<StoreRequest>,
) -> Result<(StatusCode, Json<StoreDto>)> {
    tracing::info!("Start createStore");
    let (_, input) = body.into_parts();
    let store = StoreService::new(state.storage()).create(input).await?;
    Ok((StatusCode::CREATED, Json(StoreDto::from(&store))))
}

/// PUT /store
#[instrument(skip_all)]
pub async fn update(
    State(state): State<AppState>,
    RequireStoreManager(_): RequireStoreManager,
    Json(body): Json<StoreRequest>,
) -> Result<Json<StoreDto>> {
    tracing::info!("Start updateStore");
    let (id, input) = body.into_parts();
    let id = id.ok_or_else(|| AppError::BadRequest("id is required".to_string()))?;
    let store = StoreService::new(state.storage()).update(&id, input).await?;
    Ok(Json(StoreDto::from(&store)))
}

/// DELETE /store/{id}
#[instrument(skip_all, fields(store_id = %id))]
pub async fn delete(
    State(state): State<AppState>,
    RequireStoreManager(_): RequireStoreManager,
    Path(id): Path<StoreId>,
) -> Result<StatusCode> {
    tracing::info!("Start deleteStore");
    StoreService::new(state.storage()).delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// =============================================================================
// Stock Associations
// =============================================================================

/// GET /store/{id}/stock-manage
#[instrument(skip_all, fields(store_id = %id))]
pub async fn list_stocks(
    State(state): State<AppState>,
    RequireAuth(_): RequireAuth,
    Path(id): Path<StoreId>,
) -> Result<Json<Vec<StockDto>>> {
    tracing::info!("Start getStocks");
    let stocks = StoreStockManager::new(state.storage())
        .list_associations(&id)
        .await?;
    Ok(Json(stocks.iter().map(StockDto::from).collect()))
}

/// PUT /store/stock-manage?store_id=..&stock_id=..
#[instrument(skip_all, fields(store_id = %query.store_id, stock_id = %query.stock_id))]
pub async fn add_stock(
    State(state): State<AppState>,
    RequireStoreManager(_): RequireStoreManager,
    Query(query): Query<AssociationQuery>,
) -> Result<StatusCode> {
    tracing::info!("Start addStock");
    StoreStockManager::new(state.storage())
        .add_association(&query.store_id, &query.stock_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /store/stock-manage?store_id=..&stock_id=..
#[instrument(skip_all, fields(store_id = %query.store_id, stock_id = %query.stock_id))]
pub async fn remove_stock(
    State(state): State<AppState>,
    RequireStoreManager(_): RequireStoreManager,
    Query(query): Query<AssociationQuery>,
) -> Result<StatusCode> {
    tracing::info!("Start deleteStock");
    StoreStockManager::new(state.storage())
        .remove_association(&query.store_id, &query.stock_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_association_query_accepts_both_spellings() {
        let snake: AssociationQuery =
            serde_json::from_str(r#"{"store_id":"S1","stock_id":"K1"}"#).unwrap();
        let camel: AssociationQuery =
            serde_json::from_str(r#"{"storeId":"S1","stockId":"K1"}"#).unwrap();

        assert_eq!(snake.store_id, camel.store_id);
        assert_eq!(snake.stock_id.as_str(), "K1");
        assert_eq!(camel.stock_id.as_str(), "K1");
    }

    #[test]
    fn test_store_request_defaults() {
        let body: StoreRequest = serde_json::from_str(r#"{"name":"Central"}"#).unwrap();
        let (id, input) = body.into_parts();
        assert!(id.is_none());
        assert_eq!(input.name.as_deref(), Some("Central"));
        assert!(!input.discounts);
    }
}
