//! Product catalogue route handlers.

use axum::{
    extract::{Path, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use pet_store_core::{Cost, ProductId};

use crate::error::{AppError, Result};
use crate::extract::Json;
use crate::middleware::{RequireAuth, RequireStockManager};
use crate::models::{Product, ProductInput};
use crate::services::ProductService;
use crate::state::AppState;

// =============================================================================
// Request/Response Types
// =============================================================================

/// Product as returned to clients. `cost` is a decimal string, e.g. `"4.99"`.
#[derive(Debug, Serialize, Deserialize)]
pub struct ProductDto {
    pub id: ProductId,
    pub name: String,
    #[serde(rename = "type")]
    pub product_type: Option<String>,
    pub details: Option<String>,
    pub cost: Cost,
    pub image: Option<String>,
}

impl From<&Product> for ProductDto {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id.clone(),
            name: product.name.clone(),
            product_type: product.product_type.clone(),
            details: product.details.clone(),
            cost: product.cost,
            image: product.image.clone(),
        }
    }
}

/// Create/update request body. `id` is required on update only.
///
/// A negative `cost` is rejected while the body is parsed.
#[derive(Debug, Default, Deserialize)]
pub struct ProductRequest {
    pub id: Option<ProductId>,
    pub name: Option<String>,
    #[serde(rename = "type", alias = "product_type")]
    pub product_type: Option<String>,
    pub details: Option<String>,
    pub cost: Option<Cost>,
    pub image: Option<String>,
}

impl ProductRequest {
    fn into_parts(self) -> (Option<ProductId>, ProductInput) {
        let input = ProductInput {
            name: self.name,
            product_type: self.product_type,
            details: self.details,
            cost: self.cost,
            image: self.image,
        };
        (self.id, input)
    }
}

// =============================================================================
// Handlers
// =============================================================================

/// GET /product
#[instrument(skip_all)]
pub async fn list(
    State(state): State<AppState>,
    RequireAuth(_): RequireAuth,
) -> Result<Json<Vec<ProductDto>>> {
    tracing::info!("Start getAllProducts");
    let products = ProductService::new(state.storage()).list().await?;
    Ok(Json(products.iter().map(ProductDto::from).collect()))
}

/// GET /product/{id}
#[instrument(skip_all, fields(product_id = %id))]
pub async fn show(
    State(state): State<AppState>,
    RequireAuth(_): RequireAuth,
    Path(id): Path<ProductId>,
) -> Result<Json<ProductDto>> {
    tracing::info!("Start findProductById");
    let product = ProductService::new(state.storage()).find(&id).await?;
    Ok(Json(ProductDto::from(&product)))
}

/// POST /product
#[instrument(skip_all)]
pub async fn create(
    State(state): State<AppState>,
    RequireStockManager(_): RequireStockManager,
    Json(body): Json<ProductRequest>,
) -> Result<(StatusCode, Json<ProductDto>)> {
    tracing::info!("Start createProduct");
    let (_, input) = body.into_parts();
    let product = ProductService::new(state.storage()).create(input).await?;
    Ok((StatusCode::CREATED, Json(ProductDto::from(&product))))
}

/// PUT /product
#[instrument(skip_all)]
pub async fn update(
    State(state): State<AppState>,
    RequireStockManager(_): RequireStockManager,
    Json(body): Json<ProductRequest>,
) -> Result<Json<ProductDto>> {
    tracing::info!("Start updateProduct");
    let (id, input) = body.into_parts();
    let id = id.ok_or_else(|| AppError::BadRequest("id is required".to_string()))?;
    let product = ProductService::new(state.storage())
        .update(&id, input)
        .await?;
    Ok(Json(ProductDto::from(&product)))
}

/// DELETE /product/{id}
#[instrument(skip_all, fields(product_id = %id))]
pub async fn delete(
    State(state): State<AppState>,
    RequireStockManager(_): RequireStockManager,
    Path(id): Path<ProductId>,
) -> Result<StatusCode> {
    tracing::info!("Start deleteProduct");
    ProductService::new(state.storage()).delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}
