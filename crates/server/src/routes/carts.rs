//! Shopping cart route handlers.
//!
//! A cart may be read and changed by its owner or an admin. Every response
//! carries the freshly computed total.

use axum::extract::{Path, State};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use pet_store_core::{Authority, CartId, Cost, ProductStockId, UserId};

use crate::error::{AppError, Result};
use crate::extract::{Json, Query};
use crate::middleware::RequireAuth;
use crate::models::{Cart, CurrentUser};
use crate::services::{CartManager, CartView, ServiceError};
use crate::state::AppState;

// =============================================================================
// Request/Response Types
// =============================================================================

/// Cart as returned to clients.
#[derive(Debug, Serialize, Deserialize)]
pub struct CartDto {
    pub id: CartId,
    pub user_id: UserId,
    pub lines: Vec<CartLineDto>,
    pub total_cost: Cost,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CartLineDto {
    pub product_stock_id: ProductStockId,
    pub count: u32,
}

impl From<&CartView> for CartDto {
    fn from(view: &CartView) -> Self {
        Self {
            id: view.cart.id.clone(),
            user_id: view.cart.user_id.clone(),
            lines: view
                .cart
                .lines
                .iter()
                .map(|line| CartLineDto {
                    product_stock_id: line.product_stock_id.clone(),
                    count: line.count,
                })
                .collect(),
            total_cost: view.total_cost,
        }
    }
}

/// Query for cart line changes. `count` defaults to one unit.
#[derive(Debug, Deserialize)]
pub struct CartLineQuery {
    #[serde(alias = "cartId")]
    pub cart_id: CartId,
    #[serde(alias = "productStockId")]
    pub product_stock_id: ProductStockId,
    #[serde(default = "one")]
    pub count: u32,
}

const fn one() -> u32 {
    1
}

fn ensure_owner(caller: &CurrentUser, owner: &UserId) -> Result<()> {
    if caller.is_self_or_admin(owner) {
        Ok(())
    } else {
        tracing::warn!(user_id = %caller.id, owner = %owner, "Cart access denied");
        Err(AppError::Forbidden("Not your cart".to_string()))
    }
}

/// Load a cart the caller may change. A missing cart is only reported as
/// such to admins; everyone else gets the same 403 as for a foreign cart.
async fn owned_cart(
    carts: &CartManager<'_>,
    caller: &CurrentUser,
    cart_id: &CartId,
) -> Result<Cart> {
    match carts.load(cart_id).await {
        Ok(cart) => {
            ensure_owner(caller, &cart.user_id)?;
            Ok(cart)
        }
        Err(ServiceError::NotFound { .. }) if caller.authority != Authority::Admin => {
            tracing::warn!(user_id = %caller.id, cart_id = %cart_id, "Cart access denied");
            Err(AppError::Forbidden("Not your cart".to_string()))
        }
        Err(e) => Err(e.into()),
    }
}

// =============================================================================
// Handlers
// =============================================================================

/// GET /cart/{user_id}
#[instrument(skip_all, fields(owner = %user_id))]
pub async fn show(
    State(state): State<AppState>,
    RequireAuth(caller): RequireAuth,
    Path(user_id): Path<UserId>,
) -> Result<Json<CartDto>> {
    tracing::info!("Start findCartByUser");
    ensure_owner(&caller, &user_id)?;
    let view = CartManager::new(state.storage()).find_cart(&user_id).await?;
    Ok(Json(CartDto::from(&view)))
}

/// DELETE /cart/{user_id}
#[instrument(skip_all, fields(owner = %user_id))]
pub async fn clear(
    State(state): State<AppState>,
    RequireAuth(caller): RequireAuth,
    Path(user_id): Path<UserId>,
) -> Result<Json<CartDto>> {
    tracing::info!("Start clearCart");
    ensure_owner(&caller, &user_id)?;
    let carts = CartManager::new(state.storage());
    let current = carts.find_cart(&user_id).await?;
    let view = carts.clear(&current.cart.id).await?;
    Ok(Json(CartDto::from(&view)))
}

/// PUT /cart/product-manage?cart_id=..&product_stock_id=..&count=..
#[instrument(skip_all, fields(cart_id = %query.cart_id, product_stock_id = %query.product_stock_id, count = query.count))]
pub async fn add_product(
    State(state): State<AppState>,
    RequireAuth(caller): RequireAuth,
    Query(query): Query<CartLineQuery>,
) -> Result<Json<CartDto>> {
    tracing::info!("Start addProductToCart");
    let carts = CartManager::new(state.storage());
    owned_cart(&carts, &caller, &query.cart_id).await?;

    let view = carts
        .add_product(&query.cart_id, &query.product_stock_id, query.count)
        .await?;
    Ok(Json(CartDto::from(&view)))
}

/// DELETE /cart/product-manage?cart_id=..&product_stock_id=..&count=..
#[instrument(skip_all, fields(cart_id = %query.cart_id, product_stock_id = %query.product_stock_id, count = query.count))]
pub async fn remove_product(
    State(state): State<AppState>,
    RequireAuth(caller): RequireAuth,
    Query(query): Query<CartLineQuery>,
) -> Result<Json<CartDto>> {
    tracing::info!("Start deleteProductFromCart");
    let carts = CartManager::new(state.storage());
    owned_cart(&carts, &caller, &query.cart_id).await?;

    let view = carts
        .remove_product(&query.cart_id, &query.product_stock_id, query.count)
        .await?;
    Ok(Json(CartDto::from(&view)))
}
