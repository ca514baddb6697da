//! HTTP route handlers for the pet store API.
//!
//! # Route Structure
//!
//! ```text
//! # Auth
//! POST   /auth/login                   - Exchange credentials for a token
//! POST   /auth/logout                  - Invalidate the caller's token
//!
//! # Stores
//! GET    /store                        - Store listing
//! POST   /store                        - Create store
//! PUT    /store                        - Update store (id in body)
//! GET    /store/{id}                   - Store detail
//! DELETE /store/{id}                   - Delete store
//! GET    /store/{id}/stock-manage      - Stocks associated with a store
//! PUT    /store/stock-manage           - Associate a stock (?store_id&stock_id)
//! DELETE /store/stock-manage           - Dissociate a stock (?store_id&stock_id)
//!
//! # Stocks
//! GET    /stock                        - Stock listing
//! POST   /stock                        - Create stock
//! PUT    /stock                        - Update stock (id in body)
//! GET    /stock/{id}                   - Stock detail
//! DELETE /stock/{id}                   - Delete stock
//! GET    /stock/{id}/product-manage    - Products held by a stock
//! PUT    /stock/product-manage         - Add units (?stock_id&product_id&count)
//! DELETE /stock/product-manage         - Remove units (?stock_id&product_id&count)
//!
//! # Products
//! GET    /product                      - Product listing
//! POST   /product                      - Create product
//! PUT    /product                      - Update product (id in body)
//! GET    /product/{id}                 - Product detail
//! DELETE /product/{id}                 - Delete product
//!
//! # Users (admin)
//! GET    /user                         - User listing
//! POST   /user                         - Create user and cart
//! PUT    /user                         - Update user (id in body)
//! GET    /user/{id}                    - User detail (own record for non-admins)
//! DELETE /user/{id}                    - Delete user and cart
//!
//! # Carts (owner or admin)
//! GET    /cart/{user_id}               - Cart of a user, with total
//! DELETE /cart/{user_id}               - Clear the cart
//! PUT    /cart/product-manage          - Add units (?cart_id&product_stock_id&count)
//! DELETE /cart/product-manage          - Remove units (?cart_id&product_stock_id&count)
//! ```
//!
//! Query parameters also accept camelCase (`storeId`, `productStockId`, ...).

pub mod auth;
pub mod carts;
pub mod products;
pub mod stocks;
pub mod stores;
pub mod users;

use axum::{
    Router,
    routing::{get, post, put},
};

use crate::state::AppState;

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/login", post(auth::login))
        .route("/auth/logout", post(auth::logout))
}

/// Create the store routes router.
pub fn store_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/store",
            get(stores::list).post(stores::create).put(stores::update),
        )
        .route(
            "/store/stock-manage",
            put(stores::add_stock).delete(stores::remove_stock),
        )
        .route("/store/{id}", get(stores::show).delete(stores::delete))
        .route("/store/{id}/stock-manage", get(stores::list_stocks))
}

/// Create the stock routes router.
pub fn stock_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/stock",
            get(stocks::list).post(stocks::create).put(stocks::update),
        )
        .route(
            "/stock/product-manage",
            put(stocks::add_product).delete(stocks::remove_product),
        )
        .route("/stock/{id}", get(stocks::show).delete(stocks::delete))
        .route("/stock/{id}/product-manage", get(stocks::list_products))
}

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/product",
            get(products::list)
                .post(products::create)
                .put(products::update),
        )
        .route(
            "/product/{id}",
            get(products::show).delete(products::delete),
        )
}

/// Create the user routes router.
pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/user",
            get(users::list).post(users::create).put(users::update),
        )
        .route("/user/{id}", get(users::show).delete(users::delete))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/cart/product-manage",
            put(carts::add_product).delete(carts::remove_product),
        )
        .route("/cart/{user_id}", get(carts::show).delete(carts::clear))
}

/// Create all API routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(auth_routes())
        .merge(store_routes())
        .merge(stock_routes())
        .merge(product_routes())
        .merge(user_routes())
        .merge(cart_routes())
}
