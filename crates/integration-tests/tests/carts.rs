//! Cart lines and totals.

#![allow(clippy::unwrap_used)]

use axum::http::{Method, StatusCode};
use serde_json::Value;

use pet_store_core::{Authority, UserId};
use pet_store_integration_tests::TestContext;

struct Shop {
    ctx: TestContext,
    user: UserId,
    token: String,
    cart: String,
    product_stock: String,
}

/// A user with an empty cart, and a stock holding 5 units of a 2.50 product.
async fn shop() -> Shop {
    let ctx = TestContext::new().await;
    let stock = ctx.create_stock("aquaristics").await;
    let product = ctx.create_product("Fish food", "2.50").await;
    ctx.admin(
        Method::PUT,
        &format!("/stock/product-manage?stock_id={stock}&product_id={product}&count=5"),
        None,
    )
    .await;
    let (_, rows) = ctx
        .admin(Method::GET, &format!("/stock/{stock}/product-manage"), None)
        .await;
    let product_stock = rows[0]["id"].as_str().unwrap().to_owned();

    let (user, token) = ctx.user_with_role("kate", Authority::User).await;
    let (status, body) = ctx
        .send(Method::GET, &format!("/cart/{user}"), Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    let cart = body["id"].as_str().unwrap().to_owned();

    Shop {
        ctx,
        user,
        token,
        cart,
        product_stock,
    }
}

impl Shop {
    async fn change(&self, method: Method, count: u32) -> (StatusCode, Value) {
        let uri = format!(
            "/cart/product-manage?cartId={}&productStockId={}&count={count}",
            self.cart, self.product_stock
        );
        self.ctx.send(method, &uri, Some(&self.token), None).await
    }
}

#[tokio::test]
async fn test_new_user_has_empty_cart() {
    let shop = shop().await;

    let (_, body) = shop
        .ctx
        .send(
            Method::GET,
            &format!("/cart/{}", shop.user),
            Some(&shop.token),
            None,
        )
        .await;
    assert!(body["lines"].as_array().unwrap().is_empty());
    assert_eq!(body["total_cost"], "0");
}

#[tokio::test]
async fn test_total_follows_lines() {
    let shop = shop().await;

    let (status, body) = shop.change(Method::PUT, 2).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["lines"][0]["count"], 2);
    assert_eq!(body["total_cost"], "5.00");

    let (_, body) = shop.change(Method::PUT, 1).await;
    assert_eq!(body["lines"][0]["count"], 3);
    assert_eq!(body["total_cost"], "7.50");

    let (_, body) = shop.change(Method::DELETE, 3).await;
    assert!(body["lines"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_cannot_take_more_than_stock_holds() {
    let shop = shop().await;

    let (status, body) = shop.change(Method::PUT, 6).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_clear_cart() {
    let shop = shop().await;
    shop.change(Method::PUT, 4).await;

    let (status, body) = shop
        .ctx
        .send(
            Method::DELETE,
            &format!("/cart/{}", shop.user),
            Some(&shop.token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["lines"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_other_users_cart_is_forbidden() {
    let shop = shop().await;
    let (_, intruder) = shop.ctx.user_with_role("sam", Authority::User).await;

    let (status, _) = shop
        .ctx
        .send(
            Method::GET,
            &format!("/cart/{}", shop.user),
            Some(&intruder),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let uri = format!(
        "/cart/product-manage?cart_id={}&product_stock_id={}&count=1",
        shop.cart, shop.product_stock
    );
    let (status, _) = shop
        .ctx
        .send(Method::PUT, &uri, Some(&intruder), None)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // Admins may manage any cart
    let (status, _) = shop.ctx.admin(Method::PUT, &uri, None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_unknown_cart_looks_like_a_foreign_one() {
    let shop = shop().await;
    let uri = format!(
        "/cart/product-manage?cart_id=no-such-cart&product_stock_id={}&count=1",
        shop.product_stock
    );

    for method in [Method::PUT, Method::DELETE] {
        let (status, body) = shop
            .ctx
            .send(method.clone(), &uri, Some(&shop.token), None)
            .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["error"], "Not your cart");

        let (status, _) = shop.ctx.admin(method, &uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
