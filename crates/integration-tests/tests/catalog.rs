//! Store, stock, product and user CRUD.

#![allow(clippy::unwrap_used)]

use axum::http::{Method, StatusCode};
use serde_json::json;

use pet_store_core::Authority;
use pet_store_integration_tests::{TestContext, id_of, ids_of};

#[tokio::test]
async fn test_store_crud() {
    let ctx = TestContext::new().await;

    let (status, body) = ctx
        .admin(
            Method::POST,
            "/store",
            Some(json!({ "name": "Central", "mail": "central@example.com", "discounts": true })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = id_of(&body);
    assert_eq!(body["mail"], "central@example.com");
    assert_eq!(body["discounts"], true);

    let (status, body) = ctx
        .admin(
            Method::PUT,
            "/store",
            Some(json!({ "id": id, "name": "Central West" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Central West");
    assert_eq!(body["discounts"], false);

    let (status, body) = ctx.admin(Method::GET, &format!("/store/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Central West");

    let (status, _) = ctx
        .admin(Method::DELETE, &format!("/store/{id}"), None)
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = ctx.admin(Method::GET, &format!("/store/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_store_validation() {
    let ctx = TestContext::new().await;

    let (status, _) = ctx
        .admin(Method::POST, "/store", Some(json!({ "name": "   " })))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = ctx
        .admin(
            Method::POST,
            "/store",
            Some(json!({ "name": "Central", "mail": "not-an-email" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = ctx
        .admin(Method::PUT, "/store", Some(json!({ "name": "No id" })))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = ctx
        .admin(
            Method::PUT,
            "/store",
            Some(json!({ "id": "missing", "name": "Ghost" })),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_malformed_body_is_bad_request_with_json_error() {
    let ctx = TestContext::new().await;

    let (status, body) = ctx
        .admin(Method::POST, "/store", Some(json!({ "name": 5 })))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string(), "{body}");

    let (status, body) = ctx
        .admin(Method::POST, "/product", Some(json!("not an object")))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string(), "{body}");
}

#[tokio::test]
async fn test_store_listing_in_creation_order() {
    let ctx = TestContext::new().await;
    let first = ctx.create_store("First").await;
    let second = ctx.create_store("Second").await;

    let (status, body) = ctx.admin(Method::GET, "/store", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ids_of(&body), vec![first, second]);
}

#[tokio::test]
async fn test_stock_products_merge_and_drain() {
    let ctx = TestContext::new().await;
    let stock = ctx.create_stock("aquaristics").await;
    let product = ctx.create_product("Fish food", "4.99").await;

    for count in [3, 2] {
        let (status, _) = ctx
            .admin(
                Method::PUT,
                &format!("/stock/product-manage?stock_id={stock}&product_id={product}&count={count}"),
                None,
            )
            .await;
        assert_eq!(status, StatusCode::NO_CONTENT);
    }

    let (_, body) = ctx
        .admin(Method::GET, &format!("/stock/{stock}/product-manage"), None)
        .await;
    let rows = body.as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["products_count"], 5);

    let (status, _) = ctx
        .admin(
            Method::DELETE,
            &format!("/stock/product-manage?stockId={stock}&productId={product}&count=6"),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = ctx
        .admin(
            Method::DELETE,
            &format!("/stock/product-manage?stockId={stock}&productId={product}&count=5"),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, body) = ctx
        .admin(Method::GET, &format!("/stock/{stock}/product-manage"), None)
        .await;
    assert!(body.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_product_crud_and_negative_cost() {
    let ctx = TestContext::new().await;
    let id = ctx.create_product("Chew toy", "3.50").await;

    let (status, body) = ctx
        .admin(Method::GET, &format!("/product/{id}"), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["cost"], "3.50");

    let (status, body) = ctx
        .admin(
            Method::POST,
            "/product",
            Some(json!({ "name": "Bad", "cost": "-1.00" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());

    let (status, _) = ctx
        .admin(Method::DELETE, &format!("/product/{id}"), None)
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn test_user_crud_hides_password_hash() {
    let ctx = TestContext::new().await;

    let (status, body) = ctx
        .admin(
            Method::POST,
            "/user",
            Some(json!({
                "username": "kate",
                "password": "secret",
                "authority": "ROLE_STOCK_MANAGER",
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["authority"], "ROLE_STOCK_MANAGER");
    assert!(body.get("password_hash").is_none());
    assert!(body.get("password").is_none());

    let (status, _) = ctx
        .admin(
            Method::POST,
            "/user",
            Some(json!({ "username": "kate", "password": "other" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_user_reads_own_record_only() {
    let ctx = TestContext::new().await;
    let (kate, token) = ctx.user_with_role("kate", Authority::User).await;
    let (sam, _) = ctx.user_with_role("sam", Authority::User).await;

    let (status, body) = ctx
        .send(Method::GET, &format!("/user/{kate}"), Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["username"], "kate");

    let (status, _) = ctx
        .send(Method::GET, &format!("/user/{sam}"), Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}
