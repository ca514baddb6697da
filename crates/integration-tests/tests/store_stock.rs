//! Store↔Stock association endpoints.

#![allow(clippy::unwrap_used)]

use axum::http::{Method, StatusCode};
use serde_json::Value;

use pet_store_core::Authority;
use pet_store_integration_tests::{TestContext, ids_of};

#[tokio::test]
async fn test_add_list_remove_round_trip() {
    let ctx = TestContext::new().await;
    let store = ctx.create_store("Central").await;
    let stock = ctx.create_stock("aquaristics").await;

    let (status, _) = ctx
        .admin(
            Method::PUT,
            &format!("/store/stock-manage?store_id={store}&stock_id={stock}"),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body) = ctx
        .admin(Method::GET, &format!("/store/{store}/stock-manage"), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ids_of(&body), vec![stock.clone()]);

    let (status, _) = ctx
        .admin(
            Method::DELETE,
            &format!("/store/stock-manage?store_id={store}&stock_id={stock}"),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, body) = ctx
        .admin(Method::GET, &format!("/store/{store}/stock-manage"), None)
        .await;
    assert_eq!(body, Value::Array(vec![]));

    // The stock itself is untouched
    let (status, _) = ctx.admin(Method::GET, &format!("/stock/{stock}"), None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_camel_case_query_parameters() {
    let ctx = TestContext::new().await;
    let store = ctx.create_store("Central").await;
    let stock = ctx.create_stock("terraristics").await;

    let (status, _) = ctx
        .admin(
            Method::PUT,
            &format!("/store/stock-manage?storeId={store}&stockId={stock}"),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = ctx
        .admin(
            Method::DELETE,
            &format!("/store/stock-manage?storeId={store}&stockId={stock}"),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn test_list_keeps_insertion_order() {
    let ctx = TestContext::new().await;
    let store = ctx.create_store("Central").await;
    let first = ctx.create_stock("first").await;
    let second = ctx.create_stock("second").await;

    for stock in [&second, &first] {
        let (status, _) = ctx
            .admin(
                Method::PUT,
                &format!("/store/stock-manage?store_id={store}&stock_id={stock}"),
                None,
            )
            .await;
        assert_eq!(status, StatusCode::NO_CONTENT);
    }

    let (_, body) = ctx
        .admin(Method::GET, &format!("/store/{store}/stock-manage"), None)
        .await;
    assert_eq!(ids_of(&body), vec![second, first]);
}

#[tokio::test]
async fn test_duplicate_add_is_rejected() {
    let ctx = TestContext::new().await;
    let store = ctx.create_store("Central").await;
    let stock = ctx.create_stock("aquaristics").await;
    let uri = format!("/store/stock-manage?store_id={store}&stock_id={stock}");

    let (status, _) = ctx.admin(Method::PUT, &uri, None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body) = ctx.admin(Method::PUT, &uri, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("already"));

    let (_, body) = ctx
        .admin(Method::GET, &format!("/store/{store}/stock-manage"), None)
        .await;
    assert_eq!(ids_of(&body).len(), 1);
}

#[tokio::test]
async fn test_unknown_ids_are_not_found() {
    let ctx = TestContext::new().await;
    let store = ctx.create_store("Central").await;
    let stock = ctx.create_stock("aquaristics").await;

    let (status, _) = ctx
        .admin(
            Method::PUT,
            &format!("/store/stock-manage?store_id=missing&stock_id={stock}"),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = ctx
        .admin(
            Method::PUT,
            &format!("/store/stock-manage?store_id={store}&stock_id=missing"),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = ctx
        .admin(Method::GET, "/store/missing/stock-manage", None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_missing_query_parameter_is_bad_request() {
    let ctx = TestContext::new().await;
    let store = ctx.create_store("Central").await;

    for method in [Method::PUT, Method::DELETE] {
        let (status, body) = ctx
            .admin(method, &format!("/store/stock-manage?store_id={store}"), None)
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("stock_id"), "{body}");
    }

    let (status, body) = ctx
        .admin(Method::PUT, "/store/stock-manage?store_id=S1", None)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_removing_absent_association_is_not_found() {
    let ctx = TestContext::new().await;
    let store = ctx.create_store("Central").await;
    let stock = ctx.create_stock("aquaristics").await;

    let (status, _) = ctx
        .admin(
            Method::DELETE,
            &format!("/store/stock-manage?store_id={store}&stock_id={stock}"),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_deleting_stock_drops_it_from_stores() {
    let ctx = TestContext::new().await;
    let store = ctx.create_store("Central").await;
    let stock = ctx.create_stock("aquaristics").await;
    ctx.admin(
        Method::PUT,
        &format!("/store/stock-manage?store_id={store}&stock_id={stock}"),
        None,
    )
    .await;

    let (status, _) = ctx
        .admin(Method::DELETE, &format!("/stock/{stock}"), None)
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, body) = ctx
        .admin(Method::GET, &format!("/store/{store}/stock-manage"), None)
        .await;
    assert_eq!(body, Value::Array(vec![]));
}

#[tokio::test]
async fn test_mutations_need_store_manager() {
    let ctx = TestContext::new().await;
    let store = ctx.create_store("Central").await;
    let stock = ctx.create_stock("aquaristics").await;
    let uri = format!("/store/stock-manage?store_id={store}&stock_id={stock}");

    let (_, stock_manager) = ctx
        .user_with_role("kate", Authority::StockManager)
        .await;
    let (status, _) = ctx
        .send(Method::PUT, &uri, Some(&stock_manager), None)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (_, store_manager) = ctx
        .user_with_role("sam", Authority::StoreManager)
        .await;
    let (status, _) = ctx
        .send(Method::PUT, &uri, Some(&store_manager), None)
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    // Listing is open to any authenticated caller
    let (status, _) = ctx
        .send(
            Method::GET,
            &format!("/store/{store}/stock-manage"),
            Some(&stock_manager),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
}
