//! Login, logout and role checks.

#![allow(clippy::unwrap_used)]

use axum::http::{Method, StatusCode};
use serde_json::json;

use pet_store_core::Authority;
use pet_store_integration_tests::{PASSWORD, TestContext};

#[tokio::test]
async fn test_health_needs_no_token() {
    let ctx = TestContext::new().await;

    let (status, _) = ctx.send(Method::GET, "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = ctx.send(Method::GET, "/health/ready", None, None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_login_returns_usable_token() {
    let ctx = TestContext::new().await;
    ctx.user_with_role("kate", Authority::User).await;

    let (status, body) = ctx
        .send(
            Method::POST,
            "/auth/login",
            None,
            Some(json!({ "username": "kate", "password": PASSWORD })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["username"], "kate");
    assert_eq!(body["user"]["authority"], "ROLE_USER");

    let token = body["token"].as_str().unwrap();
    let (status, _) = ctx.send(Method::GET, "/store", Some(token), None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_wrong_password_is_unauthorized() {
    let ctx = TestContext::new().await;

    let (status, body) = ctx
        .send(
            Method::POST,
            "/auth/login",
            None,
            Some(json!({ "username": "admin", "password": "nope" })),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Invalid credentials");
}

#[tokio::test]
async fn test_missing_or_unknown_token_is_unauthorized() {
    let ctx = TestContext::new().await;

    let (status, body) = ctx.send(Method::GET, "/store", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(body["error"].is_string());

    let (status, body) = ctx
        .send(Method::GET, "/store", Some("not-a-token"), None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Authentication required");
}

#[tokio::test]
async fn test_logout_revokes_token() {
    let ctx = TestContext::new().await;
    let (_, token) = ctx.user_with_role("kate", Authority::User).await;

    let (status, _) = ctx
        .send(Method::POST, "/auth/logout", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = ctx.send(Method::GET, "/store", Some(&token), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_wrong_role_is_forbidden() {
    let ctx = TestContext::new().await;
    let (_, token) = ctx.user_with_role("kate", Authority::User).await;

    let (status, _) = ctx
        .send(
            Method::POST,
            "/store",
            Some(&token),
            Some(json!({ "name": "Central" })),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = ctx.send(Method::GET, "/user", Some(&token), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_deleted_user_loses_access() {
    let ctx = TestContext::new().await;
    let (id, token) = ctx.user_with_role("kate", Authority::User).await;

    let (status, _) = ctx
        .admin(Method::DELETE, &format!("/user/{id}"), None)
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = ctx.send(Method::GET, "/store", Some(&token), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_responses_carry_request_id_and_security_headers() {
    let ctx = TestContext::new().await;
    let request = axum::http::Request::builder()
        .uri("/health")
        .header("x-request-id", "req-42")
        .body(axum::body::Body::empty())
        .unwrap();

    let response = tower::ServiceExt::oneshot(ctx.app.clone(), request)
        .await
        .unwrap();
    let headers = response.headers();
    assert_eq!(headers["x-request-id"], "req-42");
    assert_eq!(headers["x-frame-options"], "DENY");
    assert_eq!(headers["x-content-type-options"], "nosniff");
}
