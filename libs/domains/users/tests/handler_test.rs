//! Handler tests for the users domain
//!
//! Run the users router against an in-memory database:
//! - signup and login, token issuance
//! - bearer auth on protected routes
//! - ownership (403) and missing resources (404)

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use axum_helpers::{JwtAuth, JwtConfig};
use domain_users::*;
use http_body_util::BodyExt;
use serde_json::{Value, json};
use test_utils::{TestDataBuilder, TestDatabase};
use tower::ServiceExt; // For oneshot()

const SECRET: &str = "handler-test-secret-that-is-long-enough";

async fn app() -> (Router, TestDatabase) {
    let db = TestDatabase::new().await;
    let service = UserService::new(SqlUserRepository::new(db.connection()));
    let auth = JwtAuth::new(&JwtConfig::new(SECRET));
    (handlers::router(service, auth), db)
}

async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

/// Sign up `who` and log in; returns (user id, token)
async fn register(app: &Router, data: &TestDataBuilder, who: &str) -> (String, String) {
    let email = data.email(who);
    let (status, user) = send(
        app,
        "POST",
        "/",
        None,
        Some(json!({ "name": who, "email": email, "password": "password123" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, token) = send(
        app,
        "POST",
        "/login",
        None,
        Some(json!({ "email": email, "password": "password123" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    (
        user["id"].as_str().unwrap().to_string(),
        token["access_token"].as_str().unwrap().to_string(),
    )
}

#[tokio::test]
async fn test_signup_returns_201_without_password_hash() {
    let (app, _db) = app().await;

    let (status, body) = send(
        &app,
        "POST",
        "/",
        None,
        Some(json!({ "name": "Ada", "email": "  Ada@Example.com ", "password": "password123" })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["email"], "ada@example.com");
    assert_eq!(body["is_active"], true);
    assert!(body.get("password_hash").is_none());
    assert!(body.get("password").is_none());
}

#[tokio::test]
async fn test_signup_duplicate_email_is_conflict() {
    let (app, _db) = app().await;
    let payload = json!({ "name": "Ada", "email": "ada@example.com", "password": "password123" });

    let (status, _) = send(&app, "POST", "/", None, Some(payload)).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(
        &app,
        "POST",
        "/",
        None,
        Some(json!({ "name": "Other", "email": "ADA@example.com", "password": "password456" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "CONFLICT");
}

#[tokio::test]
async fn test_signup_validates_input() {
    let (app, _db) = app().await;

    let (status, body) = send(
        &app,
        "POST",
        "/",
        None,
        Some(json!({ "name": "", "email": "nope", "password": "short" })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "VALIDATION_ERROR");
    assert!(body["details"].get("email").is_some());
    assert!(body["details"].get("password").is_some());

    let (status, body) = send(
        &app,
        "POST",
        "/",
        None,
        Some(json!({ "name": "   ", "email": "ada@example.com", "password": "password123" })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["details"].get("name").is_some());
}

#[tokio::test]
async fn test_login_issues_bearer_token() {
    let (app, _db) = app().await;
    let data = TestDataBuilder::from_test_name("login_token");
    let email = data.email("ada");

    send(
        &app,
        "POST",
        "/",
        None,
        Some(json!({ "name": "Ada", "email": email, "password": "password123" })),
    )
    .await;

    let (status, body) = send(
        &app,
        "POST",
        "/login",
        None,
        Some(json!({ "email": email.to_uppercase(), "password": "password123" })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["token_type"], "bearer");
    assert_eq!(body["expires_in"], 3600);

    let token = body["access_token"].as_str().unwrap();
    let claims = JwtAuth::new(&JwtConfig::new(SECRET))
        .verify_token(token)
        .unwrap();
    assert_eq!(claims.email, email);
}

#[tokio::test]
async fn test_login_bad_credentials_are_401() {
    let (app, _db) = app().await;
    let data = TestDataBuilder::from_test_name("login_401");
    register(&app, &data, "ada").await;

    let (status, body) = send(
        &app,
        "POST",
        "/login",
        None,
        Some(json!({ "email": data.email("ada"), "password": "wrong-password" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Incorrect email or password");

    let (status, _) = send(
        &app,
        "POST",
        "/login",
        None,
        Some(json!({ "email": data.email("nobody"), "password": "password123" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_protected_routes_require_token() {
    let (app, _db) = app().await;

    let (status, _) = send(&app, "GET", "/me", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(&app, "GET", "/me", Some("not-a-jwt"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_me_returns_caller() {
    let (app, _db) = app().await;
    let data = TestDataBuilder::from_test_name("me");
    let (id, token) = register(&app, &data, "ada").await;

    let (status, body) = send(&app, "GET", "/me", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], id);
    assert_eq!(body["email"], data.email("ada"));
}

#[tokio::test]
async fn test_other_users_are_forbidden() {
    let (app, _db) = app().await;
    let data = TestDataBuilder::from_test_name("forbidden");
    let (_ada_id, ada_token) = register(&app, &data, "ada").await;
    let (grace_id, _) = register(&app, &data, "grace").await;

    let uri = format!("/{}", grace_id);

    let (status, body) = send(&app, "GET", &uri, Some(&ada_token), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["message"], "Not authorized");

    let (status, _) = send(&app, "PUT", &uri, Some(&ada_token), Some(json!({ "name": "x" }))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(&app, "PUT", &uri, Some(&ada_token), Some(json!({ "name": "" }))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(&app, "DELETE", &uri, Some(&ada_token), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // Ownership is checked before existence
    let missing = format!("/{}", data.user_id());
    let (status, _) = send(&app, "GET", &missing, Some(&ada_token), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_update_self_and_relogin_with_new_password() {
    let (app, _db) = app().await;
    let data = TestDataBuilder::from_test_name("update_self");
    let (id, token) = register(&app, &data, "ada").await;

    let (status, body) = send(
        &app,
        "PUT",
        &format!("/{}", id),
        Some(&token),
        Some(json!({ "name": "Ada Lovelace", "password": "new-password-1" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Ada Lovelace");
    assert_eq!(body["email"], data.email("ada"));

    let (status, _) = send(
        &app,
        "POST",
        "/login",
        None,
        Some(json!({ "email": data.email("ada"), "password": "password123" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(
        &app,
        "POST",
        "/login",
        None,
        Some(json!({ "email": data.email("ada"), "password": "new-password-1" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_delete_self_then_lookups_are_404() {
    let (app, _db) = app().await;
    let data = TestDataBuilder::from_test_name("delete_self");
    let (id, token) = register(&app, &data, "ada").await;
    let uri = format!("/{}", id);

    let (status, body) = send(&app, "DELETE", &uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(body, Value::Null);

    // The token outlives the account
    let (status, _) = send(&app, "GET", &uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, "DELETE", &uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, "GET", "/me", Some(&token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_malformed_user_id_is_400() {
    let (app, _db) = app().await;
    let data = TestDataBuilder::from_test_name("bad_path");
    let (_, token) = register(&app, &data, "ada").await;

    let (status, body) = send(&app, "GET", "/not-a-uuid", Some(&token), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "INVALID_PATH");
}
