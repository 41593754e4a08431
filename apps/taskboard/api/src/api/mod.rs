use axum::{Json, Router, routing::get};
use axum_helpers::{create_router, health_router};
use serde_json::{Value, json};

use crate::openapi::ApiDoc;
use crate::state::AppState;

pub mod health;
pub mod tasks;
pub mod users;

/// API routes without the `/api` prefix; `create_router` adds it.
///
/// Tasks live under `/users/{user_id}/tasks`, so both domain routers share the
/// `/users` prefix.
pub fn routes(state: &AppState) -> Router {
    Router::new().nest("/users", users::router(state).merge(tasks::router(state)))
}

/// `/ready` with real dependency checks.
pub fn ready_router(state: AppState) -> Router {
    Router::new()
        .route("/ready", get(health::ready_handler))
        .with_state(state)
}

async fn root() -> Json<Value> {
    Json(json!({ "message": "API is running" }))
}

/// The complete application: API, docs, `/`, `/health` and `/ready`.
pub fn app(state: &AppState) -> std::io::Result<Router> {
    let router = create_router::<ApiDoc>(routes(state), &state.config.server)?;

    Ok(router
        .route("/", get(root))
        .merge(health_router(state.config.app.clone()))
        .merge(ready_router(state.clone())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Config, Environment};
    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use axum_helpers::JwtConfig;
    use core_config::{app_info, server::ServerConfig};
    use database::DatabaseConfig;
    use http_body_util::BodyExt;
    use test_utils::TestDatabase;
    use tower::ServiceExt;

    async fn test_app() -> (Router, TestDatabase) {
        let db = TestDatabase::new().await;
        let config = Config {
            app: app_info!(),
            server: ServerConfig::default(),
            database: DatabaseConfig::new("sqlite::memory:"),
            jwt: JwtConfig::new("integration-secret-0123456789abcdef"),
            environment: Environment::Development,
        };
        let state = AppState::new(config, db.connection());
        (app(&state).unwrap(), db)
    }

    async fn call(
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
        let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, json)
    }

    #[tokio::test]
    async fn test_root_health_and_ready() {
        let (app, _db) = test_app().await;

        let (status, body) = call(&app, "GET", "/", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "API is running");

        let (status, body) = call(&app, "GET", "/health", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["name"], "taskboard_api");

        let (status, body) = call(&app, "GET", "/ready", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["database"], "connected");
    }

    #[tokio::test]
    async fn test_full_flow_with_cascade() {
        let (app, _db) = test_app().await;

        let (status, user) = call(
            &app,
            "POST",
            "/api/users",
            None,
            Some(json!({ "name": "Ada", "email": "ada@example.com", "password": "password123" })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let user_id = user["id"].as_str().unwrap().to_string();

        let (status, token) = call(
            &app,
            "POST",
            "/api/users/login",
            None,
            Some(json!({ "email": "ada@example.com", "password": "password123" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let token = token["access_token"].as_str().unwrap().to_string();

        let (status, me) = call(&app, "GET", "/api/users/me", Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(me["id"], user_id);

        let tasks_uri = format!("/api/users/{}/tasks", user_id);
        for title in ["first", "second"] {
            let (status, _) = call(
                &app,
                "POST",
                &tasks_uri,
                Some(&token),
                Some(json!({ "title": title })),
            )
            .await;
            assert_eq!(status, StatusCode::CREATED);
        }

        let (status, page) = call(&app, "GET", &tasks_uri, Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(page["total"], 2);

        let (status, _) = call(
            &app,
            "DELETE",
            &format!("/api/users/{}", user_id),
            Some(&token),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        // Owner gone: the tasks went with it
        let (status, _) = call(&app, "GET", &tasks_uri, Some(&token), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_protected_route_without_token_is_401() {
        let (app, _db) = test_app().await;

        let (status, body) = call(&app, "GET", "/api/users/me", None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], "UNAUTHORIZED");
    }

    #[tokio::test]
    async fn test_docs_are_served() {
        let (app, _db) = test_app().await;

        let (status, doc) = call(&app, "GET", "/api-docs/openapi.json", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert!(doc["paths"].get("/users/{user_id}/tasks").is_some());
    }
}
