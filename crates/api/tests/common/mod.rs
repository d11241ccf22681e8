#![allow(dead_code)]

use std::time::Duration;

use axum::body::Body;
use axum::http::{HeaderValue, Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use sqlx::PgPool;
use tower::ServiceExt;

use trainreg_api::config::{DatabaseConfig, ServerConfig};
use trainreg_api::router::build_app_router;
use trainreg_api::state::AppState;
use trainreg_core::cache::CacheWindows;

/// Build a test `ServerConfig` with safe defaults.
///
/// Uses `http://localhost:5173` as CORS origin (matching the dev default)
/// and a 30-second request timeout. The database section is unused: tests
/// hand in their own pool.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec![HeaderValue::from_static("http://localhost:5173")],
        request_timeout_secs: 30,
        database: DatabaseConfig {
            url: None,
            host: "localhost".to_string(),
            port: 5432,
            name: "training".to_string(),
            user: "postgres".to_string(),
            password: None,
            max_connections: 1,
        },
        cache: CacheWindows::default(),
        session_idle_timeout: Duration::from_secs(1800),
    }
}

/// Build the full application router with all middleware layers, using the
/// given database pool.
pub fn build_test_app(pool: PgPool) -> Router {
    let config = test_config();
    let state = AppState::new(pool, config.clone());
    build_app_router(state, &config)
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

pub async fn send(
    app: Router,
    method: Method,
    uri: &str,
    body: Option<Value>,
) -> Response<Body> {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::GET, uri, None).await
}

pub async fn post_json(app: Router, uri: &str, body: Value) -> Response<Body> {
    send(app, Method::POST, uri, Some(body)).await
}

pub async fn post_empty(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::POST, uri, None).await
}

pub async fn delete(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::DELETE, uri, None).await
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

// ---------------------------------------------------------------------------
// Seed data
// ---------------------------------------------------------------------------

pub async fn insert_system(pool: &PgPool, id: i64, name: &str) {
    sqlx::query("INSERT INTO systems (id, name) VALUES ($1, $2)")
        .bind(id)
        .bind(name)
        .execute(pool)
        .await
        .unwrap();
}

pub async fn insert_employee(pool: &PgPool, id: i64, name: &str) {
    sqlx::query("INSERT INTO employees (id, name) VALUES ($1, $2)")
        .bind(id)
        .bind(name)
        .execute(pool)
        .await
        .unwrap();
}

/// Systems `[{1, "WMS"}]`, employees `[{10, "A"}, {11, "B"}]`, no assignments.
pub async fn seed_scenario(pool: &PgPool) {
    insert_system(pool, 1, "WMS").await;
    insert_employee(pool, 10, "A").await;
    insert_employee(pool, 11, "B").await;
}

/// System 1 with `n` employees (ids `100..100+n`) all registered on it.
pub async fn seed_assignments(pool: &PgPool, n: i64) {
    insert_system(pool, 1, "WMS").await;
    for i in 0..n {
        insert_employee(pool, 100 + i, &format!("Employee {i:03}")).await;
        sqlx::query(
            "INSERT INTO user_systems (user_id, system_id, training_date) \
             VALUES ($1, 1, '2026-03-14')",
        )
        .bind(100 + i)
        .execute(pool)
        .await
        .unwrap();
    }
}
