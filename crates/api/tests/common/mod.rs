//! Shared helpers for API integration tests.
//!
//! Builds the real application router (same middleware stack as `main.rs`)
//! over the test database pool provided by `#[sqlx::test]`.

#![allow(dead_code)] // not every test binary uses every helper

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, Response, StatusCode};
use axum::Router;
use sqlx::PgPool;
use tower::ServiceExt;

use bureau_api::auth::jwt::{generate_access_token, JwtConfig};
use bureau_api::auth::password::hash_password;
use bureau_api::config::ServerConfig;
use bureau_api::router::build_app_router;
use bureau_api::state::AppState;
use bureau_core::roles::{ROLE_ADMIN, ROLE_CLIENT};
use bureau_core::types::DbId;

/// Signing secret shared by the test router and [`token_for`].
const TEST_JWT_SECRET: &str = "integration-test-secret";

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 30,
        uploads_root: std::env::temp_dir().join("bureau-test-uploads"),
        legacy_plaintext_login: false,
        jwt: JwtConfig {
            secret: TEST_JWT_SECRET.to_string(),
            access_token_expiry_mins: 60,
        },
    }
}

/// Build the full application router with all middleware layers, using the
/// given database pool.
pub fn build_test_app(pool: PgPool) -> Router {
    let config = test_config();
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
    };
    build_app_router(state, &config)
}

/// Mint an access token for the given customer id and role.
pub fn token_for(customer_id: DbId, role: &str) -> String {
    let config = test_config();
    generate_access_token(customer_id, role, &config.jwt).expect("token generation")
}

/// Insert a customer row directly, returning (id, bearer token).
pub async fn seed_customer(pool: &PgPool, email: &str, password: &str, role: &str) -> (DbId, String) {
    let password_hash = hash_password(password).expect("hashing");
    let id: DbId = sqlx::query_scalar(
        "INSERT INTO customers (first_name, last_name, email, password_hash, role)
         VALUES ($1, $2, $3, $4, $5)
         RETURNING id",
    )
    .bind("Test")
    .bind(if role == ROLE_ADMIN { "Admin" } else { "Client" })
    .bind(email)
    .bind(&password_hash)
    .bind(role)
    .fetch_one(pool)
    .await
    .expect("seed customer");

    let token = token_for(id, role);
    (id, token)
}

/// Seed an admin account and return its bearer token.
pub async fn seed_admin(pool: &PgPool) -> String {
    let (_, token) = seed_customer(pool, "admin@bureau.test", "admin-password", ROLE_ADMIN).await;
    token
}

/// Seed a client account and return (id, bearer token).
pub async fn seed_client(pool: &PgPool, email: &str) -> (DbId, String) {
    seed_customer(pool, email, "client-password", ROLE_CLIENT).await
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

/// Issue a GET request without authentication.
pub async fn get(app: Router, uri: &str) -> Response<Body> {
    app.oneshot(
        Request::builder()
            .uri(uri)
            .body(Body::empty())
            .unwrap(),
    )
    .await
    .unwrap()
}

/// Issue a GET request with a Bearer token.
pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    app.oneshot(
        Request::builder()
            .uri(uri)
            .header("authorization", format!("Bearer {token}"))
            .body(Body::empty())
            .unwrap(),
    )
    .await
    .unwrap()
}

/// Issue a JSON request with an optional Bearer token.
pub async fn send_json(
    app: Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: serde_json::Value,
) -> Response<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json");
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    app.oneshot(builder.body(Body::from(body.to_string())).unwrap())
        .await
        .unwrap()
}

/// Issue a POST with a JSON body.
pub async fn post_json(
    app: Router,
    uri: &str,
    token: Option<&str>,
    body: serde_json::Value,
) -> Response<Body> {
    send_json(app, "POST", uri, token, body).await
}

/// Issue a PATCH with a JSON body.
pub async fn patch_json(
    app: Router,
    uri: &str,
    token: Option<&str>,
    body: serde_json::Value,
) -> Response<Body> {
    send_json(app, "PATCH", uri, token, body).await
}

/// Collect a response body into JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    use http_body_util::BodyExt;
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null)
}

/// Assert a response status and return the parsed body for further checks.
pub async fn expect_status(response: Response<Body>, status: StatusCode) -> serde_json::Value {
    let actual = response.status();
    let body = body_json(response).await;
    assert_eq!(actual, status, "unexpected status; body: {body}");
    body
}
