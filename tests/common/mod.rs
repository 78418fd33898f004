//! Shared helpers for integration tests: an app instance backed by a
//! throwaway SQLite file, plus request plumbing.

#![allow(dead_code)]

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use serde_json::{Value, json};
use tempfile::TempDir;
use tower::ServiceExt;

use tableside::db::{self, AppState};
use tableside::email::EmailService;
use tableside::handlers;
use tableside::jwt::TokenService;

pub const TEST_PASSWORD: &str = "Secret123!";

pub struct TestApp {
    pub app: Router,
    pub state: AppState,
    _tmp: TempDir,
}

pub fn spawn_app() -> TestApp {
    spawn_app_with_token_ttl(3600)
}

pub fn spawn_app_with_token_ttl(token_ttl_secs: u64) -> TestApp {
    let tmp = TempDir::new().unwrap();
    let manager = SqliteConnectionManager::file(tmp.path().join("test.db"));
    let pool = Pool::builder().max_size(4).build(manager).unwrap();
    {
        let conn = pool.get().unwrap();
        db::init_db(&conn).unwrap();
    }

    let state = AppState {
        db: pool,
        tokens: TokenService::new("integration-test-signing-secret", token_ttl_secs),
        email: EmailService::new(None, "no-reply@tableside.local".into(), None, false),
        // Minimum cost keeps the hashing-heavy tests fast
        bcrypt_cost: 4,
    };

    TestApp {
        app: handlers::app(state.clone()),
        state,
        _tmp: tmp,
    }
}

/// Fire a request and collect the response as (status, parsed JSON body).
pub async fn send_json(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("Authorization", format!("Bearer {}", token));
    }

    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

pub fn base_registration(email: &str) -> Value {
    json!({
        "name": "Test User",
        "email": email,
        "password": TEST_PASSWORD,
        "phoneNumber": "0911222333",
        "address": "Test Street",
        "roles": ["CUSTOMER"],
    })
}

pub async fn register(app: &Router, body: Value) -> (StatusCode, Value) {
    send_json(app, "POST", "/auth/register", None, Some(body)).await
}

pub async fn login(app: &Router, email: &str, password: &str) -> (StatusCode, Value) {
    send_json(
        app,
        "POST",
        "/auth/login",
        None,
        Some(json!({ "email": email, "password": password })),
    )
    .await
}

/// Register a user with the given roles and log it in, returning the token.
pub async fn register_and_login(app: &Router, email: &str, roles: &[&str]) -> String {
    let mut body = base_registration(email);
    body["roles"] = json!(roles);

    let (status, body_out) = register(app, body).await;
    assert_eq!(status, StatusCode::OK, "register failed: {}", body_out);

    let (status, body_out) = login(app, email, TEST_PASSWORD).await;
    assert_eq!(status, StatusCode::OK, "login failed: {}", body_out);

    body_out["data"]["token"].as_str().unwrap().to_string()
}
