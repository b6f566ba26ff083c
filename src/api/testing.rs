//! Router fixtures for handler tests

use std::sync::Arc;

use axum_test::TestServer;
use serde_json::{json, Value};

use crate::api::router::create_router_with_state;
use crate::api::state::AppState;
use crate::build_app_state;
use crate::infrastructure::auth::{JwtConfig, JwtService};
use crate::infrastructure::storage::StorageFactory;
use crate::infrastructure::team::DetachedResourceCleaner;

pub const PASSWORD: &str = "123456";

pub async fn test_state() -> AppState {
    build_app_state(
        &StorageFactory::in_memory(),
        Arc::new(JwtService::new(JwtConfig::new("test-secret", 24))),
        Arc::new(DetachedResourceCleaner::new()),
    )
    .await
    .unwrap()
}

pub async fn test_server() -> TestServer {
    TestServer::new(create_router_with_state(test_state().await)).unwrap()
}

/// Register `<username>@bar.example.org` and return its `Token ...` header value
pub async fn sign_up(server: &TestServer, username: &str) -> String {
    let email = format!("{}@bar.example.org", username);

    server
        .post("/api/users")
        .json(&json!({
            "name": username,
            "email": email,
            "username": username,
            "password": PASSWORD,
        }))
        .await
        .assert_status(axum::http::StatusCode::CREATED);

    let response = server
        .post("/api/token")
        .json(&json!({"username": email, "password": PASSWORD}))
        .await;
    response.assert_status_ok();

    let body: Value = response.json();
    format!("Token {}", body["token"].as_str().unwrap())
}
