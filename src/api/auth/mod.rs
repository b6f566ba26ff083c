//! Sign-in endpoint
//!
//! Exchanges an email or username and password for a session token. Tokens
//! are stateless; there is nothing to revoke on sign-out.

use axum::extract::State;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::api::state::AppState;
use crate::api::types::{ApiError, Json};

pub const TOKEN_TYPE: &str = "Token";

/// Sign-in request; `username` may also hold the email
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub token: String,
    pub token_type: String,
    /// Seconds until the token expires
    pub expires: i64,
    pub created_at: DateTime<Utc>,
}

/// POST /api/token
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<TokenResponse>, ApiError> {
    let user = state
        .user_service
        .authenticate(&request.username, &request.password)
        .await?;

    let issued = state.jwt_service.generate(&user)?;
    info!(email = %user.email(), "User signed in");

    Ok(Json(TokenResponse {
        token: issued.token,
        token_type: TOKEN_TYPE.to_string(),
        expires: issued.expires,
        created_at: issued.created_at,
    }))
}

#[cfg(test)]
mod tests {
    use crate::api::testing::{sign_up, test_server, PASSWORD};
    use axum::http::StatusCode;
    use serde_json::{json, Value};

    #[tokio::test]
    async fn test_login_by_email_and_username() {
        let server = test_server().await;
        sign_up(&server, "bob").await;

        for login in ["bob@bar.example.org", "bob"] {
            let response = server
                .post("/api/token")
                .json(&json!({"username": login, "password": PASSWORD}))
                .await;

            response.assert_status_ok();
            let body: Value = response.json();
            assert_eq!(body["token_type"], "Token");
            assert_eq!(body["expires"], 24 * 3600);
            assert!(body["token"].as_str().is_some_and(|t| !t.is_empty()));
            assert!(body["created_at"].is_string());
        }
    }

    #[tokio::test]
    async fn test_login_failures_are_indistinguishable() {
        let server = test_server().await;
        sign_up(&server, "bob").await;

        let attempts = [
            json!({"username": "bob", "password": "wrong"}),
            json!({"username": "nobody", "password": PASSWORD}),
            json!({"username": "bob"}),
        ];

        for attempt in attempts {
            let response = server.post("/api/token").json(&attempt).await;

            response.assert_status(StatusCode::BAD_REQUEST);
            response.assert_json(&json!({
                "error": "bad_request",
                "error_description": "Invalid Username or Password."
            }));
        }
    }

    #[tokio::test]
    async fn test_token_works_with_bearer_scheme() {
        let server = test_server().await;
        let token = sign_up(&server, "bob").await;
        let bearer = token.replacen("Token ", "Bearer ", 1);

        server
            .get("/api/users/teams")
            .add_header("authorization", bearer.as_str())
            .await
            .assert_status_ok();
    }
}
