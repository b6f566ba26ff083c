//! Caller identity resolved from a session token

use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts, HeaderMap},
};
use tracing::debug;

use crate::api::state::AppState;
use crate::api::types::ApiError;
use crate::domain::user::User;
use crate::domain::DomainError;
use crate::infrastructure::auth::INVALID_TOKEN;

pub const AUTHENTICATION_REQUIRED: &str =
    "Authentication required. Send 'Authorization: Token <token>'.";

/// Extractor that requires a valid session token
///
/// Accepts `Authorization: Token <jwt>` and `Authorization: Bearer <jwt>`.
/// The token must resolve to a user that still exists.
#[derive(Debug, Clone)]
pub struct RequireUser(pub User);

impl FromRequestParts<AppState> for RequireUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = extract_token(&parts.headers)?;

        let claims = state.jwt_service.validate(&token)?;
        let email = claims.email()?;

        let user = match state.user_service.find_user_by_email(&email).await {
            Ok(user) => user,
            Err(DomainError::NotFound { .. }) => {
                debug!(email = %email, "Token for a deleted user");
                return Err(ApiError::unauthorized(INVALID_TOKEN));
            }
            Err(e) => return Err(e.into()),
        };

        Ok(RequireUser(user))
    }
}

/// Pull the token out of the Authorization header
pub fn extract_token(headers: &HeaderMap) -> Result<String, ApiError> {
    let value = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .unwrap_or_default();

    let token = value
        .strip_prefix("Token ")
        .or_else(|| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty());

    match token {
        Some(token) => Ok(token.to_string()),
        None => Err(ApiError::unauthorized(AUTHENTICATION_REQUIRED)),
    }
}
