//! Account endpoints

use axum::{extract::State, http::StatusCode};
use serde::Deserialize;
use tracing::{debug, info};

use crate::api::middleware::RequireUser;
use crate::api::state::AppState;
use crate::api::types::{ApiError, Json, ListResponse};
use crate::domain::team::Team;
use crate::domain::user::User;
use crate::infrastructure::user::{CreateUserRequest, UpdatePasswordRequest};

/// Sign-up payload; missing fields are reported by validation, not parsing
#[derive(Debug, Clone, Deserialize)]
pub struct CreateUserApiRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

impl From<CreateUserApiRequest> for CreateUserRequest {
    fn from(request: CreateUserApiRequest) -> Self {
        Self {
            name: request.name,
            email: request.email,
            username: request.username,
            password: request.password,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdatePasswordApiRequest {
    /// Current password
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub new_password: String,
    #[serde(default)]
    pub confirmation_password: String,
}

/// POST /api/users
pub async fn create_user(
    State(state): State<AppState>,
    Json(request): Json<CreateUserApiRequest>,
) -> Result<(StatusCode, Json<User>), ApiError> {
    debug!(username = %request.username, "Signing up user");

    let user = state.user_service.create_user(request.into()).await?;

    Ok((StatusCode::CREATED, Json(user.redacted())))
}

/// DELETE /api/users
///
/// Removes the signed-in user together with the teams it alone occupies.
pub async fn delete_user(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
) -> Result<Json<User>, ApiError> {
    let deleted = state.user_service.delete_user(user.email()).await?;
    info!(email = %deleted.email(), "User deleted own account");

    Ok(Json(deleted.redacted()))
}

/// PUT /api/users/password
pub async fn update_password(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Json(request): Json<UpdatePasswordApiRequest>,
) -> Result<Json<User>, ApiError> {
    let updated = state
        .user_service
        .update_password(
            user.email(),
            UpdatePasswordRequest {
                current_password: request.password,
                new_password: request.new_password,
                confirmation_password: request.confirmation_password,
            },
        )
        .await?;

    Ok(Json(updated.redacted()))
}

/// GET /api/users/teams
pub async fn list_user_teams(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
) -> Result<Json<ListResponse<Team>>, ApiError> {
    let teams = state.user_service.list_teams_for_user(user.email()).await?;

    Ok(Json(ListResponse::from(teams)))
}
