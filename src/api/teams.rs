//! Team endpoints
//!
//! Every route acts on behalf of the signed-in user. Membership is required to
//! read or change a team, ownership to delete it.

use axum::{
    extract::{Path, State},
    http::StatusCode,
};
use serde::Deserialize;
use tracing::debug;

use crate::api::middleware::RequireUser;
use crate::api::state::AppState;
use crate::api::types::{ApiError, Json, ListResponse};
use crate::domain::team::Team;
use crate::infrastructure::team::CreateTeamRequest;

/// Request to create a new team
#[derive(Debug, Clone, Deserialize)]
pub struct CreateTeamApiRequest {
    #[serde(default)]
    pub name: String,
    /// Derived from the name when absent
    #[serde(default)]
    pub alias: Option<String>,
}

/// Request to rename a team
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateTeamApiRequest {
    #[serde(default)]
    pub name: String,
}

/// Emails to add to or remove from a team
#[derive(Debug, Clone, Deserialize)]
pub struct TeamMembersRequest {
    #[serde(default)]
    pub users: Vec<String>,
}

/// POST /api/teams
pub async fn create_team(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Json(request): Json<CreateTeamApiRequest>,
) -> Result<(StatusCode, Json<Team>), ApiError> {
    debug!(name = %request.name, creator = %user.email(), "Creating team");

    let team = state
        .team_service
        .create_team(
            CreateTeamRequest {
                name: request.name,
                alias: request.alias,
            },
            user.email(),
        )
        .await?;

    Ok((StatusCode::CREATED, Json(team)))
}

/// GET /api/teams
pub async fn list_teams(
    State(state): State<AppState>,
    RequireUser(_): RequireUser,
) -> Result<Json<ListResponse<Team>>, ApiError> {
    let teams = state.team_service.list_teams().await?;

    Ok(Json(ListResponse::from(teams)))
}

/// GET /api/teams/{alias}
pub async fn get_team(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Path(alias): Path<String>,
) -> Result<Json<Team>, ApiError> {
    let team = state.team_service.team_info(&alias, user.email()).await?;

    Ok(Json(team))
}

/// PUT /api/teams/{alias}
pub async fn update_team(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Path(alias): Path<String>,
    Json(request): Json<UpdateTeamApiRequest>,
) -> Result<Json<Team>, ApiError> {
    let team = state
        .team_service
        .update_team(&alias, &request.name, user.email())
        .await?;

    Ok(Json(team))
}

/// DELETE /api/teams/{alias}
pub async fn delete_team(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Path(alias): Path<String>,
) -> Result<Json<Team>, ApiError> {
    let team = state.team_service.delete_team(&alias, user.email()).await?;

    Ok(Json(team))
}

/// PUT /api/teams/{alias}/users
pub async fn add_members(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Path(alias): Path<String>,
    Json(request): Json<TeamMembersRequest>,
) -> Result<Json<Team>, ApiError> {
    let team = state
        .team_service
        .add_members(&alias, &request.users, user.email())
        .await?;

    Ok(Json(team))
}

/// DELETE /api/teams/{alias}/users
pub async fn remove_members(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Path(alias): Path<String>,
    Json(request): Json<TeamMembersRequest>,
) -> Result<Json<Team>, ApiError> {
    let team = state
        .team_service
        .remove_members(&alias, &request.users, user.email())
        .await?;

    Ok(Json(team))
}
