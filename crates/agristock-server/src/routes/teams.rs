//! Team routes.
//!
//! Lifecycle operations (create/update/delete) are SuperAdmin-only;
//! membership editing is open to the team's own manager as well.

use agristock_core::models::role::Role;
use agristock_core::models::team::{CreateTeam, Team, UpdateTeam};
use agristock_core::models::user::{User, UserProfile};
use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use crate::error::ApiResult;
use crate::extract::Authed;
use crate::routes::PageQuery;
use crate::state::AppState;

pub async fn list(
    State(state): State<AppState>,
    _auth: Authed,
    Query(page): Query<PageQuery>,
) -> ApiResult<Json<Vec<Team>>> {
    let result = state.teams.list_teams(page.into()).await?;
    Ok(Json(result.items))
}

#[derive(Debug, Deserialize)]
pub struct CreateTeamRequest {
    pub name: String,
    pub manager_id: Uuid,
    pub contact_email: Option<String>,
}

pub async fn create(
    State(state): State<AppState>,
    auth: Authed,
    Json(req): Json<CreateTeamRequest>,
) -> ApiResult<(StatusCode, Json<Team>)> {
    auth.require_super_admin()?;

    let team = state
        .teams
        .create_team(CreateTeam {
            name: req.name,
            manager_id: req.manager_id,
            contact_email: req.contact_email,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(team)))
}

pub async fn get_one(
    State(state): State<AppState>,
    _auth: Authed,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Team>> {
    let team = state.teams.get_team(id).await?;
    Ok(Json(team))
}

#[derive(Debug, Deserialize)]
pub struct UpdateTeamRequest {
    pub name: Option<String>,
    pub contact_email: Option<String>,
    pub manager_id: Option<Uuid>,
}

pub async fn update(
    State(state): State<AppState>,
    auth: Authed,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateTeamRequest>,
) -> ApiResult<Json<Team>> {
    auth.require_super_admin()?;

    let team = state
        .teams
        .update_team(
            id,
            UpdateTeam {
                name: req.name,
                manager_id: req.manager_id,
                contact_email: req.contact_email.map(Some),
            },
        )
        .await?;

    Ok(Json(team))
}

pub async fn delete(
    State(state): State<AppState>,
    auth: Authed,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<serde_json::Value>> {
    auth.require_super_admin()?;

    state.teams.delete_team(id).await?;
    Ok(Json(json!({ "success": true })))
}

pub async fn members(
    State(state): State<AppState>,
    _auth: Authed,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Vec<UserProfile>>> {
    let members = state.teams.team_members(id).await?;
    Ok(Json(
        members.into_iter().map(User::into_profile).collect(),
    ))
}

#[derive(Debug, Deserialize)]
pub struct SetMembersRequest {
    pub members: Vec<Uuid>,
}

pub async fn set_members(
    State(state): State<AppState>,
    auth: Authed,
    Path(id): Path<Uuid>,
    Json(req): Json<SetMembersRequest>,
) -> ApiResult<Json<Team>> {
    // The team's manager may edit membership; everyone else needs
    // SuperAdmin.
    if auth.0.role != Role::SuperAdmin {
        let team = state.teams.get_team(id).await?;
        if team.manager_id != auth.0.id {
            auth.require_super_admin()?;
        }
    }

    let team = state.teams.set_members(id, &req.members).await?;
    Ok(Json(team))
}
