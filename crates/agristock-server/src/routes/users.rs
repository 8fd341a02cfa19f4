//! User administration routes. All SuperAdmin-only.

use agristock_core::models::role::Role;
use agristock_core::models::user::{UpdateUser, User, UserProfile};
use agristock_core::repository::UserRepository;
use axum::Json;
use axum::extract::{Path, Query, State};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::ApiResult;
use crate::extract::Authed;
use crate::routes::PageQuery;
use crate::state::AppState;

pub async fn list(
    State(state): State<AppState>,
    auth: Authed,
    Query(page): Query<PageQuery>,
) -> ApiResult<Json<Vec<UserProfile>>> {
    auth.require_super_admin()?;

    let result = state.users.list(page.into()).await?;
    Ok(Json(
        result.items.into_iter().map(User::into_profile).collect(),
    ))
}

#[derive(Debug, Deserialize)]
pub struct UpdateUserRequest {
    pub id: Uuid,
    pub email: Option<String>,
    pub username: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone_number: Option<String>,
    pub role: Option<Role>,
    pub is_active: Option<bool>,
    pub is_approved: Option<bool>,
}

pub async fn update(
    State(state): State<AppState>,
    auth: Authed,
    Json(req): Json<UpdateUserRequest>,
) -> ApiResult<Json<UserProfile>> {
    auth.require_super_admin()?;

    // Deactivation goes through the gate so live sessions die with
    // the flag.
    if let Some(active) = req.is_active {
        state.gate.set_active(req.id, active, &auth.0).await?;
    }

    let updated = state
        .users
        .update(
            req.id,
            UpdateUser {
                email: req.email,
                username: req.username,
                first_name: req.first_name,
                last_name: req.last_name,
                phone_number: req.phone_number.map(Some),
                role: req.role,
                is_approved: req.is_approved,
                ..Default::default()
            },
        )
        .await?;

    Ok(Json(updated.into_profile()))
}

/// Toggle the approval flag on an account.
pub async fn approve(
    State(state): State<AppState>,
    auth: Authed,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<UserProfile>> {
    let updated = state.gate.approve(id, &auth.0).await?;
    Ok(Json(updated.into_profile()))
}

#[derive(Debug, Deserialize)]
pub struct SetActiveRequest {
    pub active: bool,
}

pub async fn set_active(
    State(state): State<AppState>,
    auth: Authed,
    Path(id): Path<Uuid>,
    Json(req): Json<SetActiveRequest>,
) -> ApiResult<Json<UserProfile>> {
    let updated = state.gate.set_active(id, req.active, &auth.0).await?;
    Ok(Json(updated.into_profile()))
}
