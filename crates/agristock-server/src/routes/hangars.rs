//! Hangar routes.

use agristock_core::models::hangar::{CreateHangar, Hangar, UpdateHangar};
use agristock_core::repository::HangarRepository;
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
) -> ApiResult<Json<Vec<Hangar>>> {
    let result = state.hangars.list(page.into()).await?;
    Ok(Json(result.items))
}

#[derive(Debug, Deserialize)]
pub struct CreateHangarRequest {
    pub name: String,
    pub location: String,
    pub capacity_kg: f64,
    pub team_id: Option<Uuid>,
}

pub async fn create(
    State(state): State<AppState>,
    _auth: Authed,
    Json(req): Json<CreateHangarRequest>,
) -> ApiResult<(StatusCode, Json<Hangar>)> {
    let hangar = state
        .hangars
        .create(CreateHangar {
            name: req.name,
            location: req.location,
            capacity_kg: req.capacity_kg,
            team_id: req.team_id,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(hangar)))
}

pub async fn get_one(
    State(state): State<AppState>,
    _auth: Authed,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Hangar>> {
    let hangar = state.hangars.get_by_id(id).await?;
    Ok(Json(hangar))
}

#[derive(Debug, Deserialize)]
pub struct UpdateHangarRequest {
    pub name: Option<String>,
    pub location: Option<String>,
    pub capacity_kg: Option<f64>,
    pub team_id: Option<Uuid>,
}

pub async fn update(
    State(state): State<AppState>,
    _auth: Authed,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateHangarRequest>,
) -> ApiResult<Json<Hangar>> {
    let hangar = state
        .hangars
        .update(
            id,
            UpdateHangar {
                name: req.name,
                location: req.location,
                capacity_kg: req.capacity_kg,
                team_id: req.team_id.map(Some),
            },
        )
        .await?;

    Ok(Json(hangar))
}

pub async fn delete(
    State(state): State<AppState>,
    _auth: Authed,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<serde_json::Value>> {
    // Existence check first so an unknown id is 404, not 200.
    state.hangars.get_by_id(id).await?;
    state.hangars.delete(id).await?;
    Ok(Json(json!({ "success": true })))
}
