//! Intervention routes.

use agristock_core::models::intervention::{
    CreateIntervention, Intervention, InterventionStatus, UpdateIntervention,
};
use agristock_core::repository::{HangarRepository, InterventionRepository};
use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use chrono::{DateTime, Utc};
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
) -> ApiResult<Json<Vec<Intervention>>> {
    let result = state.interventions.list(page.into()).await?;
    Ok(Json(result.items))
}

#[derive(Debug, Deserialize)]
pub struct CreateInterventionRequest {
    pub hangar_id: Uuid,
    pub team_id: Option<Uuid>,
    pub title: String,
    pub description: String,
    pub scheduled_for: DateTime<Utc>,
}

pub async fn create(
    State(state): State<AppState>,
    _auth: Authed,
    Json(req): Json<CreateInterventionRequest>,
) -> ApiResult<(StatusCode, Json<Intervention>)> {
    state.hangars.get_by_id(req.hangar_id).await?;

    let intervention = state
        .interventions
        .create(CreateIntervention {
            hangar_id: req.hangar_id,
            team_id: req.team_id,
            title: req.title,
            description: req.description,
            scheduled_for: req.scheduled_for,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(intervention)))
}

pub async fn get_one(
    State(state): State<AppState>,
    _auth: Authed,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Intervention>> {
    let intervention = state.interventions.get_by_id(id).await?;
    Ok(Json(intervention))
}

#[derive(Debug, Deserialize)]
pub struct UpdateInterventionRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<InterventionStatus>,
    pub scheduled_for: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub team_id: Option<Uuid>,
}

pub async fn update(
    State(state): State<AppState>,
    _auth: Authed,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateInterventionRequest>,
) -> ApiResult<Json<Intervention>> {
    // Completing an intervention stamps the completion time when the
    // caller did not supply one.
    let completed_at = match (req.status, req.completed_at) {
        (_, Some(at)) => Some(Some(at)),
        (Some(InterventionStatus::Completed), None) => Some(Some(Utc::now())),
        _ => None,
    };

    let intervention = state
        .interventions
        .update(
            id,
            UpdateIntervention {
                title: req.title,
                description: req.description,
                status: req.status,
                scheduled_for: req.scheduled_for,
                completed_at,
                team_id: req.team_id.map(Some),
            },
        )
        .await?;

    Ok(Json(intervention))
}

pub async fn delete(
    State(state): State<AppState>,
    _auth: Authed,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<serde_json::Value>> {
    state.interventions.get_by_id(id).await?;
    state.interventions.delete(id).await?;
    Ok(Json(json!({ "success": true })))
}
