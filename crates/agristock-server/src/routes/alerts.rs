//! Alert routes.

use agristock_core::models::alert::{Alert, AlertSeverity, CreateAlert};
use agristock_core::repository::AlertRepository;
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
) -> ApiResult<Json<Vec<Alert>>> {
    let result = state.alerts.list(page.into()).await?;
    Ok(Json(result.items))
}

#[derive(Debug, Deserialize)]
pub struct CreateAlertRequest {
    pub severity: AlertSeverity,
    pub message: String,
    pub hangar_id: Option<Uuid>,
    pub batch_id: Option<Uuid>,
}

pub async fn create(
    State(state): State<AppState>,
    _auth: Authed,
    Json(req): Json<CreateAlertRequest>,
) -> ApiResult<(StatusCode, Json<Alert>)> {
    let alert = state
        .alerts
        .create(CreateAlert {
            severity: req.severity,
            message: req.message,
            hangar_id: req.hangar_id,
            batch_id: req.batch_id,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(alert)))
}

pub async fn acknowledge(
    State(state): State<AppState>,
    _auth: Authed,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Alert>> {
    let alert = state.alerts.acknowledge(id).await?;
    Ok(Json(alert))
}

pub async fn delete(
    State(state): State<AppState>,
    _auth: Authed,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<serde_json::Value>> {
    state.alerts.get_by_id(id).await?;
    state.alerts.delete(id).await?;
    Ok(Json(json!({ "success": true })))
}
