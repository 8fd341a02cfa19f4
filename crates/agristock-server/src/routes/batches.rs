//! Batch routes.

use agristock_core::models::batch::{Batch, BatchStatus, CreateBatch, UpdateBatch};
use agristock_core::repository::{BatchRepository, HangarRepository};
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

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub hangar_id: Option<Uuid>,
    pub offset: Option<u64>,
    pub limit: Option<u64>,
}

pub async fn list(
    State(state): State<AppState>,
    _auth: Authed,
    Query(query): Query<ListQuery>,
) -> ApiResult<Json<Vec<Batch>>> {
    if let Some(hangar_id) = query.hangar_id {
        let batches = state.batches.list_by_hangar(hangar_id).await?;
        return Ok(Json(batches));
    }

    let page = PageQuery {
        offset: query.offset,
        limit: query.limit,
    };
    let result = state.batches.list(page.into()).await?;
    Ok(Json(result.items))
}

#[derive(Debug, Deserialize)]
pub struct CreateBatchRequest {
    pub hangar_id: Uuid,
    pub fertilizer: String,
    pub quantity_kg: f64,
    pub received_at: Option<DateTime<Utc>>,
    pub expires_at: Option<DateTime<Utc>>,
}

pub async fn create(
    State(state): State<AppState>,
    _auth: Authed,
    Json(req): Json<CreateBatchRequest>,
) -> ApiResult<(StatusCode, Json<Batch>)> {
    // The hangar must exist before stock can be booked into it.
    state.hangars.get_by_id(req.hangar_id).await?;

    let batch = state
        .batches
        .create(CreateBatch {
            hangar_id: req.hangar_id,
            fertilizer: req.fertilizer,
            quantity_kg: req.quantity_kg,
            received_at: req.received_at.unwrap_or_else(Utc::now),
            expires_at: req.expires_at,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(batch)))
}

pub async fn get_one(
    State(state): State<AppState>,
    _auth: Authed,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Batch>> {
    let batch = state.batches.get_by_id(id).await?;
    Ok(Json(batch))
}

#[derive(Debug, Deserialize)]
pub struct UpdateBatchRequest {
    pub fertilizer: Option<String>,
    pub quantity_kg: Option<f64>,
    pub status: Option<BatchStatus>,
    pub expires_at: Option<DateTime<Utc>>,
}

pub async fn update(
    State(state): State<AppState>,
    _auth: Authed,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateBatchRequest>,
) -> ApiResult<Json<Batch>> {
    let batch = state
        .batches
        .update(
            id,
            UpdateBatch {
                fertilizer: req.fertilizer,
                quantity_kg: req.quantity_kg,
                status: req.status,
                expires_at: req.expires_at.map(Some),
            },
        )
        .await?;

    Ok(Json(batch))
}

pub async fn delete(
    State(state): State<AppState>,
    _auth: Authed,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<serde_json::Value>> {
    state.batches.get_by_id(id).await?;
    state.batches.delete(id).await?;
    Ok(Json(json!({ "success": true })))
}
