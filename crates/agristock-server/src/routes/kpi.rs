//! KPI dashboard route.

use agristock_core::models::kpi::KpiOverview;
use agristock_core::repository::KpiRepository;
use axum::Json;
use axum::extract::State;

use crate::error::ApiResult;
use crate::extract::Authed;
use crate::state::AppState;

pub async fn overview(
    State(state): State<AppState>,
    _auth: Authed,
) -> ApiResult<Json<KpiOverview>> {
    let overview = state.kpis.overview().await?;
    Ok(Json(overview))
}
