//! Authentication routes.

use agristock_auth::SignupInput;
use agristock_core::models::user::UserProfile;
use axum::Json;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::error::{ApiError, ApiResult};
use crate::extract::bearer_token;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub username: String,
    pub phone_number: Option<String>,
}

pub async fn signup(
    State(state): State<AppState>,
    Json(req): Json<SignupRequest>,
) -> ApiResult<(StatusCode, Json<UserProfile>)> {
    let profile = state
        .gate
        .signup(SignupInput {
            email: req.email,
            username: req.username,
            first_name: req.first_name,
            last_name: req.last_name,
            phone_number: req.phone_number,
            password: req.password,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(profile)))
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub user: UserProfile,
    pub token: String,
    pub expires_in: u64,
}

pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    let output = state.gate.login(&req.email, &req.password).await?;

    Ok(Json(LoginResponse {
        user: output.user,
        token: output.session_token,
        expires_in: output.expires_in,
    }))
}

pub async fn logout(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResult<Json<serde_json::Value>> {
    let token = bearer_token(&headers).ok_or(ApiError::Unauthenticated)?;
    state.gate.logout_by_token(token).await?;
    Ok(Json(json!({ "success": true })))
}
