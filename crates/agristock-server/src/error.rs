//! HTTP error mapping.

use agristock_core::error::Error;
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

/// Error type returned by every handler.
#[derive(Debug)]
pub enum ApiError {
    /// No usable session on a protected route.
    Unauthenticated,
    /// Session is valid but the account awaits approval.
    PendingApproval,
    /// A domain error, mapped by kind.
    Core(Error),
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        ApiError::Core(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, kind, message) = match self {
            ApiError::Unauthenticated => (
                StatusCode::UNAUTHORIZED,
                "unauthenticated",
                "authentication required".to_string(),
            ),
            ApiError::PendingApproval => (
                StatusCode::FORBIDDEN,
                "pending_approval",
                "account is pending approval".to_string(),
            ),
            ApiError::Core(err) => {
                let (status, kind) = match &err {
                    Error::Validation { .. } => (StatusCode::BAD_REQUEST, "validation"),
                    Error::NotFound { .. } => (StatusCode::NOT_FOUND, "not_found"),
                    Error::PermissionDenied { .. } => {
                        (StatusCode::FORBIDDEN, "permission_denied")
                    }
                    Error::Conflict { .. } => (StatusCode::CONFLICT, "conflict"),
                    Error::InvalidCredentials => {
                        (StatusCode::UNAUTHORIZED, "invalid_credentials")
                    }
                    Error::AccountInactive { .. } => {
                        (StatusCode::FORBIDDEN, "account_inactive")
                    }
                    Error::Store(_) | Error::Internal(_) => {
                        (StatusCode::INTERNAL_SERVER_ERROR, "internal")
                    }
                };
                // Storage details stay in the logs, not the response.
                let message = match &err {
                    Error::Store(_) | Error::Internal(_) => {
                        tracing::error!(error = %err, "request failed");
                        "internal server error".to_string()
                    }
                    other => other.to_string(),
                };
                (status, kind, message)
            }
        };

        let body = Json(json!({ "error": kind, "message": message }));
        (status, body).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
