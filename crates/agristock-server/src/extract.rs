//! Request authentication extractor.

use agristock_auth::{AccessDecision, evaluate};
use agristock_core::error::Error;
use agristock_core::models::role::Role;
use agristock_core::models::user::User;
use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;

use crate::error::ApiError;
use crate::state::AppState;

/// The authenticated, approved account behind a request.
///
/// Extraction resolves the bearer token to a session and runs the
/// approval gate: no/invalid token is 401, a pending account is 403.
pub struct Authed(pub User);

impl Authed {
    /// Guard for admin-only surfaces.
    pub fn require_super_admin(&self) -> Result<(), ApiError> {
        if self.0.role != Role::SuperAdmin {
            return Err(ApiError::Core(Error::PermissionDenied {
                reason: format!("user {} is not a SuperAdmin", self.0.id),
            }));
        }
        Ok(())
    }
}

/// Pull the raw token out of `Authorization: Bearer <token>`.
pub fn bearer_token(headers: &axum::http::HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

impl FromRequestParts<AppState> for Authed {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = match bearer_token(&parts.headers) {
            Some(token) => state.gate.resolve_session(token).await?,
            None => None,
        };

        match (evaluate(user.as_ref()), user) {
            (AccessDecision::Allow, Some(user)) => Ok(Authed(user)),
            (AccessDecision::RedirectPending, _) => Err(ApiError::PendingApproval),
            _ => Err(ApiError::Unauthenticated),
        }
    }
}
