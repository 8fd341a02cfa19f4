//! HTTP route definitions.

use agristock_core::repository::Pagination;
use axum::Router;
use axum::routing::{delete, get, post};
use serde::Deserialize;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

mod alerts;
mod auth;
mod batches;
mod hangars;
mod interventions;
mod kpi;
mod teams;
mod users;

/// Common pagination query parameters.
#[derive(Debug, Deserialize)]
pub struct PageQuery {
    pub offset: Option<u64>,
    pub limit: Option<u64>,
}

impl From<PageQuery> for Pagination {
    fn from(q: PageQuery) -> Self {
        let default = Pagination::default();
        Pagination {
            offset: q.offset.unwrap_or(default.offset),
            limit: q.limit.unwrap_or(default.limit),
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/auth/signup", post(auth::signup))
        .route("/auth/login", post(auth::login))
        .route("/auth/logout", post(auth::logout))
        .route("/users", get(users::list).patch(users::update))
        .route("/users/{id}/approve", post(users::approve))
        .route("/users/{id}/active", post(users::set_active))
        .route("/teams", get(teams::list).post(teams::create))
        .route(
            "/teams/{id}",
            get(teams::get_one).put(teams::update).delete(teams::delete),
        )
        .route(
            "/teams/{id}/members",
            get(teams::members).put(teams::set_members),
        )
        .route("/hangars", get(hangars::list).post(hangars::create))
        .route(
            "/hangars/{id}",
            get(hangars::get_one)
                .put(hangars::update)
                .delete(hangars::delete),
        )
        .route("/batches", get(batches::list).post(batches::create))
        .route(
            "/batches/{id}",
            get(batches::get_one)
                .put(batches::update)
                .delete(batches::delete),
        )
        .route(
            "/interventions",
            get(interventions::list).post(interventions::create),
        )
        .route(
            "/interventions/{id}",
            get(interventions::get_one)
                .put(interventions::update)
                .delete(interventions::delete),
        )
        .route("/alerts", get(alerts::list).post(alerts::create))
        .route("/alerts/{id}", delete(alerts::delete))
        .route("/alerts/{id}/ack", post(alerts::acknowledge))
        .route("/kpi/overview", get(kpi::overview))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
