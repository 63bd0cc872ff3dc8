//! Router assembly.
//!
//! SYSTEM CONTEXT
//! ==============
//! All endpoints live under `/api` plus a bare `/healthz`. CRUD handlers
//! answer failures with `{error, code}`; trainer handlers answer with a
//! `TrainerResponse` envelope so clients always see `success`.

pub mod calendar;
pub mod sessions;
pub mod templates;
pub mod trainer;

use axum::Router;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::error::ApiError;
use crate::store::StoreError;
use crate::state::AppState;

/// Full application router.
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/workout/recommendation", post(trainer::recommend))
        .route("/api/workout/recommendation/from-log", post(trainer::recommend_from_log))
        .route("/api/workout/feedback", post(trainer::feedback))
        .route("/api/workout/sessions", get(sessions::list).post(sessions::create))
        .route(
            "/api/workout/sessions/{id}",
            get(sessions::get_one)
                .patch(sessions::update)
                .delete(sessions::delete),
        )
        .route("/api/workout/templates", get(templates::list).post(templates::create))
        .route(
            "/api/workout/templates/{id}",
            get(templates::get_one)
                .patch(templates::update)
                .delete(templates::delete),
        )
        .route("/api/workout/templates/{id}/usage", post(templates::touch_usage))
        .route("/api/calendar/{year}/{month}", get(calendar::month))
        .route("/healthz", get(healthz))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}

pub(crate) fn store_error_to_api(err: &StoreError) -> ApiError {
    let status = match err {
        StoreError::NotFound(_) => StatusCode::NOT_FOUND,
        StoreError::Storage(_) | StoreError::Encode(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    ApiError::new(status, err)
}

pub(crate) fn json_rejection_to_api(rejection: &JsonRejection) -> ApiError {
    ApiError::bad_request(rejection.body_text())
}

pub(crate) fn query_rejection_to_api(rejection: &QueryRejection) -> ApiError {
    ApiError::bad_request(rejection.body_text())
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
