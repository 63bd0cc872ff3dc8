//! Workout session routes.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::Json;
use serde::Deserialize;

use crate::error::ApiError;
use crate::routes::{json_rejection_to_api, query_rejection_to_api, store_error_to_api};
use crate::services::sessions;
use crate::state::AppState;
use crate::store::StoreError;
use crate::workout::{SessionDraft, SessionForm, SessionPatch, WorkoutSession};

#[derive(Deserialize)]
pub struct ListSessionsQuery {
    pub date: Option<String>,
}

/// A new session either fully formed or as raw editor state whose sets
/// still need ids.
#[derive(Deserialize)]
#[serde(untagged)]
pub enum NewSessionBody {
    Draft(SessionDraft),
    Form(SessionForm),
}

impl From<NewSessionBody> for SessionDraft {
    fn from(body: NewSessionBody) -> Self {
        match body {
            NewSessionBody::Draft(draft) => draft,
            NewSessionBody::Form(form) => form.into(),
        }
    }
}

/// `GET /api/workout/sessions`: all sessions, or those on `?date=`.
pub async fn list(
    State(state): State<AppState>,
    query: Result<Query<ListSessionsQuery>, QueryRejection>,
) -> Result<Json<Vec<WorkoutSession>>, ApiError> {
    let Query(query) = query.map_err(|e| query_rejection_to_api(&e))?;
    let list = match query.date {
        Some(date) => sessions::list_sessions_by_date(&state.sessions, &date).await,
        None => sessions::list_sessions(&state.sessions).await,
    };
    Ok(Json(list))
}

/// `POST /api/workout/sessions`: create a session.
pub async fn create(
    State(state): State<AppState>,
    body: Result<Json<NewSessionBody>, JsonRejection>,
) -> Result<(StatusCode, Json<WorkoutSession>), ApiError> {
    let Json(body) = body.map_err(|e| json_rejection_to_api(&e))?;
    let session = sessions::create_session(&state.sessions, body.into())
        .await
        .map_err(|e| store_error_to_api(&e))?;
    Ok((StatusCode::CREATED, Json(session)))
}

/// `GET /api/workout/sessions/{id}`
pub async fn get_one(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<WorkoutSession>, ApiError> {
    sessions::get_session(&state.sessions, &id)
        .await
        .map(Json)
        .ok_or_else(|| store_error_to_api(&StoreError::NotFound(id)))
}

/// `PATCH /api/workout/sessions/{id}`: shallow merge.
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<SessionPatch>, JsonRejection>,
) -> Result<Json<WorkoutSession>, ApiError> {
    let Json(patch) = body.map_err(|e| json_rejection_to_api(&e))?;
    let session = sessions::update_session(&state.sessions, &id, patch)
        .await
        .map_err(|e| store_error_to_api(&e))?;
    Ok(Json(session))
}

/// `DELETE /api/workout/sessions/{id}`
pub async fn delete(State(state): State<AppState>, Path(id): Path<String>) -> Result<StatusCode, ApiError> {
    sessions::delete_session(&state.sessions, &id)
        .await
        .map_err(|e| store_error_to_api(&e))?;
    Ok(StatusCode::NO_CONTENT)
}
