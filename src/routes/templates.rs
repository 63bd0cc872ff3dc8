//! Exercise template routes.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::Json;

use crate::error::ApiError;
use crate::routes::{json_rejection_to_api, query_rejection_to_api, store_error_to_api};
use crate::services::templates::{self, TemplateFilter};
use crate::state::AppState;
use crate::store::StoreError;
use crate::workout::{ExerciseTemplate, TemplateDraft, TemplatePatch};

/// `GET /api/workout/templates?category=&sort=`
pub async fn list(
    State(state): State<AppState>,
    query: Result<Query<TemplateFilter>, QueryRejection>,
) -> Result<Json<Vec<ExerciseTemplate>>, ApiError> {
    let Query(filter) = query.map_err(|e| query_rejection_to_api(&e))?;
    Ok(Json(templates::list_templates(&state.templates, filter).await))
}

/// `POST /api/workout/templates`: create a template.
pub async fn create(
    State(state): State<AppState>,
    body: Result<Json<TemplateDraft>, JsonRejection>,
) -> Result<(StatusCode, Json<ExerciseTemplate>), ApiError> {
    let Json(draft) = body.map_err(|e| json_rejection_to_api(&e))?;
    let template = templates::create_template(&state.templates, draft)
        .await
        .map_err(|e| store_error_to_api(&e))?;
    Ok((StatusCode::CREATED, Json(template)))
}

/// `GET /api/workout/templates/{id}`
pub async fn get_one(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ExerciseTemplate>, ApiError> {
    templates::get_template(&state.templates, &id)
        .await
        .map(Json)
        .ok_or_else(|| store_error_to_api(&StoreError::NotFound(id)))
}

/// `PATCH /api/workout/templates/{id}`: shallow merge.
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<TemplatePatch>, JsonRejection>,
) -> Result<Json<ExerciseTemplate>, ApiError> {
    let Json(patch) = body.map_err(|e| json_rejection_to_api(&e))?;
    let template = templates::update_template(&state.templates, &id, patch)
        .await
        .map_err(|e| store_error_to_api(&e))?;
    Ok(Json(template))
}

/// `DELETE /api/workout/templates/{id}`
pub async fn delete(State(state): State<AppState>, Path(id): Path<String>) -> Result<StatusCode, ApiError> {
    templates::delete_template(&state.templates, &id)
        .await
        .map_err(|e| store_error_to_api(&e))?;
    Ok(StatusCode::NO_CONTENT)
}

/// `POST /api/workout/templates/{id}/usage`: bump `lastUsedAt`. Unknown ids
/// are accepted and ignored.
pub async fn touch_usage(State(state): State<AppState>, Path(id): Path<String>) -> Result<StatusCode, ApiError> {
    templates::touch_usage(&state.templates, &id)
        .await
        .map_err(|e| store_error_to_api(&e))?;
    Ok(StatusCode::NO_CONTENT)
}
