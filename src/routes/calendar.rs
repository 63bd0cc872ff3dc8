//! Calendar route.

use std::collections::HashSet;

use axum::extract::rejection::{PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::Json;
use chrono::NaiveDate;
use serde::Deserialize;

use crate::calendar::{MonthGrid, month_grid};
use crate::error::ApiError;
use crate::routes::query_rejection_to_api;
use crate::services::sessions;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct MonthQuery {
    /// Overrides the server's local date when highlighting today.
    pub today: Option<NaiveDate>,
}

/// `GET /api/calendar/{year}/{month}`: month grid with workout days marked.
pub async fn month(
    State(state): State<AppState>,
    path: Result<Path<(i32, u32)>, PathRejection>,
    query: Result<Query<MonthQuery>, QueryRejection>,
) -> Result<Json<MonthGrid>, ApiError> {
    let Path((year, month)) = path.map_err(|e| ApiError::bad_request(e.body_text()))?;
    let Query(query) = query.map_err(|e| query_rejection_to_api(&e))?;
    let today = query.today.unwrap_or_else(|| chrono::Local::now().date_naive());

    let days: HashSet<NaiveDate> = sessions::workout_dates(&state.sessions).await.into_iter().collect();
    let grid = month_grid(year, month, &days, today).map_err(|e| ApiError::new(StatusCode::BAD_REQUEST, &e))?;
    Ok(Json(grid))
}
