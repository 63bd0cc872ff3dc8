//! AI trainer routes.
//!
//! Every response, success or failure, carries the `TrainerResponse`
//! envelope. Failures add a grepable `code`.

use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, warn};

use crate::error::ErrorCode;
use crate::history::{WorkoutHistory, history_from_sessions};
use crate::services::sessions;
use crate::services::trainer::{AiTrainer, TrainerError, TrainerResponse};
use crate::state::AppState;

#[derive(Serialize)]
struct FailureBody {
    #[serde(flatten)]
    response: TrainerResponse,
    code: &'static str,
}

/// Failed trainer call, rendered with its mapped status.
pub struct TrainerFailure {
    status: StatusCode,
    body: FailureBody,
}

impl TrainerFailure {
    fn from_error(err: &TrainerError) -> Self {
        Self {
            status: trainer_error_to_status(err),
            body: FailureBody { response: TrainerResponse::failure(err.to_string()), code: err.error_code() },
        }
    }

    fn bad_request(rejection: &JsonRejection) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            body: FailureBody { response: TrainerResponse::failure(rejection.body_text()), code: "E_BAD_REQUEST" },
        }
    }
}

impl IntoResponse for TrainerFailure {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

pub(crate) fn trainer_error_to_status(err: &TrainerError) -> StatusCode {
    match err {
        TrainerError::InvalidInput(_) => StatusCode::BAD_REQUEST,
        TrainerError::NotConfigured => StatusCode::SERVICE_UNAVAILABLE,
        TrainerError::Timeout(_)
        | TrainerError::EmptyResponse
        | TrainerError::Llm(_)
        | TrainerError::Exhausted { .. } => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn require_trainer(state: &AppState) -> Result<&AiTrainer, TrainerFailure> {
    state
        .trainer
        .as_deref()
        .ok_or_else(|| TrainerFailure::from_error(&TrainerError::NotConfigured))
}

/// Input errors win over a disabled trainer.
fn validate_history(raw: &Value) -> Result<(), TrainerFailure> {
    WorkoutHistory::validate(raw).map_err(|e| TrainerFailure::from_error(&TrainerError::InvalidInput(e)))
}

fn finish(result: Result<TrainerResponse, TrainerError>) -> Result<Json<TrainerResponse>, TrainerFailure> {
    result.map(Json).map_err(|e| {
        warn!(error = %e, code = e.error_code(), "trainer: request failed");
        TrainerFailure::from_error(&e)
    })
}

/// `POST /api/workout/recommendation`: body is a workout history.
pub async fn recommend(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<TrainerResponse>, TrainerFailure> {
    let Json(history) = body.map_err(|e| TrainerFailure::bad_request(&e))?;
    validate_history(&history)?;
    let trainer = require_trainer(&state)?;
    finish(trainer.recommend(history).await)
}

#[derive(Debug, Default, Deserialize)]
pub struct FromLogBody {
    pub today: Option<NaiveDate>,
}

/// `POST /api/workout/recommendation/from-log`: history built from stored
/// sessions. The body is optional.
pub async fn recommend_from_log(
    State(state): State<AppState>,
    body: Result<Json<FromLogBody>, JsonRejection>,
) -> Result<Json<TrainerResponse>, TrainerFailure> {
    let body = match body {
        Ok(Json(body)) => body,
        Err(JsonRejection::MissingJsonContentType(_)) => FromLogBody::default(),
        Err(e) => return Err(TrainerFailure::bad_request(&e)),
    };
    let trainer = require_trainer(&state)?;
    let today = body.today.unwrap_or_else(|| chrono::Local::now().date_naive());
    let history = history_from_sessions(&sessions::list_sessions(&state.sessions).await, today);
    if history.is_empty() {
        info!(%today, "trainer: no stored sessions in the last week");
    }
    finish(trainer.recommend_for(&history).await)
}

#[derive(Deserialize)]
pub struct FeedbackBody {
    pub history: Value,
    pub today_workout: String,
}

/// `POST /api/workout/feedback`: evaluate today's workout against history.
pub async fn feedback(
    State(state): State<AppState>,
    body: Result<Json<FeedbackBody>, JsonRejection>,
) -> Result<Json<TrainerResponse>, TrainerFailure> {
    let Json(body) = body.map_err(|e| TrainerFailure::bad_request(&e))?;
    validate_history(&body.history)?;
    let trainer = require_trainer(&state)?;
    finish(trainer.feedback(body.history, &body.today_workout).await)
}
