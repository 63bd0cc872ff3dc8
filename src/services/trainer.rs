//! AI trainer: workout recommendations and post-workout feedback.
//!
//! DESIGN
//! ======
//! The trainer is a thin, stateless wrapper around an [`LlmChat`] model.
//! Input history is validated before any prompt is rendered, so malformed
//! payloads never cost a model call. Every call goes through the shared
//! [`RetryPolicy`]; an empty or whitespace-only reply counts as a failed
//! attempt.
//!
//! RESPONSE SHAPE
//! ==============
//! The recommendation prompt asks for three sections. The reply is split on
//! the literal [`RATIONALE_HEADER`] and [`WARMUP_HEADER`] markers: the text
//! before the first header is the recommendation and the rationale becomes
//! the feedback. A model that drops or rewords the headers yields the whole
//! reply as the recommendation.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use serde_json::Value;
use tracing::{info, warn};

use crate::error::ErrorCode;
use crate::history::{ValidationError, WorkoutHistory};
use crate::llm::LlmChat;
use crate::llm::types::LlmError;
use crate::services::retry::{AttemptError, RetryExhausted, RetryPolicy};

pub const RATIONALE_HEADER: &str = "[추천 근거]";
pub const WARMUP_HEADER: &str = "[준비 및 마무리 운동]";

const TRAINER_SYSTEM: &str = "당신은 전문 퍼스널 트레이너입니다. 요청된 형식을 정확히 지켜 간결하게 답변하십시오.";

const RECOMMENDATION_INSTRUCTIONS: &str = "\
## 역할(Role)
사용자의 운동 기록을 분석하여 오늘의 운동 루틴을 추천합니다. 과학적인 훈련 원칙에 근거한 안전하고 \
효과적인 계획을 제공하십시오.

## 주요 원칙(Core Principles)
1. 점진적 과부하(Progressive Overload): 직전 세션에서 목표 횟수를 모두 채웠다면 무게를, 그렇지 \
않다면 횟수를 먼저 늘리십시오.
2. 피로도 관리(Fatigue Management): 어제 훈련한 주동근은 오늘 쉬게 하고, 지난 7일간의 기록으로 \
분할이 균형 잡혔는지 확인하십시오.
3. 데이터 기반(Data-Driven): 아래 JSON 데이터에만 근거하고, 데이터에 없는 운동은 추가하지 마십시오.

## 출력 형식(Output Format)
반드시 아래 형식으로 답변하십시오.
1. [오늘의 추천 운동]
   - 운동명 1: 추천 무게(kg) x 목표 횟수 x 세트 수
   - 운동명 2: 추천 무게(kg) x 목표 횟수 x 세트 수
2. [추천 근거]
   - 주요 원칙에 비추어 이 루틴을 추천하는 이유를 1~2문장으로 설명
3. [준비 및 마무리 운동]
   - 준비 운동: 간단한 스트레칭 또는 웜업 세트
   - 마무리 운동: 간단한 쿨다운 스트레칭";

// =============================================================================
// TYPES
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum TrainerError {
    #[error("AI trainer is not configured")]
    NotConfigured,
    #[error(transparent)]
    InvalidInput(#[from] ValidationError),
    #[error("request timed out after {}ms", .0.as_millis())]
    Timeout(Duration),
    #[error("model returned an empty response")]
    EmptyResponse,
    #[error(transparent)]
    Llm(#[from] LlmError),
    #[error("{last} (after {attempts} attempts)")]
    Exhausted { attempts: u32, last: Box<TrainerError> },
}

impl ErrorCode for TrainerError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::NotConfigured => "E_TRAINER_NOT_CONFIGURED",
            Self::InvalidInput(e) => e.error_code(),
            Self::Timeout(_) => "E_TRAINER_TIMEOUT",
            Self::EmptyResponse => "E_TRAINER_EMPTY_RESPONSE",
            Self::Llm(e) => e.error_code(),
            Self::Exhausted { last, .. } => last.error_code(),
        }
    }

    fn retryable(&self) -> bool {
        match self {
            Self::Timeout(_) | Self::EmptyResponse => true,
            Self::Llm(e) => e.retryable(),
            Self::Exhausted { last, .. } => last.retryable(),
            Self::NotConfigured | Self::InvalidInput(_) => false,
        }
    }
}

impl From<RetryExhausted<TrainerError>> for TrainerError {
    fn from(err: RetryExhausted<TrainerError>) -> Self {
        let last = match err.last {
            AttemptError::Timeout(d) => Self::Timeout(d),
            AttemptError::Failed(e) => e,
        };
        Self::Exhausted { attempts: err.attempts, last: Box::new(last) }
    }
}

/// Result envelope returned to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrainerResponse {
    pub success: bool,
    pub recommendation: String,
    pub feedback: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl TrainerResponse {
    #[must_use]
    pub fn ok(recommendation: String, feedback: String) -> Self {
        Self { success: true, recommendation, feedback, error: None }
    }

    #[must_use]
    pub fn failure(message: impl Into<String>) -> Self {
        Self { success: false, recommendation: String::new(), feedback: String::new(), error: Some(message.into()) }
    }
}

// =============================================================================
// PROMPTS
// =============================================================================

fn pretty(history: &WorkoutHistory) -> String {
    serde_json::to_string_pretty(history).unwrap_or_else(|_| "{}".into())
}

/// Full recommendation prompt: instructions, the history as pretty JSON,
/// and the closing request.
#[must_use]
pub fn build_recommendation_prompt(history: &WorkoutHistory) -> String {
    format!(
        "{RECOMMENDATION_INSTRUCTIONS}\n\n## 사용자의 운동 데이터:\n{}\n\n위 데이터를 분석하여 오늘의 운동을 추천해주세요.",
        pretty(history)
    )
}

/// Feedback prompt comparing today's workout against the history.
#[must_use]
pub fn build_feedback_prompt(history: &WorkoutHistory, today_workout: &str) -> String {
    format!(
        "당신은 전문 피트니스 트레이너입니다. 사용자의 과거 운동 기록과 오늘 수행한 운동을 분석하여 피드백을 제공해주세요.\n\n\
         ## 과거 운동 기록:\n{}\n\n\
         ## 오늘 수행한 운동:\n{today_workout}\n\n\
         다음 형식으로 피드백을 제공해주세요:\n\n\
         1. [운동 수행 평가]\n   - 오늘 운동의 강도와 볼륨 평가\n   - 이전 기록과 비교한 진전 사항\n\n\
         2. [개선 포인트]\n   - 다음 운동에서 개선할 부분\n   - 주의해야 할 사항\n\n\
         3. [회복 권장사항]\n   - 영양 섭취 권장사항\n   - 휴식 및 회복 방법",
        pretty(history)
    )
}

/// Split a recommendation reply into `(recommendation, feedback)`.
///
/// Feedback is empty when nothing sits between the first header and the
/// next one (or the end of the reply).
#[must_use]
pub fn split_sections(reply: &str) -> (String, String) {
    let Some(start) = reply.find(RATIONALE_HEADER).into_iter().chain(reply.find(WARMUP_HEADER)).min() else {
        return (reply.trim().to_string(), String::new());
    };
    let recommendation = reply[..start].trim().to_string();

    let after_first = if reply[start..].starts_with(RATIONALE_HEADER) {
        start + RATIONALE_HEADER.len()
    } else {
        start + WARMUP_HEADER.len()
    };
    let rest = &reply[after_first..];
    let end = [rest.find(RATIONALE_HEADER), rest.find(WARMUP_HEADER)]
        .into_iter()
        .flatten()
        .min()
        .unwrap_or(rest.len());
    let body = &rest[..end];
    if body.is_empty() {
        return (recommendation, String::new());
    }
    (recommendation, format!("{RATIONALE_HEADER}{body}").trim().to_string())
}

// =============================================================================
// TRAINER
// =============================================================================

pub struct AiTrainer {
    llm: Arc<dyn LlmChat>,
    policy: RetryPolicy,
    max_tokens: u32,
}

impl AiTrainer {
    #[must_use]
    pub fn new(llm: Arc<dyn LlmChat>, policy: RetryPolicy, max_tokens: u32) -> Self {
        Self { llm, policy, max_tokens }
    }

    /// Recommend today's workout from a raw history payload.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` without calling the model if the payload is
    /// malformed, or `Exhausted` once every attempt has failed.
    pub async fn recommend(&self, raw_history: Value) -> Result<TrainerResponse, TrainerError> {
        let history = WorkoutHistory::parse(raw_history)?;
        self.recommend_for(&history).await
    }

    /// Recommend from an already-typed history.
    ///
    /// # Errors
    ///
    /// Returns `Exhausted` once every attempt has failed.
    pub async fn recommend_for(&self, history: &WorkoutHistory) -> Result<TrainerResponse, TrainerError> {
        let reply = self.call("recommendation", &build_recommendation_prompt(history)).await?;
        let (recommendation, feedback) = split_sections(&reply);
        info!(
            exercises = history.exercise_records.len(),
            has_feedback = !feedback.is_empty(),
            "trainer: recommendation ready"
        );
        Ok(TrainerResponse::ok(recommendation, feedback))
    }

    /// Feedback on `today_workout` given past history.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` without calling the model if the payload is
    /// malformed, or `Exhausted` once every attempt has failed.
    pub async fn feedback(&self, raw_history: Value, today_workout: &str) -> Result<TrainerResponse, TrainerError> {
        let history = WorkoutHistory::parse(raw_history)?;
        let reply = self.call("feedback", &build_feedback_prompt(&history, today_workout)).await?;
        info!("trainer: feedback ready");
        Ok(TrainerResponse::ok(String::new(), reply.trim().to_string()))
    }

    async fn call(&self, label: &str, prompt: &str) -> Result<String, TrainerError> {
        let llm = &self.llm;
        let max_tokens = self.max_tokens;
        let result = self
            .policy
            .run(label, |attempt| async move {
                let response = llm.generate(max_tokens, TRAINER_SYSTEM, prompt).await?;
                if response.text.trim().is_empty() {
                    return Err(TrainerError::EmptyResponse);
                }
                info!(
                    attempt,
                    model = %response.model,
                    input_tokens = response.input_tokens,
                    output_tokens = response.output_tokens,
                    "trainer: model replied"
                );
                Ok(response.text)
            })
            .await;
        result.map_err(|e| {
            let err = TrainerError::from(e);
            warn!(label, error = %err, "trainer: giving up");
            err
        })
    }
}

#[cfg(test)]
#[path = "trainer_test.rs"]
mod tests;
