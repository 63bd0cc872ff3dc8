//! Workout history payload fed to the AI trainer.
//!
//! DESIGN
//! ======
//! The trainer receives a compact, model-friendly summary rather than raw
//! sessions: a seven-day log of what was trained each day, plus per-exercise
//! set history keyed by normalized exercise name.
//!
//! Validation works on the raw `serde_json::Value` before typed decoding so a
//! malformed payload is rejected with the path of the first bad field and
//! never reaches the model.

use std::collections::BTreeMap;

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ErrorCode;
use crate::workout::{WorkoutSession, normalize_exercise_name};

/// Days covered by `last_week_log`, today included.
pub const LOG_WINDOW_DAYS: i64 = 7;

// =============================================================================
// TYPES
// =============================================================================

/// A single set as the trainer sees it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SetData {
    pub set: u32,
    pub weight_kg: f64,
    pub reps: u32,
}

/// All sets of one exercise on one date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExerciseSession {
    pub date: String,
    pub sets_data: Vec<SetData>,
}

/// One day of the weekly log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayLog {
    pub date: String,
    /// Short description such as "back, biceps". `None` on rest days.
    pub summary: Option<String>,
    pub details: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct WorkoutHistory {
    pub last_week_log: Vec<DayLog>,
    /// Normalized exercise name → sessions, oldest first.
    pub exercise_records: BTreeMap<String, Vec<ExerciseSession>>,
}

// =============================================================================
// VALIDATION
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid workout data at {path}: {reason}")]
pub struct ValidationError {
    pub path: String,
    pub reason: &'static str,
}

impl ErrorCode for ValidationError {
    fn error_code(&self) -> &'static str {
        "E_INVALID_WORKOUT_DATA"
    }
}

fn invalid(path: impl Into<String>, reason: &'static str) -> ValidationError {
    ValidationError { path: path.into(), reason }
}

fn require_date(value: Option<&Value>, path: &str) -> Result<(), ValidationError> {
    match value.and_then(Value::as_str) {
        Some(s) if !s.is_empty() => Ok(()),
        _ => Err(invalid(path, "expected non-empty string")),
    }
}

fn require_count(value: Option<&Value>, path: &str) -> Result<(), ValidationError> {
    match value {
        Some(v) if v.as_u64().is_some_and(|n| u32::try_from(n).is_ok()) => Ok(()),
        Some(v) if v.is_number() => Err(invalid(path, "expected non-negative integer")),
        _ => Err(invalid(path, "expected number")),
    }
}

fn validate_day_log(log: &Value, path: &str) -> Result<(), ValidationError> {
    require_date(log.get("date"), &format!("{path}.date"))?;
    match log.get("summary") {
        Some(Value::Null | Value::String(_)) => {}
        _ => return Err(invalid(format!("{path}.summary"), "expected string or null")),
    }
    let Some(details) = log.get("details").and_then(Value::as_array) else {
        return Err(invalid(format!("{path}.details"), "expected array"));
    };
    for (i, d) in details.iter().enumerate() {
        if !d.is_string() {
            return Err(invalid(format!("{path}.details[{i}]"), "expected string"));
        }
    }
    Ok(())
}

fn validate_exercise_session(session: &Value, path: &str) -> Result<(), ValidationError> {
    require_date(session.get("date"), &format!("{path}.date"))?;
    let Some(sets) = session.get("sets_data").and_then(Value::as_array) else {
        return Err(invalid(format!("{path}.sets_data"), "expected array"));
    };
    for (i, set) in sets.iter().enumerate() {
        let set_path = format!("{path}.sets_data[{i}]");
        if !set.is_object() {
            return Err(invalid(set_path, "expected object"));
        }
        require_count(set.get("set"), &format!("{set_path}.set"))?;
        if !set.get("weight_kg").is_some_and(Value::is_number) {
            return Err(invalid(format!("{set_path}.weight_kg"), "expected number"));
        }
        require_count(set.get("reps"), &format!("{set_path}.reps"))?;
    }
    Ok(())
}

impl WorkoutHistory {
    /// Check the structure of a raw payload, failing on the first bad field.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] naming the offending path.
    pub fn validate(raw: &Value) -> Result<(), ValidationError> {
        if !raw.is_object() {
            return Err(invalid("$", "expected object"));
        }
        let Some(logs) = raw.get("last_week_log").and_then(Value::as_array) else {
            return Err(invalid("last_week_log", "expected array"));
        };
        for (i, log) in logs.iter().enumerate() {
            validate_day_log(log, &format!("last_week_log[{i}]"))?;
        }
        let Some(records) = raw.get("exercise_records").and_then(Value::as_object) else {
            return Err(invalid("exercise_records", "expected object"));
        };
        for (name, sessions) in records {
            let Some(sessions) = sessions.as_array() else {
                return Err(invalid(format!("exercise_records.{name}"), "expected array"));
            };
            for (i, session) in sessions.iter().enumerate() {
                validate_exercise_session(session, &format!("exercise_records.{name}[{i}]"))?;
            }
        }
        Ok(())
    }

    /// Validate, then decode into the typed form.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] if the payload is structurally invalid.
    pub fn parse(raw: Value) -> Result<Self, ValidationError> {
        Self::validate(&raw)?;
        serde_json::from_value(raw).map_err(|_| invalid("$", "does not match workout history schema"))
    }

    /// `true` if no day and no exercise carries any data.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.exercise_records.is_empty() && self.last_week_log.iter().all(|d| d.details.is_empty())
    }
}

// =============================================================================
// BUILDING FROM SESSIONS
// =============================================================================

/// Parse the calendar day out of a session date (`YYYY-MM-DD` or an RFC 3339
/// timestamp). `None` if the leading ten characters are not a date.
#[must_use]
pub fn session_day(date: &str) -> Option<NaiveDate> {
    let head = date.get(..10)?;
    NaiveDate::parse_from_str(head, "%Y-%m-%d").ok()
}

/// Summarize stored sessions into trainer input.
///
/// `last_week_log` covers `today - 6 ..= today`, one entry per day, listing
/// the exercise names performed that day. `exercise_records` includes every
/// session on or before `today`, keyed by normalized exercise name, with set
/// numbers counted from one.
#[must_use]
pub fn history_from_sessions(sessions: &[WorkoutSession], today: NaiveDate) -> WorkoutHistory {
    let mut dated: Vec<(NaiveDate, &WorkoutSession)> = sessions
        .iter()
        .filter_map(|s| session_day(&s.date).map(|d| (d, s)))
        .filter(|(d, _)| *d <= today)
        .collect();
    dated.sort_by_key(|(d, _)| *d);

    let last_week_log = (0..LOG_WINDOW_DAYS)
        .rev()
        .map(|back| {
            let day = today - Duration::days(back);
            let mut details: Vec<String> = Vec::new();
            for (_, session) in dated.iter().filter(|(d, _)| *d == day) {
                for exercise in &session.exercises {
                    if !details.contains(&exercise.name) {
                        details.push(exercise.name.clone());
                    }
                }
            }
            DayLog { date: day.format("%Y-%m-%d").to_string(), summary: None, details }
        })
        .collect();

    let mut exercise_records: BTreeMap<String, Vec<ExerciseSession>> = BTreeMap::new();
    for (day, session) in &dated {
        for exercise in &session.exercises {
            let key = normalize_exercise_name(&exercise.name);
            if key.is_empty() || exercise.sets.is_empty() {
                continue;
            }
            let sets_data = exercise
                .sets
                .iter()
                .zip(1u32..)
                .map(|(s, n)| SetData { set: n, weight_kg: s.weight, reps: s.reps })
                .collect();
            exercise_records
                .entry(key)
                .or_default()
                .push(ExerciseSession { date: day.format("%Y-%m-%d").to_string(), sets_data });
        }
    }

    WorkoutHistory { last_week_log, exercise_records }
}

#[cfg(test)]
#[path = "history_test.rs"]
mod tests;
