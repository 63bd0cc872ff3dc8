//! Session service: CRUD over stored workout sessions.
//!
//! DESIGN
//! ======
//! Thin layer over [`Collection`]: ids are generated here, everything else
//! is delegated. Date filtering is an exact string match on the stored
//! `date`, so `2026-10-19` and `2026-10-19T08:00:00Z` are different dates to
//! [`list_sessions_by_date`]. [`workout_dates`] is the tolerant view used by
//! the calendar.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use tracing::info;

use crate::history::session_day;
use crate::store::{Collection, StoreError};
use crate::workout::{SessionDraft, SessionPatch, WorkoutSession, generate_id};

pub type Sessions = Collection<WorkoutSession>;

/// Store a new session under a generated id.
///
/// # Errors
///
/// Returns a storage error if the write-through fails.
pub async fn create_session(sessions: &Sessions, draft: SessionDraft) -> Result<WorkoutSession, StoreError> {
    let session = sessions.insert(draft.into_session(generate_id("session"))).await?;
    info!(id = %session.id, date = %session.date, exercises = session.exercises.len(), "sessions: created");
    Ok(session)
}

/// Merge `patch` into the stored session.
///
/// # Errors
///
/// Returns [`StoreError::NotFound`] if `id` is unknown.
pub async fn update_session(sessions: &Sessions, id: &str, patch: SessionPatch) -> Result<WorkoutSession, StoreError> {
    let session = sessions.update(id, |s| patch.apply(s)).await?;
    info!(%id, "sessions: updated");
    Ok(session)
}

/// Delete exactly one session.
///
/// # Errors
///
/// Returns [`StoreError::NotFound`] if `id` is unknown.
pub async fn delete_session(sessions: &Sessions, id: &str) -> Result<(), StoreError> {
    sessions.remove(id).await?;
    info!(%id, "sessions: deleted");
    Ok(())
}

pub async fn get_session(sessions: &Sessions, id: &str) -> Option<WorkoutSession> {
    sessions.get(id).await
}

/// All sessions in insertion order.
pub async fn list_sessions(sessions: &Sessions) -> Vec<WorkoutSession> {
    sessions.list().await
}

/// Sessions whose `date` equals `date` exactly.
pub async fn list_sessions_by_date(sessions: &Sessions, date: &str) -> Vec<WorkoutSession> {
    sessions
        .list()
        .await
        .into_iter()
        .filter(|s| s.date == date)
        .collect()
}

/// Distinct calendar days that have at least one session, ascending.
/// Sessions with an unparsable date are skipped.
pub async fn workout_dates(sessions: &Sessions) -> BTreeSet<NaiveDate> {
    sessions
        .list()
        .await
        .iter()
        .filter_map(|s| session_day(&s.date))
        .collect()
}

#[cfg(test)]
#[path = "sessions_test.rs"]
mod tests;
