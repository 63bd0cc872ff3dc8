//! Month grid for the workout calendar.
//!
//! The grid always starts on the Sunday on or before the 1st and ends on
//! the Saturday on or after the last day, so every week row is complete and
//! days from adjacent months pad the edges.

use std::collections::HashSet;

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use serde::Serialize;

use crate::error::ErrorCode;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CalendarError {
    #[error("invalid month: {year}-{month}")]
    InvalidMonth { year: i32, month: u32 },
}

impl ErrorCode for CalendarError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidMonth { .. } => "E_INVALID_MONTH",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarDay {
    pub date: NaiveDate,
    /// `false` for padding days from the previous or next month.
    pub in_month: bool,
    pub has_workout: bool,
    pub is_today: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct MonthGrid {
    pub year: i32,
    pub month: u32,
    pub weeks: Vec<[CalendarDay; 7]>,
}

fn first_of_month(year: i32, month: u32) -> Result<NaiveDate, CalendarError> {
    NaiveDate::from_ymd_opt(year, month, 1).ok_or(CalendarError::InvalidMonth { year, month })
}

/// Move `delta` months from (`year`, `month`), wrapping across years.
///
/// # Errors
///
/// Returns `InvalidMonth` if `month` is not 1..=12 or the result overflows.
pub fn shift_month(year: i32, month: u32, delta: i32) -> Result<(i32, u32), CalendarError> {
    if !(1..=12).contains(&month) {
        return Err(CalendarError::InvalidMonth { year, month });
    }
    let index = year
        .checked_mul(12)
        .and_then(|i| i.checked_add(i32::try_from(month).unwrap_or(1) - 1))
        .and_then(|i| i.checked_add(delta))
        .ok_or(CalendarError::InvalidMonth { year, month })?;
    let new_month = u32::try_from(index.rem_euclid(12)).unwrap_or(0) + 1;
    Ok((index.div_euclid(12), new_month))
}

/// Build the Sunday-first grid for one month.
///
/// # Errors
///
/// Returns `InvalidMonth` if the year/month pair is not a real month or its
/// padded grid falls outside the representable date range.
pub fn month_grid(
    year: i32,
    month: u32,
    workout_days: &HashSet<NaiveDate>,
    today: NaiveDate,
) -> Result<MonthGrid, CalendarError> {
    let first = first_of_month(year, month)?;
    let (next_year, next_month) = shift_month(year, month, 1)?;
    let out_of_range = || CalendarError::InvalidMonth { year, month };
    let last = first_of_month(next_year, next_month)?.pred_opt().ok_or_else(out_of_range)?;
    let start = first
        .checked_sub_signed(Duration::days(i64::from(first.weekday().num_days_from_sunday())))
        .ok_or_else(out_of_range)?;
    let end = last
        .checked_add_signed(Duration::days(i64::from(6 - last.weekday().num_days_from_sunday())))
        .ok_or_else(out_of_range)?;
    debug_assert_eq!(end.weekday(), Weekday::Sat);

    let mut weeks = Vec::new();
    let mut week: Vec<CalendarDay> = Vec::with_capacity(7);
    let mut day = start;
    loop {
        week.push(CalendarDay {
            date: day,
            in_month: day.month() == month && day.year() == year,
            has_workout: workout_days.contains(&day),
            is_today: day == today,
        });
        if week.len() == 7 {
            let full: [CalendarDay; 7] = std::mem::take(&mut week)
                .try_into()
                .map_err(|_| out_of_range())?;
            weeks.push(full);
        }
        if day == end {
            break;
        }
        day = day.succ_opt().ok_or_else(out_of_range)?;
    }

    Ok(MonthGrid { year, month, weeks })
}

#[cfg(test)]
#[path = "calendar_test.rs"]
mod tests;
