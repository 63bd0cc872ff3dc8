use super::*;

fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn shift_month_wraps_years() {
    assert_eq!(shift_month(2026, 1, -1).unwrap(), (2025, 12));
    assert_eq!(shift_month(2026, 12, 1).unwrap(), (2027, 1));
    assert_eq!(shift_month(2026, 10, 0).unwrap(), (2026, 10));
    assert_eq!(shift_month(2026, 10, -22).unwrap(), (2024, 12));
    assert!(shift_month(2026, 13, 1).is_err());
}

#[test]
fn october_2026_grid_shape() {
    // 2026-10-01 is a Thursday; 2026-10-31 is a Saturday.
    let grid = month_grid(2026, 10, &HashSet::new(), ymd(2026, 10, 19)).unwrap();
    assert_eq!(grid.weeks.len(), 5);
    assert_eq!(grid.weeks[0][0].date, ymd(2026, 9, 27));
    assert!(!grid.weeks[0][0].in_month);
    assert_eq!(grid.weeks[0][4].date, ymd(2026, 10, 1));
    assert!(grid.weeks[0][4].in_month);
    assert_eq!(grid.weeks[4][6].date, ymd(2026, 10, 31));
}

#[test]
fn grid_marks_workouts_and_today() {
    let days: HashSet<NaiveDate> = [ymd(2026, 10, 5), ymd(2026, 9, 28)].into_iter().collect();
    let grid = month_grid(2026, 10, &days, ymd(2026, 10, 19)).unwrap();
    let flat: Vec<&CalendarDay> = grid.weeks.iter().flatten().collect();

    let marked: Vec<NaiveDate> = flat.iter().filter(|d| d.has_workout).map(|d| d.date).collect();
    assert_eq!(marked, vec![ymd(2026, 9, 28), ymd(2026, 10, 5)]);
    let today: Vec<NaiveDate> = flat.iter().filter(|d| d.is_today).map(|d| d.date).collect();
    assert_eq!(today, vec![ymd(2026, 10, 19)]);
}

#[test]
fn february_starting_sunday_fits_four_weeks() {
    // 2015-02-01 is a Sunday and February 2015 has 28 days.
    let grid = month_grid(2015, 2, &HashSet::new(), ymd(2015, 2, 10)).unwrap();
    assert_eq!(grid.weeks.len(), 4);
    assert!(grid.weeks.iter().flatten().all(|d| d.in_month));
}

#[test]
fn invalid_month_rejected() {
    let err = month_grid(2026, 0, &HashSet::new(), ymd(2026, 1, 1)).unwrap_err();
    assert_eq!(err, CalendarError::InvalidMonth { year: 2026, month: 0 });
    assert_eq!(err.error_code(), "E_INVALID_MONTH");
}

#[test]
fn earliest_representable_month_is_rejected_not_panicking() {
    // January of the minimum year starts on a Thursday, so its padded grid
    // would begin before the first representable date.
    let min = NaiveDate::MIN;
    assert_eq!(min.weekday(), Weekday::Thu);
    let err = month_grid(min.year(), 1, &HashSet::new(), min).unwrap_err();
    assert_eq!(err, CalendarError::InvalidMonth { year: min.year(), month: 1 });
}

#[test]
fn latest_representable_month_is_rejected_not_panicking() {
    let max = NaiveDate::MAX;
    assert!(month_grid(max.year(), 12, &HashSet::new(), max).is_err());
}

#[test]
fn shift_month_overflow_is_an_error() {
    assert!(shift_month(i32::MAX, 12, 1).is_err());
    assert!(shift_month(i32::MIN, 1, -1).is_err());
}
