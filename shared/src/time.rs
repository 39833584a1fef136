//! Pure time and calendar utilities
//!
//! Shared by the calendar view and mission expiry logic. Everything
//! here is stateless; callers supply dates and times explicitly.

use chrono::{DateTime, Datelike, NaiveDate, NaiveTime, Utc};

use crate::errors::DomainError;

/// All days of a month, 1st through last inclusive
///
/// Returns an empty sequence for an invalid year/month combination.
pub fn days_in_month(year: i32, month: u32) -> Vec<NaiveDate> {
    let Some(first) = NaiveDate::from_ymd_opt(year, month, 1) else {
        return Vec::new();
    };
    first
        .iter_days()
        .take_while(|d| d.month() == month)
        .collect()
}

/// Month laid out as a Sunday-first calendar grid
///
/// Leading and trailing `None` cells pad the month to whole weeks, so
/// the result length is always a multiple of 7.
pub fn month_grid(year: i32, month: u32) -> Vec<Option<NaiveDate>> {
    let days = days_in_month(year, month);
    let Some(first) = days.first().copied() else {
        return Vec::new();
    };
    let lead = first.weekday().num_days_from_sunday() as usize;

    let mut grid: Vec<Option<NaiveDate>> = Vec::with_capacity(42);
    grid.extend(std::iter::repeat(None).take(lead));
    grid.extend(days.into_iter().map(Some));
    while grid.len() % 7 != 0 {
        grid.push(None);
    }
    grid
}

/// Calendar-date equality, ignoring time-of-day
pub fn is_same_day(a: DateTime<Utc>, b: DateTime<Utc>) -> bool {
    a.date_naive() == b.date_naive()
}

/// Half-open interval overlap test
///
/// `[start_a, end_a)` and `[start_b, end_b)` overlap iff
/// `start_a < end_b && start_b < end_a`. Adjacent ranges sharing an
/// endpoint do not overlap.
pub fn ranges_overlap<T: PartialOrd>(start_a: T, end_a: T, start_b: T, end_b: T) -> bool {
    start_a < end_b && start_b < end_a
}

/// Parse a local time-of-day in "HH:MM" form
pub fn parse_time_of_day(s: &str) -> Result<NaiveTime, DomainError> {
    NaiveTime::parse_from_str(s, "%H:%M").map_err(|_| {
        DomainError::Validation(format!("invalid time of day '{s}', expected HH:MM"))
    })
}
