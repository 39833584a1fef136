//! Input validation functions
//!
//! Custom checks that the `validator` derive cannot express, following
//! the same `Result<(), String>` convention.

use chrono::{NaiveDate, NaiveTime};

/// Validate appointment time ordering within a single day
pub fn validate_appointment_times(start: NaiveTime, end: NaiveTime) -> Result<(), String> {
    if start >= end {
        return Err(format!(
            "start time {start} must be before end time {end}"
        ));
    }
    Ok(())
}

/// Validate mission date range
pub fn validate_mission_dates(start: NaiveDate, end: NaiveDate) -> Result<(), String> {
    if end <= start {
        return Err(format!(
            "end date {end} must be after start date {start}"
        ));
    }
    Ok(())
}

/// Validate a progress increment (percentage points)
pub fn validate_progress_delta(delta: u8) -> Result<(), String> {
    if delta == 0 {
        return Err("progress delta must be positive".to_string());
    }
    if delta > 100 {
        return Err("progress delta cannot exceed 100".to_string());
    }
    Ok(())
}

/// Validate a reward cost
pub fn validate_reward_cost(cost: i64) -> Result<(), String> {
    if cost <= 0 {
        return Err("reward cost must be positive".to_string());
    }
    Ok(())
}
