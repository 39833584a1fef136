//! Request types and mission target definitions

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::{AppointmentType, Difficulty, MissionCategory};

/// Window a mission target is measured over
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Timeframe {
    Daily,
    Weekly,
    Monthly,
    Total,
}

/// Quantitative mission target, one variant per mission type
///
/// Tagged union so each mission type carries only the fields that make
/// sense for it; an invalid field combination is unrepresentable.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum MissionTarget {
    Workout { sessions: u32, timeframe: Timeframe },
    Steps { count: u32, timeframe: Timeframe },
    Calories { kcal: u32, timeframe: Timeframe },
    Weight { kg: f64, timeframe: Timeframe },
    Consistency { days: u32, timeframe: Timeframe },
    Custom { value: f64, unit: String, timeframe: Timeframe },
}

impl MissionTarget {
    pub fn timeframe(&self) -> Timeframe {
        match self {
            MissionTarget::Workout { timeframe, .. }
            | MissionTarget::Steps { timeframe, .. }
            | MissionTarget::Calories { timeframe, .. }
            | MissionTarget::Weight { timeframe, .. }
            | MissionTarget::Consistency { timeframe, .. }
            | MissionTarget::Custom { timeframe, .. } => *timeframe,
        }
    }

    /// Unit label for display
    pub fn unit_label(&self) -> &str {
        match self {
            MissionTarget::Workout { .. } => "sessions",
            MissionTarget::Steps { .. } => "steps",
            MissionTarget::Calories { .. } => "kcal",
            MissionTarget::Weight { .. } => "kg",
            MissionTarget::Consistency { .. } => "days",
            MissionTarget::Custom { unit, .. } => unit,
        }
    }
}

/// Input for booking an appointment
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct NewAppointment {
    pub client_id: Uuid,
    pub trainer_id: Uuid,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    #[validate(length(min = 1, max = 120))]
    pub location: String,
    pub kind: AppointmentType,
    #[validate(length(max = 500))]
    pub notes: Option<String>,
}

/// Input for creating a mission
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct NewMission {
    pub trainer_id: Uuid,
    pub client_id: Uuid,
    #[validate(length(min = 1, max = 120))]
    pub title: String,
    #[validate(length(max = 1000))]
    pub description: String,
    pub target: MissionTarget,
    pub difficulty: Difficulty,
    pub category: MissionCategory,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}
