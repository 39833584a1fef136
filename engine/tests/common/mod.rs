//! Common test utilities for engine integration tests
#![allow(dead_code)]

use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc};
use fake::faker::address::en::CityName;
use fake::Fake;
use uuid::Uuid;

use trainhub_engine::EngineState;
use trainhub_shared::models::{AppointmentType, Difficulty, MissionCategory};
use trainhub_shared::time::parse_time_of_day;
use trainhub_shared::types::{MissionTarget, NewAppointment, NewMission, Timeframe};

/// Fresh engine state with default config and test logging installed
pub fn test_state() -> EngineState {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
    EngineState::default()
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
}

pub fn tod(s: &str) -> NaiveTime {
    parse_time_of_day(s).unwrap()
}

/// Appointment request for a given trainer/day/slot
pub fn appointment_request(
    trainer_id: Uuid,
    client_id: Uuid,
    day: NaiveDate,
    start: &str,
    end: &str,
) -> NewAppointment {
    NewAppointment {
        client_id,
        trainer_id,
        date: day,
        start_time: tod(start),
        end_time: tod(end),
        location: CityName().fake(),
        kind: AppointmentType::Personal,
        notes: None,
    }
}

/// Mission request with a daily steps target
pub fn mission_request(
    trainer_id: Uuid,
    client_id: Uuid,
    difficulty: Difficulty,
    start: NaiveDate,
    end: NaiveDate,
) -> NewMission {
    NewMission {
        trainer_id,
        client_id,
        title: "Daily 10k".to_string(),
        description: "Hit 10,000 steps every day".to_string(),
        target: MissionTarget::Steps {
            count: 10_000,
            timeframe: Timeframe::Daily,
        },
        difficulty,
        category: MissionCategory::Fitness,
        start_date: start,
        end_date: end,
    }
}
