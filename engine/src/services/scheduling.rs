//! Scheduling service
//!
//! Booking, status transitions, and calendar views for trainer
//! appointments. Double-booking is rejected at insert time; the store
//! runs the conflict check and the insert in one critical section.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use trainhub_shared::errors::DomainError;
use trainhub_shared::models::{Appointment, AppointmentStatus};
use trainhub_shared::time::month_grid;
use trainhub_shared::types::NewAppointment;
use trainhub_shared::validation::validate_appointment_times;

use crate::error::{EngineError, EngineResult};
use crate::state::EngineState;
use crate::stores::StoreEvent;

/// One cell of a trainer's month view
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayCell {
    /// `None` for padding cells outside the month
    pub date: Option<NaiveDate>,
    pub appointment_count: usize,
}

/// Scheduling service
pub struct SchedulingService;

impl SchedulingService {
    /// Book an appointment for a trainer
    ///
    /// Fails with `SchedulingConflict` naming the colliding appointment
    /// when the slot overlaps an existing scheduled appointment for the
    /// same trainer on the same day.
    pub fn book_appointment(
        state: &EngineState,
        input: NewAppointment,
        now: DateTime<Utc>,
    ) -> EngineResult<Appointment> {
        input
            .validate()
            .map_err(|e| DomainError::Validation(e.to_string()))?;
        validate_appointment_times(input.start_time, input.end_time)
            .map_err(DomainError::Validation)?;

        let appointment = Appointment {
            id: Uuid::new_v4(),
            client_id: input.client_id,
            trainer_id: input.trainer_id,
            date: input.date,
            start_time: input.start_time,
            end_time: input.end_time,
            location: input.location,
            kind: input.kind,
            status: AppointmentStatus::Scheduled,
            notes: input.notes,
            created_at: now,
        };
        let booked = state.appointments.book(appointment)?;
        info!(
            appointment_id = %booked.id,
            trainer_id = %booked.trainer_id,
            date = %booked.date,
            "appointment booked"
        );
        state.events.publish(StoreEvent::AppointmentBooked {
            id: booked.id,
            trainer_id: booked.trainer_id,
        });
        Ok(booked)
    }

    /// Advisory check that a slot is free for a trainer
    ///
    /// Booking re-checks under the store lock; this is for UI feedback
    /// before a booking attempt.
    pub fn check_slot(
        state: &EngineState,
        trainer_id: Uuid,
        date: NaiveDate,
        start: NaiveTime,
        end: NaiveTime,
    ) -> EngineResult<()> {
        validate_appointment_times(start, end).map_err(DomainError::Validation)?;
        if let Some(conflicting_id) = state.appointments.conflict_for(trainer_id, date, start, end)
        {
            return Err(DomainError::SchedulingConflict { conflicting_id }.into());
        }
        Ok(())
    }

    /// Mark a scheduled appointment completed
    pub fn complete(state: &EngineState, appointment_id: Uuid) -> EngineResult<Appointment> {
        Self::finish(state, appointment_id, AppointmentStatus::Completed)
    }

    /// Cancel a scheduled appointment
    pub fn cancel(state: &EngineState, appointment_id: Uuid) -> EngineResult<Appointment> {
        Self::finish(state, appointment_id, AppointmentStatus::Cancelled)
    }

    fn finish(
        state: &EngineState,
        appointment_id: Uuid,
        status: AppointmentStatus,
    ) -> EngineResult<Appointment> {
        let appointment = state
            .appointments
            .set_status(appointment_id, status)?
            .ok_or_else(|| EngineError::NotFound(format!("appointment {appointment_id}")))?;
        state.events.publish(StoreEvent::AppointmentStatusChanged {
            id: appointment.id,
            status: appointment.status,
        });
        Ok(appointment)
    }

    /// A trainer's appointments for one day, sorted by start time
    pub fn day_schedule(
        state: &EngineState,
        trainer_id: Uuid,
        date: NaiveDate,
    ) -> Vec<Appointment> {
        state.appointments.list_for_trainer(trainer_id, Some(date))
    }

    /// A trainer's month as a Sunday-first grid with per-day counts of
    /// still-scheduled appointments
    ///
    /// Cancelled and completed appointments do not count toward
    /// calendar load, matching the conflict predicate.
    pub fn month_view(
        state: &EngineState,
        trainer_id: Uuid,
        year: i32,
        month: u32,
    ) -> Vec<DayCell> {
        let appointments = state.appointments.list_for_trainer(trainer_id, None);
        month_grid(year, month)
            .into_iter()
            .map(|date| DayCell {
                date,
                appointment_count: date
                    .map(|d| {
                        appointments
                            .iter()
                            .filter(|a| a.date == d && a.status == AppointmentStatus::Scheduled)
                            .count()
                    })
                    .unwrap_or(0),
            })
            .collect()
    }
}
