//! In-memory appointment store
//!
//! Owns the conflict-detection critical section: the overlap check and
//! the insert happen under a single write lock, so two concurrent
//! bookings cannot both pass the check.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use chrono::{NaiveDate, NaiveTime};
use uuid::Uuid;

use trainhub_shared::errors::DomainError;
use trainhub_shared::models::{Appointment, AppointmentStatus};
use trainhub_shared::time::ranges_overlap;

/// Find the first scheduled appointment for `trainer_id` on `date`
/// whose `[start, end)` overlaps the candidate slot
pub fn find_conflict<'a>(
    trainer_id: Uuid,
    date: NaiveDate,
    start: NaiveTime,
    end: NaiveTime,
    existing: impl IntoIterator<Item = &'a Appointment>,
) -> Option<Uuid> {
    existing
        .into_iter()
        .filter(|a| {
            a.trainer_id == trainer_id
                && a.date == date
                && a.status == AppointmentStatus::Scheduled
        })
        .find(|a| ranges_overlap(start, end, a.start_time, a.end_time))
        .map(|a| a.id)
}

/// Appointment store
#[derive(Debug, Default)]
pub struct AppointmentStore {
    inner: RwLock<HashMap<Uuid, Appointment>>,
}

impl AppointmentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert the appointment unless it double-books its trainer
    ///
    /// Check-then-insert runs under one write lock.
    pub fn book(&self, appointment: Appointment) -> Result<Appointment, DomainError> {
        let mut map = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        if let Some(conflicting_id) = find_conflict(
            appointment.trainer_id,
            appointment.date,
            appointment.start_time,
            appointment.end_time,
            map.values(),
        ) {
            return Err(DomainError::SchedulingConflict { conflicting_id });
        }
        map.insert(appointment.id, appointment.clone());
        Ok(appointment)
    }

    /// Advisory conflict probe; the booking path re-checks under its
    /// own lock, so this result may be stale by the time it is used.
    pub fn conflict_for(
        &self,
        trainer_id: Uuid,
        date: NaiveDate,
        start: NaiveTime,
        end: NaiveTime,
    ) -> Option<Uuid> {
        let map = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        find_conflict(trainer_id, date, start, end, map.values())
    }

    pub fn get(&self, id: Uuid) -> Option<Appointment> {
        let map = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        map.get(&id).cloned()
    }

    /// Move an appointment to a terminal status
    ///
    /// Only `scheduled -> completed` and `scheduled -> cancelled` are
    /// legal; completed/cancelled appointments are never resurrected.
    /// `Ok(None)` means the appointment does not exist.
    pub fn set_status(
        &self,
        id: Uuid,
        next: AppointmentStatus,
    ) -> Result<Option<Appointment>, DomainError> {
        let mut map = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        let Some(appointment) = map.get_mut(&id) else {
            return Ok(None);
        };
        if appointment.status != AppointmentStatus::Scheduled
            || next == AppointmentStatus::Scheduled
        {
            return Err(DomainError::InvalidTransition(format!(
                "appointment {id}: {} -> {next}",
                appointment.status
            )));
        }
        appointment.status = next;
        Ok(Some(appointment.clone()))
    }

    /// Appointments for one trainer, optionally restricted to a day,
    /// sorted by date then start time
    pub fn list_for_trainer(&self, trainer_id: Uuid, date: Option<NaiveDate>) -> Vec<Appointment> {
        let map = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        let mut out: Vec<Appointment> = map
            .values()
            .filter(|a| a.trainer_id == trainer_id && date.map_or(true, |d| a.date == d))
            .cloned()
            .collect();
        out.sort_by_key(|a| (a.date, a.start_time));
        out
    }

    pub fn remove(&self, id: Uuid) -> Option<Appointment> {
        let mut map = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        map.remove(&id)
    }
}
