//! Mission progress engine
//!
//! Owns mission state transitions and translates completion into point
//! awards. Expiry is lazy: it runs when missions are loaded or listed,
//! not on a background timer.

use chrono::{DateTime, Utc};
use tracing::{debug, info};
use uuid::Uuid;
use validator::Validate;

use trainhub_shared::errors::DomainError;
use trainhub_shared::models::{Mission, MissionStatus, PointsTransaction, TransactionType};
use trainhub_shared::types::NewMission;
use trainhub_shared::validation::{validate_mission_dates, validate_progress_delta};

use crate::error::{EngineError, EngineResult};
use crate::services::ledger::LedgerService;
use crate::state::EngineState;
use crate::stores::StoreEvent;

/// Whether a mission's deadline has passed without completion
///
/// Active or paused, past the end date, and short of 100%: the mission
/// should expire. Terminal missions never re-expire, which makes the
/// check idempotent.
pub fn is_past_deadline(mission: &Mission, now: DateTime<Utc>) -> bool {
    matches!(
        mission.status,
        MissionStatus::Active | MissionStatus::Paused
    ) && now.date_naive() > mission.end_date
        && mission.progress < 100
}

/// Mission service
pub struct MissionService;

impl MissionService {
    /// Create a mission; starts active at 0% progress
    pub fn create_mission(
        state: &EngineState,
        input: NewMission,
        now: DateTime<Utc>,
    ) -> EngineResult<Mission> {
        input
            .validate()
            .map_err(|e| DomainError::Validation(e.to_string()))?;
        validate_mission_dates(input.start_date, input.end_date)
            .map_err(DomainError::Validation)?;

        let mission = Mission {
            id: Uuid::new_v4(),
            trainer_id: input.trainer_id,
            client_id: input.client_id,
            title: input.title,
            description: input.description,
            target: input.target,
            difficulty: input.difficulty,
            category: input.category,
            status: MissionStatus::Active,
            progress: 0,
            start_date: input.start_date,
            end_date: input.end_date,
            completed_at: None,
            created_at: now,
            updated_at: now,
        };
        state.missions.insert(mission.clone());
        info!(mission_id = %mission.id, client_id = %mission.client_id, "mission created");
        state.events.publish(StoreEvent::MissionChanged {
            id: mission.id,
            status: mission.status,
        });
        Ok(mission)
    }

    /// Record progress toward a mission's target
    ///
    /// The increment is clamped so progress never exceeds 100. Reaching
    /// 100 while active completes the mission and awards the difficulty
    /// point value to the client as an `earned` transaction.
    pub fn record_progress(
        state: &EngineState,
        mission_id: Uuid,
        delta: u8,
        now: DateTime<Utc>,
    ) -> EngineResult<Mission> {
        validate_progress_delta(delta).map_err(DomainError::Validation)?;

        let updated = state.missions.update(mission_id, |mission| {
            if mission.status != MissionStatus::Active {
                return Err(DomainError::InvalidTransition(format!(
                    "cannot record progress on a {} mission",
                    mission.status
                )));
            }
            mission.progress = (u32::from(mission.progress) + u32::from(delta)).min(100) as u8;
            mission.updated_at = now;
            if mission.progress == 100 {
                mission.status = MissionStatus::Completed;
                mission.completed_at = Some(now);
                return Ok(true);
            }
            Ok(false)
        })?;
        let Some((mission, completed)) = updated else {
            return Err(EngineError::NotFound(format!("mission {mission_id}")));
        };

        if completed {
            let award = completion_tx(&mission, now);
            LedgerService::apply_transaction(state, award, now)?;
            info!(
                mission_id = %mission.id,
                client_id = %mission.client_id,
                points = mission.difficulty.points(),
                "mission completed"
            );
        } else {
            debug!(mission_id = %mission.id, progress = mission.progress, "progress recorded");
        }
        state.events.publish(StoreEvent::MissionChanged {
            id: mission.id,
            status: mission.status,
        });
        Ok(mission)
    }

    /// Expire a mission whose deadline has passed
    ///
    /// No points are awarded and progress stays frozen where it was.
    /// Calling this on an already-expired mission changes nothing.
    pub fn check_expiry(
        state: &EngineState,
        mission_id: Uuid,
        now: DateTime<Utc>,
    ) -> EngineResult<Mission> {
        let updated = state.missions.update(mission_id, |mission| {
            if is_past_deadline(mission, now) {
                mission.status = MissionStatus::Expired;
                mission.updated_at = now;
                return Ok(true);
            }
            Ok(false)
        })?;
        let Some((mission, expired)) = updated else {
            return Err(EngineError::NotFound(format!("mission {mission_id}")));
        };
        if expired {
            debug!(mission_id = %mission.id, "mission expired");
            state.events.publish(StoreEvent::MissionChanged {
                id: mission.id,
                status: mission.status,
            });
        }
        Ok(mission)
    }

    /// Missions for a client, newest first, with lazy expiry applied
    pub fn list_missions(
        state: &EngineState,
        client_id: Uuid,
        now: DateTime<Utc>,
    ) -> EngineResult<Vec<Mission>> {
        let mut out = Vec::new();
        for mission in state.missions.list_for_client(client_id) {
            if is_past_deadline(&mission, now) {
                out.push(Self::check_expiry(state, mission.id, now)?);
            } else {
                out.push(mission);
            }
        }
        Ok(out)
    }

    /// Pause an active mission
    pub fn pause(state: &EngineState, mission_id: Uuid, now: DateTime<Utc>) -> EngineResult<Mission> {
        Self::transition(state, mission_id, MissionStatus::Active, MissionStatus::Paused, now)
    }

    /// Resume a paused mission
    pub fn resume(
        state: &EngineState,
        mission_id: Uuid,
        now: DateTime<Utc>,
    ) -> EngineResult<Mission> {
        Self::transition(state, mission_id, MissionStatus::Paused, MissionStatus::Active, now)
    }

    /// Delete a mission; legal from any state
    pub fn delete_mission(state: &EngineState, mission_id: Uuid) -> EngineResult<Mission> {
        let mission = state
            .missions
            .remove(mission_id)
            .ok_or_else(|| EngineError::NotFound(format!("mission {mission_id}")))?;
        info!(mission_id = %mission.id, "mission deleted");
        Ok(mission)
    }

    fn transition(
        state: &EngineState,
        mission_id: Uuid,
        from: MissionStatus,
        to: MissionStatus,
        now: DateTime<Utc>,
    ) -> EngineResult<Mission> {
        let updated = state.missions.update(mission_id, |mission| {
            if mission.status != from {
                return Err(DomainError::InvalidTransition(format!(
                    "mission {mission_id}: {} -> {to}",
                    mission.status
                )));
            }
            mission.status = to;
            mission.updated_at = now;
            Ok(())
        })?;
        let Some((mission, ())) = updated else {
            return Err(EngineError::NotFound(format!("mission {mission_id}")));
        };
        state.events.publish(StoreEvent::MissionChanged {
            id: mission.id,
            status: mission.status,
        });
        Ok(mission)
    }
}

fn completion_tx(mission: &Mission, now: DateTime<Utc>) -> PointsTransaction {
    PointsTransaction {
        id: Uuid::new_v4(),
        client_id: mission.client_id,
        kind: TransactionType::Earned,
        points: mission.difficulty.points(),
        reason: format!("mission completed: {}", mission.title),
        related_id: Some(mission.id),
        related_kind: Some("mission".to_string()),
        timestamp: now,
        description: None,
    }
}
