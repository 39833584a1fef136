//! Points ledger service
//!
//! Maintains `ClientPoints` as a fold over the transaction history.
//! Replay is the source of truth: every application re-folds the full
//! history, and the audit path compares the cached total against a
//! fresh replay.

use std::collections::BTreeSet;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use tracing::{debug, info};
use uuid::Uuid;

use trainhub_shared::errors::DomainError;
use trainhub_shared::models::{
    ClientPoints, PointsTransaction, Reward, RewardClaim, Streak, TransactionType,
};
use trainhub_shared::validation::validate_reward_cost;

use crate::config::EngineConfig;
use crate::error::{EngineError, EngineResult};
use crate::state::EngineState;
use crate::stores::StoreEvent;

/// Level derived from a point total
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelInfo {
    pub level: u32,
    pub points_to_next_level: i64,
}

/// Map a point total to a level
///
/// Levels start at 1. Advancing from level n to n+1 costs
/// `base_step * n`, so the cumulative threshold to reach level n is
/// `base_step * n * (n - 1) / 2` and the per-level requirement is
/// strictly increasing. Deterministic and monotone in `total_points`.
pub fn level_for_points(total_points: i64, base_step: i64) -> LevelInfo {
    let total = total_points.max(0);
    let step = base_step.max(1);
    let mut level: u32 = 1;
    let mut threshold: i64 = 0;
    loop {
        let next = threshold + step * i64::from(level);
        if total < next {
            return LevelInfo {
                level,
                points_to_next_level: next - total,
            };
        }
        threshold = next;
        level += 1;
    }
}

/// Advance a streak for activity on `activity_day`
///
/// Same calendar day: unchanged. Exactly the next day: current + 1.
/// A gap of more than one day starts over at 1. `longest` tracks the
/// running maximum.
pub fn update_streak(streak: &Streak, activity_day: NaiveDate) -> Streak {
    let current = match streak.last_activity {
        Some(last) if activity_day <= last => return streak.clone(),
        Some(last) if (activity_day - last).num_days() == 1 => streak.current + 1,
        _ => 1,
    };
    Streak {
        current,
        longest: streak.longest.max(current),
        last_activity: Some(activity_day),
    }
}

/// Reset a streak that has gone cold
///
/// A streak whose last activity is more than one calendar day before
/// `today` drops to 0; `longest` is preserved.
pub fn decay_streak(streak: &Streak, today: NaiveDate) -> Streak {
    match streak.last_activity {
        Some(last) if (today - last).num_days() > 1 => Streak {
            current: 0,
            ..streak.clone()
        },
        _ => streak.clone(),
    }
}

/// Achievement ids unlocked by the replayed state. Display metadata
/// lives with the host; these are stable identifiers only.
fn derive_achievements(total_points: i64, level: u32, streak: &Streak) -> BTreeSet<String> {
    let mut unlocked = BTreeSet::new();
    if total_points > 0 {
        unlocked.insert("first-points".to_string());
    }
    for milestone in [5u32, 10, 20] {
        if level >= milestone {
            unlocked.insert(format!("level-{milestone}"));
        }
    }
    for days in [7u32, 30] {
        if streak.longest >= days {
            unlocked.insert(format!("streak-{days}"));
        }
    }
    unlocked
}

/// Fold a timestamp-ordered transaction history into `ClientPoints`
pub fn replay_history(
    client_id: Uuid,
    history: &[PointsTransaction],
    config: &EngineConfig,
    now: DateTime<Utc>,
) -> ClientPoints {
    let weekly_cutoff = now - Duration::days(config.windows.weekly_days);
    let monthly_cutoff = now - Duration::days(config.windows.monthly_days);

    let mut total: i64 = 0;
    let mut weekly: i64 = 0;
    let mut monthly: i64 = 0;
    let mut streak = Streak::default();

    for tx in history {
        total += tx.points;
        if tx.timestamp > weekly_cutoff {
            weekly += tx.points;
        }
        if tx.timestamp > monthly_cutoff {
            monthly += tx.points;
        }
        if tx.kind.is_activity() {
            streak = update_streak(&streak, tx.timestamp.date_naive());
        }
    }
    streak = decay_streak(&streak, now.date_naive());

    let level = level_for_points(total, config.levels.base_step);
    let achievements = derive_achievements(total, level.level, &streak);

    ClientPoints {
        client_id,
        total_points: total,
        current_level: level.level,
        points_to_next_level: level.points_to_next_level,
        weekly_points: weekly,
        monthly_points: monthly,
        streak,
        achievements,
        last_updated: now,
    }
}

/// Reject transactions whose sign contradicts their kind
fn validate_transaction(tx: &PointsTransaction) -> Result<(), DomainError> {
    let sign_ok = match tx.kind {
        TransactionType::Earned | TransactionType::Bonus => tx.points >= 0,
        TransactionType::Penalty | TransactionType::Redeemed => tx.points <= 0,
    };
    if !sign_ok {
        return Err(DomainError::Validation(format!(
            "{:?} transaction cannot carry {} points",
            tx.kind, tx.points
        )));
    }
    Ok(())
}

/// Points ledger service
pub struct LedgerService;

impl LedgerService {
    /// Append a transaction and return the refolded client points
    pub fn apply_transaction(
        state: &EngineState,
        tx: PointsTransaction,
        now: DateTime<Utc>,
    ) -> EngineResult<ClientPoints> {
        validate_transaction(&tx)?;
        let config = state.config();
        let client_id = tx.client_id;
        let points = state
            .ledger
            .apply_with(tx, |id, history| replay_history(id, history, config, now));
        debug!(
            client_id = %client_id,
            total_points = points.total_points,
            "transaction applied"
        );
        state.events.publish(StoreEvent::PointsApplied {
            client_id,
            total_points: points.total_points,
        });
        Ok(points)
    }

    /// Current points for a client, replayed against `now`
    ///
    /// A client with no history gets the zero ledger (level 1, empty
    /// streak) rather than an error.
    pub fn client_points(state: &EngineState, client_id: Uuid, now: DateTime<Utc>) -> ClientPoints {
        let history = state.ledger.history(client_id);
        replay_history(client_id, &history, state.config(), now)
    }

    /// Claim a reward for a client
    ///
    /// Preconditions are checked in order: points, level, stock. They
    /// run under the same ledger write lock as the `redeemed` append,
    /// so concurrent claims for one client serialize and the second
    /// claim sees the first one's deduction; the balance cannot be
    /// driven below zero. On failure nothing is mutated; on success
    /// the stock is decremented and a transaction for `-cost` is
    /// appended.
    pub fn claim_reward(
        state: &EngineState,
        client_id: Uuid,
        reward_id: Uuid,
        now: DateTime<Utc>,
    ) -> EngineResult<(ClientPoints, RewardClaim)> {
        let reward = state
            .rewards
            .get(reward_id)
            .ok_or_else(|| EngineError::NotFound(format!("reward {reward_id}")))?;
        validate_reward_cost(reward.cost).map_err(DomainError::Validation)?;

        let config = state.config();
        let updated = state.ledger.try_apply_with(
            redemption_tx(client_id, &reward, now),
            |id, history| replay_history(id, history, config, now),
            |points| {
                if points.total_points < reward.cost {
                    return Err(EngineError::from(DomainError::InsufficientPoints {
                        have: points.total_points,
                        need: reward.cost,
                    }));
                }
                if let Some(required) = reward.min_level {
                    if points.current_level < required {
                        return Err(DomainError::InsufficientLevel {
                            current: points.current_level,
                            required,
                        }
                        .into());
                    }
                }
                // last fallible step before the append commits
                state
                    .rewards
                    .take_stock(reward_id)
                    .map_err(EngineError::from)?
                    .ok_or_else(|| EngineError::NotFound(format!("reward {reward_id}")))?;
                Ok(())
            },
        )?;
        state.events.publish(StoreEvent::PointsApplied {
            client_id,
            total_points: updated.total_points,
        });
        let claim = RewardClaim {
            id: Uuid::new_v4(),
            client_id,
            reward_id,
            cost: reward.cost,
            claimed_at: now,
        };
        info!(
            client_id = %client_id,
            reward_id = %reward_id,
            cost = reward.cost,
            "reward claimed"
        );
        state.events.publish(StoreEvent::RewardClaimed {
            client_id,
            reward_id,
        });
        Ok((updated, claim))
    }

    /// Audit a client's ledger: replay and compare with the cached
    /// total. Returns the replayed value, which is authoritative.
    pub fn verify_ledger(
        state: &EngineState,
        client_id: Uuid,
        now: DateTime<Utc>,
    ) -> EngineResult<ClientPoints> {
        let config = state.config();
        state
            .ledger
            .audit_with(client_id, |id, history| {
                replay_history(id, history, config, now)
            })
            .map_err(EngineError::from)
    }
}

fn redemption_tx(client_id: Uuid, reward: &Reward, now: DateTime<Utc>) -> PointsTransaction {
    PointsTransaction {
        id: Uuid::new_v4(),
        client_id,
        kind: TransactionType::Redeemed,
        points: -reward.cost,
        reason: format!("reward claimed: {}", reward.name),
        related_id: Some(reward.id),
        related_kind: Some("reward".to_string()),
        timestamp: now,
        description: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use proptest::prelude::*;
    use rstest::rstest;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn at(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
    }

    fn earned(client_id: Uuid, points: i64, timestamp: DateTime<Utc>) -> PointsTransaction {
        PointsTransaction {
            id: Uuid::new_v4(),
            client_id,
            kind: TransactionType::Earned,
            points,
            reason: "workout".to_string(),
            related_id: None,
            related_kind: None,
            timestamp,
            description: None,
        }
    }

    #[test]
    fn test_level_thresholds_at_base_100() {
        assert_eq!(level_for_points(0, 100).level, 1);
        assert_eq!(level_for_points(99, 100).level, 1);
        assert_eq!(level_for_points(100, 100).level, 2);
        assert_eq!(level_for_points(299, 100).level, 2);
        assert_eq!(level_for_points(300, 100).level, 3);
        assert_eq!(level_for_points(600, 100).level, 4);
        // 50 into level 1, 50 short of the 100 threshold
        assert_eq!(level_for_points(50, 100).points_to_next_level, 50);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        #[test]
        fn test_level_is_monotone(p1 in 0i64..100_000, delta in 0i64..100_000) {
            let p2 = p1 + delta;
            prop_assert!(
                level_for_points(p1, 100).level <= level_for_points(p2, 100).level
            );
        }

        #[test]
        fn test_points_to_next_level_reaches_next_level(p in 0i64..100_000) {
            let info = level_for_points(p, 100);
            prop_assert!(info.points_to_next_level > 0);
            let bumped = level_for_points(p + info.points_to_next_level, 100);
            prop_assert_eq!(bumped.level, info.level + 1);
        }
    }

    #[rstest]
    // same day: unchanged
    #[case(3, Some(day(2024, 3, 10)), day(2024, 3, 10), 3)]
    // next day: extended
    #[case(3, Some(day(2024, 3, 10)), day(2024, 3, 11), 4)]
    // gap: starts over
    #[case(3, Some(day(2024, 3, 10)), day(2024, 3, 14), 1)]
    // first ever activity
    #[case(0, None, day(2024, 3, 10), 1)]
    fn test_update_streak(
        #[case] current: u32,
        #[case] last_activity: Option<NaiveDate>,
        #[case] activity_day: NaiveDate,
        #[case] expected: u32,
    ) {
        let streak = Streak {
            current,
            longest: current,
            last_activity,
        };
        let updated = update_streak(&streak, activity_day);
        assert_eq!(updated.current, expected);
        assert_eq!(updated.longest, current.max(expected));
    }

    #[test]
    fn test_decay_preserves_longest() {
        let streak = Streak {
            current: 9,
            longest: 9,
            last_activity: Some(day(2024, 3, 1)),
        };
        let decayed = decay_streak(&streak, day(2024, 3, 20));
        assert_eq!(decayed.current, 0);
        assert_eq!(decayed.longest, 9);
        // yesterday's activity is still a live streak
        let fresh = decay_streak(
            &Streak {
                last_activity: Some(day(2024, 3, 19)),
                ..streak
            },
            day(2024, 3, 20),
        );
        assert_eq!(fresh.current, 9);
    }

    #[test]
    fn test_replay_balance_and_windows() {
        let client = Uuid::new_v4();
        let config = EngineConfig::default();
        let now = at(2024, 3, 31, 12);
        let history = vec![
            earned(client, 100, at(2024, 2, 1, 9)),  // outside both windows
            earned(client, 50, at(2024, 3, 10, 9)),  // monthly only
            earned(client, 25, at(2024, 3, 29, 9)),  // weekly and monthly
        ];
        let points = replay_history(client, &history, &config, now);
        assert_eq!(points.total_points, 175);
        assert_eq!(points.weekly_points, 25);
        assert_eq!(points.monthly_points, 75);
        assert_eq!(points.current_level, 2);
    }

    #[test]
    fn test_replay_streak_across_days() {
        let client = Uuid::new_v4();
        let config = EngineConfig::default();
        let history = vec![
            earned(client, 10, at(2024, 3, 10, 8)),
            earned(client, 10, at(2024, 3, 10, 18)), // same day, no double count
            earned(client, 10, at(2024, 3, 11, 8)),
            earned(client, 10, at(2024, 3, 12, 8)),
        ];
        let points = replay_history(client, &history, &config, at(2024, 3, 12, 20));
        assert_eq!(points.streak.current, 3);
        assert_eq!(points.streak.longest, 3);
        assert_eq!(points.streak.last_activity, Some(day(2024, 3, 12)));
    }

    #[test]
    fn test_empty_history_is_zero_ledger() {
        let client = Uuid::new_v4();
        let points = replay_history(client, &[], &EngineConfig::default(), at(2024, 3, 1, 0));
        assert_eq!(points.total_points, 0);
        assert_eq!(points.current_level, 1);
        assert_eq!(points.points_to_next_level, 100);
        assert_eq!(points.streak, Streak::default());
        assert!(points.achievements.is_empty());
    }

    #[test]
    fn test_sign_kind_mismatch_rejected() {
        let mut tx = earned(Uuid::new_v4(), -10, at(2024, 3, 1, 0));
        assert!(validate_transaction(&tx).is_err());
        tx.kind = TransactionType::Penalty;
        assert!(validate_transaction(&tx).is_ok());
    }

    #[test]
    fn test_audit_detects_corrupted_cache() {
        let state = EngineState::default();
        let client = Uuid::new_v4();
        let now = at(2024, 3, 1, 12);
        LedgerService::apply_transaction(&state, earned(client, 100, now), now).unwrap();

        assert!(LedgerService::verify_ledger(&state, client, now).is_ok());

        state.ledger.poison_cached_total(client, 9999);
        let err = LedgerService::verify_ledger(&state, client, now).unwrap_err();
        assert!(matches!(
            err.domain(),
            Some(DomainError::LedgerMismatch {
                cached: 9999,
                replayed: 100,
                ..
            })
        ));
    }
}
