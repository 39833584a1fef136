//! Leaderboard aggregator
//!
//! Produces a ranked snapshot for a period from the full ledger, with
//! a total and stable tie-break so identical input always yields the
//! identical order. Badges are display-only annotations, recomputed on
//! every build.

use std::collections::HashMap;

use chrono::{DateTime, Datelike, Duration, Utc};
use tracing::debug;

use trainhub_shared::models::{ClientPoints, LeaderboardEntry};

use crate::services::ledger::replay_history;
use crate::state::EngineState;

/// Period a leaderboard ranks over
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LeaderboardPeriod {
    Weekly,
    Monthly,
}

impl LeaderboardPeriod {
    /// Snapshot key for the period containing `now`
    /// ("2024-W13" / "2024-03")
    pub fn key(self, now: DateTime<Utc>) -> String {
        let date = now.date_naive();
        match self {
            LeaderboardPeriod::Weekly => {
                let week = date.iso_week();
                format!("{}-W{:02}", week.year(), week.week())
            }
            LeaderboardPeriod::Monthly => format!("{}-{:02}", date.year(), date.month()),
        }
    }

    /// Snapshot key for the period immediately before `now`'s
    pub fn previous_key(self, now: DateTime<Utc>) -> String {
        match self {
            LeaderboardPeriod::Weekly => self.key(now - Duration::days(7)),
            LeaderboardPeriod::Monthly => {
                let date = now.date_naive();
                let first = date.with_day(1).unwrap_or(date);
                let prev = first.pred_opt().unwrap_or(first);
                format!("{}-{:02}", prev.year(), prev.month())
            }
        }
    }

    /// The period's point total for a client
    pub fn points_for(self, points: &ClientPoints) -> i64 {
        match self {
            LeaderboardPeriod::Weekly => points.weekly_points,
            LeaderboardPeriod::Monthly => points.monthly_points,
        }
    }
}

/// Leaderboard service
pub struct LeaderboardService;

impl LeaderboardService {
    /// Build the ranked leaderboard for a period
    ///
    /// Reads every ledger under a single lock and replays each client
    /// against the same `now`, so the ranking is computed over one
    /// consistent view. Order: period points descending, then current
    /// streak descending, then client id ascending. `change` is
    /// `previous_rank - rank` against the preceding period's stored
    /// snapshot (0 when that period was never built). The build stores
    /// the current period's ranks for the next one.
    pub fn build_leaderboard(
        state: &EngineState,
        period: LeaderboardPeriod,
        now: DateTime<Utc>,
    ) -> Vec<LeaderboardEntry> {
        let config = state.config();
        let mut standings: Vec<ClientPoints> = state
            .ledger
            .histories_all()
            .into_iter()
            .map(|(client_id, history)| replay_history(client_id, &history, config, now))
            .collect();

        standings.sort_by(|a, b| {
            period
                .points_for(b)
                .cmp(&period.points_for(a))
                .then(b.streak.current.cmp(&a.streak.current))
                .then(a.client_id.cmp(&b.client_id))
        });

        let previous = state.snapshots.ranks(&period.previous_key(now));
        let mut current_ranks = HashMap::with_capacity(standings.len());

        let entries: Vec<LeaderboardEntry> = standings
            .iter()
            .enumerate()
            .map(|(i, points)| {
                let rank = (i + 1) as u32;
                current_ranks.insert(points.client_id, rank);
                let change = previous
                    .as_ref()
                    .and_then(|ranks| ranks.get(&points.client_id))
                    .map(|prev| *prev as i32 - rank as i32)
                    .unwrap_or(0);
                LeaderboardEntry {
                    client_id: points.client_id,
                    points: period.points_for(points),
                    rank,
                    change,
                    badges: badges_for(points, rank, config.streaks.badge_threshold),
                }
            })
            .collect();

        state.snapshots.save(period.key(now), current_ranks);
        debug!(period = ?period, entries = entries.len(), "leaderboard built");
        entries
    }
}

/// Display badges; never persisted as authoritative state
fn badges_for(points: &ClientPoints, rank: u32, streak_threshold: u32) -> Vec<String> {
    let mut badges = Vec::new();
    if rank == 1 {
        badges.push("🏆".to_string());
    }
    if points.streak.current >= streak_threshold {
        badges.push("🔥".to_string());
    }
    badges
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_period_keys() {
        // 2024-03-25 is a Monday in ISO week 13
        let now = Utc.with_ymd_and_hms(2024, 3, 25, 12, 0, 0).unwrap();
        assert_eq!(LeaderboardPeriod::Weekly.key(now), "2024-W13");
        assert_eq!(LeaderboardPeriod::Weekly.previous_key(now), "2024-W12");
        assert_eq!(LeaderboardPeriod::Monthly.key(now), "2024-03");
        assert_eq!(LeaderboardPeriod::Monthly.previous_key(now), "2024-02");
    }

    #[test]
    fn test_period_serializes_lowercase() {
        assert_eq!(
            serde_json::to_value(LeaderboardPeriod::Weekly).unwrap(),
            "weekly"
        );
        assert_eq!(
            serde_json::to_value(LeaderboardPeriod::Monthly).unwrap(),
            "monthly"
        );
    }

    #[test]
    fn test_previous_month_crosses_year() {
        let now = Utc.with_ymd_and_hms(2024, 1, 10, 0, 0, 0).unwrap();
        assert_eq!(LeaderboardPeriod::Monthly.previous_key(now), "2023-12");
    }
}
