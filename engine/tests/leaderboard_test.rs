//! Integration tests for the leaderboard aggregator

mod common;

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use common::{at, test_state};
use trainhub_engine::services::{LeaderboardPeriod, LeaderboardService, LedgerService};
use trainhub_engine::EngineState;
use trainhub_shared::models::{PointsTransaction, TransactionType};
use uuid::Uuid;

fn earn(state: &EngineState, client_id: Uuid, points: i64, timestamp: DateTime<Utc>) {
    LedgerService::apply_transaction(
        state,
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
        },
        timestamp,
    )
    .unwrap();
}

#[test]
fn test_weekly_ranking_and_change_vs_previous_period() {
    let state = test_state();
    let now = at(2024, 3, 27, 12, 0);
    let leader = Uuid::new_v4();
    let runner_up = Uuid::new_v4();

    earn(&state, leader, 275, at(2024, 3, 26, 9, 0));
    earn(&state, runner_up, 180, at(2024, 3, 26, 10, 0));

    // last week had them the other way around
    let mut previous = HashMap::new();
    previous.insert(leader, 2);
    previous.insert(runner_up, 1);
    state
        .snapshots
        .save(LeaderboardPeriod::Weekly.previous_key(now), previous);

    let board = LeaderboardService::build_leaderboard(&state, LeaderboardPeriod::Weekly, now);
    assert_eq!(board.len(), 2);

    assert_eq!(board[0].client_id, leader);
    assert_eq!(board[0].points, 275);
    assert_eq!(board[0].rank, 1);
    assert_eq!(board[0].change, 1);

    assert_eq!(board[1].client_id, runner_up);
    assert_eq!(board[1].points, 180);
    assert_eq!(board[1].rank, 2);
    assert_eq!(board[1].change, -1);
}

#[test]
fn test_change_is_zero_without_previous_snapshot() {
    let state = test_state();
    let now = at(2024, 3, 27, 12, 0);
    earn(&state, Uuid::new_v4(), 100, at(2024, 3, 26, 9, 0));

    let board = LeaderboardService::build_leaderboard(&state, LeaderboardPeriod::Weekly, now);
    assert_eq!(board[0].change, 0);
}

#[test]
fn test_build_is_deterministic() {
    let state = test_state();
    let now = at(2024, 3, 27, 12, 0);
    for points in [120, 45, 45, 310, 45] {
        earn(&state, Uuid::new_v4(), points, at(2024, 3, 26, 9, 0));
    }

    let first = LeaderboardService::build_leaderboard(&state, LeaderboardPeriod::Weekly, now);
    let second = LeaderboardService::build_leaderboard(&state, LeaderboardPeriod::Weekly, now);
    assert_eq!(first, second);
    for (i, entry) in first.iter().enumerate() {
        assert_eq!(entry.rank, (i + 1) as u32);
    }
}

#[test]
fn test_ties_break_by_client_id() {
    let state = test_state();
    let now = at(2024, 3, 27, 12, 0);
    let a = Uuid::new_v4();
    let b = Uuid::new_v4();
    // identical points and streaks
    earn(&state, a, 50, at(2024, 3, 26, 9, 0));
    earn(&state, b, 50, at(2024, 3, 26, 9, 0));

    let board = LeaderboardService::build_leaderboard(&state, LeaderboardPeriod::Weekly, now);
    let (lo, hi) = if a < b { (a, b) } else { (b, a) };
    assert_eq!(board[0].client_id, lo);
    assert_eq!(board[1].client_id, hi);
}

#[test]
fn test_monthly_period_uses_monthly_points() {
    let state = test_state();
    let now = at(2024, 3, 27, 12, 0);
    let client = Uuid::new_v4();
    // outside the weekly window, inside the monthly one
    earn(&state, client, 80, at(2024, 3, 5, 9, 0));

    let weekly = LeaderboardService::build_leaderboard(&state, LeaderboardPeriod::Weekly, now);
    assert_eq!(weekly[0].points, 0);

    let monthly = LeaderboardService::build_leaderboard(&state, LeaderboardPeriod::Monthly, now);
    assert_eq!(monthly[0].points, 80);
}

#[test]
fn test_badges_for_rank_and_streak() {
    let state = test_state();
    let now = at(2024, 3, 27, 12, 0);
    let streaker = Uuid::new_v4();
    let casual = Uuid::new_v4();

    // seven consecutive days of activity, ending yesterday
    for day in 20..=26 {
        earn(&state, streaker, 10, at(2024, 3, day, 9, 0));
    }
    earn(&state, casual, 5, at(2024, 3, 26, 9, 0));

    let board = LeaderboardService::build_leaderboard(&state, LeaderboardPeriod::Weekly, now);
    assert_eq!(board[0].client_id, streaker);
    assert!(board[0].badges.contains(&"🏆".to_string()));
    assert!(board[0].badges.contains(&"🔥".to_string()));
    assert!(board[1].badges.is_empty());
}
