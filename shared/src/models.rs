//! Data models for the TrainHub core

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::DomainError;
use crate::types::MissionTarget;

/// Kind of trainer/client meeting
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AppointmentType {
    Personal,
    Group,
    Consultation,
}

/// Appointment lifecycle status
///
/// `Completed` and `Cancelled` are terminal; an appointment is never
/// resurrected once it leaves `Scheduled`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AppointmentStatus {
    Scheduled,
    Completed,
    Cancelled,
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            AppointmentStatus::Scheduled => "scheduled",
            AppointmentStatus::Completed => "completed",
            AppointmentStatus::Cancelled => "cancelled",
        };
        write!(f, "{label}")
    }
}

/// A scheduled meeting between one trainer and one client
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Appointment {
    pub id: Uuid,
    pub client_id: Uuid,
    pub trainer_id: Uuid,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub location: String,
    pub kind: AppointmentType,
    pub status: AppointmentStatus,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Mission lifecycle status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MissionStatus {
    Active,
    Paused,
    Completed,
    Expired,
}

impl MissionStatus {
    /// Completed and expired missions freeze their progress
    pub fn is_terminal(self) -> bool {
        matches!(self, MissionStatus::Completed | MissionStatus::Expired)
    }
}

impl fmt::Display for MissionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            MissionStatus::Active => "active",
            MissionStatus::Paused => "paused",
            MissionStatus::Completed => "completed",
            MissionStatus::Expired => "expired",
        };
        write!(f, "{label}")
    }
}

/// Mission difficulty, mapped to a fixed point value
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
    Extreme,
}

impl Difficulty {
    /// Points awarded on completing a mission of this difficulty
    pub fn points(self) -> i64 {
        match self {
            Difficulty::Easy => 25,
            Difficulty::Medium => 50,
            Difficulty::Hard => 100,
            Difficulty::Extreme => 200,
        }
    }
}

impl FromStr for Difficulty {
    type Err = DomainError;

    /// Parse a difficulty label; anything outside the fixed set fails
    /// with `InvalidDifficulty` rather than defaulting.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            "extreme" => Ok(Difficulty::Extreme),
            other => Err(DomainError::InvalidDifficulty(other.to_string())),
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
            Difficulty::Extreme => "extreme",
        };
        write!(f, "{label}")
    }
}

/// Mission category
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MissionCategory {
    Fitness,
    Nutrition,
    Lifestyle,
    Challenge,
}

/// A goal assigned by a trainer to a client
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Mission {
    pub id: Uuid,
    pub trainer_id: Uuid,
    pub client_id: Uuid,
    pub title: String,
    pub description: String,
    pub target: MissionTarget,
    pub difficulty: Difficulty,
    pub category: MissionCategory,
    pub status: MissionStatus,
    /// Completion percentage, 0 through 100
    pub progress: u8,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub completed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Consecutive-activity-day counter
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Streak {
    pub current: u32,
    pub longest: u32,
    pub last_activity: Option<NaiveDate>,
}

/// Running incentive ledger summary for one client
///
/// Derived entirely by replaying the client's transaction history;
/// a stored copy is only a cache subject to audit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientPoints {
    pub client_id: Uuid,
    pub total_points: i64,
    pub current_level: u32,
    pub points_to_next_level: i64,
    pub weekly_points: i64,
    pub monthly_points: i64,
    pub streak: Streak,
    pub achievements: BTreeSet<String>,
    pub last_updated: DateTime<Utc>,
}

/// Ledger entry kind
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Earned,
    Bonus,
    Penalty,
    Redeemed,
}

impl TransactionType {
    /// Whether this entry counts as client activity for streak purposes
    pub fn is_activity(self) -> bool {
        matches!(self, TransactionType::Earned | TransactionType::Bonus)
    }
}

/// An immutable, append-only points ledger entry
///
/// `points` is signed: penalty and redeemed entries carry negative
/// values. Summing a client's entries reconstructs their total exactly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PointsTransaction {
    pub id: Uuid,
    pub client_id: Uuid,
    pub kind: TransactionType,
    pub points: i64,
    pub reason: String,
    pub related_id: Option<Uuid>,
    pub related_kind: Option<String>,
    pub timestamp: DateTime<Utc>,
    pub description: Option<String>,
}

/// A redeemable catalog item defined by a trainer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reward {
    pub id: Uuid,
    pub trainer_id: Uuid,
    pub name: String,
    pub description: String,
    /// Cost in points
    pub cost: i64,
    /// Remaining stock; `None` means unlimited
    pub stock: Option<u32>,
    /// Minimum client level required to claim
    pub min_level: Option<u32>,
}

/// A successful reward redemption
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RewardClaim {
    pub id: Uuid,
    pub client_id: Uuid,
    pub reward_id: Uuid,
    pub cost: i64,
    pub claimed_at: DateTime<Utc>,
}

/// One ranked row of a leaderboard snapshot
///
/// Derived, never stored as source of truth. `change` is
/// `previous_rank - rank`, so positive means the client moved up.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LeaderboardEntry {
    pub client_id: Uuid,
    pub points: i64,
    pub rank: u32,
    pub change: i32,
    pub badges: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_difficulty_point_table() {
        assert_eq!(Difficulty::Easy.points(), 25);
        assert_eq!(Difficulty::Medium.points(), 50);
        assert_eq!(Difficulty::Hard.points(), 100);
        assert_eq!(Difficulty::Extreme.points(), 200);
    }

    #[test]
    fn test_difficulty_parse_rejects_unknown() {
        assert_eq!("hard".parse::<Difficulty>(), Ok(Difficulty::Hard));
        let err = "impossible".parse::<Difficulty>().unwrap_err();
        assert_eq!(err, DomainError::InvalidDifficulty("impossible".to_string()));
    }

    #[test]
    fn test_terminal_statuses_freeze() {
        assert!(MissionStatus::Completed.is_terminal());
        assert!(MissionStatus::Expired.is_terminal());
        assert!(!MissionStatus::Active.is_terminal());
        assert!(!MissionStatus::Paused.is_terminal());
    }

    #[test]
    fn test_activity_bearing_transaction_kinds() {
        assert!(TransactionType::Earned.is_activity());
        assert!(TransactionType::Bonus.is_activity());
        assert!(!TransactionType::Penalty.is_activity());
        assert!(!TransactionType::Redeemed.is_activity());
    }
}
