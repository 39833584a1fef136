//! Business logic services
//!
//! Services encapsulate the core rules and coordinate between stores,
//! the ledger fold, and the event bus.

pub mod leaderboard;
pub mod ledger;
pub mod missions;
pub mod scheduling;

pub use leaderboard::{LeaderboardPeriod, LeaderboardService};
pub use ledger::{level_for_points, replay_history, LedgerService, LevelInfo};
pub use missions::MissionService;
pub use scheduling::{DayCell, SchedulingService};
