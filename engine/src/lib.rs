//! TrainHub Engine
//!
//! In-memory core for the personal-training application: appointment
//! scheduling with conflict detection, the mission progress engine,
//! the points ledger, and the leaderboard aggregator. The host is
//! responsible for persistence and presentation; this crate exposes
//! the rules.

pub mod config;
pub mod error;
pub mod services;
pub mod state;
pub mod stores;

pub use config::EngineConfig;
pub use error::{EngineError, EngineResult};
pub use state::EngineState;
