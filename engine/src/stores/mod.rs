//! In-memory stores
//!
//! Data access layer for the engine. Each store guards its map with an
//! `RwLock` and keeps its invariant-bearing mutation (conflict check,
//! transition check, stock decrement, ledger fold) inside a single
//! critical section.

pub mod appointments;
pub mod events;
pub mod ledger;
pub mod missions;
pub mod rewards;
pub mod snapshots;

pub use appointments::{find_conflict, AppointmentStore};
pub use events::{EventBus, StoreEvent};
pub use ledger::LedgerStore;
pub use missions::MissionStore;
pub use rewards::RewardStore;
pub use snapshots::SnapshotStore;
