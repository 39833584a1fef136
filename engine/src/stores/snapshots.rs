//! Leaderboard snapshot store
//!
//! Keeps the 1-based ranks of past leaderboard builds keyed by period
//! label ("2024-W13", "2024-03"), so the next period's build can
//! compute rank deltas. Ranks only; entries themselves are always
//! rebuilt from the ledger.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use uuid::Uuid;

/// Stored ranks per period
#[derive(Debug, Default)]
pub struct SnapshotStore {
    inner: RwLock<HashMap<String, HashMap<Uuid, u32>>>,
}

impl SnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ranks recorded for a period, if that period was ever built
    pub fn ranks(&self, period_key: &str) -> Option<HashMap<Uuid, u32>> {
        let map = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        map.get(period_key).cloned()
    }

    /// Record (or overwrite) the ranks for a period
    pub fn save(&self, period_key: String, ranks: HashMap<Uuid, u32>) {
        let mut map = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        map.insert(period_key, ranks);
    }
}
