//! Engine state
//!
//! Bundles the stores, configuration, and event bus the services
//! operate on. All fields are `Arc`-backed so cloning the state is
//! O(1) and every clone sees the same underlying data.

use std::sync::Arc;

use crate::config::EngineConfig;
use crate::stores::{
    AppointmentStore, EventBus, LedgerStore, MissionStore, RewardStore, SnapshotStore,
};

/// Shared engine state
#[derive(Clone)]
pub struct EngineState {
    pub config: Arc<EngineConfig>,
    pub appointments: Arc<AppointmentStore>,
    pub missions: Arc<MissionStore>,
    pub ledger: Arc<LedgerStore>,
    pub rewards: Arc<RewardStore>,
    pub snapshots: Arc<SnapshotStore>,
    pub events: EventBus,
}

impl EngineState {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config: Arc::new(config),
            appointments: Arc::new(AppointmentStore::new()),
            missions: Arc::new(MissionStore::new()),
            ledger: Arc::new(LedgerStore::new()),
            rewards: Arc::new(RewardStore::new()),
            snapshots: Arc::new(SnapshotStore::new()),
            events: EventBus::default(),
        }
    }

    #[inline]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }
}

impl Default for EngineState {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}
