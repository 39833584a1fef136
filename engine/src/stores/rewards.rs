//! In-memory reward catalog store

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use uuid::Uuid;

use trainhub_shared::errors::DomainError;
use trainhub_shared::models::Reward;

/// Reward catalog store
#[derive(Debug, Default)]
pub struct RewardStore {
    inner: RwLock<HashMap<Uuid, Reward>>,
}

impl RewardStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, reward: Reward) {
        let mut map = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        map.insert(reward.id, reward);
    }

    pub fn get(&self, id: Uuid) -> Option<Reward> {
        let map = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        map.get(&id).cloned()
    }

    pub fn list(&self) -> Vec<Reward> {
        let map = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        let mut out: Vec<Reward> = map.values().cloned().collect();
        out.sort_by(|a, b| a.name.cmp(&b.name));
        out
    }

    /// Decrement stock by one, check-then-decrement under one lock
    ///
    /// `Ok(None)` means the reward does not exist; unlimited-stock
    /// rewards always succeed.
    pub fn take_stock(&self, id: Uuid) -> Result<Option<Reward>, DomainError> {
        let mut map = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        let Some(reward) = map.get_mut(&id) else {
            return Ok(None);
        };
        match reward.stock {
            Some(0) => Err(DomainError::OutOfStock),
            Some(n) => {
                reward.stock = Some(n - 1);
                Ok(Some(reward.clone()))
            }
            None => Ok(Some(reward.clone())),
        }
    }

    pub fn remove(&self, id: Uuid) -> Option<Reward> {
        let mut map = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        map.remove(&id)
    }
}
