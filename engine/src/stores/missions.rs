//! In-memory mission store
//!
//! Read-modify-write goes through `update` so a transition check and
//! the mutation it guards happen under one write lock, and a failed
//! check leaves the stored mission untouched.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use uuid::Uuid;

use trainhub_shared::errors::DomainError;
use trainhub_shared::models::Mission;

/// Mission store
#[derive(Debug, Default)]
pub struct MissionStore {
    inner: RwLock<HashMap<Uuid, Mission>>,
}

impl MissionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, mission: Mission) {
        let mut map = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        map.insert(mission.id, mission);
    }

    pub fn get(&self, id: Uuid) -> Option<Mission> {
        let map = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        map.get(&id).cloned()
    }

    /// Apply `f` to a copy of the mission and commit it only on success
    ///
    /// Returns `Ok(None)` when the mission does not exist, otherwise
    /// the committed mission together with `f`'s output.
    pub fn update<T>(
        &self,
        id: Uuid,
        f: impl FnOnce(&mut Mission) -> Result<T, DomainError>,
    ) -> Result<Option<(Mission, T)>, DomainError> {
        let mut map = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        let Some(stored) = map.get_mut(&id) else {
            return Ok(None);
        };
        let mut candidate = stored.clone();
        let out = f(&mut candidate)?;
        *stored = candidate.clone();
        Ok(Some((candidate, out)))
    }

    /// Missions for one client, newest first
    pub fn list_for_client(&self, client_id: Uuid) -> Vec<Mission> {
        let map = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        let mut out: Vec<Mission> = map
            .values()
            .filter(|m| m.client_id == client_id)
            .cloned()
            .collect();
        out.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        out
    }

    pub fn list_all(&self) -> Vec<Mission> {
        let map = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        let mut out: Vec<Mission> = map.values().cloned().collect();
        out.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        out
    }

    pub fn remove(&self, id: Uuid) -> Option<Mission> {
        let mut map = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        map.remove(&id)
    }
}
