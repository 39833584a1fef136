//! In-memory points ledger store
//!
//! Holds the append-only transaction history per client plus the last
//! folded `ClientPoints`. The fold itself is injected by the service
//! layer; the store guarantees ordering (history is kept sorted by
//! timestamp) and that append + refold happen under one write lock,
//! which serializes application per client.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use uuid::Uuid;

use trainhub_shared::errors::DomainError;
use trainhub_shared::models::{ClientPoints, PointsTransaction};

#[derive(Debug, Default)]
struct ClientLedger {
    cached: Option<ClientPoints>,
    history: Vec<PointsTransaction>,
}

/// Points ledger store
#[derive(Debug, Default)]
pub struct LedgerStore {
    inner: RwLock<HashMap<Uuid, ClientLedger>>,
}

impl LedgerStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a transaction and refold the client's history
    ///
    /// The history is re-sorted by timestamp before folding so entries
    /// are always applied in strictly increasing time order, whatever
    /// order they arrived in.
    pub fn apply_with<F>(&self, tx: PointsTransaction, fold: F) -> ClientPoints
    where
        F: FnOnce(Uuid, &[PointsTransaction]) -> ClientPoints,
    {
        let client_id = tx.client_id;
        let mut map = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        let entry = map.entry(client_id).or_default();
        entry.history.push(tx);
        entry.history.sort_by_key(|t| t.timestamp);
        let points = fold(client_id, &entry.history);
        entry.cached = Some(points.clone());
        points
    }

    /// Append a transaction only if a precondition holds against the
    /// current folded state
    ///
    /// The precondition is evaluated under the same write lock as the
    /// append, so two concurrent conditional applications for one
    /// client serialize: the second one sees the first one's entry.
    /// On rejection the history is untouched.
    pub fn try_apply_with<F, C, E>(
        &self,
        tx: PointsTransaction,
        fold: F,
        precondition: C,
    ) -> Result<ClientPoints, E>
    where
        F: Fn(Uuid, &[PointsTransaction]) -> ClientPoints,
        C: FnOnce(&ClientPoints) -> Result<(), E>,
    {
        let client_id = tx.client_id;
        let mut map = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        let entry = map.entry(client_id).or_default();
        precondition(&fold(client_id, &entry.history))?;
        entry.history.push(tx);
        entry.history.sort_by_key(|t| t.timestamp);
        let points = fold(client_id, &entry.history);
        entry.cached = Some(points.clone());
        Ok(points)
    }

    /// Full transaction history for a client, timestamp order
    pub fn history(&self, client_id: Uuid) -> Vec<PointsTransaction> {
        let map = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        map.get(&client_id)
            .map(|l| l.history.clone())
            .unwrap_or_default()
    }

    /// Last folded points for a client, if any transaction was applied
    pub fn snapshot(&self, client_id: Uuid) -> Option<ClientPoints> {
        let map = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        map.get(&client_id).and_then(|l| l.cached.clone())
    }

    /// Histories of every client, read under a single lock so a
    /// leaderboard build sees a consistent view across clients
    pub fn histories_all(&self) -> Vec<(Uuid, Vec<PointsTransaction>)> {
        let map = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        map.iter()
            .map(|(id, l)| (*id, l.history.clone()))
            .collect()
    }

    /// Recompute from history and compare against the cached total
    ///
    /// The replayed value is authoritative: on mismatch the caller gets
    /// a `LedgerMismatch` carrying both totals and should discard the
    /// cache.
    pub fn audit_with<F>(&self, client_id: Uuid, fold: F) -> Result<ClientPoints, DomainError>
    where
        F: FnOnce(Uuid, &[PointsTransaction]) -> ClientPoints,
    {
        let map = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        let (cached, history) = match map.get(&client_id) {
            Some(ledger) => (ledger.cached.clone(), ledger.history.as_slice()),
            None => (None, &[][..]),
        };
        let replayed = fold(client_id, history);
        if let Some(cached) = cached {
            if cached.total_points != replayed.total_points {
                return Err(DomainError::LedgerMismatch {
                    client_id,
                    cached: cached.total_points,
                    replayed: replayed.total_points,
                });
            }
        }
        Ok(replayed)
    }

    /// Corrupt the cached total, bypassing the fold. Test hook for the
    /// audit path.
    #[cfg(test)]
    pub(crate) fn poison_cached_total(&self, client_id: Uuid, total: i64) {
        let mut map = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        if let Some(ledger) = map.get_mut(&client_id) {
            if let Some(cached) = ledger.cached.as_mut() {
                cached.total_points = total;
            }
        }
    }
}
