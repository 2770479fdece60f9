//! The planning service: owns the store and the per-record write locks.

use crate::store::PlanStore;
use dashmap::DashMap;
use mediaplan_core::config::PlanningConfig;
use mediaplan_core::EntityKind;
use parking_lot::{ArcMutexGuard, Mutex, RawMutex, RwLock};
use std::sync::Arc;

type LockRegistry = DashMap<(EntityKind, i64), Arc<Mutex<()>>>;

/// Entry point for every planning operation.
///
/// Writes that affect a plan version hold that version's lock for the whole
/// unit of work (line item write plus rollup), so rollups for one version
/// are serialized and never interleave. Lock order is the product reference
/// gate, then campaign, then version (lower version id before higher).
pub struct MediaPlanner {
    pub(crate) store: Arc<PlanStore>,
    pub(crate) config: PlanningConfig,
    locks: LockRegistry,
    /// Shared by every operation that writes line items; held exclusively by
    /// product deletion so its reference count cannot go stale.
    product_refs: RwLock<()>,
}

/// Held lock on one record. The registry entry is pruned once no other
/// caller holds or waits on it.
pub(crate) struct RecordGuard<'a> {
    registry: &'a LockRegistry,
    key: (EntityKind, i64),
    guard: Option<ArcMutexGuard<RawMutex, ()>>,
}

impl Drop for RecordGuard<'_> {
    fn drop(&mut self) {
        // Unlock and release this handle first; the registry's own copy is
        // then the only one left when nobody else is interested.
        drop(self.guard.take());
        self.registry.remove_if(&self.key, |_, lock| Arc::strong_count(lock) == 1);
    }
}

impl MediaPlanner {
    pub fn new(config: PlanningConfig) -> Self {
        Self::with_store(Arc::new(PlanStore::new()), config)
    }

    pub fn with_store(store: Arc<PlanStore>, config: PlanningConfig) -> Self {
        Self {
            store,
            config,
            locks: DashMap::new(),
            product_refs: RwLock::new(()),
        }
    }

    pub fn store(&self) -> &PlanStore {
        &self.store
    }

    pub fn config(&self) -> &PlanningConfig {
        &self.config
    }

    /// Block until the record's lock is held.
    pub(crate) fn lock_record(&self, kind: EntityKind, id: i64) -> RecordGuard<'_> {
        let key = (kind, id);
        let lock = self.locks.entry(key).or_default().clone();
        RecordGuard {
            registry: &self.locks,
            key,
            guard: Some(lock.lock_arc()),
        }
    }

    pub(crate) fn lock_version(&self, version_id: i64) -> RecordGuard<'_> {
        self.lock_record(EntityKind::PlanVersion, version_id)
    }

    pub(crate) fn lock_campaign(&self, campaign_id: i64) -> RecordGuard<'_> {
        self.lock_record(EntityKind::Campaign, campaign_id)
    }

    /// Shared gate for writes that add line item references to products.
    pub(crate) fn product_refs_shared(&self) -> parking_lot::RwLockReadGuard<'_, ()> {
        self.product_refs.read()
    }

    /// Exclusive gate for product deletion.
    pub(crate) fn product_refs_exclusive(&self) -> parking_lot::RwLockWriteGuard<'_, ()> {
        self.product_refs.write()
    }

    /// Number of records with a live lock entry.
    pub fn locked_records(&self) -> usize {
        self.locks.len()
    }
}

impl Default for MediaPlanner {
    fn default() -> Self {
        Self::new(PlanningConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn lock_entries_are_pruned_after_release() {
        let planner = MediaPlanner::default();
        for id in 0..100 {
            let _guard = planner.lock_version(id);
        }
        assert_eq!(planner.locked_records(), 0);
    }

    #[test]
    fn waiting_caller_releases_cleanly() {
        let planner = Arc::new(MediaPlanner::default());
        let guard = planner.lock_version(7);

        let waiter = {
            let planner = planner.clone();
            thread::spawn(move || {
                let _guard = planner.lock_version(7);
            })
        };
        thread::sleep(Duration::from_millis(50));
        drop(guard);

        waiter.join().unwrap();
        assert_eq!(planner.locked_records(), 0);
    }
}
