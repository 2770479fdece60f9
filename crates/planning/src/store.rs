//! In-memory entity store backed by DashMap.
//!
//! Each entity type lives in its own [`Table`] with an atomic id sequence,
//! so ids are allocated by the store and never by planning logic.

use crate::models::{Campaign, LineItem, PlanVersion, Product};
use dashmap::DashMap;
use mediaplan_core::{EntityKind, PlanError, PlanResult};
use std::sync::atomic::{AtomicI64, Ordering};
use tracing::info;

/// A record that can be kept in a [`Table`].
pub trait Entity: Clone + Send + Sync + 'static {
    const KIND: EntityKind;

    fn id(&self) -> i64;
}

impl Entity for Product {
    const KIND: EntityKind = EntityKind::Product;

    fn id(&self) -> i64 {
        self.id
    }
}

impl Entity for Campaign {
    const KIND: EntityKind = EntityKind::Campaign;

    fn id(&self) -> i64 {
        self.id
    }
}

impl Entity for PlanVersion {
    const KIND: EntityKind = EntityKind::PlanVersion;

    fn id(&self) -> i64 {
        self.id
    }
}

impl Entity for LineItem {
    const KIND: EntityKind = EntityKind::LineItem;

    fn id(&self) -> i64 {
        self.id
    }
}

/// Concurrent id-keyed table with its own id sequence.
pub struct Table<T: Entity> {
    rows: DashMap<i64, T>,
    next_id: AtomicI64,
}

impl<T: Entity> Table<T> {
    pub fn new() -> Self {
        Self {
            rows: DashMap::new(),
            next_id: AtomicI64::new(1),
        }
    }

    /// Reserve the next id. The caller inserts the row with [`Table::insert`].
    pub fn next_id(&self) -> i64 {
        self.next_id.fetch_add(1, Ordering::Relaxed)
    }

    /// Allocate an id, build the row with it, and store it.
    pub fn create(&self, build: impl FnOnce(i64) -> T) -> T {
        let row = build(self.next_id());
        self.insert(row.clone());
        row
    }

    pub fn insert(&self, row: T) {
        self.rows.insert(row.id(), row);
    }

    pub fn get(&self, id: i64) -> PlanResult<T> {
        self.find(id).ok_or_else(|| PlanError::not_found(T::KIND, id))
    }

    pub fn find(&self, id: i64) -> Option<T> {
        self.rows.get(&id).map(|r| r.value().clone())
    }

    pub fn contains(&self, id: i64) -> bool {
        self.rows.contains_key(&id)
    }

    /// Rows matching `filter`, ordered by id.
    pub fn list(&self, filter: impl Fn(&T) -> bool) -> Vec<T> {
        let mut rows: Vec<T> = self
            .rows
            .iter()
            .filter(|r| filter(r.value()))
            .map(|r| r.value().clone())
            .collect();
        rows.sort_by_key(|row| row.id());
        rows
    }

    pub fn count(&self, filter: impl Fn(&T) -> bool) -> usize {
        self.rows.iter().filter(|r| filter(r.value())).count()
    }

    /// Apply an in-place edit. Fails with `NotFound` if the row is absent.
    pub fn update(&self, id: i64, apply: impl FnOnce(&mut T)) -> PlanResult<T> {
        let mut entry = self
            .rows
            .get_mut(&id)
            .ok_or_else(|| PlanError::not_found(T::KIND, id))?;
        apply(entry.value_mut());
        Ok(entry.value().clone())
    }

    /// Overwrite an existing row. Fails with `NotFound` if the row is absent.
    pub fn replace(&self, row: T) -> PlanResult<T> {
        let id = row.id();
        let mut entry = self
            .rows
            .get_mut(&id)
            .ok_or_else(|| PlanError::not_found(T::KIND, id))?;
        *entry.value_mut() = row;
        Ok(entry.value().clone())
    }

    /// Delete a row. Not idempotent: a missing row is `NotFound`.
    pub fn remove(&self, id: i64) -> PlanResult<T> {
        self.rows
            .remove(&id)
            .map(|(_, row)| row)
            .ok_or_else(|| PlanError::not_found(T::KIND, id))
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl<T: Entity> Default for Table<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Thread-safe in-memory store for products, campaigns, plan versions and line items.
pub struct PlanStore {
    pub products: Table<Product>,
    pub campaigns: Table<Campaign>,
    pub versions: Table<PlanVersion>,
    pub line_items: Table<LineItem>,
}

impl PlanStore {
    pub fn new() -> Self {
        info!("Plan store initialized (in-memory)");
        Self {
            products: Table::new(),
            campaigns: Table::new(),
            versions: Table::new(),
            line_items: Table::new(),
        }
    }

    pub fn versions_of(&self, campaign_id: i64) -> Vec<PlanVersion> {
        self.versions.list(|v| v.campaign_id == campaign_id)
    }

    /// Line items of a version ordered by `(sort_order, id)`.
    pub fn line_items_of(&self, version_id: i64) -> Vec<LineItem> {
        let mut items = self.line_items.list(|item| item.plan_version_id == version_id);
        items.sort_by_key(|item| (item.sort_order, item.id));
        items
    }
}

impl Default for PlanStore {
    fn default() -> Self {
        Self::new()
    }
}
