//! Plan version lifecycle: create, duplicate, edit, delete.

use crate::models::{LineItem, PlanVersion, UpdateVersionRequest};
use crate::planner::MediaPlanner;
use chrono::Utc;
use mediaplan_core::money::zero_money;
use mediaplan_core::{EntityKind, PlanError, PlanResult};
use serde::Serialize;
use tracing::info;

/// A plan version together with its line items, read as one consistent pair.
#[derive(Debug, Clone, Serialize)]
pub struct PlanSnapshot {
    pub version: PlanVersion,
    pub line_items: Vec<LineItem>,
}

/// Outcome of deleting a plan version.
#[derive(Debug, Clone, Serialize)]
pub struct VersionDeletion {
    pub deleted_version_id: i64,
    pub removed_line_items: usize,
    /// Version of the same campaign to select instead, if any remain.
    pub fallback_version_id: Option<i64>,
}

impl MediaPlanner {
    pub fn get_version(&self, version_id: i64) -> PlanResult<PlanVersion> {
        self.store.versions.get(version_id)
    }

    /// Versions of a campaign, oldest first.
    pub fn list_versions(&self, campaign_id: i64) -> PlanResult<Vec<PlanVersion>> {
        self.store.campaigns.get(campaign_id)?;
        Ok(self.store.versions_of(campaign_id))
    }

    pub fn plan_snapshot(&self, version_id: i64) -> PlanResult<PlanSnapshot> {
        let _guard = self.lock_version(version_id);
        let version = self.store.versions.get(version_id)?;
        let line_items = self.store.line_items_of(version_id);
        Ok(PlanSnapshot { version, line_items })
    }

    /// Start a new, empty version titled "Version N".
    pub fn create_version(&self, campaign_id: i64) -> PlanResult<PlanVersion> {
        let _guard = self.lock_campaign(campaign_id);
        self.store.campaigns.get(campaign_id)?;

        let version_number = self.next_version_number(campaign_id);
        let version = self.store.versions.create(|id| {
            new_version(id, campaign_id, version_number, format!("Version {version_number}"))
        });
        info!(
            campaign_id,
            version_id = version.id,
            version_number,
            "Plan version created"
        );
        Ok(version)
    }

    /// Copy a version and all of its line items into a new version.
    ///
    /// Runs under the product reference gate, the campaign lock, the source
    /// version lock and the new version lock. The copy is complete before the new version is rolled
    /// up, so its totals always equal the source's.
    pub fn duplicate_version(&self, source_id: i64) -> PlanResult<PlanVersion> {
        let source = self.store.versions.get(source_id)?;
        let _refs = self.product_refs_shared();
        let _campaign_guard = self.lock_campaign(source.campaign_id);
        let _source_guard = self.lock_version(source_id);

        // Re-read under the lock: the source may have been deleted or edited.
        let source = self.store.versions.get(source_id)?;
        let source_items = self.store.line_items_of(source_id);

        let version_number = self.next_version_number(source.campaign_id);
        let title = format!("{}{}", source.title, self.config.copy_suffix);
        let copy_id = self.store.versions.next_id();
        let _copy_guard = self.lock_version(copy_id);

        self.store
            .versions
            .insert(new_version(copy_id, source.campaign_id, version_number, title));

        let now = Utc::now();
        for item in &source_items {
            self.store.line_items.create(|id| LineItem {
                id,
                plan_version_id: copy_id,
                created_at: now,
                updated_at: now,
                ..item.clone()
            });
        }

        let copy = self
            .recompute_locked(copy_id)
            .ok_or_else(|| PlanError::not_found(EntityKind::PlanVersion, copy_id))?;
        info!(
            source_version_id = source_id,
            version_id = copy.id,
            version_number,
            line_items = source_items.len(),
            "Plan version duplicated"
        );
        Ok(copy)
    }

    /// Edit the authored fields of a version. Derived totals are untouched.
    pub fn update_version(&self, version_id: i64, req: UpdateVersionRequest) -> PlanResult<PlanVersion> {
        if let Some(title) = &req.title {
            if title.trim().is_empty() {
                return Err(PlanError::validation("title must not be empty"));
            }
        }
        let _guard = self.lock_version(version_id);
        self.store.versions.update(version_id, |v| {
            if let Some(title) = req.title {
                v.title = title;
            }
            if let Some(is_active) = req.is_active {
                v.is_active = is_active;
            }
            v.updated_at = Utc::now();
        })
    }

    /// Delete a version and every line item it owns.
    pub fn delete_version(&self, version_id: i64) -> PlanResult<VersionDeletion> {
        let version = self.store.versions.get(version_id)?;
        let _campaign_guard = self.lock_campaign(version.campaign_id);
        let _guard = self.lock_version(version_id);
        let removed_line_items = self.remove_version_locked(version_id)?;
        let deletion = VersionDeletion {
            deleted_version_id: version_id,
            removed_line_items,
            fallback_version_id: self.store.versions_of(version.campaign_id).first().map(|v| v.id),
        };
        info!(
            campaign_id = version.campaign_id,
            version_id,
            removed_line_items = deletion.removed_line_items,
            fallback_version_id = ?deletion.fallback_version_id,
            "Plan version deleted"
        );
        Ok(deletion)
    }

    /// Resolve which version a client should show.
    ///
    /// Keeps `selected` when it still belongs to the campaign, otherwise
    /// falls back to the campaign's first remaining version.
    pub fn resolve_selected_version(&self, campaign_id: i64, selected: Option<i64>) -> PlanResult<Option<PlanVersion>> {
        let versions = self.list_versions(campaign_id)?;
        let chosen = selected
            .and_then(|id| versions.iter().find(|v| v.id == id).cloned())
            .or_else(|| versions.into_iter().next());
        Ok(chosen)
    }

    /// Children first, then the version. The caller must hold the version lock.
    pub(crate) fn remove_version_locked(&self, version_id: i64) -> PlanResult<usize> {
        let items = self.store.line_items_of(version_id);
        for item in &items {
            self.store.line_items.remove(item.id)?;
        }
        self.store.versions.remove(version_id)?;
        Ok(items.len())
    }

    fn next_version_number(&self, campaign_id: i64) -> u32 {
        self.store.versions.count(|v| v.campaign_id == campaign_id) as u32 + 1
    }
}

fn new_version(id: i64, campaign_id: i64, version_number: u32, title: String) -> PlanVersion {
    let now = Utc::now();
    PlanVersion {
        id,
        campaign_id,
        version_number,
        title,
        total_budget: zero_money(),
        total_impressions: 0,
        avg_cpm: zero_money(),
        is_active: true,
        created_at: now,
        updated_at: now,
    }
}
