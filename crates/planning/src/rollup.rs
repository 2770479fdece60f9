//! Plan version rollups: budget, impressions and average CPM derived from
//! the version's current line items.

use crate::models::{LineItem, PlanVersion};
use crate::planner::MediaPlanner;
use chrono::Utc;
use mediaplan_core::money::{round_money, zero_money};
use mediaplan_core::PlanResult;
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{debug, warn};

/// Aggregate figures of a plan version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VersionTotals {
    pub total_budget: Decimal,
    pub total_impressions: u64,
    /// `total_budget / total_impressions * 1000`, zero without impressions.
    pub avg_cpm: Decimal,
}

impl Default for VersionTotals {
    fn default() -> Self {
        Self {
            total_budget: zero_money(),
            total_impressions: 0,
            avg_cpm: zero_money(),
        }
    }
}

impl VersionTotals {
    pub fn matches(&self, version: &PlanVersion) -> bool {
        self.total_budget == version.total_budget
            && self.total_impressions == version.total_impressions
            && self.avg_cpm == version.avg_cpm
    }
}

/// Sum the line items into version totals.
pub fn compute_totals<'a>(items: impl IntoIterator<Item = &'a LineItem>) -> VersionTotals {
    let (budget, impressions) = items.into_iter().fold((Decimal::ZERO, 0u64), |(budget, impressions), item| {
        (budget + item.total_cost, impressions.saturating_add(item.impressions))
    });
    let total_budget = round_money(budget);
    let avg_cpm = if impressions > 0 {
        round_money(total_budget * Decimal::ONE_THOUSAND / Decimal::from(impressions))
    } else {
        zero_money()
    };
    VersionTotals {
        total_budget,
        total_impressions: impressions,
        avg_cpm,
    }
}

impl MediaPlanner {
    /// Recompute and store the totals of a plan version.
    ///
    /// Returns `None` when the version no longer exists; the write that
    /// triggered the rollup still stands. Also serves as the on-demand
    /// repair for a version whose totals have drifted.
    pub fn recompute_version_totals(&self, version_id: i64) -> PlanResult<Option<PlanVersion>> {
        let _guard = self.lock_version(version_id);
        Ok(self.recompute_locked(version_id))
    }

    /// Rollup body. The caller must hold the version lock.
    pub(crate) fn recompute_locked(&self, version_id: i64) -> Option<PlanVersion> {
        let items = self.store.line_items_of(version_id);
        let totals = compute_totals(&items);
        match self.store.versions.update(version_id, |version| {
            version.total_budget = totals.total_budget;
            version.total_impressions = totals.total_impressions;
            version.avg_cpm = totals.avg_cpm;
            version.updated_at = Utc::now();
        }) {
            Ok(version) => {
                debug!(
                    version_id,
                    line_items = items.len(),
                    total_budget = %version.total_budget,
                    total_impressions = version.total_impressions,
                    avg_cpm = %version.avg_cpm,
                    "Plan version totals recomputed"
                );
                Some(version)
            }
            Err(_) => {
                warn!(version_id, "Plan version vanished before rollup, skipping");
                None
            }
        }
    }
}
