//! Campaign (RFP response) records. A campaign owns its plan versions.

use crate::models::{Campaign, CreateCampaignRequest, UpdateCampaignRequest};
use crate::planner::MediaPlanner;
use chrono::Utc;
use mediaplan_core::{PlanError, PlanResult};
use serde::Serialize;
use tracing::info;

/// Outcome of deleting a campaign together with everything it owns.
#[derive(Debug, Clone, Serialize)]
pub struct CampaignDeletion {
    pub deleted_campaign_id: i64,
    pub removed_versions: usize,
    pub removed_line_items: usize,
}

fn validate_campaign(campaign: &Campaign) -> PlanResult<()> {
    if campaign.title.trim().is_empty() {
        return Err(PlanError::validation("title must not be empty"));
    }
    if campaign.client_name.trim().is_empty() {
        return Err(PlanError::validation("client_name must not be empty"));
    }
    if let (Some(start), Some(end)) = (campaign.campaign_start_date, campaign.campaign_end_date) {
        if end < start {
            return Err(PlanError::validation(format!(
                "campaign end date {end} is before start date {start}"
            )));
        }
    }
    Ok(())
}

impl MediaPlanner {
    pub fn list_campaigns(&self) -> Vec<Campaign> {
        self.store.campaigns.list(|_| true)
    }

    pub fn get_campaign(&self, id: i64) -> PlanResult<Campaign> {
        self.store.campaigns.get(id)
    }

    pub fn create_campaign(&self, req: CreateCampaignRequest) -> PlanResult<Campaign> {
        let now = Utc::now();
        let draft = Campaign {
            id: 0,
            title: req.title,
            client_name: req.client_name,
            due_date: req.due_date,
            campaign_start_date: req.campaign_start_date,
            campaign_end_date: req.campaign_end_date,
            status: req.status,
            created_at: now,
            updated_at: now,
        };
        validate_campaign(&draft)?;
        let campaign = self.store.campaigns.create(|id| Campaign { id, ..draft });
        info!(campaign_id = campaign.id, title = %campaign.title, "Campaign created");
        Ok(campaign)
    }

    pub fn update_campaign(&self, id: i64, req: UpdateCampaignRequest) -> PlanResult<Campaign> {
        let _guard = self.lock_campaign(id);
        let mut campaign = self.store.campaigns.get(id)?;
        if let Some(title) = req.title {
            campaign.title = title;
        }
        if let Some(client_name) = req.client_name {
            campaign.client_name = client_name;
        }
        if let Some(due_date) = req.due_date {
            campaign.due_date = due_date;
        }
        if let Some(start) = req.campaign_start_date {
            campaign.campaign_start_date = start;
        }
        if let Some(end) = req.campaign_end_date {
            campaign.campaign_end_date = end;
        }
        if let Some(status) = req.status {
            campaign.status = status;
        }
        campaign.updated_at = Utc::now();
        validate_campaign(&campaign)?;
        self.store.campaigns.replace(campaign)
    }

    /// Delete a campaign, its plan versions, and their line items.
    pub fn delete_campaign(&self, id: i64) -> PlanResult<CampaignDeletion> {
        let _guard = self.lock_campaign(id);
        self.store.campaigns.get(id)?;

        let mut removed_line_items = 0;
        let versions = self.store.versions_of(id);
        for version in &versions {
            let _version_guard = self.lock_version(version.id);
            removed_line_items += self.remove_version_locked(version.id)?;
        }
        self.store.campaigns.remove(id)?;
        let deletion = CampaignDeletion {
            deleted_campaign_id: id,
            removed_versions: versions.len(),
            removed_line_items,
        };
        info!(
            campaign_id = id,
            removed_versions = deletion.removed_versions,
            removed_line_items = deletion.removed_line_items,
            "Campaign deleted"
        );
        Ok(deletion)
    }
}
