//! Demo catalog and sample RFP for development.

use crate::models::{CreateCampaignRequest, CreateProductRequest};
use crate::planner::MediaPlanner;
use mediaplan_core::{CampaignStatus, PlanResult, ProductCategory, RateModel};
use tracing::info;

const DESKTOP_TABLET_MOBILE: &str = "Desktop: 300x250, 300x600, 120x600, 160x600, 728x90\n\
Tablet: 300x250, 300x600, 120x600, 160x600, 728x90\n\
Mobile: 300x250, 300x600, 300x50, 320x50";

const YOUTUBE_PLACEMENTS: &str = r#"[
  {"name": "Bumper", "adSizes": ":06s", "targeting": "Non-skippable 6 second in-stream units"},
  {"name": "Skippable In-Stream", "adSizes": ":15s | :30s", "targeting": "Skippable in-stream units"},
  {"name": "In-Feed", "adSizes": "Thumbnail + headline", "targeting": "Discovery placements in search and watch next"}
]"#;

impl MediaPlanner {
    /// Load the demo catalog and one sample campaign with an empty first version.
    pub fn seed_demo_data(&self) -> PlanResult<()> {
        let products = vec![
            (
                "Standard Display",
                ProductCategory::Display,
                "MiQ will utilize Sigma Audiences to target BRAND's target audience across formats, channels and DSP platforms.",
                "MiQ Sigma Audiences_Standard Display_Desktop/Tablet/Mobile_Package",
                DESKTOP_TABLET_MOBILE,
            ),
            (
                "Online Video",
                ProductCategory::Video,
                "Sigma Audiences reach BRAND's target audience at scale via online video units across desktop, tablet, and mobile.",
                "MiQ Sigma Audiences_Online Video_Desktop/Tablet/Mobile_Package",
                ":06s | :15s | :30s",
            ),
            (
                "CTV/OTT",
                ProductCategory::Video,
                "**100% viewability** Connected TV serves BRAND creatives to the desired audience on the big screen.",
                "MiQ_Connected TV_Video_Package",
                ":15s | :30s",
            ),
            (
                "High Impact",
                ProductCategory::Display,
                "Custom high impact units across desktop, tablet, and mobile.",
                "MiQ Sigma Audiences_High Impact XXX_Rich Media_Desktop/Mobile_Package",
                "Custom sizes depending on High Impact unit",
            ),
            (
                "Audio",
                ProductCategory::Audio,
                "Programmatic audio across premium streaming and podcast inventory.",
                "MiQ_Programmatic Audio_Package",
                ":06s | :15s | :30s",
            ),
            (
                "Social Boost",
                ProductCategory::Social,
                "BRAND social posts amplified across premium mobile web content.",
                "MiQ_BRAND_Social Boost_Social Units_Package",
                "300x250, 300x600",
            ),
        ];

        for (name, category, targeting, placement, ad_sizes) in products {
            self.create_product(CreateProductRequest {
                name: name.to_string(),
                category,
                targeting_details: targeting.to_string(),
                placement_name: placement.to_string(),
                ad_sizes: ad_sizes.to_string(),
                pricing_model: RateModel::Dcpm,
                is_package: false,
                package_placements: None,
            })?;
        }

        self.create_product(CreateProductRequest {
            name: "YouTube".to_string(),
            category: ProductCategory::YouTube,
            targeting_details: "Dynamically target key BRAND audiences on YouTube with in-stream and discovery formats."
                .to_string(),
            placement_name: "YouTube packages".to_string(),
            ad_sizes: ":06s | :15s | :30s".to_string(),
            pricing_model: RateModel::Dcpm,
            is_package: true,
            package_placements: Some(YOUTUBE_PLACEMENTS.to_string()),
        })?;

        let campaign = self.create_campaign(CreateCampaignRequest {
            title: "Q4 Brand Campaign".to_string(),
            client_name: "Global Tech Company".to_string(),
            due_date: None,
            campaign_start_date: None,
            campaign_end_date: None,
            status: CampaignStatus::Draft,
        })?;
        self.create_version(campaign.id)?;

        info!(
            products = self.store.products.len(),
            campaigns = self.store.campaigns.len(),
            "Demo data seeded"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ProductFilter;

    #[test]
    fn seeded_sample_version_is_consistent() {
        let planner = MediaPlanner::default();
        planner.seed_demo_data().unwrap();

        assert_eq!(planner.list_products(&ProductFilter::default()).len(), 7);
        let campaign = &planner.list_campaigns()[0];
        let versions = planner.list_versions(campaign.id).unwrap();
        assert_eq!(versions.len(), 1);
        assert_eq!(versions[0].title, "Version 1");
        assert_eq!(versions[0].total_budget.to_string(), "0.00");
        assert_eq!(versions[0].avg_cpm.to_string(), "0.00");
    }

    #[test]
    fn seeded_package_has_placements() {
        let planner = MediaPlanner::default();
        planner.seed_demo_data().unwrap();
        let youtube = planner
            .list_products(&ProductFilter {
                search: None,
                category: Some(ProductCategory::YouTube),
            })
            .remove(0);
        assert_eq!(crate::catalog::package_placements(&youtube).unwrap().len(), 3);
    }
}
