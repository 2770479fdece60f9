use crate::error::PlanResult;
use serde::Deserialize;

/// Root application configuration. Loaded from environment variables
/// with the prefix `MEDIA_PLANNER__`.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub metrics: MetricsConfig,
    #[serde(default)]
    pub planning: PlanningConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_http_port")]
    pub http_port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MetricsConfig {
    #[serde(default = "default_metrics_enabled")]
    pub enabled: bool,
    #[serde(default = "default_metrics_port")]
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlanningConfig {
    /// Load the demo product catalog and sample RFP at startup.
    #[serde(default = "default_seed_demo_data")]
    pub seed_demo_data: bool,
    /// Site written on line items created from a catalog product.
    #[serde(default = "default_site")]
    pub default_site: String,
    /// Appended to titles and names of duplicated versions and line items.
    #[serde(default = "default_copy_suffix")]
    pub copy_suffix: String,
}

// Default functions
fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_http_port() -> u16 {
    5000
}
fn default_metrics_enabled() -> bool {
    true
}
fn default_metrics_port() -> u16 {
    9091
}
fn default_seed_demo_data() -> bool {
    true
}
fn default_site() -> String {
    "MiQ".to_string()
}
fn default_copy_suffix() -> String {
    " (Copy)".to_string()
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            http_port: default_http_port(),
        }
    }
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: default_metrics_enabled(),
            port: default_metrics_port(),
        }
    }
}

impl Default for PlanningConfig {
    fn default() -> Self {
        Self {
            seed_demo_data: default_seed_demo_data(),
            default_site: default_site(),
            copy_suffix: default_copy_suffix(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api: ApiConfig::default(),
            metrics: MetricsConfig::default(),
            planning: PlanningConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn load() -> PlanResult<Self> {
        let builder = config::Config::builder().add_source(
            config::Environment::with_prefix("MEDIA_PLANNER")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build()?;
        Ok(config.try_deserialize()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sane() {
        let config = AppConfig::default();
        assert_eq!(config.api.http_port, 5000);
        assert!(config.planning.seed_demo_data);
        assert_eq!(config.planning.copy_suffix, " (Copy)");
    }

    #[test]
    fn empty_source_deserializes_to_defaults() {
        let config: AppConfig = config::Config::builder()
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();
        assert_eq!(config.api.host, "0.0.0.0");
        assert_eq!(config.metrics.port, 9091);
        assert_eq!(config.planning.default_site, "MiQ");
    }
}
