//! Media Planner: builds media plans for RFP responses.
//!
//! Main entry point that loads configuration, seeds the demo catalog, and
//! starts the API and metrics servers.

use clap::Parser;
use mediaplan_api::ApiServer;
use mediaplan_core::AppConfig;
use mediaplan_planning::MediaPlanner;
use std::sync::Arc;
use tracing::{error, info, warn};

#[derive(Parser, Debug)]
#[command(name = "media-planner")]
#[command(about = "Media plan builder for campaign RFP responses")]
#[command(version)]
struct Cli {
    /// HTTP port (overrides config)
    #[arg(long, env = "MEDIA_PLANNER__API__HTTP_PORT")]
    http_port: Option<u16>,

    /// Metrics port (overrides config)
    #[arg(long, env = "MEDIA_PLANNER__METRICS__PORT")]
    metrics_port: Option<u16>,

    /// Start with an empty catalog
    #[arg(long, default_value_t = false)]
    no_seed: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "media_planner=info,mediaplan_api=info,mediaplan_planning=info,tower_http=info".into()
            }),
        )
        .json()
        .init();

    let cli = Cli::parse();

    info!("Media Planner starting up");

    let mut config = AppConfig::load().unwrap_or_else(|e| {
        warn!(error = %e, "Failed to load config, using defaults");
        AppConfig::default()
    });

    if let Some(port) = cli.http_port {
        config.api.http_port = port;
    }
    if let Some(port) = cli.metrics_port {
        config.metrics.port = port;
    }
    if cli.no_seed {
        config.planning.seed_demo_data = false;
    }

    info!(
        http_port = config.api.http_port,
        metrics_port = config.metrics.port,
        seed_demo_data = config.planning.seed_demo_data,
        "Configuration loaded"
    );

    let planner = Arc::new(MediaPlanner::new(config.planning.clone()));
    if config.planning.seed_demo_data {
        planner.seed_demo_data()?;
    }

    let api_server = ApiServer::new(config, planner);

    if let Err(e) = api_server.start_metrics() {
        error!(error = %e, "Failed to start metrics exporter");
    }

    info!("Media Planner is ready to serve traffic");

    api_server.start_http().await?;

    Ok(())
}
