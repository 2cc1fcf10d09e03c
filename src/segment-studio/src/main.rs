//! Segment Studio — rule-based user segmentation service.
//!
//! Main entry point that loads users and segments, then starts the server.

use clap::Parser;
use segment_analysis::{HttpAnalyzer, SegmentAnalyzer};
use segment_api::ApiServer;
use segment_core::config::AppConfig;
use segment_csv::{read_segments_file, read_users_file, ImportSchema};
use segment_engine::SegmentStore;
use std::sync::Arc;
use tracing::{error, info, warn};

#[derive(Parser, Debug)]
#[command(name = "segment-studio")]
#[command(about = "Rule-based user segmentation service")]
#[command(version)]
struct Cli {
    /// HTTP port (overrides config)
    #[arg(long, env = "SEGMENT_STUDIO__API__HTTP_PORT")]
    http_port: Option<u16>,

    /// CSV or JSON file with the initial users (overrides config)
    #[arg(long, env = "SEGMENT_STUDIO__STORE__USERS_PATH")]
    users: Option<String>,

    /// JSON file with segment definitions (overrides config)
    #[arg(long, env = "SEGMENT_STUDIO__STORE__SEGMENTS_PATH")]
    segments: Option<String>,

    /// Install the starter segments
    #[arg(long, default_value_t = false)]
    demo: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "segment_studio=info,segment_engine=info,tower_http=info".into()),
        )
        .json()
        .init();

    let cli = Cli::parse();

    info!("Segment Studio starting up");

    let mut config = AppConfig::load().unwrap_or_else(|e| {
        warn!(error = %e, "Failed to load config, using defaults");
        AppConfig::default()
    });

    // Apply CLI overrides
    if let Some(port) = cli.http_port {
        config.api.http_port = port;
    }
    if cli.users.is_some() {
        config.store.users_path = cli.users;
    }
    if cli.segments.is_some() {
        config.store.segments_path = cli.segments;
    }
    if cli.demo {
        config.store.seed_demo_segments = true;
    }

    info!(
        node_id = %config.node_id,
        http_port = config.api.http_port,
        analysis = config.analysis.enabled,
        "Configuration loaded"
    );

    let store = Arc::new(SegmentStore::new());
    let schema = ImportSchema::from_config(&config.import);

    if let Some(path) = &config.store.users_path {
        let users = read_users_file(path, &schema)?;
        store.import_users(users);
    }
    if config.store.seed_demo_segments {
        store.seed_demo_segments();
    }
    if let Some(path) = &config.store.segments_path {
        for segment in read_segments_file(path)? {
            if let Err(e) = store.insert_segment(segment) {
                warn!(error = %e, "Skipping segment from file");
            }
        }
    }

    let analyzer: Option<Arc<dyn SegmentAnalyzer>> = if config.analysis.enabled {
        let http = HttpAnalyzer::new(&config.analysis)?;
        info!(endpoint = %http.endpoint(), "Segment analysis enabled");
        Some(Arc::new(http))
    } else {
        None
    };

    let api_server = ApiServer::new(config.clone(), store, analyzer);

    if config.metrics.enabled {
        if let Err(e) = api_server.start_metrics().await {
            error!(error = %e, "Failed to start metrics exporter");
        }
    }

    info!("Segment Studio is ready to serve traffic");

    // Start HTTP server (blocks until shutdown)
    api_server.start_http().await?;

    Ok(())
}
