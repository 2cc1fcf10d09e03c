//! API server — mounts the REST routes and the Prometheus exporter.

use axum::routing::{get, post};
use axum::{Json, Router};
use segment_analysis::SegmentAnalyzer;
use segment_core::config::AppConfig;
use segment_csv::ImportSchema;
use segment_engine::SegmentStore;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;
use utoipa::OpenApi;

use crate::rest::{self, AppState};
use crate::segment_rest;
use crate::swagger::ApiDoc;
use crate::user_rest;

/// Build the REST router over `state`.
pub fn router(state: AppState) -> Router {
    Router::new()
        // Segments
        .route(
            "/v1/segments",
            get(segment_rest::list_segments).post(segment_rest::create_segment),
        )
        .route(
            "/v1/segments/:id",
            get(segment_rest::get_segment)
                .put(segment_rest::update_segment)
                .delete(segment_rest::delete_segment),
        )
        .route("/v1/segments/:id/members", get(segment_rest::segment_members))
        .route("/v1/segments/:id/export", get(segment_rest::export_segment))
        .route("/v1/segments/:id/analyze", post(segment_rest::analyze_segment))
        // Users
        .route("/v1/users", get(user_rest::list_users))
        .route("/v1/users/import", post(user_rest::import_users))
        // Operational endpoints
        .route("/health", get(rest::health_check))
        .route("/ready", get(rest::readiness))
        .route("/live", get(rest::liveness))
        .route("/api-docs/openapi.json", get(|| async { Json(ApiDoc::openapi()) }))
        // Middleware
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Main API server.
pub struct ApiServer {
    config: AppConfig,
    state: AppState,
}

impl ApiServer {
    pub fn new(
        config: AppConfig,
        store: Arc<SegmentStore>,
        analyzer: Option<Arc<dyn SegmentAnalyzer>>,
    ) -> Self {
        let state = AppState {
            store,
            schema: Arc::new(ImportSchema::from_config(&config.import)),
            analyzer,
            sample_size: config.analysis.sample_size,
            node_id: config.node_id.clone(),
            start_time: Instant::now(),
        };
        Self { config, state }
    }

    /// Start the HTTP REST server.
    pub async fn start_http(&self) -> anyhow::Result<()> {
        let app = router(self.state.clone());

        let addr = SocketAddr::new(self.config.api.host.parse()?, self.config.api.http_port);

        info!(addr = %addr, "Starting HTTP server");

        let listener = tokio::net::TcpListener::bind(addr).await?;
        axum::serve(listener, app).await?;

        Ok(())
    }

    /// Start the metrics exporter on a separate port.
    pub async fn start_metrics(&self) -> anyhow::Result<()> {
        metrics_exporter_prometheus::PrometheusBuilder::new()
            .with_http_listener(SocketAddr::new(
                self.config.api.host.parse()?,
                self.config.metrics.port,
            ))
            .install()?;

        info!(port = self.config.metrics.port, "Metrics exporter started");
        Ok(())
    }
}
