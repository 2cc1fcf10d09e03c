//! Shared REST state, error replies, and operational endpoints.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use segment_analysis::SegmentAnalyzer;
use segment_core::SegmentError;
use segment_csv::ImportSchema;
use segment_engine::SegmentStore;
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;
use tracing::error;
use utoipa::ToSchema;

/// Shared application state for REST handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<SegmentStore>,
    pub schema: Arc<ImportSchema>,
    /// `None` when analysis is disabled in config.
    pub analyzer: Option<Arc<dyn SegmentAnalyzer>>,
    pub sample_size: usize,
    pub node_id: String,
    pub start_time: Instant,
}

pub type ApiResult<T> = Result<T, (StatusCode, Json<ErrorResponse>)>;

pub fn error_reply(status: StatusCode, error: &str, message: impl Into<String>) -> (StatusCode, Json<ErrorResponse>) {
    (
        status,
        Json(ErrorResponse {
            error: error.to_string(),
            message: message.into(),
        }),
    )
}

/// Map a store or collaborator error to an HTTP reply.
pub fn segment_error_reply(err: SegmentError) -> (StatusCode, Json<ErrorResponse>) {
    match &err {
        SegmentError::SegmentNotFound(_) => {
            error_reply(StatusCode::NOT_FOUND, "segment_not_found", err.to_string())
        }
        SegmentError::DuplicateSegment(_) => {
            error_reply(StatusCode::CONFLICT, "duplicate_segment", err.to_string())
        }
        SegmentError::Validation(_) => {
            error_reply(StatusCode::BAD_REQUEST, "invalid_segment", err.to_string())
        }
        SegmentError::Import(_) => {
            error_reply(StatusCode::BAD_REQUEST, "import_failed", err.to_string())
        }
        SegmentError::Analysis(_) => {
            error!(error = %err, "Segment analysis failed");
            error_reply(StatusCode::BAD_GATEWAY, "analysis_failed", err.to_string())
        }
        _ => {
            error!(error = %err, "Request failed");
            error_reply(
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal_error",
                "Internal processing error",
            )
        }
    }
}

/// GET /health — Health check endpoint.
#[utoipa::path(
    get,
    path = "/health",
    tag = "Operations",
    responses((status = 200, description = "Service is healthy", body = HealthResponse))
)]
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        node_id: state.node_id.clone(),
        uptime_secs: state.start_time.elapsed().as_secs(),
        users: state.store.user_count(),
        segments: state.store.list_segments().len(),
    })
}

/// GET /ready — Readiness probe.
#[utoipa::path(
    get,
    path = "/ready",
    tag = "Operations",
    responses((status = 200, description = "Ready to serve"))
)]
pub async fn readiness() -> StatusCode {
    StatusCode::OK
}

/// GET /live — Liveness probe.
#[utoipa::path(
    get,
    path = "/live",
    tag = "Operations",
    responses((status = 200, description = "Process is alive"))
)]
pub async fn liveness() -> StatusCode {
    StatusCode::OK
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub node_id: String,
    pub uptime_secs: u64,
    pub users: usize,
    pub segments: usize,
}
