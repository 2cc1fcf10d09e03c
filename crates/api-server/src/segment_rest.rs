//! Segment REST API endpoints: CRUD, membership, export, and analysis.

use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use segment_analysis::{AnalysisOutput, AnalysisRequest};
use segment_core::{Rule, Segment, SegmentError, User};
use segment_csv::{export_file_name, export_users};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use utoipa::ToSchema;

use crate::rest::{error_reply, segment_error_reply, ApiResult, AppState, ErrorResponse};

/// Body for creating or replacing a segment.
#[derive(Debug, Deserialize, ToSchema)]
pub struct SegmentInput {
    pub name: String,
    #[serde(default)]
    pub rules: Vec<Rule>,
}

impl SegmentInput {
    /// Segments being edited must have a name and at least one rule.
    fn validate(&self) -> Result<(), SegmentError> {
        if self.name.trim().is_empty() {
            return Err(SegmentError::Validation("segment 'name' must not be empty".into()));
        }
        if self.rules.is_empty() {
            return Err(SegmentError::Validation(
                "segment must contain at least one rule".into(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SegmentSummary {
    pub id: String,
    pub name: String,
    pub rules: Vec<Rule>,
    pub member_count: usize,
}

/// GET /v1/segments — List segments with live member counts.
#[utoipa::path(
    get,
    path = "/v1/segments",
    tag = "Segments",
    responses((status = 200, description = "All segments", body = Vec<SegmentSummary>))
)]
pub async fn list_segments(State(state): State<AppState>) -> Json<Vec<SegmentSummary>> {
    let summaries = state
        .store
        .list_segments()
        .into_iter()
        .map(|segment| {
            let member_count = state.store.member_count(&segment.id).unwrap_or(0);
            SegmentSummary {
                id: segment.id,
                name: segment.name,
                rules: segment.rules,
                member_count,
            }
        })
        .collect();
    Json(summaries)
}

/// POST /v1/segments — Create a segment.
#[utoipa::path(
    post,
    path = "/v1/segments",
    tag = "Segments",
    request_body = SegmentInput,
    responses(
        (status = 201, description = "Segment created", body = Segment),
        (status = 400, description = "Invalid segment", body = ErrorResponse),
    )
)]
pub async fn create_segment(
    State(state): State<AppState>,
    Json(input): Json<SegmentInput>,
) -> ApiResult<(StatusCode, Json<Segment>)> {
    if let Err(e) = input.validate() {
        warn!(error = %e, "Segment validation failed");
        metrics::counter!("api.validation_errors").increment(1);
        return Err(segment_error_reply(e));
    }
    let segment = state.store.add_segment(input.name, input.rules);
    metrics::counter!("segments.created").increment(1);
    Ok((StatusCode::CREATED, Json(segment)))
}

/// GET /v1/segments/{id} — Fetch one segment.
#[utoipa::path(
    get,
    path = "/v1/segments/{id}",
    tag = "Segments",
    params(("id" = String, Path, description = "Segment identifier")),
    responses(
        (status = 200, description = "Segment", body = Segment),
        (status = 404, description = "Segment not found", body = ErrorResponse),
    )
)]
pub async fn get_segment(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Segment>> {
    state
        .store
        .get_segment(&id)
        .map(Json)
        .ok_or_else(|| segment_error_reply(SegmentError::SegmentNotFound(id)))
}

/// PUT /v1/segments/{id} — Replace a segment's name and rules.
#[utoipa::path(
    put,
    path = "/v1/segments/{id}",
    tag = "Segments",
    params(("id" = String, Path, description = "Segment identifier")),
    request_body = SegmentInput,
    responses(
        (status = 200, description = "Segment updated", body = Segment),
        (status = 400, description = "Invalid segment", body = ErrorResponse),
        (status = 404, description = "Segment not found", body = ErrorResponse),
    )
)]
pub async fn update_segment(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<SegmentInput>,
) -> ApiResult<Json<Segment>> {
    input.validate().map_err(segment_error_reply)?;
    let segment = Segment {
        id,
        name: input.name,
        rules: input.rules,
    };
    state
        .store
        .update_segment(segment.clone())
        .map_err(segment_error_reply)?;
    Ok(Json(segment))
}

/// DELETE /v1/segments/{id} — Delete a segment.
#[utoipa::path(
    delete,
    path = "/v1/segments/{id}",
    tag = "Segments",
    params(("id" = String, Path, description = "Segment identifier")),
    responses(
        (status = 204, description = "Segment deleted"),
        (status = 404, description = "Segment not found", body = ErrorResponse),
    )
)]
pub async fn delete_segment(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    state
        .store
        .delete_segment(&id)
        .map_err(segment_error_reply)?;
    metrics::counter!("segments.deleted").increment(1);
    Ok(StatusCode::NO_CONTENT)
}

/// GET /v1/segments/{id}/members — Users currently matching the segment.
#[utoipa::path(
    get,
    path = "/v1/segments/{id}/members",
    tag = "Segments",
    params(("id" = String, Path, description = "Segment identifier")),
    responses(
        (status = 200, description = "Matching users", body = Vec<User>),
        (status = 404, description = "Segment not found", body = ErrorResponse),
    )
)]
pub async fn segment_members(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Vec<User>>> {
    let members = state.store.members(&id).map_err(segment_error_reply)?;
    metrics::counter!("segments.membership_queries").increment(1);
    Ok(Json(members))
}

/// GET /v1/segments/{id}/export — Segment members as a CSV download.
#[utoipa::path(
    get,
    path = "/v1/segments/{id}/export",
    tag = "Segments",
    params(("id" = String, Path, description = "Segment identifier")),
    responses(
        (status = 200, description = "CSV file", content_type = "text/csv"),
        (status = 404, description = "Segment not found", body = ErrorResponse),
        (status = 422, description = "Segment has no members", body = ErrorResponse),
    )
)]
pub async fn export_segment(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Response> {
    let segment = state
        .store
        .get_segment(&id)
        .ok_or_else(|| segment_error_reply(SegmentError::SegmentNotFound(id.clone())))?;
    let members = state.store.members(&id).map_err(segment_error_reply)?;
    let Some(csv) = export_users(&members) else {
        return Err(error_reply(
            StatusCode::UNPROCESSABLE_ENTITY,
            "empty_segment",
            "No users in this segment to export.",
        ));
    };
    info!(segment_id = %id, rows = members.len(), "Segment exported");
    metrics::counter!("segments.exports").increment(1);
    let disposition = format!(
        "attachment; filename=\"{}\"",
        export_file_name(&segment.name)
    );
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        csv,
    )
        .into_response())
}

/// POST /v1/segments/{id}/analyze — Summarize the segment's characteristics.
#[utoipa::path(
    post,
    path = "/v1/segments/{id}/analyze",
    tag = "Segments",
    params(("id" = String, Path, description = "Segment identifier")),
    responses(
        (status = 200, description = "Generated analysis", body = AnalysisOutput),
        (status = 404, description = "Segment not found", body = ErrorResponse),
        (status = 502, description = "Analysis backend failed", body = ErrorResponse),
        (status = 503, description = "Analysis disabled", body = ErrorResponse),
    )
)]
pub async fn analyze_segment(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<AnalysisOutput>> {
    let Some(analyzer) = state.analyzer.clone() else {
        return Err(error_reply(
            StatusCode::SERVICE_UNAVAILABLE,
            "analysis_disabled",
            "Segment analysis is not configured",
        ));
    };
    let segment = state
        .store
        .get_segment(&id)
        .ok_or_else(|| segment_error_reply(SegmentError::SegmentNotFound(id.clone())))?;
    let members = state.store.members(&id).map_err(segment_error_reply)?;
    let request = AnalysisRequest::new(&segment, &members, state.sample_size)
        .map_err(segment_error_reply)?;
    let output = analyzer.analyze(&request).await.map_err(segment_error_reply)?;
    metrics::counter!("segments.analyses").increment(1);
    Ok(Json(output))
}
