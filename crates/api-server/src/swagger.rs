//! OpenAPI specification, served at `/api-docs/openapi.json`.

use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Segment Studio API",
        version = "0.1.0",
        description = "Define rule-based user segments, query their members, export them as CSV, and request segment analyses.",
        license(name = "MIT"),
    ),
    tags(
        (name = "Segments", description = "Segment definitions, membership, export, and analysis"),
        (name = "Users", description = "User collection listing and CSV import"),
        (name = "Operations", description = "Health, readiness, and liveness probes"),
    ),
    paths(
        // Segments
        crate::segment_rest::list_segments,
        crate::segment_rest::create_segment,
        crate::segment_rest::get_segment,
        crate::segment_rest::update_segment,
        crate::segment_rest::delete_segment,
        crate::segment_rest::segment_members,
        crate::segment_rest::export_segment,
        crate::segment_rest::analyze_segment,
        // Users
        crate::user_rest::list_users,
        crate::user_rest::import_users,
        // Operations
        crate::rest::health_check,
        crate::rest::readiness,
        crate::rest::liveness,
    ),
    components(schemas(
        segment_core::Segment,
        segment_core::Rule,
        segment_core::Operator,
        segment_core::Value,
        segment_core::User,
        segment_analysis::AnalysisOutput,
        crate::segment_rest::SegmentInput,
        crate::segment_rest::SegmentSummary,
        crate::user_rest::ImportResponse,
        crate::rest::ErrorResponse,
        crate::rest::HealthResponse,
    ))
)]
pub struct ApiDoc;
