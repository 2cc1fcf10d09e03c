//! User collection REST API endpoints.

use axum::extract::State;
use axum::Json;
use segment_core::User;
use segment_csv::parse_users;
use serde::Serialize;
use tracing::{info, warn};
use utoipa::ToSchema;

use crate::rest::{segment_error_reply, ApiResult, AppState, ErrorResponse};

#[derive(Debug, Serialize, ToSchema)]
pub struct ImportResponse {
    pub imported: usize,
}

/// GET /v1/users — The current user collection.
#[utoipa::path(
    get,
    path = "/v1/users",
    tag = "Users",
    responses((status = 200, description = "All users", body = Vec<User>))
)]
pub async fn list_users(State(state): State<AppState>) -> Json<Vec<User>> {
    Json(state.store.users().as_ref().clone())
}

/// POST /v1/users/import — Replace the user collection from CSV text.
#[utoipa::path(
    post,
    path = "/v1/users/import",
    tag = "Users",
    request_body(content = String, content_type = "text/csv"),
    responses(
        (status = 200, description = "Users imported", body = ImportResponse),
        (status = 400, description = "CSV could not be parsed", body = ErrorResponse),
    )
)]
pub async fn import_users(State(state): State<AppState>, body: String) -> ApiResult<Json<ImportResponse>> {
    let users = parse_users(&body, &state.schema).map_err(|e| {
        warn!(error = %e, "User import rejected");
        metrics::counter!("users.import_errors").increment(1);
        segment_error_reply(e)
    })?;
    if users.is_empty() {
        warn!("Import produced no users");
    }
    let imported = state.store.import_users(users);
    info!(imported, "Users imported via API");
    metrics::counter!("users.imported").increment(imported as u64);
    Ok(Json(ImportResponse { imported }))
}
