//! Access log handlers.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;

use docvault_core::types::AccessLogId;
use docvault_core::types::pagination::PageResponse;
use docvault_entity::access::{AccessLog, AccessLogEntry};

use crate::dto::request::{AccessLogQuery, PaginationParams, RecordAccessRequest};
use crate::dto::response::ApiResponse;
use crate::error::ApiError;
use crate::extractors::ClientInfo;
use crate::state::AppState;

/// GET /api/access-logs
pub async fn list_access_logs(
    State(state): State<AppState>,
    Query(query): Query<AccessLogQuery>,
    Query(params): Query<PaginationParams>,
) -> Result<Json<ApiResponse<PageResponse<AccessLogEntry>>>, ApiError> {
    let logs = state
        .recorder
        .list(query.document_id, &params.into_page_request())
        .await?;
    Ok(Json(ApiResponse::ok(logs)))
}

/// POST /api/access-logs
pub async fn record_access(
    State(state): State<AppState>,
    client: ClientInfo,
    Json(req): Json<RecordAccessRequest>,
) -> Result<(StatusCode, Json<ApiResponse<AccessLog>>), ApiError> {
    let log = state
        .recorder
        .record(req.document_id, req.share_id, req.action, client.context())
        .await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(log))))
}

/// GET /api/access-logs/{id}
pub async fn get_access_log(
    State(state): State<AppState>,
    Path(id): Path<AccessLogId>,
) -> Result<Json<ApiResponse<AccessLogEntry>>, ApiError> {
    let log = state.recorder.get(id).await?;
    Ok(Json(ApiResponse::ok(log)))
}
