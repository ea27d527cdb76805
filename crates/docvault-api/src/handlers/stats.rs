//! Access statistics handlers.

use axum::Json;
use axum::extract::{Path, Query, State};

use docvault_core::types::DocumentId;
use docvault_service::{AccessOverview, DocumentAccessStats};

use crate::dto::request::WindowQuery;
use crate::dto::response::ApiResponse;
use crate::error::ApiError;
use crate::state::AppState;

/// GET /api/access-logs/stats/overview
pub async fn overview(
    State(state): State<AppState>,
    Query(query): Query<WindowQuery>,
) -> Result<Json<ApiResponse<AccessOverview>>, ApiError> {
    let days = query.days.unwrap_or(state.config.share.stats_window_days);
    let overview = state.stats.overview(days).await?;
    Ok(Json(ApiResponse::ok(overview)))
}

/// GET /api/access-logs/stats/documents/{id}
pub async fn document_stats(
    State(state): State<AppState>,
    Path(document_id): Path<DocumentId>,
    Query(query): Query<WindowQuery>,
) -> Result<Json<ApiResponse<DocumentAccessStats>>, ApiError> {
    let days = query.days.unwrap_or(state.config.share.stats_window_days);
    let stats = state.stats.per_document(document_id, days).await?;
    Ok(Json(ApiResponse::ok(stats)))
}
