//! Share CRUD and public access handlers.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use chrono::Utc;
use validator::Validate;

use docvault_core::types::ShareId;
use docvault_core::types::pagination::PageResponse;
use docvault_entity::access::AccessAction;
use docvault_entity::share::ShareGrant;

use crate::dto::request::{
    CreateShareRequest, OpenShareRequest, PaginationParams, ShareListQuery, UpdateShareRequest,
    WindowQuery,
};
use crate::dto::response::{
    ApiResponse, OpenedShareResponse, ShareDetailsResponse, ShareResponse, map_page,
};
use crate::error::ApiError;
use crate::extractors::ClientInfo;
use crate::state::AppState;

/// GET /api/shares
pub async fn list_shares(
    State(state): State<AppState>,
    Query(query): Query<ShareListQuery>,
    Query(params): Query<PaginationParams>,
) -> Result<Json<ApiResponse<PageResponse<ShareResponse>>>, ApiError> {
    let page = state
        .shares
        .list(query.filter, &params.into_page_request())
        .await?;
    let now = Utc::now();
    Ok(Json(ApiResponse::ok(map_page(page, |grant| {
        present(&state, &grant, now)
    }))))
}

/// POST /api/shares
pub async fn create_share(
    State(state): State<AppState>,
    Json(req): Json<CreateShareRequest>,
) -> Result<(StatusCode, Json<ApiResponse<ShareResponse>>), ApiError> {
    req.validate()?;
    let created = state.shares.create(req.into_input()).await?;
    let share = ShareResponse::new(&created.grant, &created.link, Utc::now());
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(share))))
}

/// GET /api/shares/expiring
pub async fn expiring_shares(
    State(state): State<AppState>,
    Query(query): Query<WindowQuery>,
) -> Result<Json<ApiResponse<Vec<ShareResponse>>>, ApiError> {
    let days = query
        .days
        .unwrap_or(state.config.share.expiring_window_days);
    let grants = state.shares.expiring_soon(days).await?;
    let now = Utc::now();
    let shares = grants
        .iter()
        .map(|grant| present(&state, grant, now))
        .collect();
    Ok(Json(ApiResponse::ok(shares)))
}

/// GET /api/shares/{id}
pub async fn get_share(
    State(state): State<AppState>,
    Path(id): Path<ShareId>,
) -> Result<Json<ApiResponse<ShareDetailsResponse>>, ApiError> {
    let details = state.shares.get(id).await?;
    Ok(Json(ApiResponse::ok(ShareDetailsResponse {
        share: present(&state, &details.grant, Utc::now()),
        document: details.document,
    })))
}

/// PUT /api/shares/{id}
pub async fn update_share(
    State(state): State<AppState>,
    Path(id): Path<ShareId>,
    Json(req): Json<UpdateShareRequest>,
) -> Result<Json<ApiResponse<ShareResponse>>, ApiError> {
    req.validate()?;
    let grant = state.shares.update(id, req.into_input()).await?;
    Ok(Json(ApiResponse::ok(present(&state, &grant, Utc::now()))))
}

/// DELETE /api/shares/{id}
pub async fn revoke_share(
    State(state): State<AppState>,
    Path(id): Path<ShareId>,
) -> Result<StatusCode, ApiError> {
    state.shares.revoke(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/s/{token}
pub async fn open_share(
    State(state): State<AppState>,
    Path(token): Path<String>,
    client: ClientInfo,
    Json(req): Json<OpenShareRequest>,
) -> Result<Json<ApiResponse<OpenedShareResponse>>, ApiError> {
    let action = req.action.unwrap_or(AccessAction::View);
    let opened = state
        .access
        .open(&token, req.password.as_deref(), action, client.context())
        .await?;
    Ok(Json(ApiResponse::ok(opened.into())))
}

fn present(state: &AppState, grant: &ShareGrant, now: chrono::DateTime<Utc>) -> ShareResponse {
    ShareResponse::new(grant, &state.shares.links().link_for(grant), now)
}
