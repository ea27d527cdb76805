//! Route definitions for the DocVault HTTP API.
//!
//! All routes are organized by domain and mounted under `/api`.

use axum::Router;
use axum::routing::{get, post};

use crate::handlers;
use crate::state::AppState;

/// Build the API router. Middleware is applied in [`crate::app::build_app`].
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .merge(share_routes())
        .merge(public_routes())
        .merge(access_log_routes())
        .merge(stats_routes())
        .merge(health_routes());

    Router::new().nest("/api", api_routes).with_state(state)
}

/// Share management
fn share_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/shares",
            get(handlers::share::list_shares).post(handlers::share::create_share),
        )
        .route("/shares/expiring", get(handlers::share::expiring_shares))
        .route(
            "/shares/{id}",
            get(handlers::share::get_share)
                .put(handlers::share::update_share)
                .delete(handlers::share::revoke_share),
        )
}

/// Public share-link access
fn public_routes() -> Router<AppState> {
    Router::new().route("/s/{token}", post(handlers::share::open_share))
}

/// Access log listing and direct recording
fn access_log_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/access-logs",
            get(handlers::access::list_access_logs).post(handlers::access::record_access),
        )
        .route("/access-logs/{id}", get(handlers::access::get_access_log))
}

/// Access statistics
fn stats_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/access-logs/stats/overview",
            get(handlers::stats::overview),
        )
        .route(
            "/access-logs/stats/documents/{id}",
            get(handlers::stats::document_stats),
        )
}

/// Health check
fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(handlers::health::health))
}
