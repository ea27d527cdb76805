//! Application builder: wires the store and services, starts the server.

use std::net::SocketAddr;
use std::time::Duration;

use axum::Router;
use axum::middleware as axum_middleware;
use tokio::sync::watch;
use tower_http::trace::TraceLayer;

use docvault_core::config::{AppConfig, CorsConfig};
use docvault_core::error::AppError;
use docvault_database::StoreManager;

use crate::middleware;
use crate::router::build_router;
use crate::state::AppState;

/// Runs the DocVault server until a shutdown signal arrives.
pub async fn run_server(config: AppConfig) -> Result<(), AppError> {
    tracing::info!(provider = %config.store.provider, "Initializing record store...");
    let stores = StoreManager::new(&config).await?;
    tracing::info!("Record store initialized");

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let grace = Duration::from_secs(config.server.shutdown_grace_seconds);
    let cors = config.server.cors.clone();

    let state = AppState::build(config, stores.store());
    let app = build_app(state, &cors);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {addr}: {e}")))?;
    tracing::info!("DocVault server listening on {}", addr);

    let (shutdown_tx, mut shutdown_rx) = watch::channel(false);
    let server = axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(async move {
        shutdown_signal().await;
        let _ = shutdown_tx.send(true);
    });
    let mut server = tokio::spawn(async move { server.await });

    let result = tokio::select! {
        joined = &mut server => Some(joined),
        _ = shutdown_rx.wait_for(|stopped| *stopped) => None,
    };
    let result = match result {
        Some(joined) => joined,
        None => match tokio::time::timeout(grace, server).await {
            Ok(joined) => joined,
            Err(_) => {
                tracing::warn!(grace_seconds = grace.as_secs(), "Graceful shutdown timed out");
                Ok(Ok(()))
            }
        },
    };

    stores.close().await;
    tracing::info!("DocVault server stopped");

    result
        .map_err(|e| AppError::internal(format!("Server task failed: {e}")))?
        .map_err(|e| AppError::internal(format!("Server error: {e}")))
}

/// Builds the Axum application with all middleware layers.
pub fn build_app(state: AppState, cors: &CorsConfig) -> Router {
    build_router(state)
        .layer(axum_middleware::from_fn(middleware::logging::request_logging))
        .layer(middleware::cors::build_cors_layer(cors))
        .layer(TraceLayer::new_for_http())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to install Ctrl+C handler");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
