//! Shared application state for Axum handlers.

use std::sync::Arc;

use docvault_auth::PasswordHasher;
use docvault_core::config::AppConfig;
use docvault_database::VaultStore;
use docvault_service::{
    AccessRecorder, AccessService, LinkService, ShareLinkManager, StatsAggregator,
    UnknownLocation,
};

/// Application state shared across all handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Arc<AppConfig>,
    /// Record store.
    pub store: Arc<dyn VaultStore>,

    // ── Services ─────────────────────────────────────────────────
    /// Share creation, resolution, and maintenance.
    pub shares: Arc<ShareLinkManager>,
    /// Access recording.
    pub recorder: Arc<AccessRecorder>,
    /// Public share-link access.
    pub access: Arc<AccessService>,
    /// Access statistics.
    pub stats: Arc<StatsAggregator>,
}

impl AppState {
    /// Wire every service on top of `store`.
    pub fn build(config: AppConfig, store: Arc<dyn VaultStore>) -> Self {
        let links = Arc::new(LinkService::new(&config.share));
        let hasher = Arc::new(PasswordHasher::new());

        let shares = Arc::new(ShareLinkManager::new(
            Arc::clone(&store),
            links,
            hasher,
            &config.share,
        ));
        let recorder = Arc::new(AccessRecorder::new(
            Arc::clone(&store),
            Arc::new(UnknownLocation),
        ));
        let access = Arc::new(AccessService::new(
            Arc::clone(&shares),
            Arc::clone(&recorder),
        ));
        let stats = Arc::new(StatsAggregator::new(Arc::clone(&store), &config.share));

        Self {
            config: Arc::new(config),
            store,
            shares,
            recorder,
            access,
            stats,
        }
    }
}
