//! Store manager that builds the configured [`VaultStore`] provider.

use std::sync::Arc;

use tracing::info;

use docvault_core::config::AppConfig;
use docvault_core::error::AppError;
use docvault_core::result::AppResult;

use crate::connection::DatabasePool;
use crate::memory::MemoryVaultStore;
use crate::migration::run_migrations;
use crate::postgres::PgVaultStore;
use crate::store::VaultStore;

/// Owns the record store selected by `store.provider`.
#[derive(Debug, Clone)]
pub struct StoreManager {
    inner: Arc<dyn VaultStore>,
    pool: Option<DatabasePool>,
}

impl StoreManager {
    /// Build the provider named in configuration.
    ///
    /// The PostgreSQL provider connects eagerly and applies pending
    /// migrations when `database.run_migrations` is set.
    pub async fn new(config: &AppConfig) -> AppResult<Self> {
        match config.store.provider.as_str() {
            "postgres" => {
                info!("Initializing PostgreSQL record store");
                let pool = DatabasePool::connect(&config.database).await?;
                if config.database.run_migrations {
                    run_migrations(pool.pool()).await?;
                }
                Ok(Self {
                    inner: Arc::new(PgVaultStore::new(pool.clone())),
                    pool: Some(pool),
                })
            }
            "memory" => {
                info!("Initializing in-memory record store");
                Ok(Self::from_store(Arc::new(MemoryVaultStore::new())))
            }
            other => Err(AppError::configuration(format!(
                "Unknown store provider: '{other}'. Supported: postgres, memory"
            ))),
        }
    }

    /// Wrap an existing store (for testing).
    pub fn from_store(store: Arc<dyn VaultStore>) -> Self {
        Self {
            inner: store,
            pool: None,
        }
    }

    /// Shared handle to the store.
    pub fn store(&self) -> Arc<dyn VaultStore> {
        Arc::clone(&self.inner)
    }

    /// Release pooled connections, if any.
    pub async fn close(&self) {
        if let Some(pool) = &self.pool {
            pool.close().await;
        }
    }
}
