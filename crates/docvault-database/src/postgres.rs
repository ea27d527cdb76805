//! PostgreSQL-backed [`VaultStore`].

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{Postgres, Transaction};
use tracing::debug;

use docvault_core::error::AppError;
use docvault_core::result::AppResult;
use docvault_core::types::pagination::{PageRequest, PageResponse};
use docvault_core::types::{AccessLogId, DocumentId, ShareId};
use docvault_entity::access::{AccessLog, AccessLogEntry, CreateAccessLog};
use docvault_entity::document::Document;
use docvault_entity::share::{CreateShareGrant, ShareFilter, ShareGrant, UpdateShareGrant};

use crate::connection::{DatabasePool, commit};
use crate::repositories::{AccessLogRepository, DocumentRepository, ShareGrantRepository};
use crate::store::{GrantCounter, RecordOutcome, VaultStore, check_update};

/// Record store running every multi-row operation in one transaction.
///
/// Transactions lock the document row before any of its grant rows.
#[derive(Debug, Clone)]
pub struct PgVaultStore {
    db: DatabasePool,
}

impl PgVaultStore {
    /// Create a store over an open pool.
    pub fn new(db: DatabasePool) -> Self {
        Self { db }
    }

    /// The underlying pool.
    pub fn database(&self) -> &DatabasePool {
        &self.db
    }
}

#[async_trait]
impl VaultStore for PgVaultStore {
    fn provider_name(&self) -> &'static str {
        "postgres"
    }

    async fn find_document(&self, id: DocumentId) -> AppResult<Option<Document>> {
        DocumentRepository::find_by_id(self.db.pool(), id).await
    }

    async fn insert_document(&self, document: &Document) -> AppResult<Document> {
        DocumentRepository::insert(self.db.pool(), document).await
    }

    async fn delete_document(&self, id: DocumentId) -> AppResult<bool> {
        DocumentRepository::delete(self.db.pool(), id).await
    }

    async fn find_grant(&self, id: ShareId) -> AppResult<Option<ShareGrant>> {
        ShareGrantRepository::find_by_id(self.db.pool(), id).await
    }

    async fn create_grant(&self, data: CreateShareGrant) -> AppResult<ShareGrant> {
        let now = Utc::now();
        let mut tx = self.db.begin().await?;

        DocumentRepository::find_for_update(&mut *tx, data.document_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Document {} not found", data.document_id)))?;

        let replaced =
            ShareGrantRepository::deactivate_for_document(&mut *tx, data.document_id, now).await?;
        let grant = ShareGrantRepository::insert(&mut *tx, &data, now).await?;
        DocumentRepository::set_share_state(
            &mut *tx,
            data.document_id,
            Some(data.share_link.as_str()),
            Some(data.expires_at),
            now,
        )
        .await?;

        commit(tx).await?;
        debug!(share_id = %grant.id, document_id = %grant.document_id, replaced, "Share grant stored");
        Ok(grant)
    }

    async fn update_grant(&self, id: ShareId, update: UpdateShareGrant) -> AppResult<ShareGrant> {
        let now = Utc::now();
        let mut tx = self.db.begin().await?;

        let current = lock_grant(&mut tx, id).await?;
        check_update(&current, &update)?;

        let grant = ShareGrantRepository::update(&mut *tx, &current, &update, now).await?;
        if let Some(expires_at) = update.expires_at {
            DocumentRepository::set_share_expiry(&mut *tx, grant.document_id, expires_at, now)
                .await?;
        }

        commit(tx).await?;
        Ok(grant)
    }

    async fn deactivate_grant(&self, id: ShareId) -> AppResult<bool> {
        let now = Utc::now();
        let mut tx = self.db.begin().await?;

        let grant = lock_grant(&mut tx, id).await?;
        if !grant.is_active {
            return Ok(false);
        }

        ShareGrantRepository::deactivate(&mut *tx, id, now).await?;
        DocumentRepository::set_share_state(&mut *tx, grant.document_id, None, None, now).await?;

        commit(tx).await?;
        Ok(true)
    }

    async fn list_grants(
        &self,
        filter: ShareFilter,
        now: DateTime<Utc>,
        page: &PageRequest,
    ) -> AppResult<PageResponse<ShareGrant>> {
        let total = ShareGrantRepository::count(self.db.pool(), filter, now).await?;
        let items = ShareGrantRepository::list(self.db.pool(), filter, now, page).await?;
        Ok(PageResponse::new(items, page, total))
    }

    async fn find_expiring_grants(
        &self,
        now: DateTime<Utc>,
        until: DateTime<Utc>,
    ) -> AppResult<Vec<ShareGrant>> {
        ShareGrantRepository::find_expiring(self.db.pool(), now, until).await
    }

    async fn record_access(&self, data: CreateAccessLog) -> AppResult<RecordOutcome> {
        let mut tx = self.db.begin().await?;

        DocumentRepository::find_for_update(&mut *tx, data.document_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Document {} not found", data.document_id)))?;

        if let Some(share_id) = data.share_id {
            let counter =
                ShareGrantRepository::try_increment(&mut *tx, share_id, data.accessed_at).await?;
            if counter == GrantCounter::QuotaFull {
                if !ShareGrantRepository::exists(&mut *tx, share_id).await? {
                    return Err(AppError::not_found(format!("Share {share_id} not found")));
                }
                return Ok(RecordOutcome::QuotaFull);
            }
        }

        DocumentRepository::increment_access(&mut *tx, data.document_id, data.accessed_at)
            .await?;
        let log = AccessLogRepository::insert(&mut *tx, &data).await?;

        commit(tx).await?;
        Ok(RecordOutcome::Recorded(log))
    }

    async fn find_access_log(&self, id: AccessLogId) -> AppResult<Option<AccessLogEntry>> {
        AccessLogRepository::find_by_id(self.db.pool(), id).await
    }

    async fn list_access_logs(
        &self,
        document_id: Option<DocumentId>,
        page: &PageRequest,
    ) -> AppResult<PageResponse<AccessLogEntry>> {
        let total = AccessLogRepository::count(self.db.pool(), document_id).await?;
        let items = AccessLogRepository::list(self.db.pool(), document_id, page).await?;
        Ok(PageResponse::new(items, page, total))
    }

    async fn access_logs_since(
        &self,
        since: DateTime<Utc>,
        document_id: Option<DocumentId>,
    ) -> AppResult<Vec<AccessLog>> {
        AccessLogRepository::since(self.db.pool(), since, document_id).await
    }

    async fn health_check(&self) -> AppResult<bool> {
        self.db.health_check().await
    }
}

/// Lock a grant's document and then the grant itself.
///
/// The document id is read without a lock first; it never changes once the
/// grant exists.
async fn lock_grant(tx: &mut Transaction<'static, Postgres>, id: ShareId) -> AppResult<ShareGrant> {
    let not_found = || AppError::not_found(format!("Share {id} not found"));

    let document_id = ShareGrantRepository::find_by_id(&mut **tx, id)
        .await?
        .ok_or_else(not_found)?
        .document_id;
    DocumentRepository::find_for_update(&mut **tx, document_id).await?;
    ShareGrantRepository::find_for_update(&mut **tx, id)
        .await?
        .ok_or_else(not_found)
}
