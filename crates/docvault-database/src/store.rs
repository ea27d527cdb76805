//! The record store boundary.
//!
//! Every method that touches more than one record runs as a single unit:
//! a database transaction for [`PgVaultStore`](crate::PgVaultStore), one
//! write-lock acquisition for [`MemoryVaultStore`](crate::MemoryVaultStore).

use std::fmt::Debug;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use docvault_core::error::AppError;
use docvault_core::result::AppResult;
use docvault_core::types::pagination::{PageRequest, PageResponse};
use docvault_core::types::{AccessLogId, DocumentId, ShareId};
use docvault_entity::access::{AccessLog, AccessLogEntry, CreateAccessLog};
use docvault_entity::document::Document;
use docvault_entity::share::{CreateShareGrant, ShareFilter, ShareGrant, UpdateShareGrant};

/// Result of the conditional grant counter increment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GrantCounter {
    /// The counter was below its limit and now holds this value.
    Incremented(i32),
    /// The counter had already reached `max_access_count`.
    QuotaFull,
}

/// Result of recording an access.
#[derive(Debug, Clone)]
pub enum RecordOutcome {
    /// Counters were bumped and the log row appended.
    Recorded(AccessLog),
    /// The grant's quota was full; nothing was written.
    QuotaFull,
}

/// Transactional storage of documents, share grants, and access logs.
#[async_trait]
pub trait VaultStore: Send + Sync + Debug + 'static {
    /// Provider name for logs and health output.
    fn provider_name(&self) -> &'static str;

    /// Look up a document.
    async fn find_document(&self, id: DocumentId) -> AppResult<Option<Document>>;

    /// Insert a fully formed document row.
    async fn insert_document(&self, document: &Document) -> AppResult<Document>;

    /// Delete a document together with its grants and access logs.
    ///
    /// Returns `false` when the document did not exist.
    async fn delete_document(&self, id: DocumentId) -> AppResult<bool>;

    /// Look up a share grant.
    async fn find_grant(&self, id: ShareId) -> AppResult<Option<ShareGrant>>;

    /// Deactivate the document's current grant, insert the new one, and
    /// mirror its link and expiry onto the document.
    ///
    /// Fails with `NotFound` when the document does not exist.
    async fn create_grant(&self, data: CreateShareGrant) -> AppResult<ShareGrant>;

    /// Apply a partial update to an active grant.
    ///
    /// Fails with `NotFound` for a missing grant and `Validation` when the
    /// grant is inactive or the new quota is below the current count.
    async fn update_grant(&self, id: ShareId, update: UpdateShareGrant) -> AppResult<ShareGrant>;

    /// Deactivate a grant and clear the document's share state.
    ///
    /// Returns `false` if the grant was already inactive.
    async fn deactivate_grant(&self, id: ShareId) -> AppResult<bool>;

    /// List grants matching `filter` at `now`, newest first.
    async fn list_grants(
        &self,
        filter: ShareFilter,
        now: DateTime<Utc>,
        page: &PageRequest,
    ) -> AppResult<PageResponse<ShareGrant>>;

    /// Active grants with `now < expires_at <= until`, soonest first.
    async fn find_expiring_grants(
        &self,
        now: DateTime<Utc>,
        until: DateTime<Utc>,
    ) -> AppResult<Vec<ShareGrant>>;

    /// Bump the grant counter (when a grant is given), bump the document
    /// counter and `last_accessed`, and append the log row.
    ///
    /// Fails with `NotFound` when the document or grant is missing.
    async fn record_access(&self, data: CreateAccessLog) -> AppResult<RecordOutcome>;

    /// Look up an access log entry with its document's names.
    async fn find_access_log(&self, id: AccessLogId) -> AppResult<Option<AccessLogEntry>>;

    /// List access log entries with their document's names, newest first.
    async fn list_access_logs(
        &self,
        document_id: Option<DocumentId>,
        page: &PageRequest,
    ) -> AppResult<PageResponse<AccessLogEntry>>;

    /// Every entry with `accessed_at >= since`, newest first, read from one
    /// consistent snapshot.
    async fn access_logs_since(
        &self,
        since: DateTime<Utc>,
        document_id: Option<DocumentId>,
    ) -> AppResult<Vec<AccessLog>>;

    /// Check that the store is reachable.
    async fn health_check(&self) -> AppResult<bool>;
}

/// Rules an update must satisfy against the grant as currently stored.
pub(crate) fn check_update(current: &ShareGrant, update: &UpdateShareGrant) -> AppResult<()> {
    if !current.is_active {
        return Err(AppError::validation(format!(
            "Share {} is no longer active",
            current.id
        )));
    }
    if let Some(Some(max)) = update.max_access_count {
        if max < current.current_access_count {
            return Err(AppError::validation(format!(
                "max_access_count {max} is below the current access count {}",
                current.current_access_count
            )));
        }
    }
    let require_password = update.require_password.unwrap_or(current.require_password);
    let has_hash = match &update.password_hash {
        Some(hash) => hash.is_some(),
        None => current.password_hash.is_some(),
    };
    if require_password && !has_hash {
        return Err(AppError::validation(
            "A password is required when require_password is set",
        ));
    }
    Ok(())
}
