//! In-process [`VaultStore`] for development and tests.
//!
//! All three tables live behind one `RwLock`. Each trait method acquires the
//! lock exactly once, so writers are serialized and readers see a
//! consistent snapshot.

use std::cmp::Reverse;
use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use tracing::debug;

use docvault_core::error::AppError;
use docvault_core::result::AppResult;
use docvault_core::types::pagination::{PageRequest, PageResponse};
use docvault_core::types::{AccessLogId, DocumentId, ShareId};
use docvault_entity::access::{AccessLog, AccessLogEntry, CreateAccessLog};
use docvault_entity::document::Document;
use docvault_entity::share::{CreateShareGrant, ShareFilter, ShareGrant, UpdateShareGrant};

use crate::store::{GrantCounter, RecordOutcome, VaultStore, check_update};

#[derive(Debug, Default)]
struct Tables {
    documents: HashMap<DocumentId, Document>,
    grants: HashMap<ShareId, ShareGrant>,
    logs: Vec<AccessLog>,
}

impl Tables {
    fn try_increment(&mut self, id: ShareId, now: DateTime<Utc>) -> AppResult<GrantCounter> {
        let grant = self
            .grants
            .get_mut(&id)
            .ok_or_else(|| AppError::not_found(format!("Share {id} not found")))?;
        if grant.quota_exhausted() {
            return Ok(GrantCounter::QuotaFull);
        }
        grant.current_access_count += 1;
        grant.updated_at = now;
        Ok(GrantCounter::Incremented(grant.current_access_count))
    }

    fn entry(&self, log: &AccessLog) -> Option<AccessLogEntry> {
        let doc = self.documents.get(&log.document_id)?;
        Some(AccessLogEntry {
            log: log.clone(),
            document_name: doc.name.clone(),
            original_name: doc.original_name.clone(),
        })
    }

    fn clear_share_state(&mut self, document_id: DocumentId, now: DateTime<Utc>) {
        if let Some(doc) = self.documents.get_mut(&document_id) {
            doc.is_shared = false;
            doc.share_link = None;
            doc.share_expires_at = None;
            doc.updated_at = now;
        }
    }
}

/// Record store holding everything in memory.
#[derive(Debug, Default)]
pub struct MemoryVaultStore {
    tables: RwLock<Tables>,
}

impl MemoryVaultStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl VaultStore for MemoryVaultStore {
    fn provider_name(&self) -> &'static str {
        "memory"
    }

    async fn find_document(&self, id: DocumentId) -> AppResult<Option<Document>> {
        Ok(self.tables.read().await.documents.get(&id).cloned())
    }

    async fn insert_document(&self, document: &Document) -> AppResult<Document> {
        let mut tables = self.tables.write().await;
        if tables.documents.contains_key(&document.id) {
            return Err(AppError::database(format!(
                "Document {} already exists",
                document.id
            )));
        }
        tables.documents.insert(document.id, document.clone());
        Ok(document.clone())
    }

    async fn delete_document(&self, id: DocumentId) -> AppResult<bool> {
        let mut tables = self.tables.write().await;
        if tables.documents.remove(&id).is_none() {
            return Ok(false);
        }
        tables.grants.retain(|_, g| g.document_id != id);
        tables.logs.retain(|l| l.document_id != id);
        Ok(true)
    }

    async fn find_grant(&self, id: ShareId) -> AppResult<Option<ShareGrant>> {
        Ok(self.tables.read().await.grants.get(&id).cloned())
    }

    async fn create_grant(&self, data: CreateShareGrant) -> AppResult<ShareGrant> {
        let now = Utc::now();
        let mut tables = self.tables.write().await;

        if !tables.documents.contains_key(&data.document_id) {
            return Err(AppError::not_found(format!(
                "Document {} not found",
                data.document_id
            )));
        }

        for grant in tables.grants.values_mut() {
            if grant.document_id == data.document_id && grant.is_active {
                grant.is_active = false;
                grant.updated_at = now;
            }
        }

        let document_id = data.document_id;
        let expires_at = data.expires_at;
        let share_link = data.share_link.clone();
        let grant = data.into_grant(now);
        tables.grants.insert(grant.id, grant.clone());

        if let Some(doc) = tables.documents.get_mut(&document_id) {
            doc.is_shared = true;
            doc.share_link = Some(share_link);
            doc.share_expires_at = Some(expires_at);
            doc.updated_at = now;
        }

        debug!(share_id = %grant.id, document_id = %document_id, "Share grant stored");
        Ok(grant)
    }

    async fn update_grant(&self, id: ShareId, update: UpdateShareGrant) -> AppResult<ShareGrant> {
        let now = Utc::now();
        let mut tables = self.tables.write().await;

        let grant = tables
            .grants
            .get_mut(&id)
            .ok_or_else(|| AppError::not_found(format!("Share {id} not found")))?;
        check_update(grant, &update)?;
        update.apply(grant, now);
        let grant = grant.clone();

        if let Some(expires_at) = update.expires_at {
            if let Some(doc) = tables.documents.get_mut(&grant.document_id) {
                if doc.is_shared {
                    doc.share_expires_at = Some(expires_at);
                    doc.updated_at = now;
                }
            }
        }
        Ok(grant)
    }

    async fn deactivate_grant(&self, id: ShareId) -> AppResult<bool> {
        let now = Utc::now();
        let mut tables = self.tables.write().await;

        let grant = tables
            .grants
            .get_mut(&id)
            .ok_or_else(|| AppError::not_found(format!("Share {id} not found")))?;
        if !grant.is_active {
            return Ok(false);
        }
        grant.is_active = false;
        grant.updated_at = now;
        let document_id = grant.document_id;

        tables.clear_share_state(document_id, now);
        Ok(true)
    }

    async fn list_grants(
        &self,
        filter: ShareFilter,
        now: DateTime<Utc>,
        page: &PageRequest,
    ) -> AppResult<PageResponse<ShareGrant>> {
        let tables = self.tables.read().await;
        let mut matching: Vec<ShareGrant> = tables
            .grants
            .values()
            .filter(|g| filter.matches(g, now))
            .cloned()
            .collect();
        matching.sort_by_key(|g| Reverse((g.created_at, g.id)));
        Ok(PageResponse::from_slice(&matching, page))
    }

    async fn find_expiring_grants(
        &self,
        now: DateTime<Utc>,
        until: DateTime<Utc>,
    ) -> AppResult<Vec<ShareGrant>> {
        let tables = self.tables.read().await;
        let mut expiring: Vec<ShareGrant> = tables
            .grants
            .values()
            .filter(|g| g.is_active && g.expires_at > now && g.expires_at <= until)
            .cloned()
            .collect();
        expiring.sort_by_key(|g| (g.expires_at, g.id));
        Ok(expiring)
    }

    async fn record_access(&self, data: CreateAccessLog) -> AppResult<RecordOutcome> {
        let mut tables = self.tables.write().await;

        if !tables.documents.contains_key(&data.document_id) {
            return Err(AppError::not_found(format!(
                "Document {} not found",
                data.document_id
            )));
        }

        if let Some(share_id) = data.share_id {
            if tables.try_increment(share_id, data.accessed_at)? == GrantCounter::QuotaFull {
                return Ok(RecordOutcome::QuotaFull);
            }
        }

        if let Some(doc) = tables.documents.get_mut(&data.document_id) {
            doc.access_count += 1;
            doc.last_accessed = Some(data.accessed_at);
        }

        let log = data.into_log();
        tables.logs.push(log.clone());
        Ok(RecordOutcome::Recorded(log))
    }

    async fn find_access_log(&self, id: AccessLogId) -> AppResult<Option<AccessLogEntry>> {
        let tables = self.tables.read().await;
        Ok(tables
            .logs
            .iter()
            .find(|l| l.id == id)
            .and_then(|l| tables.entry(l)))
    }

    async fn list_access_logs(
        &self,
        document_id: Option<DocumentId>,
        page: &PageRequest,
    ) -> AppResult<PageResponse<AccessLogEntry>> {
        let tables = self.tables.read().await;
        let mut matching: Vec<AccessLogEntry> = tables
            .logs
            .iter()
            .filter(|l| document_id.is_none_or(|d| l.document_id == d))
            .filter_map(|l| tables.entry(l))
            .collect();
        matching.sort_by_key(|e| Reverse((e.log.accessed_at, e.log.id)));
        Ok(PageResponse::from_slice(&matching, page))
    }

    async fn access_logs_since(
        &self,
        since: DateTime<Utc>,
        document_id: Option<DocumentId>,
    ) -> AppResult<Vec<AccessLog>> {
        let tables = self.tables.read().await;
        let mut window: Vec<AccessLog> = tables
            .logs
            .iter()
            .filter(|l| l.accessed_at >= since)
            .filter(|l| document_id.is_none_or(|d| l.document_id == d))
            .cloned()
            .collect();
        window.sort_by_key(|l| Reverse((l.accessed_at, l.id)));
        Ok(window)
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(true)
    }
}
