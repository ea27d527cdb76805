//! Atomic access recording.

use std::sync::Arc;

use tracing::debug;

use docvault_core::error::AppError;
use docvault_core::result::AppResult;
use docvault_core::types::pagination::{PageRequest, PageResponse};
use docvault_core::types::{AccessLogId, DocumentId, ShareId};
use docvault_database::{RecordOutcome, VaultStore};
use docvault_entity::access::{AccessAction, AccessLog, AccessLogEntry, CreateAccessLog};

use super::location::LocationResolver;
use crate::context::ClientContext;

/// Appends access log entries and keeps document and grant counters in step.
#[derive(Debug, Clone)]
pub struct AccessRecorder {
    /// Record store.
    store: Arc<dyn VaultStore>,
    /// Location lookup for log entries.
    locations: Arc<dyn LocationResolver>,
}

impl AccessRecorder {
    /// Creates a new access recorder.
    pub fn new(store: Arc<dyn VaultStore>, locations: Arc<dyn LocationResolver>) -> Self {
        Self { store, locations }
    }

    /// Record one access.
    ///
    /// With a grant, its counter is bumped only while below the quota; a
    /// full quota fails with `QuotaExceeded` and writes nothing. The
    /// document counter, `last_accessed`, and the log row are committed
    /// together.
    pub async fn record(
        &self,
        document_id: DocumentId,
        share_id: Option<ShareId>,
        action: AccessAction,
        client: &ClientContext,
    ) -> AppResult<AccessLog> {
        if let Some(share_id) = share_id {
            let grant = self
                .store
                .find_grant(share_id)
                .await?
                .ok_or_else(|| AppError::not_found(format!("Share {share_id} not found")))?;
            if grant.document_id != document_id {
                return Err(AppError::validation(format!(
                    "Share {share_id} does not belong to document {document_id}"
                )));
            }
        }

        let data = CreateAccessLog {
            id: AccessLogId::new(),
            document_id,
            share_id,
            action,
            accessed_at: client.request_time,
            ip_address: client.ip_address.clone(),
            user_agent: client.user_agent_or_unknown().to_string(),
            location: self.locations.locate(&client.ip_address),
        };

        match self.store.record_access(data).await? {
            RecordOutcome::Recorded(log) => {
                debug!(
                    document_id = %document_id,
                    share_id = ?share_id.map(|id| id.to_string()),
                    action = %action,
                    "Access recorded"
                );
                Ok(log)
            }
            RecordOutcome::QuotaFull => {
                debug!(
                    document_id = %document_id,
                    share_id = ?share_id.map(|id| id.to_string()),
                    "Access quota exhausted before recording"
                );
                Err(AppError::quota_exceeded(
                    "Share link has reached its access limit",
                ))
            }
        }
    }

    /// Get an access log entry with its document's names.
    pub async fn get(&self, id: AccessLogId) -> AppResult<AccessLogEntry> {
        self.store
            .find_access_log(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Access log {id} not found")))
    }

    /// List access log entries, newest first.
    pub async fn list(
        &self,
        document_id: Option<DocumentId>,
        page: &PageRequest,
    ) -> AppResult<PageResponse<AccessLogEntry>> {
        self.store.list_access_logs(document_id, page).await
    }
}
