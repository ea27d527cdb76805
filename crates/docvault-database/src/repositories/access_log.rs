//! Access log repository implementation.

use chrono::{DateTime, Utc};
use sqlx::{PgExecutor, Postgres, QueryBuilder};

use docvault_core::error::{AppError, ErrorKind};
use docvault_core::result::AppResult;
use docvault_core::types::pagination::PageRequest;
use docvault_core::types::{AccessLogId, DocumentId};
use docvault_entity::access::{AccessLog, AccessLogEntry, CreateAccessLog};

/// Log columns plus the document names, for operator-facing reads.
const ENTRY_SELECT: &str = "SELECT l.*, d.name AS document_name, d.original_name \
     FROM access_logs l JOIN documents d ON d.id = l.document_id";

/// Statements over the append-only `access_logs` table.
#[derive(Debug, Clone, Copy)]
pub struct AccessLogRepository;

impl AccessLogRepository {
    /// Append an entry.
    pub async fn insert<'e>(
        exec: impl PgExecutor<'e>,
        data: &CreateAccessLog,
    ) -> AppResult<AccessLog> {
        sqlx::query_as::<_, AccessLog>(
            "INSERT INTO access_logs (id, document_id, share_id, action, accessed_at, \
             ip_address, user_agent, location) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) RETURNING *",
        )
        .bind(data.id)
        .bind(data.document_id)
        .bind(data.share_id)
        .bind(data.action)
        .bind(data.accessed_at)
        .bind(&data.ip_address)
        .bind(&data.user_agent)
        .bind(&data.location)
        .fetch_one(exec)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to insert access log", e))
    }

    /// Find an entry by ID.
    pub async fn find_by_id<'e>(
        exec: impl PgExecutor<'e>,
        id: AccessLogId,
    ) -> AppResult<Option<AccessLogEntry>> {
        let mut qb = QueryBuilder::<Postgres>::new(ENTRY_SELECT);
        qb.push(" WHERE l.id = ").push_bind(id);

        qb.build_query_as::<AccessLogEntry>()
            .fetch_optional(exec)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find access log", e))
    }

    /// Count entries, optionally for one document.
    pub async fn count<'e>(
        exec: impl PgExecutor<'e>,
        document_id: Option<DocumentId>,
    ) -> AppResult<u64> {
        let mut qb = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM access_logs");
        if let Some(document_id) = document_id {
            qb.push(" WHERE document_id = ").push_bind(document_id);
        }
        let total = qb
            .build_query_scalar::<i64>()
            .fetch_one(exec)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to count access logs", e)
            })?;
        Ok(total as u64)
    }

    /// One page of entries, newest first.
    pub async fn list<'e>(
        exec: impl PgExecutor<'e>,
        document_id: Option<DocumentId>,
        page: &PageRequest,
    ) -> AppResult<Vec<AccessLogEntry>> {
        let mut qb = QueryBuilder::<Postgres>::new(ENTRY_SELECT);
        if let Some(document_id) = document_id {
            qb.push(" WHERE l.document_id = ").push_bind(document_id);
        }
        qb.push(" ORDER BY l.accessed_at DESC, l.id DESC LIMIT ")
            .push_bind(page.limit() as i64)
            .push(" OFFSET ")
            .push_bind(page.offset() as i64);

        qb.build_query_as::<AccessLogEntry>()
            .fetch_all(exec)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list access logs", e))
    }

    /// Every entry at or after `since`, newest first.
    pub async fn since<'e>(
        exec: impl PgExecutor<'e>,
        since: DateTime<Utc>,
        document_id: Option<DocumentId>,
    ) -> AppResult<Vec<AccessLog>> {
        let mut qb = QueryBuilder::<Postgres>::new("SELECT * FROM access_logs WHERE accessed_at >= ");
        qb.push_bind(since);
        if let Some(document_id) = document_id {
            qb.push(" AND document_id = ").push_bind(document_id);
        }
        qb.push(" ORDER BY accessed_at DESC, id DESC");

        qb.build_query_as::<AccessLog>()
            .fetch_all(exec)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to read access log window", e)
            })
    }
}
