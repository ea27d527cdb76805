//! Document repository implementation.

use chrono::{DateTime, Utc};
use sqlx::PgExecutor;

use docvault_core::error::{AppError, ErrorKind};
use docvault_core::result::AppResult;
use docvault_core::types::DocumentId;
use docvault_entity::document::Document;

/// Statements over the `documents` table.
#[derive(Debug, Clone, Copy)]
pub struct DocumentRepository;

impl DocumentRepository {
    /// Find a document by ID.
    pub async fn find_by_id<'e>(
        exec: impl PgExecutor<'e>,
        id: DocumentId,
    ) -> AppResult<Option<Document>> {
        sqlx::query_as::<_, Document>("SELECT * FROM documents WHERE id = $1")
            .bind(id)
            .fetch_optional(exec)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find document", e))
    }

    /// Find a document and lock its row until the transaction ends.
    pub async fn find_for_update<'e>(
        exec: impl PgExecutor<'e>,
        id: DocumentId,
    ) -> AppResult<Option<Document>> {
        sqlx::query_as::<_, Document>("SELECT * FROM documents WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(exec)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to lock document", e))
    }

    /// Insert a document row.
    pub async fn insert<'e>(exec: impl PgExecutor<'e>, doc: &Document) -> AppResult<Document> {
        sqlx::query_as::<_, Document>(
            "INSERT INTO documents (id, name, original_name, size_bytes, content_type, \
             uploaded_at, last_accessed, access_count, is_shared, share_link, share_expires_at, \
             updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12) RETURNING *",
        )
        .bind(doc.id)
        .bind(&doc.name)
        .bind(&doc.original_name)
        .bind(doc.size_bytes)
        .bind(&doc.content_type)
        .bind(doc.uploaded_at)
        .bind(doc.last_accessed)
        .bind(doc.access_count)
        .bind(doc.is_shared)
        .bind(&doc.share_link)
        .bind(doc.share_expires_at)
        .bind(doc.updated_at)
        .fetch_one(exec)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to insert document", e))
    }

    /// Delete a document. Grants and access logs go with it via
    /// `ON DELETE CASCADE`.
    pub async fn delete<'e>(exec: impl PgExecutor<'e>, id: DocumentId) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM documents WHERE id = $1")
            .bind(id)
            .execute(exec)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to delete document", e)
            })?;
        Ok(result.rows_affected() > 0)
    }

    /// Set or clear the mirrored share state.
    pub async fn set_share_state<'e>(
        exec: impl PgExecutor<'e>,
        id: DocumentId,
        share_link: Option<&str>,
        expires_at: Option<DateTime<Utc>>,
        now: DateTime<Utc>,
    ) -> AppResult<()> {
        sqlx::query(
            "UPDATE documents SET is_shared = $2, share_link = $3, share_expires_at = $4, \
             updated_at = $5 WHERE id = $1",
        )
        .bind(id)
        .bind(share_link.is_some())
        .bind(share_link)
        .bind(expires_at)
        .bind(now)
        .execute(exec)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to update document share state", e)
        })?;
        Ok(())
    }

    /// Update only the mirrored expiry of a shared document.
    pub async fn set_share_expiry<'e>(
        exec: impl PgExecutor<'e>,
        id: DocumentId,
        expires_at: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> AppResult<()> {
        sqlx::query(
            "UPDATE documents SET share_expires_at = $2, updated_at = $3 \
             WHERE id = $1 AND is_shared",
        )
        .bind(id)
        .bind(expires_at)
        .bind(now)
        .execute(exec)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to update document expiry", e)
        })?;
        Ok(())
    }

    /// Increment the access counter and stamp `last_accessed`.
    ///
    /// Returns `false` when the document does not exist.
    pub async fn increment_access<'e>(
        exec: impl PgExecutor<'e>,
        id: DocumentId,
        accessed_at: DateTime<Utc>,
    ) -> AppResult<bool> {
        let result = sqlx::query(
            "UPDATE documents SET access_count = access_count + 1, last_accessed = $2 \
             WHERE id = $1",
        )
        .bind(id)
        .bind(accessed_at)
        .execute(exec)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to increment access count", e)
        })?;
        Ok(result.rows_affected() > 0)
    }
}
