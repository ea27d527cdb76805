//! Share grant repository implementation.

use chrono::{DateTime, Utc};
use sqlx::{PgExecutor, Postgres, QueryBuilder};

use docvault_core::error::{AppError, ErrorKind};
use docvault_core::result::AppResult;
use docvault_core::types::pagination::PageRequest;
use docvault_core::types::{DocumentId, ShareId};
use docvault_entity::share::{CreateShareGrant, ShareFilter, ShareGrant, UpdateShareGrant};

use crate::store::GrantCounter;

/// Statements over the `share_grants` table.
#[derive(Debug, Clone, Copy)]
pub struct ShareGrantRepository;

impl ShareGrantRepository {
    /// Find a grant by ID.
    pub async fn find_by_id<'e>(
        exec: impl PgExecutor<'e>,
        id: ShareId,
    ) -> AppResult<Option<ShareGrant>> {
        sqlx::query_as::<_, ShareGrant>("SELECT * FROM share_grants WHERE id = $1")
            .bind(id)
            .fetch_optional(exec)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find share", e))
    }

    /// Find a grant and lock its row until the transaction ends.
    pub async fn find_for_update<'e>(
        exec: impl PgExecutor<'e>,
        id: ShareId,
    ) -> AppResult<Option<ShareGrant>> {
        sqlx::query_as::<_, ShareGrant>("SELECT * FROM share_grants WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(exec)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to lock share", e))
    }

    /// Insert a new active grant.
    pub async fn insert<'e>(
        exec: impl PgExecutor<'e>,
        data: &CreateShareGrant,
        now: DateTime<Utc>,
    ) -> AppResult<ShareGrant> {
        sqlx::query_as::<_, ShareGrant>(
            "INSERT INTO share_grants (id, document_id, expires_at, allow_download, \
             require_password, password_hash, max_access_count, current_access_count, \
             is_active, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, 0, TRUE, $8, $8) RETURNING *",
        )
        .bind(data.id)
        .bind(data.document_id)
        .bind(data.expires_at)
        .bind(data.allow_download)
        .bind(data.require_password)
        .bind(&data.password_hash)
        .bind(data.max_access_count)
        .bind(now)
        .fetch_one(exec)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to create share", e))
    }

    /// Deactivate whatever grant is currently active for a document.
    pub async fn deactivate_for_document<'e>(
        exec: impl PgExecutor<'e>,
        document_id: DocumentId,
        now: DateTime<Utc>,
    ) -> AppResult<u64> {
        let result = sqlx::query(
            "UPDATE share_grants SET is_active = FALSE, updated_at = $2 \
             WHERE document_id = $1 AND is_active",
        )
        .bind(document_id)
        .bind(now)
        .execute(exec)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to deactivate previous share", e)
        })?;
        Ok(result.rows_affected())
    }

    /// Deactivate a single grant.
    pub async fn deactivate<'e>(
        exec: impl PgExecutor<'e>,
        id: ShareId,
        now: DateTime<Utc>,
    ) -> AppResult<bool> {
        let result = sqlx::query(
            "UPDATE share_grants SET is_active = FALSE, updated_at = $2 \
             WHERE id = $1 AND is_active",
        )
        .bind(id)
        .bind(now)
        .execute(exec)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to deactivate share", e))?;
        Ok(result.rows_affected() > 0)
    }

    /// Write every updatable column of `grant` after applying `update` to it.
    pub async fn update<'e>(
        exec: impl PgExecutor<'e>,
        grant: &ShareGrant,
        update: &UpdateShareGrant,
        now: DateTime<Utc>,
    ) -> AppResult<ShareGrant> {
        let mut next = grant.clone();
        update.apply(&mut next, now);

        sqlx::query_as::<_, ShareGrant>(
            "UPDATE share_grants SET expires_at = $2, allow_download = $3, \
             require_password = $4, password_hash = $5, max_access_count = $6, updated_at = $7 \
             WHERE id = $1 RETURNING *",
        )
        .bind(next.id)
        .bind(next.expires_at)
        .bind(next.allow_download)
        .bind(next.require_password)
        .bind(&next.password_hash)
        .bind(next.max_access_count)
        .bind(next.updated_at)
        .fetch_one(exec)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to update share", e))
    }

    /// Increment the access counter iff the quota allows it.
    ///
    /// The check and the write are one statement, so concurrent callers can
    /// never push the counter past `max_access_count`. A missing grant also
    /// comes back as [`GrantCounter::QuotaFull`]; callers that care check
    /// [`Self::exists`].
    pub async fn try_increment<'e>(
        exec: impl PgExecutor<'e>,
        id: ShareId,
        now: DateTime<Utc>,
    ) -> AppResult<GrantCounter> {
        let row: Option<(i32,)> = sqlx::query_as(
            "UPDATE share_grants \
             SET current_access_count = current_access_count + 1, updated_at = $2 \
             WHERE id = $1 \
               AND (max_access_count IS NULL OR current_access_count < max_access_count) \
             RETURNING current_access_count",
        )
        .bind(id)
        .bind(now)
        .fetch_optional(exec)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to increment share counter", e)
        })?;

        Ok(match row {
            Some((count,)) => GrantCounter::Incremented(count),
            None => GrantCounter::QuotaFull,
        })
    }

    /// Whether a grant row exists.
    pub async fn exists<'e>(exec: impl PgExecutor<'e>, id: ShareId) -> AppResult<bool> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM share_grants WHERE id = $1)")
            .bind(id)
            .fetch_one(exec)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to check share", e))
    }

    /// Count grants matching a listing filter.
    pub async fn count<'e>(
        exec: impl PgExecutor<'e>,
        filter: ShareFilter,
        now: DateTime<Utc>,
    ) -> AppResult<u64> {
        let mut qb = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM share_grants");
        push_filter(&mut qb, filter, now);
        let total: i64 = qb
            .build_query_scalar::<i64>()
            .fetch_one(exec)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to count shares", e))?;
        Ok(total as u64)
    }

    /// One page of grants matching a listing filter, newest first.
    pub async fn list<'e>(
        exec: impl PgExecutor<'e>,
        filter: ShareFilter,
        now: DateTime<Utc>,
        page: &PageRequest,
    ) -> AppResult<Vec<ShareGrant>> {
        let mut qb = QueryBuilder::<Postgres>::new("SELECT * FROM share_grants");
        push_filter(&mut qb, filter, now);
        qb.push(" ORDER BY created_at DESC, id DESC LIMIT ")
            .push_bind(page.limit() as i64)
            .push(" OFFSET ")
            .push_bind(page.offset() as i64);

        qb.build_query_as::<ShareGrant>()
            .fetch_all(exec)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list shares", e))
    }

    /// Active grants expiring in `(now, until]`, soonest first.
    pub async fn find_expiring<'e>(
        exec: impl PgExecutor<'e>,
        now: DateTime<Utc>,
        until: DateTime<Utc>,
    ) -> AppResult<Vec<ShareGrant>> {
        sqlx::query_as::<_, ShareGrant>(
            "SELECT * FROM share_grants \
             WHERE is_active AND expires_at > $1 AND expires_at <= $2 \
             ORDER BY expires_at ASC",
        )
        .bind(now)
        .bind(until)
        .fetch_all(exec)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to find expiring shares", e)
        })
    }
}

fn push_filter(qb: &mut QueryBuilder<'_, Postgres>, filter: ShareFilter, now: DateTime<Utc>) {
    match filter {
        ShareFilter::Active => {
            qb.push(" WHERE is_active AND expires_at > ").push_bind(now);
        }
        ShareFilter::Inactive => {
            qb.push(" WHERE NOT (is_active AND expires_at > ")
                .push_bind(now)
                .push(")");
        }
        ShareFilter::All => {}
    }
}
