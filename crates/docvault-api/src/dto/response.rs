//! Response DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use docvault_core::types::pagination::PageResponse;
use docvault_core::types::{AccessLogId, DocumentId, ShareId};
use docvault_entity::access::AccessAction;
use docvault_entity::document::Document;
use docvault_entity::share::{ShareGrant, ShareLink};
use docvault_service::OpenedShare;

/// Standard success response wrapper.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T: Serialize> {
    /// Whether the request was successful.
    pub success: bool,
    /// Response data.
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    /// Creates a successful response.
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// A share grant as presented to API clients.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShareResponse {
    /// Grant ID.
    pub id: ShareId,
    /// Shared document.
    pub document_id: DocumentId,
    /// Public URL of the link.
    pub url: String,
    /// Opaque token accepted by `POST /api/s/{token}`.
    pub token: String,
    /// Expiry timestamp.
    pub expires_at: DateTime<Utc>,
    /// Whole calendar days until expiry, negative once past.
    pub days_until_expiry: i64,
    /// Whether downloads are allowed.
    pub allow_download: bool,
    /// Whether a password is required.
    pub require_password: bool,
    /// Access quota.
    pub max_access_count: Option<i32>,
    /// Accesses counted so far.
    pub current_access_count: i32,
    /// Accesses left, if a quota is set.
    pub remaining_accesses: Option<i32>,
    /// Whether the grant is still active.
    pub is_active: bool,
    /// Whether the grant has expired.
    pub is_expired: bool,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl ShareResponse {
    /// Builds the response for `grant` as seen at `now`.
    pub fn new(grant: &ShareGrant, link: &ShareLink, now: DateTime<Utc>) -> Self {
        Self {
            id: grant.id,
            document_id: grant.document_id,
            url: link.url.clone(),
            token: link.token.clone(),
            expires_at: grant.expires_at,
            days_until_expiry: days_until(grant.expires_at, now),
            allow_download: grant.allow_download,
            require_password: grant.require_password,
            max_access_count: grant.max_access_count,
            current_access_count: grant.current_access_count,
            remaining_accesses: grant.remaining_accesses(),
            is_active: grant.is_active,
            is_expired: grant.is_expired_at(now),
            created_at: grant.created_at,
            updated_at: grant.updated_at,
        }
    }
}

/// A share together with its document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShareDetailsResponse {
    /// Share.
    pub share: ShareResponse,
    /// Shared document.
    pub document: Document,
}

/// Share flags returned to a visitor of a public link.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublicShareInfo {
    /// Grant ID.
    pub id: ShareId,
    /// Whether downloads are allowed.
    pub allow_download: bool,
    /// Whether a password is required.
    pub require_password: bool,
    /// Expiry timestamp.
    pub expires_at: DateTime<Utc>,
}

/// Response of a successful public share-link access.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenedShareResponse {
    /// The shared document.
    pub document: Document,
    /// Share flags.
    pub share: PublicShareInfo,
    /// The access log entry written for this visit.
    pub access_id: AccessLogId,
    /// Recorded action.
    pub action: AccessAction,
}

impl From<OpenedShare> for OpenedShareResponse {
    fn from(opened: OpenedShare) -> Self {
        Self {
            share: PublicShareInfo {
                id: opened.grant.id,
                allow_download: opened.grant.allow_download,
                require_password: opened.grant.require_password,
                expires_at: opened.grant.expires_at,
            },
            access_id: opened.access.id,
            action: opened.access.action,
            document: opened.document,
        }
    }
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// `ok` or `degraded`.
    pub status: String,
    /// Active store provider.
    pub store: String,
    /// Whether the store answered its health check.
    pub store_healthy: bool,
    /// Server version.
    pub version: String,
}

/// Re-wrap a page with converted items.
pub fn map_page<T, U, F>(page: PageResponse<T>, f: F) -> PageResponse<U>
where
    T: Serialize,
    U: Serialize,
    F: FnMut(T) -> U,
{
    PageResponse {
        items: page.items.into_iter().map(f).collect(),
        page: page.page,
        page_size: page.page_size,
        total_items: page.total_items,
        total_pages: page.total_pages,
        has_next: page.has_next,
        has_previous: page.has_previous,
    }
}

fn days_until(expires_at: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    (expires_at.date_naive() - now.date_naive()).num_days()
}
