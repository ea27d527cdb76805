//! Request DTOs with validation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use validator::Validate;

use docvault_core::types::pagination::PageRequest;
use docvault_core::types::{DocumentId, ShareId};
use docvault_entity::access::AccessAction;
use docvault_entity::share::ShareFilter;
use docvault_service::{CreateShareInput, UpdateShareInput};

/// Create share request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateShareRequest {
    /// Document to share.
    pub document_id: DocumentId,
    /// Expiry timestamp, must be in the future.
    pub expires_at: DateTime<Utc>,
    /// Whether the link permits downloads (default: true).
    #[serde(default = "default_true")]
    pub allow_download: bool,
    /// Whether the link is password protected.
    #[serde(default)]
    pub require_password: bool,
    /// Plain-text password, required when `require_password` is set.
    #[validate(length(min = 1, message = "Password must not be empty"))]
    pub password: Option<String>,
    /// Access quota; absent means unlimited.
    #[validate(range(min = 1, message = "max_access_count must be at least 1"))]
    pub max_access_count: Option<i32>,
}

impl CreateShareRequest {
    /// Converts into the service input.
    pub fn into_input(self) -> CreateShareInput {
        CreateShareInput {
            document_id: self.document_id,
            expires_at: self.expires_at,
            allow_download: self.allow_download,
            require_password: self.require_password,
            password: self.password,
            max_access_count: self.max_access_count,
        }
    }
}

/// Update share request body. Absent fields are left unchanged; an explicit
/// `null` for `max_access_count` removes the quota.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateShareRequest {
    /// New expiry.
    pub expires_at: Option<DateTime<Utc>>,
    /// New download flag.
    pub allow_download: Option<bool>,
    /// New quota.
    #[serde(default, deserialize_with = "double_option")]
    pub max_access_count: Option<Option<i32>>,
    /// Turn password protection on or off.
    pub require_password: Option<bool>,
    /// New password.
    #[validate(length(min = 1, message = "Password must not be empty"))]
    pub password: Option<String>,
}

impl UpdateShareRequest {
    /// Converts into the service input.
    pub fn into_input(self) -> UpdateShareInput {
        UpdateShareInput {
            expires_at: self.expires_at,
            allow_download: self.allow_download,
            max_access_count: self.max_access_count,
            require_password: self.require_password,
            password: self.password,
        }
    }
}

/// Body of a public share-link access.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OpenShareRequest {
    /// Share password, if the link is protected.
    pub password: Option<String>,
    /// What the visitor is doing (default: view).
    #[serde(default)]
    pub action: Option<AccessAction>,
}

/// Direct access recording request body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordAccessRequest {
    /// Accessed document.
    pub document_id: DocumentId,
    /// Share link the access came through, if any.
    pub share_id: Option<ShareId>,
    /// Access kind.
    pub action: AccessAction,
}

/// Query parameters for `GET /api/shares`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ShareListQuery {
    /// `active`, `inactive`, or `all` (default: active).
    #[serde(default)]
    pub filter: ShareFilter,
}

/// Query parameters for `GET /api/access-logs`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AccessLogQuery {
    /// Restrict to one document.
    pub document_id: Option<DocumentId>,
}

/// Reporting window in days.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct WindowQuery {
    /// Window size; the configured default applies when absent.
    pub days: Option<u32>,
}

/// Query parameters for paginated endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginationParams {
    /// Page number (1-based, default: 1).
    #[serde(default = "default_page")]
    pub page: u64,
    /// Items per page (default: 25, max: 100).
    #[serde(default = "default_per_page")]
    pub per_page: u64,
}

impl PaginationParams {
    /// Converts to a `PageRequest`.
    pub fn into_page_request(self) -> PageRequest {
        PageRequest::new(self.page, self.per_page)
    }
}

fn default_page() -> u64 {
    1
}

fn default_per_page() -> u64 {
    25
}

fn default_true() -> bool {
    true
}

/// Distinguishes an absent field (`None`) from an explicit `null`
/// (`Some(None)`).
fn double_option<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
