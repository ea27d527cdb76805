//! Share grant entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use docvault_core::types::{DocumentId, ShareId};

/// The authorization record backing one share link.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ShareGrant {
    /// Unique grant identifier.
    pub id: ShareId,
    /// The shared document.
    pub document_id: DocumentId,
    /// The grant is unusable at and after this instant.
    pub expires_at: DateTime<Utc>,
    /// Whether the file may be downloaded, not just viewed.
    pub allow_download: bool,
    /// Whether a password must be supplied on access.
    pub require_password: bool,
    /// Argon2 PHC string for password-protected grants.
    #[serde(skip_serializing)]
    pub password_hash: Option<String>,
    /// Maximum number of recorded accesses (None = unlimited).
    pub max_access_count: Option<i32>,
    /// Number of recorded accesses so far.
    pub current_access_count: i32,
    /// Cleared when the grant is revoked or replaced.
    pub is_active: bool,
    /// When the grant was created.
    pub created_at: DateTime<Utc>,
    /// When the grant was last modified.
    pub updated_at: DateTime<Utc>,
}

impl ShareGrant {
    /// Whether the grant has expired at `now`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    /// Whether the access quota has been used up.
    pub fn quota_exhausted(&self) -> bool {
        self.max_access_count
            .is_some_and(|max| self.current_access_count >= max)
    }

    /// Accesses left before the quota is exhausted, if a quota is set.
    pub fn remaining_accesses(&self) -> Option<i32> {
        self.max_access_count
            .map(|max| (max - self.current_access_count).max(0))
    }

    /// Active, unexpired, and within quota.
    pub fn is_usable_at(&self, now: DateTime<Utc>) -> bool {
        self.is_active && !self.is_expired_at(now) && !self.quota_exhausted()
    }
}

/// Data required to create a new share grant.
#[derive(Debug, Clone)]
pub struct CreateShareGrant {
    /// Pre-generated grant id; the share link is derived from it.
    pub id: ShareId,
    /// The shared document.
    pub document_id: DocumentId,
    /// Expiry instant.
    pub expires_at: DateTime<Utc>,
    /// Allow downloads.
    pub allow_download: bool,
    /// Require a password.
    pub require_password: bool,
    /// Argon2 hash of the password.
    pub password_hash: Option<String>,
    /// Max accesses (None = unlimited).
    pub max_access_count: Option<i32>,
    /// Public URL mirrored onto the document.
    pub share_link: String,
}

impl CreateShareGrant {
    /// Build the row an insert of this data produces.
    pub fn into_grant(self, now: DateTime<Utc>) -> ShareGrant {
        ShareGrant {
            id: self.id,
            document_id: self.document_id,
            expires_at: self.expires_at,
            allow_download: self.allow_download,
            require_password: self.require_password,
            password_hash: self.password_hash,
            max_access_count: self.max_access_count,
            current_access_count: 0,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Partial update of a share grant. `None` leaves a field unchanged.
#[derive(Debug, Clone, Default)]
pub struct UpdateShareGrant {
    /// New expiry.
    pub expires_at: Option<DateTime<Utc>>,
    /// New download permission.
    pub allow_download: Option<bool>,
    /// New quota; `Some(None)` removes the limit.
    pub max_access_count: Option<Option<i32>>,
    /// New password requirement.
    pub require_password: Option<bool>,
    /// New password hash; `Some(None)` clears it.
    pub password_hash: Option<Option<String>>,
}

impl UpdateShareGrant {
    /// Whether the update changes nothing.
    pub fn is_empty(&self) -> bool {
        self.expires_at.is_none()
            && self.allow_download.is_none()
            && self.max_access_count.is_none()
            && self.require_password.is_none()
            && self.password_hash.is_none()
    }

    /// Apply the update to an in-memory grant.
    pub fn apply(&self, grant: &mut ShareGrant, now: DateTime<Utc>) {
        if let Some(expires_at) = self.expires_at {
            grant.expires_at = expires_at;
        }
        if let Some(allow_download) = self.allow_download {
            grant.allow_download = allow_download;
        }
        if let Some(max) = self.max_access_count {
            grant.max_access_count = max;
        }
        if let Some(require_password) = self.require_password {
            grant.require_password = require_password;
        }
        if let Some(ref hash) = self.password_hash {
            grant.password_hash = hash.clone();
        }
        grant.updated_at = now;
    }
}

/// Filter for share listings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShareFilter {
    /// Active and not yet expired.
    #[default]
    Active,
    /// Revoked, replaced, or expired.
    Inactive,
    /// Every grant.
    All,
}

impl ShareFilter {
    /// Whether `grant` belongs in a listing with this filter at `now`.
    pub fn matches(&self, grant: &ShareGrant, now: DateTime<Utc>) -> bool {
        let live = grant.is_active && !grant.is_expired_at(now);
        match self {
            Self::Active => live,
            Self::Inactive => !live,
            Self::All => true,
        }
    }
}
