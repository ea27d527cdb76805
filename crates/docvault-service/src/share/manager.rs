//! Share grant lifecycle: create, update, revoke, and resolve.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tracing::{debug, info};

use docvault_auth::password::{PasswordHasher, PasswordValidator};
use docvault_core::config::ShareConfig;
use docvault_core::error::AppError;
use docvault_core::result::AppResult;
use docvault_core::types::pagination::{PageRequest, PageResponse};
use docvault_core::types::{DocumentId, ShareId};
use docvault_database::VaultStore;
use docvault_entity::document::Document;
use docvault_entity::share::{
    CreateShareGrant, ShareFilter, ShareGrant, ShareLink, UpdateShareGrant,
};

use super::link::LinkService;
use super::resolution::{DenialReason, Resolution, ResolvedGrant};

/// Input for [`ShareLinkManager::create`].
#[derive(Debug, Clone)]
pub struct CreateShareInput {
    /// Document to share.
    pub document_id: DocumentId,
    /// Expiry; must be in the future.
    pub expires_at: DateTime<Utc>,
    /// Whether downloads are permitted.
    pub allow_download: bool,
    /// Whether a password is required on access.
    pub require_password: bool,
    /// Plaintext password; required when `require_password` is set.
    pub password: Option<String>,
    /// Access quota (None = unlimited, otherwise at least 1).
    pub max_access_count: Option<i32>,
}

/// Input for [`ShareLinkManager::update`]. `None` leaves a field unchanged.
#[derive(Debug, Clone, Default)]
pub struct UpdateShareInput {
    /// New expiry; must be in the future.
    pub expires_at: Option<DateTime<Utc>>,
    /// New download permission.
    pub allow_download: Option<bool>,
    /// New quota; `Some(None)` removes the limit.
    pub max_access_count: Option<Option<i32>>,
    /// Turn password protection on or off.
    pub require_password: Option<bool>,
    /// Replacement password.
    pub password: Option<String>,
}

/// A freshly created grant and the link that points at it.
#[derive(Debug, Clone)]
pub struct CreatedShare {
    /// The persisted grant.
    pub grant: ShareGrant,
    /// Public link for the grant.
    pub link: ShareLink,
}

/// A grant together with the document it shares.
#[derive(Debug, Clone)]
pub struct ShareDetails {
    /// The grant.
    pub grant: ShareGrant,
    /// The shared document.
    pub document: Document,
}

/// Creates, revokes, and resolves share grants.
#[derive(Debug, Clone)]
pub struct ShareLinkManager {
    /// Record store.
    store: Arc<dyn VaultStore>,
    /// Link token encoding.
    links: Arc<LinkService>,
    /// Password hasher for protected grants.
    hasher: Arc<PasswordHasher>,
    /// Password policy.
    validator: PasswordValidator,
}

impl ShareLinkManager {
    /// Creates a new share link manager.
    pub fn new(
        store: Arc<dyn VaultStore>,
        links: Arc<LinkService>,
        hasher: Arc<PasswordHasher>,
        config: &ShareConfig,
    ) -> Self {
        Self {
            store,
            links,
            hasher,
            validator: PasswordValidator::new(config),
        }
    }

    /// The link service used to build share URLs.
    pub fn links(&self) -> &LinkService {
        &self.links
    }

    /// Create a grant for a document, replacing any active one.
    pub async fn create(&self, input: CreateShareInput) -> AppResult<CreatedShare> {
        let now = Utc::now();
        if input.expires_at <= now {
            return Err(AppError::validation("Expiry must be in the future"));
        }
        check_quota(input.max_access_count)?;

        let password_hash = if input.require_password {
            let password = input.password.as_deref().ok_or_else(|| {
                AppError::validation("A password is required when require_password is set")
            })?;
            self.validator.validate(password)?;
            Some(self.hasher.hash_password(password)?)
        } else {
            None
        };

        let id = ShareId::new();
        let grant = self
            .store
            .create_grant(CreateShareGrant {
                id,
                document_id: input.document_id,
                expires_at: input.expires_at,
                allow_download: input.allow_download,
                require_password: input.require_password,
                password_hash,
                max_access_count: input.max_access_count,
                share_link: self.links.url(id),
            })
            .await?;

        info!(
            share_id = %grant.id,
            document_id = %grant.document_id,
            expires_at = %grant.expires_at,
            max_access_count = ?grant.max_access_count,
            require_password = grant.require_password,
            "Share created"
        );

        let link = self.links.link_for(&grant);
        Ok(CreatedShare { grant, link })
    }

    /// Deactivate a grant. Revoking an inactive grant succeeds without
    /// changing anything.
    pub async fn revoke(&self, share_id: ShareId) -> AppResult<()> {
        if self.store.deactivate_grant(share_id).await? {
            info!(share_id = %share_id, "Share revoked");
        } else {
            debug!(share_id = %share_id, "Share already inactive");
        }
        Ok(())
    }

    /// Check an access attempt against a grant without touching counters.
    ///
    /// Order: existence, active, expiry, quota, password.
    pub async fn resolve(
        &self,
        share_id: ShareId,
        password: Option<&str>,
    ) -> AppResult<Resolution> {
        let now = Utc::now();

        let Some(grant) = self.store.find_grant(share_id).await? else {
            return Ok(deny(share_id, DenialReason::NotFound));
        };
        if !grant.is_active {
            return Ok(deny(share_id, DenialReason::Revoked));
        }
        if grant.is_expired_at(now) {
            return Ok(deny(share_id, DenialReason::Expired));
        }
        if grant.quota_exhausted() {
            return Ok(deny(share_id, DenialReason::QuotaExceeded));
        }
        if grant.require_password {
            let Some(password) = password.filter(|p| !p.is_empty()) else {
                return Ok(deny(share_id, DenialReason::PasswordRequired));
            };
            let hash = grant.password_hash.as_deref().ok_or_else(|| {
                AppError::internal(format!("Share {share_id} requires a password but has no hash"))
            })?;
            if !self.hasher.verify_password(password, hash)? {
                return Ok(deny(share_id, DenialReason::PasswordMismatch));
            }
        }

        let Some(document) = self.store.find_document(grant.document_id).await? else {
            return Ok(deny(share_id, DenialReason::NotFound));
        };

        Ok(Resolution::Granted(ResolvedGrant { grant, document }))
    }

    /// Active grants expiring within `within_days`, soonest first.
    pub async fn expiring_soon(&self, within_days: u32) -> AppResult<Vec<ShareGrant>> {
        if within_days == 0 {
            return Err(AppError::validation("days must be at least 1"));
        }
        let now = Utc::now();
        let until = now + Duration::days(i64::from(within_days));
        self.store.find_expiring_grants(now, until).await
    }

    /// List grants, newest first.
    pub async fn list(
        &self,
        filter: ShareFilter,
        page: &PageRequest,
    ) -> AppResult<PageResponse<ShareGrant>> {
        self.store.list_grants(filter, Utc::now(), page).await
    }

    /// Get a grant and its document.
    pub async fn get(&self, share_id: ShareId) -> AppResult<ShareDetails> {
        let grant = self
            .store
            .find_grant(share_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Share {share_id} not found")))?;
        let document = self
            .store
            .find_document(grant.document_id)
            .await?
            .ok_or_else(|| {
                AppError::not_found(format!("Document {} not found", grant.document_id))
            })?;
        Ok(ShareDetails { grant, document })
    }

    /// Change an active grant's expiry, download flag, quota, or password.
    pub async fn update(&self, share_id: ShareId, input: UpdateShareInput) -> AppResult<ShareGrant> {
        if let Some(expires_at) = input.expires_at {
            if expires_at <= Utc::now() {
                return Err(AppError::validation("Expiry must be in the future"));
            }
        }
        if let Some(max) = input.max_access_count {
            check_quota(max)?;
        }

        let (require_password, password_hash) = match (input.password.as_deref(), input.require_password) {
            (Some(_), Some(false)) => {
                return Err(AppError::validation(
                    "A password cannot be set while disabling password protection",
                ));
            }
            (Some(password), _) => {
                self.validator.validate(password)?;
                (Some(true), Some(Some(self.hasher.hash_password(password)?)))
            }
            (None, Some(false)) => (Some(false), Some(None)),
            (None, other) => (other, None),
        };

        let update = UpdateShareGrant {
            expires_at: input.expires_at,
            allow_download: input.allow_download,
            max_access_count: input.max_access_count,
            require_password,
            password_hash,
        };
        if update.is_empty() {
            return Err(AppError::validation("No fields to update"));
        }

        let grant = self.store.update_grant(share_id, update).await?;
        info!(share_id = %share_id, "Share updated");
        Ok(grant)
    }
}

fn check_quota(max_access_count: Option<i32>) -> AppResult<()> {
    match max_access_count {
        Some(max) if max < 1 => Err(AppError::validation(
            "max_access_count must be at least 1",
        )),
        _ => Ok(()),
    }
}

fn deny(share_id: ShareId, reason: DenialReason) -> Resolution {
    debug!(share_id = %share_id, reason = ?reason, "Share access denied");
    Resolution::Denied(reason)
}
