//! Share link token encoding.
//!
//! A token is the grant id's 16 bytes in URL-safe base64 without padding,
//! so links are short, opaque, and map back to exactly one grant.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use uuid::Uuid;

use docvault_core::config::ShareConfig;
use docvault_core::error::AppError;
use docvault_core::result::AppResult;
use docvault_core::types::ShareId;
use docvault_entity::share::{ShareGrant, ShareLink};

/// Builds public share URLs and decodes their tokens.
#[derive(Debug, Clone)]
pub struct LinkService {
    base_url: String,
}

impl LinkService {
    /// Creates a link service from share configuration.
    pub fn new(config: &ShareConfig) -> Self {
        Self::with_base_url(&config.public_base_url)
    }

    /// Creates a link service with an explicit URL prefix.
    pub fn with_base_url(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Encodes a grant id as a link token.
    pub fn token(&self, share_id: ShareId) -> String {
        URL_SAFE_NO_PAD.encode(share_id.as_uuid().as_bytes())
    }

    /// Decodes a link token back into the grant id.
    ///
    /// A malformed token cannot name any grant, so it is reported as
    /// `NotFound` just like a well-formed token for a missing grant.
    pub fn parse_token(&self, token: &str) -> AppResult<ShareId> {
        let bytes = URL_SAFE_NO_PAD
            .decode(token.trim())
            .map_err(|_| AppError::not_found("Share link not found"))?;
        Uuid::from_slice(&bytes)
            .map(ShareId::from_uuid)
            .map_err(|_| AppError::not_found("Share link not found"))
    }

    /// The public URL for a grant.
    pub fn url(&self, share_id: ShareId) -> String {
        format!("{}/{}", self.base_url, self.token(share_id))
    }

    /// The full link description handed back to share creators.
    pub fn link_for(&self, grant: &ShareGrant) -> ShareLink {
        ShareLink {
            share_id: grant.id,
            url: self.url(grant.id),
            token: self.token(grant.id),
            is_password_protected: grant.require_password,
            expires_at: grant.expires_at,
        }
    }
}
