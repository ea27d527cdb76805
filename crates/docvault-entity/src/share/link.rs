//! Share link value object.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use docvault_core::types::ShareId;

/// A generated share link for external access.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShareLink {
    /// The grant backing this link.
    pub share_id: ShareId,
    /// The full URL for accessing the share.
    pub url: String,
    /// The share token embedded in the URL.
    pub token: String,
    /// Whether the link is password-protected.
    pub is_password_protected: bool,
    /// When the link expires.
    pub expires_at: DateTime<Utc>,
}
