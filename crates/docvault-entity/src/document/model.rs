//! Document entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use docvault_core::types::DocumentId;

/// A document held in the vault.
///
/// Documents are created by the upload path; this crate only mutates the
/// access counters and the mirrored share state.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Document {
    /// Unique document identifier.
    pub id: DocumentId,
    /// Display name.
    pub name: String,
    /// Filename as uploaded.
    pub original_name: String,
    /// Size in bytes.
    pub size_bytes: i64,
    /// MIME type.
    pub content_type: String,
    /// When the document was uploaded.
    pub uploaded_at: DateTime<Utc>,
    /// When the document was last viewed or downloaded.
    pub last_accessed: Option<DateTime<Utc>>,
    /// Number of recorded accesses.
    pub access_count: i64,
    /// Whether an active share grant exists.
    pub is_shared: bool,
    /// Public URL of the active share grant.
    pub share_link: Option<String>,
    /// Expiry of the active share grant.
    pub share_expires_at: Option<DateTime<Utc>>,
    /// When the row was last modified.
    pub updated_at: DateTime<Utc>,
}

/// Data required to register a new document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateDocument {
    /// Display name.
    pub name: String,
    /// Filename as uploaded.
    pub original_name: String,
    /// Size in bytes.
    pub size_bytes: i64,
    /// MIME type.
    pub content_type: String,
}

impl CreateDocument {
    /// Build the row an insert of this data produces.
    pub fn into_document(self, id: DocumentId, now: DateTime<Utc>) -> Document {
        Document {
            id,
            name: self.name,
            original_name: self.original_name,
            size_bytes: self.size_bytes,
            content_type: self.content_type,
            uploaded_at: now,
            last_accessed: None,
            access_count: 0,
            is_shared: false,
            share_link: None,
            share_expires_at: None,
            updated_at: now,
        }
    }
}
