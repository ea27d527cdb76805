//! Access log entity model.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use docvault_core::types::{AccessLogId, DocumentId, ShareId};

/// What a visitor did with a document.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, sqlx::Type,
)]
#[sqlx(type_name = "access_action", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum AccessAction {
    /// The document was opened for viewing.
    View,
    /// The document bytes were downloaded.
    Download,
}

impl fmt::Display for AccessAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::View => write!(f, "view"),
            Self::Download => write!(f, "download"),
        }
    }
}

impl FromStr for AccessAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "view" => Ok(Self::View),
            "download" => Ok(Self::Download),
            other => Err(format!("Invalid access action: {other}")),
        }
    }
}

/// An immutable record of one access to a document.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct AccessLog {
    /// Unique entry identifier.
    pub id: AccessLogId,
    /// The accessed document.
    pub document_id: DocumentId,
    /// The share grant that authorized the access, if any.
    pub share_id: Option<ShareId>,
    /// View or download.
    pub action: AccessAction,
    /// When the access happened.
    pub accessed_at: DateTime<Utc>,
    /// Origin address of the request.
    pub ip_address: String,
    /// Client User-Agent string.
    pub user_agent: String,
    /// Coarse location label.
    pub location: String,
}

/// An access log entry joined with the name of its document, as listed
/// to operators.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct AccessLogEntry {
    /// The log row.
    #[serde(flatten)]
    #[sqlx(flatten)]
    pub log: AccessLog,
    /// Display name of the accessed document.
    pub document_name: String,
    /// Original file name of the accessed document.
    pub original_name: String,
}

/// Data required to append an access log entry.
#[derive(Debug, Clone)]
pub struct CreateAccessLog {
    /// Pre-generated entry id.
    pub id: AccessLogId,
    /// The accessed document.
    pub document_id: DocumentId,
    /// The authorizing grant, if any.
    pub share_id: Option<ShareId>,
    /// View or download.
    pub action: AccessAction,
    /// Event timestamp; also becomes the document's `last_accessed`.
    pub accessed_at: DateTime<Utc>,
    /// Origin address.
    pub ip_address: String,
    /// Client User-Agent.
    pub user_agent: String,
    /// Coarse location label.
    pub location: String,
}

impl CreateAccessLog {
    /// Build the row an insert of this data produces.
    pub fn into_log(self) -> AccessLog {
        AccessLog {
            id: self.id,
            document_id: self.document_id,
            share_id: self.share_id,
            action: self.action,
            accessed_at: self.accessed_at,
            ip_address: self.ip_address,
            user_agent: self.user_agent,
            location: self.location,
        }
    }
}
