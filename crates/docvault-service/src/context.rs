//! Request context describing the client behind an access.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Fallback used when the transport cannot tell who is calling.
pub const UNKNOWN_CLIENT: &str = "unknown";

/// Who is accessing a document, as seen by the transport layer.
///
/// Built by the HTTP extractor and passed into recording so that every
/// access log row carries its origin.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientContext {
    /// Origin address of the request.
    pub ip_address: String,
    /// User-Agent header value.
    pub user_agent: Option<String>,
    /// When the request was received.
    pub request_time: DateTime<Utc>,
}

impl ClientContext {
    /// Creates a client context stamped with the current time.
    pub fn new(ip_address: impl Into<String>, user_agent: Option<String>) -> Self {
        Self {
            ip_address: ip_address.into(),
            user_agent,
            request_time: Utc::now(),
        }
    }

    /// The User-Agent, or [`UNKNOWN_CLIENT`] when absent.
    pub fn user_agent_or_unknown(&self) -> &str {
        self.user_agent.as_deref().unwrap_or(UNKNOWN_CLIENT)
    }
}

impl Default for ClientContext {
    fn default() -> Self {
        Self::new(UNKNOWN_CLIENT, None)
    }
}
