//! Share-link policy configuration.

use serde::{Deserialize, Serialize};

/// Settings for share link creation, resolution, and reporting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShareConfig {
    /// Prefix prepended to link tokens to build the public share URL.
    #[serde(default = "default_public_base_url")]
    pub public_base_url: String,
    /// Minimum length for share passwords.
    #[serde(default = "default_password_min")]
    pub password_min_length: usize,
    /// Default window for the expiring-shares report, in days.
    #[serde(default = "default_expiring_window")]
    pub expiring_window_days: u32,
    /// Default window for access statistics, in days.
    #[serde(default = "default_stats_window")]
    pub stats_window_days: u32,
    /// Number of recent events returned by per-document statistics.
    #[serde(default = "default_recent_events")]
    pub recent_events_limit: usize,
}

impl Default for ShareConfig {
    fn default() -> Self {
        Self {
            public_base_url: default_public_base_url(),
            password_min_length: default_password_min(),
            expiring_window_days: default_expiring_window(),
            stats_window_days: default_stats_window(),
            recent_events_limit: default_recent_events(),
        }
    }
}

fn default_public_base_url() -> String {
    "http://localhost:5173/share".to_string()
}

fn default_password_min() -> usize {
    4
}

fn default_expiring_window() -> u32 {
    7
}

fn default_stats_window() -> u32 {
    30
}

fn default_recent_events() -> usize {
    10
}
