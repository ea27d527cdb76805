//! Statistics result types.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use docvault_core::types::DocumentId;
use docvault_entity::access::{AccessAction, AccessLog};

/// Accesses in one hour of the day (UTC).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HourlyCount {
    /// Hour of day, 0 through 23.
    pub hour: u32,
    /// Accesses in that hour across the window.
    pub count: u64,
}

/// Accesses on one calendar day (UTC).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyCount {
    /// The day.
    pub date: NaiveDate,
    /// Accesses on that day.
    pub count: u64,
}

/// Global rollup over a time window.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessOverview {
    /// Window length in days.
    pub window_days: u32,
    /// Start of the window.
    pub since: DateTime<Utc>,
    /// Accesses in the window.
    pub total_accesses: u64,
    /// Distinct documents accessed in the window.
    pub unique_documents_accessed: u64,
    /// Accesses per action; every action is present.
    pub count_by_action: BTreeMap<AccessAction, u64>,
    /// Hours with at least one access, ascending.
    pub distribution_by_hour: Vec<HourlyCount>,
}

/// Rollup for one document over a time window.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentAccessStats {
    /// The document.
    pub document_id: DocumentId,
    /// Window length in days.
    pub window_days: u32,
    /// Start of the window.
    pub since: DateTime<Utc>,
    /// Accesses in the window.
    pub total_accesses: u64,
    /// Most recent entries first, bounded by the configured limit.
    pub recent_events: Vec<AccessLog>,
    /// Per-day counts, newest day first.
    pub daily_counts: Vec<DailyCount>,
}
