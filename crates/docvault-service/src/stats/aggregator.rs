//! Access log rollups.

use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

use chrono::{DateTime, Duration, Timelike, Utc};

use docvault_core::config::ShareConfig;
use docvault_core::error::AppError;
use docvault_core::result::AppResult;
use docvault_core::types::DocumentId;
use docvault_database::VaultStore;
use docvault_entity::access::{AccessAction, AccessLog};

use super::model::{AccessOverview, DailyCount, DocumentAccessStats, HourlyCount};

/// Longest window accepted for statistics, in days.
const MAX_WINDOW_DAYS: u32 = 3650;

/// Computes statistics from one snapshot read of the access log.
#[derive(Debug, Clone)]
pub struct StatsAggregator {
    /// Record store.
    store: Arc<dyn VaultStore>,
    /// Cap on `recent_events` in per-document stats.
    recent_events_limit: usize,
}

impl StatsAggregator {
    /// Creates a new aggregator.
    pub fn new(store: Arc<dyn VaultStore>, config: &ShareConfig) -> Self {
        Self {
            store,
            recent_events_limit: config.recent_events_limit,
        }
    }

    /// Totals, per-action counts, and the hour-of-day distribution for
    /// every access in the last `window_days`.
    pub async fn overview(&self, window_days: u32) -> AppResult<AccessOverview> {
        let since = window_start(window_days)?;
        let logs = self.store.access_logs_since(since, None).await?;

        let mut count_by_action: BTreeMap<AccessAction, u64> =
            [(AccessAction::View, 0), (AccessAction::Download, 0)].into();
        let mut hours: BTreeMap<u32, u64> = BTreeMap::new();
        let mut documents = HashSet::new();

        for log in &logs {
            *count_by_action.entry(log.action).or_default() += 1;
            *hours.entry(log.accessed_at.hour()).or_default() += 1;
            documents.insert(log.document_id);
        }

        Ok(AccessOverview {
            window_days,
            since,
            total_accesses: logs.len() as u64,
            unique_documents_accessed: documents.len() as u64,
            count_by_action,
            distribution_by_hour: hours
                .into_iter()
                .map(|(hour, count)| HourlyCount { hour, count })
                .collect(),
        })
    }

    /// Total, most recent events, and per-day counts for one document.
    pub async fn per_document(
        &self,
        document_id: DocumentId,
        window_days: u32,
    ) -> AppResult<DocumentAccessStats> {
        let since = window_start(window_days)?;
        if self.store.find_document(document_id).await?.is_none() {
            return Err(AppError::not_found(format!(
                "Document {document_id} not found"
            )));
        }

        let mut logs = self.store.access_logs_since(since, Some(document_id)).await?;
        sort_newest_first(&mut logs);

        let mut days: BTreeMap<_, u64> = BTreeMap::new();
        for log in &logs {
            *days.entry(log.accessed_at.date_naive()).or_default() += 1;
        }

        let total_accesses = logs.len() as u64;
        logs.truncate(self.recent_events_limit);

        Ok(DocumentAccessStats {
            document_id,
            window_days,
            since,
            total_accesses,
            recent_events: logs,
            daily_counts: days
                .into_iter()
                .rev()
                .map(|(date, count)| DailyCount { date, count })
                .collect(),
        })
    }
}

fn window_start(window_days: u32) -> AppResult<DateTime<Utc>> {
    if window_days == 0 || window_days > MAX_WINDOW_DAYS {
        return Err(AppError::validation(format!(
            "days must be between 1 and {MAX_WINDOW_DAYS}"
        )));
    }
    Ok(Utc::now() - Duration::days(i64::from(window_days)))
}

fn sort_newest_first(logs: &mut [AccessLog]) {
    logs.sort_by(|a, b| {
        b.accessed_at
            .cmp(&a.accessed_at)
            .then_with(|| b.id.cmp(&a.id))
    });
}
