//! Read-only access statistics.

pub mod aggregator;
pub mod model;

pub use aggregator::StatsAggregator;
pub use model::{AccessOverview, DailyCount, DocumentAccessStats, HourlyCount};
