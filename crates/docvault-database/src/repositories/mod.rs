//! Per-table PostgreSQL statements.
//!
//! Repository functions take any [`sqlx::PgExecutor`] so that the same
//! statement runs against the pool or inside an open transaction.

pub mod access_log;
pub mod document;
pub mod share;

pub use access_log::AccessLogRepository;
pub use document::DocumentRepository;
pub use share::ShareGrantRepository;
