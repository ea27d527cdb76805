//! Access log entities.

pub mod model;

pub use model::{AccessAction, AccessLog, AccessLogEntry, CreateAccessLog};
