//! HTTP API layer for DocVault.
//!
//! Exposes share management, public share-link access, access logs, and
//! access statistics as JSON endpoints under `/api`.

pub mod app;
pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use app::{build_app, run_server};
pub use error::ApiError;
pub use state::AppState;
