//! # docvault-service
//!
//! Business logic for DocVault share links. Each service orchestrates the
//! record store, password handling, and link encoding to implement one
//! group of use cases.
//!
//! Services follow constructor injection: all dependencies are provided
//! at construction time via `Arc` references.

pub mod access;
pub mod context;
pub mod share;
pub mod stats;

#[cfg(test)]
pub(crate) mod testing;

pub use access::{AccessRecorder, LocationResolver, UnknownLocation};
pub use context::ClientContext;
pub use share::{
    AccessService, CreateShareInput, CreatedShare, DenialReason, LinkService, OpenedShare,
    Resolution, ResolvedGrant, ShareDetails, ShareLinkManager, UpdateShareInput,
};
pub use stats::{AccessOverview, DocumentAccessStats, StatsAggregator};
