//! Share management: create, resolve, and open shared documents.

pub mod access;
pub mod link;
pub mod manager;
pub mod resolution;

pub use access::{AccessService, OpenedShare};
pub use link::LinkService;
pub use manager::{CreateShareInput, CreatedShare, ShareDetails, ShareLinkManager, UpdateShareInput};
pub use resolution::{DenialReason, Resolution, ResolvedGrant};
