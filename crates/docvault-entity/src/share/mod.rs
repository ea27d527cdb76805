//! Share grant domain entities.

pub mod link;
pub mod model;

pub use link::ShareLink;
pub use model::{CreateShareGrant, ShareFilter, ShareGrant, UpdateShareGrant};
