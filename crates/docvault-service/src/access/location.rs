//! Coarse location lookup for access log entries.

use std::fmt::Debug;

/// Label stored when no location can be determined.
pub const UNKNOWN_LOCATION: &str = "Unknown";

/// Maps an origin address to a coarse, human-readable location label.
pub trait LocationResolver: Send + Sync + Debug {
    /// Resolve `ip_address` to a label such as a city or country.
    fn locate(&self, ip_address: &str) -> String;
}

/// Resolver that always answers [`UNKNOWN_LOCATION`].
#[derive(Debug, Clone, Copy, Default)]
pub struct UnknownLocation;

impl LocationResolver for UnknownLocation {
    fn locate(&self, _ip_address: &str) -> String {
        UNKNOWN_LOCATION.to_string()
    }
}
