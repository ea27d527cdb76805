//! Access recording.

pub mod location;
pub mod recorder;

pub use location::{LocationResolver, UnknownLocation};
pub use recorder::AccessRecorder;
