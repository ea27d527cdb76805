//! # docvault-auth
//!
//! Credential handling for password-protected share links.
//!
//! ## Modules
//!
//! - `password`: Argon2id hashing with per-grant random salts and the
//!   minimum-length policy for share passwords

pub mod password;

pub use password::{PasswordHasher, PasswordValidator};
