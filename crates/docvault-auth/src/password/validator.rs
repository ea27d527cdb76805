//! Password policy for share links.

use docvault_core::config::ShareConfig;
use docvault_core::error::AppError;

/// Validates share passwords against the configured policy.
#[derive(Debug, Clone)]
pub struct PasswordValidator {
    min_length: usize,
}

impl PasswordValidator {
    /// Creates a new validator from share configuration.
    pub fn new(config: &ShareConfig) -> Self {
        Self::with_min_length(config.password_min_length)
    }

    /// Creates a validator with an explicit minimum length.
    pub fn with_min_length(min_length: usize) -> Self {
        Self {
            min_length: min_length.max(1),
        }
    }

    /// Rejects empty, whitespace-only, and too-short passwords.
    pub fn validate(&self, password: &str) -> Result<(), AppError> {
        if password.trim().is_empty() {
            return Err(AppError::validation("Password must not be empty"));
        }

        if password.chars().count() < self.min_length {
            return Err(AppError::validation(format!(
                "Password must be at least {} characters long",
                self.min_length
            )));
        }

        Ok(())
    }
}
