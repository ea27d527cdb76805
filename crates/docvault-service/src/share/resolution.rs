//! Outcome of resolving an access attempt against a share grant.

use std::fmt;

use serde::{Deserialize, Serialize};

use docvault_core::error::{AppError, ErrorKind};
use docvault_entity::document::Document;
use docvault_entity::share::ShareGrant;

/// Why a grant refused access. Checks run in declaration order and the
/// first failing one wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DenialReason {
    /// No grant with that id exists.
    NotFound,
    /// The grant was revoked or replaced.
    Revoked,
    /// The grant is past its expiry.
    Expired,
    /// The grant has used up its access quota.
    QuotaExceeded,
    /// A password is required and none was supplied.
    PasswordRequired,
    /// The supplied password does not match.
    PasswordMismatch,
}

impl DenialReason {
    /// The error kind this denial surfaces as.
    pub fn kind(self) -> ErrorKind {
        match self {
            Self::NotFound => ErrorKind::NotFound,
            Self::Revoked => ErrorKind::Revoked,
            Self::Expired => ErrorKind::Expired,
            Self::QuotaExceeded => ErrorKind::QuotaExceeded,
            Self::PasswordRequired => ErrorKind::PasswordRequired,
            Self::PasswordMismatch => ErrorKind::PasswordMismatch,
        }
    }

    /// Convert the denial into an error for transport layers.
    pub fn into_error(self) -> AppError {
        AppError::new(self.kind(), self.to_string())
    }
}

impl fmt::Display for DenialReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let message = match self {
            Self::NotFound => "Share link not found",
            Self::Revoked => "Share link has been revoked",
            Self::Expired => "Share link has expired",
            Self::QuotaExceeded => "Share link has reached its access limit",
            Self::PasswordRequired => "Share link requires a password",
            Self::PasswordMismatch => "Incorrect share password",
        };
        f.write_str(message)
    }
}

/// A grant that passed every check, together with its document.
#[derive(Debug, Clone)]
pub struct ResolvedGrant {
    /// The grant as read during resolution.
    pub grant: ShareGrant,
    /// The shared document.
    pub document: Document,
}

impl ResolvedGrant {
    /// Whether the file transport may serve the document bytes.
    pub fn allows_download(&self) -> bool {
        self.grant.allow_download
    }
}

/// Result of [`ShareLinkManager::resolve`](super::ShareLinkManager::resolve).
#[derive(Debug, Clone)]
pub enum Resolution {
    /// Access may proceed.
    Granted(ResolvedGrant),
    /// Access is refused.
    Denied(DenialReason),
}

impl Resolution {
    /// Whether access was granted.
    pub fn is_granted(&self) -> bool {
        matches!(self, Self::Granted(_))
    }

    /// The denial reason, if any.
    pub fn denial(&self) -> Option<DenialReason> {
        match self {
            Self::Granted(_) => None,
            Self::Denied(reason) => Some(*reason),
        }
    }

    /// Turn a denial into an error, keeping the granted value.
    pub fn into_result(self) -> Result<ResolvedGrant, AppError> {
        match self {
            Self::Granted(resolved) => Ok(resolved),
            Self::Denied(reason) => Err(reason.into_error()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_denials_map_to_denial_kinds() {
        for reason in [
            DenialReason::NotFound,
            DenialReason::Revoked,
            DenialReason::Expired,
            DenialReason::QuotaExceeded,
            DenialReason::PasswordRequired,
            DenialReason::PasswordMismatch,
        ] {
            let err = reason.into_error();
            assert!(err.kind.is_denial());
            assert_eq!(err.message, reason.to_string());
        }
    }

    #[test]
    fn test_denied_into_result() {
        let err = Resolution::Denied(DenialReason::Expired)
            .into_result()
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Expired);
    }
}
