//! Public link access: resolve a token, enforce download permission, and
//! record the access.

use std::sync::Arc;

use tracing::debug;

use docvault_core::error::{AppError, ErrorKind};
use docvault_core::result::AppResult;
use docvault_entity::access::{AccessAction, AccessLog};
use docvault_entity::document::Document;
use docvault_entity::share::ShareGrant;

use super::manager::ShareLinkManager;
use crate::access::AccessRecorder;
use crate::context::ClientContext;

/// What a visitor gets back after opening a share link.
#[derive(Debug, Clone)]
pub struct OpenedShare {
    /// The shared document, before this visit was counted.
    pub document: Document,
    /// The grant as it was when resolved, before this visit was counted.
    pub grant: ShareGrant,
    /// The access log entry written for this visit.
    pub access: AccessLog,
}

/// Handles inbound share link visits.
#[derive(Debug, Clone)]
pub struct AccessService {
    /// Share manager for resolution.
    manager: Arc<ShareLinkManager>,
    /// Recorder for the resulting access.
    recorder: Arc<AccessRecorder>,
}

impl AccessService {
    /// Creates a new access service.
    pub fn new(manager: Arc<ShareLinkManager>, recorder: Arc<AccessRecorder>) -> Self {
        Self { manager, recorder }
    }

    /// Open a share link.
    ///
    /// Denials surface as errors of the matching kind. A download through
    /// a view-only grant fails with `DownloadNotAllowed` and is not
    /// recorded.
    pub async fn open(
        &self,
        token: &str,
        password: Option<&str>,
        action: AccessAction,
        client: &ClientContext,
    ) -> AppResult<OpenedShare> {
        let share_id = self.manager.links().parse_token(token)?;
        let resolved = self.manager.resolve(share_id, password).await?.into_result()?;

        if action == AccessAction::Download && !resolved.allows_download() {
            debug!(share_id = %share_id, "Download refused by view-only share");
            return Err(AppError::new(
                ErrorKind::DownloadNotAllowed,
                "This share link does not allow downloads",
            ));
        }

        let access = self
            .recorder
            .record(resolved.document.id, Some(share_id), action, client)
            .await?;

        Ok(OpenedShare {
            document: resolved.document,
            grant: resolved.grant,
            access,
        })
    }
}
