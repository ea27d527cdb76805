//! Fixtures shared by the service unit tests.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};

use docvault_auth::password::PasswordHasher;
use docvault_core::config::ShareConfig;
use docvault_core::types::{AccessLogId, DocumentId, ShareId};
use docvault_database::{MemoryVaultStore, VaultStore};
use docvault_entity::access::{AccessAction, CreateAccessLog};
use docvault_entity::document::{CreateDocument, Document};
use docvault_entity::share::{CreateShareGrant, ShareGrant};

use crate::access::{AccessRecorder, UnknownLocation};
use crate::share::{AccessService, CreateShareInput, LinkService, ShareLinkManager};
use crate::stats::StatsAggregator;

pub(crate) struct Harness {
    pub store: Arc<dyn VaultStore>,
    pub manager: Arc<ShareLinkManager>,
    pub recorder: Arc<AccessRecorder>,
    pub access: AccessService,
    pub stats: StatsAggregator,
    pub hasher: Arc<PasswordHasher>,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_config(ShareConfig::default())
    }

    pub fn with_recent_limit(limit: usize) -> Self {
        Self::with_config(ShareConfig {
            recent_events_limit: limit,
            ..Default::default()
        })
    }

    fn with_config(config: ShareConfig) -> Self {
        let store: Arc<dyn VaultStore> = Arc::new(MemoryVaultStore::new());
        let hasher = Arc::new(PasswordHasher::new());
        let manager = Arc::new(ShareLinkManager::new(
            Arc::clone(&store),
            Arc::new(LinkService::new(&config)),
            Arc::clone(&hasher),
            &config,
        ));
        let recorder = Arc::new(AccessRecorder::new(
            Arc::clone(&store),
            Arc::new(UnknownLocation),
        ));
        Self {
            access: AccessService::new(Arc::clone(&manager), Arc::clone(&recorder)),
            stats: StatsAggregator::new(Arc::clone(&store), &config),
            store,
            manager,
            recorder,
            hasher,
        }
    }

    pub async fn seed_document(&self) -> Document {
        let doc = CreateDocument {
            name: "Contract draft".to_string(),
            original_name: "contract-v2.docx".to_string(),
            size_bytes: 48_213,
            content_type: "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
                .to_string(),
        }
        .into_document(DocumentId::new(), Utc::now());
        self.store.insert_document(&doc).await.unwrap()
    }

    /// Store a grant directly, bypassing the manager's expiry validation.
    pub async fn insert_grant(
        &self,
        document_id: DocumentId,
        expires_at: DateTime<Utc>,
        max_access_count: Option<i32>,
        password: Option<&str>,
    ) -> ShareGrant {
        let id = ShareId::new();
        self.store
            .create_grant(CreateShareGrant {
                id,
                document_id,
                expires_at,
                allow_download: true,
                require_password: password.is_some(),
                password_hash: password.map(|p| self.hasher.hash_password(p).unwrap()),
                max_access_count,
                share_link: format!("http://localhost/share/{id}"),
            })
            .await
            .unwrap()
    }

    /// Record accesses until the grant's quota is full.
    pub async fn exhaust(&self, grant: &ShareGrant) {
        let max = grant.max_access_count.unwrap_or(1);
        for _ in grant.current_access_count..max {
            self.store
                .record_access(CreateAccessLog {
                    id: AccessLogId::new(),
                    document_id: grant.document_id,
                    share_id: Some(grant.id),
                    action: AccessAction::View,
                    accessed_at: Utc::now(),
                    ip_address: "127.0.0.1".to_string(),
                    user_agent: "test".to_string(),
                    location: "Unknown".to_string(),
                })
                .await
                .unwrap();
        }
    }
}

pub(crate) fn create_input(document_id: DocumentId) -> CreateShareInput {
    CreateShareInput {
        document_id,
        expires_at: Utc::now() + Duration::days(1),
        allow_download: true,
        require_password: false,
        password: None,
        max_access_count: None,
    }
}
