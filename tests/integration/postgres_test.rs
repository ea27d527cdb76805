//! Store tests against a live PostgreSQL database.
//!
//! Set `DATABASE_URL` to run them; without it each test returns early.

use std::sync::Arc;

use chrono::{Duration, Utc};

use docvault_core::config::DatabaseConfig;
use docvault_core::error::ErrorKind;
use docvault_core::types::{AccessLogId, DocumentId, ShareId};
use docvault_database::repositories::ShareGrantRepository;
use docvault_database::{
    DatabasePool, GrantCounter, PgVaultStore, RecordOutcome, VaultStore, migration,
};
use docvault_entity::access::{AccessAction, CreateAccessLog};
use docvault_entity::document::{CreateDocument, Document};
use docvault_entity::share::CreateShareGrant;

async fn pg_store() -> Option<(PgVaultStore, DatabasePool)> {
    let Ok(url) = std::env::var("DATABASE_URL") else {
        eprintln!("DATABASE_URL not set, skipping PostgreSQL test");
        return None;
    };
    let config = DatabaseConfig {
        url,
        ..Default::default()
    };
    let pool = DatabasePool::connect(&config)
        .await
        .expect("Failed to connect to PostgreSQL");
    migration::run_migrations(pool.pool())
        .await
        .expect("Failed to run migrations");
    Some((PgVaultStore::new(pool.clone()), pool))
}

async fn seed_document(store: &PgVaultStore) -> Document {
    let doc = CreateDocument {
        name: "Board minutes".to_string(),
        original_name: "minutes.pdf".to_string(),
        size_bytes: 4096,
        content_type: "application/pdf".to_string(),
    }
    .into_document(DocumentId::new(), Utc::now());
    store.insert_document(&doc).await.unwrap()
}

fn grant_for(document_id: DocumentId, max: Option<i32>) -> CreateShareGrant {
    let id = ShareId::new();
    CreateShareGrant {
        id,
        document_id,
        expires_at: Utc::now() + Duration::days(1),
        allow_download: true,
        require_password: false,
        password_hash: None,
        max_access_count: max,
        share_link: format!("https://vault.test/share/{id}"),
    }
}

fn access(document_id: DocumentId, share_id: Option<ShareId>) -> CreateAccessLog {
    CreateAccessLog {
        id: AccessLogId::new(),
        document_id,
        share_id,
        action: AccessAction::View,
        accessed_at: Utc::now(),
        ip_address: "10.1.2.3".to_string(),
        user_agent: "integration".to_string(),
        location: "Unknown".to_string(),
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_pg_concurrent_record_access_respects_quota() {
    let Some((store, _)) = pg_store().await else {
        return;
    };
    let store = Arc::new(store);
    let doc = seed_document(&store).await;
    let grant = store.create_grant(grant_for(doc.id, Some(5))).await.unwrap();
    let (doc_id, grant_id) = (doc.id, grant.id);

    let tasks = (0..50).map(|_| {
        let store = Arc::clone(&store);
        tokio::spawn(async move { store.record_access(access(doc_id, Some(grant_id))).await })
    });
    let results = futures::future::join_all(tasks).await;

    let recorded = results
        .iter()
        .filter(|r| matches!(r, Ok(Ok(RecordOutcome::Recorded(_)))))
        .count();
    assert_eq!(recorded, 5);
    for result in results {
        assert!(result.unwrap().is_ok());
    }

    let grant = store.find_grant(grant_id).await.unwrap().unwrap();
    assert_eq!(grant.current_access_count, 5);
    let doc = store.find_document(doc_id).await.unwrap().unwrap();
    assert_eq!(doc.access_count, 5);

    let logs = store
        .list_access_logs(Some(doc_id), &Default::default())
        .await
        .unwrap();
    assert_eq!(logs.total_items, 5);
    assert_eq!(logs.items[0].document_name, "Board minutes");
    assert_eq!(logs.items[0].original_name, "minutes.pdf");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_pg_create_grant_replaces_previous() {
    let Some((store, _)) = pg_store().await else {
        return;
    };
    let doc = seed_document(&store).await;

    let first = store.create_grant(grant_for(doc.id, None)).await.unwrap();
    let second = store.create_grant(grant_for(doc.id, None)).await.unwrap();

    assert!(!store.find_grant(first.id).await.unwrap().unwrap().is_active);
    assert!(store.find_grant(second.id).await.unwrap().unwrap().is_active);
    let doc = store.find_document(doc.id).await.unwrap().unwrap();
    assert!(doc.is_shared);
    assert_eq!(doc.share_link.as_deref(), Some(second.share_link.as_str()));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_pg_concurrent_creates_leave_one_active_grant() {
    let Some((store, _)) = pg_store().await else {
        return;
    };
    let store = Arc::new(store);
    let doc = seed_document(&store).await;
    let doc_id = doc.id;

    let tasks = (0..8).map(|_| {
        let store = Arc::clone(&store);
        tokio::spawn(async move { store.create_grant(grant_for(doc_id, None)).await })
    });
    let grants: Vec<_> = futures::future::join_all(tasks)
        .await
        .into_iter()
        .map(|r| r.unwrap().unwrap())
        .collect();

    let mut active = 0;
    for grant in &grants {
        if store.find_grant(grant.id).await.unwrap().unwrap().is_active {
            active += 1;
        }
    }
    assert_eq!(active, 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_pg_deactivate_is_idempotent() {
    let Some((store, _)) = pg_store().await else {
        return;
    };
    let doc = seed_document(&store).await;
    let grant = store.create_grant(grant_for(doc.id, None)).await.unwrap();

    assert!(store.deactivate_grant(grant.id).await.unwrap());
    assert!(!store.deactivate_grant(grant.id).await.unwrap());

    let doc = store.find_document(doc.id).await.unwrap().unwrap();
    assert!(!doc.is_shared);
    assert!(doc.share_link.is_none());

    let err = store.deactivate_grant(ShareId::new()).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_pg_concurrent_record_and_create_do_not_deadlock() {
    let Some((store, _)) = pg_store().await else {
        return;
    };
    let store = Arc::new(store);
    let doc = seed_document(&store).await;
    let doc_id = doc.id;

    for _ in 0..10 {
        let grant = store.create_grant(grant_for(doc_id, None)).await.unwrap();
        let grant_id = grant.id;

        let records = (0..16).map(|_| {
            let store = Arc::clone(&store);
            tokio::spawn(async move {
                store
                    .record_access(access(doc_id, Some(grant_id)))
                    .await
                    .map(|_| ())
            })
        });
        let creates = (0..4).map(|_| {
            let store = Arc::clone(&store);
            tokio::spawn(async move { store.create_grant(grant_for(doc_id, None)).await.map(|_| ()) })
        });
        let revoke = {
            let store = Arc::clone(&store);
            tokio::spawn(async move { store.deactivate_grant(grant_id).await.map(|_| ()) })
        };

        let results =
            futures::future::join_all(records.chain(creates).chain(std::iter::once(revoke))).await;
        for result in results {
            if let Err(err) = result.unwrap() {
                assert_ne!(err.kind, ErrorKind::Database, "{err}");
            }
        }
    }

    let doc = store.find_document(doc_id).await.unwrap().unwrap();
    assert_eq!(doc.access_count, 160);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_pg_try_increment_missing_grant() {
    let Some((_, pool)) = pg_store().await else {
        return;
    };
    let id = ShareId::new();

    let counter = ShareGrantRepository::try_increment(pool.pool(), id, Utc::now())
        .await
        .unwrap();
    assert_eq!(counter, GrantCounter::QuotaFull);
    assert!(!ShareGrantRepository::exists(pool.pool(), id).await.unwrap());
}
