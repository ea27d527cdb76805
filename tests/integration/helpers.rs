//! Shared test helpers for integration tests.

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use chrono::{Duration, Utc};
use serde_json::{Value, json};
use tower::ServiceExt;

use docvault_api::{AppState, build_app};
use docvault_core::config::AppConfig;
use docvault_core::types::DocumentId;
use docvault_database::{MemoryVaultStore, VaultStore};
use docvault_entity::document::{CreateDocument, Document};

/// Test application context
pub struct TestApp {
    /// The Axum router for making test requests
    pub router: Router,
    /// Store shared with the router, for seeding and direct checks
    pub store: Arc<dyn VaultStore>,
}

/// Captured response
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
}

impl TestResponse {
    /// The `data` field of a success envelope.
    pub fn data(&self) -> &Value {
        &self.body["data"]
    }

    /// The `error` code of an error body.
    pub fn error_code(&self) -> &str {
        self.body["error"].as_str().unwrap_or_default()
    }
}

impl TestApp {
    /// Create a new test application backed by an empty memory store
    pub fn new() -> Self {
        let mut config = AppConfig::default();
        config.store.provider = "memory".to_string();
        config.share.public_base_url = "https://vault.test/share".to_string();

        let store: Arc<dyn VaultStore> = Arc::new(MemoryVaultStore::new());
        let cors = config.server.cors.clone();
        let state = AppState::build(config, Arc::clone(&store));

        Self {
            router: build_app(state, &cors),
            store,
        }
    }

    /// Insert a document the way the ingestion path would.
    pub async fn seed_document(&self, name: &str) -> Document {
        let doc = CreateDocument {
            name: name.to_string(),
            original_name: format!("{name}.pdf"),
            size_bytes: 1024,
            content_type: "application/pdf".to_string(),
        }
        .into_document(DocumentId::new(), Utc::now());
        self.store
            .insert_document(&doc)
            .await
            .expect("Failed to seed document")
    }

    /// Create a share through the API and return its `data` object.
    pub async fn create_share(&self, body: Value) -> Value {
        let response = self.request("POST", "/api/shares", Some(body)).await;
        assert_eq!(response.status, StatusCode::CREATED, "{}", response.body);
        response.data().clone()
    }

    /// Minimal create body: expires tomorrow, downloads allowed.
    pub fn share_body(document_id: DocumentId) -> Value {
        json!({
            "document_id": document_id,
            "expires_at": Utc::now() + Duration::days(1),
        })
    }

    /// Send a JSON request through the router.
    pub async fn request(&self, method: &str, path: &str, body: Option<Value>) -> TestResponse {
        self.request_with_headers(method, path, body, &[]).await
    }

    /// Send a JSON request with extra headers.
    pub async fn request_with_headers(
        &self,
        method: &str,
        path: &str,
        body: Option<Value>,
        headers: &[(&str, &str)],
    ) -> TestResponse {
        let body_str = body
            .map(|b| serde_json::to_string(&b).expect("Failed to serialize body"))
            .unwrap_or_default();

        let mut req = Request::builder()
            .method(method)
            .uri(path)
            .header("Content-Type", "application/json");
        for (name, value) in headers {
            req = req.header(*name, *value);
        }

        let req = req
            .body(Body::from(body_str))
            .expect("Failed to build request");

        let response = self
            .router
            .clone()
            .oneshot(req)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let body_bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("Failed to read body");

        let body: Value = serde_json::from_slice(&body_bytes).unwrap_or(Value::Null);

        TestResponse { status, body }
    }
}
