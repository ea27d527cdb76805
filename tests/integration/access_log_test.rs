//! Access log recording, listing, and statistics.

use axum::http::StatusCode;
use serde_json::json;

use docvault_core::types::{AccessLogId, DocumentId};

use crate::helpers::TestApp;

#[tokio::test]
async fn test_record_and_fetch_access() {
    let app = TestApp::new();
    let doc = app.seed_document("minutes").await;

    let created = app
        .request(
            "POST",
            "/api/access-logs",
            Some(json!({ "document_id": doc.id, "action": "view" })),
        )
        .await;
    assert_eq!(created.status, StatusCode::CREATED, "{}", created.body);
    assert_eq!(created.data()["location"], "Unknown");
    assert_eq!(created.data()["ip_address"], "unknown");
    assert!(created.data()["share_id"].is_null());

    let id = created.data()["id"].as_str().unwrap();
    let fetched = app.request("GET", &format!("/api/access-logs/{id}"), None).await;
    assert_eq!(fetched.status, StatusCode::OK);
    assert_eq!(fetched.data()["action"], "view");
    assert_eq!(fetched.data()["document_name"], "minutes");
    assert_eq!(fetched.data()["original_name"], "minutes.pdf");

    let missing = app
        .request("GET", &format!("/api/access-logs/{}", AccessLogId::new()), None)
        .await;
    assert_eq!(missing.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_record_access_for_unknown_document() {
    let app = TestApp::new();
    let response = app
        .request(
            "POST",
            "/api/access-logs",
            Some(json!({ "document_id": DocumentId::new(), "action": "download" })),
        )
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.error_code(), "NOT_FOUND");
}

#[tokio::test]
async fn test_list_access_logs_paginates_newest_first() {
    let app = TestApp::new();
    let doc = app.seed_document("policy").await;
    let other = app.seed_document("other").await;

    for _ in 0..3 {
        app.request(
            "POST",
            "/api/access-logs",
            Some(json!({ "document_id": doc.id, "action": "view" })),
        )
        .await;
    }
    app.request(
        "POST",
        "/api/access-logs",
        Some(json!({ "document_id": other.id, "action": "download" })),
    )
    .await;

    let all = app.request("GET", "/api/access-logs", None).await;
    assert_eq!(all.data()["total_items"], 4);
    assert_eq!(all.data()["items"][0]["document_id"], json!(other.id));
    assert_eq!(all.data()["items"][0]["document_name"], "other");
    assert_eq!(all.data()["items"][3]["original_name"], "policy.pdf");

    let page = app
        .request(
            "GET",
            &format!("/api/access-logs?document_id={}&page=2&per_page=2", doc.id),
            None,
        )
        .await;
    assert_eq!(page.status, StatusCode::OK);
    assert_eq!(page.data()["total_items"], 3);
    assert_eq!(page.data()["items"].as_array().unwrap().len(), 1);
    assert_eq!(page.data()["has_previous"], true);
}

#[tokio::test]
async fn test_overview_stats() {
    let app = TestApp::new();
    let doc = app.seed_document("slides").await;
    for action in ["view", "view", "download"] {
        let response = app
            .request(
                "POST",
                "/api/access-logs",
                Some(json!({ "document_id": doc.id, "action": action })),
            )
            .await;
        assert_eq!(response.status, StatusCode::CREATED);
    }

    let response = app
        .request("GET", "/api/access-logs/stats/overview", None)
        .await;
    assert_eq!(response.status, StatusCode::OK);
    let overview = response.data();
    assert_eq!(overview["window_days"], 30);
    assert_eq!(overview["total_accesses"], 3);
    assert_eq!(overview["unique_documents_accessed"], 1);
    assert_eq!(overview["count_by_action"], json!({ "view": 2, "download": 1 }));

    let invalid = app
        .request("GET", "/api/access-logs/stats/overview?days=0", None)
        .await;
    assert_eq!(invalid.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_document_stats() {
    let app = TestApp::new();
    let doc = app.seed_document("spec-sheet").await;
    let share = app.create_share(TestApp::share_body(doc.id)).await;
    let path = format!("/api/s/{}", share["token"].as_str().unwrap());
    app.request("POST", &path, Some(json!({}))).await;
    app.request("POST", &path, Some(json!({ "action": "download" })))
        .await;

    let response = app
        .request(
            "GET",
            &format!("/api/access-logs/stats/documents/{}?days=7", doc.id),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    let stats = response.data();
    assert_eq!(stats["window_days"], 7);
    assert_eq!(stats["total_accesses"], 2);
    assert_eq!(stats["recent_events"].as_array().unwrap().len(), 2);
    assert_eq!(stats["recent_events"][0]["action"], "download");
    assert_eq!(stats["daily_counts"][0]["count"], 2);

    let unknown = app
        .request(
            "GET",
            &format!("/api/access-logs/stats/documents/{}", DocumentId::new()),
            None,
        )
        .await;
    assert_eq!(unknown.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_health() {
    let app = TestApp::new();
    let response = app.request("GET", "/api/health", None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.data()["status"], "ok");
    assert_eq!(response.data()["store"], "memory");
}
