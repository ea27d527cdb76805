//! Share management and public link access.

use axum::http::StatusCode;
use chrono::{Duration, Utc};
use serde_json::json;

use docvault_core::types::ShareId;
use docvault_entity::share::CreateShareGrant;
use docvault_service::LinkService;

use crate::helpers::TestApp;

#[tokio::test]
async fn test_create_and_get_share() {
    let app = TestApp::new();
    let doc = app.seed_document("quarterly-report").await;

    let share = app.create_share(TestApp::share_body(doc.id)).await;
    let token = share["token"].as_str().unwrap();
    assert_eq!(token.len(), 22);
    assert_eq!(
        share["url"].as_str().unwrap(),
        format!("https://vault.test/share/{token}")
    );
    assert_eq!(share["current_access_count"], 0);
    assert_eq!(share["days_until_expiry"], 1);
    assert_eq!(share["is_active"], true);
    assert!(share.get("password_hash").is_none());

    let id = share["id"].as_str().unwrap();
    let response = app.request("GET", &format!("/api/shares/{id}"), None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.data()["share"]["id"], share["id"]);
    assert_eq!(response.data()["document"]["is_shared"], true);
    assert_eq!(
        response.data()["document"]["share_link"],
        share["url"]
    );
}

#[tokio::test]
async fn test_create_share_rejects_bad_input() {
    let app = TestApp::new();
    let doc = app.seed_document("draft").await;

    let missing = app
        .request(
            "POST",
            "/api/shares",
            Some(TestApp::share_body(docvault_core::types::DocumentId::new())),
        )
        .await;
    assert_eq!(missing.status, StatusCode::NOT_FOUND);

    let past = app
        .request(
            "POST",
            "/api/shares",
            Some(json!({
                "document_id": doc.id,
                "expires_at": Utc::now() - Duration::hours(1),
            })),
        )
        .await;
    assert_eq!(past.status, StatusCode::BAD_REQUEST);
    assert_eq!(past.error_code(), "VALIDATION_ERROR");

    let zero_quota = app
        .request(
            "POST",
            "/api/shares",
            Some(json!({
                "document_id": doc.id,
                "expires_at": Utc::now() + Duration::days(1),
                "max_access_count": 0,
            })),
        )
        .await;
    assert_eq!(zero_quota.status, StatusCode::BAD_REQUEST);

    let no_password = app
        .request(
            "POST",
            "/api/shares",
            Some(json!({
                "document_id": doc.id,
                "expires_at": Utc::now() + Duration::days(1),
                "require_password": true,
            })),
        )
        .await;
    assert_eq!(no_password.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_open_share_records_access() {
    let app = TestApp::new();
    let doc = app.seed_document("handbook").await;
    let share = app.create_share(TestApp::share_body(doc.id)).await;
    let token = share["token"].as_str().unwrap();

    let response = app
        .request_with_headers(
            "POST",
            &format!("/api/s/{token}"),
            Some(json!({ "action": "download" })),
            &[("x-forwarded-for", "203.0.113.5"), ("user-agent", "curl/8.5")],
        )
        .await;
    assert_eq!(response.status, StatusCode::OK, "{}", response.body);
    assert_eq!(response.data()["document"]["id"], json!(doc.id));
    assert_eq!(response.data()["share"]["allow_download"], true);
    assert_eq!(response.data()["action"], "download");

    let logs = app
        .request("GET", &format!("/api/access-logs?document_id={}", doc.id), None)
        .await;
    assert_eq!(logs.data()["total_items"], 1);
    let entry = &logs.data()["items"][0];
    assert_eq!(entry["ip_address"], "203.0.113.5");
    assert_eq!(entry["user_agent"], "curl/8.5");
    assert_eq!(entry["share_id"], share["id"]);

    let id = share["id"].as_str().unwrap();
    let details = app.request("GET", &format!("/api/shares/{id}"), None).await;
    assert_eq!(details.data()["share"]["current_access_count"], 1);
    assert_eq!(details.data()["document"]["access_count"], 1);
}

#[tokio::test]
async fn test_password_protected_share() {
    let app = TestApp::new();
    let doc = app.seed_document("salaries").await;
    let mut body = TestApp::share_body(doc.id);
    body["require_password"] = json!(true);
    body["password"] = json!("s3cret");
    let share = app.create_share(body).await;
    let path = format!("/api/s/{}", share["token"].as_str().unwrap());

    let none = app.request("POST", &path, Some(json!({}))).await;
    assert_eq!(none.status, StatusCode::UNAUTHORIZED);
    assert_eq!(none.error_code(), "PASSWORD_REQUIRED");

    let wrong = app
        .request("POST", &path, Some(json!({ "password": "guess" })))
        .await;
    assert_eq!(wrong.status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong.error_code(), "PASSWORD_MISMATCH");

    let right = app
        .request("POST", &path, Some(json!({ "password": "s3cret" })))
        .await;
    assert_eq!(right.status, StatusCode::OK);
    assert_eq!(right.data()["share"]["require_password"], true);
}

#[tokio::test]
async fn test_single_use_share() {
    let app = TestApp::new();
    let doc = app.seed_document("one-time").await;
    let mut body = TestApp::share_body(doc.id);
    body["max_access_count"] = json!(1);
    let share = app.create_share(body).await;
    let path = format!("/api/s/{}", share["token"].as_str().unwrap());

    let first = app.request("POST", &path, Some(json!({}))).await;
    assert_eq!(first.status, StatusCode::OK);

    let second = app.request("POST", &path, Some(json!({}))).await;
    assert_eq!(second.status, StatusCode::FORBIDDEN);
    assert_eq!(second.error_code(), "QUOTA_EXCEEDED");
}

#[tokio::test]
async fn test_view_only_share_refuses_download() {
    let app = TestApp::new();
    let doc = app.seed_document("preview").await;
    let mut body = TestApp::share_body(doc.id);
    body["allow_download"] = json!(false);
    let share = app.create_share(body).await;
    let path = format!("/api/s/{}", share["token"].as_str().unwrap());

    let download = app
        .request("POST", &path, Some(json!({ "action": "download" })))
        .await;
    assert_eq!(download.status, StatusCode::FORBIDDEN);
    assert_eq!(download.error_code(), "DOWNLOAD_NOT_ALLOWED");

    let view = app.request("POST", &path, Some(json!({}))).await;
    assert_eq!(view.status, StatusCode::OK);

    let logs = app.request("GET", "/api/access-logs", None).await;
    assert_eq!(logs.data()["total_items"], 1);
}

#[tokio::test]
async fn test_revoke_share() {
    let app = TestApp::new();
    let doc = app.seed_document("contract").await;
    let share = app.create_share(TestApp::share_body(doc.id)).await;
    let id = share["id"].as_str().unwrap();

    for _ in 0..2 {
        let response = app.request("DELETE", &format!("/api/shares/{id}"), None).await;
        assert_eq!(response.status, StatusCode::NO_CONTENT);
    }

    let path = format!("/api/s/{}", share["token"].as_str().unwrap());
    let opened = app.request("POST", &path, Some(json!({}))).await;
    assert_eq!(opened.status, StatusCode::GONE);
    assert_eq!(opened.error_code(), "SHARE_REVOKED");

    let active = app.request("GET", "/api/shares", None).await;
    assert_eq!(active.data()["total_items"], 0);
    let inactive = app.request("GET", "/api/shares?filter=inactive", None).await;
    assert_eq!(inactive.data()["total_items"], 1);
    assert_eq!(inactive.data()["items"][0]["is_active"], false);

    let unknown = app
        .request("DELETE", &format!("/api/shares/{}", ShareId::new()), None)
        .await;
    assert_eq!(unknown.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_new_share_replaces_previous() {
    let app = TestApp::new();
    let doc = app.seed_document("roadmap").await;
    let first = app.create_share(TestApp::share_body(doc.id)).await;
    let second = app.create_share(TestApp::share_body(doc.id)).await;

    let path = format!("/api/s/{}", first["token"].as_str().unwrap());
    let old = app.request("POST", &path, Some(json!({}))).await;
    assert_eq!(old.status, StatusCode::GONE);

    let path = format!("/api/s/{}", second["token"].as_str().unwrap());
    let new = app.request("POST", &path, Some(json!({}))).await;
    assert_eq!(new.status, StatusCode::OK);

    let all = app.request("GET", "/api/shares?filter=all", None).await;
    assert_eq!(all.data()["total_items"], 2);
    assert_eq!(all.data()["items"][0]["id"], second["id"]);
}

#[tokio::test]
async fn test_expired_and_unknown_links() {
    let app = TestApp::new();
    let doc = app.seed_document("archive").await;
    let id = ShareId::new();
    app.store
        .create_grant(CreateShareGrant {
            id,
            document_id: doc.id,
            expires_at: Utc::now() - Duration::minutes(1),
            allow_download: true,
            require_password: false,
            password_hash: None,
            max_access_count: None,
            share_link: format!("https://vault.test/share/{id}"),
        })
        .await
        .unwrap();
    let token = LinkService::with_base_url("https://vault.test/share").token(id);

    let expired = app
        .request("POST", &format!("/api/s/{token}"), Some(json!({})))
        .await;
    assert_eq!(expired.status, StatusCode::GONE);
    assert_eq!(expired.error_code(), "SHARE_EXPIRED");

    let malformed = app
        .request("POST", "/api/s/not-a-token", Some(json!({})))
        .await;
    assert_eq!(malformed.status, StatusCode::NOT_FOUND);

    let missing = LinkService::with_base_url("https://vault.test/share").token(ShareId::new());
    let unknown = app
        .request("POST", &format!("/api/s/{missing}"), Some(json!({})))
        .await;
    assert_eq!(unknown.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_update_share() {
    let app = TestApp::new();
    let doc = app.seed_document("budget").await;
    let share = app.create_share(TestApp::share_body(doc.id)).await;
    let path = format!("/api/shares/{}", share["id"].as_str().unwrap());

    let updated = app
        .request(
            "PUT",
            &path,
            Some(json!({ "max_access_count": 3, "allow_download": false })),
        )
        .await;
    assert_eq!(updated.status, StatusCode::OK, "{}", updated.body);
    assert_eq!(updated.data()["max_access_count"], 3);
    assert_eq!(updated.data()["remaining_accesses"], 3);
    assert_eq!(updated.data()["allow_download"], false);

    let cleared = app
        .request("PUT", &path, Some(json!({ "max_access_count": null })))
        .await;
    assert_eq!(cleared.status, StatusCode::OK);
    assert!(cleared.data()["max_access_count"].is_null());

    let empty = app.request("PUT", &path, Some(json!({}))).await;
    assert_eq!(empty.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_expiring_shares() {
    let app = TestApp::new();
    let soon = app.seed_document("soon").await;
    let later = app.seed_document("later").await;

    let mut body = TestApp::share_body(soon.id);
    body["expires_at"] = json!(Utc::now() + Duration::days(2));
    let expiring = app.create_share(body).await;
    let mut body = TestApp::share_body(later.id);
    body["expires_at"] = json!(Utc::now() + Duration::days(20));
    app.create_share(body).await;

    let response = app.request("GET", "/api/shares/expiring?days=7", None).await;
    assert_eq!(response.status, StatusCode::OK);
    let items = response.data().as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["id"], expiring["id"]);
    assert_eq!(items[0]["days_until_expiry"], 2);

    let wide = app.request("GET", "/api/shares/expiring?days=30", None).await;
    assert_eq!(wide.data().as_array().unwrap().len(), 2);

    let zero = app.request("GET", "/api/shares/expiring?days=0", None).await;
    assert_eq!(zero.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_list_shares_with_out_of_range_page() {
    let app = TestApp::new();
    let doc = app.seed_document("ledger").await;
    app.create_share(TestApp::share_body(doc.id)).await;

    let response = app
        .request("GET", &format!("/api/shares?page={}", u64::MAX), None)
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.data()["total_items"], 1);
    assert!(response.data()["items"].as_array().unwrap().is_empty());
    assert_eq!(response.data()["has_previous"], true);
}
