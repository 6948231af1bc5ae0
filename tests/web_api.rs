//! HTTP API integration tests against an in-memory database and object store.

use appdrive_lib::auth::SessionKeys;
use appdrive_lib::db::Db;
use appdrive_lib::web::{create_router, AppState};
use axum::http::header::{AUTHORIZATION, COOKIE};
use axum::http::StatusCode;
use axum_test::multipart::{MultipartForm, Part};
use axum_test::TestServer;
use object_tree::{Drive, MemoryStore};
use serde_json::{json, Value};
use std::sync::Arc;

const PASSWORD: &str = "correct horse";

struct Harness {
    server: TestServer,
    store: Arc<MemoryStore>,
    cookie: String,
}

/// Server with a small listing page size so pagination is exercised.
async fn harness() -> Harness {
    let db = Db::open_in_memory()
        .await
        .expect("Failed to create test database");
    let store = Arc::new(MemoryStore::with_page_size(2));
    let state = Arc::new(AppState {
        db,
        drive: Drive::new(store.clone(), "files.example.com"),
        sessions: SessionKeys::new("test-secret-key-for-testing-only", PASSWORD),
        secure_cookies: false,
    });
    let server = TestServer::new(create_router(state)).expect("Failed to create test server");

    let response = server
        .post("/api/login")
        .json(&json!({ "password": PASSWORD }))
        .await;
    response.assert_status_ok();
    let cookie = format!("token={}", response.cookie("token").value());

    Harness {
        server,
        store,
        cookie,
    }
}

async fn create_app(h: &Harness, name: &str) {
    h.server
        .post("/api/apps")
        .add_header(COOKIE, h.cookie.clone())
        .json(&json!({ "name": name }))
        .await
        .assert_status_ok();
}

async fn list(h: &Harness, app: &str, path: &str) -> Value {
    let response = h
        .server
        .get(&format!("/api/apps/{}/files", app))
        .add_query_param("path", path)
        .add_header(COOKIE, h.cookie.clone())
        .await;
    response.assert_status_ok();
    response.json::<Value>()
}

#[tokio::test]
async fn wrong_password_is_rejected() {
    let h = harness().await;
    h.server
        .post("/api/login")
        .json(&json!({ "password": "nope" }))
        .await
        .assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn control_plane_requires_session() {
    let h = harness().await;

    h.server
        .get("/api/apps")
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
    h.server
        .get("/api/apps")
        .add_header(COOKIE, "token=123.abcd".to_string())
        .await
        .assert_status(StatusCode::UNAUTHORIZED);

    let check = h.server.get("/api/check-auth").await;
    assert_eq!(check.json::<Value>(), json!(false));
    let check = h
        .server
        .get("/api/check-auth")
        .add_header(COOKIE, h.cookie.clone())
        .await;
    assert_eq!(check.json::<Value>(), json!(true));
}

#[tokio::test]
async fn app_names_are_unique_single_segments() {
    let h = harness().await;
    create_app(&h, "acme").await;

    h.server
        .post("/api/apps")
        .add_header(COOKIE, h.cookie.clone())
        .json(&json!({ "name": "acme" }))
        .await
        .assert_status(StatusCode::CONFLICT);
    h.server
        .post("/api/apps")
        .add_header(COOKIE, h.cookie.clone())
        .json(&json!({ "name": "a/b" }))
        .await
        .assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn folder_upload_list_delete_walkthrough() {
    let h = harness().await;
    create_app(&h, "acme").await;

    let created = h
        .server
        .post("/api/apps/acme/folders")
        .add_header(COOKIE, h.cookie.clone())
        .json(&json!({ "path": [], "name": "docs" }))
        .await;
    created.assert_status_ok();
    assert_eq!(created.json::<Value>()["key"], "acme/docs/");

    let form = MultipartForm::new()
        .add_text("path", "docs/")
        .add_text("appName", "acme")
        .add_part(
            "file",
            Part::bytes(b"%PDF-1.4".to_vec())
                .file_name("report.pdf")
                .mime_type("application/pdf"),
        );
    let uploaded = h
        .server
        .post("/api/upload")
        .add_header(COOKIE, h.cookie.clone())
        .multipart(form)
        .await;
    uploaded.assert_status_ok();
    assert_eq!(
        uploaded.json::<Value>()["link"],
        "https://files.example.com/acme/docs/report.pdf"
    );

    let root = list(&h, "acme", "").await;
    assert_eq!(root, json!({ "folders": ["docs"], "files": [] }));

    let docs = list(&h, "acme", "docs").await;
    assert_eq!(
        docs,
        json!({
            "folders": [],
            "files": [{
                "name": "report.pdf",
                "link": "https://files.example.com/acme/docs/report.pdf"
            }]
        })
    );

    let deleted = h
        .server
        .delete("/api/apps/acme/folders")
        .add_query_param("path", "docs")
        .add_header(COOKIE, h.cookie.clone())
        .await;
    deleted.assert_status_ok();
    assert_eq!(deleted.json::<Value>()["count"], 2);

    let root = list(&h, "acme", "").await;
    assert_eq!(root["folders"], json!([]));
}

#[tokio::test]
async fn app_root_cannot_be_deleted_as_a_folder() {
    let h = harness().await;
    create_app(&h, "acme").await;

    h.server
        .delete("/api/apps/acme/folders")
        .add_query_param("path", "")
        .add_header(COOKIE, h.cookie.clone())
        .await
        .assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn unknown_app_is_not_found() {
    let h = harness().await;
    h.server
        .get("/api/apps/ghost/files")
        .add_header(COOKIE, h.cookie.clone())
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn api_key_upload_and_key_revocation() {
    let h = harness().await;
    create_app(&h, "acme").await;

    let key = h
        .server
        .post("/api/apps/acme/keys")
        .add_header(COOKIE, h.cookie.clone())
        .await
        .json::<Value>();
    let api_key = key["key"].as_str().unwrap().to_string();
    let key_id = key["id"].as_i64().unwrap();

    let upload = |name: &'static str| {
        MultipartForm::new()
            .add_text("path", "")
            .add_part("file", Part::bytes(b"hello".to_vec()).file_name(name))
    };

    h.server
        .post("/api/upload")
        .add_header(AUTHORIZATION, format!("Bearer {}", api_key))
        .multipart(upload("hello.txt"))
        .await
        .assert_status_ok();
    assert!(h.store.contains("acme/hello.txt").await);

    h.server
        .delete(&format!("/api/apps/acme/keys/{}", key_id))
        .add_header(COOKIE, h.cookie.clone())
        .await
        .assert_status_ok();

    h.server
        .post("/api/upload")
        .add_header(AUTHORIZATION, format!("Bearer {}", api_key))
        .multipart(upload("again.txt"))
        .await
        .assert_status(StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn upload_rejects_bad_paths_and_missing_files() {
    let h = harness().await;
    create_app(&h, "acme").await;

    let traversal = MultipartForm::new()
        .add_text("path", "../other/")
        .add_text("appName", "acme")
        .add_part("file", Part::bytes(b"x".to_vec()).file_name("x.txt"));
    h.server
        .post("/api/upload")
        .add_header(COOKIE, h.cookie.clone())
        .multipart(traversal)
        .await
        .assert_status(StatusCode::BAD_REQUEST);

    let no_file = MultipartForm::new()
        .add_text("path", "")
        .add_text("appName", "acme");
    h.server
        .post("/api/upload")
        .add_header(COOKIE, h.cookie.clone())
        .multipart(no_file)
        .await
        .assert_status(StatusCode::BAD_REQUEST);

    assert!(h.store.keys().await.is_empty());
}

#[tokio::test]
async fn deleting_an_app_removes_keys_and_objects() {
    let h = harness().await;
    create_app(&h, "acme").await;
    create_app(&h, "other").await;

    let api_key = h
        .server
        .post("/api/apps/acme/keys")
        .add_header(COOKIE, h.cookie.clone())
        .await
        .json::<Value>()["key"]
        .as_str()
        .unwrap()
        .to_string();

    for (app, name) in [("acme", "a"), ("acme", "b"), ("acme", "c"), ("other", "keep")] {
        h.server
            .post(&format!("/api/apps/{}/folders", app))
            .add_header(COOKIE, h.cookie.clone())
            .json(&json!({ "path": [], "name": name }))
            .await
            .assert_status_ok();
    }

    let deleted = h
        .server
        .delete("/api/apps/acme")
        .add_header(COOKIE, h.cookie.clone())
        .await;
    deleted.assert_status_ok();
    assert_eq!(deleted.json::<Value>()["deleted_objects"], 3);

    assert_eq!(h.store.keys().await, vec!["other/keep/"]);
    h.server
        .get("/api/apps/acme/keys")
        .add_header(COOKIE, h.cookie.clone())
        .await
        .assert_status(StatusCode::NOT_FOUND);

    let form = MultipartForm::new()
        .add_text("path", "")
        .add_part("file", Part::bytes(b"x".to_vec()).file_name("x.txt"));
    h.server
        .post("/api/upload")
        .add_header(AUTHORIZATION, format!("Bearer {}", api_key))
        .multipart(form)
        .await
        .assert_status(StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn malformed_requests_get_the_json_error_body() {
    let h = harness().await;
    create_app(&h, "acme").await;

    let missing_field = h
        .server
        .post("/api/apps")
        .add_header(COOKIE, h.cookie.clone())
        .json(&json!({}))
        .await;
    missing_field.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(missing_field.json::<Value>()["error"]["code"], "BAD_REQUEST");

    let bad_id = h
        .server
        .delete("/api/apps/acme/keys/notanumber")
        .add_header(COOKIE, h.cookie.clone())
        .await;
    bad_id.assert_status(StatusCode::BAD_REQUEST);
    let body = bad_id.json::<Value>();
    assert_eq!(body["error"]["code"], "BAD_REQUEST");
    assert!(body["error"]["message"].is_string());

    let missing_name = h
        .server
        .delete("/api/apps/acme/files")
        .add_query_param("path", "docs")
        .add_header(COOKIE, h.cookie.clone())
        .await;
    missing_name.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(missing_name.json::<Value>()["error"]["code"], "BAD_REQUEST");
}
