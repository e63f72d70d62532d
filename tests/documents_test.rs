mod common;

use axum::http::{header, Method, StatusCode};
use common::{FilePart, TestApp};
use serde_json::{json, Value};

fn names(page: &Value) -> Vec<String> {
    page["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["name"].as_str().unwrap().to_string())
        .collect()
}

#[tokio::test]
async fn upload_stores_file_and_metadata() {
    let app = TestApp::spawn().await;
    let token = app.signup("alice").await;

    let res = app
        .upload(
            &token,
            Some("Invoice"),
            &["finance", " 2024 ", "finance", ""],
            Some(FilePart {
                file_name: "invoice.pdf",
                bytes: b"%PDF-1.4",
            }),
        )
        .await;

    assert_eq!(res.status, StatusCode::CREATED);
    let body = res.json();
    assert_eq!(body["name"], "Invoice");
    assert_eq!(body["tags"], json!(["finance", "2024"]));

    let file_path = body["file_path"].as_str().unwrap();
    assert!(file_path.ends_with(".pdf"));
    let stored = std::fs::read(app.storage_dir.path().join(file_path)).unwrap();
    assert_eq!(stored, b"%PDF-1.4");
}

#[tokio::test]
async fn upload_without_file_or_name_is_rejected() {
    let app = TestApp::spawn().await;
    let token = app.signup("alice").await;

    let res = app.upload(&token, None, &["x"], None).await;

    assert_eq!(res.status, StatusCode::UNPROCESSABLE_ENTITY);
    let fields = &res.json()["error"]["fields"];
    assert!(fields["name"].is_array());
    assert!(fields["file"].is_array());

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM documents")
        .fetch_one(&app.pool)
        .await
        .unwrap();
    assert_eq!(count, 0);
}

#[tokio::test]
async fn upload_rejects_overlong_tag() {
    let app = TestApp::spawn().await;
    let token = app.signup("alice").await;
    let long_tag = "t".repeat(101);

    let res = app
        .upload(
            &token,
            Some("Doc"),
            &[long_tag.as_str()],
            Some(FilePart {
                file_name: "a.txt",
                bytes: b"a",
            }),
        )
        .await;

    assert_eq!(res.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(res.json()["error"]["fields"]["tags"].is_array());
}

#[tokio::test]
async fn upload_rejects_file_over_10_mib() {
    let app = TestApp::spawn().await;
    let token = app.signup("alice").await;
    let bytes = vec![0u8; docshelf::models::MAX_FILE_BYTES + 1];

    let res = app
        .upload(
            &token,
            Some("Big"),
            &[],
            Some(FilePart {
                file_name: "big.bin",
                bytes: &bytes,
            }),
        )
        .await;

    assert_eq!(res.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(res.json()["error"]["fields"]["file"].is_array());
}

#[tokio::test]
async fn upload_over_body_limit_is_reported_as_file_too_large() {
    let app = TestApp::spawn().await;
    let token = app.signup("alice").await;
    let bytes = vec![0u8; docshelf::routes::MAX_BODY_BYTES + 1024];

    let res = app
        .upload(
            &token,
            Some("Huge"),
            &[],
            Some(FilePart {
                file_name: "huge.bin",
                bytes: &bytes,
            }),
        )
        .await;

    assert_eq!(res.status, StatusCode::UNPROCESSABLE_ENTITY);
    let body = res.json();
    assert_eq!(body["error"]["code"], "validation_error");
    assert!(body["error"]["fields"]["file"].is_array());

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM documents")
        .fetch_one(&app.pool)
        .await
        .unwrap();
    assert_eq!(count, 0);
}

#[tokio::test]
async fn tags_containing_comma_are_rejected() {
    let app = TestApp::spawn().await;
    let token = app.signup("alice").await;

    let upload = app
        .upload(
            &token,
            Some("Doc"),
            &["a,b"],
            Some(FilePart {
                file_name: "a.txt",
                bytes: b"a",
            }),
        )
        .await;
    assert_eq!(upload.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(upload.json()["error"]["fields"]["tags"].is_array());

    let id = app.upload_doc(&token, "Doc", &["a"]).await;
    let update = app
        .request(
            Method::PUT,
            &format!("/api/documents/{}", id),
            Some(&token),
            Some(json!({ "tags": ["a,b"] })),
        )
        .await;
    assert_eq!(update.status, StatusCode::UNPROCESSABLE_ENTITY);

    let tags = app.get("/api/documents-tags", &token).await.json();
    assert_eq!(tags, json!(["a"]));
}

#[tokio::test]
async fn list_filters_by_all_requested_tags() {
    let app = TestApp::spawn().await;
    let token = app.signup("alice").await;
    app.upload_doc(&token, "Invoice", &["finance", "2024"]).await;
    app.upload_doc(&token, "Budget", &["finance", "2025"]).await;
    app.upload_doc(&token, "Notes", &[]).await;

    let all = app.get("/api/documents", &token).await.json();
    assert_eq!(all["total"], 3);
    assert_eq!(names(&all), ["Invoice", "Budget", "Notes"]);

    let finance = app.get("/api/documents?tags=finance", &token).await.json();
    assert_eq!(names(&finance), ["Invoice", "Budget"]);

    let both = app.get("/api/documents?tags=finance,2024", &token).await.json();
    assert_eq!(names(&both), ["Invoice"]);

    let none = app.get("/api/documents?tags=finance%2C2024%2C2025", &token).await.json();
    assert_eq!(none["total"], 0);
    assert_eq!(none["last_page"], 1);
}

#[tokio::test]
async fn tag_filter_is_case_sensitive() {
    let app = TestApp::spawn().await;
    let token = app.signup("alice").await;
    app.upload_doc(&token, "Invoice", &["Finance"]).await;

    let lower = app.get("/api/documents?tags=finance", &token).await.json();
    let exact = app.get("/api/documents?tags=Finance", &token).await.json();

    assert_eq!(lower["total"], 0);
    assert_eq!(exact["total"], 1);
}

#[tokio::test]
async fn list_paginates_and_keeps_requested_page_past_the_end() {
    let app = TestApp::spawn().await;
    let token = app.signup("alice").await;
    for i in 0..12 {
        app.upload_doc(&token, &format!("Doc {}", i), &["bulk"]).await;
    }

    let first = app.get("/api/documents", &token).await.json();
    assert_eq!(first["data"].as_array().unwrap().len(), 10);
    assert_eq!(first["current_page"], 1);
    assert_eq!(first["last_page"], 2);
    assert_eq!(first["per_page"], 10);
    assert_eq!(first["total"], 12);

    let second = app.get("/api/documents?tags=bulk&page=2", &token).await.json();
    assert_eq!(names(&second), ["Doc 10", "Doc 11"]);

    let beyond = app.get("/api/documents?page=5", &token).await.json();
    assert!(beyond["data"].as_array().unwrap().is_empty());
    assert_eq!(beyond["current_page"], 5);
    assert_eq!(beyond["last_page"], 2);

    let garbage = app.get("/api/documents?page=abc", &token).await.json();
    assert_eq!(garbage["current_page"], 1);
}

#[tokio::test]
async fn list_only_shows_own_documents() {
    let app = TestApp::spawn().await;
    let alice = app.signup("alice").await;
    let bob = app.signup("bob").await;
    app.upload_doc(&alice, "Mine", &["shared"]).await;
    app.upload_doc(&bob, "Theirs", &["shared"]).await;

    let page = app.get("/api/documents?tags=shared", &alice).await.json();

    assert_eq!(names(&page), ["Mine"]);
}

#[tokio::test]
async fn update_changes_only_given_fields() {
    let app = TestApp::spawn().await;
    let token = app.signup("alice").await;
    let id = app.upload_doc(&token, "Draft", &["a", "b"]).await;
    let uri = format!("/api/documents/{}", id);

    let renamed = app
        .request(Method::PUT, &uri, Some(&token), Some(json!({ "name": " Final " })))
        .await;
    assert_eq!(renamed.status, StatusCode::OK);
    assert_eq!(renamed.json()["name"], "Final");
    assert_eq!(renamed.json()["tags"], json!(["a", "b"]));

    let cleared = app
        .request(Method::PUT, &uri, Some(&token), Some(json!({ "tags": [] })))
        .await;
    assert_eq!(cleared.json()["name"], "Final");
    assert_eq!(cleared.json()["tags"], json!([]));

    let fetched = app.get(&uri, &token).await.json();
    assert_eq!(fetched["tags"], json!([]));
}

#[tokio::test]
async fn update_rejects_empty_name() {
    let app = TestApp::spawn().await;
    let token = app.signup("alice").await;
    let id = app.upload_doc(&token, "Draft", &[]).await;

    let res = app
        .request(
            Method::PUT,
            &format!("/api/documents/{}", id),
            Some(&token),
            Some(json!({ "name": "   " })),
        )
        .await;

    assert_eq!(res.status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn other_users_documents_look_missing() {
    let app = TestApp::spawn().await;
    let alice = app.signup("alice").await;
    let bob = app.signup("bob").await;
    let id = app.upload_doc(&alice, "Private", &[]).await;
    let uri = format!("/api/documents/{}", id);

    let get = app.get(&uri, &bob).await;
    let update = app
        .request(Method::PUT, &uri, Some(&bob), Some(json!({ "name": "Hacked" })))
        .await;
    let download = app.get(&format!("{}/download", uri), &bob).await;
    let delete = app.request(Method::DELETE, &uri, Some(&bob), None).await;
    let unknown = app.get("/api/documents/does-not-exist", &bob).await;

    for res in [&get, &update, &download, &delete] {
        assert_eq!(res.status, StatusCode::NOT_FOUND);
        assert_eq!(res.json(), unknown.json());
    }

    let still_there = app.get(&uri, &alice).await.json();
    assert_eq!(still_there["name"], "Private");
}

#[tokio::test]
async fn delete_removes_record_and_file() {
    let app = TestApp::spawn().await;
    let token = app.signup("alice").await;
    let id = app.upload_doc(&token, "Old", &[]).await;
    let uri = format!("/api/documents/{}", id);
    let file_path = app.get(&uri, &token).await.json()["file_path"]
        .as_str()
        .unwrap()
        .to_string();

    let res = app.request(Method::DELETE, &uri, Some(&token), None).await;

    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.json()["message"], "Document deleted");
    assert_eq!(app.get(&uri, &token).await.status, StatusCode::NOT_FOUND);
    assert!(!app.storage_dir.path().join(file_path).exists());

    let again = app.request(Method::DELETE, &uri, Some(&token), None).await;
    assert_eq!(again.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn download_returns_bytes_with_filename() {
    let app = TestApp::spawn().await;
    let token = app.signup("alice").await;
    let res = app
        .upload(
            &token,
            Some("Invoice"),
            &[],
            Some(FilePart {
                file_name: "scan.pdf",
                bytes: b"%PDF-data",
            }),
        )
        .await;
    let id = res.json()["id"].as_str().unwrap().to_string();

    let download = app.get(&format!("/api/documents/{}/download", id), &token).await;

    assert_eq!(download.status, StatusCode::OK);
    assert_eq!(download.bytes, b"%PDF-data");
    assert_eq!(download.headers[header::CONTENT_TYPE], "application/pdf");
    assert_eq!(
        download.headers[header::CONTENT_DISPOSITION],
        "attachment; filename=\"Invoice.pdf\""
    );
}

#[tokio::test]
async fn download_with_missing_file_is_not_found() {
    let app = TestApp::spawn().await;
    let token = app.signup("alice").await;
    let id = app.upload_doc(&token, "Ghost", &[]).await;
    let uri = format!("/api/documents/{}", id);
    let file_path = app.get(&uri, &token).await.json()["file_path"]
        .as_str()
        .unwrap()
        .to_string();
    std::fs::remove_file(app.storage_dir.path().join(file_path)).unwrap();

    let res = app.get(&format!("{}/download", uri), &token).await;

    assert_eq!(res.status, StatusCode::NOT_FOUND);
    assert_eq!(res.json()["error"]["code"], "file_not_found");

    // 파일이 이미 없어도 삭제는 성공합니다.
    let delete = app.request(Method::DELETE, &uri, Some(&token), None).await;
    assert_eq!(delete.status, StatusCode::OK);
}
