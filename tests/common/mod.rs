#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{header, HeaderMap, Method, Request, StatusCode},
    Router,
};
use docshelf::{db, services::storage::LocalStorage, AppState};
use serde_json::Value;
use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};
use tempfile::TempDir;
use tower::ServiceExt;

pub const TEST_JWT_SECRET: &str = "test-secret";
pub const BOUNDARY: &str = "docshelf-test-boundary";

pub struct TestApp {
    pub router: Router,
    pub pool: SqlitePool,
    pub storage_dir: TempDir,
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub bytes: Vec<u8>,
}

impl TestResponse {
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.bytes).expect("Response body is not JSON")
    }
}

/// multipart 본문의 파일 파트
pub struct FilePart<'a> {
    pub file_name: &'a str,
    pub bytes: &'a [u8],
}

impl TestApp {
    pub async fn spawn() -> Self {
        // 인메모리 DB는 연결마다 따로 생기므로 연결 하나를 계속 유지합니다.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await
            .expect("Failed to open in-memory database");

        db::MIGRATOR
            .run(&pool)
            .await
            .expect("Failed to run migrations");

        let storage_dir = tempfile::tempdir().expect("Failed to create storage dir");
        let storage = LocalStorage::new(storage_dir.path())
            .await
            .expect("Failed to create storage");

        let state = AppState {
            pool: pool.clone(),
            storage: Arc::new(storage),
            jwt_secret: TEST_JWT_SECRET.to_string(),
            jwt_ttl_minutes: 60,
        };

        TestApp {
            router: docshelf::app(state),
            pool,
            storage_dir,
        }
    }

    pub async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to execute request");

        let status = response.status();
        let headers = response.headers().clone();
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("Failed to read body")
            .to_vec();

        TestResponse {
            status,
            headers,
            bytes,
        }
    }

    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let body = match body {
            Some(json) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };
        self.send(builder.body(body).unwrap()).await
    }

    pub async fn get(&self, uri: &str, token: &str) -> TestResponse {
        self.request(Method::GET, uri, Some(token), None).await
    }

    pub async fn register(&self, name: &str, password: &str) -> TestResponse {
        self.request(
            Method::POST,
            "/api/register",
            None,
            Some(serde_json::json!({ "name": name, "password": password })),
        )
        .await
    }

    pub async fn login(&self, name: &str, password: &str) -> TestResponse {
        self.request(
            Method::POST,
            "/api/login",
            None,
            Some(serde_json::json!({ "name": name, "password": password })),
        )
        .await
    }

    /// 회원가입 후 로그인하여 토큰을 돌려줍니다.
    pub async fn signup(&self, name: &str) -> String {
        let res = self.register(name, "secret").await;
        assert_eq!(res.status, StatusCode::CREATED);
        let res = self.login(name, "secret").await;
        assert_eq!(res.status, StatusCode::OK);
        res.json()["token"].as_str().unwrap().to_string()
    }

    pub async fn upload(
        &self,
        token: &str,
        name: Option<&str>,
        tags: &[&str],
        file: Option<FilePart<'_>>,
    ) -> TestResponse {
        let body = multipart_body(name, tags, file);
        let request = Request::builder()
            .method(Method::POST)
            .uri("/api/documents")
            .header(header::AUTHORIZATION, format!("Bearer {}", token))
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={}", BOUNDARY),
            )
            .body(Body::from(body))
            .unwrap();
        self.send(request).await
    }

    /// 업로드하고 생성된 문서 ID를 돌려줍니다.
    pub async fn upload_doc(&self, token: &str, name: &str, tags: &[&str]) -> String {
        let res = self
            .upload(
                token,
                Some(name),
                tags,
                Some(FilePart {
                    file_name: "file.txt",
                    bytes: b"hello",
                }),
            )
            .await;
        assert_eq!(res.status, StatusCode::CREATED, "{:?}", res.json());
        res.json()["id"].as_str().unwrap().to_string()
    }
}

pub fn multipart_body(name: Option<&str>, tags: &[&str], file: Option<FilePart<'_>>) -> Vec<u8> {
    let mut body = Vec::new();
    if let Some(name) = name {
        body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"name\"\r\n\r\n{}\r\n",
                BOUNDARY, name
            )
            .as_bytes(),
        );
    }
    for tag in tags {
        body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"tags[]\"\r\n\r\n{}\r\n",
                BOUNDARY, tag
            )
            .as_bytes(),
        );
    }
    if let Some(file) = file {
        body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{}\"\r\nContent-Type: application/octet-stream\r\n\r\n",
                BOUNDARY, file.file_name
            )
            .as_bytes(),
        );
        body.extend_from_slice(file.bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
    body
}
