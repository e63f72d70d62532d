//! # 문서(Document) 라우트 핸들러
//!
//! 문서 업로드/조회/수정/삭제/다운로드를 처리하는 HTTP 핸들러 함수들입니다.
//! 모든 핸들러는 `AuthUser` 추출기로 호출자를 확인하고,
//! DB 쿼리에는 항상 호출자의 ID를 소유자 조건으로 넘깁니다.
//!
//! ## 엔드포인트
//! - `GET    /api/documents?tags=a,b&page=n` → 문서 목록 (태그 AND 필터 + 페이지)
//! - `POST   /api/documents`                 → 업로드 (multipart: name, file, tags[])
//! - `GET    /api/documents/{id}`            → 단일 문서 조회
//! - `PUT    /api/documents/{id}`            → 이름/태그 부분 수정
//! - `DELETE /api/documents/{id}`            → 삭제 (저장된 파일 포함)
//! - `GET    /api/documents/{id}/download`   → 파일 다운로드
//!
//! 다른 사용자의 문서 ID로 요청하면 존재하지 않는 ID와 똑같이 404를 받습니다.

use std::sync::Arc;

use axum::{
    extract::{multipart::MultipartError, Multipart, Path, Query, State},
    http::{header, HeaderValue, StatusCode},
    response::IntoResponse,
    Json,
};
use serde_json::{json, Value};
use sqlx::SqlitePool;

use crate::{
    db,
    error::AppError,
    middleware::auth::AuthUser,
    models::*,
    services::storage::{generate_storage_key, key_extension, Storage},
};

/// 애플리케이션 공유 상태
///
/// 모든 요청 핸들러가 `State(state): State<AppState>`로 접근합니다.
/// SqlitePool과 Arc는 clone해도 같은 풀/저장소를 가리킵니다.
#[derive(Clone)]
pub struct AppState {
    /// SQLite 연결 풀
    pub pool: SqlitePool,
    /// 업로드 파일 저장소 (기본 구현: `LocalStorage`)
    pub storage: Arc<dyn Storage>,
    /// JWT 토큰 서명용 비밀키
    pub jwt_secret: String,
    /// 액세스 토큰 유효 시간(분)
    pub jwt_ttl_minutes: i64,
}

/// `GET /documents`: 호출자의 문서 목록을 페이지 단위로 조회합니다.
///
/// `tags=a,b`를 주면 a와 b를 **모두** 가진 문서만 돌려줍니다.
/// 응답: `{ "data": [...], "current_page", "last_page", "per_page", "total" }`
pub async fn list_documents(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Query(query): Query<ListQuery>,
) -> Result<Json<DocumentPage>, AppError> {
    let tags = query.tag_list();
    let page = db::list_documents(&state.pool, &auth_user.user_id, &tags, query.page()).await?;
    Ok(Json(page))
}

/// multipart 읽기 실패를 AppError로 바꿉니다.
///
/// 본문 크기 제한(DefaultBodyLimit)에 걸린 경우는 파일 크기 검증 에러로 돌려줍니다.
fn multipart_error(err: MultipartError) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::Validation(oversized_upload_errors())
    } else {
        AppError::BadRequest(err.body_text())
    }
}

/// multipart 본문을 읽어 `CreateDocumentForm`을 채웁니다.
///
/// 태그는 `tags[]`(반복)와 `tags` 두 이름을 모두 받습니다.
/// 알 수 없는 필드는 무시합니다.
async fn read_upload_form(mut multipart: Multipart) -> Result<CreateDocumentForm, AppError> {
    let mut form = CreateDocumentForm::default();
    let mut raw_tags = Vec::new();

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let field_name = field.name().unwrap_or_default().to_string();
        match field_name.as_str() {
            "name" => form.name = field.text().await.map_err(multipart_error)?,
            "tags[]" | "tags" => raw_tags.push(field.text().await.map_err(multipart_error)?),
            "file" => {
                form.file_name = field.file_name().map(str::to_string);
                form.file = Some(field.bytes().await.map_err(multipart_error)?.to_vec());
            }
            _ => {}
        }
    }

    form.name = form.name.trim().to_string();
    form.tags = normalize_tags(raw_tags);
    Ok(form)
}

/// `POST /documents`: 파일을 업로드하고 문서를 생성합니다.
///
/// 1. 입력 검증 (이름, 파일 크기, 태그 길이)
/// 2. 파일을 저장소에 먼저 기록: 실패하면 DB 레코드를 만들지 않음
/// 3. DB에 메타데이터 저장: 실패하면 방금 쓴 파일을 지움
pub async fn create_document(
    State(state): State<AppState>,
    auth_user: AuthUser,
    multipart: Multipart,
) -> Result<(StatusCode, Json<Document>), AppError> {
    let form = read_upload_form(multipart).await?;
    form.check()?;

    let bytes = form.file.as_deref().unwrap_or_default();
    let file_path = generate_storage_key(&auth_user.user_id, form.file_name.as_deref());

    state.storage.put(&file_path, bytes).await?;

    let id = uuid::Uuid::now_v7().to_string();
    let created = db::create_document(
        &state.pool,
        &id,
        &auth_user.user_id,
        &form.name,
        &form.tags,
        &file_path,
    )
    .await;

    let document = match created {
        Ok(document) => document,
        Err(e) => {
            // 메타데이터 없이 남는 파일을 만들지 않습니다.
            if let Err(cleanup) = state.storage.delete(&file_path).await {
                tracing::error!(storage_key = %file_path, error = %cleanup, "Failed to remove orphaned upload");
            }
            return Err(e);
        }
    };

    tracing::info!(
        document_id = %document.id,
        owner_id = %document.owner_id,
        size = bytes.len(),
        tags = document.tags.len(),
        "Document uploaded"
    );

    Ok((StatusCode::CREATED, Json(document)))
}

/// `GET /documents/{id}`: 호출자의 문서 하나를 조회합니다.
pub async fn get_document(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<Document>, AppError> {
    let document = db::get_document(&state.pool, &auth_user.user_id, &id)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(Json(document))
}

/// `PUT /documents/{id}`: 이름/태그를 부분 수정합니다.
///
/// - `{ "name": "새 이름" }` → 이름만 변경, 태그 유지
/// - `{ "tags": [] }` → 태그를 모두 지움
/// 파일과 소유자는 바뀌지 않습니다.
pub async fn update_document(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<String>,
    Json(req): Json<UpdateDocumentRequest>,
) -> Result<Json<Document>, AppError> {
    let req = req.normalized();
    req.check()?;

    let document = db::update_document(&state.pool, &auth_user.user_id, &id, &req)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(Json(document))
}

/// `DELETE /documents/{id}`: 저장된 파일과 문서 레코드를 삭제합니다.
///
/// 파일 삭제가 실패하면 레코드는 그대로 두고 에러를 돌려줍니다.
/// (파일이 이미 없던 경우는 실패로 보지 않습니다.)
pub async fn delete_document(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let document = db::get_document(&state.pool, &auth_user.user_id, &id)
        .await?
        .ok_or(AppError::NotFound)?;

    state.storage.delete(&document.file_path).await?;

    let deleted = db::delete_document(&state.pool, &auth_user.user_id, &id).await?;
    if !deleted {
        return Err(AppError::NotFound);
    }

    tracing::info!(document_id = %id, owner_id = %auth_user.user_id, "Document deleted");
    Ok(Json(json!({ "message": "Document deleted" })))
}

/// `GET /documents/{id}/download`: 저장된 파일을 내려받습니다.
///
/// 파일명은 문서 이름을 쓰고, 이름에 확장자가 없으면 저장된 파일의 확장자를 붙입니다.
/// 메타데이터는 있는데 파일이 없으면 404를 돌려줍니다.
pub async fn download_document(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let document = db::get_document(&state.pool, &auth_user.user_id, &id)
        .await?
        .ok_or(AppError::NotFound)?;

    let data = state.storage.get(&document.file_path).await?;

    let filename = download_filename(&document.name, &document.file_path);
    let disposition = HeaderValue::from_bytes(format!("attachment; filename=\"{}\"", filename).as_bytes())
        .map_err(|e| AppError::Internal(format!("Invalid Content-Disposition: {}", e)))?;
    let content_type = HeaderValue::from_static(content_type_for(&document.file_path));

    tracing::debug!(document_id = %id, size = data.len(), "Document download");

    Ok((
        [
            (header::CONTENT_TYPE, content_type),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        data,
    ))
}

/// 다운로드 파일명을 만듭니다.
///
/// 헤더 값에 들어갈 수 없는 제어 문자는 빼고, 따옴표와 역슬래시는 `_`로 바꿉니다.
pub fn download_filename(name: &str, file_path: &str) -> String {
    let mut filename: String = name
        .chars()
        .filter(|c| !c.is_control())
        .map(|c| if c == '"' || c == '\\' { '_' } else { c })
        .collect();

    if let Some(ext) = key_extension(file_path) {
        let has_extension = std::path::Path::new(&filename).extension().is_some();
        if !has_extension {
            filename.push('.');
            filename.push_str(ext);
        }
    }

    filename
}

/// 저장 키의 확장자로 Content-Type을 추정합니다.
fn content_type_for(file_path: &str) -> &'static str {
    match key_extension(file_path).map(|e| e.to_ascii_lowercase()).as_deref() {
        Some("pdf") => "application/pdf",
        Some("txt") => "text/plain; charset=utf-8",
        Some("md") => "text/markdown; charset=utf-8",
        Some("csv") => "text/csv; charset=utf-8",
        Some("json") => "application/json",
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("doc") => "application/msword",
        Some("docx") => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        Some("xlsx") => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        Some("zip") => "application/zip",
        _ => "application/octet-stream",
    }
}
