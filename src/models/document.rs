//! # 문서 모델 정의
//!
//! 문서(Document) 엔티티와 요청/응답 구조체, 그리고 태그 정규화와
//! 페이지 계산 같은 순수 로직을 정의합니다.

use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use validator::{Validate, ValidationError, ValidationErrors};

/// 한 페이지당 문서 수 (서버 고정값)
pub const PER_PAGE: u32 = 10;
/// 태그 하나의 최대 길이 (문자 수)
pub const MAX_TAG_LEN: usize = 100;
/// 업로드 파일 최대 크기 (10MB = 10240KiB)
pub const MAX_FILE_BYTES: usize = 10 * 1024 * 1024;
/// 목록 쿼리(`tags=a,b`)와 URL에서 태그를 나누는 구분자. 태그 안에는 쓸 수 없습니다.
pub const TAG_SEPARATOR: char = ',';

/// 문서 엔티티: API 응답 형태
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    pub owner_id: String,
    pub name: String,
    pub tags: Vec<String>,
    pub file_path: String,
    pub created_at: String,
    pub updated_at: String,
}

/// `documents` 테이블 한 행
///
/// tags 컬럼은 JSON 배열 텍스트이므로 `sqlx::types::Json`으로 디코딩합니다.
/// NULL이 들어 있어도 에러 없이 빈 배열로 처리하도록 Option으로 받고,
/// 원소는 `Value`로 받아 문자열이 아닌 값(숫자, null 등)이 섞여 있어도 행 전체가 깨지지 않게 합니다.
#[derive(Debug, sqlx::FromRow)]
pub struct DocumentRow {
    pub id: String,
    pub owner_id: String,
    pub name: String,
    pub tags: Option<Json<Vec<serde_json::Value>>>,
    pub file_path: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<DocumentRow> for Document {
    fn from(row: DocumentRow) -> Self {
        Self {
            id: row.id,
            owner_id: row.owner_id,
            name: row.name,
            tags: row
                .tags
                .map(|Json(values)| stored_tags(values))
                .unwrap_or_default(),
            file_path: row.file_path,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// 업로드(multipart) 요청에서 모은 값
///
/// multipart는 `Json`처럼 한 번에 역직렬화되지 않으므로, 핸들러가 필드를
/// 하나씩 읽어 이 구조체를 채운 뒤 `validate()`를 호출합니다.
#[derive(Debug, Default, Validate)]
pub struct CreateDocumentForm {
    #[validate(length(min = 1, max = 255, message = "The name field is required and may not be greater than 255 characters."))]
    pub name: String,
    pub tags: Vec<String>,
    pub file_name: Option<String>,
    pub file: Option<Vec<u8>>,
}

impl CreateDocumentForm {
    /// 이름/태그/파일을 모두 검사하여 하나의 `ValidationErrors`로 모읍니다.
    pub fn check(&self) -> Result<(), ValidationErrors> {
        let mut errors = self.validate().err().unwrap_or_else(ValidationErrors::new);
        collect_tag_errors(&self.tags, &mut errors);
        match &self.file {
            None => errors.add("file", message_error("required", "The file field is required.")),
            Some(bytes) if bytes.len() > MAX_FILE_BYTES => {
                errors.add("file", file_too_large_error())
            }
            Some(_) => {}
        }
        into_result(errors)
    }
}

/// 문서 수정 요청: `PUT /documents/{id}`의 요청 본문
///
/// 두 필드 모두 Option입니다.
/// - 필드 누락(또는 null) → `None` → 기존 값 유지
/// - `"tags": []` → `Some(vec![])` → 태그를 모두 지움
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateDocumentRequest {
    #[validate(length(min = 1, max = 255, message = "The name field is required and may not be greater than 255 characters."))]
    pub name: Option<String>,
    pub tags: Option<Vec<String>>,
}

impl UpdateDocumentRequest {
    /// 이름 앞뒤 공백 제거와 태그 정규화를 적용합니다.
    pub fn normalized(self) -> Self {
        Self {
            name: self.name.map(|n| n.trim().to_string()),
            tags: self.tags.map(normalize_tags),
        }
    }

    pub fn check(&self) -> Result<(), ValidationErrors> {
        let mut errors = self.validate().err().unwrap_or_else(ValidationErrors::new);
        if let Some(tags) = &self.tags {
            collect_tag_errors(tags, &mut errors);
        }
        into_result(errors)
    }
}

/// 문서 목록 쿼리 파라미터: `GET /documents?tags=a,b&page=2`
///
/// page를 문자열로 받는 이유: `page=abc`처럼 숫자가 아니어도
/// 400 대신 1페이지로 처리하기 위해서입니다.
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub tags: Option<String>,
    pub page: Option<String>,
}

impl ListQuery {
    /// 쉼표로 구분된 태그 목록 (공백 제거, 빈 값/중복 제거)
    pub fn tag_list(&self) -> Vec<String> {
        self.tags.as_deref().map(parse_tag_list).unwrap_or_default()
    }

    /// 요청 페이지 번호. 없거나 잘못된 값이면 1.
    pub fn page(&self) -> u32 {
        parse_page(self.page.as_deref())
    }
}

/// 페이지네이션된 문서 목록 응답
///
/// `data`는 현재 페이지의 문서들, 나머지는 페이지 메타데이터입니다.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentPage {
    pub data: Vec<Document>,
    pub current_page: u32,
    pub last_page: u32,
    pub per_page: u32,
    pub total: i64,
}

impl DocumentPage {
    /// 전체 개수로부터 페이지 메타데이터를 계산합니다.
    ///
    /// 마지막 페이지를 넘는 요청은 current_page를 그대로 두고
    /// 빈 data를 돌려줍니다.
    pub fn new(data: Vec<Document>, current_page: u32, per_page: u32, total: i64) -> Self {
        Self {
            data,
            current_page,
            last_page: last_page(total, per_page),
            per_page,
            total,
        }
    }
}

/// 저장된 JSON 배열에서 비어 있지 않은 문자열 태그만 남깁니다.
fn stored_tags(values: Vec<serde_json::Value>) -> Vec<String> {
    values
        .into_iter()
        .filter_map(|v| match v {
            serde_json::Value::String(tag) if !tag.is_empty() => Some(tag),
            _ => None,
        })
        .collect()
}

/// 마지막 페이지 번호. 문서가 없어도 1입니다.
pub fn last_page(total: i64, per_page: u32) -> u32 {
    let per_page = i64::from(per_page.max(1));
    let pages = (total.max(0) + per_page - 1) / per_page;
    u32::try_from(pages.max(1)).unwrap_or(u32::MAX)
}

/// 페이지 번호의 시작 오프셋 (SQL OFFSET)
pub fn page_offset(page: u32, per_page: u32) -> i64 {
    i64::from(page.max(1) - 1) * i64::from(per_page)
}

/// 쿼리 문자열의 page 값을 해석합니다. 1 미만이거나 숫자가 아니면 1.
pub fn parse_page(raw: Option<&str>) -> u32 {
    raw.and_then(|p| p.trim().parse::<u32>().ok())
        .filter(|p| *p >= 1)
        .unwrap_or(1)
}

/// `"a, b,,a"` → `["a", "b"]`
pub fn parse_tag_list(raw: &str) -> Vec<String> {
    normalize_tags(raw.split(TAG_SEPARATOR).map(str::to_string))
}

/// 태그 목록을 정규화합니다.
///
/// 앞뒤 공백을 제거하고, 빈 문자열과 중복을 없앱니다. (처음 나온 순서 유지)
/// 대소문자는 구분합니다: "Finance"와 "finance"는 다른 태그입니다.
pub fn normalize_tags<I>(tags: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let mut out: Vec<String> = Vec::new();
    for tag in tags {
        let tag = tag.trim();
        if !tag.is_empty() && !out.iter().any(|t| t == tag) {
            out.push(tag.to_string());
        }
    }
    out
}

/// 구분자가 들어간 태그는 필터로 다시 찾을 수 없으므로 허용하지 않습니다.
pub fn is_valid_tag(tag: &str) -> bool {
    !tag.trim().is_empty() && !tag.contains(TAG_SEPARATOR)
}

fn collect_tag_errors(tags: &[String], errors: &mut ValidationErrors) {
    if tags.iter().any(|t| t.chars().count() > MAX_TAG_LEN) {
        errors.add(
            "tags",
            message_error("length", "Each tag may not be greater than 100 characters."),
        );
    }
    if tags.iter().any(|t| t.contains(TAG_SEPARATOR)) {
        errors.add(
            "tags",
            message_error("separator", "Tags may not contain a comma."),
        );
    }
}

fn file_too_large_error() -> ValidationError {
    message_error("max_size", "The file may not be greater than 10240 kilobytes.")
}

/// 업로드 본문이 제한을 넘어 multipart 파싱이 중단된 경우의 검증 에러
pub fn oversized_upload_errors() -> ValidationErrors {
    let mut errors = ValidationErrors::new();
    errors.add("file", file_too_large_error());
    errors
}

fn message_error(code: &'static str, message: &'static str) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(message.into());
    error
}

fn into_result(errors: ValidationErrors) -> Result<(), ValidationErrors> {
    if errors.errors().is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
