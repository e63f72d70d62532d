//! # 문서 데이터베이스 쿼리 모듈
//!
//! `documents` 테이블에 대한 CRUD 쿼리 함수들입니다.
//!
//! 모든 함수는 호출자의 사용자 ID(`owner_id`)를 필수로 받습니다.
//! 단일 문서 조회/수정/삭제는 `WHERE id = ? AND owner_id = ?` 한 조건으로
//! 존재 여부와 소유권을 함께 확인하므로, 다른 사용자의 문서는
//! "없는 문서"와 구분되지 않습니다.

use crate::error::AppError;
use crate::models::*;
use sqlx::{types::Json, QueryBuilder, Sqlite, SqlitePool};

const DOCUMENT_COLUMNS: &str = "id, owner_id, name, tags, file_path, created_at, updated_at";

/// 소유자 조건과 태그(AND) 조건을 WHERE 절로 붙입니다.
///
/// 태그마다 `EXISTS (SELECT 1 FROM json_each(documents.tags) ...)`를 하나씩
/// AND로 연결하므로, 요청한 태그를 **모두** 가진 문서만 남습니다.
/// 비교는 SQLite 기본(BINARY) 비교라서 대소문자를 구분합니다.
fn push_filters(qb: &mut QueryBuilder<'_, Sqlite>, owner_id: &str, tags: &[String]) {
    qb.push(" WHERE owner_id = ").push_bind(owner_id.to_string());
    for tag in tags {
        qb.push(" AND EXISTS (SELECT 1 FROM json_each(documents.tags) WHERE json_each.value = ")
            .push_bind(tag.clone())
            .push(")");
    }
}

/// 소유자의 문서 목록을 페이지 단위로 조회합니다.
///
/// # 매개변수
/// - `owner_id`: 인증된 호출자 ID
/// - `tags`: 필터 태그. 비어 있으면 전체 문서
/// - `page`: 1부터 시작하는 페이지 번호
///
/// 정렬은 삽입 순서(rowid)입니다. 마지막 페이지를 넘는 요청은
/// 빈 목록과 실제 개수 기준의 메타데이터를 돌려줍니다.
pub async fn list_documents(
    pool: &SqlitePool,
    owner_id: &str,
    tags: &[String],
    page: u32,
) -> Result<DocumentPage, AppError> {
    // ── 1) 전체 개수: last_page 계산용 ──
    // QueryBuilder는 push_bind로 값을 `?` 자리표시자에 바인딩하므로 SQL 인젝션이 없습니다.
    let mut count_query = QueryBuilder::<Sqlite>::new("SELECT COUNT(*) FROM documents");
    push_filters(&mut count_query, owner_id, tags);
    let total: i64 = count_query.build_query_scalar().fetch_one(pool).await?;

    // ── 2) 현재 페이지의 행 ──
    // 같은 WHERE 절을 다시 붙여 개수와 목록의 조건이 항상 일치합니다.
    let mut list_query = QueryBuilder::<Sqlite>::new(format!("SELECT {} FROM documents", DOCUMENT_COLUMNS));
    push_filters(&mut list_query, owner_id, tags);
    list_query
        .push(" ORDER BY rowid LIMIT ")
        .push_bind(i64::from(PER_PAGE))
        .push(" OFFSET ")
        .push_bind(page_offset(page, PER_PAGE));

    let rows = list_query
        .build_query_as::<DocumentRow>()
        .fetch_all(pool)
        .await?;

    let data = rows.into_iter().map(Document::from).collect();
    Ok(DocumentPage::new(data, page, PER_PAGE, total))
}

/// 소유자의 문서 하나를 조회합니다.
///
/// # 반환값
/// - `Ok(Some(Document))`: 호출자 소유의 문서
/// - `Ok(None)`: 없거나 다른 사용자의 문서
pub async fn get_document(
    pool: &SqlitePool,
    owner_id: &str,
    id: &str,
) -> Result<Option<Document>, AppError> {
    let row = sqlx::query_as::<_, DocumentRow>(&format!(
        "SELECT {} FROM documents WHERE id = ? AND owner_id = ?",
        DOCUMENT_COLUMNS
    ))
    .bind(id)
    .bind(owner_id)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(Document::from))
}

/// 새 문서 레코드를 저장합니다.
///
/// 파일은 호출 전에 이미 저장소에 써 둔 상태여야 합니다.
pub async fn create_document(
    pool: &SqlitePool,
    id: &str,
    owner_id: &str,
    name: &str,
    tags: &[String],
    file_path: &str,
) -> Result<Document, AppError> {
    sqlx::query(
        r#"
        INSERT INTO documents (id, owner_id, name, tags, file_path)
        VALUES (?, ?, ?, ?, ?)
        "#,
    )
    .bind(id)
    .bind(owner_id)
    .bind(name)
    .bind(Json(tags)) // Vec<String> → '["a","b"]' 텍스트
    .bind(file_path)
    .execute(pool)
    .await?;

    get_document(pool, owner_id, id)
        .await?
        .ok_or(AppError::Internal("Failed to retrieve created document".to_string()))
}

/// 문서의 이름/태그를 부분 수정합니다.
///
/// `COALESCE(?, column)`: 바인딩 값이 NULL(=요청에 필드 없음)이면 기존 값을 유지합니다.
/// 읽기-수정-쓰기를 UPDATE 한 문장으로 처리하므로, 동시에 삭제가 일어나면
/// 영향받은 행이 0이 되어 `None`을 돌려줍니다.
/// file_path와 owner_id는 건드리지 않습니다.
pub async fn update_document(
    pool: &SqlitePool,
    owner_id: &str,
    id: &str,
    req: &UpdateDocumentRequest,
) -> Result<Option<Document>, AppError> {
    let result = sqlx::query(
        r#"
        UPDATE documents
        SET name = COALESCE(?, name),
            tags = COALESCE(?, tags),
            updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
        WHERE id = ? AND owner_id = ?
        "#,
    )
    .bind(req.name.as_deref())
    .bind(req.tags.as_ref().map(Json))
    .bind(id)
    .bind(owner_id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Ok(None);
    }

    get_document(pool, owner_id, id).await
}

/// 문서 레코드를 삭제합니다.
///
/// # 반환값
/// - `Ok(true)`: 삭제됨
/// - `Ok(false)`: 없거나 다른 사용자의 문서
pub async fn delete_document(pool: &SqlitePool, owner_id: &str, id: &str) -> Result<bool, AppError> {
    let result = sqlx::query("DELETE FROM documents WHERE id = ? AND owner_id = ?")
        .bind(id)
        .bind(owner_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}
