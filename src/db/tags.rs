//! # 태그 집계 쿼리 모듈
//!
//! 태그는 별도 테이블이 없고 `documents.tags` JSON 배열 안에만 존재합니다.
//! 사용자별 "서로 다른 태그 목록"은 저장하지 않고 매번 계산합니다.

use crate::error::AppError;
use sqlx::SqlitePool;

/// 소유자의 모든 문서에서 서로 다른 태그를 모읍니다.
///
/// `json_each(d.tags)`는 문서마다 배열 원소를 행으로 펼칩니다.
/// - 빈 배열인 문서는 행을 만들지 않으므로 자연스럽게 빠집니다.
/// - 문자열이 아닌 원소(`null`, 숫자 등)와 빈 문자열은 제외합니다.
///
/// 결과 순서는 보장하지 않습니다. 화면에 보여줄 때는 호출하는 쪽에서 정렬하세요.
pub async fn list_distinct_tags(pool: &SqlitePool, owner_id: &str) -> Result<Vec<String>, AppError> {
    let tags = sqlx::query_scalar::<_, String>(
        r#"
        SELECT DISTINCT j.value
        FROM documents d, json_each(d.tags) j
        WHERE d.owner_id = ?
          AND j.type = 'text'
          AND j.value <> ''
        "#,
    )
    .bind(owner_id)
    .fetch_all(pool)
    .await?;

    Ok(tags)
}
