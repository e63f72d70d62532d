//! # 태그 API 라우트 핸들러
//!
//! | 메서드 | 경로 | 핸들러 | 설명 |
//! |--------|------|--------|------|
//! | GET | /api/documents-tags | `list_document_tags` | 내 문서들의 서로 다른 태그 목록 |
//!
//! 태그 입력 위젯의 자동완성 후보와 목록 화면의 필터 선택지로 쓰입니다.

use crate::{db, error::AppError, middleware::auth::AuthUser, routes::documents::AppState};
use axum::{extract::State, Json};

/// 호출자의 문서들에 붙은 태그를 중복 없이 돌려줍니다.
///
/// `GET /api/documents-tags` → `["2024", "finance", ...]`
///
/// DB 쿼리는 순서를 보장하지 않으므로 화면 표시용으로 여기서 정렬합니다.
pub async fn list_document_tags(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<Json<Vec<String>>, AppError> {
    let mut tags = db::list_distinct_tags(&state.pool, &auth_user.user_id).await?;
    tags.sort();
    Ok(Json(tags))
}
