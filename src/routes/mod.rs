//! # 라우트 핸들러 모듈
//!
//! HTTP 요청을 처리하는 핸들러 함수들과 라우터 조립 함수(`app`)를 모아둔 모듈입니다.
//!
//! 각 하위 모듈:
//! - `auth`: 회원가입, 로그인, 내 정보
//! - `documents`: 문서 업로드/조회/수정/삭제/다운로드 (+ `AppState`)
//! - `health`: 서버 상태 확인
//! - `tags`: 내 문서들의 태그 집계

pub mod auth;
pub mod documents;
pub mod health;
pub mod tags;

// 핸들러를 `routes::list_documents`처럼 바로 쓸 수 있도록 재공개합니다.
// auth는 `auth::login`처럼 모듈 이름을 붙여 씁니다.
pub use documents::*;
pub use health::*;
pub use tags::*;

use axum::{
    extract::DefaultBodyLimit, // 요청 본문 크기 제한 레이어
    routing::{get, post},      // HTTP 메서드별 라우팅 함수
    Router,                    // URL 경로와 핸들러를 연결하는 라우터
};
use tower_http::{
    cors::{Any, CorsLayer}, // CORS(Cross-Origin Resource Sharing) 설정
    trace::TraceLayer,      // HTTP 요청/응답 로깅 미들웨어
};

use crate::models::MAX_FILE_BYTES;

/// multipart 본문 전체 크기 제한
///
/// 파일 10MB에 이름/태그 필드와 multipart 경계 문자열이 더해지므로 약간의 여유를 둡니다.
/// 이 크기를 넘는 업로드는 파일 크기 검증 에러(422)로 응답합니다.
pub const MAX_BODY_BYTES: usize = MAX_FILE_BYTES + 512 * 1024;

/// 전체 애플리케이션 라우터를 조립합니다.
///
/// 모든 API는 `/api` 아래에 있습니다. (예: `/api/documents`)
/// main.rs와 통합 테스트가 같은 함수를 사용합니다.
pub fn app(state: AppState) -> Router {
    let api_routes = Router::new()
        // 인증 (토큰 불필요)
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/me", get(auth::me))
        // 문서 CRUD: 모든 핸들러가 AuthUser로 Bearer 토큰을 요구합니다.
        .route("/documents", get(list_documents).post(create_document))
        .route(
            "/documents/{id}",
            get(get_document).put(update_document).delete(delete_document),
        )
        .route("/documents/{id}/download", get(download_document))
        // 태그 자동완성/필터 후보
        .route("/documents-tags", get(list_document_tags))
        // 인증 없이 호출 가능
        .route("/health", get(health_check))
        // axum 기본 제한(2MB)으로는 10MB 업로드를 받을 수 없으므로 늘립니다.
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        // .with_state(): 모든 핸들러에 AppState를 주입합니다.
        .with_state(state);

    // 개발 환경 기준으로 모든 출처를 허용합니다.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // .layer()는 나중에 추가한 것이 바깥쪽에서 먼저 실행됩니다.
    // 요청 → TraceLayer → CORS → 라우터 → 핸들러
    Router::new()
        .nest("/api", api_routes) // 모든 경로 앞에 /api를 붙입니다.
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
