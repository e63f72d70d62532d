//! # 데이터베이스 접근 계층 (Data Access Layer)
//!
//! 데이터베이스와 직접 상호작용하는 함수들을 모아둔 모듈입니다.
//! 라우트 핸들러(routes/)에서 이 모듈의 함수를 호출하여 DB 작업을 수행합니다.
//!
//! 각 하위 모듈:
//! - `documents`: 소유자 범위의 문서 CRUD와 태그(AND) 필터 + 페이지 조회
//! - `tags`: 사용자별 태그 집계
//! - `users`: 사용자 인증 관련 쿼리

pub mod documents;
pub mod tags;
pub mod users;

pub use documents::*;
pub use tags::*;

/// `migrations/` 폴더의 SQL을 컴파일 타임에 포함한 마이그레이터
///
/// 서버 시작 시(main.rs)와 테스트의 인메모리 DB 준비에 같이 씁니다.
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");
