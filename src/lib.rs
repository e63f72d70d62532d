//! # docshelf
//!
//! 개인 문서 보관함 백엔드와 클라이언트 상태 모델입니다.
//! 사용자는 회원가입/로그인 후 파일을 업로드하고, 태그를 붙이고,
//! 태그(AND 조건)로 목록을 걸러 보고, 내려받거나 삭제할 수 있습니다.
//!
//! 모듈 구성:
//! - `config`: 환경변수 설정
//! - `db`: SQLite 쿼리 (소유자 범위 문서 CRUD, 태그 집계, 사용자)
//! - `error`: `AppError`와 HTTP 응답 변환
//! - `middleware`: JWT 발급/검증, `AuthUser` 추출기
//! - `models`: 요청/응답 구조체, 태그 정규화, 페이지 계산
//! - `routes`: axum 핸들러와 라우터 조립
//! - `services`: 파일 저장소
//! - `client`: 브라우저 쪽 상태 모델 (필터 상태 머신, 태그 입력 위젯)

pub mod client;
pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;

pub use routes::{app, AppState};
