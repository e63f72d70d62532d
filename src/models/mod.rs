//! # 데이터 모델 모듈
//!
//! 애플리케이션에서 사용하는 데이터 구조체(struct)들을 정의합니다.
//! - `document`: 문서, 목록 쿼리, 페이지 응답, 태그 정규화
//! - `user`: 사용자와 인증 요청/응답
//!
//! `pub use X::*;`로 재공개하여 `crate::models::Document`처럼 짧게 씁니다.

pub mod document;
pub mod user;

pub use document::*;
pub use user::*;
