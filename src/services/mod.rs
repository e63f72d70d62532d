//! # 서비스 계층
//!
//! 데이터베이스 밖의 작업(파일 저장소 등)을 담당하는 모듈입니다.
//! - `storage`: 업로드 파일을 디스크에 저장/조회/삭제

pub mod storage;

pub use storage::*;
