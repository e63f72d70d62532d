//! # 미들웨어 / 추출기
//!
//! - `auth`: JWT 발급·검증과 Bearer 토큰 추출기(`AuthUser`)

pub mod auth;
