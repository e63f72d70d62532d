//! # 서버 설정
//!
//! 모든 값은 환경변수에서 읽습니다. (`.env`는 main에서 먼저 로딩)
//!
//! | 변수 | 필수 | 기본값 |
//! |------|------|--------|
//! | `DATABASE_URL` | O | |
//! | `JWT_SECRET` | O | |
//! | `STORAGE_PATH` | | `data/storage` |
//! | `HOST` | | `0.0.0.0` |
//! | `PORT` | | `3000` |
//! | `JWT_TTL_MINUTES` | | `60` |

use std::{env, str::FromStr};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable {0}")]
    Missing(&'static str),
}

#[derive(Debug, Clone)]
pub struct Config {
    /// 예: `sqlite:data/docshelf.db?mode=rwc`
    pub database_url: String,
    pub jwt_secret: String,
    /// 업로드 파일 저장 루트
    pub storage_path: String,
    pub host: String,
    pub port: u16,
    /// 액세스 토큰 유효 시간(분)
    pub jwt_ttl_minutes: i64,
}

fn required(key: &'static str) -> Result<String, ConfigError> {
    env::var(key)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .ok_or(ConfigError::Missing(key))
}

/// 값이 없거나 해석에 실패하면 기본값을 씁니다.
fn optional<T: FromStr>(key: &str, default: T) -> T {
    match env::var(key) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
            tracing::warn!(key, value = %raw, "Unparsable config value, using default");
            default
        }),
        Err(_) => default,
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let jwt_ttl_minutes = optional("JWT_TTL_MINUTES", 60i64);
        Ok(Self {
            database_url: required("DATABASE_URL")?,
            jwt_secret: required("JWT_SECRET")?,
            storage_path: optional("STORAGE_PATH", "data/storage".to_string()),
            host: optional("HOST", "0.0.0.0".to_string()),
            port: optional("PORT", 3000u16),
            jwt_ttl_minutes: if jwt_ttl_minutes > 0 { jwt_ttl_minutes } else { 60 },
        })
    }

    /// 바인딩 주소 `host:port`
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
