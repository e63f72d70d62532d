//! # JWT 인증
//!
//! 로그인 시 HS256 액세스 토큰을 발급하고, 보호된 라우트에서는
//! `Authorization: Bearer <token>` 헤더를 `AuthUser` 추출기로 검증합니다.
//!
//! 토큰의 `sub`가 사용자 ID이며, 모든 문서 쿼리의 소유자 조건이 됩니다.

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use chrono::{Duration, Utc};
use jsonwebtoken::{errors::ErrorKind, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use serde_json::json;
use thiserror::Error;

use crate::routes::documents::AppState;

/// 토큰 페이로드
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    /// 사용자 ID
    pub sub: String,
    pub iat: i64,
    pub exp: i64,
}

/// 토큰 검증에 성공한 호출자
///
/// 핸들러 매개변수에 넣으면 검증이 끝난 뒤에만 핸들러가 실행됩니다.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: String,
}

#[derive(Debug, Error, PartialEq)]
pub enum AuthError {
    #[error("Authorization token is required")]
    MissingToken,
    #[error("Invalid authorization token")]
    InvalidToken,
    #[error("Authorization token has expired")]
    ExpiredToken,
}

impl AuthError {
    fn code(&self) -> &'static str {
        match self {
            AuthError::MissingToken => "missing_token",
            AuthError::InvalidToken => "invalid_token",
            AuthError::ExpiredToken => "expired_token",
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let body = Json(json!({
            "error": {
                "code": self.code(),
                "message": self.to_string()
            }
        }));
        (StatusCode::UNAUTHORIZED, body).into_response()
    }
}

/// `Authorization` 헤더에서 Bearer 토큰을 꺼냅니다.
///
/// 스킴 이름은 대소문자를 구분하지 않습니다. (`bearer xyz`도 허용)
fn bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    let value = headers
        .get(AUTHORIZATION)
        .ok_or(AuthError::MissingToken)?
        .to_str()
        .map_err(|_| AuthError::InvalidToken)?;

    match value.split_once(' ') {
        Some((scheme, token)) if scheme.eq_ignore_ascii_case("bearer") && !token.trim().is_empty() => {
            Ok(token.trim())
        }
        _ => Err(AuthError::InvalidToken),
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = bearer_token(&parts.headers)?;
        let claims = verify_access_token(token, &state.jwt_secret)?;
        Ok(AuthUser { user_id: claims.sub })
    }
}

/// 액세스 토큰을 발급합니다. `ttl_minutes` 뒤에 만료됩니다.
pub fn create_access_token(
    user_id: &str,
    secret: &str,
    ttl_minutes: i64,
) -> Result<String, jsonwebtoken::errors::Error> {
    let issued_at = Utc::now();
    let claims = Claims {
        sub: user_id.to_string(),
        iat: issued_at.timestamp(),
        exp: (issued_at + Duration::minutes(ttl_minutes)).timestamp(),
    };
    jsonwebtoken::encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
}

/// 서명과 만료 시각을 검증하고 페이로드를 돌려줍니다.
pub fn verify_access_token(token: &str, secret: &str) -> Result<Claims, AuthError> {
    jsonwebtoken::decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|e| match e.kind() {
        ErrorKind::ExpiredSignature => AuthError::ExpiredToken,
        _ => AuthError::InvalidToken,
    })
}
