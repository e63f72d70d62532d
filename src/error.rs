//! # 에러 처리 모듈
//!
//! 애플리케이션에서 발생할 수 있는 모든 에러 타입을 정의합니다.
//!
//! 이 모듈의 핵심:
//! - `AppError` 열거형(enum): 모든 에러 종류를 하나의 타입으로 통합
//! - `IntoResponse` 구현: 에러를 HTTP 응답으로 자동 변환
//!
//! 응답 본문 형식:
//! ```json
//! { "error": { "code": "not_found", "message": "Resource not found" } }
//! ```
//! 검증 에러는 `"fields": { "name": ["..."] }`가 추가됩니다.

use std::collections::BTreeMap; // 필드 이름순으로 정렬된 맵 (응답 JSON 순서 고정)

use axum::{
    http::StatusCode,                    // HTTP 상태 코드 (200, 404, 500 등)
    response::{IntoResponse, Response}, // 타입을 HTTP 응답으로 변환하는 트레이트
    Json,                               // JSON 응답 래퍼
};
use serde_json::json; // json! 매크로: JSON 리터럴을 간편하게 만듭니다
use thiserror::Error; // #[derive(Error)]: Display와 std::error::Error를 자동 구현

use crate::services::storage::StorageError; // 파일 저장소 에러

/// 애플리케이션에서 발생할 수 있는 모든 에러 종류
///
/// 핸들러에서 `Result<T, AppError>`를 반환하면,
/// Axum이 자동으로 `IntoResponse`를 호출하여 HTTP 응답으로 변환합니다.
#[derive(Debug, Error)]
pub enum AppError {
    /// 리소스가 없거나 호출자의 소유가 아님 (HTTP 404)
    ///
    /// 두 경우를 구분하지 않습니다. 다른 사용자의 문서 ID를 넣어도
    /// 존재하지 않는 ID와 똑같은 응답을 받습니다.
    #[error("Resource not found")]
    NotFound,

    /// 잘못된 요청 (HTTP 400)
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// 필드 검증 실패 (HTTP 422)
    /// #[from]: `req.validate()?`로 바로 전파할 수 있습니다.
    #[error("Validation failed: {0}")]
    Validation(#[from] validator::ValidationErrors),

    /// 인증 실패 (HTTP 401)
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// 리소스 충돌 (HTTP 409)
    #[error("Conflict: {0}")]
    Conflict(String),

    /// 파일 저장소 오류
    /// 파일이 없으면 404, 그 외에는 500으로 변환됩니다.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// 서버 내부 오류 (HTTP 500)
    #[error("Internal error: {0}")]
    Internal(String),

    /// 데이터베이스 오류 (HTTP 500)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// `ValidationErrors`를 `{ 필드명: [메시지, ...] }` 형태로 펼칩니다.
///
/// 메시지가 지정되지 않은 검증 규칙은 규칙 코드(예: "length")를 그대로 씁니다.
pub fn field_messages(errors: &validator::ValidationErrors) -> BTreeMap<String, Vec<String>> {
    errors
        .field_errors()
        .into_iter()
        .map(|(field, errs)| {
            let messages = errs
                .iter()
                .map(|e| {
                    e.message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| e.code.to_string())
                })
                .collect();
            (field.to_string(), messages)
        })
        .collect()
}

impl IntoResponse for AppError {
    /// AppError를 HTTP 응답으로 변환합니다.
    ///
    /// 내부 에러(Database, Internal, Storage)는 실제 에러 내용을 로그에만 기록하고,
    /// 클라이언트에는 일반적인 메시지만 반환합니다.
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            // 검증 에러는 필드별 메시지를 함께 돌려줘야 하므로 바로 반환합니다.
            AppError::Validation(ref errors) => {
                let body = Json(json!({
                    "error": {
                        "code": "validation_error",
                        "message": "The given data was invalid.",
                        "fields": field_messages(errors),
                    }
                }));
                return (StatusCode::UNPROCESSABLE_ENTITY, body).into_response();
            }
            AppError::NotFound => (StatusCode::NOT_FOUND, "not_found", self.to_string()),
            AppError::BadRequest(ref msg) => {
                (StatusCode::BAD_REQUEST, "bad_request", msg.clone())
            }
            AppError::Unauthorized(ref msg) => {
                (StatusCode::UNAUTHORIZED, "unauthorized", msg.clone())
            }
            AppError::Conflict(ref msg) => (StatusCode::CONFLICT, "conflict", msg.clone()),
            AppError::Storage(StorageError::NotFound(ref key)) => {
                // 메타데이터는 있는데 파일이 사라진 경우
                tracing::warn!(storage_key = %key, "Stored file is missing");
                (
                    StatusCode::NOT_FOUND,
                    "file_not_found",
                    "Stored file not found".to_string(),
                )
            }
            AppError::Storage(ref e) => {
                tracing::error!("Storage error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "storage_error",
                    "A storage error occurred".to_string(),
                )
            }
            AppError::Internal(ref msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "An internal error occurred".to_string(),
                )
            }
            AppError::Database(ref e) => {
                tracing::error!("Database error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "database_error",
                    "A database error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::{ValidationError, ValidationErrors};

    #[test]
    fn field_messages_prefer_custom_message_over_code() {
        let mut errors = ValidationErrors::new();
        let mut with_message = ValidationError::new("length");
        with_message.message = Some("Name is required".into());
        errors.add("name", with_message);
        errors.add("tags", ValidationError::new("tag_length"));

        let fields = field_messages(&errors);
        assert_eq!(fields["name"], vec!["Name is required".to_string()]);
        assert_eq!(fields["tags"], vec!["tag_length".to_string()]);
    }

    #[test]
    fn missing_stored_file_maps_to_404() {
        let response =
            AppError::Storage(StorageError::NotFound("documents/u/x.pdf".into())).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn database_error_is_hidden_behind_500() {
        let response = AppError::Database(sqlx::Error::RowNotFound).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
