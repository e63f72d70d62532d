//! # 사용자 모델
//!
//! 계정은 이름과 비밀번호만 가집니다. 이름은 전체 사용자 중 유일합니다.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// `users` 테이블 한 행. 비밀번호 해시는 응답에 절대 나가지 않습니다.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct User {
    pub id: String,
    pub name: String,
    pub password_hash: String,
    pub created_at: String,
    pub updated_at: String,
}

/// 외부에 보여주는 사용자 정보
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: String,
    pub name: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        let User {
            id,
            name,
            created_at,
            updated_at,
            ..
        } = user;
        Self {
            id,
            name,
            created_at,
            updated_at,
        }
    }
}

/// 회원가입과 로그인이 같이 쓰는 요청 본문 `{ "name", "password" }`
///
/// 검증 규칙은 회원가입에만 적용합니다. 로그인은 형식과 상관없이
/// 일치 여부만 보고 실패하면 항상 같은 401을 돌려줍니다.
#[derive(Debug, Deserialize, Validate)]
pub struct Credentials {
    #[validate(length(min = 1, max = 255, message = "The name field is required."))]
    pub name: String,
    #[validate(length(min = 4, message = "The password must be at least 4 characters."))]
    pub password: String,
}

impl Credentials {
    /// 이름 앞뒤 공백을 제거합니다. 비밀번호는 그대로 둡니다.
    pub fn normalized(self) -> Self {
        Self {
            name: self.name.trim().to_string(),
            password: self.password,
        }
    }
}

/// `201 { "message": "User created successfully", "user": {...} }`
#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub message: String,
    pub user: UserResponse,
}

/// `200 { "token": "...", "user": {...} }`
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: UserResponse,
}
