//! # 인증 API 라우트 핸들러
//!
//! | 메서드 | 경로 | 설명 |
//! |--------|------|------|
//! | POST | /api/register | 회원가입 (201) |
//! | POST | /api/login | 로그인 → 액세스 토큰 |
//! | GET | /api/me | 토큰 주인의 정보 |

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use axum::{extract::State, http::StatusCode, Json};
use validator::Validate;

use crate::{
    db::users,
    error::AppError,
    middleware::auth::{create_access_token, AuthUser},
    models::user::{Credentials, LoginResponse, RegisterResponse, UserResponse},
    routes::documents::AppState,
};

/// Argon2id 해시 문자열(PHC 형식)을 만듭니다. 솔트는 매번 새로 생성합니다.
pub fn hash_password(password: &str) -> Result<String, AppError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::Internal(format!("Password hashing failed: {}", e)))
}

/// 저장된 해시와 비밀번호가 일치하는지 확인합니다.
///
/// 해시 문자열 자체가 깨져 있으면 불일치가 아니라 내부 에러입니다.
pub fn verify_password(password: &str, stored_hash: &str) -> Result<bool, AppError> {
    let parsed = PasswordHash::new(stored_hash)
        .map_err(|e| AppError::Internal(format!("Password hash parse error: {}", e)))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

/// `POST /register`
pub async fn register(
    State(state): State<AppState>,
    Json(creds): Json<Credentials>,
) -> Result<(StatusCode, Json<RegisterResponse>), AppError> {
    let creds = creds.normalized();
    creds.validate()?;

    if users::name_taken(&state.pool, &creds.name).await? {
        return Err(AppError::Conflict("Name already taken".to_string()));
    }

    let password_hash = hash_password(&creds.password)?;
    let id = uuid::Uuid::now_v7().to_string();
    let user = users::create_user(&state.pool, &id, &creds.name, &password_hash).await?;

    tracing::info!(user_id = %user.id, "User registered");
    let body = RegisterResponse {
        message: "User created successfully".to_string(),
        user: user.into(),
    };
    Ok((StatusCode::CREATED, Json(body)))
}

/// `POST /login`
///
/// 없는 이름과 틀린 비밀번호는 같은 401 응답이라 구분할 수 없습니다.
pub async fn login(
    State(state): State<AppState>,
    Json(creds): Json<Credentials>,
) -> Result<Json<LoginResponse>, AppError> {
    let creds = creds.normalized();
    let rejected = || AppError::Unauthorized("Invalid credentials".to_string());

    let Some(user) = users::find_by_name(&state.pool, &creds.name).await? else {
        tracing::debug!("Login for unknown name");
        return Err(rejected());
    };
    if !verify_password(&creds.password, &user.password_hash)? {
        tracing::debug!(user_id = %user.id, "Login with wrong password");
        return Err(rejected());
    }

    let token = create_access_token(&user.id, &state.jwt_secret, state.jwt_ttl_minutes)
        .map_err(|e| AppError::Internal(format!("Token generation failed: {}", e)))?;

    Ok(Json(LoginResponse {
        token,
        user: user.into(),
    }))
}

/// `GET /me`
pub async fn me(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<Json<UserResponse>, AppError> {
    users::find_by_id(&state.pool, &auth_user.user_id)
        .await?
        .map(|user| Json(user.into()))
        .ok_or(AppError::NotFound)
}
