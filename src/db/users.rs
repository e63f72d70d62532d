//! # 사용자 쿼리
//!
//! `name` 컬럼의 UNIQUE 제약이 중복 가입의 최종 판정입니다.

use crate::error::AppError;
use crate::models::user::User;
use sqlx::SqlitePool;

/// 사용자를 만들고 저장된 행을 돌려줍니다.
///
/// 같은 이름이 동시에 가입하면 한쪽은 UNIQUE 위반으로 `AppError::Conflict`가 됩니다.
pub async fn create_user(
    pool: &SqlitePool,
    id: &str,
    name: &str,
    password_hash: &str,
) -> Result<User, AppError> {
    sqlx::query_as::<_, User>(
        r#"
        INSERT INTO users (id, name, password_hash)
        VALUES (?, ?, ?)
        RETURNING id, name, password_hash, created_at, updated_at
        "#,
    )
    .bind(id)
    .bind(name)
    .bind(password_hash)
    .fetch_one(pool)
    .await
    .map_err(|e| match e {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            AppError::Conflict("Name already taken".to_string())
        }
        other => other.into(),
    })
}

/// 이름이 이미 쓰이고 있는지
pub async fn name_taken(pool: &SqlitePool, name: &str) -> Result<bool, AppError> {
    let taken: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE name = ?)")
        .bind(name)
        .fetch_one(pool)
        .await?;
    Ok(taken)
}

pub async fn find_by_name(pool: &SqlitePool, name: &str) -> Result<Option<User>, AppError> {
    Ok(sqlx::query_as::<_, User>(
        "SELECT id, name, password_hash, created_at, updated_at FROM users WHERE name = ?",
    )
    .bind(name)
    .fetch_optional(pool)
    .await?)
}

pub async fn find_by_id(pool: &SqlitePool, id: &str) -> Result<Option<User>, AppError> {
    Ok(sqlx::query_as::<_, User>(
        "SELECT id, name, password_hash, created_at, updated_at FROM users WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?)
}
