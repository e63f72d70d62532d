//! # 파일 저장소(Storage) 서비스
//!
//! 업로드된 파일의 바이트를 저장/조회/삭제합니다.
//! 저장소는 "키(상대 경로) → 바이트" 형태의 단순한 블롭 저장소이며,
//! 문서 메타데이터의 `file_path`가 이 키입니다.
//!
//! 이 모듈의 구성:
//! - `Storage`: 저장소 트레이트 (핸들러는 이 트레이트만 알고 있음)
//! - `LocalStorage`: 로컬 디스크 구현
//! - `StorageError`: 저장소 에러 (파일 없음 / 입출력 실패 / 잘못된 키)
//! - `generate_storage_key()`: 업로드 파일의 저장 키 생성

use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use thiserror::Error;
use tokio::fs;

/// 저장소 작업에서 발생하는 에러
#[derive(Debug, Error)]
pub enum StorageError {
    /// 키에 해당하는 파일이 없음
    #[error("Stored object not found: {0}")]
    NotFound(String),

    /// 저장 루트 밖을 가리키는 키 (예: "../etc/passwd")
    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    /// 그 밖의 입출력 실패
    #[error("Storage IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// 파일 저장소 트레이트
///
/// `AppState`에 `Arc<dyn Storage>`로 들어가므로 `Send + Sync`가 필요하고,
/// 트레이트 객체에서 async 메서드를 쓰기 위해 `#[async_trait]`를 사용합니다.
#[async_trait]
pub trait Storage: Send + Sync {
    /// 바이트를 키 위치에 저장합니다. 같은 키가 있으면 덮어씁니다.
    async fn put(&self, key: &str, data: &[u8]) -> Result<(), StorageError>;

    /// 키 위치의 바이트를 읽습니다. 없으면 `StorageError::NotFound`.
    async fn get(&self, key: &str) -> Result<Vec<u8>, StorageError>;

    /// 키 위치의 파일을 삭제합니다. 이미 없으면 성공으로 취급합니다.
    async fn delete(&self, key: &str) -> Result<(), StorageError>;
}

/// 로컬 디스크 저장소
///
/// 모든 키는 `base_path` 기준 상대 경로로 해석됩니다.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    base_path: PathBuf,
}

impl LocalStorage {
    /// 저장 루트 디렉토리를 만들고(없으면) 저장소를 생성합니다.
    pub async fn new(base_path: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let base_path = base_path.into();
        fs::create_dir_all(&base_path).await?;
        Ok(Self { base_path })
    }

    /// 키를 실제 파일 경로로 바꿉니다.
    ///
    /// 절대 경로나 `..`가 들어간 키는 거부합니다.
    fn resolve(&self, key: &str) -> Result<PathBuf, StorageError> {
        let relative = Path::new(key);
        let safe = !key.is_empty()
            && relative
                .components()
                .all(|c| matches!(c, Component::Normal(_)));
        if !safe {
            return Err(StorageError::InvalidKey(key.to_string()));
        }
        Ok(self.base_path.join(relative))
    }
}

#[async_trait]
impl Storage for LocalStorage {
    async fn put(&self, key: &str, data: &[u8]) -> Result<(), StorageError> {
        let path = self.resolve(key)?;
        // 부모 디렉토리(documents/{owner_id}/)가 없으면 만듭니다.
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }
        fs::write(&path, data).await?;
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Vec<u8>, StorageError> {
        let path = self.resolve(key)?;
        match fs::read(&path).await {
            Ok(data) => Ok(data),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(StorageError::NotFound(key.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn delete(&self, key: &str) -> Result<(), StorageError> {
        let path = self.resolve(key)?;
        match fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// 업로드 파일의 저장 키를 생성합니다.
///
/// 형식: `documents/{owner_id}/{uuid}-{파일명 slug}.{확장자}`
///
/// # 예시
/// ```text
/// generate_storage_key("u1", Some("Faktúra 2024.pdf")) → "documents/u1/0190...-faktura-2024.pdf"
/// generate_storage_key("u1", None)                     → "documents/u1/0190..."
/// ```
pub fn generate_storage_key(owner_id: &str, original_name: Option<&str>) -> String {
    let id = uuid::Uuid::now_v7();
    let (stem, extension) = match original_name.map(Path::new) {
        Some(path) => (
            path.file_stem().and_then(|s| s.to_str()).map(slug::slugify),
            path.extension()
                .and_then(|s| s.to_str())
                .map(slug::slugify)
                .filter(|e| !e.is_empty()),
        ),
        None => (None, None),
    };

    let mut file_name = id.to_string();
    if let Some(stem) = stem.filter(|s| !s.is_empty()) {
        file_name.push('-');
        file_name.push_str(&stem);
    }
    if let Some(extension) = extension {
        file_name.push('.');
        file_name.push_str(&extension);
    }

    format!("documents/{}/{}", owner_id, file_name)
}

/// 저장 키의 확장자를 돌려줍니다. (다운로드 파일명/Content-Type 결정용)
pub fn key_extension(key: &str) -> Option<&str> {
    Path::new(key).extension().and_then(|e| e.to_str())
}
