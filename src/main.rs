//! # docshelf 웹 서버 진입점
//!
//! 핵심 코드는 라이브러리(`src/lib.rs`)에 있고, 이 파일은 서버를 띄우는 일만 합니다.
//! 통합 테스트도 같은 `docshelf::app()`으로 라우터를 만듭니다.
//!
//! 이 파일이 수행하는 작업:
//! 1. 환경변수(.env) 로딩
//! 2. 로깅(tracing) 초기화
//! 3. SQLite 데이터베이스 연결 풀 생성
//! 4. 데이터베이스 마이그레이션 실행
//! 5. 파일 저장소 준비
//! 6. API 라우터 설정
//! 7. HTTP 서버 시작

use std::sync::Arc; // Arc: 여러 요청이 같은 저장소 객체를 공유하기 위한 참조 카운트 포인터

use anyhow::Result; // 어떤 에러 타입이든 담을 수 있는 범용 Result (main 전용)
use docshelf::{
    config::Config,                     // 환경변수 설정
    db,                                 // MIGRATOR
    services::storage::LocalStorage,    // 로컬 디스크 파일 저장소
    AppState,                           // 핸들러들이 공유하는 상태
};
use sqlx::sqlite::SqlitePoolOptions; // SQLite 연결 풀 설정 옵션
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt}; // 로깅 초기화 유틸리티

// #[tokio::main]: tokio 비동기 런타임을 만들고 그 안에서 main을 실행합니다.
#[tokio::main]
async fn main() -> Result<()> {
    // ── 1단계: 환경변수 로딩 ──
    // .env 파일이 없어도 에러 없이 넘어갑니다.
    dotenvy::dotenv().ok();

    // ── 2단계: 로깅 초기화 ──
    // 설정 로딩 중 경고도 찍을 수 있도록 가장 먼저 설정합니다.
    tracing_subscriber::registry()
        .with(
            // RUST_LOG가 없으면 docshelf, tower_http, axum 모듈을 debug 레벨로 설정
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "docshelf=debug,tower_http=debug,axum=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer()) // 터미널 출력 포맷터
        .init(); // 전역 로거로 등록

    // ── 3단계: 설정 로딩 ──
    // DATABASE_URL, JWT_SECRET이 없으면 여기서 종료됩니다.
    let config = Config::from_env()?;
    tracing::info!("Starting docshelf server on {}", config.bind_addr());

    // ── 4단계: SQLite 연결 풀 생성 ──
    let pool = SqlitePoolOptions::new()
        .max_connections(5) // 최대 5개의 동시 연결
        .connect(&config.database_url)
        .await?;

    // ── 5단계: 마이그레이션 ──
    // 아직 적용되지 않은 migrations/*.sql만 순서대로 실행합니다.
    tracing::info!("Running database migrations...");
    db::MIGRATOR.run(&pool).await?;

    // ── 6단계: 파일 저장소 ──
    // 저장 루트 디렉토리가 없으면 생성됩니다. (mkdir -p)
    let storage = LocalStorage::new(&config.storage_path).await?;
    tracing::info!("Using storage directory: {}", config.storage_path);

    // ── 7단계: 애플리케이션 상태 ──
    // SqlitePool과 Arc는 clone해도 같은 풀/저장소를 가리킵니다.
    let state = AppState {
        pool,
        storage: Arc::new(storage),
        jwt_secret: config.jwt_secret.clone(),
        jwt_ttl_minutes: config.jwt_ttl_minutes,
    };

    // ── 8단계: 라우터 ──
    // /api 아래 모든 엔드포인트 + CORS + 요청 로깅 (routes/mod.rs)
    let app = docshelf::app(state);

    // ── 9단계: 서버 시작 ──
    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    // Ctrl+C 등으로 종료될 때까지 요청을 처리합니다.
    axum::serve(listener, app).await?;

    Ok(())
}
