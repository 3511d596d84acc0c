//! Coinlens API 서버.
//!
//! Axum 기반 REST API 서버를 시작합니다.
//! 시장 데이터, 뉴스, LLM 추천, 헬스 체크 엔드포인트를 제공합니다.
//!
//! # 시작 순서
//!
//! 1. `.env` 로드 → 설정 로드 → 로깅 초기화
//! 2. Redis URL 존재 여부로 분산 캐시 티어 선택 (없으면 로컬 전용)
//! 3. 캐시 게이트웨이 / 시장 데이터 매니저 / 추천 엔진 조립
//! 4. 라우터 + 미들웨어 구성, graceful shutdown으로 서빙

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::http::StatusCode;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use coinlens_advisor::{AdvisorEngine, OllamaClient};
use coinlens_api::openapi::swagger_ui_router;
use coinlens_api::routes::create_api_router;
use coinlens_api::state::AppState;
use coinlens_core::config::AppConfig;
use coinlens_core::logging::init_logging;
use coinlens_data::{CacheGateway, DistributedTier, MarketDataManager, RedisCache};

/// 분산 캐시 티어 선택.
///
/// Redis URL이 설정된 경우에만 연결을 시도하고, 연결 실패 시 경고 후
/// 로컬 전용으로 계속합니다. 캐시 인프라 장애로 서버 시작이 막히면 안 됩니다.
async fn select_distributed_tier(config: &AppConfig) -> DistributedTier {
    if !config.redis.is_enabled() {
        info!("Redis URL not configured, using local-only cache");
        return DistributedTier::Disabled;
    }

    match RedisCache::connect(&config.redis).await {
        Ok(redis) => {
            info!("Distributed cache tier enabled");
            DistributedTier::Redis(redis)
        }
        Err(e) => {
            warn!(error = %e, "Redis connection failed, continuing with local-only cache");
            DistributedTier::Disabled
        }
    }
}

/// CORS 레이어 구성.
///
/// `CORS_ORIGINS` 환경변수(쉼표 구분)가 있으면 해당 origin만 허용하고,
/// 없으면 개발 모드로 모든 origin을 허용합니다.
fn cors_layer() -> CorsLayer {
    let allow_origin = match std::env::var("CORS_ORIGINS") {
        Ok(origins) if !origins.is_empty() => {
            let origins: Vec<_> = origins
                .split(',')
                .filter_map(|s| s.trim().parse().ok())
                .collect();

            if origins.is_empty() {
                warn!("CORS_ORIGINS is set but contains no valid origins, allowing any");
                AllowOrigin::any()
            } else {
                info!("CORS configured with {} allowed origins", origins.len());
                AllowOrigin::list(origins)
            }
        }
        _ => {
            warn!("CORS_ORIGINS not set, allowing any origin (development mode)");
            AllowOrigin::any()
        }
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([axum::http::Method::GET, axum::http::Method::POST])
        .allow_headers([axum::http::header::CONTENT_TYPE])
}

/// Graceful shutdown 시그널 대기 (Ctrl+C 또는 SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            warn!("Received Ctrl+C, initiating graceful shutdown...");
        }
        _ = terminate => {
            warn!("Received SIGTERM, initiating graceful shutdown...");
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // .env 파일 로드 (있는 경우)
    let _ = dotenvy::dotenv();

    // 설정 로드 (COINLENS_CONFIG로 경로 오버라이드 가능)
    let config_path =
        std::env::var("COINLENS_CONFIG").unwrap_or_else(|_| "config/default.toml".to_string());
    let config = AppConfig::load(&config_path)?;

    // tracing 초기화
    init_logging(&config.logging)?;

    info!("Starting Coinlens API server...");

    // 분산 캐시 티어 선택 및 게이트웨이 조립
    let tier = select_distributed_tier(&config).await;
    let gateway = Arc::new(CacheGateway::new(tier));

    // 시장 데이터 매니저 + 추천 엔진
    let market = Arc::new(MarketDataManager::new(&config, gateway)?);
    let ollama = OllamaClient::new(&config.llm)?;
    let advisor = Arc::new(AdvisorEngine::new(ollama, market.clone()));

    let state = Arc::new(AppState::new(market, advisor));

    info!(
        version = %state.version,
        distributed_cache = state.market.gateway().distributed_enabled(),
        llm_model = %config.llm.model,
        "Application state initialized"
    );

    // 라우터 구성
    let app = create_api_router()
        .merge(swagger_ui_router())
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(30),
        ))
        .with_state(state);

    // 서버 시작
    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;

    info!("Server listening on http://{}", addr);
    info!("Swagger UI available at http://{}/swagger-ui", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped gracefully");

    Ok(())
}
