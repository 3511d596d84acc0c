//! API 라우트.
//!
//! # 라우트 구조
//!
//! - `GET /api/coin` - 코인 목록
//! - `GET /api/coin/overview` - 시장 개요
//! - `GET /api/coin/{id}` - 코인 상세
//! - `GET /api/coin/{id}/chart` - 가격 차트
//! - `GET /api/news` - 최신 뉴스
//! - `GET /api/news/{coinId}` - 코인별 뉴스
//! - `POST /api/recommendation` - LLM 투자 코멘터리
//! - `GET /api/health` - 헬스 체크 (liveness)
//! - `GET /api/health/ready` - 상세 헬스 체크 (readiness)

pub mod coins;
pub mod health;
pub mod news;
pub mod recommendation;

pub use coins::{coins_router, ChartQuery, ListCoinsQuery};
pub use health::{health_router, ComponentHealth, ComponentStatus, HealthResponse};
pub use news::news_router;
pub use recommendation::{recommendation_router, RecommendationRequest};

use axum::Router;
use std::sync::Arc;

use crate::state::AppState;

/// 전체 API 라우터 생성.
///
/// 모든 서브 라우터를 조합하여 하나의 라우터로 반환합니다.
pub fn create_api_router() -> Router<Arc<AppState>> {
    Router::new()
        .nest("/api/coin", coins_router())
        .nest("/api/news", news_router())
        .nest("/api/recommendation", recommendation_router())
        .nest("/api/health", health_router())
}
