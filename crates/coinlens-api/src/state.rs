//! 모든 핸들러에서 공유되는 애플리케이션 상태.
//!
//! Arc로 래핑되어 Axum의 State extractor를 통해 핸들러에 주입됩니다.

use coinlens_advisor::AdvisorEngine;
use coinlens_data::MarketDataManager;
use std::sync::Arc;

/// 애플리케이션 공유 상태.
pub struct AppState {
    /// 시장 데이터 매니저 (캐시 게이트웨이 + 업스트림 제공자)
    pub market: Arc<MarketDataManager>,

    /// LLM 추천 엔진
    pub advisor: Arc<AdvisorEngine>,

    /// 서버 시작 시간 (업타임 계산용)
    pub started_at: chrono::DateTime<chrono::Utc>,

    /// API 버전
    pub version: String,
}

impl AppState {
    /// 새로운 AppState를 생성합니다.
    pub fn new(market: Arc<MarketDataManager>, advisor: Arc<AdvisorEngine>) -> Self {
        Self {
            market,
            advisor,
            started_at: chrono::Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    /// 서버 업타임(초).
    pub fn uptime_secs(&self) -> i64 {
        (chrono::Utc::now() - self.started_at).num_seconds()
    }
}
