//! 헬스 체크 endpoint.
//!
//! 로드밸런서나 오케스트레이션 시스템에서 사용됩니다.
//!
//! - `GET /api/health` - liveness probe
//! - `GET /api/health/ready` - readiness probe (컴포넌트 상태 + 캐시 통계)

use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use coinlens_data::CacheStatsSnapshot;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::state::AppState;

/// 상세 헬스 체크 응답.
#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    /// 전체 서비스 상태 ("healthy" | "degraded")
    pub status: String,
    /// API 버전
    pub version: String,
    /// 서버 업타임(초)
    pub uptime_secs: i64,
    /// 현재 시간 (ISO 8601)
    pub timestamp: String,
    /// 개별 컴포넌트 상태
    pub components: ComponentHealth,
    /// 캐시 게이트웨이 통계
    pub cache_stats: CacheStatsSnapshot,
}

/// 개별 컴포넌트 상태.
#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ComponentHealth {
    /// 분산 캐시 티어 (Redis)
    pub distributed_cache: ComponentStatus,
    /// LLM (Ollama)
    pub llm: ComponentStatus,
}

/// 컴포넌트 상태.
#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ComponentStatus {
    /// 상태 ("up" | "down" | "not_configured")
    pub status: String,
    /// 추가 정보 (선택적)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ComponentStatus {
    /// 정상 상태.
    pub fn up() -> Self {
        Self {
            status: "up".to_string(),
            message: None,
        }
    }

    /// 비정상 상태.
    pub fn down(message: impl Into<String>) -> Self {
        Self {
            status: "down".to_string(),
            message: Some(message.into()),
        }
    }

    /// 미설정 상태.
    pub fn not_configured() -> Self {
        Self {
            status: "not_configured".to_string(),
            message: None,
        }
    }

    /// 정보 포함 정상 상태.
    pub fn up_with_info(message: impl Into<String>) -> Self {
        Self {
            status: "up".to_string(),
            message: Some(message.into()),
        }
    }
}

/// 간단한 헬스 체크 (liveness probe용).
///
/// GET /api/health
#[utoipa::path(
    get,
    path = "/api/health",
    tag = "health",
    responses((status = 200, description = "서버 응답 가능"))
)]
pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

/// 상세 헬스 체크 (readiness probe용).
///
/// 분산 캐시와 LLM의 도달 가능 여부를 확인합니다. 두 컴포넌트 모두
/// 선택 의존성이므로 장애 시에도 degraded 상태로 200을 반환합니다.
///
/// GET /api/health/ready
#[utoipa::path(
    get,
    path = "/api/health/ready",
    tag = "health",
    responses((status = 200, description = "컴포넌트 상태", body = HealthResponse))
)]
pub async fn health_ready(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let mut overall_status = "healthy";

    // 분산 캐시 상태 (비활성은 정상 구성)
    let cache_status = match state.market.gateway().distributed_health().await {
        None => ComponentStatus::not_configured(),
        Some(true) => ComponentStatus::up(),
        Some(false) => {
            overall_status = "degraded";
            ComponentStatus::down("PING failed")
        }
    };

    // LLM 도달 가능 여부
    let llm_status = if state.advisor.llm_health_check().await {
        ComponentStatus::up_with_info(state.advisor.model())
    } else {
        overall_status = "degraded";
        ComponentStatus::down("unreachable")
    };

    let response = HealthResponse {
        status: overall_status.to_string(),
        version: state.version.clone(),
        uptime_secs: state.uptime_secs(),
        timestamp: chrono::Utc::now().to_rfc3339(),
        components: ComponentHealth {
            distributed_cache: cache_status,
            llm: llm_status,
        },
        cache_stats: state.market.gateway().stats(),
    };

    (StatusCode::OK, Json(response))
}

/// 헬스 체크 라우터 생성.
pub fn health_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(health_check))
        .route("/ready", get(health_ready))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_component_status_variants() {
        let up = ComponentStatus::up();
        assert_eq!(up.status, "up");
        assert!(up.message.is_none());

        let down = ComponentStatus::down("PING failed");
        assert_eq!(down.status, "down");
        assert_eq!(down.message, Some("PING failed".to_string()));

        let not_configured = ComponentStatus::not_configured();
        assert_eq!(not_configured.status, "not_configured");
    }
}
