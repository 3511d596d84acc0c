//! OpenAPI 문서화 설정.
//!
//! utoipa를 사용하여 REST API의 OpenAPI 3.0 스펙을 생성합니다.
//! Swagger UI는 `/swagger-ui` 경로에서 사용 가능합니다.
//!
//! 새로운 엔드포인트를 추가할 때:
//!
//! 1. 응답/요청 타입에 `#[derive(ToSchema)]` 추가
//! 2. 핸들러에 `#[utoipa::path(...)]` 어노테이션 추가
//! 3. 이 파일의 `components(schemas(...))` 및 `paths(...)` 섹션에 추가

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::error::ApiErrorResponse;
use crate::routes::recommendation::RecommendationRequest;
use crate::routes::{ComponentHealth, ComponentStatus, HealthResponse};
use coinlens_core::domain::{
    CryptoCurrency, CryptoCurrencyDetail, CryptoNewsItem, MarketHistory, MarketOverview,
    PricePoint, Recommendation,
};
use coinlens_data::CacheStatsSnapshot;

/// Coinlens API 문서.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Coinlens API",
        version = "0.1.0",
        description = r#"
# Coinlens REST API

암호화폐 시장 데이터, 뉴스, LLM 투자 코멘터리를 제공하는 REST API입니다.

## 주요 기능

- **시장 데이터**: 코인 목록/상세/차트/시장 개요 (CoinGecko, CoinCap 폴백)
- **뉴스**: 암호화폐 최신/코인별 뉴스
- **추천**: 로컬 LLM(Ollama) 기반 투자 코멘터리 (투자 조언 아님)

## 캐싱

모든 시장 데이터 조회는 2티어(메모리 + 선택적 Redis) cache-aside
게이트웨이를 경유합니다. 캐시 통계는 `/api/health/ready`에서 확인할 수
있습니다.
"#,
        license(name = "MIT", url = "https://opensource.org/licenses/MIT"),
        contact(name = "Coinlens Team", url = "https://github.com/user/coinlens")
    ),
    servers(
        (url = "http://localhost:3000", description = "로컬 개발 서버"),
    ),
    tags(
        (name = "coins", description = "시장 데이터 - 코인 목록/상세/차트/개요"),
        (name = "news", description = "뉴스 - 최신/코인별 암호화폐 뉴스"),
        (name = "recommendation", description = "추천 - LLM 투자 코멘터리"),
        (name = "health", description = "헬스 체크 - 서버/컴포넌트 상태"),
    ),
    paths(
        crate::routes::coins::list_coins,
        crate::routes::coins::market_overview,
        crate::routes::coins::coin_detail,
        crate::routes::coins::coin_chart,
        crate::routes::news::latest_news,
        crate::routes::news::coin_news,
        crate::routes::recommendation::create_recommendation,
        crate::routes::health::health_check,
        crate::routes::health::health_ready,
    ),
    components(schemas(
        CryptoCurrency,
        CryptoCurrencyDetail,
        MarketOverview,
        MarketHistory,
        PricePoint,
        CryptoNewsItem,
        Recommendation,
        RecommendationRequest,
        ApiErrorResponse,
        HealthResponse,
        ComponentHealth,
        ComponentStatus,
        CacheStatsSnapshot,
    ))
)]
pub struct ApiDoc;

/// Swagger UI 라우터 생성.
///
/// `/swagger-ui`에서 대화형 문서를, `/api-docs/openapi.json`에서 스펙을
/// 제공합니다.
pub fn swagger_ui_router<S>() -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    SwaggerUi::new("/swagger-ui")
        .url("/api-docs/openapi.json", ApiDoc::openapi())
        .into()
}
