//! 코인 시장 데이터 endpoint.
//!
//! - `GET /api/coin` - 시가총액 순 코인 목록
//! - `GET /api/coin/overview` - 전체 시장 개요
//! - `GET /api/coin/{id}` - 코인 상세
//! - `GET /api/coin/{id}/chart` - 가격 차트

use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use coinlens_core::domain::{CryptoCurrency, CryptoCurrencyDetail, MarketHistory, MarketOverview};
use serde::Deserialize;
use std::sync::Arc;

use crate::error::ApiResult;
use crate::state::AppState;

/// 목록 조회 한도 상한 (CoinGecko per_page 최대값).
const MAX_LIMIT: u32 = 250;

/// 코인 목록 쿼리 파라미터.
#[derive(Debug, Deserialize, utoipa::IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ListCoinsQuery {
    /// 기준 통화 (기본값: "usd")
    pub vs_currency: Option<String>,
    /// 조회할 코인 수 (기본값: 50, 최대 250)
    pub limit: Option<u32>,
}

/// 차트 쿼리 파라미터.
#[derive(Debug, Deserialize, utoipa::IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ChartQuery {
    /// 조회 기간(일) (기본값: 7)
    pub days: Option<u32>,
}

/// 코인 목록 조회.
///
/// GET /api/coin?vsCurrency=usd&limit=50
#[utoipa::path(
    get,
    path = "/api/coin",
    tag = "coins",
    params(ListCoinsQuery),
    responses(
        (status = 200, description = "시가총액 순 코인 목록", body = Vec<CryptoCurrency>),
        (status = 502, description = "업스트림 장애", body = crate::error::ApiErrorResponse),
    )
)]
pub async fn list_coins(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListCoinsQuery>,
) -> ApiResult<Json<Vec<CryptoCurrency>>> {
    let vs = query.vs_currency.unwrap_or_else(|| "usd".to_string());
    let limit = query.limit.unwrap_or(50).clamp(1, MAX_LIMIT);

    let coins = state.market.list_coins(&vs, limit).await?;
    Ok(Json(coins))
}

/// 시장 개요 조회.
///
/// GET /api/coin/overview
#[utoipa::path(
    get,
    path = "/api/coin/overview",
    tag = "coins",
    responses(
        (status = 200, description = "전체 시장 개요", body = MarketOverview),
        (status = 502, description = "업스트림 장애", body = crate::error::ApiErrorResponse),
    )
)]
pub async fn market_overview(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<MarketOverview>> {
    let overview = state.market.market_overview().await?;
    Ok(Json(overview))
}

/// 코인 상세 조회.
///
/// GET /api/coin/{id}
#[utoipa::path(
    get,
    path = "/api/coin/{id}",
    tag = "coins",
    params(("id" = String, Path, description = "코인 ID (예: bitcoin)")),
    responses(
        (status = 200, description = "코인 상세 정보", body = CryptoCurrencyDetail),
        (status = 404, description = "알 수 없는 코인", body = crate::error::ApiErrorResponse),
    )
)]
pub async fn coin_detail(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<CryptoCurrencyDetail>> {
    let detail = state.market.coin_detail(&id).await?;
    Ok(Json(detail))
}

/// 가격 차트 조회.
///
/// GET /api/coin/{id}/chart?days=7
#[utoipa::path(
    get,
    path = "/api/coin/{id}/chart",
    tag = "coins",
    params(
        ("id" = String, Path, description = "코인 ID (예: bitcoin)"),
        ChartQuery,
    ),
    responses(
        (status = 200, description = "가격 차트", body = MarketHistory),
        (status = 404, description = "알 수 없는 코인", body = crate::error::ApiErrorResponse),
    )
)]
pub async fn coin_chart(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Query(query): Query<ChartQuery>,
) -> ApiResult<Json<MarketHistory>> {
    let days = query.days.unwrap_or(7).clamp(1, 365);

    let history = state.market.coin_chart(&id, days).await?;
    Ok(Json(history))
}

/// 코인 라우터 생성.
///
/// `/overview`는 `/{id}`보다 먼저 등록해야 path 파라미터에 잡히지 않습니다.
pub fn coins_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(list_coins))
        .route("/overview", get(market_overview))
        .route("/{id}", get(coin_detail))
        .route("/{id}/chart", get(coin_chart))
}
