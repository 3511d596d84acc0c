//! 뉴스 endpoint.
//!
//! - `GET /api/news` - 최신 암호화폐 뉴스
//! - `GET /api/news/{coinId}` - 코인별 뉴스

use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use coinlens_core::domain::CryptoNewsItem;
use std::sync::Arc;

use crate::error::ApiResult;
use crate::state::AppState;

/// 최신 뉴스 조회.
///
/// GET /api/news
#[utoipa::path(
    get,
    path = "/api/news",
    tag = "news",
    responses(
        (status = 200, description = "최신 암호화폐 뉴스", body = Vec<CryptoNewsItem>),
        (status = 502, description = "업스트림 장애", body = crate::error::ApiErrorResponse),
    )
)]
pub async fn latest_news(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Vec<CryptoNewsItem>>> {
    let items = state.market.latest_news().await?;
    Ok(Json(items))
}

/// 코인별 뉴스 조회.
///
/// GET /api/news/{coinId}
#[utoipa::path(
    get,
    path = "/api/news/{coinId}",
    tag = "news",
    params(("coinId" = String, Path, description = "코인 ID (예: bitcoin)")),
    responses(
        (status = 200, description = "코인 관련 뉴스", body = Vec<CryptoNewsItem>),
        (status = 502, description = "업스트림 장애", body = crate::error::ApiErrorResponse),
    )
)]
pub async fn coin_news(
    State(state): State<Arc<AppState>>,
    Path(coin_id): Path<String>,
) -> ApiResult<Json<Vec<CryptoNewsItem>>> {
    let items = state.market.coin_news(&coin_id).await?;
    Ok(Json(items))
}

/// 뉴스 라우터 생성.
pub fn news_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(latest_news))
        .route("/{coin_id}", get(coin_news))
}
