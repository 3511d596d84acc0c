//! LLM 추천 endpoint.
//!
//! - `POST /api/recommendation` - 투자 코멘터리 생성

use axum::{extract::State, routing::post, Json, Router};
use coinlens_core::domain::Recommendation;
use serde::Deserialize;
use std::sync::Arc;
use validator::Validate;

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// 추천 요청.
#[derive(Debug, Deserialize, Validate, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationRequest {
    /// 사용자 질의 (1~2000자)
    #[validate(length(min = 1, max = 2000, message = "query must be 1-2000 characters"))]
    pub query: String,

    /// 컨텍스트에 포함할 코인 ID (선택, 최대 5개)
    #[serde(default)]
    #[validate(length(max = 5, message = "at most 5 coin ids"))]
    pub coin_ids: Vec<String>,
}

/// 투자 코멘터리 생성.
///
/// POST /api/recommendation
///
/// 현재 시장 스냅샷과 요청된 코인 상세를 컨텍스트로 LLM을 호출합니다.
/// 응답에는 항상 면책 문구가 포함됩니다.
#[utoipa::path(
    post,
    path = "/api/recommendation",
    tag = "recommendation",
    request_body = RecommendationRequest,
    responses(
        (status = 200, description = "생성된 코멘터리", body = Recommendation),
        (status = 400, description = "검증 실패", body = crate::error::ApiErrorResponse),
        (status = 502, description = "LLM 장애", body = crate::error::ApiErrorResponse),
    )
)]
pub async fn create_recommendation(
    State(state): State<Arc<AppState>>,
    Json(request): Json<RecommendationRequest>,
) -> ApiResult<Json<Recommendation>> {
    request.validate().map_err(ApiError::from_validation)?;

    let recommendation = state
        .advisor
        .recommend(&request.query, &request.coin_ids)
        .await?;

    Ok(Json(recommendation))
}

/// 추천 라우터 생성.
pub fn recommendation_router() -> Router<Arc<AppState>> {
    Router::new().route("/", post(create_recommendation))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_query_fails_validation() {
        let request = RecommendationRequest {
            query: String::new(),
            coin_ids: Vec::new(),
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_too_many_coin_ids_fails_validation() {
        let request = RecommendationRequest {
            query: "analyze".to_string(),
            coin_ids: (0..6).map(|i| format!("coin{}", i)).collect(),
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_valid_request_passes() {
        let request = RecommendationRequest {
            query: "Should I rebalance into ETH?".to_string(),
            coin_ids: vec!["ethereum".to_string()],
        };
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_camel_case_deserialization() {
        let request: RecommendationRequest = serde_json::from_str(
            r#"{"query": "analyze btc", "coinIds": ["bitcoin"]}"#,
        )
        .unwrap();
        assert_eq!(request.coin_ids, vec!["bitcoin".to_string()]);
    }
}
