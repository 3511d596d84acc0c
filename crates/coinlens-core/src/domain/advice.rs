//! LLM 추천 결과 타입.
//!
//! `POST /api/recommendation` 응답에 사용됩니다.
//! 생성된 텍스트는 투자 조언이 아니며, 응답에 항상 면책 문구가 포함됩니다.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 추천 응답에 포함되는 고정 면책 문구.
pub const RECOMMENDATION_DISCLAIMER: &str =
    "This is AI-generated commentary, not financial advice. \
     Cryptocurrency investments carry significant risk.";

/// LLM이 생성한 투자 코멘터리.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "utoipa-support", derive(utoipa::ToSchema))]
pub struct Recommendation {
    /// 사용한 모델 이름
    pub model: String,
    /// 생성된 텍스트
    pub content: String,
    /// 면책 문구
    pub disclaimer: String,
    /// 프롬프트 토큰 수 (모델이 보고한 경우)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompt_tokens: Option<u32>,
    /// 생성 토큰 수 (모델이 보고한 경우)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completion_tokens: Option<u32>,
    /// 생성 시간
    pub generated_at: DateTime<Utc>,
}
