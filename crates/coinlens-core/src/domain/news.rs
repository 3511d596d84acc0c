//! 뉴스 타입.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 암호화폐 뉴스 기사.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "utoipa-support", derive(utoipa::ToSchema))]
pub struct CryptoNewsItem {
    /// 기사 ID (업스트림 URL 기반)
    pub id: String,
    /// 제목
    pub title: String,
    /// 요약
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    /// 기사 URL
    pub url: String,
    /// 출처 (매체명)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    /// 대표 이미지 URL
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// 게시 시간
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published_at: Option<DateTime<Utc>>,
    /// 관련 코인 ID 목록
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub related_coins: Vec<String>,
}
