//! 시장 데이터 타입 및 구조체.
//!
//! 이 모듈은 시장 데이터 관련 타입을 정의합니다:
//! - `CryptoCurrency` - 코인 목록 항목
//! - `CryptoCurrencyDetail` - 코인 상세 정보
//! - `MarketOverview` - 전체 시장 개요
//! - `MarketHistory` - 가격 차트 데이터
//!
//! 식별 필드(id, symbol, name) 외에는 모두 선택 필드입니다.
//! 업스트림마다 제공하는 필드가 다르기 때문입니다.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// 코인 목록 항목.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "utoipa-support", derive(utoipa::ToSchema))]
pub struct CryptoCurrency {
    /// 코인 ID (예: "bitcoin")
    pub id: String,
    /// 심볼 (예: "btc")
    pub symbol: String,
    /// 이름 (예: "Bitcoin")
    pub name: String,
    /// 현재가 (USD 등 기준 통화)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_price: Option<Decimal>,
    /// 시가총액
    #[serde(skip_serializing_if = "Option::is_none")]
    pub market_cap: Option<Decimal>,
    /// 시가총액 순위
    #[serde(skip_serializing_if = "Option::is_none")]
    pub market_cap_rank: Option<u32>,
    /// 24시간 가격 변동률 (%)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price_change_percentage_24h: Option<Decimal>,
    /// 24시간 거래량
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_volume: Option<Decimal>,
    /// 유통 공급량
    #[serde(skip_serializing_if = "Option::is_none")]
    pub circulating_supply: Option<Decimal>,
    /// 총 공급량
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_supply: Option<Decimal>,
    /// 로고 이미지 URL
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

/// 코인 상세 정보.
///
/// `CryptoCurrency`의 상위 집합입니다. `GET /api/coin/{id}` 응답에 사용됩니다.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "utoipa-support", derive(utoipa::ToSchema))]
pub struct CryptoCurrencyDetail {
    /// 코인 ID
    pub id: String,
    /// 심볼
    pub symbol: String,
    /// 이름
    pub name: String,
    /// 설명 (영문)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// 공식 홈페이지 URL
    #[serde(skip_serializing_if = "Option::is_none")]
    pub homepage: Option<String>,
    /// 로고 이미지 URL
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// 현재가
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_price: Option<Decimal>,
    /// 시가총액
    #[serde(skip_serializing_if = "Option::is_none")]
    pub market_cap: Option<Decimal>,
    /// 시가총액 순위
    #[serde(skip_serializing_if = "Option::is_none")]
    pub market_cap_rank: Option<u32>,
    /// 24시간 가격 변동률 (%)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price_change_percentage_24h: Option<Decimal>,
    /// 24시간 거래량
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_volume: Option<Decimal>,
    /// 24시간 최고가
    #[serde(skip_serializing_if = "Option::is_none")]
    pub high_24h: Option<Decimal>,
    /// 24시간 최저가
    #[serde(skip_serializing_if = "Option::is_none")]
    pub low_24h: Option<Decimal>,
    /// 역대 최고가
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ath: Option<Decimal>,
    /// 역대 최고가 달성일
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ath_date: Option<DateTime<Utc>>,
    /// 역대 최저가
    #[serde(skip_serializing_if = "Option::is_none")]
    pub atl: Option<Decimal>,
    /// 유통 공급량
    #[serde(skip_serializing_if = "Option::is_none")]
    pub circulating_supply: Option<Decimal>,
    /// 총 공급량
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_supply: Option<Decimal>,
    /// 마지막 갱신 시간
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<DateTime<Utc>>,
}

/// 전체 시장 개요.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "utoipa-support", derive(utoipa::ToSchema))]
pub struct MarketOverview {
    /// 전체 시가총액 (USD)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_market_cap: Option<Decimal>,
    /// 전체 24시간 거래량 (USD)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_volume: Option<Decimal>,
    /// BTC 도미넌스 (%)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub btc_dominance: Option<Decimal>,
    /// ETH 도미넌스 (%)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub eth_dominance: Option<Decimal>,
    /// 활성 코인 수
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active_cryptocurrencies: Option<u32>,
    /// 전체 시가총액 24시간 변동률 (%)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub market_cap_change_percentage_24h: Option<Decimal>,
    /// 기준 시간
    pub updated_at: DateTime<Utc>,
}

/// 차트의 단일 가격 포인트.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "utoipa-support", derive(utoipa::ToSchema))]
pub struct PricePoint {
    /// 시각
    pub timestamp: DateTime<Utc>,
    /// 가격
    pub price: Decimal,
}

/// 가격 차트 데이터.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "utoipa-support", derive(utoipa::ToSchema))]
pub struct MarketHistory {
    /// 코인 ID
    pub coin_id: String,
    /// 기준 통화 (예: "usd")
    pub vs_currency: String,
    /// 기간 (일)
    pub days: u32,
    /// 가격 포인트 (시간 오름차순)
    pub prices: Vec<PricePoint>,
}
