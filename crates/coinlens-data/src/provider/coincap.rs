//! CoinCap API 클라이언트.
//!
//! CoinGecko 장애 시 사용하는 폴백 소스입니다. CoinCap은 모든 숫자 필드를
//! 문자열로 반환하므로 Decimal로 파싱합니다. 가격은 USD 기준만 제공됩니다.

use crate::error::{DataError, Result};
use chrono::{TimeZone, Utc};
use coinlens_core::config::CoinCapConfig;
use coinlens_core::domain::{
    CryptoCurrency, CryptoCurrencyDetail, MarketHistory, PricePoint,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::str::FromStr;
use std::time::Duration;
use tracing::debug;

/// CoinCap API 클라이언트.
#[derive(Clone)]
pub struct CoinCapClient {
    client: reqwest::Client,
    base_url: String,
}

// ==================== 원시 응답 타입 ====================

#[derive(Debug, Deserialize)]
struct AssetsRaw {
    data: Vec<AssetRaw>,
}

#[derive(Debug, Deserialize)]
struct AssetEnvelopeRaw {
    data: AssetRaw,
}

/// `/assets` 항목. 숫자 필드는 모두 문자열입니다.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AssetRaw {
    id: String,
    rank: Option<String>,
    symbol: String,
    name: String,
    supply: Option<String>,
    max_supply: Option<String>,
    market_cap_usd: Option<String>,
    volume_usd_24_hr: Option<String>,
    price_usd: Option<String>,
    change_percent_24_hr: Option<String>,
}

#[derive(Debug, Deserialize)]
struct HistoryRaw {
    data: Vec<HistoryPointRaw>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct HistoryPointRaw {
    price_usd: String,
    /// Unix epoch 밀리초
    time: i64,
}

// ==================== 파싱 헬퍼 ====================

/// CoinCap의 문자열 숫자를 Decimal로 파싱합니다.
///
/// 빈 문자열과 파싱 불가 값은 None으로 처리합니다 (필드 단위 결손 허용).
fn parse_decimal(value: Option<&str>) -> Option<Decimal> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .and_then(|s| Decimal::from_str(s).ok())
}

fn parse_rank(value: Option<&str>) -> Option<u32> {
    value.and_then(|s| s.trim().parse().ok())
}

// ==================== 클라이언트 ====================

impl CoinCapClient {
    /// 새로운 CoinCap 클라이언트를 생성합니다.
    pub fn new(config: &CoinCapConfig, timeout_secs: u64) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);
        debug!(%url, "CoinCap request");

        let response = self.client.get(&url).query(query).send().await?;
        let status = response.status();

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(DataError::NotFound(path.to_string()));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(DataError::upstream(status, body));
        }

        Ok(response.json().await?)
    }

    /// 시가총액 순 코인 목록을 조회합니다.
    pub async fn list_coins(&self, limit: u32) -> Result<Vec<CryptoCurrency>> {
        let raw: AssetsRaw = self
            .get_json("/assets", &[("limit", limit.to_string())])
            .await?;

        Ok(raw.data.into_iter().map(map_asset).collect())
    }

    /// 코인 상세 정보를 조회합니다.
    ///
    /// CoinCap은 설명/홈페이지/ATH 등을 제공하지 않으므로 해당 필드는
    /// None으로 남습니다.
    pub async fn coin_detail(&self, id: &str) -> Result<CryptoCurrencyDetail> {
        let raw: AssetEnvelopeRaw = self.get_json(&format!("/assets/{}", id), &[]).await?;
        Ok(map_asset_detail(raw.data))
    }

    /// 일 단위 가격 차트를 조회합니다.
    pub async fn coin_chart(&self, id: &str, days: u32) -> Result<MarketHistory> {
        let end = Utc::now().timestamp_millis();
        let start = end - i64::from(days) * 86_400_000;

        let raw: HistoryRaw = self
            .get_json(
                &format!("/assets/{}/history", id),
                &[
                    ("interval", "d1".to_string()),
                    ("start", start.to_string()),
                    ("end", end.to_string()),
                ],
            )
            .await?;

        let mut prices: Vec<PricePoint> = raw
            .data
            .into_iter()
            .filter_map(|point| {
                let price = parse_decimal(Some(&point.price_usd))?;
                let timestamp = Utc.timestamp_millis_opt(point.time).single()?;
                Some(PricePoint { timestamp, price })
            })
            .collect();
        prices.sort_by_key(|p| p.timestamp);

        Ok(MarketHistory {
            coin_id: id.to_string(),
            vs_currency: "usd".to_string(),
            days,
            prices,
        })
    }
}

// ==================== 매핑 ====================

fn map_asset(raw: AssetRaw) -> CryptoCurrency {
    CryptoCurrency {
        id: raw.id,
        symbol: raw.symbol.to_lowercase(),
        name: raw.name,
        current_price: parse_decimal(raw.price_usd.as_deref()),
        market_cap: parse_decimal(raw.market_cap_usd.as_deref()),
        market_cap_rank: parse_rank(raw.rank.as_deref()),
        price_change_percentage_24h: parse_decimal(raw.change_percent_24_hr.as_deref()),
        total_volume: parse_decimal(raw.volume_usd_24_hr.as_deref()),
        circulating_supply: parse_decimal(raw.supply.as_deref()),
        total_supply: parse_decimal(raw.max_supply.as_deref()),
        image: None,
    }
}

fn map_asset_detail(raw: AssetRaw) -> CryptoCurrencyDetail {
    let summary = map_asset(raw);

    CryptoCurrencyDetail {
        id: summary.id,
        symbol: summary.symbol,
        name: summary.name,
        description: None,
        homepage: None,
        image: None,
        current_price: summary.current_price,
        market_cap: summary.market_cap,
        market_cap_rank: summary.market_cap_rank,
        price_change_percentage_24h: summary.price_change_percentage_24h,
        total_volume: summary.total_volume,
        high_24h: None,
        low_24h: None,
        ath: None,
        ath_date: None,
        atl: None,
        circulating_supply: summary.circulating_supply,
        total_supply: summary.total_supply,
        last_updated: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_parse_decimal_handles_coincap_strings() {
        assert_eq!(
            parse_decimal(Some("64250.1234567890")),
            Some(dec!(64250.1234567890))
        );
        assert_eq!(parse_decimal(Some("")), None);
        assert_eq!(parse_decimal(Some("   ")), None);
        assert_eq!(parse_decimal(Some("not-a-number")), None);
        assert_eq!(parse_decimal(None), None);
    }

    #[test]
    fn test_parse_rank() {
        assert_eq!(parse_rank(Some("1")), Some(1));
        assert_eq!(parse_rank(Some(" 42 ")), Some(42));
        assert_eq!(parse_rank(Some("n/a")), None);
    }

    #[tokio::test]
    async fn test_list_coins_parses_string_numbers() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", mockito::Matcher::Regex("^/assets".into()))
            .with_status(200)
            .with_body(
                r#"{"data": [{
                    "id": "bitcoin",
                    "rank": "1",
                    "symbol": "BTC",
                    "name": "Bitcoin",
                    "supply": "19700000.0",
                    "maxSupply": "21000000.0",
                    "marketCapUsd": "1260000000000.55",
                    "volumeUsd24Hr": "32000000000.12",
                    "priceUsd": "64250.12",
                    "changePercent24Hr": "-1.25"
                }]}"#,
            )
            .create_async()
            .await;

        let client = CoinCapClient::new(
            &CoinCapConfig {
                base_url: server.url(),
            },
            5,
        )
        .unwrap();

        let coins = client.list_coins(10).await.unwrap();
        assert_eq!(coins.len(), 1);
        assert_eq!(coins[0].symbol, "btc");
        assert_eq!(coins[0].market_cap_rank, Some(1));
        assert_eq!(coins[0].current_price, Some(dec!(64250.12)));
        assert_eq!(coins[0].price_change_percentage_24h, Some(dec!(-1.25)));
    }

    #[tokio::test]
    async fn test_detail_not_found() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/assets/nope")
            .with_status(404)
            .create_async()
            .await;

        let client = CoinCapClient::new(
            &CoinCapConfig {
                base_url: server.url(),
            },
            5,
        )
        .unwrap();

        let err = client.coin_detail("nope").await.unwrap_err();
        assert!(err.is_not_found());
    }
}
