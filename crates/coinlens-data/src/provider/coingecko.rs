//! CoinGecko API 클라이언트.
//!
//! 기본 시장 데이터 소스입니다. 코인 목록, 상세, 가격 차트, 시장 개요를
//! 제공합니다.
//!
//! # API 키
//!
//! 데모 티어 키는 `x-cg-demo-api-key` 헤더로 전달되며 선택입니다.
//! 키가 없으면 공개 rate limit이 적용됩니다.

use crate::error::{DataError, Result};
use chrono::{DateTime, TimeZone, Utc};
use coinlens_core::config::CoinGeckoConfig;
use coinlens_core::domain::{
    CryptoCurrency, CryptoCurrencyDetail, MarketHistory, MarketOverview, PricePoint,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;
use tracing::debug;

/// CoinGecko API 클라이언트.
#[derive(Clone)]
pub struct CoinGeckoClient {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

// ==================== 원시 응답 타입 ====================

/// `/coins/markets` 항목.
#[derive(Debug, Deserialize)]
struct MarketCoinRaw {
    id: String,
    symbol: String,
    name: String,
    current_price: Option<Decimal>,
    market_cap: Option<Decimal>,
    market_cap_rank: Option<u32>,
    price_change_percentage_24h: Option<Decimal>,
    total_volume: Option<Decimal>,
    circulating_supply: Option<Decimal>,
    total_supply: Option<Decimal>,
    image: Option<String>,
}

/// `/coins/{id}` 응답.
#[derive(Debug, Deserialize)]
struct CoinDetailRaw {
    id: String,
    symbol: String,
    name: String,
    #[serde(default)]
    description: Option<LocalizedText>,
    #[serde(default)]
    links: Option<CoinLinksRaw>,
    #[serde(default)]
    image: Option<CoinImageRaw>,
    market_cap_rank: Option<u32>,
    #[serde(default)]
    market_data: Option<MarketDataRaw>,
    last_updated: Option<DateTime<Utc>>,
}

#[derive(Debug, Default, Deserialize)]
struct LocalizedText {
    #[serde(default)]
    en: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct CoinLinksRaw {
    #[serde(default)]
    homepage: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
struct CoinImageRaw {
    #[serde(default)]
    large: Option<String>,
}

/// 통화별 값 맵 (`{"usd": 64250.12, ...}`).
type CurrencyMap = HashMap<String, Decimal>;

#[derive(Debug, Default, Deserialize)]
struct MarketDataRaw {
    #[serde(default)]
    current_price: CurrencyMap,
    #[serde(default)]
    market_cap: CurrencyMap,
    price_change_percentage_24h: Option<Decimal>,
    #[serde(default)]
    total_volume: CurrencyMap,
    #[serde(default)]
    high_24h: CurrencyMap,
    #[serde(default)]
    low_24h: CurrencyMap,
    #[serde(default)]
    ath: CurrencyMap,
    #[serde(default)]
    ath_date: HashMap<String, DateTime<Utc>>,
    #[serde(default)]
    atl: CurrencyMap,
    circulating_supply: Option<Decimal>,
    total_supply: Option<Decimal>,
}

/// `/coins/{id}/market_chart` 응답.
///
/// prices는 `[timestamp_ms, price]` 쌍의 배열입니다.
#[derive(Debug, Deserialize)]
struct MarketChartRaw {
    prices: Vec<(i64, Decimal)>,
}

/// `/global` 응답.
#[derive(Debug, Deserialize)]
struct GlobalRaw {
    data: GlobalDataRaw,
}

#[derive(Debug, Deserialize)]
struct GlobalDataRaw {
    #[serde(default)]
    total_market_cap: CurrencyMap,
    #[serde(default)]
    total_volume: CurrencyMap,
    #[serde(default)]
    market_cap_percentage: CurrencyMap,
    active_cryptocurrencies: Option<u32>,
    market_cap_change_percentage_24h_usd: Option<Decimal>,
}

// ==================== 클라이언트 ====================

impl CoinGeckoClient {
    /// 새로운 CoinGecko 클라이언트를 생성합니다.
    pub fn new(config: &CoinGeckoConfig, timeout_secs: u64) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        })
    }

    /// 공통 GET 요청. 404는 NotFound로, 그 외 에러 상태는 UpstreamStatus로 매핑합니다.
    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);
        debug!(%url, "CoinGecko request");

        let mut request = self.client.get(&url).query(query);
        if let Some(key) = &self.api_key {
            request = request.header("x-cg-demo-api-key", key);
        }

        let response = request.send().await?;
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
    pub async fn list_coins(&self, vs_currency: &str, limit: u32) -> Result<Vec<CryptoCurrency>> {
        let raw: Vec<MarketCoinRaw> = self
            .get_json(
                "/coins/markets",
                &[
                    ("vs_currency", vs_currency.to_string()),
                    ("order", "market_cap_desc".to_string()),
                    ("per_page", limit.to_string()),
                    ("page", "1".to_string()),
                ],
            )
            .await?;

        Ok(raw.into_iter().map(map_market_coin).collect())
    }

    /// 코인 상세 정보를 조회합니다.
    pub async fn coin_detail(&self, id: &str, vs_currency: &str) -> Result<CryptoCurrencyDetail> {
        let raw: CoinDetailRaw = self
            .get_json(
                &format!("/coins/{}", id),
                &[
                    ("localization", "false".to_string()),
                    ("tickers", "false".to_string()),
                    ("community_data", "false".to_string()),
                    ("developer_data", "false".to_string()),
                ],
            )
            .await?;

        Ok(map_coin_detail(raw, vs_currency))
    }

    /// 가격 차트를 조회합니다.
    pub async fn coin_chart(
        &self,
        id: &str,
        vs_currency: &str,
        days: u32,
    ) -> Result<MarketHistory> {
        let raw: MarketChartRaw = self
            .get_json(
                &format!("/coins/{}/market_chart", id),
                &[
                    ("vs_currency", vs_currency.to_string()),
                    ("days", days.to_string()),
                ],
            )
            .await?;

        let mut prices: Vec<PricePoint> = raw
            .prices
            .into_iter()
            .filter_map(|(ts_ms, price)| {
                Utc.timestamp_millis_opt(ts_ms)
                    .single()
                    .map(|timestamp| PricePoint { timestamp, price })
            })
            .collect();
        prices.sort_by_key(|p| p.timestamp);

        Ok(MarketHistory {
            coin_id: id.to_string(),
            vs_currency: vs_currency.to_string(),
            days,
            prices,
        })
    }

    /// 전체 시장 개요를 조회합니다.
    pub async fn market_overview(&self) -> Result<MarketOverview> {
        let raw: GlobalRaw = self.get_json("/global", &[]).await?;
        let data = raw.data;

        Ok(MarketOverview {
            total_market_cap: data.total_market_cap.get("usd").copied(),
            total_volume: data.total_volume.get("usd").copied(),
            btc_dominance: data.market_cap_percentage.get("btc").copied(),
            eth_dominance: data.market_cap_percentage.get("eth").copied(),
            active_cryptocurrencies: data.active_cryptocurrencies,
            market_cap_change_percentage_24h: data.market_cap_change_percentage_24h_usd,
            updated_at: Utc::now(),
        })
    }
}

// ==================== 매핑 ====================

fn map_market_coin(raw: MarketCoinRaw) -> CryptoCurrency {
    CryptoCurrency {
        id: raw.id,
        symbol: raw.symbol,
        name: raw.name,
        current_price: raw.current_price,
        market_cap: raw.market_cap,
        market_cap_rank: raw.market_cap_rank,
        price_change_percentage_24h: raw.price_change_percentage_24h,
        total_volume: raw.total_volume,
        circulating_supply: raw.circulating_supply,
        total_supply: raw.total_supply,
        image: raw.image,
    }
}

fn map_coin_detail(raw: CoinDetailRaw, vs: &str) -> CryptoCurrencyDetail {
    let market = raw.market_data.unwrap_or_default();

    CryptoCurrencyDetail {
        id: raw.id,
        symbol: raw.symbol,
        name: raw.name,
        description: raw
            .description
            .and_then(|d| d.en)
            .filter(|text| !text.is_empty()),
        homepage: raw
            .links
            .and_then(|l| l.homepage.into_iter().find(|url| !url.is_empty())),
        image: raw.image.and_then(|i| i.large),
        current_price: market.current_price.get(vs).copied(),
        market_cap: market.market_cap.get(vs).copied(),
        market_cap_rank: raw.market_cap_rank,
        price_change_percentage_24h: market.price_change_percentage_24h,
        total_volume: market.total_volume.get(vs).copied(),
        high_24h: market.high_24h.get(vs).copied(),
        low_24h: market.low_24h.get(vs).copied(),
        ath: market.ath.get(vs).copied(),
        ath_date: market.ath_date.get(vs).copied(),
        atl: market.atl.get(vs).copied(),
        circulating_supply: market.circulating_supply,
        total_supply: market.total_supply,
        last_updated: raw.last_updated,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use coinlens_core::config::CoinGeckoConfig;
    use rust_decimal_macros::dec;

    fn test_client(base_url: String) -> CoinGeckoClient {
        CoinGeckoClient::new(
            &CoinGeckoConfig {
                base_url,
                api_key: None,
            },
            5,
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_list_coins_maps_fields() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/coins/markets")
            .match_query(mockito::Matcher::UrlEncoded(
                "vs_currency".into(),
                "usd".into(),
            ))
            .with_status(200)
            .with_body(
                r#"[{
                    "id": "bitcoin",
                    "symbol": "btc",
                    "name": "Bitcoin",
                    "current_price": 64250.12,
                    "market_cap": 1260000000000,
                    "market_cap_rank": 1,
                    "price_change_percentage_24h": -1.25,
                    "total_volume": 32000000000,
                    "circulating_supply": 19700000,
                    "total_supply": 21000000,
                    "image": "https://example.com/btc.png"
                }]"#,
            )
            .create_async()
            .await;

        let client = test_client(server.url());
        let coins = client.list_coins("usd", 10).await.unwrap();

        mock.assert_async().await;
        assert_eq!(coins.len(), 1);
        assert_eq!(coins[0].id, "bitcoin");
        assert_eq!(coins[0].market_cap_rank, Some(1));
        assert_eq!(coins[0].current_price, Some(dec!(64250.12)));
    }

    #[tokio::test]
    async fn test_coin_detail_picks_vs_currency() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", mockito::Matcher::Regex("^/coins/bitcoin".into()))
            .with_status(200)
            .with_body(
                r#"{
                    "id": "bitcoin",
                    "symbol": "btc",
                    "name": "Bitcoin",
                    "description": {"en": "Digital gold"},
                    "links": {"homepage": ["", "https://bitcoin.org"]},
                    "image": {"large": "https://example.com/btc.png"},
                    "market_cap_rank": 1,
                    "market_data": {
                        "current_price": {"usd": 64000, "eur": 59000},
                        "market_cap": {"usd": 1260000000000},
                        "high_24h": {"usd": 65000},
                        "low_24h": {"usd": 63000},
                        "ath": {"usd": 73000},
                        "atl": {"usd": 67.81},
                        "circulating_supply": 19700000
                    }
                }"#,
            )
            .create_async()
            .await;

        let client = test_client(server.url());
        let detail = client.coin_detail("bitcoin", "usd").await.unwrap();

        assert_eq!(detail.current_price, Some(dec!(64000)));
        assert_eq!(detail.description.as_deref(), Some("Digital gold"));
        assert_eq!(detail.homepage.as_deref(), Some("https://bitcoin.org"));
        assert_eq!(detail.high_24h, Some(dec!(65000)));
    }

    #[tokio::test]
    async fn test_unknown_coin_maps_to_not_found() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", mockito::Matcher::Regex("^/coins/nope".into()))
            .with_status(404)
            .with_body(r#"{"error": "coin not found"}"#)
            .create_async()
            .await;

        let client = test_client(server.url());
        let err = client.coin_detail("nope", "usd").await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_upstream_error_carries_status_and_body() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/global")
            .with_status(429)
            .with_body("rate limited")
            .create_async()
            .await;

        let client = test_client(server.url());
        let err = client.market_overview().await.unwrap_err();
        match err {
            DataError::UpstreamStatus { status, body } => {
                assert_eq!(status, 429);
                assert_eq!(body, "rate limited");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_chart_sorts_points_ascending() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock(
                "GET",
                mockito::Matcher::Regex("^/coins/bitcoin/market_chart".into()),
            )
            .with_status(200)
            .with_body(
                r#"{"prices": [[1735693200000, 64500.5], [1735689600000, 64000.0]]}"#,
            )
            .create_async()
            .await;

        let client = test_client(server.url());
        let history = client.coin_chart("bitcoin", "usd", 1).await.unwrap();

        assert_eq!(history.prices.len(), 2);
        assert!(history.prices[0].timestamp < history.prices[1].timestamp);
        assert_eq!(history.prices[0].price, dec!(64000.0));
    }
}
