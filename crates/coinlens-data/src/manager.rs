//! 시장 데이터 매니저.
//!
//! 캐시 게이트웨이와 업스트림 제공자를 조합한 조회 파사드입니다.
//! 모든 조회 경로는 cache-aside이며 데이터 종류별 TTL과 키 체계를 사용합니다.
//!
//! # 폴백 정책
//!
//! CoinGecko → CoinCap 순차 폴백 (병합 없음), 차트는 마지막으로 Yahoo
//! Finance(`SYMBOL-USD`)까지 시도합니다. 폴백 체인이 모두 소진되면 마지막
//! 오류가 전파되고 실패는 캐시되지 않습니다.
//!
//! 기본 소스의 404는 그 자체로 확정이 아닙니다. 폴백 소스도 놓친 경우에만
//! NotFound가 반환됩니다.

use crate::cache::CacheGateway;
use crate::error::{DataError, Result};
use crate::provider::{CoinCapClient, CoinGeckoClient, NewsClient, YahooChartClient};
use coinlens_core::config::{AppConfig, CacheConfig};
use coinlens_core::domain::{
    CryptoCurrency, CryptoCurrencyDetail, CryptoNewsItem, MarketHistory, MarketOverview,
};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// 시장 데이터 매니저.
pub struct MarketDataManager {
    gateway: Arc<CacheGateway>,
    coingecko: CoinGeckoClient,
    coincap: CoinCapClient,
    yahoo: YahooChartClient,
    news: NewsClient,
    ttl: CacheConfig,
}

impl MarketDataManager {
    /// 설정과 게이트웨이로 매니저를 생성합니다.
    pub fn new(config: &AppConfig, gateway: Arc<CacheGateway>) -> Result<Self> {
        let timeout = config.providers.request_timeout_secs;

        info!("Initializing MarketDataManager...");

        Ok(Self {
            gateway,
            coingecko: CoinGeckoClient::new(&config.providers.coingecko, timeout)?,
            coincap: CoinCapClient::new(&config.providers.coincap, timeout)?,
            yahoo: YahooChartClient::new()?,
            news: NewsClient::new(&config.providers.news, timeout)?,
            ttl: config.cache.clone(),
        })
    }

    /// 캐시 게이트웨이 참조.
    pub fn gateway(&self) -> &CacheGateway {
        &self.gateway
    }

    // ==================== 캐시 키 ====================

    fn coins_list_key(vs: &str, limit: u32) -> String {
        format!("coins:list:{}:{}", vs, limit)
    }

    fn coin_detail_key(id: &str) -> String {
        format!("coins:detail:{}", id)
    }

    fn coin_chart_key(id: &str, days: u32) -> String {
        format!("coins:chart:{}:{}", id, days)
    }

    fn overview_key() -> &'static str {
        "market:overview"
    }

    fn latest_news_key() -> &'static str {
        "news:latest"
    }

    fn coin_news_key(id: &str) -> String {
        format!("news:coin:{}", id)
    }

    // ==================== 조회 경로 ====================

    /// 시가총액 순 코인 목록을 조회합니다.
    pub async fn list_coins(&self, vs_currency: &str, limit: u32) -> Result<Vec<CryptoCurrency>> {
        let key = Self::coins_list_key(vs_currency, limit);
        let ttl = Duration::from_secs(self.ttl.coin_list_secs);

        self.gateway
            .get_or_fetch(&key, ttl, || async {
                match self.coingecko.list_coins(vs_currency, limit).await {
                    Ok(coins) => Ok(coins),
                    Err(e) => {
                        warn!(error = %e, "CoinGecko list failed, falling back to CoinCap");
                        self.coincap.list_coins(limit).await
                    }
                }
            })
            .await
    }

    /// 코인 상세 정보를 조회합니다.
    pub async fn coin_detail(&self, id: &str) -> Result<CryptoCurrencyDetail> {
        let key = Self::coin_detail_key(id);
        let ttl = Duration::from_secs(self.ttl.coin_detail_secs);

        self.gateway
            .get_or_fetch(&key, ttl, || async {
                match self.coingecko.coin_detail(id, "usd").await {
                    Ok(detail) => Ok(detail),
                    Err(primary) => {
                        warn!(id, error = %primary, "CoinGecko detail failed, falling back to CoinCap");
                        match self.coincap.coin_detail(id).await {
                            Ok(detail) => Ok(detail),
                            // 기본 소스의 NotFound는 폴백도 놓쳤을 때만 확정
                            Err(_) if primary.is_not_found() => Err(primary),
                            Err(fallback) => Err(fallback),
                        }
                    }
                }
            })
            .await
    }

    /// 가격 차트를 조회합니다.
    ///
    /// CoinGecko → CoinCap → Yahoo Finance 순으로 시도합니다. Yahoo 폴백은
    /// (캐시된) 상세 조회에서 티커 심볼을 얻을 수 있을 때만 사용됩니다.
    pub async fn coin_chart(&self, id: &str, days: u32) -> Result<MarketHistory> {
        let key = Self::coin_chart_key(id, days);
        let ttl = Duration::from_secs(self.ttl.chart_secs);

        self.gateway
            .get_or_fetch(&key, ttl, || async {
                match self.coingecko.coin_chart(id, "usd", days).await {
                    Ok(history) => Ok(history),
                    Err(primary) => {
                        warn!(id, error = %primary, "CoinGecko chart failed, falling back to CoinCap");
                        match self.coincap.coin_chart(id, days).await {
                            Ok(history) if !history.prices.is_empty() => Ok(history),
                            fallback_result => {
                                let fallback_err = match fallback_result {
                                    Ok(_) => DataError::NotFound(format!("chart for {}", id)),
                                    Err(e) => e,
                                };
                                warn!(id, error = %fallback_err, "CoinCap chart failed, trying Yahoo Finance");
                                self.yahoo_chart_fallback(id, days, fallback_err).await
                            }
                        }
                    }
                }
            })
            .await
    }

    /// Yahoo 차트 폴백. 심볼을 알 수 없으면 이전 오류를 그대로 전파합니다.
    async fn yahoo_chart_fallback(
        &self,
        id: &str,
        days: u32,
        prior_error: DataError,
    ) -> Result<MarketHistory> {
        let symbol = match self.coin_detail(id).await {
            Ok(detail) => detail.symbol,
            Err(_) => return Err(prior_error),
        };

        self.yahoo.coin_chart(id, &symbol, days).await
    }

    /// 전체 시장 개요를 조회합니다 (CoinGecko 전용).
    pub async fn market_overview(&self) -> Result<MarketOverview> {
        let ttl = Duration::from_secs(self.ttl.overview_secs);

        self.gateway
            .get_or_fetch(Self::overview_key(), ttl, || async {
                self.coingecko.market_overview().await
            })
            .await
    }

    /// 최신 암호화폐 뉴스를 조회합니다.
    pub async fn latest_news(&self) -> Result<Vec<CryptoNewsItem>> {
        let ttl = Duration::from_secs(self.ttl.news_secs);

        self.gateway
            .get_or_fetch(Self::latest_news_key(), ttl, || async {
                self.news.latest_news().await
            })
            .await
    }

    /// 특정 코인 관련 뉴스를 조회합니다.
    pub async fn coin_news(&self, coin_id: &str) -> Result<Vec<CryptoNewsItem>> {
        let key = Self::coin_news_key(coin_id);
        let ttl = Duration::from_secs(self.ttl.news_secs);

        self.gateway
            .get_or_fetch(&key, ttl, || async { self.news.coin_news(coin_id).await })
            .await
    }
}
