//! Yahoo Finance 차트 폴백.
//!
//! 두 암호화폐 API가 모두 실패한 차트 요청에 대한 최종 폴백입니다.
//! 코인 심볼을 `{SYMBOL}-USD` 형식으로 변환하여 일봉 종가를 조회합니다.

use crate::error::{DataError, Result};
use chrono::{TimeZone, Utc};
use coinlens_core::domain::{MarketHistory, PricePoint};
use rust_decimal::Decimal;
use tracing::debug;
use yahoo_finance_api as yahoo;

/// Yahoo Finance 차트 클라이언트.
pub struct YahooChartClient {
    connector: yahoo::YahooConnector,
}

impl YahooChartClient {
    /// 새로운 Yahoo 차트 클라이언트를 생성합니다.
    pub fn new() -> Result<Self> {
        let connector = yahoo::YahooConnector::new()
            .map_err(|e| DataError::YahooError(format!("connector init failed: {}", e)))?;

        Ok(Self { connector })
    }

    /// 기간(일)을 Yahoo range 문자열로 변환합니다.
    fn range_for_days(days: u32) -> &'static str {
        match days {
            0..=1 => "1d",
            2..=5 => "5d",
            6..=30 => "1mo",
            31..=90 => "3mo",
            91..=180 => "6mo",
            181..=365 => "1y",
            _ => "2y",
        }
    }

    /// 코인 심볼을 Yahoo 티커로 변환합니다 (예: "btc" → "BTC-USD").
    fn yahoo_ticker(symbol: &str) -> String {
        format!("{}-USD", symbol.to_uppercase())
    }

    /// 일봉 종가 기반 가격 차트를 조회합니다.
    pub async fn coin_chart(
        &self,
        coin_id: &str,
        symbol: &str,
        days: u32,
    ) -> Result<MarketHistory> {
        let ticker = Self::yahoo_ticker(symbol);
        let range = Self::range_for_days(days);

        debug!(%ticker, range, "Yahoo Finance chart request");

        let response = self
            .connector
            .get_quote_range(&ticker, "1d", range)
            .await
            .map_err(|e| DataError::YahooError(format!("{}: {}", ticker, e)))?;

        let quotes = response
            .quotes()
            .map_err(|e| DataError::YahooError(format!("quote parse: {}", e)))?;

        let mut prices: Vec<PricePoint> = quotes
            .iter()
            .filter_map(|q| {
                let price = Decimal::from_f64_retain(q.close)?;
                let timestamp = Utc.timestamp_opt(q.timestamp, 0).single()?;
                Some(PricePoint { timestamp, price })
            })
            .collect();
        prices.sort_by_key(|p| p.timestamp);

        Ok(MarketHistory {
            coin_id: coin_id.to_string(),
            vs_currency: "usd".to_string(),
            days,
            prices,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range_for_days() {
        assert_eq!(YahooChartClient::range_for_days(1), "1d");
        assert_eq!(YahooChartClient::range_for_days(7), "1mo");
        assert_eq!(YahooChartClient::range_for_days(30), "1mo");
        assert_eq!(YahooChartClient::range_for_days(90), "3mo");
        assert_eq!(YahooChartClient::range_for_days(365), "1y");
        assert_eq!(YahooChartClient::range_for_days(1000), "2y");
    }

    #[test]
    fn test_yahoo_ticker_format() {
        assert_eq!(YahooChartClient::yahoo_ticker("btc"), "BTC-USD");
        assert_eq!(YahooChartClient::yahoo_ticker("ETH"), "ETH-USD");
    }
}
