//! 업스트림 데이터 제공자.
//!
//! - `CoinGeckoClient`: 기본 시장 데이터 소스
//! - `CoinCapClient`: 폴백 시장 데이터 소스
//! - `YahooChartClient`: 차트 최종 폴백 (SYMBOL-USD)
//! - `NewsClient`: 암호화폐 뉴스

pub mod coincap;
pub mod coingecko;
pub mod news;
pub mod yahoo;

pub use coincap::CoinCapClient;
pub use coingecko::CoinGeckoClient;
pub use news::NewsClient;
pub use yahoo::YahooChartClient;
