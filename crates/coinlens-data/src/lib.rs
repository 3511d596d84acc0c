//! # Coinlens Data
//!
//! 시장 데이터 수집과 캐싱을 담당합니다.
//!
//! - `cache`: 로컬(메모리) + 분산(Redis) 2티어 cache-aside 게이트웨이
//! - `provider`: CoinGecko/CoinCap/Yahoo Finance/뉴스 API 클라이언트
//! - `manager`: 캐시와 제공자를 조합한 조회 파사드

pub mod cache;
pub mod error;
pub mod manager;
pub mod provider;

pub use cache::{CacheGateway, CacheSource, CacheStatsSnapshot, DistributedTier, MemoryCache, RedisCache};
pub use error::{DataError, Result};
pub use manager::MarketDataManager;
