//! 캐싱 레이어.
//!
//! - `MemoryCache`: 프로세스 로컬(빠른) 티어
//! - `RedisCache`: 분산(선택) 티어
//! - `CacheGateway`: 두 티어를 묶는 cache-aside 게이트웨이

pub mod gateway;
pub mod memory;
pub mod redis;

pub use gateway::{CacheGateway, CacheSource, CacheStatsSnapshot, DistributedTier};
pub use memory::MemoryCache;
pub use redis::RedisCache;
