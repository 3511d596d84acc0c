//! Cache-aside 게이트웨이.
//!
//! 키와 fetch 함수를 받아 로컬 티어 → 분산 티어 → 업스트림 순으로 조회하고,
//! 업스트림 결과를 두 티어에 TTL과 함께 기록합니다.
//!
//! # 동시성
//!
//! 같은 키에 대한 동시 미스는 중복 제거되지 않습니다. 두 호출자가
//! 동시에 미스하면 둘 다 fetch를 실행할 수 있습니다 (single-flight 미보장).
//!
//! # 분산 티어 장애
//!
//! Redis 조회 실패는 미스로, 저장 실패는 로컬 전용 기록으로 강등되며
//! 호출자에게는 절대 캐시 인프라 오류가 전파되지 않습니다.

use crate::cache::memory::MemoryCache;
use crate::cache::redis::RedisCache;
use crate::error::Result;
use serde::{de::DeserializeOwned, Serialize};
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tracing::{debug, warn};

/// 분산 티어 전략.
///
/// 시작 시점에 Redis URL 존재 여부로 한 번 선택됩니다.
/// 런타임 null 체크 대신 명시적 두 변형으로 표현합니다.
pub enum DistributedTier {
    /// 분산 티어 없음 (로컬 전용 캐싱)
    Disabled,
    /// Redis 분산 티어
    Redis(RedisCache),
}

impl DistributedTier {
    /// 분산 티어 활성 여부.
    pub fn is_enabled(&self) -> bool {
        matches!(self, Self::Redis(_))
    }
}

/// 캐시 값의 출처.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheSource {
    /// 로컬(메모리) 티어 히트
    Local,
    /// 분산(Redis) 티어 히트
    Distributed,
    /// 업스트림 fetch 실행
    Origin,
}

/// 게이트웨이 히트/미스 카운터.
#[derive(Default)]
struct CacheStats {
    local_hits: AtomicU64,
    distributed_hits: AtomicU64,
    misses: AtomicU64,
}

/// 헬스 엔드포인트에 노출되는 캐시 통계 스냅샷.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "utoipa-support", derive(utoipa::ToSchema))]
pub struct CacheStatsSnapshot {
    pub local_hits: u64,
    pub distributed_hits: u64,
    pub misses: u64,
    pub hit_rate: f64,
}

/// 백필 시 로컬 티어에 적용할 TTL을 계산합니다.
///
/// 분산 엔트리의 남은 수명을 알 수 없으면 요청 TTL을 그대로 사용합니다.
fn backfill_ttl(requested: Duration, remaining: Option<Duration>) -> Duration {
    match remaining {
        Some(remaining) => requested.min(remaining),
        None => requested,
    }
}

/// 2티어 cache-aside 게이트웨이.
pub struct CacheGateway {
    local: MemoryCache,
    distributed: DistributedTier,
    stats: CacheStats,
}

impl CacheGateway {
    /// 주어진 분산 티어로 게이트웨이를 생성합니다.
    pub fn new(distributed: DistributedTier) -> Self {
        Self {
            local: MemoryCache::new(),
            distributed,
            stats: CacheStats::default(),
        }
    }

    /// 로컬 전용 게이트웨이를 생성합니다.
    pub fn local_only() -> Self {
        Self::new(DistributedTier::Disabled)
    }

    /// 분산 티어 활성 여부.
    pub fn distributed_enabled(&self) -> bool {
        self.distributed.is_enabled()
    }

    /// 분산 티어 상태를 확인합니다. 비활성이면 None을 반환합니다.
    pub async fn distributed_health(&self) -> Option<bool> {
        match &self.distributed {
            DistributedTier::Disabled => None,
            DistributedTier::Redis(redis) => Some(redis.health_check().await.unwrap_or(false)),
        }
    }

    /// 캐시된 값을 반환하거나 fetch로 채웁니다.
    ///
    /// fetch가 실패하면 오류가 그대로 전파되고 아무것도 기록되지 않습니다.
    pub async fn get_or_fetch<T, F, Fut>(&self, key: &str, ttl: Duration, fetch: F) -> Result<T>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let (value, _) = self.get_or_fetch_tagged(key, ttl, fetch).await?;
        Ok(value)
    }

    /// `get_or_fetch`와 동일하지만 값의 출처 태그도 반환합니다.
    pub async fn get_or_fetch_tagged<T, F, Fut>(
        &self,
        key: &str,
        ttl: Duration,
        fetch: F,
    ) -> Result<(T, CacheSource)>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        // 1. 로컬 티어
        if let Some(value) = self.local.get::<T>(key).await? {
            self.stats.local_hits.fetch_add(1, Ordering::Relaxed);
            debug!(key, source = "local", "Cache hit");
            return Ok((value, CacheSource::Local));
        }

        // 2. 분산 티어 (조회 실패는 미스로 강등)
        if let DistributedTier::Redis(redis) = &self.distributed {
            match redis.get::<T>(key).await {
                Ok(Some(value)) => {
                    self.stats.distributed_hits.fetch_add(1, Ordering::Relaxed);
                    debug!(key, source = "distributed", "Cache hit");
                    // 로컬 티어 백필: 전체 TTL이 아닌 분산 엔트리의 남은 수명으로
                    // 상한을 두어 만료 직전 값의 신선도 창이 늘어나지 않게 함
                    let remaining = redis.remaining_ttl(key).await.ok().flatten();
                    self.local.set(key, &value, backfill_ttl(ttl, remaining)).await?;
                    return Ok((value, CacheSource::Distributed));
                }
                Ok(None) => {}
                Err(e) => {
                    warn!(key, error = %e, "Distributed cache lookup failed, treating as miss");
                }
            }
        }

        // 3. 업스트림 fetch (실패 시 아무것도 기록하지 않음)
        self.stats.misses.fetch_add(1, Ordering::Relaxed);
        debug!(key, "Cache miss, fetching from origin");
        let value = fetch().await?;

        self.local.set(key, &value, ttl).await?;
        if let DistributedTier::Redis(redis) = &self.distributed {
            if let Err(e) = redis.set_with_ttl(key, &value, ttl).await {
                warn!(key, error = %e, "Distributed cache store failed, keeping local-only entry");
            }
        }

        Ok((value, CacheSource::Origin))
    }

    /// 두 티어 모두에서 키를 제거합니다.
    pub async fn invalidate(&self, key: &str) {
        self.local.remove(key).await;
        if let DistributedTier::Redis(redis) = &self.distributed {
            if let Err(e) = redis.delete(key).await {
                warn!(key, error = %e, "Distributed cache invalidation failed");
            }
        }
    }

    /// 현재 통계 스냅샷을 반환합니다.
    pub fn stats(&self) -> CacheStatsSnapshot {
        let local_hits = self.stats.local_hits.load(Ordering::Relaxed);
        let distributed_hits = self.stats.distributed_hits.load(Ordering::Relaxed);
        let misses = self.stats.misses.load(Ordering::Relaxed);
        let total = local_hits + distributed_hits + misses;
        let hit_rate = if total > 0 {
            (local_hits + distributed_hits) as f64 / total as f64
        } else {
            0.0
        };

        CacheStatsSnapshot {
            local_hits,
            distributed_hits,
            misses,
            hit_rate,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DataError;
    use std::sync::atomic::AtomicU32;
    use std::sync::Arc;

    fn counting_fetch(
        calls: Arc<AtomicU32>,
        value: u32,
    ) -> impl FnOnce() -> std::pin::Pin<Box<dyn Future<Output = Result<u32>> + Send>> {
        move || {
            Box::pin(async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok(value)
            })
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_hit_within_ttl_does_not_refetch() {
        let gateway = CacheGateway::local_only();
        let calls = Arc::new(AtomicU32::new(0));

        let v1 = gateway
            .get_or_fetch("k", Duration::from_secs(60), counting_fetch(calls.clone(), 7))
            .await
            .unwrap();
        assert_eq!(v1, 7);

        tokio::time::advance(Duration::from_secs(30)).await;

        let v2 = gateway
            .get_or_fetch("k", Duration::from_secs(60), counting_fetch(calls.clone(), 8))
            .await
            .unwrap();

        // TTL 내 두 번째 호출은 fetch를 다시 실행하지 않아야 함
        assert_eq!(v2, 7);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_expired_entry_refetches_exactly_once() {
        let gateway = CacheGateway::local_only();
        let calls = Arc::new(AtomicU32::new(0));

        gateway
            .get_or_fetch("k", Duration::from_secs(10), counting_fetch(calls.clone(), 1))
            .await
            .unwrap();

        tokio::time::advance(Duration::from_secs(11)).await;

        let v = gateway
            .get_or_fetch("k", Duration::from_secs(10), counting_fetch(calls.clone(), 2))
            .await
            .unwrap();

        assert_eq!(v, 2);
        assert_eq!(calls.load(Ordering::SeqCst), 2);

        // 갱신된 값이 캐시되어 있어야 함
        let v = gateway
            .get_or_fetch("k", Duration::from_secs(10), counting_fetch(calls.clone(), 3))
            .await
            .unwrap();
        assert_eq!(v, 2);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_fetch_failure_propagates_and_caches_nothing() {
        let gateway = CacheGateway::local_only();

        let result: Result<u32> = gateway
            .get_or_fetch("k", Duration::from_secs(60), || async {
                Err(DataError::UpstreamStatus {
                    status: 500,
                    body: "boom".to_string(),
                })
            })
            .await;
        assert!(result.is_err());

        // 실패 결과는 캐시되지 않으므로 다음 호출은 fetch를 다시 실행
        let calls = Arc::new(AtomicU32::new(0));
        let v = gateway
            .get_or_fetch("k", Duration::from_secs(60), counting_fetch(calls.clone(), 9))
            .await
            .unwrap();
        assert_eq!(v, 9);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_fetch_failure_leaves_prior_value_intact() {
        let gateway = CacheGateway::local_only();

        gateway
            .get_or_fetch("k", Duration::from_secs(60), || async { Ok(42u32) })
            .await
            .unwrap();

        // 캐시 히트 경로에서는 fetch가 실행되지 않으므로 실패할 수 없음
        let v: u32 = gateway
            .get_or_fetch("k", Duration::from_secs(60), || async {
                Err(DataError::UpstreamStatus {
                    status: 502,
                    body: "down".to_string(),
                })
            })
            .await
            .unwrap();
        assert_eq!(v, 42);
    }

    #[tokio::test(start_paused = true)]
    async fn test_source_tags() {
        let gateway = CacheGateway::local_only();

        let (_, source) = gateway
            .get_or_fetch_tagged("k", Duration::from_secs(60), || async { Ok(1u32) })
            .await
            .unwrap();
        assert_eq!(source, CacheSource::Origin);

        let (_, source) = gateway
            .get_or_fetch_tagged("k", Duration::from_secs(60), || async { Ok(2u32) })
            .await
            .unwrap();
        assert_eq!(source, CacheSource::Local);
    }

    #[tokio::test(start_paused = true)]
    async fn test_invalidate_forces_refetch() {
        let gateway = CacheGateway::local_only();
        let calls = Arc::new(AtomicU32::new(0));

        gateway
            .get_or_fetch("k", Duration::from_secs(60), counting_fetch(calls.clone(), 1))
            .await
            .unwrap();
        gateway.invalidate("k").await;

        let v = gateway
            .get_or_fetch("k", Duration::from_secs(60), counting_fetch(calls.clone(), 2))
            .await
            .unwrap();
        assert_eq!(v, 2);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_disabled_tier_is_transparent() {
        // 분산 티어가 없어도 로컬 전용 캐싱과 동일하게 동작해야 함
        let gateway = CacheGateway::new(DistributedTier::Disabled);
        assert!(!gateway.distributed_enabled());
        assert_eq!(gateway.distributed_health().await, None);

        let v = gateway
            .get_or_fetch("k", Duration::from_secs(60), || async { Ok(5u32) })
            .await
            .unwrap();
        assert_eq!(v, 5);

        let stats = gateway.stats();
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.local_hits, 0);
    }

    #[test]
    fn test_backfill_ttl_capped_by_remaining_lifetime() {
        // 분산 엔트리가 만료 직전이면 로컬 백필도 그만큼만 살아야 함
        assert_eq!(
            backfill_ttl(Duration::from_secs(60), Some(Duration::from_secs(3))),
            Duration::from_secs(3)
        );
        assert_eq!(
            backfill_ttl(Duration::from_secs(60), Some(Duration::from_secs(600))),
            Duration::from_secs(60)
        );
    }

    #[test]
    fn test_backfill_ttl_without_remaining_uses_requested() {
        assert_eq!(
            backfill_ttl(Duration::from_secs(60), None),
            Duration::from_secs(60)
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_stats_hit_rate() {
        let gateway = CacheGateway::local_only();

        for _ in 0..3 {
            gateway
                .get_or_fetch("k", Duration::from_secs(60), || async { Ok(1u32) })
                .await
                .unwrap();
        }

        let stats = gateway.stats();
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.local_hits, 2);
        assert!((stats.hit_rate - 2.0 / 3.0).abs() < f64::EPSILON);
    }
}
