//! 프로세스 로컬 메모리 캐시 티어.
//!
//! 값은 JSON 문자열로 저장하여 게이트웨이가 임의의 직렬화 가능 타입에
//! 대해 동작하도록 합니다. 만료는 읽기 시점에 lazy하게 확인합니다.

use crate::error::{DataError, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::time::Instant;

struct MemoryEntry {
    json: String,
    expires_at: Instant,
}

impl MemoryEntry {
    fn is_expired(&self, now: Instant) -> bool {
        now >= self.expires_at
    }
}

/// 메모리 캐시.
#[derive(Default)]
pub struct MemoryCache {
    entries: RwLock<HashMap<String, MemoryEntry>>,
}

impl MemoryCache {
    /// 빈 캐시를 생성합니다.
    pub fn new() -> Self {
        Self::default()
    }

    /// 캐시에서 값을 가져옵니다.
    ///
    /// 만료된 엔트리는 None을 반환하고 제거합니다.
    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        let now = Instant::now();

        {
            let entries = self.entries.read().await;
            match entries.get(key) {
                Some(entry) if !entry.is_expired(now) => {
                    let parsed = serde_json::from_str(&entry.json)
                        .map_err(|e| DataError::SerializationError(e.to_string()))?;
                    return Ok(Some(parsed));
                }
                Some(_) => {}
                None => return Ok(None),
            }
        }

        // 만료된 엔트리 제거 (재확인 후)
        let mut entries = self.entries.write().await;
        if let Some(entry) = entries.get(key) {
            if entry.is_expired(now) {
                entries.remove(key);
            }
        }

        Ok(None)
    }

    /// TTL과 함께 값을 저장합니다.
    pub async fn set<T: Serialize + ?Sized>(
        &self,
        key: &str,
        value: &T,
        ttl: Duration,
    ) -> Result<()> {
        let json = serde_json::to_string(value)
            .map_err(|e| DataError::SerializationError(e.to_string()))?;

        let entry = MemoryEntry {
            json,
            expires_at: Instant::now() + ttl,
        };

        let mut entries = self.entries.write().await;
        entries.insert(key.to_string(), entry);

        Ok(())
    }

    /// 키를 제거합니다. 존재했으면 true를 반환합니다.
    pub async fn remove(&self, key: &str) -> bool {
        let mut entries = self.entries.write().await;
        entries.remove(key).is_some()
    }

    /// 만료된 엔트리를 모두 제거하고 제거 개수를 반환합니다.
    pub async fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|_, entry| !entry.is_expired(now));
        before - entries.len()
    }

    /// 저장된 엔트리 수 (만료 여부 무관).
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    /// 캐시가 비어 있는지 여부.
    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_set_get_roundtrip() {
        let cache = MemoryCache::new();
        cache
            .set("k", &vec![1, 2, 3], Duration::from_secs(60))
            .await
            .unwrap();

        let value: Option<Vec<i32>> = cache.get("k").await.unwrap();
        assert_eq!(value, Some(vec![1, 2, 3]));
    }

    #[tokio::test(start_paused = true)]
    async fn test_expired_entry_is_removed_on_read() {
        let cache = MemoryCache::new();
        cache.set("k", &42u32, Duration::from_secs(10)).await.unwrap();

        tokio::time::advance(Duration::from_secs(11)).await;

        let value: Option<u32> = cache.get("k").await.unwrap();
        assert_eq!(value, None);
        assert_eq!(cache.len().await, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_purge_expired() {
        let cache = MemoryCache::new();
        cache.set("a", &1u32, Duration::from_secs(5)).await.unwrap();
        cache.set("b", &2u32, Duration::from_secs(60)).await.unwrap();

        tokio::time::advance(Duration::from_secs(6)).await;

        assert_eq!(cache.purge_expired().await, 1);
        assert_eq!(cache.len().await, 1);
        let b: Option<u32> = cache.get("b").await.unwrap();
        assert_eq!(b, Some(2));
    }
}
