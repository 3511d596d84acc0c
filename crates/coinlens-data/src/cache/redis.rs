//! Redis 분산 캐시 티어.
//!
//! 여러 인스턴스가 같은 업스트림 데이터를 공유할 수 있도록
//! 선택적 분산 티어를 제공합니다. TTL은 SETEX로 Redis가 직접 관리합니다.

use crate::error::{DataError, Result};
use coinlens_core::config::RedisConfig;
use redis::{aio::MultiplexedConnection, AsyncCommands, Client};
use serde::{de::DeserializeOwned, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::info;

/// Redis 연결 래퍼.
#[derive(Clone)]
pub struct RedisCache {
    connection: Arc<RwLock<MultiplexedConnection>>,
}

impl RedisCache {
    /// 새로운 Redis 캐시 연결을 생성합니다.
    ///
    /// `config.url`이 없으면 호출하면 안 됩니다. 티어 활성 여부 판단은
    /// 호출자(`DistributedTier` 선택)의 책임입니다.
    pub async fn connect(config: &RedisConfig) -> Result<Self> {
        let url = config
            .url
            .as_deref()
            .ok_or_else(|| DataError::ConfigError("Redis URL not configured".to_string()))?;

        info!("Connecting to Redis...");

        let client = Client::open(url).map_err(|e| DataError::CacheError(e.to_string()))?;

        let connection = tokio::time::timeout(
            Duration::from_secs(config.connection_timeout_secs),
            client.get_multiplexed_async_connection(),
        )
        .await
        .map_err(|_| DataError::CacheError("Redis connection timed out".to_string()))?
        .map_err(|e| DataError::CacheError(e.to_string()))?;

        info!("Redis connection established");

        Ok(Self {
            connection: Arc::new(RwLock::new(connection)),
        })
    }

    /// Redis 상태를 확인합니다 (PING).
    pub async fn health_check(&self) -> Result<bool> {
        let mut conn = self.connection.write().await;
        let result: String = redis::cmd("PING")
            .query_async(&mut *conn)
            .await
            .map_err(|e| DataError::CacheError(e.to_string()))?;

        Ok(result == "PONG")
    }

    /// 캐시에서 값을 가져옵니다.
    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        let mut conn = self.connection.write().await;
        let value: Option<String> = conn
            .get(key)
            .await
            .map_err(|e| DataError::CacheError(e.to_string()))?;

        match value {
            Some(json) => {
                let parsed = serde_json::from_str(&json)
                    .map_err(|e| DataError::SerializationError(e.to_string()))?;
                Ok(Some(parsed))
            }
            None => Ok(None),
        }
    }

    /// TTL과 함께 값을 저장합니다.
    pub async fn set_with_ttl<T: Serialize + ?Sized>(
        &self,
        key: &str,
        value: &T,
        ttl: Duration,
    ) -> Result<()> {
        let json = serde_json::to_string(value)
            .map_err(|e| DataError::SerializationError(e.to_string()))?;

        // SETEX는 초 단위 양수 TTL만 허용
        let ttl_secs = ttl.as_secs().max(1);

        let mut conn = self.connection.write().await;
        let _: () = conn
            .set_ex(key, json, ttl_secs)
            .await
            .map_err(|e| DataError::CacheError(e.to_string()))?;

        Ok(())
    }

    /// 키의 남은 수명을 조회합니다.
    ///
    /// 키가 없거나 만료가 설정되지 않은 경우 None을 반환합니다.
    pub async fn remaining_ttl(&self, key: &str) -> Result<Option<Duration>> {
        let mut conn = self.connection.write().await;
        let ttl_secs: i64 = conn
            .ttl(key)
            .await
            .map_err(|e| DataError::CacheError(e.to_string()))?;

        // TTL은 키 없음(-2)/만료 없음(-1)을 음수로 구분함
        if ttl_secs < 0 {
            return Ok(None);
        }

        Ok(Some(Duration::from_secs(ttl_secs as u64)))
    }

    /// 캐시에서 키를 삭제합니다. 삭제된 키가 있으면 true를 반환합니다.
    pub async fn delete(&self, key: &str) -> Result<bool> {
        let mut conn = self.connection.write().await;
        let deleted: i64 = conn
            .del(key)
            .await
            .map_err(|e| DataError::CacheError(e.to_string()))?;

        Ok(deleted > 0)
    }
}
