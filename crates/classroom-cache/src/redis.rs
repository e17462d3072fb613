//! Redis cache client.
//!
//! Values are stored as JSON under keys namespaced by the configured prefix.

use redis::{AsyncCommands, Client, aio::ConnectionManager};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, error, instrument, warn};
use uuid::Uuid;

use crate::config::CacheConfig;

const HEALTH_PROBE_TTL: Duration = Duration::from_secs(10);

#[derive(Clone)]
pub struct RedisCache {
    conn: ConnectionManager,
    default_ttl: Duration,
    key_prefix: String,
}

impl std::fmt::Debug for RedisCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisCache")
            .field("default_ttl", &self.default_ttl)
            .field("key_prefix", &self.key_prefix)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("Redis connection error: {0}")]
    Connection(#[from] redis::RedisError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl RedisCache {
    /// Connects to `redis_url`. Fails fast when the server is unreachable.
    pub async fn new(redis_url: &str, config: &CacheConfig) -> Result<Self, CacheError> {
        let client = Client::open(redis_url)?;
        let conn = ConnectionManager::new(client).await?;

        Ok(Self {
            conn,
            default_ttl: Duration::from_secs(config.default_ttl_seconds),
            key_prefix: config.key_prefix.clone(),
        })
    }

    fn key(&self, key: &str) -> String {
        format!("{}:{}", self.key_prefix, key)
    }

    /// `None` on a miss, a Redis error or an undecodable value.
    #[instrument(skip(self), fields(cache.operation = "GET"))]
    pub async fn get<T>(&self, key: &str) -> Option<T>
    where
        T: for<'de> Deserialize<'de>,
    {
        let mut conn = self.conn.clone();
        let key = self.key(key);

        match conn.get::<_, Option<String>>(&key).await {
            Ok(Some(value)) => match serde_json::from_str(&value) {
                Ok(parsed) => Some(parsed),
                Err(e) => {
                    error!(cache.key = %key, error = %e, "Failed to deserialize cached value");
                    None
                }
            },
            Ok(None) => {
                debug!(cache.key = %key, "Cache miss");
                None
            }
            Err(e) => {
                error!(cache.key = %key, error = %e, "Redis GET error");
                None
            }
        }
    }

    #[instrument(skip(self, value), fields(cache.operation = "SET"))]
    pub async fn set<T>(&self, key: &str, value: &T) -> Result<(), CacheError>
    where
        T: Serialize,
    {
        self.set_with_ttl(key, value, self.default_ttl).await
    }

    #[instrument(skip(self, value), fields(cache.operation = "SETEX"))]
    pub async fn set_with_ttl<T>(
        &self,
        key: &str,
        value: &T,
        ttl: Duration,
    ) -> Result<(), CacheError>
    where
        T: Serialize,
    {
        let mut conn = self.conn.clone();
        let key = self.key(key);
        let json = serde_json::to_string(value)?;

        conn.set_ex::<_, _, ()>(&key, json, ttl.as_secs().max(1)).await?;
        debug!(cache.key = %key, cache.ttl_secs = %ttl.as_secs(), "Cache set");

        Ok(())
    }

    #[instrument(skip(self), fields(cache.operation = "DEL"))]
    pub async fn invalidate(&self, key: &str) -> Result<(), CacheError> {
        let mut conn = self.conn.clone();
        conn.del::<_, ()>(self.key(key)).await?;
        Ok(())
    }

    /// Writes a short-lived value and reads it back.
    #[instrument(skip(self))]
    pub async fn health_probe(&self) -> bool {
        let key = format!("health:{}", Uuid::new_v4());
        let token = Uuid::new_v4().to_string();

        if let Err(e) = self.set_with_ttl(&key, &token, HEALTH_PROBE_TTL).await {
            warn!(error = %e, "Cache health probe write failed");
            return false;
        }

        let healthy = self.get::<String>(&key).await.as_deref() == Some(token.as_str());

        if let Err(e) = self.invalidate(&key).await {
            debug!(error = %e, "Could not remove cache health probe key");
        }

        healthy
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct CachedSample {
        id: i32,
        name: String,
    }

    async fn local_cache() -> RedisCache {
        let config = CacheConfig::default();
        RedisCache::new("redis://127.0.0.1:6379", &config)
            .await
            .unwrap()
    }

    #[tokio::test]
    #[ignore = "requires Redis"]
    async fn test_set_and_get() {
        let cache = local_cache().await;
        let data = CachedSample {
            id: 1,
            name: "algorithms".to_string(),
        };

        cache.set("test:key", &data).await.unwrap();
        let retrieved: Option<CachedSample> = cache.get("test:key").await;
        assert_eq!(retrieved, Some(data));

        cache.invalidate("test:key").await.unwrap();
        assert_eq!(cache.get::<CachedSample>("test:key").await, None);
    }

    #[tokio::test]
    #[ignore = "requires Redis"]
    async fn test_health_probe_round_trips() {
        assert!(local_cache().await.health_probe().await);
    }

    #[tokio::test]
    async fn test_unreachable_server_errors() {
        let config = CacheConfig::default();
        let result = RedisCache::new("redis://127.0.0.1:1", &config).await;
        assert!(matches!(result, Err(CacheError::Connection(_))));
    }
}
