//! Redis-backed fortune cache for multi-process deployments.
//!
//! Values are stored as JSON strings with `SET EX`, so Redis expires them.

use async_trait::async_trait;
use redis::aio::MultiplexedConnection;
use redis::AsyncCommands;
use std::time::Duration;

use crate::ports::{CacheError, CacheKey, CachedValue, FortuneCache};

/// Redis-backed fortune cache.
#[derive(Clone)]
pub struct RedisFortuneCache {
    conn: MultiplexedConnection,
}

impl RedisFortuneCache {
    pub fn new(conn: MultiplexedConnection) -> Self {
        Self { conn }
    }

    /// Opens a multiplexed connection to `url`.
    pub async fn connect(url: &str) -> Result<Self, CacheError> {
        let client = redis::Client::open(url)
            .map_err(|e: redis::RedisError| CacheError::Unavailable(e.to_string()))?;
        let conn = client
            .get_multiplexed_tokio_connection()
            .await
            .map_err(|e: redis::RedisError| CacheError::Unavailable(e.to_string()))?;
        Ok(Self::new(conn))
    }
}

#[async_trait]
impl FortuneCache for RedisFortuneCache {
    async fn get(&self, key: &CacheKey) -> Result<Option<CachedValue>, CacheError> {
        let mut conn = self.conn.clone();
        let raw: Option<String> = conn
            .get(key.to_redis_key())
            .await
            .map_err(|e: redis::RedisError| CacheError::Unavailable(e.to_string()))?;

        raw.map(|raw| CachedValue::from_json_str(&raw)).transpose()
    }

    async fn set(&self, key: &CacheKey, value: CachedValue, ttl: Duration) -> Result<(), CacheError> {
        let raw = value.to_json_string()?;
        // SET EX rejects a zero expiry.
        let secs = ttl.as_secs().max(1);

        let mut conn = self.conn.clone();
        conn.set_ex::<_, _, ()>(key.to_redis_key(), raw, secs)
            .await
            .map_err(|e: redis::RedisError| CacheError::Unavailable(e.to_string()))?;
        Ok(())
    }
}

impl std::fmt::Debug for RedisFortuneCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisFortuneCache").finish_non_exhaustive()
    }
}
