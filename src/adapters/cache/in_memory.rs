//! In-memory fortune cache for testing and single-process use.
//!
//! Entries expire after their TTL. When the cache is full, expired entries
//! are dropped first, then the entry closest to expiry.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

use crate::ports::{CacheError, CacheKey, CachedValue, FortuneCache};

/// A stored value with its expiry.
#[derive(Debug, Clone)]
struct Entry {
    value: CachedValue,
    expires_at: Instant,
}

/// In-memory fortune cache bounded by entry count.
#[derive(Debug, Clone)]
pub struct InMemoryFortuneCache {
    capacity: usize,
    entries: Arc<RwLock<HashMap<String, Entry>>>,
}

impl InMemoryFortuneCache {
    /// Create a cache holding at most `capacity` entries.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            entries: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Number of stored entries, expired ones included.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    fn evict(entries: &mut HashMap<String, Entry>, capacity: usize, now: Instant) {
        entries.retain(|_, entry| entry.expires_at > now);
        while entries.len() >= capacity {
            let oldest = entries
                .iter()
                .min_by_key(|(_, entry)| entry.expires_at)
                .map(|(key, _)| key.clone());
            match oldest {
                Some(key) => {
                    entries.remove(&key);
                }
                None => break,
            }
        }
    }
}

#[async_trait]
impl FortuneCache for InMemoryFortuneCache {
    async fn get(&self, key: &CacheKey) -> Result<Option<CachedValue>, CacheError> {
        let redis_key = key.to_redis_key();
        let entries = self.entries.read().await;
        Ok(entries
            .get(&redis_key)
            .filter(|entry| entry.expires_at > Instant::now())
            .map(|entry| entry.value.clone()))
    }

    async fn set(&self, key: &CacheKey, value: CachedValue, ttl: Duration) -> Result<(), CacheError> {
        let redis_key = key.to_redis_key();
        let now = Instant::now();
        let mut entries = self.entries.write().await;

        if !entries.contains_key(&redis_key) && entries.len() >= self.capacity {
            Self::evict(&mut entries, self.capacity, now);
        }
        entries.insert(
            redis_key,
            Entry {
                value,
                expires_at: now + ttl,
            },
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn key(day: u32) -> CacheKey {
        CacheKey::daily("fp", NaiveDate::from_ymd_opt(2025, 1, day).unwrap())
    }

    fn value(n: i32) -> CachedValue {
        CachedValue::from_record(&n).unwrap()
    }

    const HOUR: Duration = Duration::from_secs(3600);

    #[tokio::test]
    async fn returns_stored_value() {
        let cache = InMemoryFortuneCache::new(10);
        cache.set(&key(1), value(7), HOUR).await.unwrap();

        let hit = cache.get(&key(1)).await.unwrap().unwrap();
        assert_eq!(hit.into_record::<i32>().unwrap(), 7);
    }

    #[tokio::test]
    async fn missing_key_is_a_miss() {
        let cache = InMemoryFortuneCache::new(10);
        assert!(cache.get(&key(1)).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn expired_entry_is_a_miss() {
        let cache = InMemoryFortuneCache::new(10);
        cache.set(&key(1), value(7), Duration::ZERO).await.unwrap();
        assert!(cache.get(&key(1)).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn overwrite_replaces_value() {
        let cache = InMemoryFortuneCache::new(10);
        cache.set(&key(1), value(1), HOUR).await.unwrap();
        cache.set(&key(1), value(2), HOUR).await.unwrap();

        assert_eq!(cache.len().await, 1);
        let hit = cache.get(&key(1)).await.unwrap().unwrap();
        assert_eq!(hit.into_record::<i32>().unwrap(), 2);
    }

    #[tokio::test]
    async fn full_cache_evicts_soonest_expiry() {
        let cache = InMemoryFortuneCache::new(2);
        cache.set(&key(1), value(1), Duration::from_secs(10)).await.unwrap();
        cache.set(&key(2), value(2), HOUR).await.unwrap();
        cache.set(&key(3), value(3), HOUR).await.unwrap();

        assert_eq!(cache.len().await, 2);
        assert!(cache.get(&key(1)).await.unwrap().is_none());
        assert!(cache.get(&key(2)).await.unwrap().is_some());
        assert!(cache.get(&key(3)).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn full_cache_drops_expired_first() {
        let cache = InMemoryFortuneCache::new(2);
        cache.set(&key(1), value(1), HOUR).await.unwrap();
        cache.set(&key(2), value(2), Duration::ZERO).await.unwrap();
        cache.set(&key(3), value(3), HOUR).await.unwrap();

        assert!(cache.get(&key(1)).await.unwrap().is_some());
        assert!(cache.get(&key(3)).await.unwrap().is_some());
    }
}
