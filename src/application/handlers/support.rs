//! Cache and snapshot access shared by the handlers.
//!
//! Both collaborators are optional. Failures are logged and absorbed: a
//! cache error is a miss, a provider error means no astrology and the result
//! is not cached.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use serde::Serialize;
use sha2::{Digest, Sha256};
use tracing::{debug, warn};

use crate::domain::astrology::AstroSnapshot;
use crate::domain::foundation::DateRange;
use crate::ports::{AstroSnapshotProvider, CacheKey, CachedValue, FortuneCache};

/// Default lifetime of cached records.
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(86_400);

/// Cache key variant for engine settings and astro mode.
///
/// Records computed under different settings, or with and without a snapshot
/// provider, never share a key.
pub fn settings_variant<S: Serialize>(settings: &S, astro: bool) -> String {
    let encoded = serde_json::to_vec(settings).unwrap_or_default();
    let digest = Sha256::digest(&encoded);
    let short: String = digest.iter().take(8).map(|b| format!("{:02x}", b)).collect();
    format!("{}-{}", if astro { "astro" } else { "saju" }, short)
}

/// Optional cache with its TTL.
#[derive(Clone)]
pub struct CacheSlot {
    cache: Option<Arc<dyn FortuneCache>>,
    ttl: Duration,
}

impl CacheSlot {
    pub fn none() -> Self {
        Self {
            cache: None,
            ttl: DEFAULT_CACHE_TTL,
        }
    }

    pub fn new(cache: Arc<dyn FortuneCache>, ttl: Duration) -> Self {
        Self {
            cache: Some(cache),
            ttl,
        }
    }

    /// Cached record, or `None` on a miss or any failure.
    pub async fn load<T: DeserializeOwned>(&self, key: &CacheKey) -> Option<T> {
        let cache = self.cache.as_ref()?;
        let redis_key = key.to_redis_key();
        match cache.get(key).await {
            Ok(Some(value)) => match value.into_record() {
                Ok(record) => {
                    debug!(key = %redis_key, "Cache hit");
                    Some(record)
                }
                Err(e) => {
                    warn!(key = %redis_key, error = %e, "Discarding undecodable cache entry");
                    None
                }
            },
            Ok(None) => {
                debug!(key = %redis_key, "Cache miss");
                None
            }
            Err(e) => {
                warn!(key = %redis_key, error = %e, "Cache read failed, computing");
                None
            }
        }
    }

    /// Stores a record, logging failures.
    pub async fn store<T: Serialize>(&self, key: &CacheKey, record: &T) {
        let Some(cache) = self.cache.as_ref() else {
            return;
        };
        let redis_key = key.to_redis_key();
        let value = match CachedValue::from_record(record) {
            Ok(value) => value,
            Err(e) => {
                warn!(key = %redis_key, error = %e, "Record not cacheable");
                return;
            }
        };
        if let Err(e) = cache.set(key, value, self.ttl).await {
            warn!(key = %redis_key, error = %e, "Cache write failed");
        }
    }
}

impl Default for CacheSlot {
    fn default() -> Self {
        Self::none()
    }
}

/// Snapshot lookup outcome.
#[derive(Debug, Clone)]
pub struct Fetched<T> {
    pub value: T,
    /// The provider failed and `value` is the Saju-only fallback.
    pub degraded: bool,
}

impl<T> Fetched<T> {
    fn ok(value: T) -> Self {
        Self {
            value,
            degraded: false,
        }
    }

    fn fallback(value: T) -> Self {
        Self {
            value,
            degraded: true,
        }
    }
}

/// Optional snapshot provider.
#[derive(Clone, Default)]
pub struct SnapshotSource {
    provider: Option<Arc<dyn AstroSnapshotProvider>>,
}

impl SnapshotSource {
    pub fn none() -> Self {
        Self { provider: None }
    }

    pub fn new(provider: Arc<dyn AstroSnapshotProvider>) -> Self {
        Self {
            provider: Some(provider),
        }
    }

    /// Whether a provider is configured.
    pub fn is_enabled(&self) -> bool {
        self.provider.is_some()
    }

    /// Snapshot of one date, `None` when unavailable.
    pub async fn one(&self, date: NaiveDate) -> Fetched<Option<AstroSnapshot>> {
        let Some(provider) = self.provider.as_ref() else {
            return Fetched::ok(None);
        };
        match provider.snapshot(date).await {
            Ok(snapshot) => {
                if snapshot.is_none() {
                    debug!(%date, "No astro snapshot, grading Saju only");
                }
                Fetched::ok(snapshot)
            }
            Err(e) => {
                warn!(%date, error = %e, "Snapshot provider failed, grading Saju only");
                Fetched::fallback(None)
            }
        }
    }

    /// Snapshots of a range, empty when unavailable.
    pub async fn range(&self, range: &DateRange) -> Fetched<HashMap<NaiveDate, AstroSnapshot>> {
        let Some(provider) = self.provider.as_ref() else {
            return Fetched::ok(HashMap::new());
        };
        match provider.snapshots(range).await {
            Ok(snapshots) => Fetched::ok(snapshots),
            Err(e) => {
                warn!(
                    start = %range.start,
                    end = %range.end,
                    error = %e,
                    "Snapshot provider failed, scoring Saju only"
                );
                Fetched::fallback(HashMap::new())
            }
        }
    }
}
