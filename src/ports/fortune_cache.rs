//! Fortune cache port for reusing computed results.
//!
//! A record depends on the profile fingerprint, the date or range, the event
//! type, the engine settings and whether astrology was applied. The last two
//! travel in the key's `variant`, so records never need invalidation beyond a
//! TTL. Implementations can use in-memory storage for testing or Redis for
//! production. Handlers treat every cache failure as a miss.

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

use crate::domain::timing::EventType;

/// Port for caching computed fortune records.
///
/// Implementations should be thread-safe and support concurrent access.
#[async_trait]
pub trait FortuneCache: Send + Sync {
    /// Looks up a value. Expired entries are misses.
    async fn get(&self, key: &CacheKey) -> Result<Option<CachedValue>, CacheError>;

    /// Stores a value for `ttl`.
    async fn set(&self, key: &CacheKey, value: CachedValue, ttl: Duration) -> Result<(), CacheError>;
}

/// Kind of record a key addresses.
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CacheKind {
    Daily,
    Timing,
    Calendar,
    Trend,
}

impl CacheKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CacheKind::Daily => "daily",
            CacheKind::Timing => "timing",
            CacheKind::Calendar => "calendar",
            CacheKind::Trend => "trend",
        }
    }
}

impl fmt::Display for CacheKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Key identifying a cached record.
#[derive(Debug, Clone, Hash, Eq, PartialEq)]
pub struct CacheKey {
    pub kind: CacheKind,
    /// Profile fingerprint (SHA-256 hex).
    pub fingerprint: String,
    /// Date, date range or year range the record covers.
    pub scope: String,
    pub event: Option<EventType>,
    /// Settings and astro mode the record was computed under.
    pub variant: String,
}

impl CacheKey {
    /// Key of a single graded day.
    pub fn daily(fingerprint: &str, date: NaiveDate) -> Self {
        Self {
            kind: CacheKind::Daily,
            fingerprint: fingerprint.to_string(),
            scope: date.to_string(),
            event: None,
            variant: String::new(),
        }
    }

    /// Key of an event timing search.
    pub fn timing(fingerprint: &str, event: EventType, start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            kind: CacheKind::Timing,
            fingerprint: fingerprint.to_string(),
            scope: format!("{}..{}", start, end),
            event: Some(event),
            variant: String::new(),
        }
    }

    /// Key of a calendar year.
    pub fn calendar(fingerprint: &str, year: i32) -> Self {
        Self {
            kind: CacheKind::Calendar,
            fingerprint: fingerprint.to_string(),
            scope: year.to_string(),
            event: None,
            variant: String::new(),
        }
    }

    /// Key of a multi-year trend.
    pub fn trend(fingerprint: &str, start_year: i32, end_year: i32) -> Self {
        Self {
            kind: CacheKind::Trend,
            fingerprint: fingerprint.to_string(),
            scope: format!("{}..{}", start_year, end_year),
            event: None,
            variant: String::new(),
        }
    }

    pub fn with_variant(mut self, variant: impl Into<String>) -> Self {
        self.variant = variant.into();
        self
    }

    /// Returns the Redis key string for this cache key.
    pub fn to_redis_key(&self) -> String {
        let mut key = format!("fortune:{}:{}", self.kind.as_str(), self.fingerprint);
        if !self.variant.is_empty() {
            key.push(':');
            key.push_str(&self.variant);
        }
        key.push(':');
        key.push_str(&self.scope);
        if let Some(event) = &self.event {
            key.push(':');
            key.push_str(event.as_key());
        }
        key
    }
}

/// A cached record as JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CachedValue(serde_json::Value);

impl CachedValue {
    pub fn from_record<T: Serialize>(record: &T) -> Result<Self, CacheError> {
        serde_json::to_value(record)
            .map(Self)
            .map_err(|e| CacheError::Serialization(e.to_string()))
    }

    pub fn into_record<T: DeserializeOwned>(self) -> Result<T, CacheError> {
        serde_json::from_value(self.0).map_err(|e| CacheError::Serialization(e.to_string()))
    }

    pub fn to_json_string(&self) -> Result<String, CacheError> {
        serde_json::to_string(&self.0).map_err(|e| CacheError::Serialization(e.to_string()))
    }

    pub fn from_json_str(raw: &str) -> Result<Self, CacheError> {
        serde_json::from_str(raw)
            .map(Self)
            .map_err(|e| CacheError::Serialization(e.to_string()))
    }
}

/// Errors that can occur during cache operations.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    /// Cache backend is unavailable.
    #[error("cache unavailable: {0}")]
    Unavailable(String),

    /// Value could not be encoded or decoded.
    #[error("cache serialization failed: {0}")]
    Serialization(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn daily_key_format() {
        let key = CacheKey::daily("abc123", date(2025, 3, 1));
        assert_eq!(key.to_redis_key(), "fortune:daily:abc123:2025-03-01");
    }

    #[test]
    fn timing_key_includes_event() {
        let key = CacheKey::timing("abc123", EventType::Marriage, date(2025, 1, 1), date(2025, 6, 30));
        assert_eq!(
            key.to_redis_key(),
            "fortune:timing:abc123:2025-01-01..2025-06-30:marriage"
        );
    }

    #[test]
    fn variant_follows_fingerprint() {
        let key = CacheKey::daily("abc123", date(2025, 3, 1)).with_variant("astro-0f1e");
        assert_eq!(key.to_redis_key(), "fortune:daily:abc123:astro-0f1e:2025-03-01");
        assert_ne!(key, CacheKey::daily("abc123", date(2025, 3, 1)).with_variant("saju-0f1e"));
    }

    #[test]
    fn keys_of_different_kinds_differ() {
        assert_ne!(
            CacheKey::calendar("abc", 2025).to_redis_key(),
            CacheKey::trend("abc", 2025, 2025).to_redis_key()
        );
    }

    #[test]
    fn cached_value_restores_record() {
        let original = vec![date(2025, 1, 1), date(2025, 1, 2)];
        let value = CachedValue::from_record(&original).unwrap();
        let raw = value.to_json_string().unwrap();
        let restored: Vec<NaiveDate> = CachedValue::from_json_str(&raw).unwrap().into_record().unwrap();
        assert_eq!(restored, original);
    }

    #[test]
    fn mismatched_record_is_serialization_error() {
        let value = CachedValue::from_record(&"not a date").unwrap();
        let result: Result<NaiveDate, _> = value.into_record();
        assert!(matches!(result, Err(CacheError::Serialization(_))));
    }
}
