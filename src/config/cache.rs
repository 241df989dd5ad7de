//! Fortune cache configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Fortune cache configuration
///
/// Without a Redis URL the in-memory cache is used.
#[derive(Debug, Clone, Deserialize)]
pub struct CacheConfig {
    /// Lifetime of cached records in seconds
    #[serde(default = "default_ttl")]
    pub ttl_secs: u64,

    /// Maximum entries of the in-memory cache
    #[serde(default = "default_capacity")]
    pub capacity: usize,

    /// Redis connection URL
    pub redis_url: Option<String>,
}

impl CacheConfig {
    /// Get TTL as Duration
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }

    /// Validate cache configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.ttl_secs == 0 {
            return Err(ValidationError::ZeroLimit("cache.ttl_secs"));
        }
        if self.capacity == 0 {
            return Err(ValidationError::ZeroLimit("cache.capacity"));
        }
        if let Some(url) = &self.redis_url {
            if !url.starts_with("redis://") && !url.starts_with("rediss://") {
                return Err(ValidationError::InvalidRedisUrl);
            }
        }
        Ok(())
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_secs: default_ttl(),
            capacity: default_capacity(),
            redis_url: None,
        }
    }
}

fn default_ttl() -> u64 {
    86_400
}

fn default_capacity() -> usize {
    10_000
}
