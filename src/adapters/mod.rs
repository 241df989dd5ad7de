//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `cache` - Fortune caches (in-memory, Redis)
//! - `ephemeris` - Astro snapshot providers

pub mod cache;
pub mod ephemeris;

pub use cache::{InMemoryFortuneCache, RedisFortuneCache};
pub use ephemeris::{InMemorySnapshotProvider, MeanMotionEphemeris};
