//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! ## Ports
//!
//! - `FortuneCache` - Optional cache for computed records
//! - `AstroSnapshotProvider` - Per-day planetary snapshots

mod astro_snapshot_provider;
mod fortune_cache;

pub use astro_snapshot_provider::{AstroSnapshotProvider, EphemerisError};
pub use fortune_cache::{CacheError, CacheKey, CacheKind, CachedValue, FortuneCache};
