//! Fortune cache adapters.
//!
//! ## Available Adapters
//!
//! - `InMemoryFortuneCache` - Capacity and TTL bounded, single process
//! - `RedisFortuneCache` - JSON values with `SET EX`, shared

mod in_memory;
mod redis;

pub use in_memory::InMemoryFortuneCache;
pub use redis::RedisFortuneCache;
