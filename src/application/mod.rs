//! Application layer - Queries and Handlers.
//!
//! This layer orchestrates domain operations and coordinates between ports.
//! It is the only layer that logs.

pub mod handlers;

pub use handlers::{
    AnalyzeTrendHandler, AnalyzeTrendQuery, CacheSlot, FindEventTimingHandler,
    FindEventTimingQuery, GenerateCalendarHandler, GenerateCalendarQuery, GetDailyFortuneHandler,
    GetDailyFortuneQuery, SnapshotSource,
};
