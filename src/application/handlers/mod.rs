//! Application handlers.
//!
//! Query handlers that wrap the domain engines with the optional cache and
//! snapshot provider, lifting input errors into `DomainError`.

mod analyze_trend;
mod find_event_timing;
mod generate_calendar;
mod get_daily_fortune;
mod support;

pub use analyze_trend::{AnalyzeTrendHandler, AnalyzeTrendQuery, AnalyzeTrendResult};
pub use find_event_timing::{FindEventTimingHandler, FindEventTimingQuery, FindEventTimingResult};
pub use generate_calendar::{
    GenerateCalendarHandler, GenerateCalendarQuery, GenerateCalendarResult,
};
pub use get_daily_fortune::{GetDailyFortuneHandler, GetDailyFortuneQuery, GetDailyFortuneResult};
pub use support::{CacheSlot, SnapshotSource, DEFAULT_CACHE_TTL};
