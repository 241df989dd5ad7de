//! Timing module - Optimal and avoid windows for life events.

mod event_type;
mod optimizer;
mod result;

pub use event_type::{EventFavorability, EventType, ALL_EVENT_TYPES};
pub use optimizer::{EventTimingOptimizer, TimingSettings};
pub use result::{
    AvoidPeriod, EventDayScore, EventTimingResult, OptimalPeriod, PeriodGrade, SpecificDay,
};
