//! Grading module - Daily scores, calibrated grades and consistent content.
//!
//! # Components
//!
//! - `NatalContext` - Per-profile analyses computed once
//! - `DailyGradingEngine` - Contributions, scores, calibration and grading
//! - `GradeThresholds` - Per-year cut points at 5/20/70/95%
//! - `ConsistencyPass` - Content that agrees with the grade
//! - `BestTimeFinder` - Favorable double-hours

mod best_times;
mod calibration;
mod consistency;
mod context;
mod contribution;
mod engine;
mod result;
mod weights;

pub use best_times::{BestTime, BestTimeFinder, TimeQuality, MAX_BEST_TIMES};
pub use calibration::{GradeThresholds, CUT_POINTS};
pub use consistency::{ConsistencyPass, ConsistentContent, FALLBACK_WARNING};
pub use context::NatalContext;
pub use contribution::{Contribution, ContributionSource};
pub use engine::{position_weight, relation_delta, DailyGradingEngine, DayAssessment};
pub use result::GradeResult;
pub use weights::GradingWeights;
