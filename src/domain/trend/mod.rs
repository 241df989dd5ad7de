//! Trend module - Multi-year scores keyed to Daeun transitions.

mod analyzer;
mod result;

pub use analyzer::{TrendAnalyzer, TrendSettings};
pub use result::{DaeunTransition, TransitionImpact, TrendDirection, TrendResult, YearlyScore};
