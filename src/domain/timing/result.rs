//! Event timing records.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::EventType;
use crate::domain::foundation::{DateRange, Pillar, Score};

/// Quality of an optimal window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PeriodGrade {
    Excellent,
    Good,
}

/// Event score of one day with the keys that moved it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventDayScore {
    pub date: NaiveDate,
    pub day_pillar: Pillar,
    pub score: Score,
    /// Positive reasons, strongest first.
    pub reasons: Vec<String>,
    /// Negative reasons, strongest first.
    pub cautions: Vec<String>,
    #[serde(skip)]
    pub(crate) weighted_reasons: Vec<(String, f64)>,
    #[serde(skip)]
    pub(crate) weighted_cautions: Vec<(String, f64)>,
}

/// A best-scoring day inside a window.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpecificDay {
    pub date: NaiveDate,
    pub score: Score,
}

/// A contiguous window of optimal days.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptimalPeriod {
    pub window: DateRange,
    pub grade: PeriodGrade,
    /// Mean event score of the window.
    pub score: Score,
    pub reasons: Vec<String>,
    pub specific_days: Vec<SpecificDay>,
}

/// A contiguous window of days to avoid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvoidPeriod {
    pub window: DateRange,
    pub reasons: Vec<String>,
}

/// Windows found for an event inside a search range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventTimingResult {
    pub event_type: EventType,
    pub search_range: DateRange,
    pub optimal_periods: Vec<OptimalPeriod>,
    pub avoid_periods: Vec<AvoidPeriod>,
    /// Advice tag, e.g. `advice.marriage.jeongjae`.
    pub advice: String,
    pub optimal_threshold: Score,
    pub avoid_threshold: Score,
}
