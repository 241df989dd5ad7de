//! Multi-year trend records.

use serde::{Deserialize, Serialize};

use crate::domain::analysis::{TenGod, TwelveStage};
use crate::domain::foundation::{Grade, Pillar, Score, YearRange};

/// Shape of the yearly scores across a range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendDirection {
    Rising,
    Falling,
    Stable,
    Volatile,
}

impl TrendDirection {
    pub fn as_key(&self) -> &'static str {
        match self {
            Self::Rising => "rising",
            Self::Falling => "falling",
            Self::Stable => "stable",
            Self::Volatile => "volatile",
        }
    }
}

/// How a new Daeun cycle sits with the natal chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransitionImpact {
    Positive,
    Neutral,
    Negative,
}

/// Score of one calendar year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YearlyScore {
    pub year: i32,
    pub age: i32,
    pub grade: Grade,
    pub score: Score,
    pub year_pillar: Pillar,
    pub daeun_pillar: Option<Pillar>,
    /// Ten-god of the year stem against the Day Master.
    pub sibsin: TenGod,
    /// Day Master's stage at the year branch.
    pub stage: TwelveStage,
    pub opportunities: Vec<String>,
    pub challenges: Vec<String>,
}

/// Start of a Daeun cycle inside the range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DaeunTransition {
    pub year: i32,
    pub age: i32,
    pub pillar: Pillar,
    /// Tag such as `daeun.jeongin.jewang`.
    pub description: String,
    pub impact: TransitionImpact,
}

/// Yearly scores, transitions and the overall direction of a range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendResult {
    pub range: YearRange,
    pub overall_trend: TrendDirection,
    /// Least-squares slope of score per year.
    pub slope: f64,
    /// Standard deviation of year-over-year steps.
    pub volatility: f64,
    pub yearly_scores: Vec<YearlyScore>,
    pub daeun_transitions: Vec<DaeunTransition>,
    pub peak_years: Vec<i32>,
}
