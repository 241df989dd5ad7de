//! Graded day record.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::BestTime;
use crate::domain::foundation::{Grade, Pillar, Score};

/// A day's grade, score and the content that explains it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GradeResult {
    pub date: NaiveDate,
    pub day_pillar: Pillar,
    pub grade: Grade,
    pub score: Score,
    pub title: String,
    pub saju_factors: Vec<String>,
    pub astro_factors: Vec<String>,
    pub recommendations: Vec<String>,
    pub warnings: Vec<String>,
    pub best_times: Vec<BestTime>,
}
