//! Calendar Batch Generator - Grades every day of a year.
//!
//! Days are assessed in parallel, calibrated once from their Saju-only
//! scores, then graded with astro terms where snapshots exist. The result is
//! ordered by date.

use std::collections::HashMap;

use chrono::NaiveDate;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::domain::astrology::AstroSnapshot;
use crate::domain::foundation::{DateRange, Grade, Score, ValidationError, ALL_GRADES};
use crate::domain::grading::{DailyGradingEngine, GradeResult, GradeThresholds, NatalContext};

/// How a year's days spread over the grades.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GradeDistribution {
    /// Day count per grade, best first.
    pub counts: [usize; 5],
    pub shares: [f64; 5],
    pub total: usize,
    pub mean_score: Score,
}

impl GradeDistribution {
    pub fn from_days(days: &[GradeResult]) -> Self {
        let mut counts = [0usize; 5];
        for day in days {
            counts[day.grade.value() as usize] += 1;
        }
        let total = days.len();
        let shares = counts.map(|count| {
            if total == 0 {
                0.0
            } else {
                count as f64 / total as f64
            }
        });
        let mean_score = if total == 0 {
            Score::new(0.0)
        } else {
            Score::new(days.iter().map(|d| d.score.value()).sum::<f64>() / total as f64)
        };
        Self {
            counts,
            shares,
            total,
            mean_score,
        }
    }

    pub fn count(&self, grade: Grade) -> usize {
        self.counts[grade.value() as usize]
    }

    pub fn share(&self, grade: Grade) -> f64 {
        self.shares[grade.value() as usize]
    }

    /// Grades paired with their counts, best first.
    pub fn iter(&self) -> impl Iterator<Item = (Grade, usize)> + '_ {
        ALL_GRADES.iter().map(move |grade| (*grade, self.count(*grade)))
    }
}

/// A graded calendar year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarYear {
    pub year: i32,
    pub thresholds: GradeThresholds,
    pub days: Vec<GradeResult>,
    pub distribution: GradeDistribution,
}

/// Builds whole-year calendars from one grading engine.
#[derive(Debug, Clone, Copy, Default)]
pub struct CalendarBatchGenerator {
    engine: DailyGradingEngine,
}

impl CalendarBatchGenerator {
    pub fn new(engine: DailyGradingEngine) -> Self {
        Self { engine }
    }

    pub fn engine(&self) -> &DailyGradingEngine {
        &self.engine
    }

    pub fn generate(
        &self,
        ctx: &NatalContext,
        year: i32,
        snapshots: &HashMap<NaiveDate, AstroSnapshot>,
    ) -> Result<CalendarYear, ValidationError> {
        let range = DateRange::year(year)?;
        let assessments = self.engine.assess_range(ctx, &range)?;
        let thresholds = DailyGradingEngine::calibrate_from(&assessments);

        let days: Vec<GradeResult> = assessments
            .par_iter()
            .map(|assessment| {
                let snapshot = snapshots.get(&assessment.date());
                self.engine.finish(ctx, assessment, &thresholds, snapshot)
            })
            .collect();

        Ok(CalendarYear {
            year,
            thresholds,
            distribution: GradeDistribution::from_days(&days),
            days,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::pillars::{BirthMoment, FourPillarsCalculator};
    use crate::domain::profile::{BirthData, Gender, NatalProfile};
    use chrono::NaiveTime;

    fn context() -> NatalContext {
        let birth = BirthData {
            moment: BirthMoment::new(
                NaiveDate::from_ymd_opt(1993, 8, 9).unwrap(),
                NaiveTime::from_hms_opt(21, 15, 0),
            ),
            gender: Some(Gender::Female),
        };
        NatalContext::new(NatalProfile::from_birth(&birth, &FourPillarsCalculator::default()).unwrap())
    }

    #[test]
    fn calendar_covers_the_year_in_order() {
        let calendar = CalendarBatchGenerator::default()
            .generate(&context(), 2024, &HashMap::new())
            .unwrap();

        assert_eq!(calendar.days.len(), 366);
        assert_eq!(calendar.distribution.total, 366);
        assert_eq!(calendar.distribution.counts.iter().sum::<usize>(), 366);
        assert!(calendar.days.windows(2).all(|w| w[0].date < w[1].date));
        assert_eq!(calendar.days[0].date, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
    }

    #[test]
    fn calendar_days_match_single_day_grading() {
        let ctx = context();
        let generator = CalendarBatchGenerator::default();
        let calendar = generator.generate(&ctx, 2025, &HashMap::new()).unwrap();

        let engine = generator.engine();
        let thresholds = engine.calibrate(&ctx, 2025).unwrap();
        assert_eq!(thresholds, calendar.thresholds);

        for day in calendar.days.iter().step_by(37) {
            let single = engine.grade(&ctx, day.date, &thresholds, None).unwrap();
            assert_eq!(&single, day);
        }
    }

    #[test]
    fn distribution_shares_sum_to_one() {
        let calendar = CalendarBatchGenerator::default()
            .generate(&context(), 2026, &HashMap::new())
            .unwrap();
        let sum: f64 = calendar.distribution.shares.iter().sum();
        assert!((sum - 1.0).abs() < 1e-9);
        assert_eq!(
            calendar.distribution.iter().map(|(_, n)| n).sum::<usize>(),
            calendar.distribution.total
        );
    }

    #[test]
    fn empty_distribution_is_all_zero() {
        let distribution = GradeDistribution::from_days(&[]);
        assert_eq!(distribution.total, 0);
        assert_eq!(distribution.shares, [0.0; 5]);
        assert_eq!(distribution.mean_score, Score::new(0.0));
    }

    #[test]
    fn unsupported_year_is_rejected() {
        assert!(CalendarBatchGenerator::default()
            .generate(&context(), 2200, &HashMap::new())
            .is_err());
    }
}
