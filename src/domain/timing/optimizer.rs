//! Event Timing Optimizer - Finds windows to act on and windows to avoid.
//!
//! # Algorithm
//!
//! 1. Score every day of the range (in parallel): the Saju daily base plus
//!    the event's ten-god, stage, element-role and star modifiers, plus the
//!    event astro table when a snapshot exists.
//! 2. Optimal threshold = max(floor, 80th percentile); avoid threshold =
//!    min(ceiling, 20th percentile). A day is never both.
//! 3. Contiguous runs of qualifying days become periods; optimal periods are
//!    ranked by mean score.

use std::collections::HashMap;

use chrono::{Duration, NaiveDate};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use super::{
    AvoidPeriod, EventDayScore, EventTimingResult, EventType, OptimalPeriod, PeriodGrade,
    SpecificDay,
};
use crate::domain::analysis::{TenGodsAnalyzer, VoidStarAnalyzer};
use crate::domain::astrology::{AstroSnapshot, AstroTransitAnalyzer};
use crate::domain::foundation::{DateRange, Score, ValidationError};
use crate::domain::grading::{DailyGradingEngine, DayAssessment, NatalContext};

const TEN_GOD_MODIFIER: f64 = 8.0;
const STAGE_MODIFIER: f64 = 5.0;
const ROLE_MODIFIER: f64 = 4.0;
const STAR_MODIFIER: f64 = 3.0;
const EXCELLENT_PERIOD: f64 = 75.0;
const TOP_REASONS: usize = 3;

/// Thresholds and limits of the optimizer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingSettings {
    /// Lowest score an optimal day may have.
    pub optimal_floor: f64,
    /// Highest score an avoid day may have.
    pub avoid_ceiling: f64,
    pub max_periods: usize,
    /// Best days listed per optimal period.
    pub specific_days: usize,
    pub max_range_days: usize,
}

impl Default for TimingSettings {
    fn default() -> Self {
        Self {
            optimal_floor: 60.0,
            avoid_ceiling: 40.0,
            max_periods: 5,
            specific_days: 3,
            max_range_days: 366,
        }
    }
}

/// Nearest-rank percentile of ascending values.
fn percentile(sorted: &[f64], p: f64) -> f64 {
    if sorted.is_empty() {
        return 0.0;
    }
    let rank = (p * sorted.len() as f64).ceil() as usize;
    sorted[rank.clamp(1, sorted.len()) - 1]
}

/// Summed weight per key, strongest first, ties by key.
fn top_keys<'a, I>(weighted: I, limit: usize) -> Vec<String>
where
    I: IntoIterator<Item = &'a (String, f64)>,
{
    let mut totals: Vec<(String, f64)> = Vec::new();
    for (key, weight) in weighted {
        match totals.iter_mut().find(|(k, _)| k == key) {
            Some((_, total)) => *total += weight.abs(),
            None => totals.push((key.clone(), weight.abs())),
        }
    }
    totals.sort_by(|a, b| {
        b.1.partial_cmp(&a.1)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.0.cmp(&b.0))
    });
    totals.into_iter().take(limit).map(|(k, _)| k).collect()
}

/// Splits qualifying days into runs of consecutive dates.
fn contiguous_runs<'a>(days: &[&'a EventDayScore]) -> Vec<Vec<&'a EventDayScore>> {
    let mut runs: Vec<Vec<&'a EventDayScore>> = Vec::new();
    for day in days.iter().copied() {
        let extends = runs
            .last()
            .and_then(|run| run.last())
            .map_or(false, |last| last.date + Duration::days(1) == day.date);
        match runs.last_mut() {
            Some(run) if extends => run.push(day),
            _ => runs.push(vec![day]),
        }
    }
    runs
}

fn window_of(run: &[&EventDayScore]) -> Result<DateRange, ValidationError> {
    match (run.first(), run.last()) {
        (Some(first), Some(last)) => DateRange::new(first.date, last.date),
        _ => Err(ValidationError::missing_field("window")),
    }
}

/// Event window search over a grading engine.
#[derive(Debug, Clone, Copy, Default)]
pub struct EventTimingOptimizer {
    engine: DailyGradingEngine,
    settings: TimingSettings,
}

impl EventTimingOptimizer {
    pub fn new(engine: DailyGradingEngine, settings: TimingSettings) -> Self {
        Self { engine, settings }
    }

    pub fn engine(&self) -> &DailyGradingEngine {
        &self.engine
    }

    pub fn settings(&self) -> &TimingSettings {
        &self.settings
    }

    /// Event score of an assessed day.
    pub fn score_day(
        &self,
        ctx: &NatalContext,
        event: EventType,
        assessment: &DayAssessment,
        snapshot: Option<&AstroSnapshot>,
    ) -> EventDayScore {
        let table = event.favorability();
        let dm = ctx.day_master();
        let gender = ctx.profile().gender();
        let day = assessment.pillars.day;

        let mut weighted: Vec<(String, f64)> = Vec::new();

        let god = TenGodsAnalyzer::ten_god(dm, day.stem());
        if event.favors_god(god, gender) {
            weighted.push((format!("timing.sibsin.{}", god.as_key()), TEN_GOD_MODIFIER));
        } else if table.unfavorable_gods.contains(&god) {
            weighted.push((format!("timing.sibsin.{}", god.as_key()), -TEN_GOD_MODIFIER));
        }

        let stage = TenGodsAnalyzer::twelve_stage(dm, day.branch());
        if table.favorable_stages.contains(&stage) {
            weighted.push((format!("timing.stage.{}", stage.as_key()), STAGE_MODIFIER));
        } else if table.unfavorable_stages.contains(&stage) {
            weighted.push((format!("timing.stage.{}", stage.as_key()), -STAGE_MODIFIER));
        }

        let role = dm.element().role_of(day.stem().element());
        if table.favorable_roles.contains(&role) {
            weighted.push((format!("timing.role.{}", role.as_key()), ROLE_MODIFIER));
        } else if table.unfavorable_roles.contains(&role) {
            weighted.push((format!("timing.role.{}", role.as_key()), -ROLE_MODIFIER));
        }

        for star in VoidStarAnalyzer::active_stars(ctx.chart(), day) {
            if table.lucky_stars.contains(&star.kind) {
                weighted.push((format!("timing.{}", star.factor_key()), STAR_MODIFIER));
            } else if table.unlucky_stars.contains(&star.kind) {
                weighted.push((format!("timing.{}", star.factor_key()), -STAR_MODIFIER));
            }
        }

        let mut astro_delta = 0.0;
        if let Some(snapshot) = snapshot {
            let astro = AstroTransitAnalyzer::score_event(&table.astro, snapshot);
            astro_delta = astro.score;
            // Astro keys carry no individual weight; rank them below Saju keys.
            weighted.extend(astro.positive_factors.into_iter().map(|k| (k, 1.0)));
            weighted.extend(astro.negative_factors.into_iter().map(|k| (k, -1.0)));
        }

        let modifiers: f64 = weighted
            .iter()
            .filter(|(k, _)| k.starts_with("timing."))
            .map(|(_, w)| *w)
            .sum();
        let score = Score::new(assessment.saju_score.value() + modifiers + astro_delta);

        let (mut positives, mut negatives): (Vec<_>, Vec<_>) =
            weighted.into_iter().partition(|(_, w)| *w > 0.0);
        positives.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        negatives.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal));

        EventDayScore {
            date: assessment.pillars.date,
            day_pillar: day,
            score,
            reasons: positives.iter().map(|(k, _)| k.clone()).collect(),
            cautions: negatives.iter().map(|(k, _)| k.clone()).collect(),
            weighted_reasons: positives,
            weighted_cautions: negatives,
        }
    }

    /// Event scores for every day of a range, in date order.
    pub fn score_range(
        &self,
        ctx: &NatalContext,
        event: EventType,
        range: &DateRange,
        snapshots: &HashMap<NaiveDate, AstroSnapshot>,
    ) -> Result<Vec<EventDayScore>, ValidationError> {
        range
            .days()
            .into_par_iter()
            .map(|date| {
                let assessment = self.engine.assess(ctx, date)?;
                Ok(self.score_day(ctx, event, &assessment, snapshots.get(&date)))
            })
            .collect()
    }

    /// Searches a range for optimal and avoid windows.
    pub fn optimize(
        &self,
        ctx: &NatalContext,
        event: EventType,
        range: &DateRange,
        snapshots: &HashMap<NaiveDate, AstroSnapshot>,
    ) -> Result<EventTimingResult, ValidationError> {
        let days = self.score_range(ctx, event, range, snapshots)?;
        self.periods_from(event, range, &days)
    }

    /// Builds periods from scored days.
    pub fn periods_from(
        &self,
        event: EventType,
        range: &DateRange,
        days: &[EventDayScore],
    ) -> Result<EventTimingResult, ValidationError> {
        let mut sorted: Vec<f64> = days.iter().map(|d| d.score.value()).collect();
        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

        let optimal_threshold = Score::new(self.settings.optimal_floor.max(percentile(&sorted, 0.8)));
        let avoid_threshold = Score::new(self.settings.avoid_ceiling.min(percentile(&sorted, 0.2)));

        let optimal_days: Vec<&EventDayScore> = days
            .iter()
            .filter(|d| d.score >= optimal_threshold)
            .collect();
        let avoid_days: Vec<&EventDayScore> = days
            .iter()
            .filter(|d| d.score <= avoid_threshold && d.score < optimal_threshold)
            .collect();

        let mut optimal_periods = Vec::new();
        for run in contiguous_runs(&optimal_days) {
            let mean = run.iter().map(|d| d.score.value()).sum::<f64>() / run.len() as f64;
            let mut best: Vec<&&EventDayScore> = run.iter().collect();
            best.sort_by(|a, b| {
                b.score
                    .partial_cmp(&a.score)
                    .unwrap_or(std::cmp::Ordering::Equal)
                    .then(a.date.cmp(&b.date))
            });
            optimal_periods.push(OptimalPeriod {
                window: window_of(&run)?,
                grade: if mean >= EXCELLENT_PERIOD {
                    PeriodGrade::Excellent
                } else {
                    PeriodGrade::Good
                },
                score: Score::new(mean),
                reasons: top_keys(run.iter().flat_map(|d| d.weighted_reasons.iter()), TOP_REASONS),
                specific_days: best
                    .into_iter()
                    .take(self.settings.specific_days)
                    .map(|d| SpecificDay {
                        date: d.date,
                        score: d.score,
                    })
                    .collect(),
            });
        }
        optimal_periods.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.window.start.cmp(&b.window.start))
        });
        optimal_periods.truncate(self.settings.max_periods);

        let mut avoid_periods = Vec::new();
        for run in contiguous_runs(&avoid_days) {
            avoid_periods.push(AvoidPeriod {
                window: window_of(&run)?,
                reasons: top_keys(run.iter().flat_map(|d| d.weighted_cautions.iter()), TOP_REASONS),
            });
        }

        let advice = match optimal_periods.first().and_then(|p| p.reasons.first()) {
            Some(reason) => {
                let theme = reason.rsplit('.').next().unwrap_or(reason.as_str());
                format!("advice.{}.{}", event.as_key(), theme)
            }
            None => format!("advice.{}.no_clear_window", event.as_key()),
        };

        Ok(EventTimingResult {
            event_type: event,
            search_range: *range,
            optimal_periods,
            avoid_periods,
            advice,
            optimal_threshold,
            avoid_threshold,
        })
    }
}
