//! Multi-Year Trend Analyzer - Scores calendar years and finds their shape.
//!
//! # Scoring
//!
//! A year is scored from its year pillar against the natal chart, plus the
//! active Daeun pillar at reduced weight. Each pillar contributes branch
//! relations, the elements of its stem and branch, the ten-god of its stem
//! and the Day Master's stage at its branch.
//!
//! # Overall Trend
//!
//! Step volatility above the limit is `Volatile`; otherwise the least-squares
//! slope decides between `Rising`, `Falling` and `Stable`.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use super::{DaeunTransition, TransitionImpact, TrendDirection, TrendResult, YearlyScore};
use crate::domain::analysis::{BranchRelationAnalyzer, TenGodsAnalyzer};
use crate::domain::foundation::{Grade, Pillar, Score, YearRange};
use crate::domain::grading::{position_weight, relation_delta, NatalContext};
use crate::domain::pillars::FourPillarsCalculator;
use crate::domain::profile::DaeunCycle;

const BASE_SCORE: f64 = 50.0;
const STEM_ELEMENT: f64 = 4.0;
const BRANCH_ELEMENT: f64 = 3.0;
const TEN_GOD_SCALE: f64 = 2.0;
const STAGE_MIDPOINT: f64 = 5.5;
const STAGE_SCALE: f64 = 0.8;
const VOLATILITY_LIMIT: f64 = 12.0;
const SLOPE_LIMIT: f64 = 1.0;
const TOP_FACTORS: usize = 3;

/// Lower score bounds of grades 0 to 3.
const YEAR_GRADE_CUTS: [f64; 4] = [70.0, 58.0, 42.0, 30.0];

/// Limits of the trend analyzer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrendSettings {
    pub max_years: usize,
    /// Weight of the Daeun pillar relative to the year pillar.
    pub daeun_weight: f64,
}

impl Default for TrendSettings {
    fn default() -> Self {
        Self {
            max_years: 30,
            daeun_weight: 0.6,
        }
    }
}

fn grade_for(score: Score) -> Grade {
    YEAR_GRADE_CUTS
        .iter()
        .position(|cut| score.value() >= *cut)
        .and_then(|index| Grade::try_from_u8(index as u8).ok())
        .unwrap_or(Grade::Worst)
}

/// Keys of the strongest terms on one side, deduplicated.
fn strongest(terms: &[(String, f64)], positive: bool) -> Vec<String> {
    let mut side: Vec<&(String, f64)> = terms
        .iter()
        .filter(|(_, delta)| if positive { *delta > 0.0 } else { *delta < 0.0 })
        .collect();
    side.sort_by(|a, b| b.1.abs().total_cmp(&a.1.abs()).then_with(|| a.0.cmp(&b.0)));

    let mut keys: Vec<String> = Vec::new();
    for (key, _) in side {
        if !keys.contains(key) {
            keys.push(key.clone());
        }
        if keys.len() == TOP_FACTORS {
            break;
        }
    }
    keys
}

/// Least-squares slope of score against year.
fn slope(scores: &[YearlyScore]) -> f64 {
    let n = scores.len() as f64;
    if scores.len() < 2 {
        return 0.0;
    }
    let mean_x = scores.iter().map(|s| f64::from(s.year)).sum::<f64>() / n;
    let mean_y = scores.iter().map(|s| s.score.value()).sum::<f64>() / n;
    let (num, den) = scores.iter().fold((0.0, 0.0), |(num, den), s| {
        let dx = f64::from(s.year) - mean_x;
        (num + dx * (s.score.value() - mean_y), den + dx * dx)
    });
    if den == 0.0 {
        0.0
    } else {
        num / den
    }
}

/// Population standard deviation of year-over-year steps.
fn step_volatility(scores: &[YearlyScore]) -> f64 {
    let steps: Vec<f64> = scores
        .windows(2)
        .map(|w| w[1].score.value() - w[0].score.value())
        .collect();
    if steps.len() < 2 {
        return 0.0;
    }
    let mean = steps.iter().sum::<f64>() / steps.len() as f64;
    let variance = steps.iter().map(|s| (s - mean).powi(2)).sum::<f64>() / steps.len() as f64;
    variance.sqrt()
}

/// Years at least as good as the one before and better than the one after.
fn peak_years(scores: &[YearlyScore]) -> Vec<i32> {
    if scores.len() < 2 {
        return Vec::new();
    }
    scores
        .iter()
        .enumerate()
        .filter(|(i, current)| {
            let after_prev = *i == 0 || current.score >= scores[i - 1].score;
            let before_next = scores
                .get(i + 1)
                .map_or(true, |next| current.score > next.score);
            after_prev && before_next
        })
        .map(|(_, s)| s.year)
        .collect()
}

fn direction(slope: f64, volatility: f64) -> TrendDirection {
    if volatility > VOLATILITY_LIMIT {
        TrendDirection::Volatile
    } else if slope > SLOPE_LIMIT {
        TrendDirection::Rising
    } else if slope < -SLOPE_LIMIT {
        TrendDirection::Falling
    } else {
        TrendDirection::Stable
    }
}

/// Scores years for one natal context.
#[derive(Debug, Clone, Copy, Default)]
pub struct TrendAnalyzer {
    settings: TrendSettings,
}

impl TrendAnalyzer {
    pub fn new(settings: TrendSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &TrendSettings {
        &self.settings
    }

    /// Weighted terms of one transiting pillar, keyed with `prefix`.
    fn pillar_terms(ctx: &NatalContext, pillar: Pillar, prefix: &str, weight: f64) -> Vec<(String, f64)> {
        let dm = ctx.day_master();
        let elemental = ctx.elemental();
        let mut terms = Vec::new();

        for finding in BranchRelationAnalyzer::analyze(Some(pillar.branch()), ctx.chart()).findings {
            let delta = relation_delta(&finding) * position_weight(finding.natal_position);
            terms.push((
                format!(
                    "{}relation.{}.{}",
                    prefix,
                    finding.kind.as_key(),
                    finding.natal_position.as_key()
                ),
                delta * weight,
            ));
        }

        for (element, magnitude) in [
            (pillar.stem().element(), STEM_ELEMENT),
            (pillar.branch().element(), BRANCH_ELEMENT),
        ] {
            if elemental.is_favorable(element) {
                terms.push((
                    format!("{}element.{}.favorable", prefix, element.as_key()),
                    magnitude * weight,
                ));
            } else if elemental.is_unfavorable(element) {
                terms.push((
                    format!("{}element.{}.unfavorable", prefix, element.as_key()),
                    -magnitude * weight,
                ));
            }
        }

        let god = TenGodsAnalyzer::ten_god(dm, pillar.stem());
        terms.push((
            format!("{}sibsin.{}", prefix, god.as_key()),
            god.daily_delta() * TEN_GOD_SCALE * weight,
        ));

        let stage = TenGodsAnalyzer::twelve_stage(dm, pillar.branch());
        terms.push((
            format!("{}stage.{}", prefix, stage.as_key()),
            (f64::from(stage.energy()) - STAGE_MIDPOINT) * STAGE_SCALE * weight,
        ));

        terms
    }

    /// Score of a single calendar year.
    pub fn score_year(&self, ctx: &NatalContext, year: i32) -> YearlyScore {
        let dm = ctx.day_master();
        let year_pillar = FourPillarsCalculator::year_pillar(year);
        let daeun_pillar = ctx.profile().active_daeun(year).map(|cycle| cycle.pillar);

        let mut terms = Self::pillar_terms(ctx, year_pillar, "", 1.0);
        if let Some(pillar) = daeun_pillar {
            terms.extend(Self::pillar_terms(ctx, pillar, "daeun.", self.settings.daeun_weight));
        }

        let total: f64 = terms.iter().map(|(_, delta)| delta).sum();
        let score = Score::new(BASE_SCORE + total);

        YearlyScore {
            year,
            age: ctx.profile().age_in(year),
            grade: grade_for(score),
            score,
            year_pillar,
            daeun_pillar,
            sibsin: TenGodsAnalyzer::ten_god(dm, year_pillar.stem()),
            stage: TenGodsAnalyzer::twelve_stage(dm, year_pillar.branch()),
            opportunities: strongest(&terms, true),
            challenges: strongest(&terms, false),
        }
    }

    fn transition(ctx: &NatalContext, cycle: &DaeunCycle) -> DaeunTransition {
        let dm = ctx.day_master();
        let elemental = ctx.elemental();
        let god = TenGodsAnalyzer::ten_god(dm, cycle.stem());
        let stage = TenGodsAnalyzer::twelve_stage(dm, cycle.branch());

        let balance: i32 = [cycle.stem().element(), cycle.branch().element()]
            .iter()
            .map(|element| {
                if elemental.is_favorable(*element) {
                    1
                } else if elemental.is_unfavorable(*element) {
                    -1
                } else {
                    0
                }
            })
            .sum();
        let impact = match balance {
            b if b > 0 => TransitionImpact::Positive,
            b if b < 0 => TransitionImpact::Negative,
            _ => TransitionImpact::Neutral,
        };

        DaeunTransition {
            year: cycle.start_year(ctx.profile().birth_year()),
            age: cycle.age_start as i32,
            pillar: cycle.pillar,
            description: format!("daeun.{}.{}", god.as_key(), stage.as_key()),
            impact,
        }
    }

    /// Scores every year of the range and summarizes its shape.
    pub fn analyze(&self, ctx: &NatalContext, range: &YearRange) -> TrendResult {
        let yearly_scores: Vec<YearlyScore> = range
            .years()
            .into_par_iter()
            .map(|year| self.score_year(ctx, year))
            .collect();

        let birth_year = ctx.profile().birth_year();
        let daeun_transitions = ctx
            .profile()
            .daeun_cycles()
            .iter()
            .filter(|cycle| range.contains(cycle.start_year(birth_year)))
            .map(|cycle| Self::transition(ctx, cycle))
            .collect();

        let slope = slope(&yearly_scores);
        let volatility = step_volatility(&yearly_scores);

        TrendResult {
            range: *range,
            overall_trend: direction(slope, volatility),
            slope,
            volatility,
            peak_years: peak_years(&yearly_scores),
            yearly_scores,
            daeun_transitions,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::analysis::{TenGod, TwelveStage};
    use crate::domain::pillars::BirthMoment;
    use crate::domain::profile::{BirthData, Gender, NatalProfile};
    use chrono::{NaiveDate, NaiveTime};

    fn context(gender: Option<Gender>) -> NatalContext {
        let birth = BirthData {
            moment: BirthMoment::new(
                NaiveDate::from_ymd_opt(1985, 3, 21).unwrap(),
                NaiveTime::from_hms_opt(14, 0, 0),
            ),
            gender,
        };
        NatalContext::new(NatalProfile::from_birth(&birth, &FourPillarsCalculator::default()).unwrap())
    }

    fn yearly(year: i32, score: f64) -> YearlyScore {
        YearlyScore {
            year,
            age: 0,
            grade: grade_for(Score::new(score)),
            score: Score::new(score),
            year_pillar: FourPillarsCalculator::year_pillar(year),
            daeun_pillar: None,
            sibsin: TenGod::Bigyeon,
            stage: TwelveStage::Jangsaeng,
            opportunities: Vec::new(),
            challenges: Vec::new(),
        }
    }

    #[test]
    fn year_grades_follow_fixed_cuts() {
        assert_eq!(grade_for(Score::new(70.0)), Grade::Excellent);
        assert_eq!(grade_for(Score::new(69.9)), Grade::Good);
        assert_eq!(grade_for(Score::new(58.0)), Grade::Good);
        assert_eq!(grade_for(Score::new(42.0)), Grade::Neutral);
        assert_eq!(grade_for(Score::new(30.0)), Grade::Caution);
        assert_eq!(grade_for(Score::new(29.9)), Grade::Worst);
    }

    #[test]
    fn analysis_covers_every_year_in_order() {
        let ctx = context(Some(Gender::Female));
        let range = YearRange::new(2020, 2034).unwrap();
        let result = TrendAnalyzer::default().analyze(&ctx, &range);

        let years: Vec<i32> = result.yearly_scores.iter().map(|s| s.year).collect();
        assert_eq!(years, range.years());
        for score in &result.yearly_scores {
            assert_eq!(score.age, score.year - 1985);
            assert_eq!(score.grade, grade_for(score.score));
            assert!(score.opportunities.len() <= TOP_FACTORS);
            assert!(score.challenges.len() <= TOP_FACTORS);
        }
    }

    #[test]
    fn analysis_is_deterministic() {
        let ctx = context(Some(Gender::Male));
        let range = YearRange::new(2000, 2040).unwrap();
        let analyzer = TrendAnalyzer::default();
        assert_eq!(analyzer.analyze(&ctx, &range), analyzer.analyze(&ctx, &range));
    }

    #[test]
    fn transitions_fall_inside_the_range() {
        let ctx = context(Some(Gender::Male));
        let range = YearRange::new(1985, 2065).unwrap();
        let result = TrendAnalyzer::default().analyze(&ctx, &range);

        assert!(!result.daeun_transitions.is_empty());
        for transition in &result.daeun_transitions {
            assert!(range.contains(transition.year));
            assert_eq!(transition.year, 1985 + transition.age);
            assert!(transition.description.starts_with("daeun."));
        }
    }

    #[test]
    fn no_gender_means_no_transitions_or_daeun_terms() {
        let ctx = context(None);
        let result = TrendAnalyzer::default().analyze(&ctx, &YearRange::new(2020, 2030).unwrap());

        assert!(result.daeun_transitions.is_empty());
        for score in &result.yearly_scores {
            assert!(score.daeun_pillar.is_none());
            assert!(score
                .opportunities
                .iter()
                .chain(score.challenges.iter())
                .all(|key| !key.starts_with("daeun.")));
        }
    }

    #[test]
    fn peaks_are_local_maxima() {
        let scores = vec![
            yearly(2020, 40.0),
            yearly(2021, 60.0),
            yearly(2022, 50.0),
            yearly(2023, 50.0),
            yearly(2024, 45.0),
        ];
        assert_eq!(peak_years(&scores), vec![2021, 2023]);

        let edges = vec![yearly(2020, 70.0), yearly(2021, 50.0), yearly(2022, 65.0)];
        assert_eq!(peak_years(&edges), vec![2020, 2022]);

        assert!(peak_years(&[yearly(2020, 50.0)]).is_empty());
    }

    #[test]
    fn direction_prefers_volatility_then_slope() {
        let rising: Vec<YearlyScore> = (0..5).map(|i| yearly(2020 + i, 40.0 + 5.0 * i as f64)).collect();
        assert!((slope(&rising) - 5.0).abs() < 1e-9);
        assert_eq!(direction(slope(&rising), step_volatility(&rising)), TrendDirection::Rising);

        let falling: Vec<YearlyScore> = (0..5).map(|i| yearly(2020 + i, 60.0 - 2.0 * i as f64)).collect();
        assert_eq!(direction(slope(&falling), step_volatility(&falling)), TrendDirection::Falling);

        let flat: Vec<YearlyScore> = (0..5).map(|i| yearly(2020 + i, 50.0)).collect();
        assert_eq!(direction(slope(&flat), step_volatility(&flat)), TrendDirection::Stable);

        let zigzag: Vec<YearlyScore> = [30.0, 70.0, 30.0, 70.0, 30.0]
            .iter()
            .enumerate()
            .map(|(i, s)| yearly(2020 + i as i32, *s))
            .collect();
        assert!(step_volatility(&zigzag) > VOLATILITY_LIMIT);
        assert_eq!(direction(slope(&zigzag), step_volatility(&zigzag)), TrendDirection::Volatile);
    }
}
