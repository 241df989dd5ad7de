//! Daily Grading Engine - Combines every analyzer into a calibrated grade.
//!
//! # Scoring
//!
//! `score = clamp(base + Σ contributions, 0, 100)`, rounded to 0.1. Relation
//! contributions are scaled by the natal pillar they touch (day 1.5, month
//! 1.2, year 0.8, hour 0.7). The astro term only enters when a snapshot is
//! supplied.
//!
//! # Calibration
//!
//! Grade cuts come from the Saju-only scores of the whole calendar year, so a
//! single-day query and a calendar grade the same day identically.

use chrono::NaiveDate;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use super::{
    BestTimeFinder, ConsistencyPass, Contribution, ContributionSource, GradeResult, GradeThresholds,
    GradingWeights, NatalContext,
};
use crate::domain::analysis::{
    BranchRelationAnalyzer, RelationKind, RelationshipFinding, StarKind, StarNature, TenGodsAnalyzer,
    VoidStarAnalyzer,
};
use crate::domain::astrology::{AstroSnapshot, AstroTransitAnalyzer};
use crate::domain::foundation::{DateRange, Element, PillarPosition, Score, ValidationError};
use crate::domain::pillars::{DailyPillars, FourPillarsCalculator};

const VOID_PENALTY: f64 = -4.0;
const LUCKY_STAR: f64 = 3.0;
const CHEONEUL_STAR: f64 = 5.0;
const UNLUCKY_STAR: f64 = -3.0;
const STAGE_MIDPOINT: f64 = 5.5;
const STAGE_SCALE: f64 = 0.8;
const AMPLIFIER: f64 = 1.5;

fn relation_base(kind: RelationKind) -> f64 {
    match kind {
        RelationKind::Samhap => 6.0,
        RelationKind::Yukhap => 7.0,
        RelationKind::Chung => 10.0,
        RelationKind::Xing => 7.0,
        RelationKind::Hai => 5.0,
    }
}

/// Weight of a relation touching a natal pillar.
pub fn position_weight(position: PillarPosition) -> f64 {
    match position {
        PillarPosition::Day => 1.5,
        PillarPosition::Month => 1.2,
        PillarPosition::Year => 0.8,
        PillarPosition::Hour => 0.7,
    }
}

/// Signed relation delta before position and component weights.
pub fn relation_delta(finding: &RelationshipFinding) -> f64 {
    let mut magnitude = relation_base(finding.kind);
    if finding.severe || finding.complete {
        magnitude *= AMPLIFIER;
    }
    if finding.is_favorable() {
        magnitude
    } else {
        -magnitude
    }
}

/// Saju-only evaluation of one day, before grading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayAssessment {
    pub pillars: DailyPillars,
    pub contributions: Vec<Contribution>,
    pub saju_score: Score,
}

impl DayAssessment {
    pub fn date(&self) -> NaiveDate {
        self.pillars.date
    }
}

/// Grades days for one natal context.
#[derive(Debug, Clone, Copy, Default)]
pub struct DailyGradingEngine {
    weights: GradingWeights,
    calculator: FourPillarsCalculator,
}

impl DailyGradingEngine {
    pub fn new(weights: GradingWeights, calculator: FourPillarsCalculator) -> Self {
        Self {
            weights,
            calculator,
        }
    }

    pub fn weights(&self) -> &GradingWeights {
        &self.weights
    }

    pub fn calculator(&self) -> &FourPillarsCalculator {
        &self.calculator
    }

    /// Saju contributions of a transiting day against the natal chart.
    pub fn contributions(&self, ctx: &NatalContext, pillars: &DailyPillars) -> Vec<Contribution> {
        let w = &self.weights;
        let chart = ctx.chart();
        let dm = ctx.day_master();
        let day = pillars.day;
        let mut out = Vec::new();

        // Day branch against every natal branch.
        let report = BranchRelationAnalyzer::analyze(Some(day.branch()), chart);
        for finding in report.findings {
            let delta = relation_delta(&finding) * position_weight(finding.natal_position) * w.relation;
            out.push(Contribution::from_finding(delta, finding));
        }

        // Month branch against the natal day branch, at reduced weight.
        for finding in BranchRelationAnalyzer::analyze_pair(
            pillars.month.branch(),
            chart.day.branch(),
            PillarPosition::Day,
            dm.element(),
        ) {
            let delta = relation_delta(&finding) * w.month_transit * w.relation;
            out.push(Contribution::new(
                ContributionSource::Relation,
                delta,
                format!("relation.{}.month_transit", finding.kind.as_key()),
            ));
        }

        // Elements of the transiting stems and branch.
        let profile = ctx.elemental();
        let slots: [(Element, f64); 3] = [
            (day.stem().element(), 4.0),
            (day.branch().element(), 3.0),
            (pillars.month.stem().element(), 2.0),
        ];
        for (element, magnitude) in slots {
            if profile.is_favorable(element) {
                out.push(
                    Contribution::new(
                        ContributionSource::Element,
                        magnitude * w.element,
                        format!("element.{}.favorable", element.as_key()),
                    )
                    .with_recommendation(format!("recommend.element.{}", element.as_key())),
                );
            } else if profile.is_unfavorable(element) {
                out.push(Contribution::new(
                    ContributionSource::Element,
                    -magnitude * w.element,
                    format!("element.{}.unfavorable", element.as_key()),
                ));
            }
        }

        // Day Master's stage at the day branch.
        let stage = TenGodsAnalyzer::twelve_stage(dm, day.branch());
        let stage_delta = (f64::from(stage.energy()) - STAGE_MIDPOINT) * STAGE_SCALE * w.stage;
        out.push(Contribution::new(
            ContributionSource::Stage,
            stage_delta,
            format!("stage.{}", stage.as_key()),
        ));

        // Ten-gods of the transiting day and month stems.
        let god = TenGodsAnalyzer::ten_god(dm, day.stem());
        out.push(Contribution::new(
            ContributionSource::TenGod,
            god.daily_delta() * w.ten_god,
            format!("sibsin.{}", god.as_key()),
        ));
        let month_god = TenGodsAnalyzer::ten_god(dm, pillars.month.stem());
        out.push(Contribution::new(
            ContributionSource::TenGod,
            month_god.daily_delta() * w.ten_god * w.month_transit,
            format!("sibsin.month.{}", month_god.as_key()),
        ));

        // Void day.
        let void = VoidStarAnalyzer::void_report(chart, Some(day.branch()));
        if void.is_void {
            out.push(
                Contribution::new(ContributionSource::Void, VOID_PENALTY * w.void, "void.day")
                    .with_warning("warning.void_day")
                    .with_recommendation("recommend.postpone_contracts"),
            );
        }

        // Special stars.
        for star in VoidStarAnalyzer::active_stars(chart, day) {
            let contribution = match (star.nature, star.kind) {
                (StarNature::Lucky, StarKind::CheoneulGwiin) => {
                    Contribution::new(ContributionSource::Star, CHEONEUL_STAR * w.star, star.factor_key())
                        .with_recommendation("recommend.seek_help")
                }
                (StarNature::Lucky, _) => {
                    Contribution::new(ContributionSource::Star, LUCKY_STAR * w.star, star.factor_key())
                }
                (StarNature::Unlucky, _) => {
                    Contribution::new(ContributionSource::Star, UNLUCKY_STAR * w.star, star.factor_key())
                        .with_warning(format!("warning.star.{}", star.kind.as_key()))
                }
            };
            out.push(contribution);
        }

        // Slow-changing pattern status.
        let status = &ctx.geokguk().status;
        if status.score_modifier != 0.0 {
            out.push(Contribution::new(
                ContributionSource::Pattern,
                status.score_modifier * w.pattern,
                format!("pattern.status.{}", status.status.as_key()),
            ));
        }

        out
    }

    /// Saju-only assessment of a day's pillars.
    pub fn assess_pillars(&self, ctx: &NatalContext, pillars: DailyPillars) -> DayAssessment {
        let contributions = self.contributions(ctx, &pillars);
        let total: f64 = contributions.iter().map(|c| c.delta).sum();
        DayAssessment {
            pillars,
            contributions,
            saju_score: Score::new(self.weights.base_score + total),
        }
    }

    pub fn assess(&self, ctx: &NatalContext, date: NaiveDate) -> Result<DayAssessment, ValidationError> {
        let pillars = self.calculator.daily(date)?;
        Ok(self.assess_pillars(ctx, pillars))
    }

    /// Assessments for every day of a range, in date order.
    pub fn assess_range(
        &self,
        ctx: &NatalContext,
        range: &DateRange,
    ) -> Result<Vec<DayAssessment>, ValidationError> {
        range
            .days()
            .into_par_iter()
            .map(|date| self.assess(ctx, date))
            .collect()
    }

    /// Grade cuts for one calendar year of this context.
    pub fn calibrate(&self, ctx: &NatalContext, year: i32) -> Result<GradeThresholds, ValidationError> {
        let days = self.assess_range(ctx, &DateRange::year(year)?)?;
        Ok(Self::calibrate_from(&days))
    }

    /// Grade cuts from already assessed days.
    pub fn calibrate_from(days: &[DayAssessment]) -> GradeThresholds {
        let scores: Vec<Score> = days.iter().map(|d| d.saju_score).collect();
        GradeThresholds::from_scores(&scores)
    }

    /// Grades an assessed day, adding the astro term when a snapshot exists.
    pub fn finish(
        &self,
        ctx: &NatalContext,
        assessment: &DayAssessment,
        thresholds: &GradeThresholds,
        snapshot: Option<&AstroSnapshot>,
    ) -> GradeResult {
        let astro = snapshot.map(AstroTransitAnalyzer::score_daily);
        let score = match &astro {
            Some(astro) => {
                Score::new(assessment.saju_score.value() + astro.score * self.weights.astro)
            }
            None => assessment.saju_score,
        };
        let grade = thresholds.grade_for(score);
        let content = ConsistencyPass::apply(grade, &assessment.contributions, astro.as_ref());

        GradeResult {
            date: assessment.pillars.date,
            day_pillar: assessment.pillars.day,
            grade,
            score,
            title: content.title,
            saju_factors: content.saju_factors,
            astro_factors: content.astro_factors,
            recommendations: content.recommendations,
            warnings: content.warnings,
            best_times: BestTimeFinder::find(ctx.chart(), assessment.pillars.day.branch()),
        }
    }

    /// Grades one date against given cuts.
    pub fn grade(
        &self,
        ctx: &NatalContext,
        date: NaiveDate,
        thresholds: &GradeThresholds,
        snapshot: Option<&AstroSnapshot>,
    ) -> Result<GradeResult, ValidationError> {
        let assessment = self.assess(ctx, date)?;
        Ok(self.finish(ctx, &assessment, thresholds, snapshot))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::astrology::{MoonPhase, Planet, PlanetPosition, ZodiacSign};
    use crate::domain::foundation::Grade;
    use crate::domain::pillars::BirthMoment;
    use crate::domain::profile::{BirthData, Gender, NatalProfile};
    use chrono::NaiveTime;

    fn context() -> NatalContext {
        let birth = BirthData {
            moment: BirthMoment::new(
                NaiveDate::from_ymd_opt(1990, 5, 15).unwrap(),
                NaiveTime::from_hms_opt(10, 30, 0),
            ),
            gender: Some(Gender::Male),
        };
        let profile = NatalProfile::from_birth(&birth, &FourPillarsCalculator::default()).unwrap();
        NatalContext::new(profile)
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn grading_is_deterministic() {
        let ctx = context();
        let engine = DailyGradingEngine::default();
        let thresholds = engine.calibrate(&ctx, 2025).unwrap();
        let a = engine.grade(&ctx, date(2025, 3, 14), &thresholds, None).unwrap();
        let b = engine.grade(&ctx, date(2025, 3, 14), &thresholds, None).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn range_assessments_are_in_date_order() {
        let ctx = context();
        let engine = DailyGradingEngine::default();
        let range = DateRange::new(date(2025, 1, 1), date(2025, 3, 31)).unwrap();
        let days = engine.assess_range(&ctx, &range).unwrap();
        assert_eq!(days.len(), 90);
        assert!(days.windows(2).all(|w| w[0].date() < w[1].date()));
    }

    #[test]
    fn year_grades_are_consistent_with_content() {
        let ctx = context();
        let engine = DailyGradingEngine::default();
        let days = engine.assess_range(&ctx, &DateRange::year(2025).unwrap()).unwrap();
        let thresholds = DailyGradingEngine::calibrate_from(&days);

        let mut counts = [0usize; 5];
        for day in &days {
            let result = engine.finish(&ctx, day, &thresholds, None);
            counts[result.grade.value() as usize] += 1;
            if result.grade.is_favorable() {
                assert!(result.warnings.is_empty(), "{}", result.date);
            }
            if result.grade.is_unfavorable() {
                assert!(!result.warnings.is_empty() || !result.saju_factors.is_empty());
            }
            assert!((0.0..=100.0).contains(&result.score.value()));
            assert!(result.best_times.len() <= 3);
        }

        let total = days.len() as f64;
        let share = |g: usize| counts[g] as f64 / total;
        assert!(share(0) <= 0.10);
        assert!((0.05..=0.25).contains(&share(1)));
        assert!((0.35..=0.65).contains(&share(2)));
        assert!((0.15..=0.35).contains(&share(3)));
        assert!(share(4) <= 0.10);
    }

    #[test]
    fn higher_scores_never_grade_worse() {
        let ctx = context();
        let engine = DailyGradingEngine::default();
        let days = engine.assess_range(&ctx, &DateRange::year(2024).unwrap()).unwrap();
        let thresholds = DailyGradingEngine::calibrate_from(&days);
        let mut graded: Vec<_> = days
            .iter()
            .map(|d| engine.finish(&ctx, d, &thresholds, None))
            .collect();
        graded.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap());
        assert!(graded.windows(2).all(|w| w[0].grade <= w[1].grade));
    }

    #[test]
    fn void_days_carry_the_void_factor() {
        let ctx = context();
        let engine = DailyGradingEngine::default();
        let empty = VoidStarAnalyzer::empty_branches(ctx.chart().day);
        let days = engine.assess_range(&ctx, &DateRange::year(2025).unwrap()).unwrap();
        let void_day = days
            .iter()
            .find(|d| empty.contains(&d.pillars.day.branch()))
            .unwrap();
        assert!(void_day
            .contributions
            .iter()
            .any(|c| c.source == ContributionSource::Void && c.warnings.contains(&"warning.void_day".to_string())));
    }

    #[test]
    fn snapshot_adds_astro_term() {
        let ctx = context();
        let engine = DailyGradingEngine::default();
        let thresholds = GradeThresholds::default();
        let snapshot = AstroSnapshot::new(
            vec![
                PlanetPosition::new(Planet::Venus, ZodiacSign::Libra),
                PlanetPosition::new(Planet::Jupiter, ZodiacSign::Sagittarius),
            ],
            Some(MoonPhase::WaxingGibbous),
        );
        let day = date(2025, 6, 1);
        let plain = engine.grade(&ctx, day, &thresholds, None).unwrap();
        let with_astro = engine.grade(&ctx, day, &thresholds, Some(&snapshot)).unwrap();
        // +2 +2 +1.5 = 5.5 at weight 0.5
        assert!((with_astro.score.value() - (plain.score.value() + 2.8)).abs() < 0.11);
        assert!(plain.astro_factors.is_empty());
        if with_astro.grade != Grade::Caution && with_astro.grade != Grade::Worst {
            assert!(!with_astro.astro_factors.is_empty());
        }
    }

    #[test]
    fn out_of_range_dates_are_rejected() {
        let ctx = context();
        let engine = DailyGradingEngine::default();
        let thresholds = GradeThresholds::default();
        assert!(engine.grade(&ctx, date(1899, 12, 31), &thresholds, None).is_err());
        assert!(engine.calibrate(&ctx, 2101).is_err());
    }
}
