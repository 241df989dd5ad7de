//! Multi-year trends over whole Daeun cycles.

use chrono::{NaiveDate, NaiveTime};
use fortune_calendar::domain::foundation::YearRange;
use fortune_calendar::domain::grading::NatalContext;
use fortune_calendar::domain::pillars::{BirthMoment, FourPillarsCalculator};
use fortune_calendar::domain::profile::{BirthData, Gender, NatalProfile};
use fortune_calendar::domain::trend::{TrendAnalyzer, TrendDirection, TrendResult, TrendSettings};

fn context(gender: Option<Gender>) -> NatalContext {
    let birth = BirthData {
        moment: BirthMoment::new(
            NaiveDate::from_ymd_opt(1978, 11, 2).unwrap(),
            NaiveTime::from_hms_opt(6, 45, 0),
        ),
        gender,
    };
    NatalContext::new(NatalProfile::from_birth(&birth, &FourPillarsCalculator::default()).unwrap())
}

fn analyze(ctx: &NatalContext, start: i32, end: i32) -> TrendResult {
    TrendAnalyzer::new(TrendSettings::default()).analyze(ctx, &YearRange::new(start, end).unwrap())
}

#[test]
fn every_year_is_scored_in_order() {
    let ctx = context(Some(Gender::Male));
    let result = analyze(&ctx, 2000, 2029);

    let years: Vec<i32> = result.yearly_scores.iter().map(|y| y.year).collect();
    assert_eq!(years, (2000..=2029).collect::<Vec<_>>());
    for yearly in &result.yearly_scores {
        assert_eq!(yearly.age, yearly.year - 1978);
        assert_eq!(yearly.year_pillar, FourPillarsCalculator::year_pillar(yearly.year));
        assert!((0.0..=100.0).contains(&yearly.score.value()));
        assert!(yearly.opportunities.len() <= 3);
        assert!(yearly.challenges.len() <= 3);
    }
}

#[test]
fn daeun_transitions_fall_inside_the_range() {
    let ctx = context(Some(Gender::Female));
    let result = analyze(&ctx, 1990, 2019);

    assert!(!result.daeun_transitions.is_empty());
    for transition in &result.daeun_transitions {
        assert!(result.range.contains(transition.year));
        assert_eq!(transition.age, transition.year - 1978);
        assert!(transition.description.starts_with("daeun."));

        let scored = result
            .yearly_scores
            .iter()
            .find(|y| y.year == transition.year)
            .unwrap();
        assert_eq!(scored.daeun_pillar, Some(transition.pillar));
    }
}

#[test]
fn no_gender_means_no_daeun_terms() {
    let ctx = context(None);
    let result = analyze(&ctx, 2010, 2020);

    assert!(result.daeun_transitions.is_empty());
    for yearly in &result.yearly_scores {
        assert!(yearly.daeun_pillar.is_none());
        assert!(yearly
            .opportunities
            .iter()
            .chain(&yearly.challenges)
            .all(|term| !term.starts_with("daeun.")));
    }
}

#[test]
fn peak_years_beat_their_neighbours() {
    let ctx = context(Some(Gender::Male));
    let result = analyze(&ctx, 2000, 2029);
    let score_of = |year: i32| {
        result
            .yearly_scores
            .iter()
            .find(|y| y.year == year)
            .map(|y| y.score.value())
    };

    for &peak in &result.peak_years {
        let score = score_of(peak).unwrap();
        if let Some(prev) = score_of(peak - 1) {
            assert!(score >= prev);
        }
        if let Some(next) = score_of(peak + 1) {
            assert!(score > next);
        }
    }
}

#[test]
fn direction_agrees_with_slope_and_volatility() {
    let ctx = context(Some(Gender::Female));
    let result = analyze(&ctx, 2020, 2034);

    let expected = if result.volatility > 12.0 {
        TrendDirection::Volatile
    } else if result.slope > 1.0 {
        TrendDirection::Rising
    } else if result.slope < -1.0 {
        TrendDirection::Falling
    } else {
        TrendDirection::Stable
    };
    assert_eq!(result.overall_trend, expected);
}

#[test]
fn single_year_has_no_peaks() {
    let ctx = context(Some(Gender::Male));
    let result = analyze(&ctx, 2025, 2025);

    assert_eq!(result.yearly_scores.len(), 1);
    assert!(result.peak_years.is_empty());
    assert_eq!(result.overall_trend, TrendDirection::Stable);
}

#[test]
fn trend_is_deterministic() {
    let ctx = context(Some(Gender::Female));
    assert_eq!(analyze(&ctx, 2000, 2029), analyze(&ctx, 2000, 2029));
}
