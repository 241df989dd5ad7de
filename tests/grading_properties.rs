//! Property tests for calibration, day pillars and daily grading.

use chrono::{Duration, NaiveDate, NaiveTime};
use proptest::prelude::*;

use fortune_calendar::domain::foundation::{max_supported_date, min_supported_date, Score};
use fortune_calendar::domain::grading::{DailyGradingEngine, GradeThresholds, NatalContext};
use fortune_calendar::domain::pillars::{BirthMoment, FourPillarsCalculator};
use fortune_calendar::domain::profile::{BirthData, Gender, NatalProfile};

fn context() -> NatalContext {
    let birth = BirthData {
        moment: BirthMoment::new(
            NaiveDate::from_ymd_opt(1971, 1, 30).unwrap(),
            NaiveTime::from_hms_opt(3, 15, 0),
        ),
        gender: Some(Gender::Male),
    };
    NatalContext::new(NatalProfile::from_birth(&birth, &FourPillarsCalculator::default()).unwrap())
}

fn supported_date() -> impl Strategy<Value = NaiveDate> {
    let first = min_supported_date();
    let last = max_supported_date();
    (0..=(last - first).num_days()).prop_map(move |offset| first + Duration::days(offset))
}

proptest! {
    #[test]
    fn cuts_never_increase(tenths in prop::collection::vec(0i32..=1000, 1..400)) {
        let scores: Vec<Score> = tenths.into_iter().map(Score::from_tenths).collect();
        let cuts = GradeThresholds::from_scores(&scores).cuts();
        for pair in cuts.windows(2) {
            prop_assert!(pair[0] >= pair[1]);
        }
    }

    #[test]
    fn higher_scores_never_grade_worse(
        tenths in prop::collection::vec(0i32..=1000, 1..400),
        a in 0i32..=1000,
        b in 0i32..=1000,
    ) {
        let scores: Vec<Score> = tenths.into_iter().map(Score::from_tenths).collect();
        let thresholds = GradeThresholds::from_scores(&scores);
        let (low, high) = (a.min(b), a.max(b));
        prop_assert!(
            thresholds.grade_for(Score::from_tenths(high))
                <= thresholds.grade_for(Score::from_tenths(low))
        );
    }

    #[test]
    fn day_pillars_repeat_every_sixty_days(date in supported_date()) {
        let later = date + Duration::days(60);
        prop_assume!(later <= max_supported_date());

        let today = FourPillarsCalculator::day_pillar(date).unwrap();
        let tomorrow = FourPillarsCalculator::day_pillar(date + Duration::days(1)).unwrap();

        prop_assert_eq!(FourPillarsCalculator::day_pillar(later).unwrap(), today);
        prop_assert_eq!(tomorrow, today.offset(1));
    }

    #[test]
    fn grading_is_deterministic_and_consistent(date in supported_date()) {
        let ctx = context();
        let engine = DailyGradingEngine::default();
        let thresholds = GradeThresholds::default();

        let first = engine.grade(&ctx, date, &thresholds, None).unwrap();
        let second = engine.grade(&ctx, date, &thresholds, None).unwrap();
        prop_assert_eq!(&first, &second);

        prop_assert_eq!(first.grade, thresholds.grade_for(first.score));
        prop_assert!((0.0..=100.0).contains(&first.score.value()));
        if first.grade.is_favorable() {
            prop_assert!(first.warnings.is_empty());
        }
        if first.grade.is_unfavorable() {
            prop_assert!(!first.warnings.is_empty() || !first.saju_factors.is_empty());
        }
    }
}
