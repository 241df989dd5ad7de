//! Consistency pass: derives displayed content from the grade and the
//! contributions that produced it.

use crate::domain::astrology::AstroScore;
use crate::domain::foundation::Grade;

use super::Contribution;

/// Warning used when a poor day has no specific warning of its own.
pub const FALLBACK_WARNING: &str = "caution.low_energy_day";

/// Displayed content of a graded day.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConsistentContent {
    pub title: String,
    pub saju_factors: Vec<String>,
    pub astro_factors: Vec<String>,
    pub recommendations: Vec<String>,
    pub warnings: Vec<String>,
}

fn push_unique(list: &mut Vec<String>, key: &str) {
    if !list.iter().any(|k| k == key) {
        list.push(key.to_string());
    }
}

pub struct ConsistencyPass;

impl ConsistencyPass {
    /// Keeps only content that agrees with the grade.
    ///
    /// Grades 0-1 show positive factors and no warnings; grades 3-4 show
    /// negative factors and at least one warning; grade 2 shows everything.
    /// The title comes from the highest-precedence retained relation.
    pub fn apply(grade: Grade, contributions: &[Contribution], astro: Option<&AstroScore>) -> ConsistentContent {
        let retained: Vec<&Contribution> = contributions
            .iter()
            .filter(|c| {
                if grade.is_favorable() {
                    c.is_positive()
                } else if grade.is_unfavorable() {
                    c.is_negative()
                } else {
                    c.delta != 0.0
                }
            })
            .collect();

        let mut content = ConsistentContent::default();
        for contribution in &retained {
            for key in &contribution.factor_keys {
                push_unique(&mut content.saju_factors, key);
            }
            for key in &contribution.recommendations {
                push_unique(&mut content.recommendations, key);
            }
            if !grade.is_favorable() && contribution.is_negative() {
                for key in &contribution.warnings {
                    push_unique(&mut content.warnings, key);
                }
            }
        }

        if let Some(astro) = astro {
            if !grade.is_unfavorable() {
                for key in &astro.positive_factors {
                    push_unique(&mut content.astro_factors, key);
                }
            }
            if !grade.is_favorable() {
                for key in &astro.negative_factors {
                    push_unique(&mut content.astro_factors, key);
                }
            }
        }

        if grade.is_unfavorable() && content.warnings.is_empty() {
            content.warnings.push(FALLBACK_WARNING.to_string());
        }

        let mut best: Option<&Contribution> = None;
        for contribution in retained.iter().filter(|c| c.title_key.is_some()) {
            if best.map_or(true, |b| contribution.title_rank < b.title_rank) {
                best = Some(contribution);
            }
        }
        content.title = best
            .and_then(|c| c.title_key.clone())
            .unwrap_or_else(|| format!("title.grade_{}", grade.value()));

        content
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::grading::ContributionSource;

    fn clash() -> Contribution {
        let mut c = Contribution::new(ContributionSource::Relation, -15.0, "relation.chung.day")
            .with_warning("warning.chung.day")
            .with_recommendation("recommend.avoid_major_decisions");
        c.title_key = Some("chung".to_string());
        c.title_rank = 0;
        c
    }

    fn harmony() -> Contribution {
        let mut c = Contribution::new(ContributionSource::Relation, 8.4, "relation.yukhap.month")
            .with_recommendation("recommend.partnership");
        c.title_key = Some("yukhap".to_string());
        c.title_rank = 2;
        c
    }

    fn lucky_star() -> Contribution {
        Contribution::new(ContributionSource::Star, 5.0, "star.cheoneul_gwiin")
    }

    #[test]
    fn good_days_drop_warnings_and_negative_factors() {
        let content = ConsistencyPass::apply(Grade::Good, &[clash(), harmony(), lucky_star()], None);
        assert!(content.warnings.is_empty());
        assert!(!content.saju_factors.contains(&"relation.chung.day".to_string()));
        assert!(content.saju_factors.contains(&"star.cheoneul_gwiin".to_string()));
        assert_eq!(content.title, "yukhap");
        assert_eq!(content.recommendations, vec!["recommend.partnership".to_string()]);
    }

    #[test]
    fn poor_days_keep_conflicts() {
        let content = ConsistencyPass::apply(Grade::Worst, &[clash(), harmony()], None);
        assert_eq!(content.title, "chung");
        assert_eq!(content.warnings, vec!["warning.chung.day".to_string()]);
        assert_eq!(content.saju_factors, vec!["relation.chung.day".to_string()]);
    }

    #[test]
    fn poor_day_without_warnings_gets_fallback() {
        let weak = Contribution::new(ContributionSource::Stage, -2.8, "stage.jeol");
        let content = ConsistencyPass::apply(Grade::Caution, &[weak], None);
        assert_eq!(content.warnings, vec![FALLBACK_WARNING.to_string()]);
        assert_eq!(content.title, "title.grade_3");
    }

    #[test]
    fn neutral_days_show_both_sides() {
        let content = ConsistencyPass::apply(Grade::Neutral, &[clash(), harmony()], None);
        assert_eq!(content.saju_factors.len(), 2);
        assert_eq!(content.warnings.len(), 1);
        assert_eq!(content.title, "chung");
    }

    #[test]
    fn astro_factors_follow_the_grade() {
        let astro = AstroScore {
            score: 1.0,
            positive_factors: vec!["astro.venus.domicile".to_string()],
            negative_factors: vec!["astro.mercury.retrograde".to_string()],
        };
        let good = ConsistencyPass::apply(Grade::Excellent, &[], Some(&astro));
        assert_eq!(good.astro_factors, vec!["astro.venus.domicile".to_string()]);
        let poor = ConsistencyPass::apply(Grade::Caution, &[], Some(&astro));
        assert_eq!(poor.astro_factors, vec!["astro.mercury.retrograde".to_string()]);
        assert_eq!(good.title, "title.grade_0");
    }
}
