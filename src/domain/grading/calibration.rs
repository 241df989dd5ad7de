//! Grade thresholds calibrated from a year of scores.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{Grade, Score, ALL_GRADES};

/// Cumulative shares at which grades 0..=3 end.
pub const CUT_POINTS: [f64; 4] = [0.05, 0.20, 0.70, 0.95];

/// Score cuts between adjacent grades, best first.
///
/// `cuts[k]` is the lowest score that still earns grade `k`; cuts never
/// increase with `k`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GradeThresholds {
    cuts: [Score; 4],
}

impl Default for GradeThresholds {
    /// Fixed cuts used when no scores are available.
    fn default() -> Self {
        Self {
            cuts: [
                Score::from_tenths(700),
                Score::from_tenths(600),
                Score::from_tenths(420),
                Score::from_tenths(320),
            ],
        }
    }
}

impl GradeThresholds {
    pub fn cuts(&self) -> [Score; 4] {
        self.cuts
    }

    /// Derives cuts from a population of scores.
    ///
    /// # Algorithm
    /// Scores are sorted best first. For each cumulative target count, the
    /// score at the boundary is either included with all its ties or excluded
    /// with all its ties, whichever count lands closer to the target (ties
    /// favor inclusion).
    pub fn from_scores(scores: &[Score]) -> Self {
        if scores.is_empty() {
            return Self::default();
        }

        let mut tenths: Vec<i32> = scores.iter().map(|s| s.tenths()).collect();
        tenths.sort_unstable_by(|a, b| b.cmp(a));
        let n = tenths.len();

        let mut cuts = [0i32; 4];
        for (k, share) in CUT_POINTS.iter().enumerate() {
            let target = share * n as f64;
            let index = (target.round() as usize).clamp(1, n);
            let boundary = tenths[index - 1];

            let inclusive = tenths.iter().take_while(|t| **t >= boundary).count();
            let exclusive = tenths.iter().take_while(|t| **t > boundary).count();
            let exclusive_cut = if exclusive == 0 {
                boundary + 1
            } else {
                tenths[exclusive - 1]
            };

            let inclusive_error = (inclusive as f64 - target).abs();
            let exclusive_error = (exclusive as f64 - target).abs();
            let cut = if inclusive_error <= exclusive_error {
                boundary
            } else {
                exclusive_cut
            };
            cuts[k] = if k == 0 { cut } else { cut.min(cuts[k - 1]) };
        }

        Self {
            cuts: cuts.map(Score::from_tenths),
        }
    }

    /// Grade of a score; higher scores never get a worse grade.
    pub fn grade_for(&self, score: Score) -> Grade {
        self.cuts
            .iter()
            .position(|cut| score.tenths() >= cut.tenths())
            .map_or(Grade::Worst, |k| ALL_GRADES[k])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scores(values: &[i32]) -> Vec<Score> {
        values.iter().map(|v| Score::from_tenths(*v)).collect()
    }

    #[test]
    fn distinct_scores_hit_targets_exactly() {
        let population = scores(&(1..=100).map(|v| v * 10).collect::<Vec<_>>());
        let thresholds = GradeThresholds::from_scores(&population);

        let mut counts = [0usize; 5];
        for s in &population {
            counts[thresholds.grade_for(*s).value() as usize] += 1;
        }
        assert_eq!(counts, [5, 15, 50, 25, 5]);
    }

    #[test]
    fn ties_choose_the_closer_side() {
        // Top target is 1 of 20; the top two tie so exclusion (0) and
        // inclusion (2) are equally far and inclusion wins.
        let mut values = vec![900, 900];
        values.extend((0..18).map(|v| 100 + v * 10));
        let thresholds = GradeThresholds::from_scores(&scores(&values));
        assert_eq!(thresholds.grade_for(Score::from_tenths(900)), Grade::Excellent);
    }

    #[test]
    fn large_tie_block_is_excluded_when_closer() {
        // 2 high scores, then 10 tied: top-20% target is 4 of 20.
        let mut values = vec![990, 980];
        values.extend(std::iter::repeat(500).take(10));
        values.extend((0..8).map(|v| 100 + v * 10));
        let thresholds = GradeThresholds::from_scores(&scores(&values));
        assert_eq!(thresholds.grade_for(Score::from_tenths(980)), Grade::Good);
        assert_ne!(thresholds.grade_for(Score::from_tenths(500)), Grade::Good);
    }

    #[test]
    fn grades_are_monotonic() {
        let population = scores(&[120, 340, 340, 560, 610, 610, 610, 780, 910, 440]);
        let thresholds = GradeThresholds::from_scores(&population);
        let mut last = Grade::Excellent;
        for tenths in (0..=1000).rev() {
            let grade = thresholds.grade_for(Score::from_tenths(tenths));
            assert!(grade >= last);
            last = grade;
        }
        let cuts = thresholds.cuts();
        assert!(cuts.windows(2).all(|w| w[0] >= w[1]));
    }

    #[test]
    fn empty_population_uses_fixed_cuts() {
        let thresholds = GradeThresholds::from_scores(&[]);
        assert_eq!(thresholds, GradeThresholds::default());
        assert_eq!(thresholds.grade_for(Score::from_tenths(500)), Grade::Neutral);
    }
}
