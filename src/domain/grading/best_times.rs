//! Favorable double-hours of a day.

use serde::{Deserialize, Serialize};

use crate::domain::analysis::{BranchRelationAnalyzer, VoidStarAnalyzer};
use crate::domain::foundation::{Branch, Chart, ALL_BRANCHES};

/// At most this many hours are suggested per day.
pub const MAX_BEST_TIMES: usize = 3;

/// How strongly an hour is recommended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeQuality {
    /// Harmonizes with the natal day branch and carries Cheoneul Gwiin.
    Excellent,
    Good,
}

/// A recommended double-hour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BestTime {
    pub branch: Branch,
    pub start_hour: u8,
    pub quality: TimeQuality,
}

pub struct BestTimeFinder;

impl BestTimeFinder {
    /// Hours whose branch harmonizes with the natal day branch or is a
    /// Cheoneul Gwiin branch, never clashing with the natal or transiting
    /// day branch. Excellent hours first, then in day order.
    pub fn find(chart: &Chart, transit_day: Branch) -> Vec<BestTime> {
        let natal_day = chart.day.branch();
        let cheoneul = VoidStarAnalyzer::cheoneul_branches(chart.day_master());

        let mut times: Vec<BestTime> = ALL_BRANCHES
            .iter()
            .copied()
            .filter(|b| b.offset(6) != natal_day && b.offset(6) != transit_day)
            .filter_map(|branch| {
                let harmony = BranchRelationAnalyzer::relations(branch, natal_day)
                    .iter()
                    .any(|(kind, _)| kind.is_harmony());
                let noble = cheoneul.contains(&branch);
                let quality = match (harmony, noble) {
                    (true, true) => TimeQuality::Excellent,
                    (true, false) | (false, true) => TimeQuality::Good,
                    (false, false) => return None,
                };
                Some(BestTime {
                    branch,
                    start_hour: branch.start_hour(),
                    quality,
                })
            })
            .collect();

        times.sort_by_key(|t| t.quality);
        times.truncate(MAX_BEST_TIMES);
        times
    }
}
