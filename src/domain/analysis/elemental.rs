//! Elemental Energy Analyzer - Weighted five-element balance around the Day Master.

use serde::{Deserialize, Serialize};

use super::TenGodsAnalyzer;
use crate::domain::foundation::{
    Chart, Element, ElementRole, Pillar, PillarPosition, Stem, ALL_ELEMENTS,
};

/// Weight of a heavenly stem.
pub const STEM_WEIGHT: f64 = 1.2;

/// Weight of a branch, split over its hidden stems.
pub const BRANCH_WEIGHT: f64 = 1.0;

/// Shares of the branch weight for main, middle and residual qi.
pub const HIDDEN_STEM_SHARES: [f64; 3] = [0.6, 0.3, 0.1];

/// Boost when a pillar's stem and branch share an element.
pub const CO_LOCATION_BOOST: f64 = 1.3;

/// Boost for the natal month branch.
pub const MONTH_BRANCH_BOOST: f64 = 1.5;

/// Support ratio below which the Day Master is weak.
pub const WEAK_BELOW: f64 = 0.40;

/// Support ratio above which the Day Master is strong.
pub const STRONG_ABOVE: f64 = 0.55;

/// Overall strength of the Day Master.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strength {
    Weak,
    Balanced,
    Strong,
}

impl Strength {
    pub fn as_key(&self) -> &'static str {
        match self {
            Strength::Weak => "weak",
            Strength::Balanced => "balanced",
            Strength::Strong => "strong",
        }
    }
}

/// Weighted tally per element, in generating order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ElementTally([f64; 5]);

impl ElementTally {
    pub fn get(&self, element: Element) -> f64 {
        self.0[element.index()]
    }

    fn add(&mut self, element: Element, weight: f64) {
        self.0[element.index()] += weight;
    }

    pub fn total(&self) -> f64 {
        self.0.iter().sum()
    }

    /// Share of the total held by an element, 0 when empty.
    pub fn share(&self, element: Element) -> f64 {
        let total = self.total();
        if total <= f64::EPSILON {
            0.0
        } else {
            self.get(element) / total
        }
    }

    /// Highest tally; ties resolve to the earlier element.
    pub fn dominant(&self) -> Element {
        let mut best = Element::Wood;
        for element in ALL_ELEMENTS {
            if self.get(element) > self.get(best) {
                best = element;
            }
        }
        best
    }

    /// Lowest tally; ties resolve to the earlier element.
    pub fn weakest(&self) -> Element {
        let mut worst = Element::Wood;
        for element in ALL_ELEMENTS {
            if self.get(element) < self.get(worst) {
                worst = element;
            }
        }
        worst
    }
}

/// Result of an elemental balance analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementalProfile {
    pub day_master: Stem,
    pub tally: ElementTally,
    /// (own + resource) / total.
    pub support_ratio: f64,
    pub strength: Strength,
    pub dominant_element: Element,
    pub weakest_element: Element,
    /// Stems whose element is present among the hidden stems in play.
    pub rooted_stems: Vec<Stem>,
    /// Stems in a thriving stage at the month branch.
    pub rising_stems: Vec<Stem>,
    pub favorable_elements: Vec<Element>,
    pub unfavorable_elements: Vec<Element>,
}

impl ElementalProfile {
    pub fn is_favorable(&self, element: Element) -> bool {
        self.favorable_elements.contains(&element)
    }

    pub fn is_unfavorable(&self, element: Element) -> bool {
        self.unfavorable_elements.contains(&element)
    }
}

/// Five-element tally and Day Master strength.
pub struct ElementalAnalyzer;

impl ElementalAnalyzer {
    /// Tallies pillars; the month pillar's branch gets the month boost.
    ///
    /// # Algorithm
    /// stem: 1.2 to its element; branch: 1.0 split 0.6/0.3/0.1 over its hidden
    /// stems (renormalized for branches with fewer than three). A pillar whose
    /// stem and branch share an element has both parts boosted by 1.3.
    pub fn tally(pillars: &[(Option<PillarPosition>, Pillar)]) -> ElementTally {
        let mut tally = ElementTally::default();

        for (position, pillar) in pillars {
            let co_located = pillar.stem().element() == pillar.branch().element();
            let boost = if co_located { CO_LOCATION_BOOST } else { 1.0 };
            tally.add(pillar.stem().element(), STEM_WEIGHT * boost);

            let month = *position == Some(PillarPosition::Month);
            let branch_weight =
                BRANCH_WEIGHT * boost * if month { MONTH_BRANCH_BOOST } else { 1.0 };
            let hidden = pillar.branch().hidden_stems();
            let share_total: f64 = HIDDEN_STEM_SHARES.iter().take(hidden.len()).sum();
            for (stem, share) in hidden.iter().zip(HIDDEN_STEM_SHARES) {
                tally.add(stem.element(), branch_weight * share / share_total);
            }
        }

        tally
    }

    /// Balance of a natal chart alone.
    pub fn analyze_chart(chart: &Chart) -> ElementalProfile {
        Self::analyze(chart, &[])
    }

    /// Balance of a natal chart with transiting pillars in play.
    pub fn analyze(chart: &Chart, transits: &[Pillar]) -> ElementalProfile {
        let mut pillars: Vec<(Option<PillarPosition>, Pillar)> = chart
            .pillars()
            .into_iter()
            .map(|(pos, p)| (Some(pos), p))
            .collect();
        pillars.extend(transits.iter().map(|p| (None, *p)));

        let day_master = chart.day_master();
        let own = day_master.element();
        let tally = Self::tally(&pillars);
        let total = tally.total();
        let support = tally.get(own) + tally.get(own.generated_by());
        let support_ratio = if total <= f64::EPSILON {
            0.0
        } else {
            support / total
        };

        let strength = if support_ratio < WEAK_BELOW {
            Strength::Weak
        } else if support_ratio > STRONG_ABOVE {
            Strength::Strong
        } else {
            Strength::Balanced
        };

        let all_stems: Vec<Stem> = pillars.iter().map(|(_, p)| p.stem()).collect();
        let hidden_elements: Vec<Element> = pillars
            .iter()
            .flat_map(|(_, p)| p.branch().hidden_stems().iter().map(|s| s.element()))
            .collect();

        let mut rooted_stems: Vec<Stem> = all_stems
            .iter()
            .copied()
            .filter(|s| hidden_elements.contains(&s.element()))
            .collect();
        rooted_stems.sort();
        rooted_stems.dedup();

        let month_branch = chart.month_branch();
        let mut rising_stems: Vec<Stem> = all_stems
            .iter()
            .copied()
            .filter(|s| TenGodsAnalyzer::twelve_stage(*s, month_branch).is_strong())
            .collect();
        rising_stems.sort();
        rising_stems.dedup();

        let (favorable_elements, unfavorable_elements) =
            Self::element_preferences(own, strength, &tally);

        ElementalProfile {
            day_master,
            tally,
            support_ratio,
            strength,
            dominant_element: tally.dominant(),
            weakest_element: tally.weakest(),
            rooted_stems,
            rising_stems,
            favorable_elements,
            unfavorable_elements,
        }
    }

    /// Elements that help or hurt a Day Master of a given strength.
    ///
    /// Weak charts want companions and resources; strong charts want output,
    /// wealth and officer. Balanced charts want their scarcest element.
    pub fn element_preferences(
        own: Element,
        strength: Strength,
        tally: &ElementTally,
    ) -> (Vec<Element>, Vec<Element>) {
        let supporting = vec![
            own.with_role(ElementRole::Companion),
            own.with_role(ElementRole::Resource),
        ];
        let restraining = vec![
            own.with_role(ElementRole::Output),
            own.with_role(ElementRole::Wealth),
            own.with_role(ElementRole::Officer),
        ];
        match strength {
            Strength::Weak => (supporting, restraining),
            Strength::Strong => (restraining, supporting),
            Strength::Balanced => {
                let weakest = tally.weakest();
                let dominant = tally.dominant();
                let unfavorable = if dominant == weakest {
                    Vec::new()
                } else {
                    vec![dominant]
                };
                (vec![weakest], unfavorable)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::Branch;

    fn p(s: &str) -> Pillar {
        s.parse().unwrap()
    }

    fn chart(year: &str, month: &str, day: &str, hour: Option<&str>) -> Chart {
        Chart::new(p(year), p(month), p(day), hour.map(p))
    }

    #[test]
    fn single_pillar_tally_weights() {
        // 甲子: stem Wood 1.2, branch 子 holds only 癸 (Water 1.0).
        let tally = ElementalAnalyzer::tally(&[(None, p("甲子"))]);
        assert!((tally.get(Element::Wood) - 1.2).abs() < 1e-9);
        assert!((tally.get(Element::Water) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn co_location_and_month_boosts_apply() {
        // 甲寅 is Wood over Wood: both parts boosted.
        let plain = ElementalAnalyzer::tally(&[(None, p("甲寅"))]);
        let month = ElementalAnalyzer::tally(&[(Some(PillarPosition::Month), p("甲寅"))]);
        assert!((plain.get(Element::Wood) - (1.2 * 1.3 + 0.6 * 1.3)).abs() < 1e-9);
        assert!(month.total() > plain.total());
    }

    #[test]
    fn hidden_stems_split_branch_weight() {
        // 寅 hides 甲丙戊 at 0.6/0.3/0.1.
        let tally = ElementalAnalyzer::tally(&[(None, p("壬寅"))]);
        assert!((tally.get(Element::Fire) - 0.3).abs() < 1e-9);
        assert!((tally.get(Element::Earth) - 0.1).abs() < 1e-9);
        assert!((tally.total() - 2.2).abs() < 1e-9);
    }

    #[test]
    fn wood_heavy_chart_is_strong() {
        let c = chart("甲寅", "丙寅", "甲寅", Some("乙亥"));
        let profile = ElementalAnalyzer::analyze_chart(&c);
        assert_eq!(profile.strength, Strength::Strong);
        assert_eq!(profile.dominant_element, Element::Wood);
        assert!(profile.favorable_elements.contains(&Element::Metal));
        assert!(profile.unfavorable_elements.contains(&Element::Water));
    }

    #[test]
    fn isolated_day_master_is_weak() {
        let c = chart("庚申", "辛酉", "甲申", Some("庚午"));
        let profile = ElementalAnalyzer::analyze_chart(&c);
        assert_eq!(profile.strength, Strength::Weak);
        assert!(profile.favorable_elements.contains(&Element::Water));
        assert!(!profile.rooted_stems.contains(&Stem::Gap));
    }

    #[test]
    fn rooted_and_rising_stems() {
        let c = chart("甲子", "丙寅", "戊午", None);
        let profile = ElementalAnalyzer::analyze_chart(&c);
        // 甲 is rooted in 寅, 戊 in 寅 and 午.
        assert!(profile.rooted_stems.contains(&Stem::Gap));
        assert!(profile.rooted_stems.contains(&Stem::Mu));
        // At a 寅 month: 甲 Geonrok, 丙 Jangsaeng, 戊 Jangsaeng.
        assert!(profile.rising_stems.contains(&Stem::Gap));
        assert!(profile.rising_stems.contains(&Stem::Byeong));
        assert_eq!(chart("甲子", "丙寅", "戊午", None).month_branch(), Branch::In);
    }

    #[test]
    fn transits_enter_the_tally() {
        let c = chart("甲子", "丙寅", "戊午", None);
        let natal = ElementalAnalyzer::analyze_chart(&c);
        let with_transit = ElementalAnalyzer::analyze(&c, &[p("壬子")]);
        assert!(with_transit.tally.get(Element::Water) > natal.tally.get(Element::Water));
    }
}
