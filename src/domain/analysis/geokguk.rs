//! Geokguk Determiner - Structural pattern of a natal chart and its status.
//!
//! # Precedence
//!
//! 1. One-element special, follow and parallel patterns, read from the
//!    elemental tally.
//! 2. Stem transformation patterns, gated by four conditions.
//! 3. Regular patterns from the ten-god of the month branch's revealed (or
//!    main) hidden stem.
//!
//! The determiner is total: anything that fits nowhere is `Undetermined`
//! with `Low` confidence.

use serde::{Deserialize, Serialize};

use super::{BranchRelationAnalyzer, ElementalAnalyzer, RelationKind, Strength, TenGod, TenGodsAnalyzer, TwelveStage};
use crate::domain::foundation::{Chart, Element, ElementRole, PillarPosition, Stem, ALL_ELEMENTS};

// ════════════════════════════════════════════════════════════════════════════════
// Pattern vocabulary
// ════════════════════════════════════════════════════════════════════════════════

/// Pattern category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternCategory {
    Regular,
    Follow,
    Parallel,
    Transformed,
    Special,
    Undetermined,
}

/// Confidence in a determined pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Confidence {
    High,
    Medium,
    Low,
}

/// Named structural patterns (격국).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Pattern {
    // Regular
    Jeonggwan,
    Pyeongwan,
    Jeongjae,
    Pyeonjae,
    Jeongin,
    Pyeonin,
    Siksin,
    Sanggwan,
    Geonrok,
    Yangin,
    // Follow
    Jonggang,
    Jonga,
    Jongjae,
    Jongsal,
    Jongse,
    // Parallel (two elements, the first producing the second)
    WoodFireParallel,
    FireEarthParallel,
    EarthMetalParallel,
    MetalWaterParallel,
    WaterWoodParallel,
    // Transformed
    EarthTransformation,
    MetalTransformation,
    WaterTransformation,
    WoodTransformation,
    FireTransformation,
    // Special one-element
    Gokjik,
    Yeomsang,
    Gasaek,
    Jonghyeok,
    Yunha,
    Undetermined,
}

impl Pattern {
    pub fn category(&self) -> PatternCategory {
        use Pattern::*;
        match self {
            Jeonggwan | Pyeongwan | Jeongjae | Pyeonjae | Jeongin | Pyeonin | Siksin
            | Sanggwan | Geonrok | Yangin => PatternCategory::Regular,
            Jonggang | Jonga | Jongjae | Jongsal | Jongse => PatternCategory::Follow,
            WoodFireParallel | FireEarthParallel | EarthMetalParallel | MetalWaterParallel
            | WaterWoodParallel => PatternCategory::Parallel,
            EarthTransformation | MetalTransformation | WaterTransformation
            | WoodTransformation | FireTransformation => PatternCategory::Transformed,
            Gokjik | Yeomsang | Gasaek | Jonghyeok | Yunha => PatternCategory::Special,
            Undetermined => PatternCategory::Undetermined,
        }
    }

    pub fn as_key(&self) -> &'static str {
        use Pattern::*;
        match self {
            Jeonggwan => "jeonggwan",
            Pyeongwan => "pyeongwan",
            Jeongjae => "jeongjae",
            Pyeonjae => "pyeonjae",
            Jeongin => "jeongin",
            Pyeonin => "pyeonin",
            Siksin => "siksin",
            Sanggwan => "sanggwan",
            Geonrok => "geonrok",
            Yangin => "yangin",
            Jonggang => "jonggang",
            Jonga => "jonga",
            Jongjae => "jongjae",
            Jongsal => "jongsal",
            Jongse => "jongse",
            WoodFireParallel => "parallel_wood_fire",
            FireEarthParallel => "parallel_fire_earth",
            EarthMetalParallel => "parallel_earth_metal",
            MetalWaterParallel => "parallel_metal_water",
            WaterWoodParallel => "parallel_water_wood",
            EarthTransformation => "transformed_earth",
            MetalTransformation => "transformed_metal",
            WaterTransformation => "transformed_water",
            WoodTransformation => "transformed_wood",
            FireTransformation => "transformed_fire",
            Gokjik => "gokjik",
            Yeomsang => "yeomsang",
            Gasaek => "gasaek",
            Jonghyeok => "jonghyeok",
            Yunha => "yunha",
            Undetermined => "undetermined",
        }
    }

    fn special(element: Element) -> Self {
        match element {
            Element::Wood => Pattern::Gokjik,
            Element::Fire => Pattern::Yeomsang,
            Element::Earth => Pattern::Gasaek,
            Element::Metal => Pattern::Jonghyeok,
            Element::Water => Pattern::Yunha,
        }
    }

    /// Parallel pattern named by its producing element.
    fn parallel(producer: Element) -> Self {
        match producer {
            Element::Wood => Pattern::WoodFireParallel,
            Element::Fire => Pattern::FireEarthParallel,
            Element::Earth => Pattern::EarthMetalParallel,
            Element::Metal => Pattern::MetalWaterParallel,
            Element::Water => Pattern::WaterWoodParallel,
        }
    }

    fn transformed(element: Element) -> Self {
        match element {
            Element::Wood => Pattern::WoodTransformation,
            Element::Fire => Pattern::FireTransformation,
            Element::Earth => Pattern::EarthTransformation,
            Element::Metal => Pattern::MetalTransformation,
            Element::Water => Pattern::WaterTransformation,
        }
    }

    fn regular(god: TenGod) -> Self {
        match god {
            TenGod::Bigyeon => Pattern::Geonrok,
            TenGod::Geobjae => Pattern::Yangin,
            TenGod::Siksin => Pattern::Siksin,
            TenGod::Sanggwan => Pattern::Sanggwan,
            TenGod::Pyeonjae => Pattern::Pyeonjae,
            TenGod::Jeongjae => Pattern::Jeongjae,
            TenGod::Pyeongwan => Pattern::Pyeongwan,
            TenGod::Jeonggwan => Pattern::Jeonggwan,
            TenGod::Pyeonin => Pattern::Pyeonin,
            TenGod::Jeongin => Pattern::Jeongin,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Stem combinations
// ════════════════════════════════════════════════════════════════════════════════

/// The five stem combinations (천간합).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StemCombination {
    /// 甲己 → Earth
    GapGi,
    /// 乙庚 → Metal
    EulGyeong,
    /// 丙辛 → Water
    ByeongSin,
    /// 丁壬 → Wood
    JeongIm,
    /// 戊癸 → Fire
    MuGye,
}

pub const ALL_COMBINATIONS: [StemCombination; 5] = [
    StemCombination::GapGi,
    StemCombination::EulGyeong,
    StemCombination::ByeongSin,
    StemCombination::JeongIm,
    StemCombination::MuGye,
];

impl StemCombination {
    pub fn stems(&self) -> (Stem, Stem) {
        match self {
            StemCombination::GapGi => (Stem::Gap, Stem::Gi),
            StemCombination::EulGyeong => (Stem::Eul, Stem::Gyeong),
            StemCombination::ByeongSin => (Stem::Byeong, Stem::Sin),
            StemCombination::JeongIm => (Stem::Jeong, Stem::Im),
            StemCombination::MuGye => (Stem::Mu, Stem::Gye),
        }
    }

    pub fn element(&self) -> Element {
        match self {
            StemCombination::GapGi => Element::Earth,
            StemCombination::EulGyeong => Element::Metal,
            StemCombination::ByeongSin => Element::Water,
            StemCombination::JeongIm => Element::Wood,
            StemCombination::MuGye => Element::Fire,
        }
    }

    pub fn involves(&self, stem: Stem) -> bool {
        let (a, b) = self.stems();
        stem == a || stem == b
    }
}

/// Gate results of a transformation check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransformationConditions {
    /// Both stems of the combination stand in the chart.
    pub has_hap: bool,
    /// The two stems sit in neighbouring pillars.
    pub adjacent: bool,
    pub day_master_involved: bool,
    /// Month branch is the transformed element or produces it.
    pub month_supports: bool,
    /// No other stem controls the transformed element.
    pub no_breaker: bool,
}

/// Outcome of checking one stem combination against a chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransformationCheck {
    pub combination: StemCombination,
    pub transformed_element: Element,
    pub conditions: TransformationConditions,
    pub passes: bool,
}

// ════════════════════════════════════════════════════════════════════════════════
// Results
// ════════════════════════════════════════════════════════════════════════════════

/// A determined pattern.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeokgukResult {
    pub primary: Pattern,
    pub category: PatternCategory,
    pub confidence: Confidence,
    /// Description key, e.g. `pattern.jeonggwan`.
    pub description: String,
    /// Stem that defines a regular pattern.
    pub pattern_stem: Option<Stem>,
    /// Key element of follow, parallel, transformed and special patterns.
    pub key_element: Option<Element>,
}

impl GeokgukResult {
    fn new(primary: Pattern, confidence: Confidence) -> Self {
        Self {
            primary,
            category: primary.category(),
            confidence,
            description: format!("pattern.{}", primary.as_key()),
            pattern_stem: None,
            key_element: None,
        }
    }

    fn undetermined() -> Self {
        Self::new(Pattern::Undetermined, Confidence::Low)
    }
}

/// Whether supporting or breaking factors dominate a pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternStatus {
    Success,
    Broken,
    Mixed,
}

impl PatternStatus {
    /// Slow-changing modifier applied to every daily score.
    pub fn score_modifier(&self) -> f64 {
        match self {
            PatternStatus::Success => 3.0,
            PatternStatus::Mixed => 0.0,
            PatternStatus::Broken => -3.0,
        }
    }

    pub fn as_key(&self) -> &'static str {
        match self {
            PatternStatus::Success => "success",
            PatternStatus::Broken => "broken",
            PatternStatus::Mixed => "mixed",
        }
    }
}

/// Status evaluation of a pattern.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusEvaluation {
    pub status: PatternStatus,
    pub positive_factors: Vec<String>,
    pub negative_factors: Vec<String>,
    pub score_modifier: f64,
}

/// Pattern plus status and every transformation check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdvancedGeokguk {
    #[serde(flatten)]
    pub result: GeokgukResult,
    pub status: StatusEvaluation,
    pub transformation_checks: Vec<TransformationCheck>,
}

// ════════════════════════════════════════════════════════════════════════════════
// Determiner
// ════════════════════════════════════════════════════════════════════════════════

const ORDER: [PillarPosition; 4] = [
    PillarPosition::Year,
    PillarPosition::Month,
    PillarPosition::Day,
    PillarPosition::Hour,
];

fn order_of(position: PillarPosition) -> usize {
    ORDER.iter().position(|p| *p == position).unwrap_or(0)
}

/// Ten-gods visible in a chart: every stem but the Day Master's own, plus
/// every branch's main hidden stem.
fn present_gods(chart: &Chart) -> Vec<TenGod> {
    let dm = chart.day_master();
    chart
        .pillars()
        .into_iter()
        .flat_map(|(position, pillar)| {
            let stem_god = (position != PillarPosition::Day)
                .then(|| TenGodsAnalyzer::ten_god(dm, pillar.stem()));
            let branch_god = TenGodsAnalyzer::branch_ten_god(dm, pillar.branch());
            stem_god.into_iter().chain(std::iter::once(branch_god))
        })
        .collect()
}

fn any_of(gods: &[TenGod], wanted: &[TenGod]) -> bool {
    gods.iter().any(|g| wanted.contains(g))
}

/// Chart pattern determination.
pub struct GeokgukDeterminer;

impl GeokgukDeterminer {
    /// Determines the primary pattern of a chart.
    pub fn determine(chart: &Chart) -> GeokgukResult {
        Self::elemental_pattern(chart)
            .or_else(|| Self::transformation_pattern(chart))
            .or_else(|| Self::regular_pattern(chart))
            .unwrap_or_else(GeokgukResult::undetermined)
    }

    /// Determines the pattern with its status and all transformation checks.
    pub fn determine_advanced(chart: &Chart) -> AdvancedGeokguk {
        let result = Self::determine(chart);
        let status = Self::evaluate_status(chart, &result);
        let transformation_checks = ALL_COMBINATIONS
            .iter()
            .map(|c| Self::check_transformation(chart, *c))
            .collect();
        AdvancedGeokguk {
            result,
            status,
            transformation_checks,
        }
    }

    /// Evaluates the four transformation gates for one stem combination.
    pub fn check_transformation(chart: &Chart, combination: StemCombination) -> TransformationCheck {
        let (a, b) = combination.stems();
        let element = combination.element();
        let placed: Vec<(PillarPosition, Stem)> = chart
            .pillars()
            .into_iter()
            .map(|(pos, p)| (pos, p.stem()))
            .collect();

        let positions_of = |stem: Stem| -> Vec<usize> {
            placed
                .iter()
                .filter(|(_, s)| *s == stem)
                .map(|(pos, _)| order_of(*pos))
                .collect()
        };
        let (pos_a, pos_b) = (positions_of(a), positions_of(b));

        let has_hap = !pos_a.is_empty() && !pos_b.is_empty();
        let adjacent = pos_a
            .iter()
            .any(|x| pos_b.iter().any(|y| x.abs_diff(*y) == 1));
        let day_master_involved = has_hap && combination.involves(chart.day_master());

        let month_element = chart.month_branch().element();
        let month_supports = month_element == element || month_element.generates() == element;

        let no_breaker = !placed
            .iter()
            .filter(|(_, s)| !combination.involves(*s))
            .any(|(_, s)| s.element().controls() == element);

        let conditions = TransformationConditions {
            has_hap,
            adjacent,
            day_master_involved,
            month_supports,
            no_breaker,
        };
        let passes = has_hap
            && adjacent
            && (day_master_involved || month_supports)
            && month_supports
            && no_breaker;

        TransformationCheck {
            combination,
            transformed_element: element,
            conditions,
            passes,
        }
    }

    /// Special, follow-strength, follow and parallel patterns.
    fn elemental_pattern(chart: &Chart) -> Option<GeokgukResult> {
        let profile = ElementalAnalyzer::analyze_chart(chart);
        let tally = profile.tally;
        let dm = chart.day_master();
        let own = dm.element();
        let officer = own.with_role(ElementRole::Officer);

        let officer_stem = chart
            .pillars()
            .iter()
            .any(|(pos, p)| *pos != PillarPosition::Day && p.stem().element() == officer);
        let month_element = chart.month_branch().element();
        let own_share = tally.share(own);

        if own_share >= 0.6
            && (month_element == own || month_element == own.generated_by())
            && !officer_stem
        {
            let confidence = if own_share >= 0.7 {
                Confidence::High
            } else {
                Confidence::Medium
            };
            let mut result = GeokgukResult::new(Pattern::special(own), confidence);
            result.key_element = Some(own);
            return Some(result);
        }

        if profile.support_ratio >= 0.8 && !officer_stem {
            let confidence = if profile.support_ratio >= 0.9 {
                Confidence::High
            } else {
                Confidence::Medium
            };
            let mut result = GeokgukResult::new(Pattern::Jonggang, confidence);
            result.key_element = Some(own);
            return Some(result);
        }

        if profile.support_ratio < 0.2 && !profile.rooted_stems.contains(&dm) {
            let roles = [ElementRole::Output, ElementRole::Wealth, ElementRole::Officer];
            let mut best = roles[0];
            for role in roles {
                if tally.get(own.with_role(role)) > tally.get(own.with_role(best)) {
                    best = role;
                }
            }
            let best_element = own.with_role(best);
            let pattern = if tally.share(best_element) >= 0.5 {
                match best {
                    ElementRole::Output => Pattern::Jonga,
                    ElementRole::Wealth => Pattern::Jongjae,
                    _ => Pattern::Jongsal,
                }
            } else {
                Pattern::Jongse
            };
            let confidence = if profile.support_ratio < 0.12 {
                Confidence::High
            } else {
                Confidence::Medium
            };
            let mut result = GeokgukResult::new(pattern, confidence);
            result.key_element = Some(best_element);
            return Some(result);
        }

        let mut ranked = ALL_ELEMENTS.to_vec();
        ranked.sort_by(|x, y| {
            tally
                .get(*y)
                .partial_cmp(&tally.get(*x))
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(x.cmp(y))
        });
        let (first, second) = (ranked[0], ranked[1]);
        let pair_share = tally.share(first) + tally.share(second);
        let producer = if first.generates() == second {
            Some(first)
        } else if second.generates() == first {
            Some(second)
        } else {
            None
        };
        if let Some(producer) = producer {
            if pair_share >= 0.85 && tally.share(first) >= 0.3 && tally.share(second) >= 0.3 {
                let confidence = if pair_share >= 0.95 {
                    Confidence::High
                } else {
                    Confidence::Medium
                };
                let mut result = GeokgukResult::new(Pattern::parallel(producer), confidence);
                result.key_element = Some(producer);
                return Some(result);
            }
        }

        None
    }

    fn transformation_pattern(chart: &Chart) -> Option<GeokgukResult> {
        ALL_COMBINATIONS
            .iter()
            .map(|c| Self::check_transformation(chart, *c))
            .find(|check| check.passes)
            .map(|check| {
                let confidence = if check.conditions.day_master_involved {
                    Confidence::High
                } else {
                    Confidence::Medium
                };
                let mut result =
                    GeokgukResult::new(Pattern::transformed(check.transformed_element), confidence);
                result.key_element = Some(check.transformed_element);
                result
            })
    }

    /// Regular pattern from the month branch's hidden stems, revealed ones first.
    fn regular_pattern(chart: &Chart) -> Option<GeokgukResult> {
        let dm = chart.day_master();
        let month_branch = chart.month_branch();
        let hidden = month_branch.hidden_stems();
        let visible: Vec<Stem> = chart
            .pillars()
            .into_iter()
            .filter(|(pos, _)| *pos != PillarPosition::Day)
            .map(|(_, p)| p.stem())
            .collect();

        let mut candidates: Vec<(Stem, Confidence)> = hidden
            .iter()
            .filter(|s| visible.contains(s))
            .map(|s| (*s, Confidence::High))
            .collect();
        for (i, stem) in hidden.iter().enumerate() {
            if !candidates.iter().any(|(s, _)| s == stem) {
                let confidence = if i == 0 { Confidence::Medium } else { Confidence::Low };
                candidates.push((*stem, confidence));
            }
        }

        let stage = TenGodsAnalyzer::twelve_stage(dm, month_branch);
        candidates.into_iter().find_map(|(stem, confidence)| {
            let god = TenGodsAnalyzer::ten_god(dm, stem);
            let allowed = match god {
                TenGod::Bigyeon => stage == TwelveStage::Geonrok,
                TenGod::Geobjae => stage == TwelveStage::Jewang,
                _ => true,
            };
            allowed.then(|| {
                let mut result = GeokgukResult::new(Pattern::regular(god), confidence);
                result.pattern_stem = Some(stem);
                result
            })
        })
    }

    /// Classifies whether supporting or breaking factors dominate.
    pub fn evaluate_status(chart: &Chart, result: &GeokgukResult) -> StatusEvaluation {
        let gods = present_gods(chart);
        let mut positive = Vec::new();
        let mut negative = Vec::new();
        let add = |cond: bool, list: &mut Vec<String>, key: &str| {
            if cond {
                list.push(format!("pattern.{}", key));
            }
        };

        use TenGod::*;
        let wealth = any_of(&gods, &[Jeongjae, Pyeonjae]);
        let officer = any_of(&gods, &[Jeonggwan, Pyeongwan]);
        let resource = any_of(&gods, &[Jeongin, Pyeonin]);
        let output = any_of(&gods, &[Siksin, Sanggwan]);
        let peers = any_of(&gods, &[Bigyeon, Geobjae]);

        match result.category {
            PatternCategory::Regular => {
                add(result.confidence == Confidence::High, &mut positive, "revealed");
                let month = chart.month_branch();
                let month_clash = chart.pillars().iter().any(|(pos, p)| {
                    *pos != PillarPosition::Month
                        && BranchRelationAnalyzer::relations(month, p.branch())
                            .iter()
                            .any(|(k, _)| *k == RelationKind::Chung)
                });
                add(month_clash, &mut negative, "month_clash");
                let balanced =
                    ElementalAnalyzer::analyze_chart(chart).strength == Strength::Balanced;
                add(balanced, &mut positive, "balanced_strength");

                match result.primary {
                    Pattern::Jeonggwan => {
                        add(wealth, &mut positive, "wealth_supports_officer");
                        add(resource, &mut positive, "resource_protects_officer");
                        add(gods.contains(&Sanggwan), &mut negative, "output_harms_officer");
                        add(gods.contains(&Pyeongwan), &mut negative, "officer_mixed");
                    }
                    Pattern::Pyeongwan => {
                        add(gods.contains(&Siksin), &mut positive, "food_restrains_killing");
                        add(resource, &mut positive, "resource_transforms_killing");
                        add(wealth && !gods.contains(&Siksin), &mut negative, "wealth_feeds_killing");
                    }
                    Pattern::Jeongjae | Pattern::Pyeonjae => {
                        add(output, &mut positive, "output_generates_wealth");
                        add(gods.contains(&Jeonggwan), &mut positive, "wealth_feeds_officer");
                        add(peers, &mut negative, "peers_rob_wealth");
                    }
                    Pattern::Jeongin | Pattern::Pyeonin => {
                        add(officer, &mut positive, "officer_feeds_resource");
                        add(wealth, &mut negative, "wealth_breaks_resource");
                    }
                    Pattern::Siksin => {
                        add(wealth, &mut positive, "output_generates_wealth");
                        add(gods.contains(&Pyeonin), &mut negative, "owl_steals_food");
                    }
                    Pattern::Sanggwan => {
                        add(resource, &mut positive, "resource_tames_output");
                        add(wealth, &mut positive, "output_generates_wealth");
                        add(gods.contains(&Jeonggwan), &mut negative, "output_harms_officer");
                    }
                    _ => {
                        add(officer, &mut positive, "officer_restrains_peers");
                        add(output, &mut positive, "output_vents_peers");
                        add(!officer && !output, &mut negative, "peers_unchecked");
                    }
                }
            }
            PatternCategory::Follow => {
                add(result.confidence == Confidence::High, &mut positive, "pure_follow");
                if result.primary == Pattern::Jonggang {
                    add(officer, &mut negative, "officer_interferes");
                } else {
                    add(resource, &mut negative, "resource_interferes");
                }
            }
            PatternCategory::Special => {
                if let Some(element) = result.key_element {
                    let month = chart.month_branch().element();
                    add(month == element, &mut positive, "seasonal_support");
                    add(output, &mut positive, "output_outlet");
                    add(officer, &mut negative, "counter_element_present");
                }
            }
            PatternCategory::Parallel => {
                add(true, &mut positive, "flowing_pair");
                if let Some(producer) = result.key_element {
                    let produced = producer.generates();
                    let counter = chart.pillars().iter().any(|(_, p)| {
                        let e = p.stem().element();
                        e.controls() == producer || e.controls() == produced
                    });
                    add(counter, &mut negative, "counter_element_present");
                }
            }
            PatternCategory::Transformed => {
                if let Some(element) = result.key_element {
                    let check = ALL_COMBINATIONS
                        .iter()
                        .find(|c| c.element() == element)
                        .map(|c| Self::check_transformation(chart, *c));
                    if let Some(check) = check {
                        add(check.conditions.day_master_involved, &mut positive, "day_master_combines");
                        add(check.conditions.month_supports, &mut positive, "month_supports_transformation");
                    }
                    let hidden_breaker = chart
                        .branches()
                        .iter()
                        .any(|b| b.main_stem().element().controls() == element);
                    add(hidden_breaker, &mut negative, "hidden_breaker");
                }
            }
            PatternCategory::Undetermined => {}
        }

        let status = match positive.len().cmp(&negative.len()) {
            std::cmp::Ordering::Greater => PatternStatus::Success,
            std::cmp::Ordering::Less => PatternStatus::Broken,
            std::cmp::Ordering::Equal => PatternStatus::Mixed,
        };

        StatusEvaluation {
            status,
            positive_factors: positive,
            negative_factors: negative,
            score_modifier: status.score_modifier(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::Pillar;

    fn p(s: &str) -> Pillar {
        s.parse().unwrap()
    }

    fn chart(year: &str, month: &str, day: &str, hour: Option<&str>) -> Chart {
        Chart::new(p(year), p(month), p(day), hour.map(p))
    }

    #[test]
    fn gap_gi_has_hap_with_gap_day_master() {
        // 甲子 day, 甲 Day Master, 寅 month, 己 present.
        let c = chart("己巳", "丙寅", "甲子", None);
        let check = GeokgukDeterminer::check_transformation(&c, StemCombination::GapGi);
        assert!(check.conditions.has_hap);
        assert!(check.conditions.day_master_involved);
        // 寅 is Wood, which controls Earth.
        assert!(!check.conditions.month_supports);
        assert!(!check.passes);
    }

    #[test]
    fn transformation_requires_all_gates() {
        // 甲己 adjacent, 辰 month (Earth), no Wood breaker besides 甲 itself.
        let c = chart("丙戌", "戊辰", "甲戌", Some("己巳"));
        let check = GeokgukDeterminer::check_transformation(&c, StemCombination::GapGi);
        assert!(check.conditions.has_hap);
        assert!(check.conditions.adjacent);
        assert!(check.conditions.month_supports);
        assert!(check.conditions.no_breaker);
        assert!(check.passes);

        let result = GeokgukDeterminer::determine(&c);
        assert_eq!(result.category, PatternCategory::Transformed);
        assert_eq!(result.primary, Pattern::EarthTransformation);
        assert_eq!(result.confidence, Confidence::High);
    }

    #[test]
    fn distant_pair_does_not_transform() {
        // 甲 year and 己 hour have two pillars between them.
        let c = chart("甲午", "丙辰", "庚申", Some("己卯"));
        let check = GeokgukDeterminer::check_transformation(&c, StemCombination::GapGi);
        assert!(check.conditions.has_hap);
        assert!(!check.conditions.adjacent);
        assert!(check.conditions.month_supports);
        assert!(check.conditions.no_breaker);
        assert!(!check.passes);

        let result = GeokgukDeterminer::determine(&c);
        assert_ne!(result.category, PatternCategory::Transformed);
        assert_ne!(result.primary, Pattern::EarthTransformation);
    }

    #[test]
    fn breaker_blocks_transformation() {
        // 乙 (Wood) controls the Earth that 甲己 would form.
        let c = chart("乙未", "戊辰", "甲戌", Some("己巳"));
        let check = GeokgukDeterminer::check_transformation(&c, StemCombination::GapGi);
        assert!(!check.conditions.no_breaker);
        assert!(!check.passes);
    }

    #[test]
    fn regular_pattern_from_revealed_month_stem() {
        // 甲 Day Master, 酉 month hides 辛 (Jeonggwan), revealed in the year.
        let c = chart("辛丑", "丁酉", "甲子", Some("戊辰"));
        let result = GeokgukDeterminer::determine(&c);
        assert_eq!(result.primary, Pattern::Jeonggwan);
        assert_eq!(result.category, PatternCategory::Regular);
        assert_eq!(result.confidence, Confidence::High);
        assert_eq!(result.pattern_stem, Some(Stem::Sin));
    }

    #[test]
    fn regular_pattern_from_unrevealed_main_stem() {
        // 甲 Day Master, 午 month: main 丁 (Sanggwan) is not revealed.
        let c = chart("壬子", "丙午", "甲子", None);
        let result = GeokgukDeterminer::determine(&c);
        assert_eq!(result.category, PatternCategory::Regular);
        assert_eq!(result.pattern_stem.map(|s| s.element()), Some(Element::Fire));
    }

    #[test]
    fn wood_dominated_chart_is_special() {
        let c = chart("甲寅", "丙寅", "甲寅", Some("乙卯"));
        let result = GeokgukDeterminer::determine(&c);
        assert_eq!(result.primary, Pattern::Gokjik);
        assert_eq!(result.category, PatternCategory::Special);
    }

    #[test]
    fn rootless_day_master_follows() {
        let c = chart("庚申", "辛酉", "乙酉", Some("庚申"));
        let result = GeokgukDeterminer::determine(&c);
        assert_eq!(result.category, PatternCategory::Follow);
        assert_eq!(result.primary, Pattern::Jongsal);
    }

    #[test]
    fn determine_and_advanced_agree() {
        let charts = [
            chart("辛丑", "丁酉", "甲子", Some("戊辰")),
            chart("己巳", "丙寅", "甲子", None),
            chart("甲寅", "丙寅", "甲寅", Some("乙卯")),
            chart("丙戌", "戊辰", "甲戌", Some("己巳")),
        ];
        for c in charts {
            let basic = GeokgukDeterminer::determine(&c);
            let advanced = GeokgukDeterminer::determine_advanced(&c);
            assert_eq!(basic.primary, advanced.result.primary);
            assert_eq!(basic.category, advanced.result.category);
            assert_eq!(basic.confidence, advanced.result.confidence);
            assert_eq!(advanced.transformation_checks.len(), 5);
            assert_eq!(basic, GeokgukDeterminer::determine(&c));
        }
    }

    #[test]
    fn determiner_is_total_over_all_day_month_pairs() {
        for day in 0..60 {
            for month in (0..60).step_by(7) {
                let c = Chart::new(
                    Pillar::from_cycle_index(4),
                    Pillar::from_cycle_index(month),
                    Pillar::from_cycle_index(day),
                    None,
                );
                let result = GeokgukDeterminer::determine(&c);
                assert_eq!(result.category, result.primary.category());
            }
        }
    }

    #[test]
    fn status_lists_supporting_and_breaking_factors() {
        // Jeonggwan with wealth (戊 hour, 己 in 丑) and 丁 Sanggwan in the month.
        let c = chart("辛丑", "丁酉", "甲子", Some("戊辰"));
        let advanced = GeokgukDeterminer::determine_advanced(&c);
        let status = &advanced.status;
        assert!(status
            .positive_factors
            .contains(&"pattern.wealth_supports_officer".to_string()));
        assert!(status.positive_factors.contains(&"pattern.revealed".to_string()));
        assert_eq!(status.score_modifier, status.status.score_modifier());
    }

    #[test]
    fn undetermined_is_mixed() {
        let c = chart("辛丑", "丁酉", "甲子", None);
        let eval = GeokgukDeterminer::evaluate_status(&c, &GeokgukResult::undetermined());
        assert_eq!(eval.status, PatternStatus::Mixed);
        assert_eq!(eval.score_modifier, 0.0);
    }
}
