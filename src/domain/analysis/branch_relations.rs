//! Branch Relation Analyzer - Harmony, clash, punishment and harm between branches.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{Branch, Chart, Element, ElementRole, PillarPosition};

/// Kind of branch relation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationKind {
    /// Three-harmony (삼합), here matched as a pair of the same group.
    Samhap,
    /// Six-harmony (육합).
    Yukhap,
    /// Clash (충).
    Chung,
    /// Punishment (형).
    Xing,
    /// Harm (해).
    Hai,
}

impl RelationKind {
    pub fn as_key(&self) -> &'static str {
        match self {
            RelationKind::Samhap => "samhap",
            RelationKind::Yukhap => "yukhap",
            RelationKind::Chung => "chung",
            RelationKind::Xing => "xing",
            RelationKind::Hai => "hai",
        }
    }

    /// Display title precedence; lower wins.
    pub fn title_rank(&self) -> u8 {
        match self {
            RelationKind::Chung => 0,
            RelationKind::Xing | RelationKind::Hai => 1,
            RelationKind::Yukhap => 2,
            RelationKind::Samhap => 3,
        }
    }

    pub fn is_harmony(&self) -> bool {
        matches!(self, RelationKind::Samhap | RelationKind::Yukhap)
    }
}

/// Whether a finding helps or hinders the Day Master.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationPolarity {
    Favorable,
    Unfavorable,
}

/// One relation between the transiting branch and a natal branch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelationshipFinding {
    pub kind: RelationKind,
    pub polarity: RelationPolarity,
    pub natal_position: PillarPosition,
    pub transit_branch: Branch,
    pub natal_branch: Branch,
    /// Element produced by a harmony, or the transiting element for conflicts.
    pub element: Element,
    /// Conflict whose transiting element controls the Day Master.
    pub severe: bool,
    /// Samhap pair whose third member also stands in the chart.
    pub complete: bool,
    pub factor_keys: Vec<String>,
    pub recommendations: Vec<String>,
    pub warnings: Vec<String>,
    pub title_key: Option<String>,
}

impl RelationshipFinding {
    pub fn is_favorable(&self) -> bool {
        self.polarity == RelationPolarity::Favorable
    }
}

/// All findings for one transiting branch against a chart.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelationReport {
    pub findings: Vec<RelationshipFinding>,
}

impl RelationReport {
    pub fn is_empty(&self) -> bool {
        self.findings.is_empty()
    }

    /// Title of the highest-precedence finding.
    pub fn title_key(&self) -> Option<&str> {
        BranchRelationAnalyzer::title_of(self.findings.iter())
    }

    pub fn has(&self, kind: RelationKind) -> bool {
        self.findings.iter().any(|f| f.kind == kind)
    }
}

// Groups by branch index: 申子辰 Water, 巳酉丑 Metal, 寅午戌 Fire, 亥卯未 Wood.
// Each group is the set of branches sharing `index % 4`.
const SAMHAP_ELEMENTS: [Element; 4] = [Element::Water, Element::Metal, Element::Fire, Element::Wood];

const YUKHAP: [(Branch, Branch, Element); 6] = [
    (Branch::Ja, Branch::Chuk, Element::Earth),
    (Branch::In, Branch::Hae, Element::Wood),
    (Branch::Myo, Branch::Sul, Element::Fire),
    (Branch::Jin, Branch::Yu, Element::Metal),
    (Branch::Sa, Branch::Sin, Element::Water),
    (Branch::O, Branch::Mi, Element::Fire),
];

const XING_TRIADS: [[Branch; 3]; 2] = [
    [Branch::In, Branch::Sa, Branch::Sin],
    [Branch::Chuk, Branch::Sul, Branch::Mi],
];

const XING_PAIR: (Branch, Branch) = (Branch::Ja, Branch::Myo);

const SELF_PUNISHMENT: [Branch; 4] = [Branch::Jin, Branch::O, Branch::Yu, Branch::Hae];

const HAI: [(Branch, Branch); 6] = [
    (Branch::Ja, Branch::Mi),
    (Branch::Chuk, Branch::O),
    (Branch::In, Branch::Sa),
    (Branch::Myo, Branch::Jin),
    (Branch::Sin, Branch::Hae),
    (Branch::Yu, Branch::Sul),
];

fn same_pair(a: Branch, b: Branch, x: Branch, y: Branch) -> bool {
    (a == x && b == y) || (a == y && b == x)
}

/// Analyzer for branch relation tables.
pub struct BranchRelationAnalyzer;

impl BranchRelationAnalyzer {
    /// Samhap group index of a branch (0 Water, 1 Metal, 2 Fire, 3 Wood).
    pub fn samhap_group(branch: Branch) -> usize {
        branch.index() % 4
    }

    /// Members of a samhap group in 生 旺 墓 order.
    pub fn samhap_members(group: usize) -> [Branch; 3] {
        let peak = match group % 4 {
            0 => Branch::Ja,
            1 => Branch::Yu,
            2 => Branch::O,
            _ => Branch::Myo,
        };
        [peak.offset(-4), peak, peak.offset(4)]
    }

    /// Every relation kind between two branches, with its element.
    ///
    /// Conflicts carry the element of `a`, harmonies the element they produce.
    pub fn relations(a: Branch, b: Branch) -> Vec<(RelationKind, Element)> {
        let mut found = Vec::new();

        if a != b && Self::samhap_group(a) == Self::samhap_group(b) {
            found.push((RelationKind::Samhap, SAMHAP_ELEMENTS[Self::samhap_group(a)]));
        }
        if let Some((_, _, element)) = YUKHAP.iter().find(|(x, y, _)| same_pair(a, b, *x, *y)) {
            found.push((RelationKind::Yukhap, *element));
        }
        if a.offset(6) == b {
            found.push((RelationKind::Chung, a.element()));
        }
        if Self::is_xing(a, b) {
            found.push((RelationKind::Xing, a.element()));
        }
        if HAI.iter().any(|(x, y)| same_pair(a, b, *x, *y)) {
            found.push((RelationKind::Hai, a.element()));
        }

        found
    }

    /// Punishment between two branches: two members of a triad, 子卯, or a self-punishing pair.
    pub fn is_xing(a: Branch, b: Branch) -> bool {
        if a == b {
            return SELF_PUNISHMENT.contains(&a);
        }
        XING_TRIADS
            .iter()
            .any(|triad| triad.contains(&a) && triad.contains(&b))
            || same_pair(a, b, XING_PAIR.0, XING_PAIR.1)
    }

    /// Polarity of a relation for a Day Master element.
    ///
    /// A harmony producing the Day Master's own element, its resource, or its
    /// wealth helps; one producing output or officer drains or pressures.
    pub fn polarity(kind: RelationKind, element: Element, day_master: Element) -> RelationPolarity {
        if !kind.is_harmony() {
            return RelationPolarity::Unfavorable;
        }
        match day_master.role_of(element) {
            ElementRole::Companion | ElementRole::Resource | ElementRole::Wealth => {
                RelationPolarity::Favorable
            }
            ElementRole::Output | ElementRole::Officer => RelationPolarity::Unfavorable,
        }
    }

    /// Findings between a transiting branch and one natal branch.
    pub fn analyze_pair(
        transit: Branch,
        natal: Branch,
        position: PillarPosition,
        day_master: Element,
    ) -> Vec<RelationshipFinding> {
        Self::relations(transit, natal)
            .into_iter()
            .map(|(kind, element)| {
                let polarity = Self::polarity(kind, element, day_master);
                let severe = !kind.is_harmony() && transit.element().controls() == day_master;
                Self::finding(kind, polarity, position, transit, natal, element, severe)
            })
            .collect()
    }

    /// Findings between a transiting branch and every natal pillar branch.
    ///
    /// A missing transiting branch yields an empty report.
    pub fn analyze(transit: Option<Branch>, chart: &Chart) -> RelationReport {
        let Some(transit) = transit else {
            return RelationReport::default();
        };
        let day_master = chart.day_master().element();
        let natal_branches = chart.branches();

        let mut findings = Vec::new();
        for (position, pillar) in chart.pillars() {
            for mut finding in Self::analyze_pair(transit, pillar.branch(), position, day_master) {
                if finding.kind == RelationKind::Samhap {
                    let members = Self::samhap_members(Self::samhap_group(transit));
                    let third = members
                        .iter()
                        .find(|b| **b != transit && **b != finding.natal_branch);
                    if third.map_or(false, |b| natal_branches.contains(b)) {
                        finding.complete = true;
                        finding.factor_keys.push("relation.samhap.complete".to_string());
                    }
                }
                findings.push(finding);
            }
        }
        RelationReport { findings }
    }

    /// Title of the highest-precedence finding; ties keep the earliest.
    pub fn title_of<'a, I>(findings: I) -> Option<&'a str>
    where
        I: IntoIterator<Item = &'a RelationshipFinding>,
    {
        let mut best: Option<&RelationshipFinding> = None;
        for finding in findings {
            if best.map_or(true, |b| finding.kind.title_rank() < b.kind.title_rank()) {
                best = Some(finding);
            }
        }
        best.and_then(|f| f.title_key.as_deref())
    }

    fn finding(
        kind: RelationKind,
        polarity: RelationPolarity,
        position: PillarPosition,
        transit: Branch,
        natal: Branch,
        element: Element,
        severe: bool,
    ) -> RelationshipFinding {
        let key = kind.as_key();
        let mut factor_keys = vec![
            format!("relation.{}.{}", key, position.as_key()),
            format!("relation.{}.element.{}", key, element.as_key()),
        ];
        let mut recommendations = Vec::new();
        let mut warnings = Vec::new();

        match (kind, polarity) {
            (RelationKind::Samhap, RelationPolarity::Favorable) => {
                recommendations.push("recommend.teamwork".to_string());
            }
            (RelationKind::Yukhap, RelationPolarity::Favorable) => {
                recommendations.push("recommend.partnership".to_string());
            }
            (RelationKind::Samhap | RelationKind::Yukhap, RelationPolarity::Unfavorable) => {
                warnings.push(format!("warning.{}.draining", key));
            }
            (RelationKind::Chung, _) => {
                warnings.push(format!("warning.chung.{}", position.as_key()));
                recommendations.push("recommend.avoid_major_decisions".to_string());
            }
            (RelationKind::Xing, _) => {
                warnings.push(format!("warning.xing.{}", position.as_key()));
                recommendations.push("recommend.review_documents".to_string());
            }
            (RelationKind::Hai, _) => {
                warnings.push(format!("warning.hai.{}", position.as_key()));
                recommendations.push("recommend.mind_relationships".to_string());
            }
        }

        if severe {
            factor_keys.push(format!("relation.{}.severe", key));
            warnings.push("warning.severe_conflict".to_string());
        }

        RelationshipFinding {
            kind,
            polarity,
            natal_position: position,
            transit_branch: transit,
            natal_branch: natal,
            element,
            severe,
            complete: false,
            factor_keys,
            recommendations,
            warnings,
            title_key: Some(key.to_string()),
        }
    }
}
