//! Void & Special-Star Analyzer - Gongmang branches and shinsal predicates.

use serde::{Deserialize, Serialize};

use super::BranchRelationAnalyzer;
use crate::domain::foundation::{Branch, Chart, Pillar, PillarPosition, Stem};

/// Void (공망) status of a day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoidReport {
    /// The transiting branch is one of the empty branches.
    pub is_void: bool,
    pub empty_branches: Vec<Branch>,
    /// Area keys touched by voidness: the day itself and any void natal pillar.
    pub affected_areas: Vec<String>,
}

/// Lucky or unlucky tag of a special star.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StarNature {
    Lucky,
    Unlucky,
}

/// Named special stars (신살).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StarKind {
    /// 天乙貴人
    CheoneulGwiin,
    /// 文昌
    Munchang,
    /// 金輿
    Geumyeo,
    /// 驛馬
    Yeokma,
    /// 桃花
    Dohwa,
    /// 華蓋
    Hwagae,
    /// 羊刃
    Yangin,
    /// 魁罡
    Goegang,
    /// 劫殺
    Geobsal,
    /// 災殺
    Jaesal,
    /// 怨嗔
    Wonjin,
}

impl StarKind {
    pub fn as_key(&self) -> &'static str {
        match self {
            StarKind::CheoneulGwiin => "cheoneul_gwiin",
            StarKind::Munchang => "munchang",
            StarKind::Geumyeo => "geumyeo",
            StarKind::Yeokma => "yeokma",
            StarKind::Dohwa => "dohwa",
            StarKind::Hwagae => "hwagae",
            StarKind::Yangin => "yangin",
            StarKind::Goegang => "goegang",
            StarKind::Geobsal => "geobsal",
            StarKind::Jaesal => "jaesal",
            StarKind::Wonjin => "wonjin",
        }
    }
}

/// A special star active on a day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActiveStar {
    pub kind: StarKind,
    pub nature: StarNature,
    pub area: String,
}

impl ActiveStar {
    pub fn factor_key(&self) -> String {
        format!("star.{}", self.kind.as_key())
    }
}

/// Inputs every star predicate sees.
struct StarContext<'a> {
    chart: &'a Chart,
    transit: Pillar,
}

impl StarContext<'_> {
    fn day_master(&self) -> Stem {
        self.chart.day_master()
    }

    fn transit_branch(&self) -> Branch {
        self.transit.branch()
    }

    /// Samhap groups of the natal year and day branches.
    fn frame_groups(&self) -> [usize; 2] {
        [
            BranchRelationAnalyzer::samhap_group(self.chart.year.branch()),
            BranchRelationAnalyzer::samhap_group(self.chart.day.branch()),
        ]
    }

    fn frame_star(&self, table: &[Branch; 4]) -> bool {
        self.frame_groups()
            .iter()
            .any(|g| table[*g] == self.transit_branch())
    }
}

struct StarRule {
    kind: StarKind,
    nature: StarNature,
    area: &'static str,
    applies: fn(&StarContext<'_>) -> bool,
}

// Stem-keyed tables, indexed by Day Master.
const CHEONEUL: [[Branch; 2]; 10] = [
    [Branch::Chuk, Branch::Mi],
    [Branch::Ja, Branch::Sin],
    [Branch::Hae, Branch::Yu],
    [Branch::Hae, Branch::Yu],
    [Branch::Chuk, Branch::Mi],
    [Branch::Ja, Branch::Sin],
    [Branch::Chuk, Branch::Mi],
    [Branch::In, Branch::O],
    [Branch::Sa, Branch::Myo],
    [Branch::Sa, Branch::Myo],
];

const MUNCHANG: [Branch; 10] = [
    Branch::Sa,
    Branch::O,
    Branch::Sin,
    Branch::Yu,
    Branch::Sin,
    Branch::Yu,
    Branch::Hae,
    Branch::Ja,
    Branch::In,
    Branch::Myo,
];

const GEUMYEO: [Branch; 10] = [
    Branch::Jin,
    Branch::Sa,
    Branch::Mi,
    Branch::Sin,
    Branch::Mi,
    Branch::Sin,
    Branch::Sul,
    Branch::Hae,
    Branch::Chuk,
    Branch::In,
];

// Yang Day Masters only.
const YANGIN: [Option<Branch>; 10] = [
    Some(Branch::Myo),
    None,
    Some(Branch::O),
    None,
    Some(Branch::O),
    None,
    Some(Branch::Yu),
    None,
    Some(Branch::Ja),
    None,
];

// Frame-keyed tables, indexed by samhap group (0 申子辰, 1 巳酉丑, 2 寅午戌, 3 亥卯未).
const YEOKMA: [Branch; 4] = [Branch::In, Branch::Hae, Branch::Sin, Branch::Sa];
const DOHWA: [Branch; 4] = [Branch::Yu, Branch::O, Branch::Myo, Branch::Ja];
const HWAGAE: [Branch; 4] = [Branch::Jin, Branch::Chuk, Branch::Sul, Branch::Mi];
const GEOBSAL: [Branch; 4] = [Branch::Sa, Branch::In, Branch::Hae, Branch::Sin];
const JAESAL: [Branch; 4] = [Branch::O, Branch::Myo, Branch::Ja, Branch::Yu];

const GOEGANG: [(Stem, Branch); 4] = [
    (Stem::Gyeong, Branch::Jin),
    (Stem::Gyeong, Branch::Sul),
    (Stem::Im, Branch::Jin),
    (Stem::Mu, Branch::Sul),
];

const WONJIN: [(Branch, Branch); 6] = [
    (Branch::Ja, Branch::Mi),
    (Branch::Chuk, Branch::O),
    (Branch::In, Branch::Yu),
    (Branch::Myo, Branch::Sin),
    (Branch::Jin, Branch::Hae),
    (Branch::Sa, Branch::Sul),
];

const STAR_RULES: [StarRule; 11] = [
    StarRule {
        kind: StarKind::CheoneulGwiin,
        nature: StarNature::Lucky,
        area: "area.helpers",
        applies: |ctx| CHEONEUL[ctx.day_master().index()].contains(&ctx.transit_branch()),
    },
    StarRule {
        kind: StarKind::Munchang,
        nature: StarNature::Lucky,
        area: "area.study",
        applies: |ctx| MUNCHANG[ctx.day_master().index()] == ctx.transit_branch(),
    },
    StarRule {
        kind: StarKind::Geumyeo,
        nature: StarNature::Lucky,
        area: "area.partnership",
        applies: |ctx| GEUMYEO[ctx.day_master().index()] == ctx.transit_branch(),
    },
    StarRule {
        kind: StarKind::Yeokma,
        nature: StarNature::Lucky,
        area: "area.travel",
        applies: |ctx| ctx.frame_star(&YEOKMA),
    },
    StarRule {
        kind: StarKind::Dohwa,
        nature: StarNature::Lucky,
        area: "area.romance",
        applies: |ctx| ctx.frame_star(&DOHWA),
    },
    StarRule {
        kind: StarKind::Hwagae,
        nature: StarNature::Lucky,
        area: "area.spirituality",
        applies: |ctx| ctx.frame_star(&HWAGAE),
    },
    StarRule {
        kind: StarKind::Yangin,
        nature: StarNature::Unlucky,
        area: "area.health",
        applies: |ctx| YANGIN[ctx.day_master().index()] == Some(ctx.transit_branch()),
    },
    StarRule {
        kind: StarKind::Goegang,
        nature: StarNature::Unlucky,
        area: "area.temper",
        applies: |ctx| {
            GOEGANG
                .iter()
                .any(|(s, b)| *s == ctx.transit.stem() && *b == ctx.transit.branch())
        },
    },
    StarRule {
        kind: StarKind::Geobsal,
        nature: StarNature::Unlucky,
        area: "area.wealth",
        applies: |ctx| ctx.frame_star(&GEOBSAL),
    },
    StarRule {
        kind: StarKind::Jaesal,
        nature: StarNature::Unlucky,
        area: "area.safety",
        applies: |ctx| ctx.frame_star(&JAESAL),
    },
    StarRule {
        kind: StarKind::Wonjin,
        nature: StarNature::Unlucky,
        area: "area.relationship",
        applies: |ctx| {
            let (a, b) = (ctx.transit_branch(), ctx.chart.day.branch());
            WONJIN
                .iter()
                .any(|(x, y)| (*x == a && *y == b) || (*x == b && *y == a))
        },
    },
];

/// Life area a natal pillar speaks for.
fn position_area(position: PillarPosition) -> &'static str {
    match position {
        PillarPosition::Year => "area.family",
        PillarPosition::Month => "area.career",
        PillarPosition::Day => "area.spouse",
        PillarPosition::Hour => "area.children",
    }
}

/// Analyzer for void branches and special stars.
pub struct VoidStarAnalyzer;

impl VoidStarAnalyzer {
    /// The two branches left over by a pillar's ten-day decade (旬).
    pub fn empty_branches(day: Pillar) -> [Branch; 2] {
        let index = day.cycle_index();
        let decade_start = Pillar::from_cycle_index(index - index % 10);
        let first = decade_start.branch().offset(10);
        [first, first.offset(1)]
    }

    /// Void status of a transiting branch against a chart's day pillar.
    pub fn void_report(chart: &Chart, transit: Option<Branch>) -> VoidReport {
        let empty = Self::empty_branches(chart.day);
        let is_void = transit.map_or(false, |b| empty.contains(&b));

        let mut affected_areas = Vec::new();
        if is_void {
            affected_areas.push("area.today".to_string());
        }
        for (position, pillar) in chart.pillars() {
            if position != PillarPosition::Day && empty.contains(&pillar.branch()) {
                affected_areas.push(position_area(position).to_string());
            }
        }

        VoidReport {
            is_void,
            empty_branches: empty.to_vec(),
            affected_areas,
        }
    }

    /// Every special star the transiting pillar activates against a chart.
    pub fn active_stars(chart: &Chart, transit: Pillar) -> Vec<ActiveStar> {
        let ctx = StarContext { chart, transit };
        STAR_RULES
            .iter()
            .filter(|rule| (rule.applies)(&ctx))
            .map(|rule| ActiveStar {
                kind: rule.kind,
                nature: rule.nature,
                area: rule.area.to_string(),
            })
            .collect()
    }

    /// Cheoneul Gwiin branches of a Day Master.
    pub fn cheoneul_branches(day_master: Stem) -> [Branch; 2] {
        CHEONEUL[day_master.index()]
    }
}
