//! Ten-Gods & Twelve-Stage Analyzer - Stem relations and life-cycle stages.
//!
//! Both classifications are pure lookups into const tables built at compile time.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{Branch, ElementRole, Pillar, Stem};

/// Relation of a stem to the Day Master (십신).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TenGod {
    /// 比肩, same element and polarity.
    Bigyeon,
    /// 劫財, same element, opposite polarity.
    Geobjae,
    /// 食神
    Siksin,
    /// 傷官
    Sanggwan,
    /// 偏財
    Pyeonjae,
    /// 正財
    Jeongjae,
    /// 偏官 (七殺)
    Pyeongwan,
    /// 正官
    Jeonggwan,
    /// 偏印
    Pyeonin,
    /// 正印
    Jeongin,
}

pub const ALL_TEN_GODS: [TenGod; 10] = [
    TenGod::Bigyeon,
    TenGod::Geobjae,
    TenGod::Siksin,
    TenGod::Sanggwan,
    TenGod::Pyeonjae,
    TenGod::Jeongjae,
    TenGod::Pyeongwan,
    TenGod::Jeonggwan,
    TenGod::Pyeonin,
    TenGod::Jeongin,
];

impl TenGod {
    pub const fn from_role(role: ElementRole, same_polarity: bool) -> Self {
        match (role, same_polarity) {
            (ElementRole::Companion, true) => TenGod::Bigyeon,
            (ElementRole::Companion, false) => TenGod::Geobjae,
            (ElementRole::Output, true) => TenGod::Siksin,
            (ElementRole::Output, false) => TenGod::Sanggwan,
            (ElementRole::Wealth, true) => TenGod::Pyeonjae,
            (ElementRole::Wealth, false) => TenGod::Jeongjae,
            (ElementRole::Officer, true) => TenGod::Pyeongwan,
            (ElementRole::Officer, false) => TenGod::Jeonggwan,
            (ElementRole::Resource, true) => TenGod::Pyeonin,
            (ElementRole::Resource, false) => TenGod::Jeongin,
        }
    }

    /// Element role this ten-god expresses.
    pub const fn role(self) -> ElementRole {
        match self {
            TenGod::Bigyeon | TenGod::Geobjae => ElementRole::Companion,
            TenGod::Siksin | TenGod::Sanggwan => ElementRole::Output,
            TenGod::Pyeonjae | TenGod::Jeongjae => ElementRole::Wealth,
            TenGod::Pyeongwan | TenGod::Jeonggwan => ElementRole::Officer,
            TenGod::Pyeonin | TenGod::Jeongin => ElementRole::Resource,
        }
    }

    pub fn as_key(&self) -> &'static str {
        match self {
            TenGod::Bigyeon => "bigyeon",
            TenGod::Geobjae => "geobjae",
            TenGod::Siksin => "siksin",
            TenGod::Sanggwan => "sanggwan",
            TenGod::Pyeonjae => "pyeonjae",
            TenGod::Jeongjae => "jeongjae",
            TenGod::Pyeongwan => "pyeongwan",
            TenGod::Jeonggwan => "jeonggwan",
            TenGod::Pyeonin => "pyeonin",
            TenGod::Jeongin => "jeongin",
        }
    }

    /// Daily tone of a transiting ten-god, before any event weighting.
    pub fn daily_delta(&self) -> f64 {
        match self {
            TenGod::Jeonggwan | TenGod::Jeongin | TenGod::Jeongjae => 1.5,
            TenGod::Siksin => 1.2,
            TenGod::Pyeonjae => 0.7,
            TenGod::Bigyeon => 0.3,
            TenGod::Pyeonin => -0.6,
            TenGod::Sanggwan => -1.1,
            TenGod::Geobjae => -1.4,
            TenGod::Pyeongwan => -1.7,
        }
    }
}

/// Twelve life-cycle stages (십이운성).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TwelveStage {
    /// 長生
    Jangsaeng,
    /// 沐浴
    Mogyok,
    /// 冠帶
    Gwandae,
    /// 建祿
    Geonrok,
    /// 帝旺
    Jewang,
    /// 衰
    Swe,
    /// 病
    Byeong,
    /// 死
    Sa,
    /// 墓
    Myo,
    /// 絶
    Jeol,
    /// 胎
    Tae,
    /// 養
    Yang,
}

pub const ALL_STAGES: [TwelveStage; 12] = [
    TwelveStage::Jangsaeng,
    TwelveStage::Mogyok,
    TwelveStage::Gwandae,
    TwelveStage::Geonrok,
    TwelveStage::Jewang,
    TwelveStage::Swe,
    TwelveStage::Byeong,
    TwelveStage::Sa,
    TwelveStage::Myo,
    TwelveStage::Jeol,
    TwelveStage::Tae,
    TwelveStage::Yang,
];

impl TwelveStage {
    pub fn as_key(&self) -> &'static str {
        match self {
            TwelveStage::Jangsaeng => "jangsaeng",
            TwelveStage::Mogyok => "mogyok",
            TwelveStage::Gwandae => "gwandae",
            TwelveStage::Geonrok => "geonrok",
            TwelveStage::Jewang => "jewang",
            TwelveStage::Swe => "swe",
            TwelveStage::Byeong => "byeong",
            TwelveStage::Sa => "sa",
            TwelveStage::Myo => "myo",
            TwelveStage::Jeol => "jeol",
            TwelveStage::Tae => "tae",
            TwelveStage::Yang => "yang",
        }
    }

    /// Vitality on a 1-10 scale.
    pub fn energy(&self) -> u8 {
        match self {
            TwelveStage::Jewang => 10,
            TwelveStage::Geonrok => 9,
            TwelveStage::Gwandae => 8,
            TwelveStage::Jangsaeng => 7,
            TwelveStage::Yang => 6,
            TwelveStage::Mogyok => 5,
            TwelveStage::Tae | TwelveStage::Swe => 4,
            TwelveStage::Byeong | TwelveStage::Myo => 3,
            TwelveStage::Sa => 2,
            TwelveStage::Jeol => 1,
        }
    }

    /// Stages where a stem counts as thriving.
    pub fn is_strong(&self) -> bool {
        matches!(
            self,
            TwelveStage::Jangsaeng | TwelveStage::Gwandae | TwelveStage::Geonrok | TwelveStage::Jewang
        )
    }
}

// 甲亥 乙午 丙寅 丁酉 戊寅 己酉 庚巳 辛子 壬申 癸卯
const JANGSAENG: [usize; 10] = [11, 6, 2, 9, 2, 9, 5, 0, 8, 3];

const fn build_ten_gods() -> [[TenGod; 10]; 10] {
    let mut table = [[TenGod::Bigyeon; 10]; 10];
    let mut dm = 0;
    while dm < 10 {
        let mut other = 0;
        while other < 10 {
            let role = Stem::from_index(dm)
                .element()
                .role_of(Stem::from_index(other).element());
            table[dm][other] = TenGod::from_role(role, dm % 2 == other % 2);
            other += 1;
        }
        dm += 1;
    }
    table
}

const fn build_stages() -> [[TwelveStage; 12]; 10] {
    let mut table = [[TwelveStage::Jangsaeng; 12]; 10];
    let mut stem = 0;
    while stem < 10 {
        let start = JANGSAENG[stem];
        let mut branch = 0;
        while branch < 12 {
            // Yang stems walk forward from 長生, yin stems backward.
            let step = if stem % 2 == 0 {
                (branch + 12 - start) % 12
            } else {
                (start + 12 - branch) % 12
            };
            table[stem][branch] = ALL_STAGES[step];
            branch += 1;
        }
        stem += 1;
    }
    table
}

/// Ten-gods indexed `[day_master][other]`.
pub const TEN_GOD_TABLE: [[TenGod; 10]; 10] = build_ten_gods();

/// Twelve stages indexed `[stem][branch]`.
pub const TWELVE_STAGE_TABLE: [[TwelveStage; 12]; 10] = build_stages();

/// Ten-god and stage readings of one transiting pillar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PillarReading {
    /// Ten-god of the transiting stem.
    pub stem_god: TenGod,
    /// Ten-god of the transiting branch's main hidden stem.
    pub branch_god: TenGod,
    /// Stage of the Day Master at the transiting branch.
    pub stage: TwelveStage,
}

/// Table lookups for ten-gods and twelve stages.
pub struct TenGodsAnalyzer;

impl TenGodsAnalyzer {
    pub fn ten_god(day_master: Stem, other: Stem) -> TenGod {
        TEN_GOD_TABLE[day_master.index()][other.index()]
    }

    /// Ten-god of a branch through its main hidden stem.
    pub fn branch_ten_god(day_master: Stem, branch: Branch) -> TenGod {
        Self::ten_god(day_master, branch.main_stem())
    }

    pub fn twelve_stage(stem: Stem, branch: Branch) -> TwelveStage {
        TWELVE_STAGE_TABLE[stem.index()][branch.index()]
    }

    pub fn read(day_master: Stem, transit: Pillar) -> PillarReading {
        PillarReading {
            stem_god: Self::ten_god(day_master, transit.stem()),
            branch_god: Self::branch_ten_god(day_master, transit.branch()),
            stage: Self::twelve_stage(day_master, transit.branch()),
        }
    }
}
