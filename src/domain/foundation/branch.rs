//! The twelve earthly branches and their hidden stems.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::{Element, Polarity, Stem, ValidationError};

/// Earthly branch (지지).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Branch {
    /// 子
    Ja,
    /// 丑
    Chuk,
    /// 寅
    In,
    /// 卯
    Myo,
    /// 辰
    Jin,
    /// 巳
    Sa,
    /// 午
    O,
    /// 未
    Mi,
    /// 申
    Sin,
    /// 酉
    Yu,
    /// 戌
    Sul,
    /// 亥
    Hae,
}

/// All branches in cycle order (index 0 = 子).
pub const ALL_BRANCHES: [Branch; 12] = [
    Branch::Ja,
    Branch::Chuk,
    Branch::In,
    Branch::Myo,
    Branch::Jin,
    Branch::Sa,
    Branch::O,
    Branch::Mi,
    Branch::Sin,
    Branch::Yu,
    Branch::Sul,
    Branch::Hae,
];

const HANJA: [&str; 12] = [
    "子", "丑", "寅", "卯", "辰", "巳", "午", "未", "申", "酉", "戌", "亥",
];
const HANGUL: [&str; 12] = [
    "자", "축", "인", "묘", "진", "사", "오", "미", "신", "유", "술", "해",
];

const ELEMENTS: [Element; 12] = [
    Element::Water,
    Element::Earth,
    Element::Wood,
    Element::Wood,
    Element::Earth,
    Element::Fire,
    Element::Fire,
    Element::Earth,
    Element::Metal,
    Element::Metal,
    Element::Earth,
    Element::Water,
];

// Main qi first, then middle and residual qi.
const HIDDEN_STEMS: [&[Stem]; 12] = [
    &[Stem::Gye],
    &[Stem::Gi, Stem::Gye, Stem::Sin],
    &[Stem::Gap, Stem::Byeong, Stem::Mu],
    &[Stem::Eul],
    &[Stem::Mu, Stem::Eul, Stem::Gye],
    &[Stem::Byeong, Stem::Mu, Stem::Gyeong],
    &[Stem::Jeong, Stem::Gi],
    &[Stem::Gi, Stem::Jeong, Stem::Eul],
    &[Stem::Gyeong, Stem::Im, Stem::Mu],
    &[Stem::Sin],
    &[Stem::Mu, Stem::Sin, Stem::Jeong],
    &[Stem::Im, Stem::Gap],
];

impl Branch {
    /// Zero-based cycle index.
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Branch at a cycle index, wrapping modulo 12.
    pub const fn from_index(index: usize) -> Self {
        ALL_BRANCHES[index % 12]
    }

    pub const fn element(self) -> Element {
        ELEMENTS[self.index()]
    }

    pub const fn polarity(self) -> Polarity {
        Polarity::from_index(self.index())
    }

    /// Branch `steps` positions later in the cycle (negative walks backward).
    pub const fn offset(self, steps: i32) -> Self {
        Self::from_index((self.index() as i32 + steps).rem_euclid(12) as usize)
    }

    /// Hidden stems, main qi first.
    pub fn hidden_stems(&self) -> &'static [Stem] {
        HIDDEN_STEMS[self.index()]
    }

    /// Main qi stem (정기).
    pub fn main_stem(&self) -> Stem {
        HIDDEN_STEMS[self.index()][0]
    }

    /// Starting clock hour of this branch's double-hour (子 = 23).
    pub const fn start_hour(self) -> u8 {
        ((self.index() * 2 + 23) % 24) as u8
    }

    pub fn hanja(&self) -> &'static str {
        HANJA[self.index()]
    }

    pub fn hangul(&self) -> &'static str {
        HANGUL[self.index()]
    }

    /// Parses a single hanja, hangul, or romanized spelling.
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        let s = symbol.trim();
        if let Some(i) = HANJA.iter().position(|h| *h == s) {
            return Some(ALL_BRANCHES[i]);
        }
        if let Some(i) = HANGUL.iter().position(|h| *h == s) {
            return Some(ALL_BRANCHES[i]);
        }
        ALL_BRANCHES
            .iter()
            .copied()
            .find(|branch| branch.romanized().eq_ignore_ascii_case(s))
    }

    pub fn romanized(&self) -> &'static str {
        match self {
            Branch::Ja => "ja",
            Branch::Chuk => "chuk",
            Branch::In => "in",
            Branch::Myo => "myo",
            Branch::Jin => "jin",
            Branch::Sa => "sa",
            Branch::O => "o",
            Branch::Mi => "mi",
            Branch::Sin => "sin",
            Branch::Yu => "yu",
            Branch::Sul => "sul",
            Branch::Hae => "hae",
        }
    }
}

impl fmt::Display for Branch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.hanja())
    }
}

impl FromStr for Branch {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Branch::from_symbol(s).ok_or_else(|| {
            ValidationError::invalid_format("branch", format!("unknown branch '{}'", s))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn branch_elements_follow_seasons() {
        assert_eq!(Branch::Ja.element(), Element::Water);
        assert_eq!(Branch::In.element(), Element::Wood);
        assert_eq!(Branch::O.element(), Element::Fire);
        assert_eq!(Branch::Yu.element(), Element::Metal);
        for earth in [Branch::Chuk, Branch::Jin, Branch::Mi, Branch::Sul] {
            assert_eq!(earth.element(), Element::Earth);
        }
    }

    #[test]
    fn main_hidden_stem_shares_branch_element() {
        for branch in ALL_BRANCHES {
            assert_eq!(branch.main_stem().element(), branch.element());
        }
    }

    #[test]
    fn start_hours_cover_the_day() {
        assert_eq!(Branch::Ja.start_hour(), 23);
        assert_eq!(Branch::Chuk.start_hour(), 1);
        assert_eq!(Branch::O.start_hour(), 11);
        assert_eq!(Branch::Hae.start_hour(), 21);
    }

    #[test]
    fn mixed_script_parsing() {
        assert_eq!("子".parse::<Branch>().unwrap(), Branch::Ja);
        assert_eq!("자".parse::<Branch>().unwrap(), Branch::Ja);
        assert_eq!("申".parse::<Branch>().unwrap(), Branch::Sin);
        assert_eq!("신".parse::<Branch>().unwrap(), Branch::Sin);
        assert!("?".parse::<Branch>().is_err());
    }

    #[test]
    fn offset_wraps() {
        assert_eq!(Branch::Hae.offset(1), Branch::Ja);
        assert_eq!(Branch::Ja.offset(-2), Branch::Sul);
    }
}
