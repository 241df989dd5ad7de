//! The ten heavenly stems.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::{Element, Polarity, ValidationError};

/// Heavenly stem (천간).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stem {
    /// 甲
    Gap,
    /// 乙
    Eul,
    /// 丙
    Byeong,
    /// 丁
    Jeong,
    /// 戊
    Mu,
    /// 己
    Gi,
    /// 庚
    Gyeong,
    /// 辛
    Sin,
    /// 壬
    Im,
    /// 癸
    Gye,
}

/// All stems in cycle order (index 0 = 甲).
pub const ALL_STEMS: [Stem; 10] = [
    Stem::Gap,
    Stem::Eul,
    Stem::Byeong,
    Stem::Jeong,
    Stem::Mu,
    Stem::Gi,
    Stem::Gyeong,
    Stem::Sin,
    Stem::Im,
    Stem::Gye,
];

const HANJA: [&str; 10] = ["甲", "乙", "丙", "丁", "戊", "己", "庚", "辛", "壬", "癸"];
const HANGUL: [&str; 10] = ["갑", "을", "병", "정", "무", "기", "경", "신", "임", "계"];

impl Stem {
    /// Zero-based cycle index.
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Stem at a cycle index, wrapping modulo 10.
    pub const fn from_index(index: usize) -> Self {
        ALL_STEMS[index % 10]
    }

    pub const fn element(self) -> Element {
        Element::from_index(self.index() / 2)
    }

    pub const fn polarity(self) -> Polarity {
        Polarity::from_index(self.index())
    }

    /// Stem `steps` positions later in the cycle (negative walks backward).
    pub const fn offset(self, steps: i32) -> Self {
        Self::from_index((self.index() as i32 + steps).rem_euclid(10) as usize)
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
            return Some(ALL_STEMS[i]);
        }
        if let Some(i) = HANGUL.iter().position(|h| *h == s) {
            return Some(ALL_STEMS[i]);
        }
        ALL_STEMS
            .iter()
            .copied()
            .find(|stem| stem.romanized().eq_ignore_ascii_case(s))
    }

    pub fn romanized(&self) -> &'static str {
        match self {
            Stem::Gap => "gap",
            Stem::Eul => "eul",
            Stem::Byeong => "byeong",
            Stem::Jeong => "jeong",
            Stem::Mu => "mu",
            Stem::Gi => "gi",
            Stem::Gyeong => "gyeong",
            Stem::Sin => "sin",
            Stem::Im => "im",
            Stem::Gye => "gye",
        }
    }
}

impl fmt::Display for Stem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.hanja())
    }
}

impl FromStr for Stem {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Stem::from_symbol(s)
            .ok_or_else(|| ValidationError::invalid_format("stem", format!("unknown stem '{}'", s)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn elements_pair_up_by_index() {
        assert_eq!(Stem::Gap.element(), Element::Wood);
        assert_eq!(Stem::Eul.element(), Element::Wood);
        assert_eq!(Stem::Byeong.element(), Element::Fire);
        assert_eq!(Stem::Gi.element(), Element::Earth);
        assert_eq!(Stem::Sin.element(), Element::Metal);
        assert_eq!(Stem::Gye.element(), Element::Water);
    }

    #[test]
    fn polarity_alternates() {
        assert_eq!(Stem::Gap.polarity(), Polarity::Yang);
        assert_eq!(Stem::Eul.polarity(), Polarity::Yin);
        assert_eq!(Stem::Im.polarity(), Polarity::Yang);
    }

    #[test]
    fn hanja_and_hangul_parse_to_same_stem() {
        assert_eq!("甲".parse::<Stem>().unwrap(), Stem::Gap);
        assert_eq!("갑".parse::<Stem>().unwrap(), Stem::Gap);
        assert_eq!("辛".parse::<Stem>().unwrap(), Stem::Sin);
        assert_eq!("신".parse::<Stem>().unwrap(), Stem::Sin);
        assert_eq!("Gye".parse::<Stem>().unwrap(), Stem::Gye);
    }

    #[test]
    fn unknown_symbol_is_invalid_format() {
        let err = "X".parse::<Stem>().unwrap_err();
        assert_eq!(err.field(), "stem");
    }

    #[test]
    fn offset_wraps_both_ways() {
        assert_eq!(Stem::Gye.offset(1), Stem::Gap);
        assert_eq!(Stem::Gap.offset(-1), Stem::Gye);
        assert_eq!(Stem::Mu.offset(12), Stem::Gyeong);
    }
}
