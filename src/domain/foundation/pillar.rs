//! Pillars (stem + branch pairs) and the four-pillar chart.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::{Branch, Stem, ValidationError};

/// A sexagenary stem-branch pair.
///
/// Only the 60 combinations whose stem and branch share polarity exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "PillarRepr", into = "PillarRepr")]
pub struct Pillar {
    stem: Stem,
    branch: Branch,
}

#[derive(Serialize, Deserialize)]
struct PillarRepr {
    stem: Stem,
    branch: Branch,
}

impl TryFrom<PillarRepr> for Pillar {
    type Error = ValidationError;

    fn try_from(repr: PillarRepr) -> Result<Self, Self::Error> {
        Pillar::new(repr.stem, repr.branch)
    }
}

impl From<Pillar> for PillarRepr {
    fn from(p: Pillar) -> Self {
        PillarRepr {
            stem: p.stem,
            branch: p.branch,
        }
    }
}

impl Pillar {
    /// Creates a pillar, rejecting stem/branch pairs of mixed polarity.
    pub fn new(stem: Stem, branch: Branch) -> Result<Self, ValidationError> {
        if stem.polarity() != branch.polarity() {
            return Err(ValidationError::invalid_format(
                "pillar",
                format!("{}{} is not a sexagenary pair", stem, branch),
            ));
        }
        Ok(Self { stem, branch })
    }

    /// Pillar at a position in the 60-term cycle (0 = 甲子), wrapping.
    pub const fn from_cycle_index(index: usize) -> Self {
        Self {
            stem: Stem::from_index(index % 60),
            branch: Branch::from_index(index % 60),
        }
    }

    /// Position in the 60-term cycle (0 = 甲子).
    pub const fn cycle_index(&self) -> usize {
        let s = self.stem.index() as i32;
        let b = self.branch.index() as i32;
        (6 * s - 5 * b).rem_euclid(60) as usize
    }

    /// Pillar `steps` positions later in the cycle (negative walks backward).
    pub const fn offset(&self, steps: i32) -> Self {
        Self::from_cycle_index((self.cycle_index() as i32 + steps).rem_euclid(60) as usize)
    }

    pub const fn stem(&self) -> Stem {
        self.stem
    }

    pub const fn branch(&self) -> Branch {
        self.branch
    }

    /// Hangul spelling (e.g. "갑자").
    pub fn hangul(&self) -> String {
        format!("{}{}", self.stem.hangul(), self.branch.hangul())
    }
}

impl fmt::Display for Pillar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.stem, self.branch)
    }
}

impl FromStr for Pillar {
    type Err = ValidationError;

    /// Parses two-glyph spellings in hanja ("甲子") or hangul ("갑자").
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.trim().chars();
        let (Some(stem), Some(branch), None) = (chars.next(), chars.next(), chars.next()) else {
            return Err(ValidationError::invalid_format(
                "pillar",
                format!("expected two glyphs, got '{}'", s),
            ));
        };
        let stem = Stem::from_symbol(&stem.to_string()).ok_or_else(|| {
            ValidationError::invalid_format("pillar", format!("unknown stem in '{}'", s))
        })?;
        let branch = Branch::from_symbol(&branch.to_string()).ok_or_else(|| {
            ValidationError::invalid_format("pillar", format!("unknown branch in '{}'", s))
        })?;
        Pillar::new(stem, branch)
    }
}

/// Which pillar of a chart a value belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PillarPosition {
    Year,
    Month,
    Day,
    Hour,
}

impl PillarPosition {
    pub fn as_key(&self) -> &'static str {
        match self {
            PillarPosition::Year => "year",
            PillarPosition::Month => "month",
            PillarPosition::Day => "day",
            PillarPosition::Hour => "hour",
        }
    }
}

/// Four-pillar natal chart. The hour pillar is absent when birth time is unknown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Chart {
    pub year: Pillar,
    pub month: Pillar,
    pub day: Pillar,
    pub hour: Option<Pillar>,
}

impl Chart {
    pub fn new(year: Pillar, month: Pillar, day: Pillar, hour: Option<Pillar>) -> Self {
        Self {
            year,
            month,
            day,
            hour,
        }
    }

    /// The Day Master: the stem of the day pillar.
    pub fn day_master(&self) -> Stem {
        self.day.stem()
    }

    /// Present pillars in year, month, day, hour order.
    pub fn pillars(&self) -> Vec<(PillarPosition, Pillar)> {
        let mut pillars = vec![
            (PillarPosition::Year, self.year),
            (PillarPosition::Month, self.month),
            (PillarPosition::Day, self.day),
        ];
        if let Some(hour) = self.hour {
            pillars.push((PillarPosition::Hour, hour));
        }
        pillars
    }

    pub fn pillar(&self, position: PillarPosition) -> Option<Pillar> {
        match position {
            PillarPosition::Year => Some(self.year),
            PillarPosition::Month => Some(self.month),
            PillarPosition::Day => Some(self.day),
            PillarPosition::Hour => self.hour,
        }
    }

    pub fn stems(&self) -> Vec<Stem> {
        self.pillars().into_iter().map(|(_, p)| p.stem()).collect()
    }

    pub fn branches(&self) -> Vec<Branch> {
        self.pillars().into_iter().map(|(_, p)| p.branch()).collect()
    }

    /// Month branch (월령), the seasonal commander of the chart.
    pub fn month_branch(&self) -> Branch {
        self.month.branch()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cycle_index_round_trips() {
        for i in 0..60 {
            assert_eq!(Pillar::from_cycle_index(i).cycle_index(), i);
        }
    }

    #[test]
    fn known_cycle_positions() {
        assert_eq!("甲子".parse::<Pillar>().unwrap().cycle_index(), 0);
        assert_eq!("甲戌".parse::<Pillar>().unwrap().cycle_index(), 10);
        assert_eq!("戊午".parse::<Pillar>().unwrap().cycle_index(), 54);
        assert_eq!("癸亥".parse::<Pillar>().unwrap().cycle_index(), 59);
    }

    #[test]
    fn mixed_polarity_pair_is_rejected() {
        assert!(Pillar::new(Stem::Gap, Branch::Chuk).is_err());
        assert!("甲丑".parse::<Pillar>().is_err());
    }

    #[test]
    fn hangul_spelling_parses() {
        let p = "갑자".parse::<Pillar>().unwrap();
        assert_eq!(p.stem(), Stem::Gap);
        assert_eq!(p.branch(), Branch::Ja);
        assert_eq!(p.hangul(), "갑자");
    }

    #[test]
    fn offset_walks_the_cycle() {
        let p = Pillar::from_cycle_index(59);
        assert_eq!(p.offset(1).cycle_index(), 0);
        assert_eq!(p.offset(-60).cycle_index(), 59);
    }

    #[test]
    fn pillar_serde_rejects_invalid_pair() {
        let json = r#"{"stem":"gap","branch":"chuk"}"#;
        assert!(serde_json::from_str::<Pillar>(json).is_err());
        let ok: Pillar = serde_json::from_str(r#"{"stem":"gap","branch":"ja"}"#).unwrap();
        assert_eq!(ok.cycle_index(), 0);
    }

    #[test]
    fn chart_without_hour_lists_three_pillars() {
        let chart = Chart::new(
            "甲子".parse().unwrap(),
            "丙寅".parse().unwrap(),
            "戊午".parse().unwrap(),
            None,
        );
        assert_eq!(chart.pillars().len(), 3);
        assert_eq!(chart.day_master(), Stem::Mu);
        assert_eq!(chart.month_branch(), Branch::In);
    }
}
