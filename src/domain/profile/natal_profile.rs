//! Natal profile: the chart, Day Master and major fortune cycles of one person.

use chrono::{Datelike, NaiveTime};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use std::str::FromStr;

use super::RawNatalProfile;
use crate::domain::foundation::{
    ensure_supported_year, Branch, Chart, Pillar, Polarity, Stem, ValidationError,
};
use crate::domain::pillars::{solar, BirthMoment, FourPillarsCalculator};

/// Number of Daeun cycles derived from a birth moment.
pub const DAEUN_CYCLE_COUNT: i32 = 8;

/// Years covered by one Daeun cycle.
pub const DAEUN_CYCLE_YEARS: u32 = 10;

// ════════════════════════════════════════════════════════════════════════════════
// Gender
// ════════════════════════════════════════════════════════════════════════════════

/// Gender, used for Daeun direction and the spouse star.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub fn as_key(&self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_key())
    }
}

impl FromStr for Gender {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "male" | "m" | "남" | "남자" | "男" => Ok(Gender::Male),
            "female" | "f" | "여" | "여자" | "女" => Ok(Gender::Female),
            other => Err(ValidationError::invalid_format(
                "gender",
                format!("unknown gender '{}'", other),
            )),
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// DaeunCycle
// ════════════════════════════════════════════════════════════════════════════════

/// One ten-year major fortune cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DaeunCycle {
    /// Age (years since birth) at which the cycle begins.
    pub age_start: u32,
    #[serde(flatten)]
    pub pillar: Pillar,
}

impl DaeunCycle {
    pub fn new(age_start: u32, pillar: Pillar) -> Self {
        Self { age_start, pillar }
    }

    pub fn stem(&self) -> Stem {
        self.pillar.stem()
    }

    pub fn branch(&self) -> Branch {
        self.pillar.branch()
    }

    /// Calendar year in which the cycle begins.
    pub fn start_year(&self, birth_year: i32) -> i32 {
        birth_year + self.age_start as i32
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// BirthData
// ════════════════════════════════════════════════════════════════════════════════

/// Raw birth information a profile is built from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BirthData {
    pub moment: BirthMoment,
    pub gender: Option<Gender>,
}

// ════════════════════════════════════════════════════════════════════════════════
// NatalProfile
// ════════════════════════════════════════════════════════════════════════════════

/// A validated natal profile. Read-only to every analyzer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawNatalProfile", into = "RawNatalProfile")]
pub struct NatalProfile {
    chart: Chart,
    day_master: Stem,
    gender: Option<Gender>,
    birth_year: i32,
    daeun_cycles: Vec<DaeunCycle>,
}

impl NatalProfile {
    /// Creates a profile from an already computed chart.
    ///
    /// Cycles must start at strictly increasing ages.
    pub fn new(
        chart: Chart,
        gender: Option<Gender>,
        birth_year: i32,
        daeun_cycles: Vec<DaeunCycle>,
    ) -> Result<Self, ValidationError> {
        ensure_supported_year("birthYear", birth_year)?;

        // The saju year of a birth is its calendar year or, before 立春, the one before.
        let year_index = chart.year.cycle_index() as i32;
        let expected = (birth_year - 4).rem_euclid(60);
        let previous = (birth_year - 5).rem_euclid(60);
        if year_index != expected && year_index != previous {
            return Err(ValidationError::inconsistent(
                "chart.year",
                format!("{} is not a year pillar of {}", chart.year, birth_year),
            ));
        }

        if daeun_cycles
            .windows(2)
            .any(|w| w[0].age_start >= w[1].age_start)
        {
            return Err(ValidationError::inconsistent(
                "daeunCycles",
                "cycles must start at strictly increasing ages",
            ));
        }

        Ok(Self {
            day_master: chart.day_master(),
            chart,
            gender,
            birth_year,
            daeun_cycles,
        })
    }

    /// Computes the chart and Daeun cycles from birth data.
    ///
    /// Cycles run forward from the month pillar for yang-year males and yin-year
    /// females, backward otherwise. Without a gender no cycles are derived.
    pub fn from_birth(
        birth: &BirthData,
        calculator: &FourPillarsCalculator,
    ) -> Result<Self, ValidationError> {
        let chart = calculator.natal(&birth.moment)?;
        let daeun_cycles = match birth.gender {
            Some(gender) => derive_daeun(&chart, gender, &birth.moment, calculator),
            None => Vec::new(),
        };
        Self::new(chart, birth.gender, birth.moment.date.year(), daeun_cycles)
    }

    pub fn chart(&self) -> &Chart {
        &self.chart
    }

    pub fn day_master(&self) -> Stem {
        self.day_master
    }

    pub fn gender(&self) -> Option<Gender> {
        self.gender
    }

    pub fn birth_year(&self) -> i32 {
        self.birth_year
    }

    pub fn daeun_cycles(&self) -> &[DaeunCycle] {
        &self.daeun_cycles
    }

    /// Age in a calendar year.
    pub fn age_in(&self, year: i32) -> i32 {
        year - self.birth_year
    }

    /// Daeun cycle active in a calendar year, if any.
    pub fn active_daeun(&self, year: i32) -> Option<&DaeunCycle> {
        let age = self.age_in(year);
        self.daeun_cycles
            .iter()
            .take_while(|cycle| cycle.age_start as i32 <= age)
            .last()
    }

    /// SHA-256 of the canonical profile encoding, hex encoded.
    ///
    /// Equal profiles always share a fingerprint, which keys cached results.
    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.canonical_encoding().as_bytes());
        format!("{:x}", hasher.finalize())
    }

    fn canonical_encoding(&self) -> String {
        let hour = self
            .chart
            .hour
            .map(|p| p.to_string())
            .unwrap_or_else(|| "-".to_string());
        let gender = self.gender.map(|g| g.as_key()).unwrap_or("-");
        let cycles = self
            .daeun_cycles
            .iter()
            .map(|c| format!("{}:{}", c.age_start, c.pillar))
            .collect::<Vec<_>>()
            .join(",");
        format!(
            "v1|{}|{}|{}|{}|{}|{}|{}|{}",
            self.chart.year,
            self.chart.month,
            self.chart.day,
            hour,
            self.day_master,
            gender,
            self.birth_year,
            cycles
        )
    }
}

fn derive_daeun(
    chart: &Chart,
    gender: Gender,
    moment: &BirthMoment,
    calculator: &FourPillarsCalculator,
) -> Vec<DaeunCycle> {
    let yang_year = chart.year.stem().polarity() == Polarity::Yang;
    let forward = yang_year == (gender == Gender::Male);

    let time = moment
        .time
        .unwrap_or_else(|| NaiveTime::from_hms_opt(12, 0, 0).unwrap_or(NaiveTime::MIN));
    let utc = calculator.to_utc(moment.date.and_time(time));
    let span = if forward {
        solar::next_month_boundary(utc) - utc
    } else {
        utc - solar::previous_month_boundary(utc)
    };

    // Three days of distance to the solar term count as one year of age.
    let days = span.num_minutes() as f64 / 1_440.0;
    let start_age = ((days / 3.0).round() as u32).max(1);
    let step = if forward { 1 } else { -1 };

    (1..=DAEUN_CYCLE_COUNT)
        .map(|i| {
            DaeunCycle::new(
                start_age + DAEUN_CYCLE_YEARS * (i as u32 - 1),
                chart.month.offset(step * i),
            )
        })
        .collect()
}
