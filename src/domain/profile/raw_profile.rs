//! String-typed profile input, normalized from hanja or hangul at the boundary.

use serde::{Deserialize, Serialize};

use super::{DaeunCycle, Gender, NatalProfile};
use crate::domain::foundation::{Chart, Pillar, Stem, ValidationError};

/// One Daeun cycle as supplied by callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawDaeunCycle {
    pub age_start: u32,
    /// Two-glyph pillar, e.g. "丁卯" or "정묘".
    pub pillar: String,
}

/// Natal profile as received from outside the engine.
///
/// Every pillar is a two-glyph string in either script. `try_into` validates
/// it into a [`NatalProfile`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawNatalProfile {
    pub year: Option<String>,
    pub month: Option<String>,
    pub day: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hour: Option<String>,
    pub day_master: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    pub birth_year: Option<i32>,
    #[serde(default)]
    pub daeun_cycles: Vec<RawDaeunCycle>,
}

fn required_pillar(field: &str, value: &Option<String>) -> Result<Pillar, ValidationError> {
    let raw = value
        .as_deref()
        .filter(|s| !s.trim().is_empty())
        .ok_or_else(|| ValidationError::missing_field(field))?;
    raw.parse::<Pillar>()
        .map_err(|e| ValidationError::invalid_format(field, e.to_string()))
}

impl TryFrom<RawNatalProfile> for NatalProfile {
    type Error = ValidationError;

    fn try_from(raw: RawNatalProfile) -> Result<Self, Self::Error> {
        let year = required_pillar("chart.year", &raw.year)?;
        let month = required_pillar("chart.month", &raw.month)?;
        let day = required_pillar("chart.day", &raw.day)?;
        let hour = match raw.hour.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(s) => Some(
                s.parse::<Pillar>()
                    .map_err(|e| ValidationError::invalid_format("chart.hour", e.to_string()))?,
            ),
        };

        let day_master: Stem = raw
            .day_master
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .ok_or_else(|| ValidationError::missing_field("dayMaster"))?
            .parse()
            .map_err(|e: ValidationError| ValidationError::invalid_format("dayMaster", e.to_string()))?;
        if day_master != day.stem() {
            return Err(ValidationError::inconsistent(
                "dayMaster",
                format!("{} does not match day pillar {}", day_master, day),
            ));
        }

        let gender = raw.gender.as_deref().map(str::parse::<Gender>).transpose()?;
        let birth_year = raw
            .birth_year
            .ok_or_else(|| ValidationError::missing_field("birthYear"))?;

        let daeun_cycles = raw
            .daeun_cycles
            .iter()
            .enumerate()
            .map(|(i, cycle)| {
                cycle
                    .pillar
                    .parse::<Pillar>()
                    .map(|pillar| DaeunCycle::new(cycle.age_start, pillar))
                    .map_err(|e| {
                        ValidationError::invalid_format(format!("daeunCycles[{}]", i), e.to_string())
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        NatalProfile::new(
            Chart::new(year, month, day, hour),
            gender,
            birth_year,
            daeun_cycles,
        )
    }
}

impl From<NatalProfile> for RawNatalProfile {
    fn from(profile: NatalProfile) -> Self {
        let chart = profile.chart();
        Self {
            year: Some(chart.year.to_string()),
            month: Some(chart.month.to_string()),
            day: Some(chart.day.to_string()),
            hour: chart.hour.map(|p| p.to_string()),
            day_master: Some(profile.day_master().to_string()),
            gender: profile.gender().map(|g| g.as_key().to_string()),
            birth_year: Some(profile.birth_year()),
            daeun_cycles: profile
                .daeun_cycles()
                .iter()
                .map(|c| RawDaeunCycle {
                    age_start: c.age_start,
                    pillar: c.pillar.to_string(),
                })
                .collect(),
        }
    }
}
