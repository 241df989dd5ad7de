//! Astro snapshot supplied by a provider for one date.

use serde::{Deserialize, Serialize};

use super::{MoonPhase, Planet, ZodiacSign};

/// A planet's placement on a day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanetPosition {
    pub planet: Planet,
    pub sign: ZodiacSign,
    /// 1..=12 when the provider knows the houses.
    #[serde(default)]
    pub house: Option<u8>,
    #[serde(default)]
    pub retrograde: bool,
}

impl PlanetPosition {
    pub fn new(planet: Planet, sign: ZodiacSign) -> Self {
        Self {
            planet,
            sign,
            house: None,
            retrograde: false,
        }
    }

    pub fn in_house(mut self, house: u8) -> Self {
        self.house = Some(house);
        self
    }

    pub fn retrograde(mut self) -> Self {
        self.retrograde = true;
        self
    }
}

/// Planet positions and lunar phase for one date.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AstroSnapshot {
    #[serde(default)]
    pub planet_positions: Vec<PlanetPosition>,
    #[serde(default)]
    pub moon_phase: Option<MoonPhase>,
}

impl AstroSnapshot {
    pub fn new(planet_positions: Vec<PlanetPosition>, moon_phase: Option<MoonPhase>) -> Self {
        Self {
            planet_positions,
            moon_phase,
        }
    }

    /// First listed position of a planet.
    pub fn position(&self, planet: Planet) -> Option<&PlanetPosition> {
        self.planet_positions.iter().find(|p| p.planet == planet)
    }

    pub fn is_retrograde(&self, planet: Planet) -> bool {
        self.position(planet).map_or(false, |p| p.retrograde)
    }

    pub fn is_empty(&self) -> bool {
        self.planet_positions.is_empty() && self.moon_phase.is_none()
    }
}
