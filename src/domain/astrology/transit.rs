//! Astrology Transit Analyzer - Scores a supplied snapshot for a day or an event.
//!
//! Never computes ephemeris itself; snapshots come from a provider port.

use serde::{Deserialize, Serialize};

use super::{AstroSnapshot, MoonPhase, Planet, ZodiacSign};

/// Bonus for a key planet in a favorable sign.
pub const SIGN_BONUS: f64 = 4.0;

/// Bonus for a key planet in a favorable house.
pub const HOUSE_BONUS: f64 = 3.0;

/// Penalty for a retrograde planet the event avoids.
pub const RETROGRADE_PENALTY: f64 = -5.0;

/// Bound on an event astro score.
pub const EVENT_SCORE_LIMIT: f64 = 15.0;

/// Bound on a general daily astro score.
pub const DAILY_SCORE_LIMIT: f64 = 10.0;

/// Static astro preferences of an event type.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EventAstroProfile {
    pub favorable_signs: &'static [ZodiacSign],
    pub key_planets: &'static [Planet],
    pub favorable_houses: &'static [u8],
    pub avoid_retrogrades: &'static [Planet],
    pub moon_phase_bonus: &'static [(MoonPhase, f64)],
}

impl EventAstroProfile {
    pub fn moon_bonus(&self, phase: MoonPhase) -> f64 {
        self.moon_phase_bonus
            .iter()
            .find(|(p, _)| *p == phase)
            .map_or(0.0, |(_, bonus)| *bonus)
    }
}

/// A clamped astro score with its factor keys.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AstroScore {
    pub score: f64,
    pub positive_factors: Vec<String>,
    pub negative_factors: Vec<String>,
}

impl AstroScore {
    fn push(&mut self, delta: f64, key: String) {
        self.score += delta;
        if delta > 0.0 {
            self.positive_factors.push(key);
        } else if delta < 0.0 {
            self.negative_factors.push(key);
        }
    }

    fn clamped(mut self, limit: f64) -> Self {
        self.score = self.score.clamp(-limit, limit);
        self
    }
}

/// Snapshot scorer.
pub struct AstroTransitAnalyzer;

impl AstroTransitAnalyzer {
    /// Scores a snapshot against an event's astro table; clamped to ±15.
    pub fn score_event(profile: &EventAstroProfile, snapshot: &AstroSnapshot) -> AstroScore {
        let mut score = AstroScore::default();

        for position in &snapshot.planet_positions {
            if !profile.key_planets.contains(&position.planet) {
                continue;
            }
            let planet = position.planet.as_key();
            if profile.favorable_signs.contains(&position.sign) {
                score.push(
                    SIGN_BONUS,
                    format!("astro.{}.in_{}", planet, position.sign.as_key()),
                );
            }
            if let Some(house) = position.house {
                if profile.favorable_houses.contains(&house) {
                    score.push(HOUSE_BONUS, format!("astro.{}.house_{}", planet, house));
                }
            }
        }

        for planet in profile.avoid_retrogrades {
            if snapshot.is_retrograde(*planet) {
                score.push(
                    RETROGRADE_PENALTY,
                    format!("astro.{}.retrograde", planet.as_key()),
                );
            }
        }

        if let Some(phase) = snapshot.moon_phase {
            score.push(profile.moon_bonus(phase), format!("astro.moon.{}", phase.as_key()));
        }

        score.clamped(EVENT_SCORE_LIMIT)
    }

    /// General daily score: dignities, retrogrades and lunar phase; clamped to ±10.
    pub fn score_daily(snapshot: &AstroSnapshot) -> AstroScore {
        let mut score = AstroScore::default();

        for position in &snapshot.planet_positions {
            let planet = position.planet;
            let weight = if planet.is_outer() { 0.5 } else { 1.0 };
            let dignity = planet.dignity(position.sign);
            score.push(
                dignity.daily_delta() * weight,
                format!("astro.{}.{}", planet.as_key(), dignity.as_key()),
            );

            if position.retrograde {
                let penalty = if planet.is_personal() {
                    -1.5
                } else if planet.is_outer() {
                    0.0
                } else {
                    -0.5
                };
                score.push(penalty, format!("astro.{}.retrograde", planet.as_key()));
            }
        }

        if let Some(phase) = snapshot.moon_phase {
            score.push(phase.daily_delta(), format!("astro.moon.{}", phase.as_key()));
        }

        score.clamped(DAILY_SCORE_LIMIT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::astrology::PlanetPosition;

    const ROMANCE: EventAstroProfile = EventAstroProfile {
        favorable_signs: &[ZodiacSign::Taurus, ZodiacSign::Libra],
        key_planets: &[Planet::Venus, Planet::Moon],
        favorable_houses: &[5, 7],
        avoid_retrogrades: &[Planet::Venus, Planet::Mercury],
        moon_phase_bonus: &[(MoonPhase::WaxingGibbous, 2.0), (MoonPhase::WaningCrescent, -2.0)],
    };

    #[test]
    fn key_planet_in_sign_and_house() {
        let snapshot = AstroSnapshot::new(
            vec![PlanetPosition::new(Planet::Venus, ZodiacSign::Libra).in_house(7)],
            Some(MoonPhase::WaxingGibbous),
        );
        let score = AstroTransitAnalyzer::score_event(&ROMANCE, &snapshot);
        assert_eq!(score.score, 4.0 + 3.0 + 2.0);
        assert!(score.positive_factors.contains(&"astro.venus.in_libra".to_string()));
        assert!(score.positive_factors.contains(&"astro.venus.house_7".to_string()));
        assert!(score.positive_factors.contains(&"astro.moon.waxing_gibbous".to_string()));
    }

    #[test]
    fn avoided_retrograde_penalizes() {
        let snapshot = AstroSnapshot::new(
            vec![
                PlanetPosition::new(Planet::Venus, ZodiacSign::Aries).retrograde(),
                PlanetPosition::new(Planet::Mercury, ZodiacSign::Aries).retrograde(),
            ],
            Some(MoonPhase::WaningCrescent),
        );
        let score = AstroTransitAnalyzer::score_event(&ROMANCE, &snapshot);
        assert_eq!(score.score, -12.0);
        assert_eq!(score.negative_factors.len(), 3);
    }

    #[test]
    fn event_score_is_clamped() {
        let positions = vec![
            PlanetPosition::new(Planet::Venus, ZodiacSign::Libra).in_house(7),
            PlanetPosition::new(Planet::Moon, ZodiacSign::Taurus).in_house(5),
            PlanetPosition::new(Planet::Venus, ZodiacSign::Taurus).in_house(5),
        ];
        let snapshot = AstroSnapshot::new(positions, Some(MoonPhase::WaxingGibbous));
        let score = AstroTransitAnalyzer::score_event(&ROMANCE, &snapshot);
        assert_eq!(score.score, EVENT_SCORE_LIMIT);
    }

    #[test]
    fn empty_snapshot_scores_zero() {
        let empty = AstroSnapshot::default();
        assert_eq!(AstroTransitAnalyzer::score_event(&ROMANCE, &empty).score, 0.0);
        assert_eq!(AstroTransitAnalyzer::score_daily(&empty).score, 0.0);
    }

    #[test]
    fn daily_dignity_and_retrograde() {
        let snapshot = AstroSnapshot::new(
            vec![
                PlanetPosition::new(Planet::Jupiter, ZodiacSign::Sagittarius),
                PlanetPosition::new(Planet::Mercury, ZodiacSign::Pisces).retrograde(),
                PlanetPosition::new(Planet::Pluto, ZodiacSign::Scorpio),
            ],
            Some(MoonPhase::FullMoon),
        );
        let score = AstroTransitAnalyzer::score_daily(&snapshot);
        // Jupiter domicile +2, Mercury detriment -1.5 and retrograde -1.5,
        // Pluto domicile +1 (halved), full moon +0.5.
        assert!((score.score - 0.5).abs() < 1e-9);
        assert!(score.negative_factors.contains(&"astro.mercury.retrograde".to_string()));
        assert!(score.positive_factors.contains(&"astro.pluto.domicile".to_string()));
    }
}
