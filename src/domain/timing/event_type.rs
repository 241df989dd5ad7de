//! Event types and their favorability records.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::analysis::{StarKind, TenGod, TwelveStage};
use crate::domain::astrology::{EventAstroProfile, MoonPhase, Planet, ZodiacSign};
use crate::domain::foundation::{ElementRole, ValidationError};
use crate::domain::profile::Gender;

/// Life events the optimizer can search windows for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    Marriage,
    Career,
    Investment,
    Move,
    Study,
    Health,
    Relationship,
}

pub const ALL_EVENT_TYPES: [EventType; 7] = [
    EventType::Marriage,
    EventType::Career,
    EventType::Investment,
    EventType::Move,
    EventType::Study,
    EventType::Health,
    EventType::Relationship,
];

/// What makes a day good or bad for an event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EventFavorability {
    pub favorable_gods: &'static [TenGod],
    pub unfavorable_gods: &'static [TenGod],
    pub favorable_stages: &'static [TwelveStage],
    pub unfavorable_stages: &'static [TwelveStage],
    pub favorable_roles: &'static [ElementRole],
    pub unfavorable_roles: &'static [ElementRole],
    pub lucky_stars: &'static [StarKind],
    pub unlucky_stars: &'static [StarKind],
    pub astro: EventAstroProfile,
}

const MARRIAGE: EventFavorability = EventFavorability {
    favorable_gods: &[TenGod::Jeongjae, TenGod::Jeonggwan, TenGod::Siksin],
    unfavorable_gods: &[TenGod::Geobjae, TenGod::Sanggwan, TenGod::Pyeongwan],
    favorable_stages: &[TwelveStage::Jangsaeng, TwelveStage::Gwandae, TwelveStage::Geonrok],
    unfavorable_stages: &[TwelveStage::Sa, TwelveStage::Myo, TwelveStage::Jeol],
    favorable_roles: &[ElementRole::Wealth, ElementRole::Output],
    unfavorable_roles: &[ElementRole::Companion],
    lucky_stars: &[StarKind::Dohwa, StarKind::CheoneulGwiin],
    unlucky_stars: &[StarKind::Goegang, StarKind::Wonjin],
    astro: EventAstroProfile {
        favorable_signs: &[ZodiacSign::Taurus, ZodiacSign::Libra, ZodiacSign::Cancer],
        key_planets: &[Planet::Venus, Planet::Moon, Planet::Jupiter],
        favorable_houses: &[5, 7],
        avoid_retrogrades: &[Planet::Venus, Planet::Mercury],
        moon_phase_bonus: &[
            (MoonPhase::WaxingGibbous, 3.0),
            (MoonPhase::FullMoon, 2.0),
            (MoonPhase::NewMoon, 1.0),
            (MoonPhase::WaningCrescent, -2.0),
        ],
    },
};

const CAREER: EventFavorability = EventFavorability {
    favorable_gods: &[TenGod::Jeonggwan, TenGod::Pyeongwan, TenGod::Jeongin],
    unfavorable_gods: &[TenGod::Sanggwan, TenGod::Geobjae],
    favorable_stages: &[TwelveStage::Geonrok, TwelveStage::Jewang, TwelveStage::Gwandae],
    unfavorable_stages: &[TwelveStage::Byeong, TwelveStage::Sa, TwelveStage::Jeol],
    favorable_roles: &[ElementRole::Officer, ElementRole::Resource],
    unfavorable_roles: &[ElementRole::Output],
    lucky_stars: &[StarKind::Munchang, StarKind::CheoneulGwiin, StarKind::Yeokma],
    unlucky_stars: &[StarKind::Jaesal, StarKind::Geobsal],
    astro: EventAstroProfile {
        favorable_signs: &[ZodiacSign::Capricorn, ZodiacSign::Leo, ZodiacSign::Aries],
        key_planets: &[Planet::Sun, Planet::Saturn, Planet::Jupiter],
        favorable_houses: &[10, 6],
        avoid_retrogrades: &[Planet::Mercury, Planet::Saturn],
        moon_phase_bonus: &[
            (MoonPhase::WaxingCrescent, 2.0),
            (MoonPhase::FirstQuarter, 2.0),
            (MoonPhase::WaningCrescent, -2.0),
        ],
    },
};

const INVESTMENT: EventFavorability = EventFavorability {
    favorable_gods: &[TenGod::Jeongjae, TenGod::Pyeonjae, TenGod::Siksin],
    unfavorable_gods: &[TenGod::Geobjae, TenGod::Bigyeon, TenGod::Pyeonin],
    favorable_stages: &[TwelveStage::Jewang, TwelveStage::Geonrok, TwelveStage::Gwandae],
    unfavorable_stages: &[TwelveStage::Sa, TwelveStage::Myo, TwelveStage::Jeol],
    favorable_roles: &[ElementRole::Wealth, ElementRole::Output],
    unfavorable_roles: &[ElementRole::Companion],
    lucky_stars: &[StarKind::Geumyeo, StarKind::CheoneulGwiin],
    unlucky_stars: &[StarKind::Geobsal, StarKind::Jaesal],
    astro: EventAstroProfile {
        favorable_signs: &[ZodiacSign::Taurus, ZodiacSign::Capricorn, ZodiacSign::Virgo],
        key_planets: &[Planet::Jupiter, Planet::Venus, Planet::Mercury],
        favorable_houses: &[2, 8, 11],
        avoid_retrogrades: &[Planet::Mercury, Planet::Jupiter],
        moon_phase_bonus: &[
            (MoonPhase::NewMoon, 2.0),
            (MoonPhase::WaxingGibbous, 1.0),
            (MoonPhase::FullMoon, -1.0),
            (MoonPhase::LastQuarter, -2.0),
        ],
    },
};

const MOVE: EventFavorability = EventFavorability {
    favorable_gods: &[TenGod::Siksin, TenGod::Pyeonjae, TenGod::Jeongin],
    unfavorable_gods: &[TenGod::Pyeongwan, TenGod::Geobjae],
    favorable_stages: &[TwelveStage::Jangsaeng, TwelveStage::Yang],
    unfavorable_stages: &[TwelveStage::Byeong, TwelveStage::Sa],
    favorable_roles: &[ElementRole::Output, ElementRole::Resource],
    unfavorable_roles: &[ElementRole::Officer],
    lucky_stars: &[StarKind::Yeokma, StarKind::CheoneulGwiin],
    unlucky_stars: &[StarKind::Jaesal, StarKind::Wonjin],
    astro: EventAstroProfile {
        favorable_signs: &[ZodiacSign::Cancer, ZodiacSign::Sagittarius, ZodiacSign::Gemini],
        key_planets: &[Planet::Moon, Planet::Mercury, Planet::Jupiter],
        favorable_houses: &[4, 9],
        avoid_retrogrades: &[Planet::Mercury],
        moon_phase_bonus: &[
            (MoonPhase::NewMoon, 2.0),
            (MoonPhase::WaxingCrescent, 1.0),
            (MoonPhase::WaningGibbous, -1.0),
        ],
    },
};

const STUDY: EventFavorability = EventFavorability {
    favorable_gods: &[TenGod::Jeongin, TenGod::Pyeonin, TenGod::Siksin],
    unfavorable_gods: &[TenGod::Jeongjae, TenGod::Pyeonjae],
    favorable_stages: &[TwelveStage::Gwandae, TwelveStage::Jangsaeng, TwelveStage::Geonrok],
    unfavorable_stages: &[TwelveStage::Sa, TwelveStage::Jeol],
    favorable_roles: &[ElementRole::Resource, ElementRole::Output],
    unfavorable_roles: &[ElementRole::Wealth],
    lucky_stars: &[StarKind::Munchang, StarKind::Hwagae],
    unlucky_stars: &[StarKind::Dohwa],
    astro: EventAstroProfile {
        favorable_signs: &[
            ZodiacSign::Gemini,
            ZodiacSign::Virgo,
            ZodiacSign::Sagittarius,
            ZodiacSign::Aquarius,
        ],
        key_planets: &[Planet::Mercury, Planet::Jupiter],
        favorable_houses: &[3, 9],
        avoid_retrogrades: &[Planet::Mercury],
        moon_phase_bonus: &[(MoonPhase::FirstQuarter, 2.0), (MoonPhase::WaxingGibbous, 1.0)],
    },
};

const HEALTH: EventFavorability = EventFavorability {
    favorable_gods: &[TenGod::Jeongin, TenGod::Bigyeon, TenGod::Siksin],
    unfavorable_gods: &[TenGod::Pyeongwan, TenGod::Sanggwan],
    favorable_stages: &[TwelveStage::Jangsaeng, TwelveStage::Geonrok, TwelveStage::Jewang],
    unfavorable_stages: &[TwelveStage::Byeong, TwelveStage::Sa, TwelveStage::Myo],
    favorable_roles: &[ElementRole::Resource, ElementRole::Companion],
    unfavorable_roles: &[ElementRole::Officer],
    lucky_stars: &[StarKind::CheoneulGwiin],
    unlucky_stars: &[StarKind::Yangin, StarKind::Jaesal],
    astro: EventAstroProfile {
        favorable_signs: &[ZodiacSign::Virgo, ZodiacSign::Leo, ZodiacSign::Aries],
        key_planets: &[Planet::Sun, Planet::Mars],
        favorable_houses: &[1, 6],
        avoid_retrogrades: &[Planet::Mars],
        moon_phase_bonus: &[
            (MoonPhase::WaningGibbous, 1.0),
            (MoonPhase::WaningCrescent, 2.0),
            (MoonPhase::FullMoon, -1.0),
        ],
    },
};

const RELATIONSHIP: EventFavorability = EventFavorability {
    favorable_gods: &[TenGod::Jeonggwan, TenGod::Jeongjae, TenGod::Siksin, TenGod::Bigyeon],
    unfavorable_gods: &[TenGod::Geobjae, TenGod::Pyeongwan, TenGod::Sanggwan],
    favorable_stages: &[TwelveStage::Jangsaeng, TwelveStage::Gwandae, TwelveStage::Mogyok],
    unfavorable_stages: &[TwelveStage::Jeol, TwelveStage::Sa],
    favorable_roles: &[ElementRole::Wealth, ElementRole::Companion],
    unfavorable_roles: &[ElementRole::Officer],
    lucky_stars: &[StarKind::Dohwa, StarKind::CheoneulGwiin],
    unlucky_stars: &[StarKind::Wonjin, StarKind::Goegang],
    astro: EventAstroProfile {
        favorable_signs: &[ZodiacSign::Libra, ZodiacSign::Leo, ZodiacSign::Pisces],
        key_planets: &[Planet::Venus, Planet::Moon],
        favorable_houses: &[5, 7, 11],
        avoid_retrogrades: &[Planet::Venus],
        moon_phase_bonus: &[
            (MoonPhase::WaxingGibbous, 2.0),
            (MoonPhase::FullMoon, 2.0),
            (MoonPhase::WaningCrescent, -1.0),
        ],
    },
};

impl EventType {
    pub fn as_key(&self) -> &'static str {
        match self {
            EventType::Marriage => "marriage",
            EventType::Career => "career",
            EventType::Investment => "investment",
            EventType::Move => "move",
            EventType::Study => "study",
            EventType::Health => "health",
            EventType::Relationship => "relationship",
        }
    }

    pub fn favorability(&self) -> &'static EventFavorability {
        match self {
            EventType::Marriage => &MARRIAGE,
            EventType::Career => &CAREER,
            EventType::Investment => &INVESTMENT,
            EventType::Move => &MOVE,
            EventType::Study => &STUDY,
            EventType::Health => &HEALTH,
            EventType::Relationship => &RELATIONSHIP,
        }
    }

    /// Spouse star of a marriage: wealth for men, officer for women.
    pub fn spouse_star(&self, gender: Option<Gender>) -> Option<TenGod> {
        match (self, gender) {
            (EventType::Marriage, Some(Gender::Male)) => Some(TenGod::Jeongjae),
            (EventType::Marriage, Some(Gender::Female)) => Some(TenGod::Jeonggwan),
            _ => None,
        }
    }

    /// Whether a transiting ten-god favors this event for a gender.
    pub fn favors_god(&self, god: TenGod, gender: Option<Gender>) -> bool {
        self.favorability().favorable_gods.contains(&god) || self.spouse_star(gender) == Some(god)
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_key())
    }
}

impl FromStr for EventType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase();
        ALL_EVENT_TYPES
            .iter()
            .copied()
            .find(|event| event.as_key() == key)
            .ok_or_else(|| ValidationError::invalid_format("eventType", format!("unknown event type '{}'", s)))
    }
}
