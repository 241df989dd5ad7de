//! Planets, signs, dignities and lunar phases.

use serde::{Deserialize, Serialize};

/// Bodies the scorers read from a snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Planet {
    Sun,
    Moon,
    Mercury,
    Venus,
    Mars,
    Jupiter,
    Saturn,
    Uranus,
    Neptune,
    Pluto,
}

pub const ALL_PLANETS: [Planet; 10] = [
    Planet::Sun,
    Planet::Moon,
    Planet::Mercury,
    Planet::Venus,
    Planet::Mars,
    Planet::Jupiter,
    Planet::Saturn,
    Planet::Uranus,
    Planet::Neptune,
    Planet::Pluto,
];

impl Planet {
    pub fn as_key(&self) -> &'static str {
        match self {
            Planet::Sun => "sun",
            Planet::Moon => "moon",
            Planet::Mercury => "mercury",
            Planet::Venus => "venus",
            Planet::Mars => "mars",
            Planet::Jupiter => "jupiter",
            Planet::Saturn => "saturn",
            Planet::Uranus => "uranus",
            Planet::Neptune => "neptune",
            Planet::Pluto => "pluto",
        }
    }

    /// Generational planets; their daily weight is halved.
    pub fn is_outer(&self) -> bool {
        matches!(self, Planet::Uranus | Planet::Neptune | Planet::Pluto)
    }

    /// Mercury, Venus and Mars.
    pub fn is_personal(&self) -> bool {
        matches!(self, Planet::Mercury | Planet::Venus | Planet::Mars)
    }

    fn domiciles(&self) -> &'static [ZodiacSign] {
        use ZodiacSign::*;
        match self {
            Planet::Sun => &[Leo],
            Planet::Moon => &[Cancer],
            Planet::Mercury => &[Gemini, Virgo],
            Planet::Venus => &[Taurus, Libra],
            Planet::Mars => &[Aries, Scorpio],
            Planet::Jupiter => &[Sagittarius, Pisces],
            Planet::Saturn => &[Capricorn, Aquarius],
            Planet::Uranus => &[Aquarius],
            Planet::Neptune => &[Pisces],
            Planet::Pluto => &[Scorpio],
        }
    }

    fn exaltation(&self) -> Option<ZodiacSign> {
        use ZodiacSign::*;
        match self {
            Planet::Sun => Some(Aries),
            Planet::Moon => Some(Taurus),
            Planet::Mercury => Some(Virgo),
            Planet::Venus => Some(Pisces),
            Planet::Mars => Some(Capricorn),
            Planet::Jupiter => Some(Cancer),
            Planet::Saturn => Some(Libra),
            Planet::Uranus | Planet::Neptune | Planet::Pluto => None,
        }
    }

    /// Essential dignity of the planet in a sign.
    ///
    /// Priority: domicile > exaltation > detriment > fall.
    pub fn dignity(&self, sign: ZodiacSign) -> Dignity {
        let domiciles = self.domiciles();
        if domiciles.contains(&sign) {
            return Dignity::Domicile;
        }
        if self.exaltation() == Some(sign) {
            return Dignity::Exaltation;
        }
        if domiciles.iter().any(|d| d.opposite() == sign) {
            return Dignity::Detriment;
        }
        if self.exaltation().map(|e| e.opposite()) == Some(sign) {
            return Dignity::Fall;
        }
        Dignity::Peregrine
    }
}

/// Tropical zodiac signs in order from 0° Aries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ZodiacSign {
    Aries,
    Taurus,
    Gemini,
    Cancer,
    Leo,
    Virgo,
    Libra,
    Scorpio,
    Sagittarius,
    Capricorn,
    Aquarius,
    Pisces,
}

pub const ALL_SIGNS: [ZodiacSign; 12] = [
    ZodiacSign::Aries,
    ZodiacSign::Taurus,
    ZodiacSign::Gemini,
    ZodiacSign::Cancer,
    ZodiacSign::Leo,
    ZodiacSign::Virgo,
    ZodiacSign::Libra,
    ZodiacSign::Scorpio,
    ZodiacSign::Sagittarius,
    ZodiacSign::Capricorn,
    ZodiacSign::Aquarius,
    ZodiacSign::Pisces,
];

impl ZodiacSign {
    pub fn index(&self) -> usize {
        *self as usize
    }

    pub fn from_index(index: usize) -> Self {
        ALL_SIGNS[index % 12]
    }

    /// Sign holding an ecliptic longitude in degrees.
    pub fn from_longitude(longitude: f64) -> Self {
        let normalized = longitude.rem_euclid(360.0);
        Self::from_index((normalized / 30.0).floor() as usize)
    }

    pub fn opposite(&self) -> Self {
        Self::from_index(self.index() + 6)
    }

    pub fn as_key(&self) -> &'static str {
        match self {
            ZodiacSign::Aries => "aries",
            ZodiacSign::Taurus => "taurus",
            ZodiacSign::Gemini => "gemini",
            ZodiacSign::Cancer => "cancer",
            ZodiacSign::Leo => "leo",
            ZodiacSign::Virgo => "virgo",
            ZodiacSign::Libra => "libra",
            ZodiacSign::Scorpio => "scorpio",
            ZodiacSign::Sagittarius => "sagittarius",
            ZodiacSign::Capricorn => "capricorn",
            ZodiacSign::Aquarius => "aquarius",
            ZodiacSign::Pisces => "pisces",
        }
    }
}

/// Essential dignity of a planet in a sign.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dignity {
    Domicile,
    Exaltation,
    Peregrine,
    Detriment,
    Fall,
}

impl Dignity {
    pub fn daily_delta(&self) -> f64 {
        match self {
            Dignity::Domicile => 2.0,
            Dignity::Exaltation => 1.5,
            Dignity::Peregrine => 0.0,
            Dignity::Detriment => -1.5,
            Dignity::Fall => -2.0,
        }
    }

    pub fn as_key(&self) -> &'static str {
        match self {
            Dignity::Domicile => "domicile",
            Dignity::Exaltation => "exaltation",
            Dignity::Peregrine => "peregrine",
            Dignity::Detriment => "detriment",
            Dignity::Fall => "fall",
        }
    }
}

/// Eight-part lunar phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MoonPhase {
    NewMoon,
    WaxingCrescent,
    FirstQuarter,
    WaxingGibbous,
    FullMoon,
    WaningGibbous,
    LastQuarter,
    WaningCrescent,
}

const PHASES: [MoonPhase; 8] = [
    MoonPhase::NewMoon,
    MoonPhase::WaxingCrescent,
    MoonPhase::FirstQuarter,
    MoonPhase::WaxingGibbous,
    MoonPhase::FullMoon,
    MoonPhase::WaningGibbous,
    MoonPhase::LastQuarter,
    MoonPhase::WaningCrescent,
];

impl MoonPhase {
    /// Phase from the Moon's elongation east of the Sun, in degrees.
    ///
    /// Each phase spans 45°, centred on its nominal angle.
    pub fn from_elongation(elongation: f64) -> Self {
        let shifted = (elongation + 22.5).rem_euclid(360.0);
        PHASES[((shifted / 45.0).floor() as usize).min(7)]
    }

    pub fn is_waxing(&self) -> bool {
        matches!(
            self,
            MoonPhase::WaxingCrescent | MoonPhase::FirstQuarter | MoonPhase::WaxingGibbous
        )
    }

    /// General daily weight of the phase.
    pub fn daily_delta(&self) -> f64 {
        match self {
            MoonPhase::NewMoon => 1.0,
            MoonPhase::WaxingCrescent => 1.0,
            MoonPhase::FirstQuarter => 0.0,
            MoonPhase::WaxingGibbous => 1.5,
            MoonPhase::FullMoon => 0.5,
            MoonPhase::WaningGibbous => 0.0,
            MoonPhase::LastQuarter => -1.0,
            MoonPhase::WaningCrescent => -1.5,
        }
    }

    pub fn as_key(&self) -> &'static str {
        match self {
            MoonPhase::NewMoon => "new_moon",
            MoonPhase::WaxingCrescent => "waxing_crescent",
            MoonPhase::FirstQuarter => "first_quarter",
            MoonPhase::WaxingGibbous => "waxing_gibbous",
            MoonPhase::FullMoon => "full_moon",
            MoonPhase::WaningGibbous => "waning_gibbous",
            MoonPhase::LastQuarter => "last_quarter",
            MoonPhase::WaningCrescent => "waning_crescent",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signs_from_longitude() {
        assert_eq!(ZodiacSign::from_longitude(0.0), ZodiacSign::Aries);
        assert_eq!(ZodiacSign::from_longitude(29.99), ZodiacSign::Aries);
        assert_eq!(ZodiacSign::from_longitude(315.0), ZodiacSign::Aquarius);
        assert_eq!(ZodiacSign::from_longitude(-1.0), ZodiacSign::Pisces);
        assert_eq!(ZodiacSign::from_longitude(360.0), ZodiacSign::Aries);
    }

    #[test]
    fn dignities_follow_rulership() {
        assert_eq!(Planet::Venus.dignity(ZodiacSign::Libra), Dignity::Domicile);
        assert_eq!(Planet::Venus.dignity(ZodiacSign::Aries), Dignity::Detriment);
        assert_eq!(Planet::Venus.dignity(ZodiacSign::Virgo), Dignity::Fall);
        assert_eq!(Planet::Sun.dignity(ZodiacSign::Aries), Dignity::Exaltation);
        assert_eq!(Planet::Sun.dignity(ZodiacSign::Aquarius), Dignity::Detriment);
        assert_eq!(Planet::Mars.dignity(ZodiacSign::Gemini), Dignity::Peregrine);
        assert_eq!(Planet::Pluto.dignity(ZodiacSign::Taurus), Dignity::Detriment);
    }

    #[test]
    fn phases_from_elongation() {
        assert_eq!(MoonPhase::from_elongation(0.0), MoonPhase::NewMoon);
        assert_eq!(MoonPhase::from_elongation(350.0), MoonPhase::NewMoon);
        assert_eq!(MoonPhase::from_elongation(90.0), MoonPhase::FirstQuarter);
        assert_eq!(MoonPhase::from_elongation(180.0), MoonPhase::FullMoon);
        assert_eq!(MoonPhase::from_elongation(270.0), MoonPhase::LastQuarter);
        assert_eq!(MoonPhase::from_elongation(320.0), MoonPhase::WaningCrescent);
        assert!(MoonPhase::from_elongation(130.0).is_waxing());
    }
}
