//! Mean-motion ephemeris for Sun and Moon.
//!
//! Positions are sampled at 12:00 UTC. The Sun uses the same low-precision
//! series as the solar-term calculator; the Moon uses its mean longitude plus
//! the equation of the centre, good to a couple of degrees. Houses and the
//! other planets are unknown, so the snapshot only lists Sun and Moon.

use async_trait::async_trait;
use chrono::{Duration, NaiveDate, NaiveTime};

use crate::domain::astrology::{AstroSnapshot, MoonPhase, Planet, PlanetPosition, ZodiacSign};
use crate::domain::foundation::ensure_supported;
use crate::domain::pillars::solar::{julian_day, sun_apparent_longitude};
use crate::ports::{AstroSnapshotProvider, EphemerisError};

const J2000: f64 = 2_451_545.0;

/// Geocentric longitude of the Moon in degrees, 0..360.
fn moon_longitude(jd: f64) -> f64 {
    let d = jd - J2000;
    let mean_longitude = 218.316 + 13.176_396 * d;
    let mean_anomaly = (134.963 + 13.064_993 * d).to_radians();
    (mean_longitude + 6.289 * mean_anomaly.sin()).rem_euclid(360.0)
}

/// Approximate Sun and Moon provider needing no external data.
#[derive(Debug, Clone, Copy, Default)]
pub struct MeanMotionEphemeris;

impl MeanMotionEphemeris {
    pub fn new() -> Self {
        Self
    }

    /// Sun and Moon longitudes at noon UTC.
    pub fn longitudes(date: NaiveDate) -> (f64, f64) {
        let jd = julian_day(date.and_time(NaiveTime::default()) + Duration::hours(12));
        (sun_apparent_longitude(jd), moon_longitude(jd))
    }

    /// Snapshot for a supported date.
    pub fn compute(date: NaiveDate) -> Result<AstroSnapshot, EphemerisError> {
        ensure_supported("date", date).map_err(|_| EphemerisError::OutOfCoverage(date))?;
        let (sun, moon) = Self::longitudes(date);
        Ok(AstroSnapshot::new(
            vec![
                PlanetPosition::new(Planet::Sun, ZodiacSign::from_longitude(sun)),
                PlanetPosition::new(Planet::Moon, ZodiacSign::from_longitude(moon)),
            ],
            Some(MoonPhase::from_elongation(moon - sun)),
        ))
    }
}

#[async_trait]
impl AstroSnapshotProvider for MeanMotionEphemeris {
    async fn snapshot(&self, date: NaiveDate) -> Result<Option<AstroSnapshot>, EphemerisError> {
        Self::compute(date).map(Some)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::DateRange;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn new_and_full_moons_of_january_2000() {
        let new_moon = MeanMotionEphemeris::compute(date(2000, 1, 6)).unwrap();
        assert_eq!(new_moon.moon_phase, Some(MoonPhase::NewMoon));

        let full_moon = MeanMotionEphemeris::compute(date(2000, 1, 21)).unwrap();
        assert_eq!(full_moon.moon_phase, Some(MoonPhase::FullMoon));
    }

    #[test]
    fn sun_signs_mid_month() {
        let july = MeanMotionEphemeris::compute(date(2025, 7, 10)).unwrap();
        assert_eq!(july.position(Planet::Sun).unwrap().sign, ZodiacSign::Cancer);

        let december = MeanMotionEphemeris::compute(date(2025, 12, 10)).unwrap();
        assert_eq!(december.position(Planet::Sun).unwrap().sign, ZodiacSign::Sagittarius);
    }

    #[test]
    fn houses_are_unknown() {
        let snapshot = MeanMotionEphemeris::compute(date(2025, 3, 3)).unwrap();
        assert_eq!(snapshot.planet_positions.len(), 2);
        assert!(snapshot.planet_positions.iter().all(|p| p.house.is_none()));
    }

    #[test]
    fn unsupported_date_is_out_of_coverage() {
        let result = MeanMotionEphemeris::compute(date(2150, 1, 1));
        assert!(matches!(result, Err(EphemerisError::OutOfCoverage(_))));
    }

    #[tokio::test]
    async fn range_covers_every_day() {
        let range = DateRange::new(date(2025, 2, 1), date(2025, 2, 28)).unwrap();
        let snapshots = MeanMotionEphemeris::new().snapshots(&range).await.unwrap();
        assert_eq!(snapshots.len(), 28);
    }
}
