//! Low-precision solar position for solar-term month boundaries.
//!
//! Accuracy is a few hundredths of a degree over 1900-2100, which places
//! solar-term boundaries within minutes of published almanacs.

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, Timelike};

/// Sun longitude at which the first saju month (寅) begins (立春).
pub const IPCHUN_LONGITUDE: f64 = 315.0;

const JD_OF_CE_EPOCH_MIDNIGHT: f64 = 1_721_424.5;
const J2000: f64 = 2_451_545.0;

/// Julian day of a UTC instant.
pub fn julian_day(utc: NaiveDateTime) -> f64 {
    let days = f64::from(utc.date().num_days_from_ce());
    let secs = f64::from(utc.time().num_seconds_from_midnight());
    days + JD_OF_CE_EPOCH_MIDNIGHT + secs / 86_400.0
}

/// Apparent geocentric ecliptic longitude of the Sun in degrees, 0..360.
pub fn sun_apparent_longitude(jd: f64) -> f64 {
    let t = (jd - J2000) / 36_525.0;
    let l0 = 280.46646 + 36_000.769_83 * t + 0.000_303_2 * t * t;
    let m = (357.529_11 + 35_999.050_29 * t - 0.000_153_7 * t * t).to_radians();
    let c = (1.914_602 - 0.004_817 * t - 0.000_014 * t * t) * m.sin()
        + (0.019_993 - 0.000_101 * t) * (2.0 * m).sin()
        + 0.000_289 * (3.0 * m).sin();
    let omega = (125.04 - 1_934.136 * t).to_radians();
    let apparent = l0 + c - 0.005_69 - 0.004_78 * omega.sin();
    apparent.rem_euclid(360.0)
}

/// Saju month sector of a longitude: 0 = 寅 month (from 315°), 11 = 丑 month.
pub fn month_sector(longitude: f64) -> usize {
    (((longitude - IPCHUN_LONGITUDE).rem_euclid(360.0)) / 30.0).floor() as usize % 12
}

/// Saju month sector at a UTC instant.
pub fn month_sector_at(utc: NaiveDateTime) -> usize {
    month_sector(sun_apparent_longitude(julian_day(utc)))
}

/// Equation of time in minutes (apparent minus mean solar time) for a date.
pub fn equation_of_time_minutes(date: NaiveDate) -> f64 {
    let b = (360.0 / 365.0 * (f64::from(date.ordinal()) - 81.0)).to_radians();
    9.87 * (2.0 * b).sin() - 7.53 * b.cos() - 1.5 * b.sin()
}

/// First instant after `utc` at which the saju month changes.
pub fn next_month_boundary(utc: NaiveDateTime) -> NaiveDateTime {
    let sector = month_sector_at(utc);
    let mut hi = utc;
    // Months never exceed 32 days.
    for _ in 0..34 {
        hi += Duration::days(1);
        if month_sector_at(hi) != sector {
            break;
        }
    }
    bisect_boundary(hi - Duration::days(1), hi, sector)
}

/// Last instant at or before `utc` at which the current saju month began.
pub fn previous_month_boundary(utc: NaiveDateTime) -> NaiveDateTime {
    let sector = month_sector_at(utc);
    let mut lo = utc;
    for _ in 0..34 {
        lo -= Duration::days(1);
        if month_sector_at(lo) != sector {
            break;
        }
    }
    bisect_boundary(lo, lo + Duration::days(1), month_sector_at(lo))
}

/// Narrows `[lo, hi]`, where `lo` lies in `sector_lo` and `hi` does not, to one minute.
fn bisect_boundary(mut lo: NaiveDateTime, mut hi: NaiveDateTime, sector_lo: usize) -> NaiveDateTime {
    while (hi - lo).num_seconds() > 60 {
        let mid = lo + Duration::seconds((hi - lo).num_seconds() / 2);
        if month_sector_at(mid) == sector_lo {
            lo = mid;
        } else {
            hi = mid;
        }
    }
    hi
}
