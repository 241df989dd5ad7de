//! Four-Pillars calculator.
//!
//! Day pillars come from a fixed sexagenary anchor, year and month pillars
//! from the Sun's apparent longitude, hour pillars from double-hours.

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

use super::solar;
use crate::domain::foundation::{ensure_supported, Chart, Pillar, Stem, ValidationError};

// 0001-01-01 sits 14 places before 甲子 when counted with num_days_from_ce.
const DAY_CYCLE_OFFSET: i64 = 14;

/// How the 23:00-01:00 子 double-hour is attributed to a day.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ZiHourMode {
    /// 23:00 already belongs to the next day.
    #[default]
    Traditional,
    /// 23:00 stays on the current day; only the hour stem follows the next day.
    Modern,
}

/// Calendar conventions the calculator evaluates under.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarSettings {
    /// Offset of local civil time from UTC, in hours.
    pub utc_offset_hours: f64,
    pub zi_hour_mode: ZiHourMode,
    /// Correct natal hours for longitude and the equation of time.
    pub use_true_solar_time: bool,
}

impl Default for CalendarSettings {
    fn default() -> Self {
        Self {
            utc_offset_hours: 9.0,
            zi_hour_mode: ZiHourMode::Traditional,
            use_true_solar_time: false,
        }
    }
}

/// Local birth data for a natal chart.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BirthMoment {
    pub date: NaiveDate,
    /// Local clock time, when known.
    pub time: Option<NaiveTime>,
    /// Longitude of the birthplace in degrees east.
    pub longitude: Option<f64>,
}

impl BirthMoment {
    pub fn new(date: NaiveDate, time: Option<NaiveTime>) -> Self {
        Self {
            date,
            time,
            longitude: None,
        }
    }

    pub fn with_longitude(mut self, longitude: f64) -> Self {
        self.longitude = Some(longitude);
        self
    }
}

/// Transiting year, month and day pillars of a calendar date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyPillars {
    pub date: NaiveDate,
    pub year: Pillar,
    pub month: Pillar,
    pub day: Pillar,
}

/// Derives pillars from dates under fixed calendar settings.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FourPillarsCalculator {
    settings: CalendarSettings,
}

impl FourPillarsCalculator {
    pub fn new(settings: CalendarSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &CalendarSettings {
        &self.settings
    }

    /// Day pillar of a civil date.
    pub fn day_pillar(date: NaiveDate) -> Result<Pillar, ValidationError> {
        ensure_supported("date", date)?;
        Ok(sexagenary_day(date))
    }

    /// Year pillar of a saju year (the year that begins at 立春).
    pub fn year_pillar(saju_year: i32) -> Pillar {
        Pillar::from_cycle_index((saju_year - 4).rem_euclid(60) as usize)
    }

    /// Month pillar for a month sector (0 = 寅) under the five-tiger rule.
    pub fn month_pillar(year_stem: Stem, sector: usize) -> Pillar {
        let first_stem = (year_stem.index() % 5) * 2 + 2;
        pair(first_stem + sector, 2 + sector)
    }

    /// Hour pillar for a clock hour under the five-rat rule.
    pub fn hour_pillar(day_stem: Stem, hour: u32) -> Pillar {
        let branch = ((hour as usize + 1) / 2) % 12;
        let first_stem = (day_stem.index() % 5) * 2;
        pair(first_stem + branch, branch)
    }

    /// Converts a local civil instant to UTC.
    pub fn to_utc(&self, local: NaiveDateTime) -> NaiveDateTime {
        local - Duration::seconds((self.settings.utc_offset_hours * 3600.0).round() as i64)
    }

    /// Local apparent solar time at a longitude.
    pub fn true_solar_time(&self, local: NaiveDateTime, longitude: f64) -> NaiveDateTime {
        let meridian = 15.0 * self.settings.utc_offset_hours;
        let minutes =
            (longitude - meridian) * 4.0 + solar::equation_of_time_minutes(local.date());
        local + Duration::seconds((minutes * 60.0).round() as i64)
    }

    /// Saju year and its year and month pillars at a local instant.
    pub fn year_and_month_at(&self, local: NaiveDateTime) -> (i32, Pillar, Pillar) {
        let sector = solar::month_sector_at(self.to_utc(local));
        let saju_year = if local.month() <= 2 && sector >= 10 {
            local.year() - 1
        } else {
            local.year()
        };
        let year = Self::year_pillar(saju_year);
        let month = Self::month_pillar(year.stem(), sector);
        (saju_year, year, month)
    }

    /// Transiting pillars of a date, evaluated at local noon.
    pub fn daily(&self, date: NaiveDate) -> Result<DailyPillars, ValidationError> {
        let day = Self::day_pillar(date)?;
        let (_, year, month) = self.year_and_month_at(local_noon(date));
        Ok(DailyPillars {
            date,
            year,
            month,
            day,
        })
    }

    /// Natal chart for a birth moment. Without a birth time the hour pillar is absent.
    pub fn natal(&self, birth: &BirthMoment) -> Result<Chart, ValidationError> {
        ensure_supported("birth.date", birth.date)?;
        let Some(time) = birth.time else {
            let (_, year, month) = self.year_and_month_at(local_noon(birth.date));
            return Ok(Chart::new(year, month, sexagenary_day(birth.date), None));
        };

        let local = birth.date.and_time(time);
        let (_, year, month) = self.year_and_month_at(local);

        let clock = match (self.settings.use_true_solar_time, birth.longitude) {
            (true, Some(longitude)) => self.true_solar_time(local, longitude),
            _ => local,
        };
        let hour = clock.hour();
        let civil_day = clock.date();
        let next_day = sexagenary_day(civil_day + Duration::days(1));

        let (day, hour_stem_source) = if hour == 23 {
            match self.settings.zi_hour_mode {
                ZiHourMode::Traditional => (next_day, next_day.stem()),
                ZiHourMode::Modern => (sexagenary_day(civil_day), next_day.stem()),
            }
        } else {
            let today = sexagenary_day(civil_day);
            (today, today.stem())
        };

        let hour_pillar = Self::hour_pillar(hour_stem_source, hour);
        Ok(Chart::new(year, month, day, Some(hour_pillar)))
    }
}

fn sexagenary_day(date: NaiveDate) -> Pillar {
    let index = (i64::from(date.num_days_from_ce()) + DAY_CYCLE_OFFSET).rem_euclid(60);
    Pillar::from_cycle_index(index as usize)
}

fn local_noon(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::from_hms_opt(12, 0, 0).unwrap_or(NaiveTime::MIN))
}

/// Pillar for stem and branch indices of equal parity.
fn pair(stem_index: usize, branch_index: usize) -> Pillar {
    let s = (stem_index % 10) as i64;
    let b = (branch_index % 12) as i64;
    Pillar::from_cycle_index((6 * s - 5 * b).rem_euclid(60) as usize)
}
