//! Inclusive date ranges and the supported calendar window.

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use super::ValidationError;

/// First supported year of the calendar window.
pub const MIN_SUPPORTED_YEAR: i32 = 1900;

/// Last supported year of the calendar window.
pub const MAX_SUPPORTED_YEAR: i32 = 2100;

/// First supported date.
pub fn min_supported_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(MIN_SUPPORTED_YEAR, 1, 1).unwrap_or(NaiveDate::MIN)
}

/// Last supported date.
pub fn max_supported_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(MAX_SUPPORTED_YEAR, 12, 31).unwrap_or(NaiveDate::MAX)
}

/// Fails with `DateOutOfRange` when `date` is outside the supported window.
pub fn ensure_supported(field: &str, date: NaiveDate) -> Result<NaiveDate, ValidationError> {
    let (min, max) = (min_supported_date(), max_supported_date());
    if date < min || date > max {
        return Err(ValidationError::date_out_of_range(field, date, min, max));
    }
    Ok(date)
}

/// Fails with `OutOfRange` when `year` is outside the supported window.
pub fn ensure_supported_year(field: &str, year: i32) -> Result<i32, ValidationError> {
    if !(MIN_SUPPORTED_YEAR..=MAX_SUPPORTED_YEAR).contains(&year) {
        return Err(ValidationError::out_of_range(
            field,
            MIN_SUPPORTED_YEAR,
            MAX_SUPPORTED_YEAR,
            year,
        ));
    }
    Ok(year)
}

/// Inclusive range of calendar dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    /// Creates a range inside the supported window with `start <= end`.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, ValidationError> {
        ensure_supported("range.start", start)?;
        ensure_supported("range.end", end)?;
        if start > end {
            return Err(ValidationError::inconsistent(
                "range",
                format!("start {} is after end {}", start, end),
            ));
        }
        Ok(Self { start, end })
    }

    /// The whole of a calendar year.
    pub fn year(year: i32) -> Result<Self, ValidationError> {
        ensure_supported_year("year", year)?;
        let start = NaiveDate::from_ymd_opt(year, 1, 1)
            .ok_or_else(|| ValidationError::out_of_range("year", MIN_SUPPORTED_YEAR, MAX_SUPPORTED_YEAR, year))?;
        let end = NaiveDate::from_ymd_opt(year, 12, 31)
            .ok_or_else(|| ValidationError::out_of_range("year", MIN_SUPPORTED_YEAR, MAX_SUPPORTED_YEAR, year))?;
        Self::new(start, end)
    }

    /// A single day.
    pub fn single(date: NaiveDate) -> Result<Self, ValidationError> {
        Self::new(date, date)
    }

    /// Number of days in the range.
    pub fn len_days(&self) -> usize {
        ((self.end - self.start).num_days() + 1) as usize
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Every date in order.
    pub fn days(&self) -> Vec<NaiveDate> {
        (0..self.len_days() as i64)
            .map(|offset| self.start + Duration::days(offset))
            .collect()
    }

    /// Year of the first day.
    pub fn start_year(&self) -> i32 {
        self.start.year()
    }
}

/// Inclusive range of years.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YearRange {
    pub start: i32,
    pub end: i32,
}

impl YearRange {
    pub fn new(start: i32, end: i32) -> Result<Self, ValidationError> {
        ensure_supported_year("range.start", start)?;
        ensure_supported_year("range.end", end)?;
        if start > end {
            return Err(ValidationError::inconsistent(
                "range",
                format!("start year {} is after end year {}", start, end),
            ));
        }
        Ok(Self { start, end })
    }

    pub fn len_years(&self) -> usize {
        (self.end - self.start + 1) as usize
    }

    pub fn years(&self) -> Vec<i32> {
        (self.start..=self.end).collect()
    }

    pub fn contains(&self, year: i32) -> bool {
        self.start <= year && year <= self.end
    }
}
