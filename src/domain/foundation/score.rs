//! Score value object (0.0-100.0 scale, one decimal).

use serde::{Deserialize, Serialize};
use std::fmt;

use super::ValidationError;

/// A fortune score between 0.0 and 100.0 inclusive, kept at 0.1 resolution.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Score(f64);

impl Score {
    /// Zero.
    pub const ZERO: Self = Self(0.0);

    /// Neutral midpoint every day starts from.
    pub const NEUTRAL: Self = Self(50.0);

    /// One hundred.
    pub const MAX: Self = Self(100.0);

    /// Creates a score from tenths of a point, clamping to 0..=1000.
    pub fn from_tenths(tenths: i32) -> Self {
        Self(f64::from(tenths.clamp(0, 1000)) / 10.0)
    }

    /// Creates a score, clamping to range and rounding to 0.1.
    pub fn new(value: f64) -> Self {
        Self::from_tenths((value * 10.0).round() as i32)
    }

    /// Creates a score, returning error if out of range.
    pub fn try_new(value: f64) -> Result<Self, ValidationError> {
        if !(0.0..=100.0).contains(&value) {
            return Err(ValidationError::out_of_range(
                "score",
                0,
                100,
                value.round() as i32,
            ));
        }
        Ok(Self::new(value))
    }

    /// Returns the value.
    pub fn value(&self) -> f64 {
        self.0
    }

    /// Returns the value in tenths of a point.
    pub fn tenths(&self) -> i32 {
        (self.0 * 10.0).round() as i32
    }
}

impl Default for Score {
    fn default() -> Self {
        Self::NEUTRAL
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn score_from_tenths_clamps() {
        assert_eq!(Score::from_tenths(-20).value(), 0.0);
        assert_eq!(Score::from_tenths(1200).value(), 100.0);
        assert_eq!(Score::from_tenths(655).value(), 65.5);
    }

    #[test]
    fn score_new_rounds_to_tenths() {
        assert_eq!(Score::new(61.26).tenths(), 613);
        assert_eq!(Score::new(150.0), Score::MAX);
    }

    #[test]
    fn score_try_new_rejects_out_of_range() {
        assert!(Score::try_new(-0.5).is_err());
        assert!(Score::try_new(100.5).is_err());
        assert!(Score::try_new(42.0).is_ok());
    }

    #[test]
    fn score_default_is_neutral() {
        assert_eq!(Score::default(), Score::NEUTRAL);
    }

    #[test]
    fn score_displays_one_decimal() {
        assert_eq!(format!("{}", Score::from_tenths(505)), "50.5");
    }

    #[test]
    fn score_serializes_as_number() {
        let json = serde_json::to_string(&Score::from_tenths(725)).unwrap();
        assert_eq!(json, "72.5");
    }
}
