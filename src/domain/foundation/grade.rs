//! Grade value object (0 = excellent to 4 = worst).

use serde::{Deserialize, Serialize};
use std::fmt;

use super::ValidationError;

/// Daily fortune grade. Lower is better.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
#[repr(u8)]
pub enum Grade {
    Excellent = 0,
    Good = 1,
    #[default]
    Neutral = 2,
    Caution = 3,
    Worst = 4,
}

/// All grades from best to worst.
pub const ALL_GRADES: [Grade; 5] = [
    Grade::Excellent,
    Grade::Good,
    Grade::Neutral,
    Grade::Caution,
    Grade::Worst,
];

impl Grade {
    /// Creates a Grade from an integer, returning error if out of range.
    pub fn try_from_u8(value: u8) -> Result<Self, ValidationError> {
        ALL_GRADES
            .get(value as usize)
            .copied()
            .ok_or_else(|| ValidationError::out_of_range("grade", 0, 4, value as i32))
    }

    /// Returns the numeric value.
    pub fn value(&self) -> u8 {
        *self as u8
    }

    /// Returns the key used for display lookups.
    pub fn label_key(&self) -> &'static str {
        match self {
            Grade::Excellent => "grade.excellent",
            Grade::Good => "grade.good",
            Grade::Neutral => "grade.neutral",
            Grade::Caution => "grade.caution",
            Grade::Worst => "grade.worst",
        }
    }

    /// Grades 0 and 1.
    pub fn is_favorable(&self) -> bool {
        self.value() <= 1
    }

    /// Grades 3 and 4.
    pub fn is_unfavorable(&self) -> bool {
        self.value() >= 3
    }
}

impl From<Grade> for u8 {
    fn from(grade: Grade) -> Self {
        grade.value()
    }
}

impl TryFrom<u8> for Grade {
    type Error = ValidationError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Grade::try_from_u8(value)
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grade_try_from_u8_accepts_valid_values() {
        assert_eq!(Grade::try_from_u8(0).unwrap(), Grade::Excellent);
        assert_eq!(Grade::try_from_u8(4).unwrap(), Grade::Worst);
    }

    #[test]
    fn grade_try_from_u8_rejects_invalid_values() {
        assert!(Grade::try_from_u8(5).is_err());
        assert!(Grade::try_from_u8(200).is_err());
    }

    #[test]
    fn grade_ordering_puts_best_first() {
        assert!(Grade::Excellent < Grade::Good);
        assert!(Grade::Caution < Grade::Worst);
    }

    #[test]
    fn favorable_and_unfavorable_split() {
        assert!(Grade::Good.is_favorable());
        assert!(!Grade::Neutral.is_favorable());
        assert!(!Grade::Neutral.is_unfavorable());
        assert!(Grade::Caution.is_unfavorable());
    }

    #[test]
    fn grade_serializes_as_number() {
        assert_eq!(serde_json::to_string(&Grade::Caution).unwrap(), "3");
        let g: Grade = serde_json::from_str("1").unwrap();
        assert_eq!(g, Grade::Good);
        assert!(serde_json::from_str::<Grade>("9").is_err());
    }
}
