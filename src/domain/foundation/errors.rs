//! Error types for the domain layer.

use chrono::NaiveDate;
use std::collections::HashMap;
use std::error::Error;
use std::fmt;
use thiserror::Error;

/// Errors raised while validating engine inputs.
///
/// Every variant names the offending field so callers can point users at it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Field '{field}' is required")]
    MissingField { field: String },

    #[error("Field '{field}' must be between {min} and {max}, got {actual}")]
    OutOfRange {
        field: String,
        min: i32,
        max: i32,
        actual: i32,
    },

    #[error("Field '{field}' has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    #[error("Field '{field}' date {date} is outside the supported window {min}..={max}")]
    DateOutOfRange {
        field: String,
        date: NaiveDate,
        min: NaiveDate,
        max: NaiveDate,
    },

    #[error("Field '{field}' is inconsistent: {reason}")]
    Inconsistent { field: String, reason: String },
}

impl ValidationError {
    /// Creates a missing field validation error.
    pub fn missing_field(field: impl Into<String>) -> Self {
        ValidationError::MissingField { field: field.into() }
    }

    /// Creates an out of range validation error.
    pub fn out_of_range(field: impl Into<String>, min: i32, max: i32, actual: i32) -> Self {
        ValidationError::OutOfRange {
            field: field.into(),
            min,
            max,
            actual,
        }
    }

    /// Creates an invalid format validation error.
    pub fn invalid_format(field: impl Into<String>, reason: impl Into<String>) -> Self {
        ValidationError::InvalidFormat {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Creates a date-out-of-window validation error.
    pub fn date_out_of_range(
        field: impl Into<String>,
        date: NaiveDate,
        min: NaiveDate,
        max: NaiveDate,
    ) -> Self {
        ValidationError::DateOutOfRange {
            field: field.into(),
            date,
            min,
            max,
        }
    }

    /// Creates an inconsistency error between related fields.
    pub fn inconsistent(field: impl Into<String>, reason: impl Into<String>) -> Self {
        ValidationError::Inconsistent {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Returns the name of the offending field.
    pub fn field(&self) -> &str {
        match self {
            ValidationError::MissingField { field }
            | ValidationError::OutOfRange { field, .. }
            | ValidationError::InvalidFormat { field, .. }
            | ValidationError::DateOutOfRange { field, .. }
            | ValidationError::Inconsistent { field, .. } => field,
        }
    }
}

/// Error codes organized by category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Validation errors
    ValidationFailed,
    MissingField,
    OutOfRange,
    InvalidFormat,
    DateOutOfRange,
    InvalidRange,

    // Collaborator errors
    CacheError,
    EphemerisUnavailable,

    InternalError,
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorCode::ValidationFailed => "VALIDATION_FAILED",
            ErrorCode::MissingField => "MISSING_FIELD",
            ErrorCode::OutOfRange => "OUT_OF_RANGE",
            ErrorCode::InvalidFormat => "INVALID_FORMAT",
            ErrorCode::DateOutOfRange => "DATE_OUT_OF_RANGE",
            ErrorCode::InvalidRange => "INVALID_RANGE",
            ErrorCode::CacheError => "CACHE_ERROR",
            ErrorCode::EphemerisUnavailable => "EPHEMERIS_UNAVAILABLE",
            ErrorCode::InternalError => "INTERNAL_ERROR",
        };
        write!(f, "{}", s)
    }
}

/// Standard domain error with code, message, and optional details.
#[derive(Debug, Clone)]
pub struct DomainError {
    pub code: ErrorCode,
    pub message: String,
    pub details: HashMap<String, String>,
}

impl DomainError {
    /// Creates a new domain error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: HashMap::new(),
        }
    }

    /// Creates a validation error for a specific field.
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: ErrorCode::ValidationFailed,
            message: message.into(),
            details: HashMap::new(),
        }
        .with_detail("field", field.into())
    }

    /// Adds a detail to the error.
    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.details.insert(key.into(), value.into());
        self
    }
}

impl fmt::Display for DomainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl Error for DomainError {}

impl From<ValidationError> for DomainError {
    fn from(err: ValidationError) -> Self {
        let code = match &err {
            ValidationError::MissingField { .. } => ErrorCode::MissingField,
            ValidationError::OutOfRange { .. } => ErrorCode::OutOfRange,
            ValidationError::InvalidFormat { .. } => ErrorCode::InvalidFormat,
            ValidationError::DateOutOfRange { .. } => ErrorCode::DateOutOfRange,
            ValidationError::Inconsistent { .. } => ErrorCode::ValidationFailed,
        };
        let field = err.field().to_string();
        DomainError::new(code, err.to_string()).with_detail("field", field)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_error_missing_field_displays_correctly() {
        let err = ValidationError::missing_field("dayMaster");
        assert_eq!(format!("{}", err), "Field 'dayMaster' is required");
    }

    #[test]
    fn validation_error_out_of_range_displays_correctly() {
        let err = ValidationError::out_of_range("hour", 0, 23, 25);
        assert_eq!(
            format!("{}", err),
            "Field 'hour' must be between 0 and 23, got 25"
        );
    }

    #[test]
    fn validation_error_date_out_of_range_names_field() {
        let min = NaiveDate::from_ymd_opt(1900, 1, 1).unwrap();
        let max = NaiveDate::from_ymd_opt(2100, 12, 31).unwrap();
        let date = NaiveDate::from_ymd_opt(1850, 6, 1).unwrap();
        let err = ValidationError::date_out_of_range("date", date, min, max);
        assert_eq!(err.field(), "date");
        assert!(err.to_string().contains("1850-06-01"));
    }

    #[test]
    fn domain_error_displays_code_and_message() {
        let err = DomainError::new(ErrorCode::InvalidRange, "start after end");
        assert_eq!(format!("{}", err), "[INVALID_RANGE] start after end");
    }

    #[test]
    fn domain_error_from_validation_keeps_field() {
        let err: DomainError = ValidationError::missing_field("chart.day").into();
        assert_eq!(err.code, ErrorCode::MissingField);
        assert_eq!(err.details.get("field"), Some(&"chart.day".to_string()));
    }

    #[test]
    fn domain_error_validation_sets_field_detail() {
        let err = DomainError::validation("eventType", "unknown event");
        assert_eq!(err.code, ErrorCode::ValidationFailed);
        assert_eq!(err.details.get("field"), Some(&"eventType".to_string()));
    }
}
