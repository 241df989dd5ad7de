//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("UTC offset must lie between -12 and +14 hours")]
    InvalidUtcOffset,

    #[error("Base score must lie between 0 and 100")]
    InvalidBaseScore,

    #[error("Weight {0} must be finite and non-negative")]
    InvalidWeight(&'static str),

    #[error("Optimal floor must exceed the avoid ceiling")]
    InvalidTimingThresholds,

    #[error("{0} must be greater than zero")]
    ZeroLimit(&'static str),

    #[error("Invalid Redis URL format")]
    InvalidRedisUrl,

    #[error("Invalid log level: {0}")]
    InvalidLogLevel(String),
}
