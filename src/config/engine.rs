//! Engine tuning validation
//!
//! Grading weights, timing limits and trend limits deserialize straight into
//! their domain settings; this module validates them.

use super::error::ValidationError;
use crate::domain::grading::GradingWeights;
use crate::domain::timing::TimingSettings;
use crate::domain::trend::TrendSettings;

/// Validate grading weights
pub fn validate_grading(weights: &GradingWeights) -> Result<(), ValidationError> {
    if !(0.0..=100.0).contains(&weights.base_score) {
        return Err(ValidationError::InvalidBaseScore);
    }
    for (name, weight) in weights.multipliers() {
        if !weight.is_finite() || weight < 0.0 {
            return Err(ValidationError::InvalidWeight(name));
        }
    }
    Ok(())
}

/// Validate optimizer thresholds and limits
pub fn validate_timing(settings: &TimingSettings) -> Result<(), ValidationError> {
    if settings.optimal_floor <= settings.avoid_ceiling {
        return Err(ValidationError::InvalidTimingThresholds);
    }
    if settings.max_periods == 0 {
        return Err(ValidationError::ZeroLimit("timing.max_periods"));
    }
    if settings.max_range_days == 0 {
        return Err(ValidationError::ZeroLimit("timing.max_range_days"));
    }
    Ok(())
}

/// Validate trend limits
pub fn validate_trend(settings: &TrendSettings) -> Result<(), ValidationError> {
    if settings.max_years == 0 {
        return Err(ValidationError::ZeroLimit("trend.max_years"));
    }
    if !settings.daeun_weight.is_finite() || settings.daeun_weight < 0.0 {
        return Err(ValidationError::InvalidWeight("trend.daeun_weight"));
    }
    Ok(())
}
