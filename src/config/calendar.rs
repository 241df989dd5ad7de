//! Calendar conventions configuration

use serde::Deserialize;

use super::error::ValidationError;
use crate::domain::pillars::{CalendarSettings, ZiHourMode};

/// Calendar conventions configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CalendarConfig {
    /// Offset of local civil time from UTC, in hours
    #[serde(default = "default_utc_offset")]
    pub utc_offset_hours: f64,

    /// Attribution of the 23:00 double-hour
    #[serde(default)]
    pub zi_hour_mode: ZiHourMode,

    /// Correct natal hours for longitude
    #[serde(default)]
    pub use_true_solar_time: bool,
}

impl CalendarConfig {
    /// Settings for the four-pillars calculator
    pub fn settings(&self) -> CalendarSettings {
        CalendarSettings {
            utc_offset_hours: self.utc_offset_hours,
            zi_hour_mode: self.zi_hour_mode,
            use_true_solar_time: self.use_true_solar_time,
        }
    }

    /// Validate calendar configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !(-12.0..=14.0).contains(&self.utc_offset_hours) {
            return Err(ValidationError::InvalidUtcOffset);
        }
        Ok(())
    }
}

impl Default for CalendarConfig {
    fn default() -> Self {
        Self {
            utc_offset_hours: default_utc_offset(),
            zi_hour_mode: ZiHourMode::default(),
            use_true_solar_time: false,
        }
    }
}

fn default_utc_offset() -> f64 {
    9.0
}
