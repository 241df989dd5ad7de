//! Engine configuration module
//!
//! This module provides type-safe configuration loading from environment variables
//! using the `config` and `dotenvy` crates. Configuration is loaded with the
//! `FORTUNE_CALENDAR` prefix and nested values use double underscores as separators.
//! Every section has defaults, so an empty environment yields a working engine.
//!
//! # Example
//!
//! ```no_run
//! use fortune_calendar::config::EngineConfig;
//!
//! let config = EngineConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Cache TTL: {:?}", config.cache.ttl());
//! ```

mod cache;
mod calendar;
mod engine;
mod error;
mod logging;

pub use cache::CacheConfig;
pub use calendar::CalendarConfig;
pub use engine::{validate_grading, validate_timing, validate_trend};
pub use error::{ConfigError, ValidationError};
pub use logging::LoggingConfig;

use serde::Deserialize;

use crate::domain::calendar::CalendarBatchGenerator;
use crate::domain::grading::{DailyGradingEngine, GradingWeights};
use crate::domain::pillars::FourPillarsCalculator;
use crate::domain::timing::{EventTimingOptimizer, TimingSettings};
use crate::domain::trend::{TrendAnalyzer, TrendSettings};

/// Root engine configuration
///
/// Load using [`EngineConfig::load()`] which reads from environment variables.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EngineConfig {
    /// Calendar conventions (UTC offset, zi hour, true solar time)
    #[serde(default)]
    pub calendar: CalendarConfig,

    /// Base score and component weights
    #[serde(default)]
    pub grading: GradingWeights,

    /// Event timing thresholds and limits
    #[serde(default)]
    pub timing: TimingSettings,

    /// Multi-year trend limits
    #[serde(default)]
    pub trend: TrendSettings,

    /// Fortune cache (TTL, capacity, optional Redis)
    #[serde(default)]
    pub cache: CacheConfig,

    /// Log level and format
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl EngineConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `FORTUNE_CALENDAR` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Deserializes into typed configuration structs
    ///
    /// # Environment Variable Format
    ///
    /// - `FORTUNE_CALENDAR__CALENDAR__UTC_OFFSET_HOURS=9` -> `calendar.utc_offset_hours = 9`
    /// - `FORTUNE_CALENDAR__TIMING__OPTIMAL_FLOOR=65` -> `timing.optimal_floor = 65`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into expected types.
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (development)
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("FORTUNE_CALENDAR")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if any configuration value is invalid.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.calendar.validate()?;
        validate_grading(&self.grading)?;
        validate_timing(&self.timing)?;
        validate_trend(&self.trend)?;
        self.cache.validate()?;
        self.logging.validate()?;
        Ok(())
    }

    pub fn calculator(&self) -> FourPillarsCalculator {
        FourPillarsCalculator::new(self.calendar.settings())
    }

    pub fn grading_engine(&self) -> DailyGradingEngine {
        DailyGradingEngine::new(self.grading, self.calculator())
    }

    pub fn timing_optimizer(&self) -> EventTimingOptimizer {
        EventTimingOptimizer::new(self.grading_engine(), self.timing)
    }

    pub fn calendar_generator(&self) -> CalendarBatchGenerator {
        CalendarBatchGenerator::new(self.grading_engine())
    }

    pub fn trend_analyzer(&self) -> TrendAnalyzer {
        TrendAnalyzer::new(self.trend)
    }
}
