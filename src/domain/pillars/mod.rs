//! Pillars module - Four-Pillars derivation from civil dates.

mod calculator;
pub mod solar;

pub use calculator::{
    BirthMoment, CalendarSettings, DailyPillars, FourPillarsCalculator, ZiHourMode,
};
