//! Calendar module - Whole-year grading with one shared calibration.

mod generator;

pub use generator::{CalendarBatchGenerator, CalendarYear, GradeDistribution};
