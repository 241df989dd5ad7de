//! Domain layer containing the fortune engine's pure logic and types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared primitives (stems, branches, pillars, grades, errors)
//! - `pillars` - Four-pillars calculator and solar terms
//! - `profile` - Natal profiles, Daeun cycles and their raw form
//! - `analysis` - Branch relations, ten-gods, void and stars, elements, patterns
//! - `astrology` - Planet dignity, moon phase and transit scoring
//! - `grading` - Calibrated daily grades with consistent content
//! - `timing` - Optimal and avoid windows for life events
//! - `trend` - Multi-year scores and Daeun transitions
//! - `calendar` - Whole-year batch grading
//!
//! Nothing in this layer performs I/O or logs.

pub mod analysis;
pub mod astrology;
pub mod calendar;
pub mod foundation;
pub mod grading;
pub mod pillars;
pub mod profile;
pub mod timing;
pub mod trend;
