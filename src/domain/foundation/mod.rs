//! Foundation module - Shared domain primitives.
//!
//! Contains the stem/branch vocabulary, value objects, and error types
//! that every analyzer builds on.

mod branch;
mod date_range;
mod element;
mod errors;
mod grade;
mod pillar;
mod score;
mod stem;

pub use branch::{Branch, ALL_BRANCHES};
pub use date_range::{
    ensure_supported, ensure_supported_year, max_supported_date, min_supported_date, DateRange,
    YearRange, MAX_SUPPORTED_YEAR, MIN_SUPPORTED_YEAR,
};
pub use element::{Element, ElementRole, Polarity, ALL_ELEMENTS};
pub use errors::{DomainError, ErrorCode, ValidationError};
pub use grade::{Grade, ALL_GRADES};
pub use pillar::{Chart, Pillar, PillarPosition};
pub use score::Score;
pub use stem::{Stem, ALL_STEMS};
