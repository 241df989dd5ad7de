//! Profile module - Natal profiles and their boundary representation.

mod natal_profile;
mod raw_profile;

pub use natal_profile::{
    BirthData, DaeunCycle, Gender, NatalProfile, DAEUN_CYCLE_COUNT, DAEUN_CYCLE_YEARS,
};
pub use raw_profile::{RawDaeunCycle, RawNatalProfile};
