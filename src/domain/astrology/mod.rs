//! Astrology module - Western transit scoring over supplied snapshots.
//!
//! # Components
//!
//! - `Planet`, `ZodiacSign`, `Dignity`, `MoonPhase` - Celestial vocabulary
//! - `AstroSnapshot` - Positions and lunar phase for one date
//! - `AstroTransitAnalyzer` - Event and general daily scorers

mod celestial;
mod snapshot;
mod transit;

pub use celestial::{Dignity, MoonPhase, Planet, ZodiacSign, ALL_PLANETS, ALL_SIGNS};
pub use snapshot::{AstroSnapshot, PlanetPosition};
pub use transit::{
    AstroScore, AstroTransitAnalyzer, EventAstroProfile, DAILY_SCORE_LIMIT, EVENT_SCORE_LIMIT,
    HOUSE_BONUS, RETROGRADE_PENALTY, SIGN_BONUS,
};
