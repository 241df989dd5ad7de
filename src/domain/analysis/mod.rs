//! Analysis Module - Pure domain services over charts and transiting pillars.
//!
//! This module contains stateless analyzers that read a natal chart (and
//! optionally a transiting pillar) and return structured findings.
//!
//! # Components
//!
//! - `BranchRelationAnalyzer` - Samhap, Yukhap, Chung, Xing and Hai between branches
//! - `TenGodsAnalyzer` - Ten-god roles and twelve life stages (precomputed tables)
//! - `VoidStarAnalyzer` - Void branches and auxiliary stars
//! - `ElementalAnalyzer` - Weighted five-element balance and Day Master strength
//! - `GeokgukDeterminer` - Structural pattern and its status
//!
//! # Design Philosophy
//!
//! All functions are pure (no side effects) and stateless. They take domain
//! objects as input and return computed results. No ports or adapters needed
//! since there's no I/O or external dependencies.

mod branch_relations;
mod elemental;
mod geokguk;
mod ten_gods;
mod void_stars;

// Re-export all public types
pub use branch_relations::{
    BranchRelationAnalyzer, RelationKind, RelationPolarity, RelationReport, RelationshipFinding,
};
pub use elemental::{
    ElementTally, ElementalAnalyzer, ElementalProfile, Strength, BRANCH_WEIGHT, CO_LOCATION_BOOST,
    HIDDEN_STEM_SHARES, MONTH_BRANCH_BOOST, STEM_WEIGHT, STRONG_ABOVE, WEAK_BELOW,
};
pub use geokguk::{
    AdvancedGeokguk, Confidence, GeokgukDeterminer, GeokgukResult, Pattern, PatternCategory,
    PatternStatus, StatusEvaluation, StemCombination, TransformationCheck,
    TransformationConditions, ALL_COMBINATIONS,
};
pub use ten_gods::{
    PillarReading, TenGod, TenGodsAnalyzer, TwelveStage, ALL_STAGES, ALL_TEN_GODS,
    TEN_GOD_TABLE, TWELVE_STAGE_TABLE,
};
pub use void_stars::{ActiveStar, StarKind, StarNature, VoidReport, VoidStarAnalyzer};
