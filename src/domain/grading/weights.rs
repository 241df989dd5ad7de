//! Component weights of the daily score.

use serde::{Deserialize, Serialize};

/// Multipliers applied to each contribution source.
///
/// Relations outweigh the elemental balance, which outweighs stars and void
/// days; astrology weighs least.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GradingWeights {
    /// Score every day starts from.
    pub base_score: f64,
    pub relation: f64,
    pub element: f64,
    pub stage: f64,
    pub ten_god: f64,
    pub void: f64,
    pub star: f64,
    pub pattern: f64,
    pub astro: f64,
    /// Scale of the transiting month pillar relative to the day pillar.
    pub month_transit: f64,
}

impl Default for GradingWeights {
    fn default() -> Self {
        Self {
            base_score: 50.0,
            relation: 1.0,
            element: 1.0,
            stage: 1.0,
            ten_god: 2.0,
            void: 1.0,
            star: 1.0,
            pattern: 1.0,
            astro: 0.5,
            month_transit: 0.5,
        }
    }
}

impl GradingWeights {
    /// Every multiplier, for bulk checks.
    pub fn multipliers(&self) -> [(&'static str, f64); 9] {
        [
            ("relation", self.relation),
            ("element", self.element),
            ("stage", self.stage),
            ("ten_god", self.ten_god),
            ("void", self.void),
            ("star", self.star),
            ("pattern", self.pattern),
            ("astro", self.astro),
            ("month_transit", self.month_transit),
        ]
    }
}
