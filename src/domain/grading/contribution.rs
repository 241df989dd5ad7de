//! Signed score contributions and the keys they carry.

use serde::{Deserialize, Serialize};

use crate::domain::analysis::RelationshipFinding;

/// Analyzer a contribution came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContributionSource {
    Relation,
    Element,
    Stage,
    TenGod,
    Void,
    Star,
    Pattern,
}

/// One signed delta with its factor, recommendation and warning keys.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contribution {
    pub source: ContributionSource,
    pub delta: f64,
    pub factor_keys: Vec<String>,
    pub recommendations: Vec<String>,
    pub warnings: Vec<String>,
    /// Relation title and its precedence (lower wins).
    pub title_key: Option<String>,
    pub title_rank: u8,
}

impl Contribution {
    pub fn new(source: ContributionSource, delta: f64, factor_key: impl Into<String>) -> Self {
        Self {
            source,
            delta,
            factor_keys: vec![factor_key.into()],
            recommendations: Vec::new(),
            warnings: Vec::new(),
            title_key: None,
            title_rank: u8::MAX,
        }
    }

    /// Contribution carrying every key of a relation finding.
    pub fn from_finding(delta: f64, finding: RelationshipFinding) -> Self {
        Self {
            source: ContributionSource::Relation,
            delta,
            title_rank: finding.kind.title_rank(),
            factor_keys: finding.factor_keys,
            recommendations: finding.recommendations,
            warnings: finding.warnings,
            title_key: finding.title_key,
        }
    }

    pub fn with_warning(mut self, key: impl Into<String>) -> Self {
        self.warnings.push(key.into());
        self
    }

    pub fn with_recommendation(mut self, key: impl Into<String>) -> Self {
        self.recommendations.push(key.into());
        self
    }

    pub fn is_positive(&self) -> bool {
        self.delta > 0.0
    }

    pub fn is_negative(&self) -> bool {
        self.delta < 0.0
    }
}
