//! Natal analyses computed once per profile and shared by every day.

use crate::domain::analysis::{AdvancedGeokguk, ElementalAnalyzer, ElementalProfile, GeokgukDeterminer};
use crate::domain::foundation::{Chart, Stem};
use crate::domain::profile::NatalProfile;

/// A profile with its slow-changing analyses.
#[derive(Debug, Clone)]
pub struct NatalContext {
    profile: NatalProfile,
    elemental: ElementalProfile,
    geokguk: AdvancedGeokguk,
    fingerprint: String,
}

impl NatalContext {
    pub fn new(profile: NatalProfile) -> Self {
        let elemental = ElementalAnalyzer::analyze_chart(profile.chart());
        let geokguk = GeokgukDeterminer::determine_advanced(profile.chart());
        let fingerprint = profile.fingerprint();
        Self {
            profile,
            elemental,
            geokguk,
            fingerprint,
        }
    }

    pub fn profile(&self) -> &NatalProfile {
        &self.profile
    }

    pub fn chart(&self) -> &Chart {
        self.profile.chart()
    }

    pub fn day_master(&self) -> Stem {
        self.profile.day_master()
    }

    pub fn elemental(&self) -> &ElementalProfile {
        &self.elemental
    }

    pub fn geokguk(&self) -> &AdvancedGeokguk {
        &self.geokguk
    }

    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }
}
