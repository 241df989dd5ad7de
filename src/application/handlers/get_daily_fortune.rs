//! GetDailyFortuneHandler - Query handler for one day's grade.
//!
//! Calibrates against the date's calendar year so the grade matches the
//! calendar, adds astrology when a snapshot is available, and caches the
//! result by profile fingerprint, date, engine settings and astro mode.

use chrono::{Datelike, NaiveDate};
use tracing::info;

use super::support::{settings_variant, CacheSlot, SnapshotSource};
use crate::domain::foundation::DomainError;
use crate::domain::grading::{DailyGradingEngine, GradeResult, NatalContext};
use crate::domain::profile::NatalProfile;
use crate::ports::CacheKey;

/// Query for one day's fortune.
#[derive(Debug, Clone)]
pub struct GetDailyFortuneQuery {
    pub profile: NatalProfile,
    pub date: NaiveDate,
}

/// Result of a successful daily fortune query.
pub type GetDailyFortuneResult = GradeResult;

/// Handler for single-day grading.
pub struct GetDailyFortuneHandler {
    engine: DailyGradingEngine,
    cache: CacheSlot,
    snapshots: SnapshotSource,
}

impl GetDailyFortuneHandler {
    pub fn new(engine: DailyGradingEngine) -> Self {
        Self {
            engine,
            cache: CacheSlot::none(),
            snapshots: SnapshotSource::none(),
        }
    }

    pub fn with_cache(mut self, cache: CacheSlot) -> Self {
        self.cache = cache;
        self
    }

    pub fn with_snapshots(mut self, snapshots: SnapshotSource) -> Self {
        self.snapshots = snapshots;
        self
    }

    fn cache_key(&self, ctx: &NatalContext, date: NaiveDate) -> CacheKey {
        let settings = (self.engine.weights(), self.engine.calculator().settings());
        CacheKey::daily(ctx.fingerprint(), date)
            .with_variant(settings_variant(&settings, self.snapshots.is_enabled()))
    }

    pub async fn handle(
        &self,
        query: GetDailyFortuneQuery,
    ) -> Result<GetDailyFortuneResult, DomainError> {
        let ctx = NatalContext::new(query.profile);
        let key = self.cache_key(&ctx, query.date);
        if let Some(cached) = self.cache.load::<GradeResult>(&key).await {
            return Ok(cached);
        }

        let thresholds = self.engine.calibrate(&ctx, query.date.year())?;
        let fetched = self.snapshots.one(query.date).await;
        let snapshot = fetched.value;
        let result = self
            .engine
            .grade(&ctx, query.date, &thresholds, snapshot.as_ref())?;

        info!(
            date = %query.date,
            grade = result.grade.value(),
            score = result.score.value(),
            astro = snapshot.is_some(),
            "Graded day"
        );

        if !fetched.degraded {
            self.cache.store(&key, &result).await;
        }
        Ok(result)
    }
}
