//! GenerateCalendarHandler - Query handler for a graded calendar year.

use std::time::Instant;

use tracing::info;

use super::support::{settings_variant, CacheSlot, SnapshotSource};
use crate::domain::calendar::{CalendarBatchGenerator, CalendarYear};
use crate::domain::foundation::{DateRange, DomainError};
use crate::domain::grading::NatalContext;
use crate::domain::profile::NatalProfile;
use crate::ports::CacheKey;

/// Query for every day of a year.
#[derive(Debug, Clone)]
pub struct GenerateCalendarQuery {
    pub profile: NatalProfile,
    pub year: i32,
}

/// Result of a successful calendar query.
pub type GenerateCalendarResult = CalendarYear;

/// Handler for whole-year calendars.
pub struct GenerateCalendarHandler {
    generator: CalendarBatchGenerator,
    cache: CacheSlot,
    snapshots: SnapshotSource,
}

impl GenerateCalendarHandler {
    pub fn new(generator: CalendarBatchGenerator) -> Self {
        Self {
            generator,
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

    pub async fn handle(
        &self,
        query: GenerateCalendarQuery,
    ) -> Result<GenerateCalendarResult, DomainError> {
        let range = DateRange::year(query.year)?;
        let ctx = NatalContext::new(query.profile);
        let engine = self.generator.engine();
        let settings = (engine.weights(), engine.calculator().settings());
        let key = CacheKey::calendar(ctx.fingerprint(), query.year)
            .with_variant(settings_variant(&settings, self.snapshots.is_enabled()));
        if let Some(cached) = self.cache.load::<CalendarYear>(&key).await {
            return Ok(cached);
        }

        let started = Instant::now();
        let fetched = self.snapshots.range(&range).await;
        let snapshots = fetched.value;
        let calendar = self.generator.generate(&ctx, query.year, &snapshots)?;

        info!(
            year = query.year,
            days = calendar.distribution.total,
            grade_counts = ?calendar.distribution.counts,
            mean_score = calendar.distribution.mean_score.value(),
            astro_days = snapshots.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Generated calendar"
        );

        if !fetched.degraded {
            self.cache.store(&key, &calendar).await;
        }
        Ok(calendar)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::InMemoryFortuneCache;
    use crate::domain::foundation::ErrorCode;
    use crate::domain::pillars::{BirthMoment, FourPillarsCalculator};
    use crate::domain::profile::{BirthData, Gender};
    use chrono::{NaiveDate, NaiveTime};
    use std::collections::HashMap;
    use std::sync::Arc;
    use std::time::Duration;

    fn test_profile() -> NatalProfile {
        let birth = BirthData {
            moment: BirthMoment::new(
                NaiveDate::from_ymd_opt(1979, 2, 28).unwrap(),
                NaiveTime::from_hms_opt(4, 10, 0),
            ),
            gender: Some(Gender::Male),
        };
        NatalProfile::from_birth(&birth, &FourPillarsCalculator::default()).unwrap()
    }

    #[tokio::test]
    async fn test_generates_full_year() {
        let handler = GenerateCalendarHandler::new(CalendarBatchGenerator::default());
        let calendar = handler
            .handle(GenerateCalendarQuery {
                profile: test_profile(),
                year: 2025,
            })
            .await
            .unwrap();

        assert_eq!(calendar.year, 2025);
        assert_eq!(calendar.days.len(), 365);

        let direct = CalendarBatchGenerator::default()
            .generate(&NatalContext::new(test_profile()), 2025, &HashMap::new())
            .unwrap();
        assert_eq!(calendar, direct);
    }

    #[tokio::test]
    async fn test_stores_calendar_in_cache() {
        let cache = Arc::new(InMemoryFortuneCache::new(4));
        let handler = GenerateCalendarHandler::new(CalendarBatchGenerator::default())
            .with_cache(CacheSlot::new(cache.clone(), Duration::from_secs(60)));
        let query = GenerateCalendarQuery {
            profile: test_profile(),
            year: 2024,
        };

        let first = handler.handle(query.clone()).await.unwrap();
        let second = handler.handle(query).await.unwrap();
        assert_eq!(cache.len().await, 1);
        assert_eq!(first.days, second.days);
        assert_eq!(first.distribution.counts, second.distribution.counts);
    }

    #[tokio::test]
    async fn test_rejects_unsupported_year() {
        let handler = GenerateCalendarHandler::new(CalendarBatchGenerator::default());
        let err = handler
            .handle(GenerateCalendarQuery {
                profile: test_profile(),
                year: 1850,
            })
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::OutOfRange);
    }
}
