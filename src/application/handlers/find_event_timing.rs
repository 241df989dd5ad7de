//! FindEventTimingHandler - Query handler for event windows.
//!
//! Rejects ranges longer than the configured limit, fetches snapshots for
//! the range when a provider exists, and caches by fingerprint, range and
//! event type.

use tracing::info;

use super::support::{settings_variant, CacheSlot, SnapshotSource};
use crate::domain::foundation::{DateRange, DomainError, ErrorCode};
use crate::domain::grading::NatalContext;
use crate::domain::profile::NatalProfile;
use crate::domain::timing::{EventTimingOptimizer, EventTimingResult, EventType};
use crate::ports::CacheKey;

/// Query for the best and worst windows of an event.
#[derive(Debug, Clone)]
pub struct FindEventTimingQuery {
    pub profile: NatalProfile,
    pub event_type: EventType,
    pub range: DateRange,
}

/// Result of a successful event timing query.
pub type FindEventTimingResult = EventTimingResult;

/// Handler for event timing searches.
pub struct FindEventTimingHandler {
    optimizer: EventTimingOptimizer,
    cache: CacheSlot,
    snapshots: SnapshotSource,
}

impl FindEventTimingHandler {
    pub fn new(optimizer: EventTimingOptimizer) -> Self {
        Self {
            optimizer,
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
        query: FindEventTimingQuery,
    ) -> Result<FindEventTimingResult, DomainError> {
        let max_days = self.optimizer.settings().max_range_days;
        if query.range.len_days() > max_days {
            return Err(DomainError::new(
                ErrorCode::InvalidRange,
                format!(
                    "search range of {} days exceeds the limit of {}",
                    query.range.len_days(),
                    max_days
                ),
            )
            .with_detail("field", "range"));
        }

        let ctx = NatalContext::new(query.profile);
        let engine = self.optimizer.engine();
        let settings = (
            engine.weights(),
            engine.calculator().settings(),
            self.optimizer.settings(),
        );
        let key = CacheKey::timing(
            ctx.fingerprint(),
            query.event_type,
            query.range.start,
            query.range.end,
        )
        .with_variant(settings_variant(&settings, self.snapshots.is_enabled()));
        if let Some(cached) = self.cache.load::<EventTimingResult>(&key).await {
            return Ok(cached);
        }

        let fetched = self.snapshots.range(&query.range).await;
        let snapshots = fetched.value;
        let result = self
            .optimizer
            .optimize(&ctx, query.event_type, &query.range, &snapshots)?;

        info!(
            event = %query.event_type,
            days = query.range.len_days(),
            optimal = result.optimal_periods.len(),
            avoid = result.avoid_periods.len(),
            astro_days = snapshots.len(),
            "Searched event timing"
        );

        if !fetched.degraded {
            self.cache.store(&key, &result).await;
        }
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::{InMemoryFortuneCache, MeanMotionEphemeris};
    use crate::domain::grading::DailyGradingEngine;
    use crate::domain::pillars::{BirthMoment, FourPillarsCalculator};
    use crate::domain::profile::{BirthData, Gender};
    use crate::domain::timing::TimingSettings;
    use chrono::{NaiveDate, NaiveTime};
    use std::sync::Arc;
    use std::time::Duration;

    fn test_profile() -> NatalProfile {
        let birth = BirthData {
            moment: BirthMoment::new(
                NaiveDate::from_ymd_opt(1988, 11, 3).unwrap(),
                NaiveTime::from_hms_opt(7, 45, 0),
            ),
            gender: Some(Gender::Female),
        };
        NatalProfile::from_birth(&birth, &FourPillarsCalculator::default()).unwrap()
    }

    fn range(start: (i32, u32, u32), end: (i32, u32, u32)) -> DateRange {
        DateRange::new(
            NaiveDate::from_ymd_opt(start.0, start.1, start.2).unwrap(),
            NaiveDate::from_ymd_opt(end.0, end.1, end.2).unwrap(),
        )
        .unwrap()
    }

    fn handler() -> FindEventTimingHandler {
        FindEventTimingHandler::new(EventTimingOptimizer::new(
            DailyGradingEngine::default(),
            TimingSettings::default(),
        ))
    }

    #[tokio::test]
    async fn test_finds_windows_for_event() {
        let result = handler()
            .handle(FindEventTimingQuery {
                profile: test_profile(),
                event_type: EventType::Marriage,
                range: range((2025, 1, 1), (2025, 6, 30)),
            })
            .await
            .unwrap();

        assert_eq!(result.event_type, EventType::Marriage);
        assert!(result.optimal_threshold.value() > result.avoid_threshold.value());
        assert!(result.advice.starts_with("advice.marriage."));
    }

    #[tokio::test]
    async fn test_rejects_overlong_range() {
        let result = handler()
            .handle(FindEventTimingQuery {
                profile: test_profile(),
                event_type: EventType::Career,
                range: range((2025, 1, 1), (2026, 6, 30)),
            })
            .await;

        let err = result.unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidRange);
        assert_eq!(err.details.get("field"), Some(&"range".to_string()));
    }

    #[tokio::test]
    async fn test_caches_by_event_type() {
        let cache = Arc::new(InMemoryFortuneCache::new(16));
        let handler = handler().with_cache(CacheSlot::new(cache.clone(), Duration::from_secs(60)));
        let search = range((2025, 3, 1), (2025, 3, 31));

        for event_type in [EventType::Marriage, EventType::Move, EventType::Marriage] {
            handler
                .handle(FindEventTimingQuery {
                    profile: test_profile(),
                    event_type,
                    range: search,
                })
                .await
                .unwrap();
        }
        assert_eq!(cache.len().await, 2);
    }

    #[tokio::test]
    async fn test_uses_snapshots_when_available() {
        let search = range((2025, 4, 1), (2025, 4, 30));
        let plain = handler()
            .handle(FindEventTimingQuery {
                profile: test_profile(),
                event_type: EventType::Study,
                range: search,
            })
            .await
            .unwrap();
        let with_astro = handler()
            .with_snapshots(SnapshotSource::new(Arc::new(MeanMotionEphemeris::new())))
            .handle(FindEventTimingQuery {
                profile: test_profile(),
                event_type: EventType::Study,
                range: search,
            })
            .await
            .unwrap();

        assert_eq!(with_astro.search_range, plain.search_range);
        assert_eq!(with_astro.event_type, plain.event_type);
    }

    #[tokio::test]
    async fn test_astro_mode_has_its_own_cache_entry() {
        let cache = Arc::new(InMemoryFortuneCache::new(16));
        let slot = CacheSlot::new(cache.clone(), Duration::from_secs(60));
        let search = range((2025, 5, 1), (2025, 5, 31));
        let query = || FindEventTimingQuery {
            profile: test_profile(),
            event_type: EventType::Investment,
            range: search,
        };

        handler().with_cache(slot.clone()).handle(query()).await.unwrap();
        let cached_astro = handler()
            .with_cache(slot)
            .with_snapshots(SnapshotSource::new(Arc::new(MeanMotionEphemeris::new())))
            .handle(query())
            .await
            .unwrap();
        let fresh_astro = handler()
            .with_snapshots(SnapshotSource::new(Arc::new(MeanMotionEphemeris::new())))
            .handle(query())
            .await
            .unwrap();

        assert_eq!(cache.len().await, 2);
        assert_eq!(cached_astro, fresh_astro);
    }
}
