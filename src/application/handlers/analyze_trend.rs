//! AnalyzeTrendHandler - Query handler for multi-year trends.

use tracing::info;

use super::support::{settings_variant, CacheSlot};
use crate::domain::foundation::{DomainError, ErrorCode, YearRange};
use crate::domain::grading::NatalContext;
use crate::domain::profile::NatalProfile;
use crate::domain::trend::{TrendAnalyzer, TrendResult};
use crate::ports::CacheKey;

/// Query for yearly scores across a range.
#[derive(Debug, Clone)]
pub struct AnalyzeTrendQuery {
    pub profile: NatalProfile,
    pub range: YearRange,
}

/// Result of a successful trend query.
pub type AnalyzeTrendResult = TrendResult;

/// Handler for multi-year trends.
pub struct AnalyzeTrendHandler {
    analyzer: TrendAnalyzer,
    cache: CacheSlot,
}

impl AnalyzeTrendHandler {
    pub fn new(analyzer: TrendAnalyzer) -> Self {
        Self {
            analyzer,
            cache: CacheSlot::none(),
        }
    }

    pub fn with_cache(mut self, cache: CacheSlot) -> Self {
        self.cache = cache;
        self
    }

    pub async fn handle(&self, query: AnalyzeTrendQuery) -> Result<AnalyzeTrendResult, DomainError> {
        let max_years = self.analyzer.settings().max_years;
        if query.range.len_years() > max_years {
            return Err(DomainError::new(
                ErrorCode::InvalidRange,
                format!(
                    "trend range of {} years exceeds the limit of {}",
                    query.range.len_years(),
                    max_years
                ),
            )
            .with_detail("field", "range"));
        }

        let ctx = NatalContext::new(query.profile);
        let key = CacheKey::trend(ctx.fingerprint(), query.range.start, query.range.end)
            .with_variant(settings_variant(self.analyzer.settings(), false));
        if let Some(cached) = self.cache.load::<TrendResult>(&key).await {
            return Ok(cached);
        }

        let result = self.analyzer.analyze(&ctx, &query.range);
        if ctx.profile().daeun_cycles().is_empty() {
            info!("Profile has no Daeun cycles, trend uses year pillars only");
        }
        info!(
            start = query.range.start,
            end = query.range.end,
            trend = result.overall_trend.as_key(),
            peaks = result.peak_years.len(),
            transitions = result.daeun_transitions.len(),
            "Analyzed trend"
        );

        self.cache.store(&key, &result).await;
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::InMemoryFortuneCache;
    use crate::domain::pillars::{BirthMoment, FourPillarsCalculator};
    use crate::domain::profile::{BirthData, Gender};
    use chrono::{NaiveDate, NaiveTime};
    use std::sync::Arc;
    use std::time::Duration;

    fn test_profile(gender: Option<Gender>) -> NatalProfile {
        let birth = BirthData {
            moment: BirthMoment::new(
                NaiveDate::from_ymd_opt(1985, 3, 21).unwrap(),
                NaiveTime::from_hms_opt(14, 0, 0),
            ),
            gender,
        };
        NatalProfile::from_birth(&birth, &FourPillarsCalculator::default()).unwrap()
    }

    #[tokio::test]
    async fn test_analyzes_range() {
        let handler = AnalyzeTrendHandler::new(TrendAnalyzer::default());
        let result = handler
            .handle(AnalyzeTrendQuery {
                profile: test_profile(Some(Gender::Male)),
                range: YearRange::new(2020, 2035).unwrap(),
            })
            .await
            .unwrap();

        assert_eq!(result.yearly_scores.len(), 16);
        assert!(result
            .peak_years
            .iter()
            .all(|year| (2020..=2035).contains(year)));
    }

    #[tokio::test]
    async fn test_rejects_overlong_range() {
        let handler = AnalyzeTrendHandler::new(TrendAnalyzer::default());
        let err = handler
            .handle(AnalyzeTrendQuery {
                profile: test_profile(Some(Gender::Male)),
                range: YearRange::new(2000, 2040).unwrap(),
            })
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidRange);
    }

    #[tokio::test]
    async fn test_profile_without_cycles_has_no_transitions() {
        let handler = AnalyzeTrendHandler::new(TrendAnalyzer::default());
        let result = handler
            .handle(AnalyzeTrendQuery {
                profile: test_profile(None),
                range: YearRange::new(2020, 2029).unwrap(),
            })
            .await
            .unwrap();
        assert!(result.daeun_transitions.is_empty());
    }

    #[tokio::test]
    async fn test_cached_trend_is_reused() {
        let cache = Arc::new(InMemoryFortuneCache::new(4));
        let handler = AnalyzeTrendHandler::new(TrendAnalyzer::default())
            .with_cache(CacheSlot::new(cache.clone(), Duration::from_secs(60)));
        let query = AnalyzeTrendQuery {
            profile: test_profile(Some(Gender::Female)),
            range: YearRange::new(2025, 2030).unwrap(),
        };

        let first = handler.handle(query.clone()).await.unwrap();
        let second = handler.handle(query).await.unwrap();
        assert_eq!(first.yearly_scores, second.yearly_scores);
        assert_eq!(first.peak_years, second.peak_years);
        assert_eq!(first.overall_trend, second.overall_trend);
        assert_eq!(cache.len().await, 1);
    }
}
