//! Astro snapshot port.
//!
//! The engine never computes ephemeris itself. Providers supply per-day
//! transit snapshots; a missing snapshot means astrology is skipped for that
//! day.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::domain::astrology::AstroSnapshot;
use crate::domain::foundation::DateRange;

/// Port for per-day planetary snapshots.
#[async_trait]
pub trait AstroSnapshotProvider: Send + Sync {
    /// Snapshot for one date, `None` when the provider has no data.
    async fn snapshot(&self, date: NaiveDate) -> Result<Option<AstroSnapshot>, EphemerisError>;

    /// Snapshots for every covered day of a range.
    ///
    /// Days without data are absent from the map.
    async fn snapshots(
        &self,
        range: &DateRange,
    ) -> Result<HashMap<NaiveDate, AstroSnapshot>, EphemerisError> {
        let mut out = HashMap::with_capacity(range.len_days());
        for date in range.days() {
            if let Some(snapshot) = self.snapshot(date).await? {
                out.insert(date, snapshot);
            }
        }
        Ok(out)
    }
}

/// Errors that can occur while fetching snapshots.
#[derive(Debug, thiserror::Error)]
pub enum EphemerisError {
    /// Provider backend is unavailable.
    #[error("ephemeris unavailable: {0}")]
    Unavailable(String),

    /// Provider cannot compute positions for the date.
    #[error("date outside ephemeris coverage: {0}")]
    OutOfCoverage(NaiveDate),
}
