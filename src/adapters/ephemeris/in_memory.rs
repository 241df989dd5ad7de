//! In-memory snapshot provider for tests and precomputed data.

use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::astrology::AstroSnapshot;
use crate::ports::{AstroSnapshotProvider, EphemerisError};

/// Serves snapshots loaded ahead of time. Unknown dates have no snapshot.
#[derive(Debug, Clone, Default)]
pub struct InMemorySnapshotProvider {
    snapshots: Arc<RwLock<HashMap<NaiveDate, AstroSnapshot>>>,
}

impl InMemorySnapshotProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_snapshots(snapshots: HashMap<NaiveDate, AstroSnapshot>) -> Self {
        Self {
            snapshots: Arc::new(RwLock::new(snapshots)),
        }
    }

    pub async fn insert(&self, date: NaiveDate, snapshot: AstroSnapshot) {
        self.snapshots.write().await.insert(date, snapshot);
    }
}

#[async_trait]
impl AstroSnapshotProvider for InMemorySnapshotProvider {
    async fn snapshot(&self, date: NaiveDate) -> Result<Option<AstroSnapshot>, EphemerisError> {
        Ok(self.snapshots.read().await.get(&date).cloned())
    }
}
