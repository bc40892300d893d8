//! In-process location store.
//!
//! Non-durable: records live as long as the process. Used for local
//! development (`LOCATION_STORE=memory`) and tests.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use super::{LocationStore, StorageError};
use crate::location::{LocationRecord, NewLocation};
use crate::types::{DbId, Timestamp};

#[derive(Debug, Default)]
struct Inner {
    last_id: DbId,
    /// Per-agent records kept sorted by `(timestamp, id)` ascending.
    by_agent: HashMap<String, Vec<LocationRecord>>,
}

/// Location store backed by a `HashMap` behind a single `RwLock`.
#[derive(Debug, Default)]
pub struct MemoryLocationStore {
    inner: RwLock<Inner>,
}

impl MemoryLocationStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl LocationStore for MemoryLocationStore {
    async fn insert(&self, location: &NewLocation) -> Result<LocationRecord, StorageError> {
        let mut inner = self.inner.write().await;
        inner.last_id += 1;

        let record = LocationRecord {
            id: inner.last_id,
            agent_id: location.agent_id.clone(),
            latitude: location.latitude,
            longitude: location.longitude,
            speed: location.speed,
            heading: location.heading,
            accuracy: location.accuracy,
            status: location.status,
            timestamp: location.timestamp,
            timestamp_source: location.timestamp_source,
            created_at: Utc::now(),
        };

        let records = inner
            .by_agent
            .entry(record.agent_id.clone())
            .or_default();
        // The new id is the largest, so it sorts after equal timestamps.
        let pos = records.partition_point(|r| r.timestamp <= record.timestamp);
        records.insert(pos, record.clone());

        Ok(record)
    }

    async fn select_latest(&self, agent_id: &str) -> Result<Option<LocationRecord>, StorageError> {
        let inner = self.inner.read().await;
        Ok(inner
            .by_agent
            .get(agent_id)
            .and_then(|records| records.last())
            .cloned())
    }

    async fn select_by_agent(
        &self,
        agent_id: &str,
        limit: i64,
    ) -> Result<Vec<LocationRecord>, StorageError> {
        let limit = usize::try_from(limit.max(0)).unwrap_or(usize::MAX);
        let inner = self.inner.read().await;
        Ok(inner
            .by_agent
            .get(agent_id)
            .map(|records| records.iter().rev().take(limit).cloned().collect())
            .unwrap_or_default())
    }

    async fn select_by_agent_and_range(
        &self,
        agent_id: &str,
        start: Timestamp,
        end: Timestamp,
    ) -> Result<Vec<LocationRecord>, StorageError> {
        let inner = self.inner.read().await;
        let Some(records) = inner.by_agent.get(agent_id) else {
            return Ok(Vec::new());
        };
        let lo = records.partition_point(|r| r.timestamp < start);
        let hi = records.partition_point(|r| r.timestamp <= end);
        Ok(records
            .get(lo..hi.max(lo))
            .map(<[LocationRecord]>::to_vec)
            .unwrap_or_default())
    }

    async fn count_by_agent(&self, agent_id: &str) -> Result<i64, StorageError> {
        let inner = self.inner.read().await;
        let count = inner.by_agent.get(agent_id).map_or(0, Vec::len);
        Ok(i64::try_from(count).unwrap_or(i64::MAX))
    }

    async fn health_check(&self) -> Result<(), StorageError> {
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
