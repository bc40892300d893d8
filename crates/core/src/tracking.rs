//! Location ingestion and query service.
//!
//! Ties validation, classification and the storage seam together. Holds no
//! state of its own; every call reads through to the store.

use std::sync::Arc;

use chrono::Utc;

use crate::error::CoreError;
use crate::history::{clamp_limit, HistorySelector, DEFAULT_HISTORY_LIMIT, MAX_HISTORY_LIMIT};
use crate::location::{validate_agent_id, LocationPing, LocationRecord};
use crate::store::LocationStore;

/// Entry point for the three location operations plus record counting.
///
/// Cheaply cloneable; the store is shared behind an `Arc`.
#[derive(Clone)]
pub struct LocationTracker {
    store: Arc<dyn LocationStore>,
}

impl LocationTracker {
    pub fn new(store: Arc<dyn LocationStore>) -> Self {
        Self { store }
    }

    /// Validate, classify and append a ping.
    pub async fn record_ping(&self, ping: LocationPing) -> Result<LocationRecord, CoreError> {
        let location = ping.into_new_location(Utc::now())?;
        let record = self.store.insert(&location).await.map_err(|e| {
            tracing::error!(error = %e, agent_id = %location.agent_id, "Failed to save location");
            e
        })?;

        tracing::info!(
            agent_id = %record.agent_id,
            status = %record.status,
            lat = record.latitude,
            lng = record.longitude,
            speed_kmh = record.speed,
            timestamp_source = %record.timestamp_source,
            id = record.id,
            "Location saved",
        );
        Ok(record)
    }

    /// Most recent record for an agent, or `None` when it has no history.
    pub async fn latest(&self, agent_id: &str) -> Result<Option<LocationRecord>, CoreError> {
        validate_agent_id(agent_id)?;
        let record = self.store.select_latest(agent_id).await?;
        if let Some(record) = &record {
            tracing::debug!(agent_id, status = %record.status, "Fetched live location");
        }
        Ok(record)
    }

    /// A slice of an agent's history. An empty result is not an error.
    pub async fn history(
        &self,
        agent_id: &str,
        selector: HistorySelector,
    ) -> Result<Vec<LocationRecord>, CoreError> {
        validate_agent_id(agent_id)?;
        let records = match selector {
            HistorySelector::Recent { limit } => {
                let limit = clamp_limit(Some(limit), DEFAULT_HISTORY_LIMIT, MAX_HISTORY_LIMIT);
                self.store.select_by_agent(agent_id, limit).await?
            }
            HistorySelector::Window { from, to } => {
                self.store
                    .select_by_agent_and_range(agent_id, from, to)
                    .await?
            }
        };
        tracing::debug!(agent_id, ?selector, count = records.len(), "Fetched location history");
        Ok(records)
    }

    /// Number of records stored for an agent.
    pub async fn count(&self, agent_id: &str) -> Result<i64, CoreError> {
        validate_agent_id(agent_id)?;
        Ok(self.store.count_by_agent(agent_id).await?)
    }

    /// Check that the underlying store is reachable.
    pub async fn health_check(&self) -> Result<(), CoreError> {
        Ok(self.store.health_check().await?)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
