//! PostgreSQL implementation of the location storage seam.

use async_trait::async_trait;
use fleetintel_core::location::{LocationRecord, NewLocation};
use fleetintel_core::store::{LocationStore, StorageError};
use fleetintel_core::types::Timestamp;

use crate::repositories::LocationRepo;
use crate::DbPool;

/// [`LocationStore`] backed by the `locations` table.
///
/// Concurrency is left to PostgreSQL; records are insert-only so there are
/// no read-modify-write cycles to guard.
#[derive(Debug, Clone)]
pub struct PgLocationStore {
    pool: DbPool,
}

impl PgLocationStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LocationStore for PgLocationStore {
    async fn insert(&self, location: &NewLocation) -> Result<LocationRecord, StorageError> {
        LocationRepo::insert(&self.pool, location)
            .await
            .map_err(StorageError::new)
    }

    async fn select_latest(&self, agent_id: &str) -> Result<Option<LocationRecord>, StorageError> {
        LocationRepo::find_latest_by_agent(&self.pool, agent_id)
            .await
            .map_err(StorageError::new)
    }

    async fn select_by_agent(
        &self,
        agent_id: &str,
        limit: i64,
    ) -> Result<Vec<LocationRecord>, StorageError> {
        LocationRepo::find_by_agent(&self.pool, agent_id, limit)
            .await
            .map_err(StorageError::new)
    }

    async fn select_by_agent_and_range(
        &self,
        agent_id: &str,
        start: Timestamp,
        end: Timestamp,
    ) -> Result<Vec<LocationRecord>, StorageError> {
        LocationRepo::find_by_agent_and_range(&self.pool, agent_id, start, end)
            .await
            .map_err(StorageError::new)
    }

    async fn count_by_agent(&self, agent_id: &str) -> Result<i64, StorageError> {
        LocationRepo::count_by_agent(&self.pool, agent_id)
            .await
            .map_err(StorageError::new)
    }

    async fn health_check(&self) -> Result<(), StorageError> {
        crate::health_check(&self.pool)
            .await
            .map_err(StorageError::new)
    }
}
