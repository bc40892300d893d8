//! Storage seam for location records.
//!
//! Backends own the record lifecycle: they assign identifiers and ingestion
//! timestamps, and never mutate a record once written.
//!
//! # Implementations
//!
//! - `PgLocationStore` (in `fleetintel-db`): PostgreSQL storage
//! - [`memory::MemoryLocationStore`]: in-process, non-durable storage

pub mod memory;

use std::error::Error;
use std::fmt;

use async_trait::async_trait;

use crate::location::{LocationRecord, NewLocation};
use crate::types::Timestamp;

/// Append-only, agent-partitioned store of location records.
///
/// Ordering is always by event timestamp (`LocationRecord::timestamp`), with
/// the record id as a tie-breaker. Never by arrival order.
#[async_trait]
pub trait LocationStore: Send + Sync {
    /// Persist a new record and return it with its assigned id.
    async fn insert(&self, location: &NewLocation) -> Result<LocationRecord, StorageError>;

    /// The record with the greatest event timestamp for `agent_id`.
    async fn select_latest(&self, agent_id: &str) -> Result<Option<LocationRecord>, StorageError>;

    /// Up to `limit` most recent records, newest first.
    async fn select_by_agent(
        &self,
        agent_id: &str,
        limit: i64,
    ) -> Result<Vec<LocationRecord>, StorageError>;

    /// Records with `start <= timestamp <= end`, oldest first.
    async fn select_by_agent_and_range(
        &self,
        agent_id: &str,
        start: Timestamp,
        end: Timestamp,
    ) -> Result<Vec<LocationRecord>, StorageError>;

    /// Number of records stored for `agent_id`.
    async fn count_by_agent(&self, agent_id: &str) -> Result<i64, StorageError>;

    /// Verify the backing medium is reachable.
    async fn health_check(&self) -> Result<(), StorageError>;
}

/// A failure of the storage medium.
///
/// Wraps the backend's own error untouched; use [`StorageError::downcast_ref`]
/// to inspect it.
#[derive(Debug)]
pub struct StorageError {
    source: Box<dyn Error + Send + Sync + 'static>,
}

impl StorageError {
    pub fn new<E>(err: E) -> Self
    where
        E: Error + Send + Sync + 'static,
    {
        Self {
            source: Box::new(err),
        }
    }

    /// The backend error, if it is of type `E`.
    pub fn downcast_ref<E>(&self) -> Option<&E>
    where
        E: Error + 'static,
    {
        self.source.downcast_ref::<E>()
    }
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.source, f)
    }
}

impl Error for StorageError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(self.source.as_ref())
    }
}
