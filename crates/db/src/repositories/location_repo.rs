//! Repository for the `locations` table (append-only time-series).

use fleetintel_core::location::{LocationRecord, NewLocation};
use fleetintel_core::types::Timestamp;
use sqlx::PgPool;

use crate::models::location::LocationRow;

/// Column list for `locations` SELECT queries (includes `id` and `created_at`).
const COLUMNS: &str = "\
    id, agent_id, latitude, longitude, speed, heading, accuracy, \
    status, timestamp_source, recorded_at, created_at";

/// Column list for `locations` INSERT statements (excludes auto-generated `id` and `created_at`).
const INSERT_COLUMNS: &str = "\
    agent_id, latitude, longitude, speed, heading, accuracy, \
    status, timestamp_source, recorded_at";

/// Provides query operations for location records.
///
/// There is deliberately no update or delete: corrections are new rows.
pub struct LocationRepo;

impl LocationRepo {
    /// Insert a single location record.
    pub async fn insert(pool: &PgPool, location: &NewLocation) -> Result<LocationRecord, sqlx::Error> {
        let query = format!(
            "INSERT INTO locations ({INSERT_COLUMNS}) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) \
             RETURNING {COLUMNS}"
        );
        let row = sqlx::query_as::<_, LocationRow>(&query)
            .bind(&location.agent_id)
            .bind(location.latitude)
            .bind(location.longitude)
            .bind(location.speed)
            .bind(location.heading)
            .bind(location.accuracy)
            .bind(location.status.as_str())
            .bind(location.timestamp_source.as_str())
            .bind(location.timestamp)
            .fetch_one(pool)
            .await?;
        into_record(row)
    }

    /// Get the record with the latest `recorded_at` for an agent.
    pub async fn find_latest_by_agent(
        pool: &PgPool,
        agent_id: &str,
    ) -> Result<Option<LocationRecord>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM locations \
             WHERE agent_id = $1 \
             ORDER BY recorded_at DESC, id DESC \
             LIMIT 1"
        );
        sqlx::query_as::<_, LocationRow>(&query)
            .bind(agent_id)
            .fetch_optional(pool)
            .await?
            .map(into_record)
            .transpose()
    }

    /// Get up to `limit` most recent records for an agent, newest first.
    pub async fn find_by_agent(
        pool: &PgPool,
        agent_id: &str,
        limit: i64,
    ) -> Result<Vec<LocationRecord>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM locations \
             WHERE agent_id = $1 \
             ORDER BY recorded_at DESC, id DESC \
             LIMIT $2"
        );
        sqlx::query_as::<_, LocationRow>(&query)
            .bind(agent_id)
            .bind(limit)
            .fetch_all(pool)
            .await?
            .into_iter()
            .map(into_record)
            .collect()
    }

    /// Get records for an agent within a closed time range, oldest first.
    pub async fn find_by_agent_and_range(
        pool: &PgPool,
        agent_id: &str,
        start: Timestamp,
        end: Timestamp,
    ) -> Result<Vec<LocationRecord>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM locations \
             WHERE agent_id = $1 AND recorded_at >= $2 AND recorded_at <= $3 \
             ORDER BY recorded_at ASC, id ASC"
        );
        sqlx::query_as::<_, LocationRow>(&query)
            .bind(agent_id)
            .bind(start)
            .bind(end)
            .fetch_all(pool)
            .await?
            .into_iter()
            .map(into_record)
            .collect()
    }

    /// Count all records stored for an agent.
    pub async fn count_by_agent(pool: &PgPool, agent_id: &str) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM locations WHERE agent_id = $1")
            .bind(agent_id)
            .fetch_one(pool)
            .await
    }
}

/// Convert a row, surfacing unknown enum values as a decode error.
fn into_record(row: LocationRow) -> Result<LocationRecord, sqlx::Error> {
    LocationRecord::try_from(row).map_err(|e| {
        tracing::error!(error = %e, "Undecodable location row");
        sqlx::Error::Decode(Box::new(e))
    })
}
