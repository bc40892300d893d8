//! Row model for the `locations` table.

use fleetintel_core::location::LocationRecord;
use fleetintel_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// A `locations` row as stored.
///
/// `status` and `timestamp_source` are TEXT columns guarded by CHECK
/// constraints; they are parsed back into enums on the way out.
#[derive(Debug, Clone, FromRow)]
pub struct LocationRow {
    pub id: DbId,
    pub agent_id: String,
    pub latitude: f64,
    pub longitude: f64,
    pub speed: f64,
    pub heading: f64,
    pub accuracy: f64,
    pub status: String,
    pub timestamp_source: String,
    pub recorded_at: Timestamp,
    pub created_at: Timestamp,
}

/// A stored enum column held a value the application does not know.
#[derive(Debug, thiserror::Error)]
#[error("location {id}: invalid {column}: {message}")]
pub struct InvalidLocationRow {
    pub id: DbId,
    pub column: &'static str,
    pub message: String,
}

impl TryFrom<LocationRow> for LocationRecord {
    type Error = InvalidLocationRow;

    fn try_from(row: LocationRow) -> Result<Self, Self::Error> {
        let status = row.status.parse().map_err(|message| InvalidLocationRow {
            id: row.id,
            column: "status",
            message,
        })?;
        let timestamp_source = row
            .timestamp_source
            .parse()
            .map_err(|message| InvalidLocationRow {
                id: row.id,
                column: "timestamp_source",
                message,
            })?;

        Ok(LocationRecord {
            id: row.id,
            agent_id: row.agent_id,
            latitude: row.latitude,
            longitude: row.longitude,
            speed: row.speed,
            heading: row.heading,
            accuracy: row.accuracy,
            status,
            timestamp: row.recorded_at,
            timestamp_source,
            created_at: row.created_at,
        })
    }
}
