//! Location pings, stored records, and ingestion-time validation.
//!
//! A [`LocationPing`] is what an agent reports. Validation plus timestamp
//! resolution plus classification turn it into a [`NewLocation`], which a
//! store persists as an immutable [`LocationRecord`].

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::movement::{classify, MovementStatus};
use crate::types::{DbId, Timestamp};

/// Accepted timestamp format, quoted in validation messages.
pub const TIMESTAMP_FORMAT_HINT: &str = "RFC3339 format: 2024-12-07T10:30:00Z";

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// A raw location report from a delivery agent.
///
/// Required fields may still be absent on the wire; they are checked by
/// [`LocationPing::into_new_location`] so the caller gets a validation error.
#[derive(Debug, Clone, Deserialize)]
pub struct LocationPing {
    #[serde(default)]
    pub agent_id: String,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    /// Speed in km/h.
    #[serde(default)]
    pub speed: f64,
    /// Heading in degrees.
    #[serde(default)]
    pub heading: f64,
    /// Horizontal accuracy in meters.
    #[serde(default)]
    pub accuracy: f64,
    /// Client-reported event time (RFC 3339).
    #[serde(default)]
    pub timestamp: Option<String>,
}

/// Where a record's event time came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimestampSource {
    /// The ping carried a parseable timestamp.
    Client,
    /// The timestamp was missing or unparseable; server time was used.
    Server,
}

impl TimestampSource {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Client => "client",
            Self::Server => "server",
        }
    }
}

impl fmt::Display for TimestampSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TimestampSource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "client" => Ok(Self::Client),
            "server" => Ok(Self::Server),
            other => Err(format!("Unknown timestamp source: '{other}'")),
        }
    }
}

/// A validated, classified ping ready to be appended.
///
/// Carries no id: identifiers are assigned by the store on insert.
#[derive(Debug, Clone, PartialEq)]
pub struct NewLocation {
    pub agent_id: String,
    pub latitude: f64,
    pub longitude: f64,
    pub speed: f64,
    pub heading: f64,
    pub accuracy: f64,
    pub status: MovementStatus,
    pub timestamp: Timestamp,
    pub timestamp_source: TimestampSource,
}

/// An immutable, stored location record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationRecord {
    pub id: DbId,
    pub agent_id: String,
    pub latitude: f64,
    pub longitude: f64,
    pub speed: f64,
    pub heading: f64,
    pub accuracy: f64,
    pub status: MovementStatus,
    /// Event time; all ordering uses this field.
    pub timestamp: Timestamp,
    pub timestamp_source: TimestampSource,
    /// Ingestion time, for audit only.
    pub created_at: Timestamp,
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Validate that an agent id is present.
pub fn validate_agent_id(agent_id: &str) -> Result<(), CoreError> {
    if agent_id.trim().is_empty() {
        return Err(CoreError::Validation("agent_id is required".to_string()));
    }
    Ok(())
}

/// Validate a coordinate pair.
///
/// `(0, 0)` is treated as missing coordinates and rejected, even though it
/// is a real point in the Gulf of Guinea.
#[allow(clippy::float_cmp)]
pub fn validate_coordinates(latitude: f64, longitude: f64) -> Result<(), CoreError> {
    if latitude == 0.0 && longitude == 0.0 {
        return Err(missing_coordinates());
    }
    if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
        return Err(CoreError::Validation(format!(
            "latitude must be between -90 and 90, got {latitude}"
        )));
    }
    if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
        return Err(CoreError::Validation(format!(
            "longitude must be between -180 and 180, got {longitude}"
        )));
    }
    Ok(())
}

fn missing_coordinates() -> CoreError {
    CoreError::Validation("latitude and longitude are required".to_string())
}

/// Parse an RFC 3339 timestamp into UTC.
pub fn parse_timestamp(raw: &str) -> Option<Timestamp> {
    DateTime::parse_from_rfc3339(raw.trim())
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Resolve the event time for a ping.
///
/// A parseable client timestamp wins; otherwise `now` is substituted and the
/// source is recorded as [`TimestampSource::Server`].
pub fn resolve_timestamp(raw: Option<&str>, now: Timestamp) -> (Timestamp, TimestampSource) {
    match raw.and_then(parse_timestamp) {
        Some(ts) => (ts, TimestampSource::Client),
        None => (now, TimestampSource::Server),
    }
}

impl LocationPing {
    /// Validate the ping and derive the record to append.
    pub fn into_new_location(self, now: Timestamp) -> Result<NewLocation, CoreError> {
        validate_agent_id(&self.agent_id)?;
        let (Some(latitude), Some(longitude)) = (self.latitude, self.longitude) else {
            return Err(missing_coordinates());
        };
        validate_coordinates(latitude, longitude)?;

        let (timestamp, timestamp_source) = resolve_timestamp(self.timestamp.as_deref(), now);
        if timestamp_source == TimestampSource::Server {
            tracing::debug!(
                agent_id = %self.agent_id,
                raw = ?self.timestamp,
                "Ping timestamp missing or unparseable, using server time",
            );
        }

        Ok(NewLocation {
            status: classify(self.speed),
            agent_id: self.agent_id,
            latitude,
            longitude,
            speed: self.speed,
            heading: self.heading,
            accuracy: self.accuracy,
            timestamp,
            timestamp_source,
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use chrono::TimeZone;

    use super::*;

    fn ping(lat: f64, lon: f64, speed: f64, timestamp: Option<&str>) -> LocationPing {
        LocationPing {
            agent_id: "A1".to_string(),
            latitude: Some(lat),
            longitude: Some(lon),
            speed,
            heading: 90.0,
            accuracy: 5.0,
            timestamp: timestamp.map(str::to_string),
        }
    }

    fn fixed_now() -> Timestamp {
        Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn valid_ping_is_classified_and_keeps_client_time() {
        let new = ping(12.97, 77.59, 0.0, Some("2024-01-01T10:00:00Z"))
            .into_new_location(fixed_now())
            .unwrap();
        assert_eq!(new.status, MovementStatus::Stopped);
        assert_eq!(new.timestamp_source, TimestampSource::Client);
        assert_eq!(
            new.timestamp,
            Utc.with_ymd_and_hms(2024, 1, 1, 10, 0, 0).unwrap()
        );
    }

    #[test]
    fn offset_timestamps_are_normalised_to_utc() {
        let new = ping(12.97, 77.59, 10.0, Some("2024-01-01T15:30:00+05:30"))
            .into_new_location(fixed_now())
            .unwrap();
        assert_eq!(
            new.timestamp,
            Utc.with_ymd_and_hms(2024, 1, 1, 10, 0, 0).unwrap()
        );
    }

    #[test]
    fn missing_timestamp_falls_back_to_server_time() {
        let new = ping(12.97, 77.59, 10.0, None)
            .into_new_location(fixed_now())
            .unwrap();
        assert_eq!(new.timestamp, fixed_now());
        assert_eq!(new.timestamp_source, TimestampSource::Server);
    }

    #[test]
    fn unparseable_timestamp_falls_back_to_server_time() {
        let new = ping(12.97, 77.59, 10.0, Some("yesterday at noon"))
            .into_new_location(fixed_now())
            .unwrap();
        assert_eq!(new.timestamp, fixed_now());
        assert_eq!(new.timestamp_source, TimestampSource::Server);
    }

    #[test]
    fn zero_zero_coordinates_are_rejected() {
        let result = ping(0.0, 0.0, 10.0, None).into_new_location(fixed_now());
        assert_matches!(result, Err(CoreError::Validation(msg)) if msg.contains("required"));
    }

    #[test]
    fn absent_coordinates_are_rejected_as_missing() {
        let mut p = ping(12.97, 77.59, 10.0, None);
        p.longitude = None;
        assert_matches!(
            p.into_new_location(fixed_now()),
            Err(CoreError::Validation(msg)) if msg == "latitude and longitude are required"
        );
    }

    #[test]
    fn single_zero_coordinate_is_accepted() {
        assert!(validate_coordinates(0.0, 77.59).is_ok());
        assert!(validate_coordinates(12.97, 0.0).is_ok());
    }

    #[test]
    fn out_of_range_coordinates_are_rejected() {
        assert_matches!(
            validate_coordinates(91.0, 10.0),
            Err(CoreError::Validation(_))
        );
        assert_matches!(
            validate_coordinates(10.0, -180.5),
            Err(CoreError::Validation(_))
        );
        assert_matches!(
            validate_coordinates(f64::NAN, 10.0),
            Err(CoreError::Validation(_))
        );
    }

    #[test]
    fn boundary_coordinates_are_accepted() {
        assert!(validate_coordinates(90.0, 180.0).is_ok());
        assert!(validate_coordinates(-90.0, -180.0).is_ok());
    }

    #[test]
    fn blank_agent_id_is_rejected() {
        let mut p = ping(12.97, 77.59, 0.0, None);
        p.agent_id = "   ".to_string();
        assert_matches!(
            p.into_new_location(fixed_now()),
            Err(CoreError::Validation(msg)) if msg == "agent_id is required"
        );
    }

    #[test]
    fn negative_speed_is_stored_as_unknown() {
        let new = ping(12.97, 77.59, -1.0, None)
            .into_new_location(fixed_now())
            .unwrap();
        assert_eq!(new.status, MovementStatus::Unknown);
    }

    #[test]
    fn ping_deserializes_with_optional_fields_defaulted() {
        let p: LocationPing =
            serde_json::from_str(r#"{"agent_id":"A1","latitude":1.5,"longitude":2.5}"#).unwrap();
        assert_eq!(p.speed, 0.0);
        assert_eq!(p.heading, 0.0);
        assert!(p.timestamp.is_none());
    }

    #[test]
    fn ping_without_required_fields_still_deserializes() {
        let p: LocationPing = serde_json::from_str(r#"{"latitude":12.97}"#).unwrap();
        assert_eq!(p.agent_id, "");
        assert_eq!(p.latitude, Some(12.97));
        assert!(p.longitude.is_none());
        assert_matches!(
            p.into_new_location(fixed_now()),
            Err(CoreError::Validation(msg)) if msg == "agent_id is required"
        );
    }
}
