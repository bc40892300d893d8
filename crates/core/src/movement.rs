//! Movement status derived from a reported speed.
//!
//! The status is computed once at ingestion and stored alongside the raw
//! speed, so every reader sees the same label.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Speed (km/h) at or above which an agent counts as moving.
pub const MOVING_SPEED_KMH: f64 = 5.0;

/// Movement state of an agent at the time of a ping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MovementStatus {
    Stopped,
    Idle,
    Moving,
    Unknown,
}

impl MovementStatus {
    /// Storage and wire name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Stopped => "stopped",
            Self::Idle => "idle",
            Self::Moving => "moving",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for MovementStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MovementStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "stopped" => Ok(Self::Stopped),
            "idle" => Ok(Self::Idle),
            "moving" => Ok(Self::Moving),
            "unknown" => Ok(Self::Unknown),
            other => Err(format!("Unknown movement status: '{other}'")),
        }
    }
}

/// Classify a speed in km/h.
///
/// Total over `f64`: negative speeds and NaN map to [`MovementStatus::Unknown`]
/// rather than being rejected. Rejecting bad input is the caller's concern.
#[allow(clippy::float_cmp)]
pub fn classify(speed: f64) -> MovementStatus {
    if speed == 0.0 {
        MovementStatus::Stopped
    } else if speed > 0.0 && speed < MOVING_SPEED_KMH {
        MovementStatus::Idle
    } else if speed >= MOVING_SPEED_KMH {
        MovementStatus::Moving
    } else {
        MovementStatus::Unknown
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
