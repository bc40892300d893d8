//! History query selection.
//!
//! A history query is either "the most recent N records" or "everything in a
//! closed time window". When a caller supplies both, the window wins and the
//! limit is ignored; [`HistorySelector::from_params`] is the one place that
//! rule is applied.

use crate::error::CoreError;
use crate::location::{parse_timestamp, TIMESTAMP_FORMAT_HINT};
use crate::types::Timestamp;

/// Number of records returned when no limit is given.
pub const DEFAULT_HISTORY_LIMIT: i64 = 100;

/// Largest limit a caller may request.
pub const MAX_HISTORY_LIMIT: i64 = 1000;

/// Which slice of an agent's history to return.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistorySelector {
    /// Most recent `limit` records, newest first.
    Recent { limit: i64 },
    /// Records with `from <= timestamp <= to`, oldest first.
    Window { from: Timestamp, to: Timestamp },
}

impl Default for HistorySelector {
    fn default() -> Self {
        Self::Recent {
            limit: DEFAULT_HISTORY_LIMIT,
        }
    }
}

impl HistorySelector {
    /// Build a selector from raw query parameters.
    ///
    /// A window is selected only when both bounds are present and non-empty;
    /// the limit is then ignored, even when malformed. A lone bound falls
    /// back to [`Self::Recent`], where a blank or non-numeric limit means the
    /// default.
    pub fn from_params(
        from: Option<&str>,
        to: Option<&str>,
        limit: Option<&str>,
    ) -> Result<Self, CoreError> {
        let from = from.map(str::trim).filter(|s| !s.is_empty());
        let to = to.map(str::trim).filter(|s| !s.is_empty());

        match (from, to) {
            (Some(from), Some(to)) => {
                let (Some(from), Some(to)) = (parse_timestamp(from), parse_timestamp(to)) else {
                    return Err(CoreError::Validation(format!(
                        "Invalid time format. Use {TIMESTAMP_FORMAT_HINT}"
                    )));
                };
                Self::window(from, to)
            }
            _ => Ok(Self::recent(parse_limit(limit))),
        }
    }

    /// Most-recent selector with the limit clamped to `1..=MAX_HISTORY_LIMIT`.
    pub fn recent(limit: Option<i64>) -> Self {
        Self::Recent {
            limit: clamp_limit(limit, DEFAULT_HISTORY_LIMIT, MAX_HISTORY_LIMIT),
        }
    }

    /// Closed time window. Fails when `from` is after `to`.
    pub fn window(from: Timestamp, to: Timestamp) -> Result<Self, CoreError> {
        if from > to {
            return Err(CoreError::Validation(
                "'from' must not be after 'to'".to_string(),
            ));
        }
        Ok(Self::Window { from, to })
    }
}

/// Parse a raw `limit` parameter; anything that is not an integer is absent.
pub fn parse_limit(raw: Option<&str>) -> Option<i64> {
    raw.and_then(|s| s.trim().parse().ok())
}

/// Clamp a user-provided limit to `[1, max]`, using `default` when absent.
pub fn clamp_limit(limit: Option<i64>, default: i64, max: i64) -> i64 {
    limit.unwrap_or(default).max(1).min(max)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
