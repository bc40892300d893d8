//! Shared query parameter types for API handlers.

use fleetintel_core::error::CoreError;
use fleetintel_core::history::HistorySelector;
use serde::Deserialize;

/// Query parameters for the history endpoint (`?from=&to=&limit=`).
///
/// All three are kept as raw strings so a bad `limit` never rejects the
/// request; see [`HistorySelector::from_params`] for how they combine.
#[derive(Debug, Default, Deserialize)]
pub struct HistoryParams {
    pub from: Option<String>,
    pub to: Option<String>,
    pub limit: Option<String>,
}

impl HistoryParams {
    pub fn selector(&self) -> Result<HistorySelector, CoreError> {
        HistorySelector::from_params(
            self.from.as_deref(),
            self.to.as_deref(),
            self.limit.as_deref(),
        )
    }
}
