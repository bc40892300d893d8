//! Handlers for location tracking endpoints.
//!
//! Thin adapters over [`LocationTracker`](fleetintel_core::tracking::LocationTracker):
//! parse the request, call the core, wrap the result. Empty query results
//! are reported as 404 here; the core treats them as success.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use fleetintel_core::location::{LocationPing, LocationRecord};
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::query::HistoryParams;
use crate::response::{CountedResponse, DataResponse};
use crate::state::AppState;

/// Payload of the count endpoint.
#[derive(Debug, Serialize)]
pub struct LocationCount {
    pub agent_id: String,
    pub count: i64,
}

/// POST /api/v1/tracking/location
///
/// Validate, classify and store a GPS ping.
pub async fn update_location(
    State(state): State<AppState>,
    Json(ping): Json<LocationPing>,
) -> AppResult<(StatusCode, Json<DataResponse<LocationRecord>>)> {
    let record = state.tracker.record_ping(ping).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: record })))
}

/// GET /api/v1/tracking/location/{agent_id}
///
/// Latest known location for an agent.
pub async fn get_live_location(
    State(state): State<AppState>,
    Path(agent_id): Path<String>,
) -> AppResult<Json<DataResponse<LocationRecord>>> {
    let record = state
        .tracker
        .latest(&agent_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("No location found for agent {agent_id}")))?;
    Ok(Json(DataResponse { data: record }))
}

/// GET /api/v1/tracking/history/{agent_id}?from=&to=&limit=
///
/// Either the most recent `limit` records (default 100, max 1000), newest
/// first, or every record between `from` and `to` inclusive, oldest first.
pub async fn get_location_history(
    State(state): State<AppState>,
    Path(agent_id): Path<String>,
    Query(params): Query<HistoryParams>,
) -> AppResult<Json<CountedResponse<LocationRecord>>> {
    let selector = params.selector()?;
    let records = state.tracker.history(&agent_id, selector).await?;

    if records.is_empty() {
        return Err(AppError::NotFound(format!(
            "No location history found for agent {agent_id}"
        )));
    }

    tracing::info!(agent_id = %agent_id, count = records.len(), "Retrieved location history");
    Ok(Json(CountedResponse::from(records)))
}

/// GET /api/v1/tracking/location/{agent_id}/count
///
/// Number of records stored for an agent. Zero is a valid answer.
pub async fn get_location_count(
    State(state): State<AppState>,
    Path(agent_id): Path<String>,
) -> AppResult<Json<DataResponse<LocationCount>>> {
    let count = state.tracker.count(&agent_id).await?;
    Ok(Json(DataResponse {
        data: LocationCount { agent_id, count },
    }))
}
