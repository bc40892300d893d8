pub mod health;
pub mod tracking;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /tracking/location                     ingest a ping (POST)
/// /tracking/location/{agent_id}          live location (GET)
/// /tracking/location/{agent_id}/count    stored record count (GET)
/// /tracking/history/{agent_id}           history, ?from=&to=&limit= (GET)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new().nest("/tracking", tracking::router())
}
