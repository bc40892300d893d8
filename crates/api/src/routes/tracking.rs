//! Route definitions for location tracking.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::tracking;
use crate::state::AppState;

/// Routes mounted at `/tracking`.
///
/// ```text
/// POST /location                    -> update_location
/// GET  /location/{agent_id}         -> get_live_location
/// GET  /location/{agent_id}/count   -> get_location_count
/// GET  /history/{agent_id}          -> get_location_history
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/location", post(tracking::update_location))
        .route("/location/{agent_id}", get(tracking::get_live_location))
        .route(
            "/location/{agent_id}/count",
            get(tracking::get_location_count),
        )
        .route("/history/{agent_id}", get(tracking::get_location_history))
}
