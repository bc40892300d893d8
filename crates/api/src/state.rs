use fleetintel_core::tracking::LocationTracker;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheap to clone: the tracker holds its store behind an `Arc`. Server
/// configuration is consumed when the router is built and is not kept here.
#[derive(Clone)]
pub struct AppState {
    /// Location ingestion and query service over the configured store.
    pub tracker: LocationTracker,
}
