//! Domain logic for fleet location tracking.
//!
//! Pure classification and validation live here together with the
//! [`store::LocationStore`] seam that storage backends implement.

pub mod error;
pub mod history;
pub mod location;
pub mod movement;
pub mod store;
pub mod tracking;
pub mod types;
