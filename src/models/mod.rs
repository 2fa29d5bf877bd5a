//! Data models for the Trip Planner application.
//!
//! These models match the JSON the browser app keeps for its trips, so a
//! backup file exported by either side can be read by the other.
//! Unset optional fields are written as `null`, so every key the browser app
//! writes is still present after a round trip.

mod container;
mod revision;
mod trip;

pub use container::*;
pub use revision::*;
pub use trip::*;
