//! Test fixtures for fleet-router.
//!
//! Real-world locations with known straight-line separations, plus helpers
//! turning them into waypoints and destinations.

pub mod locations;

pub use locations::*;
