//! Core seams of the routing engine.
//!
//! These are intentionally minimal. The graph itself only knows node indices;
//! everything carrying a real-world identity lives at this layer.

use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::haversine::Coordinate;
use crate::shortest_path::Budget;

/// Provides pairwise distances (km) for a set of locations.
///
/// The matrix is indexed by the provided location order. A `None` cell means
/// there is no way to travel between the two points and no edge is created.
/// Implementations must only return non-negative distances.
pub trait DistanceSource {
    fn distances_for(&self, locations: &[Coordinate]) -> Result<Vec<Vec<Option<f64>>>, EngineError>;

    /// Like [`DistanceSource::distances_for`], bounded by `budget`.
    ///
    /// Sources doing slow work (network calls) should override this and stop
    /// once the budget runs out.
    fn distances_within(
        &self,
        locations: &[Coordinate],
        budget: &Budget,
    ) -> Result<Vec<Vec<Option<f64>>>, EngineError> {
        budget.check()?;
        self.distances_for(locations)
    }
}

/// A named point handed to the graph builder.
///
/// The builder assigns node `i` to the `i`-th waypoint; callers keep the
/// id-to-index mapping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Waypoint {
    pub id: String,
    pub coordinate: Coordinate,
}

impl Waypoint {
    pub fn new(id: impl Into<String>, latitude: f64, longitude: f64) -> Self {
        Self {
            id: id.into(),
            coordinate: Coordinate::new(latitude, longitude),
        }
    }
}
