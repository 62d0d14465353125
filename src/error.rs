//! Error types for graph construction, search, and job execution.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Stable classification of a failure.
///
/// Job results carry the kind next to the human-readable message so callers
/// can branch on it without parsing text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    InvalidInput,
    NegativeWeight,
    Unreachable,
    Stranded,
    Timeout,
    Unsupported,
    Provider,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    /// Latitude/longitude is NaN, infinite, or outside the valid range.
    #[error("invalid coordinate at index {index}: ({latitude}, {longitude})")]
    InvalidCoordinate {
        index: usize,
        latitude: f64,
        longitude: f64,
    },

    /// A request that needs at least one entry was given none.
    #[error("empty input: {0}")]
    EmptyInput(&'static str),

    /// Input failed a domain check other than coordinate range.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Edge weight is negative or not finite.
    #[error("edge {from} -> {to} has invalid weight {weight}")]
    NegativeWeight { from: usize, to: usize, weight: f64 },

    /// Search started from a node the graph does not contain.
    #[error("node {node} is not in the graph (vertex count {vertex_count})")]
    UnknownNode { node: usize, vertex_count: usize },

    /// One or more destinations have no path from the route's current position.
    #[error("no route to destination(s): {}", .destinations.join(", "))]
    Unreachable { destinations: Vec<String> },

    /// Every destination is reachable from the start, but from `at` no next
    /// stop leaves the rest of the route reachable on a one-way network.
    #[error("route stranded at {at}: no next stop keeps {} reachable", .remaining.join(", "))]
    Stranded { at: String, remaining: Vec<String> },

    /// The computation budget elapsed, or the job was cancelled.
    #[error("computation exceeded its budget of {budget:?}")]
    Timeout { budget: Option<Duration> },

    /// The request asks for something the engine does not implement.
    #[error("unsupported request: {0}")]
    Unsupported(String),

    /// The distance source failed to produce distances.
    #[error("distance source failed: {0}")]
    Provider(String),
}

impl EngineError {
    pub fn kind(&self) -> FailureKind {
        match self {
            EngineError::InvalidCoordinate { .. }
            | EngineError::EmptyInput(_)
            | EngineError::InvalidInput(_)
            | EngineError::UnknownNode { .. } => FailureKind::InvalidInput,
            EngineError::NegativeWeight { .. } => FailureKind::NegativeWeight,
            EngineError::Unreachable { .. } => FailureKind::Unreachable,
            EngineError::Stranded { .. } => FailureKind::Stranded,
            EngineError::Timeout { .. } => FailureKind::Timeout,
            EngineError::Unsupported(_) => FailureKind::Unsupported,
            EngineError::Provider(_) => FailureKind::Provider,
        }
    }
}

impl From<reqwest::Error> for EngineError {
    fn from(err: reqwest::Error) -> Self {
        EngineError::Provider(err.to_string())
    }
}
