//! fleet-router core
//!
//! Geospatial shortest paths for fleet routing: great-circle distances,
//! a weighted directed graph, Dijkstra search, and the job contract the
//! external API layer uses to request routes.

pub mod error;
pub mod traits;
pub mod haversine;
pub mod graph;
pub mod builder;
pub mod traversal;
pub mod shortest_path;
pub mod job;
pub mod solver;
pub mod osrm;

pub use builder::{build_complete_graph, build_graph_with, build_graph_within};
pub use error::{EngineError, FailureKind};
pub use graph::{Edge, Graph, NodeIndex};
pub use haversine::{Coordinate, HaversineDistances, distance_km};
pub use shortest_path::{Budget, DistanceMap, Path, dijkstra_all, shortest_path};
pub use solver::{Engine, SolveOptions};
pub use traversal::{bfs, dfs};
