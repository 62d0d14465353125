//! Graph construction from geographic points.

use tracing::debug;

use crate::error::EngineError;
use crate::graph::Graph;
use crate::haversine::distance_km;
use crate::shortest_path::Budget;
use crate::traits::{DistanceSource, Waypoint};

/// Builds a complete directed graph with great-circle edge weights.
///
/// Node `i` is `points[i]`. Every pair of distinct points gets both directed
/// edges, so `n` points yield `n * (n - 1)` edges. This is quadratic and meant
/// for modest point sets. An empty slice gives an empty graph.
pub fn build_complete_graph(points: &[Waypoint]) -> Result<Graph, EngineError> {
    validate_points(points)?;

    let n = points.len();
    let mut graph = Graph::with_vertices(n);
    for i in 0..n {
        for j in i + 1..n {
            let km = distance_km(points[i].coordinate, points[j].coordinate);
            graph.add_undirected_edge(i, j, km);
        }
    }

    debug!(vertices = graph.vertex_count(), edges = graph.edge_count(), "built complete graph");
    Ok(graph)
}

/// Builds a graph from an arbitrary distance source.
///
/// Cells the source reports as `None` produce no edge, so the result may be
/// sparse. Weights are validated since the source is not trusted to keep them
/// non-negative.
pub fn build_graph_with<S>(source: &S, points: &[Waypoint]) -> Result<Graph, EngineError>
where
    S: DistanceSource + ?Sized,
{
    build_graph_within(source, points, &Budget::unlimited())
}

/// [`build_graph_with`], handing `budget` to the source.
pub fn build_graph_within<S>(source: &S, points: &[Waypoint], budget: &Budget) -> Result<Graph, EngineError>
where
    S: DistanceSource + ?Sized,
{
    validate_points(points)?;

    let n = points.len();
    let mut graph = Graph::with_vertices(n);
    if n == 0 {
        return Ok(graph);
    }

    let locations: Vec<_> = points.iter().map(|point| point.coordinate).collect();
    let matrix = source.distances_within(&locations, budget)?;
    if matrix.len() != n || matrix.iter().any(|row| row.len() != n) {
        return Err(EngineError::Provider(format!(
            "expected a {n}x{n} distance matrix"
        )));
    }

    for (i, row) in matrix.iter().enumerate() {
        for (j, cell) in row.iter().enumerate() {
            if i == j {
                continue;
            }
            if let Some(km) = cell {
                graph.try_add_edge(i, j, *km)?;
            }
        }
    }

    debug!(vertices = graph.vertex_count(), edges = graph.edge_count(), "built graph from distance source");
    Ok(graph)
}

fn validate_points(points: &[Waypoint]) -> Result<(), EngineError> {
    points
        .iter()
        .enumerate()
        .try_for_each(|(index, point)| point.coordinate.validate(index))
}
