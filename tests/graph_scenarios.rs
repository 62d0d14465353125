//! Shortest-path and traversal scenarios on hand-built graphs.

use fleet_router::error::EngineError;
use fleet_router::graph::{Graph, NodeIndex};
use fleet_router::shortest_path::{dijkstra_all, shortest_path};
use fleet_router::traversal::{bfs, dfs};

// ============================================================================
// Test Fixtures
// ============================================================================

/// Depot (0) and five delivery locations, distances in km.
fn road_network() -> Graph {
    let mut graph = Graph::with_vertices(6);
    let edges = [
        (0, 1, 10.0),
        (0, 2, 5.0),
        (1, 3, 1.0),
        (2, 1, 3.0),
        (2, 3, 9.0),
        (3, 4, 2.0),
        (1, 4, 7.0),
        (4, 5, 4.0),
    ];
    for (u, v, w) in edges {
        graph.add_edge(u, v, w);
    }
    graph
}

/// Deterministic pseudo-random graph with integer weights.
fn scrambled_graph(vertices: usize, seed: u64) -> Graph {
    let mut state = seed;
    let mut next = move || {
        state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        state >> 33
    };

    let mut graph = Graph::with_vertices(vertices);
    for _ in 0..vertices * 3 {
        let u = (next() as usize) % vertices;
        let v = (next() as usize) % vertices;
        let weight = (next() % 20) as f64;
        graph.add_edge(u, v, weight);
    }
    graph
}

fn path_weight(graph: &Graph, nodes: &[NodeIndex]) -> f64 {
    nodes
        .windows(2)
        .map(|pair| {
            graph
                .neighbors(pair[0])
                .iter()
                .filter(|(v, _)| *v == pair[1])
                .map(|(_, w)| *w)
                .fold(f64::INFINITY, f64::min)
        })
        .sum()
}

// ============================================================================
// Dijkstra
// ============================================================================

#[test]
fn depot_distances_on_road_network() {
    let distances = dijkstra_all(&road_network(), 0).unwrap();
    let expected = [(0, 0.0), (1, 8.0), (2, 5.0), (3, 9.0), (4, 11.0), (5, 15.0)];
    for (node, distance) in expected {
        assert_eq!(distances.get(node), distance, "distance to {}", node);
    }
}

#[test]
fn depot_to_last_stop_path() {
    let path = shortest_path(&road_network(), 0, 5).unwrap();
    assert_eq!(path.nodes(), &[0, 2, 1, 3, 4, 5]);
    assert_eq!(path.distance(), 15.0);
}

#[test]
fn source_distance_is_always_zero() {
    for seed in 1..20 {
        let graph = scrambled_graph(12, seed);
        for source in 0..graph.vertex_count() {
            let distances = dijkstra_all(&graph, source).unwrap();
            assert_eq!(distances.get(source), 0.0, "seed {} source {}", seed, source);
        }
    }
}

#[test]
fn path_and_distance_map_agree() {
    for seed in 1..20 {
        let graph = scrambled_graph(15, seed);
        let source = (seed as usize) % graph.vertex_count();
        let distances = dijkstra_all(&graph, source).unwrap();

        for target in 0..graph.vertex_count() {
            let path = shortest_path(&graph, source, target).unwrap();
            if distances.is_reachable(target) {
                assert_eq!(path.distance(), distances.get(target));
                assert_eq!(path.source(), Some(source));
                assert_eq!(path.target(), Some(target));
                assert_eq!(path_weight(&graph, path.nodes()), path.distance());
            } else {
                assert!(path.is_empty(), "seed {} {} -> {}", seed, source, target);
                assert!(path.distance().is_infinite());
            }
        }
    }
}

#[test]
fn distances_respect_every_edge() {
    // No edge can offer a shortcut once the search has finished.
    for seed in 1..20 {
        let graph = scrambled_graph(10, seed);
        let distances = dijkstra_all(&graph, 0).unwrap();
        for edge in graph.edges() {
            if distances.is_reachable(edge.from) {
                assert!(distances.get(edge.to) <= distances.get(edge.from) + edge.weight);
            }
        }
    }
}

#[test]
fn unreachable_target_gives_empty_path() {
    let mut graph = road_network();
    graph.add_edge(6, 0, 1.0);

    let distances = dijkstra_all(&graph, 0).unwrap();
    assert!(distances.get(6).is_infinite());

    let path = shortest_path(&graph, 0, 6).unwrap();
    assert!(path.is_empty());
    assert!(path.distance().is_infinite());
}

#[test]
fn negative_weights_are_caught_before_solving() {
    let mut graph = road_network();
    assert!(matches!(
        graph.try_add_edge(5, 0, -2.0),
        Err(EngineError::NegativeWeight { from: 5, to: 0, .. })
    ));

    graph.add_edge(5, 0, -2.0);
    assert!(graph.validate_weights().is_err());
}

// ============================================================================
// Graph invariants
// ============================================================================

#[test]
fn add_vertex_twice_changes_nothing() {
    let mut once = road_network();
    once.add_vertex(9);
    let mut twice = once.clone();
    twice.add_vertex(9);

    assert_eq!(once, twice);
    assert_eq!(twice.vertex_count(), 10);
    assert_eq!(twice.edge_count(), 8);
}

#[test]
fn every_edge_endpoint_is_a_vertex() {
    let graph = scrambled_graph(25, 7);
    for edge in graph.edges() {
        assert!(graph.contains_vertex(edge.from));
        assert!(graph.contains_vertex(edge.to));
    }
}

// ============================================================================
// Traversals
// ============================================================================

#[test]
fn bfs_and_dfs_reach_the_same_nodes() {
    for seed in 1..10 {
        let graph = scrambled_graph(20, seed);
        let hops = bfs(&graph, 0);
        let order = dfs(&graph, 0);
        let distances = dijkstra_all(&graph, 0).unwrap();

        assert_eq!(hops.len(), order.len());
        for node in &order {
            assert!(hops.contains_key(node));
            assert!(distances.is_reachable(*node));
        }
    }
}

#[test]
fn dfs_never_repeats_a_node() {
    let graph = scrambled_graph(30, 3);
    let mut order = dfs(&graph, 0);
    let visited = order.len();
    order.sort_unstable();
    order.dedup();
    assert_eq!(order.len(), visited);
}
