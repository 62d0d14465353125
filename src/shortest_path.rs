//! Dijkstra shortest paths over non-negative edge weights.
//!
//! Ties between equally distant queue entries are broken by the lower node
//! index, so results are reproducible for a given graph.

use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::ops::Index;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering as AtomicOrdering};
use std::time::{Duration, Instant};

use tracing::debug;

use crate::error::EngineError;
use crate::graph::{Graph, NodeIndex};

const DEFAULT_CHECK_INTERVAL: usize = 64;

/// Shortest known distance from a fixed source to every node.
///
/// Unreached nodes hold `f64::INFINITY`.
#[derive(Debug, Clone, PartialEq)]
pub struct DistanceMap {
    source: NodeIndex,
    distances: Vec<f64>,
    parents: Vec<Option<NodeIndex>>,
}

impl DistanceMap {
    pub fn source(&self) -> NodeIndex {
        self.source
    }

    /// Distance to `v`; infinite for unreached or unknown nodes.
    pub fn get(&self, v: NodeIndex) -> f64 {
        self.distances.get(v).copied().unwrap_or(f64::INFINITY)
    }

    pub fn is_reachable(&self, v: NodeIndex) -> bool {
        self.get(v).is_finite()
    }

    pub fn len(&self) -> usize {
        self.distances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.distances.is_empty()
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.distances
    }

    /// `(node, distance)` pairs for every node, reachable or not.
    pub fn iter(&self) -> impl Iterator<Item = (NodeIndex, f64)> + '_ {
        self.distances.iter().copied().enumerate()
    }

    /// Shortest path from the source to `v`, read off the search tree.
    pub fn path_to(&self, v: NodeIndex) -> Path {
        trace_path(&self.distances, &self.parents, v)
    }
}

impl Index<NodeIndex> for DistanceMap {
    type Output = f64;

    fn index(&self, v: NodeIndex) -> &f64 {
        &self.distances[v]
    }
}

/// Ordered nodes from source to target with the total weight.
///
/// An unreachable target gives an empty path with infinite distance.
#[derive(Debug, Clone, PartialEq)]
pub struct Path {
    nodes: Vec<NodeIndex>,
    distance: f64,
}

impl Path {
    pub fn unreachable() -> Self {
        Self {
            nodes: Vec::new(),
            distance: f64::INFINITY,
        }
    }

    pub fn nodes(&self) -> &[NodeIndex] {
        &self.nodes
    }

    pub fn distance(&self) -> f64 {
        self.distance
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn source(&self) -> Option<NodeIndex> {
        self.nodes.first().copied()
    }

    pub fn target(&self) -> Option<NodeIndex> {
        self.nodes.last().copied()
    }

    pub fn into_nodes(self) -> Vec<NodeIndex> {
        self.nodes
    }
}

/// Limits how long a search may run.
///
/// A budget expires when its time limit elapses or when its cancellation flag
/// is raised from another thread. Searches poll it every `check_interval`
/// settled nodes, starting with the first.
#[derive(Debug, Clone)]
pub struct Budget {
    started: Instant,
    limit: Option<Duration>,
    cancelled: Option<Arc<AtomicBool>>,
    check_interval: usize,
}

impl Default for Budget {
    fn default() -> Self {
        Self::unlimited()
    }
}

impl Budget {
    pub fn unlimited() -> Self {
        Self {
            started: Instant::now(),
            limit: None,
            cancelled: None,
            check_interval: DEFAULT_CHECK_INTERVAL,
        }
    }

    /// Starts the clock now.
    pub fn with_limit(limit: Duration) -> Self {
        Self {
            limit: Some(limit),
            ..Self::unlimited()
        }
    }

    pub fn cancellable(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancelled = Some(flag);
        self
    }

    pub fn check_every(mut self, settled_nodes: usize) -> Self {
        self.check_interval = settled_nodes.max(1);
        self
    }

    pub fn limit(&self) -> Option<Duration> {
        self.limit
    }

    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    /// Time left before the limit; `None` when there is no limit.
    pub fn remaining(&self) -> Option<Duration> {
        self.limit.map(|limit| limit.saturating_sub(self.started.elapsed()))
    }

    pub fn is_exhausted(&self) -> bool {
        let cancelled = self
            .cancelled
            .as_ref()
            .is_some_and(|flag| flag.load(AtomicOrdering::Relaxed));
        let expired = self.limit.is_some_and(|limit| self.started.elapsed() >= limit);
        cancelled || expired
    }

    pub fn check(&self) -> Result<(), EngineError> {
        if self.is_exhausted() {
            Err(EngineError::Timeout { budget: self.limit })
        } else {
            Ok(())
        }
    }
}

/// Distances from `source` to every node in the graph.
pub fn dijkstra_all(graph: &Graph, source: NodeIndex) -> Result<DistanceMap, EngineError> {
    dijkstra_all_within(graph, source, &Budget::unlimited())
}

pub fn dijkstra_all_within(
    graph: &Graph,
    source: NodeIndex,
    budget: &Budget,
) -> Result<DistanceMap, EngineError> {
    ensure_vertex(graph, source)?;
    let search = search(graph, source, None, budget)?;
    Ok(DistanceMap {
        source,
        distances: search.distances,
        parents: search.parents,
    })
}

/// Shortest path from `source` to `target`.
///
/// The search stops as soon as `target` is settled.
pub fn shortest_path(graph: &Graph, source: NodeIndex, target: NodeIndex) -> Result<Path, EngineError> {
    shortest_path_within(graph, source, target, &Budget::unlimited())
}

pub fn shortest_path_within(
    graph: &Graph,
    source: NodeIndex,
    target: NodeIndex,
    budget: &Budget,
) -> Result<Path, EngineError> {
    ensure_vertex(graph, source)?;
    ensure_vertex(graph, target)?;

    let search = search(graph, source, Some(target), budget)?;
    Ok(trace_path(&search.distances, &search.parents, target))
}

fn trace_path(distances: &[f64], parents: &[Option<NodeIndex>], target: NodeIndex) -> Path {
    let distance = distances.get(target).copied().unwrap_or(f64::INFINITY);
    if distance.is_infinite() {
        return Path::unreachable();
    }

    let mut nodes = vec![target];
    let mut current = target;
    while let Some(parent) = parents[current] {
        nodes.push(parent);
        current = parent;
    }
    nodes.reverse();

    Path { nodes, distance }
}

struct Search {
    distances: Vec<f64>,
    parents: Vec<Option<NodeIndex>>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct State {
    distance: f64,
    node: NodeIndex,
}

impl Eq for State {}

impl Ord for State {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed for a min-heap; lower node index wins ties.
        other
            .distance
            .total_cmp(&self.distance)
            .then_with(|| other.node.cmp(&self.node))
    }
}

impl PartialOrd for State {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

fn search(
    graph: &Graph,
    source: NodeIndex,
    target: Option<NodeIndex>,
    budget: &Budget,
) -> Result<Search, EngineError> {
    let n = graph.vertex_count();
    let mut distances = vec![f64::INFINITY; n];
    let mut parents = vec![None; n];
    let mut settled = vec![false; n];
    let mut settled_count = 0usize;
    let mut heap = BinaryHeap::new();

    distances[source] = 0.0;
    heap.push(State {
        distance: 0.0,
        node: source,
    });

    while let Some(State { node: u, .. }) = heap.pop() {
        if settled[u] {
            continue;
        }
        if settled_count % budget.check_interval == 0 {
            budget.check()?;
        }
        settled[u] = true;
        settled_count += 1;

        if target == Some(u) {
            break;
        }

        for &(v, weight) in graph.neighbors(u) {
            let candidate = distances[u] + weight;
            if candidate < distances[v] {
                distances[v] = candidate;
                parents[v] = Some(u);
                heap.push(State {
                    distance: candidate,
                    node: v,
                });
            }
        }
    }

    debug!(source, ?target, settled = settled_count, "dijkstra search finished");
    Ok(Search { distances, parents })
}

fn ensure_vertex(graph: &Graph, node: NodeIndex) -> Result<(), EngineError> {
    if graph.contains_vertex(node) {
        Ok(())
    } else {
        Err(EngineError::UnknownNode {
            node,
            vertex_count: graph.vertex_count(),
        })
    }
}
