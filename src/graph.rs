//! Weighted directed graph over integer-indexed nodes.
//!
//! Nodes carry no identity beyond their index. Undirected connections are two
//! directed edges.

use crate::error::EngineError;

/// Index of a node, in `0..vertex_count`.
pub type NodeIndex = usize;

/// A directed, weighted edge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Edge {
    pub from: NodeIndex,
    pub to: NodeIndex,
    pub weight: f64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Graph {
    adjacency: Vec<Vec<(NodeIndex, f64)>>,
    edges: Vec<Edge>,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a graph with nodes `0..vertices` and no edges.
    pub fn with_vertices(vertices: usize) -> Self {
        Self {
            adjacency: vec![Vec::new(); vertices],
            edges: Vec::new(),
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.adjacency.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn contains_vertex(&self, v: NodeIndex) -> bool {
        v < self.adjacency.len()
    }

    /// Ensures node `v` exists, growing the vertex count to `v + 1` if needed.
    pub fn add_vertex(&mut self, v: NodeIndex) {
        if v >= self.adjacency.len() {
            self.adjacency.resize_with(v + 1, Vec::new);
        }
    }

    /// Appends a directed edge `u -> v`, creating both endpoints.
    ///
    /// The weight is not checked. Searches assume it is non-negative; use
    /// [`Graph::try_add_edge`] for weights from an untrusted source.
    pub fn add_edge(&mut self, u: NodeIndex, v: NodeIndex, weight: f64) {
        self.add_vertex(u);
        self.add_vertex(v);
        self.adjacency[u].push((v, weight));
        self.edges.push(Edge { from: u, to: v, weight });
    }

    /// Like [`Graph::add_edge`] but refuses negative or non-finite weights.
    pub fn try_add_edge(&mut self, u: NodeIndex, v: NodeIndex, weight: f64) -> Result<(), EngineError> {
        check_weight(u, v, weight)?;
        self.add_edge(u, v, weight);
        Ok(())
    }

    /// Adds `u -> v` and `v -> u` with the same weight.
    pub fn add_undirected_edge(&mut self, u: NodeIndex, v: NodeIndex, weight: f64) {
        self.add_edge(u, v, weight);
        self.add_edge(v, u, weight);
    }

    /// Outgoing `(neighbor, weight)` pairs of `v` in insertion order.
    ///
    /// Unknown nodes have no neighbors.
    pub fn neighbors(&self, v: NodeIndex) -> &[(NodeIndex, f64)] {
        self.adjacency.get(v).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Every edge in insertion order.
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Checks that every edge weight is finite and non-negative.
    pub fn validate_weights(&self) -> Result<(), EngineError> {
        self.edges
            .iter()
            .try_for_each(|edge| check_weight(edge.from, edge.to, edge.weight))
    }
}

fn check_weight(from: NodeIndex, to: NodeIndex, weight: f64) -> Result<(), EngineError> {
    if weight.is_finite() && weight >= 0.0 {
        Ok(())
    } else {
        Err(EngineError::NegativeWeight { from, to, weight })
    }
}
