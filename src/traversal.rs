//! Unweighted traversals. Edge weights are ignored.

use std::collections::hash_map::Entry;
use std::collections::{HashMap, VecDeque};

use crate::graph::{Graph, NodeIndex};

/// Hop count from `source` to every node reachable from it.
///
/// Unreached nodes are absent from the map. A source outside the graph
/// yields an empty map.
pub fn bfs(graph: &Graph, source: NodeIndex) -> HashMap<NodeIndex, usize> {
    let mut hops = HashMap::new();
    if !graph.contains_vertex(source) {
        return hops;
    }

    let mut queue = VecDeque::new();
    hops.insert(source, 0);
    queue.push_back(source);

    while let Some(u) = queue.pop_front() {
        let next = hops[&u] + 1;
        for &(v, _) in graph.neighbors(u) {
            if let Entry::Vacant(entry) = hops.entry(v) {
                entry.insert(next);
                queue.push_back(v);
            }
        }
    }

    hops
}

/// Depth-first visitation order from `source`.
///
/// The first-listed neighbor is explored first, matching a recursive DFS.
/// Uses an explicit stack so deep graphs cannot overflow the call stack.
pub fn dfs(graph: &Graph, source: NodeIndex) -> Vec<NodeIndex> {
    if !graph.contains_vertex(source) {
        return Vec::new();
    }

    let mut visited = vec![false; graph.vertex_count()];
    let mut order = vec![source];
    // (node, position of the next neighbor to look at)
    let mut stack = vec![(source, 0usize)];
    visited[source] = true;

    while let Some((u, cursor)) = stack.last_mut() {
        let neighbors = graph.neighbors(*u);
        match neighbors[*cursor..].iter().position(|&(v, _)| !visited[v]) {
            Some(offset) => {
                let v = neighbors[*cursor + offset].0;
                *cursor += offset + 1;
                visited[v] = true;
                order.push(v);
                stack.push((v, 0));
            }
            None => {
                stack.pop();
            }
        }
    }

    order
}
