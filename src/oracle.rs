//! Independent shortest-path oracle used to verify generated graphs.
//!
//! A textbook binary-heap Dijkstra over non-negative edge weights, with
//! predecessor tracking for path reconstruction. Deliberately shares no code
//! with the incremental label maintenance in [`crate::insert`], so the two
//! sides of the differential comparison cannot fail in the same way.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use crate::graph::{DiGraph, NodeId, Weight, INFINITY};

/// Computes the shortest distance and one shortest path from `source` to
/// `target`.
///
/// Returns `None` iff `target` is unreachable from `source`. The returned
/// path starts with `source` and ends with `target`; for `source == target`
/// it is the single-node path at distance 0.
pub fn shortest_path(
    graph: &DiGraph,
    source: NodeId,
    target: NodeId,
) -> Option<(Weight, Vec<NodeId>)> {
    let n = graph.node_count();
    let mut dist = vec![INFINITY; n];
    let mut prev: Vec<Option<NodeId>> = vec![None; n];
    let mut heap = BinaryHeap::new();

    dist[source] = 0;
    heap.push(Reverse((0, source)));

    while let Some(Reverse((d, x))) = heap.pop() {
        if d > dist[x] {
            // Stale queue entry; x was already settled with a better distance.
            continue;
        }
        if x == target {
            break;
        }
        for &(nb, w) in graph.neighbors(x) {
            let nd = d.saturating_add(w);
            if nd < dist[nb] {
                dist[nb] = nd;
                prev[nb] = Some(x);
                heap.push(Reverse((nd, nb)));
            }
        }
    }

    if dist[target] == INFINITY {
        return None;
    }

    let mut path = vec![target];
    let mut cur = target;
    while let Some(p) = prev[cur] {
        path.push(p);
        cur = p;
    }
    path.reverse();
    Some((dist[target], path))
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn diamond() -> DiGraph {
        // 0 -> 1 (1), 0 -> 2 (4), 1 -> 2 (2), 1 -> 3 (6), 2 -> 3 (3)
        let mut g = DiGraph::with_nodes(4);
        g.add_edge(0, 1, 1);
        g.add_edge(0, 2, 4);
        g.add_edge(1, 2, 2);
        g.add_edge(1, 3, 6);
        g.add_edge(2, 3, 3);
        g
    }

    #[test]
    fn finds_shortest_distance_and_path() {
        let g = diamond();
        let (d, p) = shortest_path(&g, 0, 3).unwrap();
        assert_eq!(d, 6);
        assert_eq!(p, vec![0, 1, 2, 3]);
    }

    #[test]
    fn source_equals_target() {
        let g = diamond();
        let (d, p) = shortest_path(&g, 2, 2).unwrap();
        assert_eq!(d, 0);
        assert_eq!(p, vec![2]);
    }

    #[test]
    fn unreachable_target_is_none() {
        let mut g = DiGraph::with_nodes(3);
        g.add_edge(0, 1, 1);
        assert!(shortest_path(&g, 0, 2).is_none());
        // Edges are directed: 1 cannot reach 0.
        assert!(shortest_path(&g, 1, 0).is_none());
    }

    #[test]
    fn prefers_cheaper_multi_hop_route() {
        let mut g = DiGraph::with_nodes(3);
        g.add_edge(0, 2, 10);
        g.add_edge(0, 1, 3);
        g.add_edge(1, 2, 3);
        let (d, p) = shortest_path(&g, 0, 2).unwrap();
        assert_eq!(d, 6);
        assert_eq!(p, vec![0, 1, 2]);
    }

    #[test]
    fn zero_weight_edges_are_allowed() {
        let mut g = DiGraph::with_nodes(3);
        g.add_edge(0, 1, 0);
        g.add_edge(1, 2, 5);
        let (d, p) = shortest_path(&g, 0, 2).unwrap();
        assert_eq!(d, 5);
        assert_eq!(p, vec![0, 1, 2]);
    }

    #[test]
    fn ignores_stale_heap_entries() {
        // Node 1 is relaxed twice: first to 5 via the direct edge, then to 3
        // via 2, leaving a stale (5, 1) entry in the heap.
        let mut g = DiGraph::with_nodes(4);
        g.add_edge(0, 2, 1);
        g.add_edge(0, 1, 5);
        g.add_edge(2, 1, 2);
        g.add_edge(1, 3, 1);
        let (d, p) = shortest_path(&g, 0, 3).unwrap();
        assert_eq!(d, 4);
        assert_eq!(p, vec![0, 2, 1, 3]);
    }
}
