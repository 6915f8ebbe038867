//! Invariant-preserving edge insertion.
//!
//! [`try_add`] is the sole mutation primitive the generator uses to densify a
//! graph. It guarantees two things:
//!
//! - **Protection**: no accepted insertion ever changes a protected node's
//!   shortest-distance label, not even by introducing an alternate route of
//!   *equal* length (ties are rejected, so the planted path stays the unique
//!   shortest route to every protected node).
//! - **Exactness**: after an accepted insertion, every node's `shortest`
//!   label is again the true shortest distance from the source, updated by
//!   propagating the improvement through all transitively affected nodes.
//!
//! A rejected insertion leaves the graph observably identical to before the
//! call: the candidate edge is removed again and the tentative distances are
//! discarded wholesale.

use std::collections::HashMap;

use crate::graph::{DiGraph, NodeId, Weight, INFINITY};

/// Tentative distance updates accumulated during one insertion attempt.
/// Committed wholesale on acceptance, dropped wholesale on rejection.
type Overlay = HashMap<NodeId, Weight>;

/// Reads a node's current best distance, consulting the overlay before
/// falling back to the stored label.
#[inline]
fn current_distance(graph: &DiGraph, overlay: &Overlay, node: NodeId) -> Weight {
    overlay
        .get(&node)
        .copied()
        .unwrap_or_else(|| graph.shortest(node))
}

/// Attempts to add the edge `u -> v` with weight `w`.
///
/// Returns `true` if the edge was added; all `shortest` labels are then exact
/// for the new graph. Returns `false` if the edge already exists, or if adding
/// it would let some protected node be reached by a route of less-than-or-equal
/// length; the graph is then unchanged.
///
/// Rejection is an expected outcome of random sampling, not an error.
pub fn try_add(graph: &mut DiGraph, u: NodeId, v: NodeId, w: Weight) -> bool {
    if graph.has_edge(u, v) {
        return false;
    }

    // Speculative insert; removed again on any violation.
    graph.add_edge(u, v, w);

    let mut overlay = Overlay::new();
    let mut stack = vec![u];

    while let Some(x) = stack.pop() {
        let dist_x = current_distance(graph, &overlay, x);
        if dist_x == INFINITY {
            // Unreachable frontier node cannot improve anything; protected
            // nodes always carry a finite distance, so no violation either.
            continue;
        }
        for &(n, edge_w) in graph.neighbors(x) {
            // Only the new edge can introduce shorter routes, so from u the
            // traversal follows (u, v) alone; every other route through u is
            // unaffected by this insertion.
            if x == u && n != v {
                continue;
            }
            let candidate = dist_x.saturating_add(edge_w);
            let dist_n = current_distance(graph, &overlay, n);
            if candidate <= dist_n && graph.is_protected(n) {
                graph.remove_edge(u, v);
                return false;
            }
            if candidate < dist_n {
                overlay.insert(n, candidate);
                stack.push(n);
            }
        }
    }

    // Commit: the traversal found no protected violation.
    for (node, dist) in overlay {
        graph.set_shortest(node, dist);
    }
    true
}

// ============================================================================
// Tests
// ============================================================================
