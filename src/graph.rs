//! Directed weighted graph store with per-node shortest-distance labels.

use std::fmt;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

// ============================================================================
// Basic types
// ============================================================================

/// Node identifier. Nodes are dense small integers `0..n`.
pub type NodeId = usize;

/// Edge weight / distance value.
pub type Weight = u64;

/// Sentinel distance for nodes not (yet) reachable from the source.
///
/// All distance arithmetic goes through [`Weight::saturating_add`], so the
/// sentinel is absorbing: `INFINITY + w == INFINITY`.
pub const INFINITY: Weight = Weight::MAX;

/// Per-node record: current shortest distance from the fixed source, and
/// whether the node lies on the planted (ground-truth) path.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NodeLabel {
    /// Best known distance from the source; [`INFINITY`] if unreachable.
    pub shortest: Weight,
    /// True iff the node's distance is pinned by the planted path and must
    /// never change.
    pub protected: bool,
}

impl Default for NodeLabel {
    fn default() -> Self {
        Self {
            shortest: INFINITY,
            protected: false,
        }
    }
}

// ============================================================================
// DiGraph
// ============================================================================

/// A directed graph with non-negative integer edge weights and dense node ids.
///
/// Representation:
/// - `out_edges[u]` holds `(v, w)` pairs for every edge `u -> v`.
/// - `labels[u]` holds the node's [`NodeLabel`].
///
/// At most one edge may exist per ordered pair `(u, v)`; [`DiGraph::add_edge`]
/// refuses duplicates. Self-loops are representable but nothing in this crate
/// creates them.
///
/// `PartialEq` compares adjacency and labels, which is exactly the
/// "observably identical" notion the rejection contract of
/// [`crate::insert::try_add`] promises.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DiGraph {
    out_edges: Vec<Vec<(NodeId, Weight)>>,
    labels: Vec<NodeLabel>,
    edge_count: usize,
}

impl DiGraph {
    /// Creates a graph with `n` nodes, no edges, and default labels
    /// (unreachable, unprotected).
    pub fn with_nodes(n: usize) -> Self {
        Self {
            out_edges: vec![Vec::new(); n],
            labels: vec![NodeLabel::default(); n],
            edge_count: 0,
        }
    }

    /// Number of nodes.
    #[inline]
    pub fn node_count(&self) -> usize {
        self.labels.len()
    }

    /// Number of edges.
    #[inline]
    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    /// Returns true iff the edge `u -> v` exists.
    #[inline]
    pub fn has_edge(&self, u: NodeId, v: NodeId) -> bool {
        self.out_edges[u].iter().any(|&(t, _)| t == v)
    }

    /// Adds the edge `u -> v` with weight `w`.
    ///
    /// Returns `false` (and leaves the graph unchanged) if the edge already
    /// exists; the weight argument is ignored in that case.
    pub fn add_edge(&mut self, u: NodeId, v: NodeId, w: Weight) -> bool {
        if self.has_edge(u, v) {
            return false;
        }
        self.out_edges[u].push((v, w));
        self.edge_count += 1;
        true
    }

    /// Removes the edge `u -> v`. Returns `false` if it was not present.
    pub fn remove_edge(&mut self, u: NodeId, v: NodeId) -> bool {
        let edges = &mut self.out_edges[u];
        match edges.iter().position(|&(t, _)| t == v) {
            Some(i) => {
                edges.remove(i);
                self.edge_count -= 1;
                true
            }
            None => false,
        }
    }

    /// Weight of the edge `u -> v`, or `None` if absent.
    pub fn edge_weight(&self, u: NodeId, v: NodeId) -> Option<Weight> {
        self.out_edges[u]
            .iter()
            .find(|&&(t, _)| t == v)
            .map(|&(_, w)| w)
    }

    /// Out-neighbors of `u` as `(target, weight)` pairs.
    #[inline]
    pub fn neighbors(&self, u: NodeId) -> &[(NodeId, Weight)] {
        &self.out_edges[u]
    }

    /// The node's label.
    #[inline]
    pub fn label(&self, u: NodeId) -> NodeLabel {
        self.labels[u]
    }

    /// Current shortest-distance label of `u`.
    #[inline]
    pub fn shortest(&self, u: NodeId) -> Weight {
        self.labels[u].shortest
    }

    /// Overwrites the shortest-distance label of `u`.
    #[inline]
    pub fn set_shortest(&mut self, u: NodeId, d: Weight) {
        self.labels[u].shortest = d;
    }

    /// Whether `u` is a protected (planted-path) node.
    #[inline]
    pub fn is_protected(&self, u: NodeId) -> bool {
        self.labels[u].protected
    }

    /// Marks `u` as protected or not.
    #[inline]
    pub fn set_protected(&mut self, u: NodeId, p: bool) {
        self.labels[u].protected = p;
    }

    /// Iterates over all edges as `(u, v, w)` triples, in adjacency order.
    pub fn edges(&self) -> impl Iterator<Item = (NodeId, NodeId, Weight)> + '_ {
        self.out_edges
            .iter()
            .enumerate()
            .flat_map(|(u, outs)| outs.iter().map(move |&(v, w)| (u, v, w)))
    }

    // ------------------------------------------------------------------------
    // Text serialization (for counterexample reproduction)
    // ------------------------------------------------------------------------

    /// Writes the graph in the line-oriented edge-list format accepted by
    /// [`parse_edge_list`].
    ///
    /// # Errors
    /// Propagates I/O errors from the writer.
    pub fn write_to<W: Write>(&self, mut w: W) -> io::Result<()> {
        writeln!(w, "nodes {}", self.node_count())?;
        for (u, label) in self.labels.iter().enumerate() {
            write!(w, "node {u} shortest ")?;
            if label.shortest == INFINITY {
                write!(w, "inf")?;
            } else {
                write!(w, "{}", label.shortest)?;
            }
            if label.protected {
                write!(w, " protected")?;
            }
            writeln!(w)?;
        }
        for (u, v, weight) in self.edges() {
            writeln!(w, "edge {u} {v} {weight}")?;
        }
        Ok(())
    }

    /// Saves the graph to a file in the edge-list text format.
    ///
    /// # Errors
    /// Propagates I/O errors.
    pub fn save_to_file(&self, filename: impl AsRef<Path>) -> io::Result<()> {
        let mut w = BufWriter::new(File::create(filename)?);
        self.write_to(&mut w)?;
        w.flush()
    }

    /// Loads a graph from a file in the edge-list text format.
    ///
    /// # Errors
    /// Returns a [`GraphParseError`] on I/O failure or malformed input.
    pub fn load_from_file(filename: impl AsRef<Path>) -> Result<Self, GraphParseError> {
        let text = std::fs::read_to_string(filename)
            .map_err(|e| GraphParseError::Io(e.to_string()))?;
        parse_edge_list(&text)
    }
}

// ============================================================================
// Parsing
// ============================================================================

/// Errors produced when parsing the edge-list text format.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GraphParseError {
    /// Input contained no records.
    Empty,
    /// The first record must be `nodes <count>`.
    MissingHeader,
    /// A record did not match any of `nodes`, `node`, or `edge`.
    UnknownRecord {
        /// 1-based line number.
        line: usize,
    },
    /// A record had the wrong shape or an unparsable field.
    MalformedRecord {
        /// 1-based line number.
        line: usize,
    },
    /// A node id was `>=` the declared node count.
    NodeOutOfRange {
        /// 1-based line number.
        line: usize,
        /// The offending node id.
        id: usize,
        /// Declared node count.
        nodes: usize,
    },
    /// The same ordered pair appeared in two `edge` records.
    DuplicateEdge {
        /// Edge source.
        u: usize,
        /// Edge target.
        v: usize,
    },
    /// I/O error (file not found, etc.).
    Io(String),
}

impl fmt::Display for GraphParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GraphParseError::Empty => write!(f, "graph text is empty"),
            GraphParseError::MissingHeader => {
                write!(f, "expected `nodes <count>` header as the first record")
            }
            GraphParseError::UnknownRecord { line } => {
                write!(f, "line {line}: unknown record (expected `node` or `edge`)")
            }
            GraphParseError::MalformedRecord { line } => {
                write!(f, "line {line}: malformed record")
            }
            GraphParseError::NodeOutOfRange { line, id, nodes } => write!(
                f,
                "line {line}: node id {id} out of range (graph has {nodes} nodes)"
            ),
            GraphParseError::DuplicateEdge { u, v } => {
                write!(f, "duplicate edge ({u}, {v})")
            }
            GraphParseError::Io(msg) => write!(f, "I/O error: {msg}"),
        }
    }
}

impl std::error::Error for GraphParseError {}

/// Parses a graph from the line-oriented edge-list format:
///
/// ```text
/// nodes 4
/// node 0 shortest 0
/// node 1 shortest 3 protected
/// node 3 shortest inf
/// edge 0 1 3
/// ```
///
/// Rules:
/// - Blank lines and lines starting with `#` are ignored.
/// - The `nodes` header must come first; `node` records are optional (a node
///   without a record keeps the default unreachable/unprotected label).
/// - Each ordered pair may appear in at most one `edge` record.
///
/// # Errors
/// Returns a [`GraphParseError`] describing the first problem found.
pub fn parse_edge_list(text: &str) -> Result<DiGraph, GraphParseError> {
    let mut records = text
        .lines()
        .enumerate()
        .map(|(i, l)| (i + 1, l.trim()))
        .filter(|&(_, l)| !l.is_empty() && !l.starts_with('#'));

    let (header_line, header) = records.next().ok_or(GraphParseError::Empty)?;
    let n = match header.split_whitespace().collect::<Vec<_>>().as_slice() {
        ["nodes", count] => count
            .parse::<usize>()
            .map_err(|_| GraphParseError::MalformedRecord { line: header_line })?,
        _ => return Err(GraphParseError::MissingHeader),
    };

    let mut graph = DiGraph::with_nodes(n);
    for (line, record) in records {
        let fields: Vec<&str> = record.split_whitespace().collect();
        match fields.as_slice() {
            ["node", id, "shortest", dist] | ["node", id, "shortest", dist, "protected"] => {
                let id = parse_field::<usize>(id, line)?;
                check_node(id, n, line)?;
                let shortest = if *dist == "inf" {
                    INFINITY
                } else {
                    parse_field::<Weight>(dist, line)?
                };
                graph.set_shortest(id, shortest);
                graph.set_protected(id, fields.len() == 5);
            }
            ["edge", u, v, w] => {
                let u = parse_field::<usize>(u, line)?;
                let v = parse_field::<usize>(v, line)?;
                let w = parse_field::<Weight>(w, line)?;
                check_node(u, n, line)?;
                check_node(v, n, line)?;
                if !graph.add_edge(u, v, w) {
                    return Err(GraphParseError::DuplicateEdge { u, v });
                }
            }
            _ => return Err(GraphParseError::UnknownRecord { line }),
        }
    }
    Ok(graph)
}

fn parse_field<T: std::str::FromStr>(s: &str, line: usize) -> Result<T, GraphParseError> {
    s.parse()
        .map_err(|_| GraphParseError::MalformedRecord { line })
}

fn check_node(id: usize, nodes: usize, line: usize) -> Result<(), GraphParseError> {
    if id < nodes {
        Ok(())
    } else {
        Err(GraphParseError::NodeOutOfRange { line, id, nodes })
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_graph_is_empty_and_unreachable() {
        let g = DiGraph::with_nodes(3);
        assert_eq!(g.node_count(), 3);
        assert_eq!(g.edge_count(), 0);
        for u in 0..3 {
            assert_eq!(g.shortest(u), INFINITY);
            assert!(!g.is_protected(u));
            assert!(g.neighbors(u).is_empty());
        }
    }

    #[test]
    fn add_edge_rejects_duplicates() {
        let mut g = DiGraph::with_nodes(2);
        assert!(g.add_edge(0, 1, 3));
        assert!(!g.add_edge(0, 1, 7));
        assert_eq!(g.edge_count(), 1);
        assert_eq!(g.edge_weight(0, 1), Some(3));
        // Reverse direction is a distinct edge.
        assert!(g.add_edge(1, 0, 5));
        assert_eq!(g.edge_count(), 2);
    }

    #[test]
    fn remove_edge_restores_absence() {
        let mut g = DiGraph::with_nodes(2);
        g.add_edge(0, 1, 3);
        assert!(g.remove_edge(0, 1));
        assert!(!g.has_edge(0, 1));
        assert_eq!(g.edge_count(), 0);
        assert!(!g.remove_edge(0, 1));
    }

    #[test]
    fn labels_are_independent_per_node() {
        let mut g = DiGraph::with_nodes(3);
        g.set_shortest(1, 7);
        g.set_protected(1, true);
        assert_eq!(g.shortest(1), 7);
        assert!(g.is_protected(1));
        assert_eq!(g.shortest(0), INFINITY);
        assert!(!g.is_protected(2));
    }

    #[test]
    fn edges_iterator_lists_all_edges() {
        let mut g = DiGraph::with_nodes(3);
        g.add_edge(0, 1, 3);
        g.add_edge(1, 2, 4);
        g.add_edge(0, 2, 9);
        let edges: Vec<_> = g.edges().collect();
        assert_eq!(edges.len(), 3);
        assert!(edges.contains(&(0, 1, 3)));
        assert!(edges.contains(&(1, 2, 4)));
        assert!(edges.contains(&(0, 2, 9)));
    }

    #[test]
    fn serialization_round_trips() {
        let mut g = DiGraph::with_nodes(4);
        g.set_shortest(0, 0);
        g.set_shortest(1, 3);
        g.set_protected(1, true);
        g.set_shortest(2, 7);
        g.set_protected(2, true);
        g.add_edge(0, 1, 3);
        g.add_edge(1, 2, 4);
        g.add_edge(1, 3, 1);

        let mut buf = Vec::new();
        g.write_to(&mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let parsed = parse_edge_list(&text).unwrap();
        assert_eq!(parsed, g);
    }

    #[test]
    fn parse_accepts_comments_and_blank_lines() {
        let text = "# counterexample\n\nnodes 2\nnode 0 shortest 0\nedge 0 1 5\n";
        let g = parse_edge_list(text).unwrap();
        assert_eq!(g.node_count(), 2);
        assert_eq!(g.edge_weight(0, 1), Some(5));
        assert_eq!(g.shortest(1), INFINITY);
    }

    #[test]
    fn parse_rejects_empty_input() {
        assert_eq!(parse_edge_list(""), Err(GraphParseError::Empty));
        assert_eq!(parse_edge_list("\n  \n"), Err(GraphParseError::Empty));
    }

    #[test]
    fn parse_rejects_missing_header() {
        assert_eq!(
            parse_edge_list("edge 0 1 5\n"),
            Err(GraphParseError::MissingHeader)
        );
    }

    #[test]
    fn parse_rejects_out_of_range_node() {
        let err = parse_edge_list("nodes 2\nedge 0 5 1\n").unwrap_err();
        assert_eq!(
            err,
            GraphParseError::NodeOutOfRange {
                line: 2,
                id: 5,
                nodes: 2
            }
        );
    }

    #[test]
    fn parse_rejects_duplicate_edges() {
        let err = parse_edge_list("nodes 2\nedge 0 1 1\nedge 0 1 2\n").unwrap_err();
        assert_eq!(err, GraphParseError::DuplicateEdge { u: 0, v: 1 });
    }

    #[test]
    fn parse_rejects_malformed_records() {
        assert!(matches!(
            parse_edge_list("nodes 2\nedge 0 1\n").unwrap_err(),
            GraphParseError::UnknownRecord { line: 2 }
        ));
        assert!(matches!(
            parse_edge_list("nodes 2\nedge 0 one 3\n").unwrap_err(),
            GraphParseError::MalformedRecord { line: 2 }
        ));
    }

    #[test]
    fn infinity_is_absorbing_under_saturating_add() {
        assert_eq!(INFINITY.saturating_add(10), INFINITY);
    }
}
