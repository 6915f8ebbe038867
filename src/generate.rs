//! Constrained random graph generation.
//!
//! [`generate`] builds a random directed weighted graph that is guaranteed,
//! by construction, to contain a known shortest path: it plants a path with
//! cumulative protected distance labels, then densifies the graph with random
//! edges, each vetted by [`crate::insert::try_add`] so the planted path stays
//! the unique shortest route between its endpoints.

use rand::Rng;

use crate::graph::{DiGraph, NodeId, Weight, INFINITY};
use crate::insert::try_add;

// ============================================================================
// Configuration
// ============================================================================

/// Bounds for random graph generation.
///
/// All bounds are inclusive. Validate with [`GeneratorConfig::validate`]
/// before running trials; a bad configuration is a misconfigured run, not a
/// discovered bug, and fails fast.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GeneratorConfig {
    /// Minimum node count. Must be at least 2 so a two-node path exists.
    pub min_nodes: usize,
    /// Maximum node count.
    pub max_nodes: usize,
    /// Minimum edge weight. Must be positive: a zero-weight planted edge
    /// would let a later edge tie a protected distance trivially.
    pub min_edge_weight: Weight,
    /// Maximum edge weight.
    pub max_edge_weight: Weight,
    /// Upper bound on the number of random densification attempts per graph.
    pub max_additional_edges: usize,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            min_nodes: 2,
            max_nodes: 100,
            min_edge_weight: 1,
            max_edge_weight: 10,
            max_additional_edges: 100,
        }
    }
}

impl GeneratorConfig {
    /// Checks the bounds for internal consistency.
    ///
    /// # Errors
    /// Returns the first [`ConfigError`] found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_nodes < 2 {
            return Err(ConfigError::TooFewNodes {
                min_nodes: self.min_nodes,
            });
        }
        if self.min_nodes > self.max_nodes {
            return Err(ConfigError::NodeBoundsInverted {
                min: self.min_nodes,
                max: self.max_nodes,
            });
        }
        if self.min_edge_weight == 0 {
            return Err(ConfigError::ZeroMinimumWeight);
        }
        if self.min_edge_weight > self.max_edge_weight {
            return Err(ConfigError::WeightBoundsInverted {
                min: self.min_edge_weight,
                max: self.max_edge_weight,
            });
        }
        // The planted path has at most max_nodes - 1 edges and every relaxed
        // candidate is one edge beyond an existing label, so max_nodes *
        // max_edge_weight bounds every distance this configuration can
        // produce. It must stay below the INFINITY sentinel.
        let worst_case = Weight::try_from(self.max_nodes)
            .ok()
            .and_then(|n| n.checked_mul(self.max_edge_weight));
        match worst_case {
            Some(total) if total < INFINITY => Ok(()),
            _ => Err(ConfigError::DistanceOverflow {
                max_nodes: self.max_nodes,
                max_edge_weight: self.max_edge_weight,
            }),
        }
    }
}

/// A malformed [`GeneratorConfig`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// `min_nodes` is below 2; no two-node path fits.
    TooFewNodes {
        /// The configured minimum.
        min_nodes: usize,
    },
    /// `min_nodes > max_nodes`.
    NodeBoundsInverted {
        /// Configured minimum.
        min: usize,
        /// Configured maximum.
        max: usize,
    },
    /// `min_edge_weight` is zero.
    ZeroMinimumWeight,
    /// `min_edge_weight > max_edge_weight`.
    WeightBoundsInverted {
        /// Configured minimum.
        min: Weight,
        /// Configured maximum.
        max: Weight,
    },
    /// `max_nodes * max_edge_weight` reaches the [`INFINITY`] sentinel, so a
    /// planted path could not be labeled with finite distances.
    DistanceOverflow {
        /// Configured maximum node count.
        max_nodes: usize,
        /// Configured maximum edge weight.
        max_edge_weight: Weight,
    },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::TooFewNodes { min_nodes } => {
                write!(f, "min_nodes must be >= 2, got {min_nodes}")
            }
            ConfigError::NodeBoundsInverted { min, max } => {
                write!(f, "min_nodes ({min}) exceeds max_nodes ({max})")
            }
            ConfigError::ZeroMinimumWeight => {
                write!(f, "min_edge_weight must be positive")
            }
            ConfigError::WeightBoundsInverted { min, max } => {
                write!(f, "min_edge_weight ({min}) exceeds max_edge_weight ({max})")
            }
            ConfigError::DistanceOverflow {
                max_nodes,
                max_edge_weight,
            } => write!(
                f,
                "max_nodes ({max_nodes}) * max_edge_weight ({max_edge_weight}) \
                 overflows the distance range"
            ),
        }
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Generation
// ============================================================================

/// A generated graph together with its construction-known ground truth.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlantedPath {
    /// The generated graph, labels included.
    pub graph: DiGraph,
    /// Total weight of the planted path; provably the shortest distance from
    /// `path[0]` to `path[path.len() - 1]`.
    pub distance: Weight,
    /// The planted node sequence (length >= 2).
    pub path: Vec<NodeId>,
}

/// Generates one constrained random graph.
///
/// The caller owns seeding; the generator draws everything from `rng` and
/// never touches ambient entropy, so reproducibility is entirely the
/// caller's choice of `rng`.
///
/// The configuration must have passed [`GeneratorConfig::validate`]; the
/// fuzz harness validates once before its first trial.
pub fn generate<R: Rng>(rng: &mut R, cfg: &GeneratorConfig) -> PlantedPath {
    let num_nodes = rng.random_range(cfg.min_nodes..=cfg.max_nodes);
    let path_len = rng.random_range(2..=num_nodes);
    let path = sample_distinct(rng, num_nodes, path_len);

    let mut graph = DiGraph::with_nodes(num_nodes);
    graph.set_shortest(path[0], 0);
    let mut distance: Weight = 0;
    for pair in path.windows(2) {
        let w = rng.random_range(cfg.min_edge_weight..=cfg.max_edge_weight);
        graph.add_edge(pair[0], pair[1], w);
        distance = distance.saturating_add(w);
        graph.set_shortest(pair[1], distance);
        graph.set_protected(pair[1], true);
    }

    // Densify. The attempt budget is capped by the number of ordered pairs
    // not already taken by the path's edges; each attempt stands alone and
    // rejections are simply dropped.
    let free_pairs = num_nodes * (num_nodes - 1) - (path_len - 1);
    let attempts = cfg.max_additional_edges.min(rng.random_range(0..=free_pairs));
    for _ in 0..attempts {
        let (a, b) = sample_distinct_pair(rng, num_nodes);
        let w = rng.random_range(cfg.min_edge_weight..=cfg.max_edge_weight);
        try_add(&mut graph, a, b, w);
    }

    PlantedPath {
        graph,
        distance,
        path,
    }
}

/// Samples `k` distinct node ids from `0..n` via a partial Fisher-Yates
/// shuffle.
fn sample_distinct<R: Rng>(rng: &mut R, n: usize, k: usize) -> Vec<NodeId> {
    debug_assert!(k <= n);
    let mut ids: Vec<NodeId> = (0..n).collect();
    for i in 0..k {
        let j = rng.random_range(i..n);
        ids.swap(i, j);
    }
    ids.truncate(k);
    ids
}

/// Samples an ordered pair of two distinct node ids from `0..n`.
fn sample_distinct_pair<R: Rng>(rng: &mut R, n: usize) -> (NodeId, NodeId) {
    debug_assert!(n >= 2);
    let a = rng.random_range(0..n);
    let mut b = rng.random_range(0..n - 1);
    if b >= a {
        b += 1;
    }
    (a, b)
}

// ============================================================================
// Tests
// ============================================================================
