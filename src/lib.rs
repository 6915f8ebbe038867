//! # pathfuzz
//!
//! Differential fuzzing of single-source shortest-path algorithms via
//! constrained random graph generation.
//!
//! The generator builds a random directed weighted graph that is guaranteed,
//! *by construction*, to contain a planted shortest path of known total
//! weight between two designated nodes. The harness then runs an independent
//! Dijkstra oracle over the same graph and reports any disagreement: either
//! answer being wrong is a genuine bug in one of the two implementations.
//!
//! The heart of the crate is [`insert::try_add`], an online edge-insertion
//! primitive that keeps every node's shortest-distance label exact while
//! refusing any edge that would give a *protected* (planted-path) node a
//! shorter (or even equal-length) alternate route.
//!
//! ## Quick Start
//!
//! ```
//! use pathfuzz::prelude::*;
//!
//! let cfg = FuzzConfig {
//!     trials: 100,
//!     seed: Some(12345),
//!     ..FuzzConfig::default()
//! };
//! let outcome = run_fuzz(&cfg).expect("valid configuration");
//! assert!(outcome.is_clean());
//! ```
//!
//! ## Working with Graphs Directly
//!
//! ```
//! use pathfuzz::graph::DiGraph;
//! use pathfuzz::insert::try_add;
//!
//! // Plant the path 0 -> 1 (3) -> 2 (4); shortest(2) = 7 is protected.
//! let mut g = DiGraph::with_nodes(3);
//! g.set_shortest(0, 0);
//! g.add_edge(0, 1, 3);
//! g.set_shortest(1, 3);
//! g.set_protected(1, true);
//! g.add_edge(1, 2, 4);
//! g.set_shortest(2, 7);
//! g.set_protected(2, true);
//!
//! // A direct 0 -> 2 edge of weight 5 would undercut the planted path.
//! assert!(!try_add(&mut g, 0, 2, 5));
//! assert!(!g.has_edge(0, 2));
//!
//! // A strictly longer alternative is fine.
//! assert!(try_add(&mut g, 0, 2, 9));
//! assert_eq!(g.shortest(2), 7);
//! ```
//!
//! ## Modules
//!
//! - [`graph`]: Directed weighted graph store with per-node distance labels.
//! - [`insert`]: Invariant-preserving edge insertion (the core primitive).
//! - [`oracle`]: Independent Dijkstra oracle used for verification.
//! - [`generate`]: Constrained random graph generator.
//! - [`fuzz`]: Differential fuzz harness with parallel trial execution.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::module_name_repetitions)]

pub mod fuzz;
pub mod generate;
pub mod graph;
pub mod insert;
pub mod oracle;

/// Re-export commonly used types for convenience.
pub mod prelude {
    pub use crate::fuzz::{run_fuzz, run_trial, FuzzConfig, FuzzOutcome, Mismatch};
    pub use crate::generate::{generate, GeneratorConfig, PlantedPath};
    pub use crate::graph::{DiGraph, NodeId, Weight, INFINITY};
    pub use crate::insert::try_add;
    pub use crate::oracle::shortest_path;
}
