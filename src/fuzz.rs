//! Differential fuzz harness.
//!
//! Each trial generates one constrained graph, asks the Dijkstra oracle for
//! the shortest path between the planted endpoints, and compares both the
//! distance and the full node sequence against the construction-known answer.
//! Trials are fully independent (each owns its graph and rng), so the harness
//! fans them out over a rayon pool and aggregates an unordered collection of
//! mismatches.

use std::fmt;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;

use crate::generate::{generate, ConfigError, GeneratorConfig};
use crate::graph::{DiGraph, NodeId, Weight};
use crate::oracle::shortest_path;

// ============================================================================
// Configuration
// ============================================================================

/// Configuration for a fuzzing run.
#[derive(Clone, Debug)]
pub struct FuzzConfig {
    /// Number of independent trials.
    pub trials: usize,
    /// Worker threads; `0` auto-detects available parallelism.
    pub jobs: usize,
    /// Optional deterministic base seed. With a fixed seed the outcome is
    /// reproducible regardless of `jobs`, since every trial derives its own
    /// rng from the base seed and its trial index.
    pub seed: Option<u64>,
    /// Bounds for the per-trial graph generator.
    pub generator: GeneratorConfig,
}

impl Default for FuzzConfig {
    fn default() -> Self {
        Self {
            trials: 10_000,
            jobs: 0,
            seed: None,
            generator: GeneratorConfig::default(),
        }
    }
}

/// Errors that prevent a fuzzing run from starting.
#[derive(Clone, Debug)]
pub enum FuzzError {
    /// The generator configuration failed validation.
    Config(ConfigError),
    /// The rayon worker pool could not be built.
    ThreadPool(String),
}

impl fmt::Display for FuzzError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FuzzError::Config(e) => write!(f, "invalid configuration: {e}"),
            FuzzError::ThreadPool(msg) => write!(f, "failed to build worker pool: {msg}"),
        }
    }
}

impl std::error::Error for FuzzError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FuzzError::Config(e) => Some(e),
            FuzzError::ThreadPool(_) => None,
        }
    }
}

impl From<ConfigError> for FuzzError {
    fn from(e: ConfigError) -> Self {
        FuzzError::Config(e)
    }
}

// ============================================================================
// Mismatch report
// ============================================================================

/// A trial where the oracle disagreed with the construction-known answer.
///
/// This is data, not a fault: the harness records it and keeps running. A
/// mismatch means a genuine defect in either the invariant-maintaining
/// generator or the oracle under test.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Mismatch {
    /// The generated graph, labels included.
    pub graph: DiGraph,
    /// Distance known by construction.
    pub known_distance: Weight,
    /// Path known by construction.
    pub known_path: Vec<NodeId>,
    /// The oracle's answer; `None` if it reported the target unreachable.
    pub oracle_answer: Option<(Weight, Vec<NodeId>)>,
}

impl Mismatch {
    /// Writes the full report, graph included, in a form that
    /// [`crate::graph::parse_edge_list`] can read back (report lines are
    /// `#`-prefixed comments).
    ///
    /// # Errors
    /// Propagates I/O errors from the writer.
    pub fn write_to<W: Write>(&self, mut w: W) -> io::Result<()> {
        writeln!(w, "# known distance: {}", self.known_distance)?;
        writeln!(w, "# known path:     {:?}", self.known_path)?;
        match &self.oracle_answer {
            Some((d, p)) => {
                writeln!(w, "# oracle distance: {d}")?;
                writeln!(w, "# oracle path:     {p:?}")?;
            }
            None => writeln!(w, "# oracle reported the target unreachable")?,
        }
        self.graph.write_to(&mut w)
    }

    /// Saves the report to a file for offline reproduction.
    ///
    /// # Errors
    /// Propagates I/O errors.
    pub fn save_to_file(&self, filename: impl AsRef<Path>) -> io::Result<()> {
        let mut w = BufWriter::new(File::create(filename)?);
        self.write_to(&mut w)?;
        w.flush()
    }
}

impl fmt::Display for Mismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut buf = Vec::new();
        self.write_to(&mut buf).map_err(|_| fmt::Error)?;
        f.write_str(&String::from_utf8_lossy(&buf))
    }
}

// ============================================================================
// Trials
// ============================================================================

/// Runs one trial: generate, ask the oracle, compare.
///
/// Returns `None` on agreement (the expected outcome), or the full
/// [`Mismatch`] evidence on disagreement.
pub fn run_trial<R: Rng>(rng: &mut R, cfg: &GeneratorConfig) -> Option<Mismatch> {
    let planted = generate(rng, cfg);
    let source = planted.path[0];
    let target = planted.path[planted.path.len() - 1];

    match shortest_path(&planted.graph, source, target) {
        Some((distance, ref path))
            if distance == planted.distance && *path == planted.path =>
        {
            None
        }
        other => Some(Mismatch {
            graph: planted.graph,
            known_distance: planted.distance,
            known_path: planted.path,
            oracle_answer: other,
        }),
    }
}

/// Aggregate result of a fuzzing run.
///
/// `passed + failed` always equals the configured trial count, independent of
/// completion order.
#[derive(Clone, Debug, Default)]
pub struct FuzzOutcome {
    /// Trials where the oracle agreed with the construction.
    pub passed: usize,
    /// Trials that produced a [`Mismatch`].
    pub failed: usize,
    /// The evidence for every failed trial, in no particular order.
    pub mismatches: Vec<Mismatch>,
}

impl FuzzOutcome {
    /// True iff no trial disagreed.
    pub fn is_clean(&self) -> bool {
        self.failed == 0
    }
}

/// Runs `cfg.trials` independent trials, in parallel, and aggregates.
///
/// Per-trial rngs are derived as `splitmix64(base_seed ^ trial_index)`, so a
/// fixed seed reproduces the exact same set of graphs no matter how many
/// workers run them or in which order they finish.
///
/// # Errors
/// Fails fast on invalid configuration or if the worker pool cannot be built;
/// no trial runs in either case.
pub fn run_fuzz(cfg: &FuzzConfig) -> Result<FuzzOutcome, FuzzError> {
    cfg.generator.validate()?;

    let base_seed = cfg.seed.unwrap_or_else(random_u64);
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(cfg.jobs)
        .build()
        .map_err(|e| FuzzError::ThreadPool(e.to_string()))?;

    let generator = cfg.generator.clone();
    let mismatches: Vec<Mismatch> = pool.install(|| {
        (0..cfg.trials)
            .into_par_iter()
            .filter_map(|trial| {
                let mut rng = SmallRng::seed_from_u64(splitmix64(base_seed ^ trial as u64));
                run_trial(&mut rng, &generator)
            })
            .collect()
    });

    let failed = mismatches.len();
    Ok(FuzzOutcome {
        passed: cfg.trials - failed,
        failed,
        mismatches,
    })
}

/// Fresh entropy for unseeded runs.
fn random_u64() -> u64 {
    rand::random::<u64>()
}

/// SplitMix64 mixer for deriving per-trial seeds from a base seed.
#[inline]
fn splitmix64(mut x: u64) -> u64 {
    x = x.wrapping_add(0x9E37_79B9_7F4A_7C15);
    let mut z = x;
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rand_xorshift::XorShiftRng;

    #[test]
    fn splitmix64_is_deterministic() {
        assert_eq!(splitmix64(0), splitmix64(0));
        assert_eq!(splitmix64(12345), splitmix64(12345));
        assert_ne!(splitmix64(0), splitmix64(1));
    }

    #[test]
    fn single_trials_pass_with_default_bounds() {
        let cfg = GeneratorConfig::default();
        let mut rng = XorShiftRng::seed_from_u64(0xF00D);
        for _ in 0..200 {
            assert_eq!(run_trial(&mut rng, &cfg), None);
        }
    }

    #[test]
    fn fuzz_run_with_default_generator_is_clean() {
        let cfg = FuzzConfig {
            trials: 1_000,
            seed: Some(0xDEADBEEF),
            ..FuzzConfig::default()
        };
        let outcome = run_fuzz(&cfg).unwrap();
        assert_eq!(outcome.passed, 1_000);
        assert_eq!(outcome.failed, 0);
        assert!(outcome.mismatches.is_empty());
        assert!(outcome.is_clean());
    }

    #[test]
    fn counts_always_sum_to_trial_count() {
        let cfg = FuzzConfig {
            trials: 137,
            seed: Some(42),
            ..FuzzConfig::default()
        };
        let outcome = run_fuzz(&cfg).unwrap();
        assert_eq!(outcome.passed + outcome.failed, 137);
    }

    #[test]
    fn seeded_runs_are_reproducible_across_job_counts() {
        let base = FuzzConfig {
            trials: 300,
            seed: Some(0xB0BA),
            ..FuzzConfig::default()
        };
        let serial = run_fuzz(&FuzzConfig { jobs: 1, ..base.clone() }).unwrap();
        let parallel = run_fuzz(&FuzzConfig { jobs: 4, ..base }).unwrap();
        assert_eq!(serial.passed, parallel.passed);
        assert_eq!(serial.failed, parallel.failed);
    }

    #[test]
    fn zero_trials_is_a_clean_noop() {
        let cfg = FuzzConfig {
            trials: 0,
            seed: Some(1),
            ..FuzzConfig::default()
        };
        let outcome = run_fuzz(&cfg).unwrap();
        assert_eq!(outcome.passed, 0);
        assert_eq!(outcome.failed, 0);
    }

    #[test]
    fn invalid_generator_config_fails_fast() {
        let cfg = FuzzConfig {
            generator: GeneratorConfig {
                min_nodes: 1,
                ..GeneratorConfig::default()
            },
            ..FuzzConfig::default()
        };
        assert!(matches!(run_fuzz(&cfg), Err(FuzzError::Config(_))));
    }

    #[test]
    fn mismatch_report_embeds_a_parseable_graph() {
        // Fabricate a mismatch by hand; the harness itself should never
        // produce one.
        let mut graph = DiGraph::with_nodes(2);
        graph.set_shortest(0, 0);
        graph.add_edge(0, 1, 5);
        graph.set_shortest(1, 5);
        graph.set_protected(1, true);
        let report = Mismatch {
            graph: graph.clone(),
            known_distance: 5,
            known_path: vec![0, 1],
            oracle_answer: Some((4, vec![0, 1])),
        };

        let text = report.to_string();
        assert!(text.contains("known distance: 5"));
        assert!(text.contains("oracle distance: 4"));
        let reparsed = crate::graph::parse_edge_list(&text).unwrap();
        assert_eq!(reparsed, graph);
    }
}
