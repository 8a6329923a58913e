//! Configuration types for the trade-off search and the external oracle.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Genetic-algorithm parameters for the trade-off search.
///
/// The defaults mirror a typical run: 150 generations of 100 candidates with
/// uniform crossover and light mutation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Generation cap.
    #[serde(default = "default_max_iterations")]
    pub max_iterations: usize,
    /// Number of candidates per generation.
    #[serde(default = "default_population_size")]
    pub population_size: usize,
    /// Per-bit mutation probability (0.0-1.0).
    #[serde(default = "default_mutation_probability")]
    pub mutation_probability: f64,
    /// Probability that an offspring is produced by crossover (0.0-1.0).
    #[serde(default = "default_crossover_probability")]
    pub crossover_probability: f64,
    /// Fraction of the population carried over unchanged (0.0-1.0).
    #[serde(default = "default_elit_ratio")]
    pub elit_ratio: f64,
    /// Fraction of the population eligible as parents (0.0-1.0).
    #[serde(default = "default_parents_portion")]
    pub parents_portion: f64,
    /// Crossover style for recombining parent masks.
    #[serde(default)]
    pub crossover_type: CrossoverType,
    /// Stop after this many generations without improvement. `None` disables.
    #[serde(default)]
    pub stagnation_limit: Option<usize>,
    /// Evaluate a uniformly random mask alongside every proposal and track
    /// its frontier/trace separately for comparison.
    #[serde(default = "default_random_baseline")]
    pub random_baseline: bool,
    /// Loss-trace compaction rule.
    #[serde(default)]
    pub compaction: LossCompaction,
    /// RNG seed for reproducibility.
    #[serde(default)]
    pub random_seed: Option<u64>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_iterations: default_max_iterations(),
            population_size: default_population_size(),
            mutation_probability: default_mutation_probability(),
            crossover_probability: default_crossover_probability(),
            elit_ratio: default_elit_ratio(),
            parents_portion: default_parents_portion(),
            crossover_type: CrossoverType::default(),
            stagnation_limit: None,
            random_baseline: default_random_baseline(),
            compaction: LossCompaction::default(),
            random_seed: None,
        }
    }
}

fn default_max_iterations() -> usize {
    150
}
fn default_population_size() -> usize {
    100
}
fn default_mutation_probability() -> f64 {
    0.1
}
fn default_crossover_probability() -> f64 {
    0.5
}
fn default_elit_ratio() -> f64 {
    0.01
}
fn default_parents_portion() -> f64 {
    0.3
}
fn default_random_baseline() -> bool {
    true
}

/// Crossover style for boolean masks.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum CrossoverType {
    /// Each bit taken from either parent with equal probability.
    #[default]
    Uniform,
    /// Single cut point; prefix from one parent, suffix from the other.
    OnePoint,
    /// Two cut points; middle segment from the second parent.
    TwoPoint,
}

/// Loss-trace compaction rule.
///
/// The two rules shape the reported improvement curve differently: `Strict`
/// records only record-breaking improvements, while `Lenient` keeps a
/// lower-envelope staircase where equal-loss plateaus collapse to their last
/// occurrence. See `LossHistory` for the exact semantics.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum LossCompaction {
    /// Record a breakpoint only when the running minimum strictly improves.
    #[default]
    Strict,
    /// Record the running best every call, collapsing plateaus to their
    /// last iteration.
    Lenient,
}

/// Location and context of the external evaluation oracle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OracleConfig {
    /// Path to the evaluator binary.
    #[serde(default = "default_command")]
    pub command: PathBuf,
    /// Reference design (bitcode) the timing query measures against.
    pub bitcode: PathBuf,
    /// Optional auxiliary configuration passed to the timing query.
    #[serde(default)]
    pub bcconf: Option<PathBuf>,
    /// Working file where the selected subset is staged before each call.
    #[serde(default = "default_work_path")]
    pub work_path: PathBuf,
}

impl OracleConfig {
    /// Oracle config with the default working path and no auxiliary config.
    pub fn new<C: Into<PathBuf>, B: Into<PathBuf>>(command: C, bitcode: B) -> Self {
        Self {
            command: command.into(),
            bitcode: bitcode.into(),
            bcconf: None,
            work_path: default_work_path(),
        }
    }
}

fn default_command() -> PathBuf {
    PathBuf::from("./main")
}

fn default_work_path() -> PathBuf {
    std::env::temp_dir().join("miso.txt")
}

/// Search configuration validation errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Population size must be at least 2")]
    PopulationTooSmall,
    #[error("Generation cap must be non-zero")]
    NoIterations,
    #[error("{0} must be within [0, 1]")]
    OutOfRange(&'static str),
}

impl SearchConfig {
    /// Validate parameter ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.population_size < 2 {
            return Err(ConfigError::PopulationTooSmall);
        }
        if self.max_iterations == 0 {
            return Err(ConfigError::NoIterations);
        }
        for (name, value) in [
            ("mutation_probability", self.mutation_probability),
            ("crossover_probability", self.crossover_probability),
            ("elit_ratio", self.elit_ratio),
            ("parents_portion", self.parents_portion),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::OutOfRange(name));
            }
        }
        Ok(())
    }
}
