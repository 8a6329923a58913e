//! Area/timing trade-off exploration for MISO instruction-set extension.
//!
//! Given a catalog of candidate instruction patterns and an external oracle
//! that measures the circuit area and static timing (STA) of any subset,
//! this crate searches for subsets with good area/timing trade-offs and
//! records the Pareto frontier ("skyline") and the running-best loss trace
//! of the search trajectory.
//!
//! # Architecture
//!
//! The crate is split into two main modules:
//!
//! - `schema`: pattern catalog, search parameters, oracle location
//! - `search`: masks, oracle interface, evaluation, skyline/history
//!   bookkeeping, and the genetic-algorithm engine
//!
//! # Example
//!
//! ```rust,no_run
//! use miso_skyline::schema::{LossCompaction, OracleConfig, PatternCatalog, SearchConfig};
//! use miso_skyline::search::{Evaluator, GaEngine, MaskRng, ProcessOracle, SearchContext};
//!
//! let catalog = PatternCatalog::load("misos.txt")?;
//! let oracle = ProcessOracle::new(OracleConfig::new("./main", "design.bc"));
//!
//! let mut context = SearchContext::new(
//!     Evaluator::new(oracle, catalog.clone()),
//!     LossCompaction::Strict,
//! )
//! .with_random_baseline(MaskRng::new(0));
//! context.calibrate()?;
//!
//! let mut engine = GaEngine::new(SearchConfig::default(), catalog.len());
//! let result = engine.run(|mask| context.objective(mask))?;
//!
//! if let Some(best) = result.best {
//!     println!("best loss: {:.4}", best.loss);
//! }
//! for point in context.optimized().skyline.frontier() {
//!     println!("({:.3}, {:.3})", point.area_ratio, point.timing_ratio);
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod schema;
pub mod search;

// Re-export commonly used types
pub use schema::{PatternCatalog, SearchConfig};
pub use search::{GaEngine, ParetoTracker, SearchContext};
