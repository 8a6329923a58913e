//! Trade-off search core.
//!
//! The pieces, leaves first:
//!
//! - **Masks** (`mask`): bit-vector candidates, subset encoding against the
//!   catalog, canonical hex rendering, seeded random generation.
//! - **Oracle** (`oracle`): the external area/timing evaluator behind a
//!   trait, spawned per query.
//! - **Evaluator** (`evaluator`): calibration baselines and normalization
//!   of raw measurements into ratios and a scalar loss.
//! - **Skyline** (`skyline`): Pareto frontier of (area_ratio, timing_ratio)
//!   points.
//! - **History** (`history`): running-best loss trace compressed to its
//!   breakpoints.
//! - **Driver** (`driver`): the per-iteration objective handed to the
//!   engine, fanning out to the pieces above.
//! - **Engine** (`engine`): boolean genetic algorithm proposing masks.

mod driver;
mod engine;
mod evaluator;
mod history;
mod mask;
mod oracle;
mod skyline;

pub use driver::{SearchContext, TradeoffLog};
pub use engine::{Candidate, GaEngine, SearchProgress, SearchResult, StopReason};
pub use evaluator::{Baselines, EvalError, Evaluation, Evaluator};
pub use history::{Breakpoint, LossHistory};
pub use mask::{CandidateMask, MaskRng, Selection, encode, render_hex};
pub use oracle::{Oracle, OracleError, ProcessOracle};
pub use skyline::{ParetoTracker, TradeoffPoint};
