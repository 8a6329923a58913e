//! Per-iteration orchestration handed to the search engine as the objective.

use log::debug;

use crate::schema::LossCompaction;

use super::evaluator::{Baselines, EvalError, Evaluation, Evaluator};
use super::history::LossHistory;
use super::mask::{self, CandidateMask, MaskRng};
use super::oracle::Oracle;
use super::skyline::ParetoTracker;

/// Frontier and loss trace of one search trajectory.
#[derive(Debug)]
pub struct TradeoffLog {
    /// Non-dominated (area_ratio, timing_ratio) points.
    pub skyline: ParetoTracker,
    /// Compressed running-best loss record.
    pub history: LossHistory,
}

impl TradeoffLog {
    /// Empty log with the given trace compaction rule.
    pub fn new(compaction: LossCompaction) -> Self {
        Self {
            skyline: ParetoTracker::new(),
            history: LossHistory::new(compaction),
        }
    }

    fn record(&mut self, eval: &Evaluation) {
        self.skyline.add_point(eval.area_ratio, eval.timing_ratio);
        self.history.add_loss(eval.loss);
    }
}

/// State threaded through every objective call.
///
/// Bundles the evaluator with the bookkeeping for the optimized search and,
/// optionally, a random-search baseline evaluated alongside it. Constructed
/// once before the engine starts and read for reporting after it stops —
/// on cooperative interruption everything recorded so far is still here.
pub struct SearchContext<O> {
    evaluator: Evaluator<O>,
    compaction: LossCompaction,
    optimized: TradeoffLog,
    random: Option<(TradeoffLog, MaskRng)>,
}

impl<O: Oracle> SearchContext<O> {
    /// Context tracking only the engine-driven search.
    pub fn new(evaluator: Evaluator<O>, compaction: LossCompaction) -> Self {
        Self {
            evaluator,
            compaction,
            optimized: TradeoffLog::new(compaction),
            random: None,
        }
    }

    /// Also evaluate one uniformly random mask per objective call, feeding
    /// its point and loss into a separate log. The random sample never
    /// influences the value returned to the engine.
    pub fn with_random_baseline(mut self, rng: MaskRng) -> Self {
        self.random = Some((TradeoffLog::new(self.compaction), rng));
        self
    }

    /// Run the evaluator's two calibration calls.
    pub fn calibrate(&mut self) -> Result<Baselines, EvalError> {
        self.evaluator.calibrate()
    }

    /// Bookkeeping for the engine-driven search.
    pub fn optimized(&self) -> &TradeoffLog {
        &self.optimized
    }

    /// Bookkeeping for the random baseline, if enabled.
    pub fn random(&self) -> Option<&TradeoffLog> {
        self.random.as_ref().map(|(log, _)| log)
    }

    /// The objective function handed to the search engine.
    ///
    /// Evaluates the random baseline sample first (if enabled), then the
    /// proposed mask, and returns the proposed mask's loss. Tolerates any
    /// number of calls with arbitrary masks, including repeats.
    pub fn objective(&mut self, candidate: &CandidateMask) -> Result<f64, EvalError> {
        if let Some((log, rng)) = &mut self.random {
            let sample = rng.random_mask(candidate.len());
            let eval = self.evaluator.evaluate(&sample)?;
            log.record(&eval);
        }

        let eval = self.evaluator.evaluate(candidate)?;
        self.optimized.record(&eval);
        debug!(
            "{} {:.3} {:.3} {:.2}",
            mask::render_hex(candidate),
            eval.area_ratio,
            eval.timing_ratio,
            eval.loss
        );
        Ok(eval.loss)
    }
}
