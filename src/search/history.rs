//! Loss-history compression to running-best breakpoints.

use serde::Serialize;

use crate::schema::LossCompaction;

/// One recorded breakpoint of the running-best loss.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Breakpoint {
    /// 1-based iteration at which this breakpoint was recorded.
    pub iteration: usize,
    /// Best loss seen up to that iteration.
    pub loss: f64,
}

/// Compressed record of the running-best loss over a search trajectory.
///
/// Every `add_loss` call advances an internal iteration counter; what gets
/// recorded depends on the compaction rule:
///
/// - `Strict`: a breakpoint is recorded only when the loss strictly improves
///   on the minimum seen so far, so the trace is exactly the sequence of
///   record-breaking improvements.
/// - `Lenient`: the running best is recorded on every call, except that once
///   the last two breakpoints sit on the current plateau, the last
///   breakpoint's iteration is advanced in place instead of appending. A
///   plateau thus keeps its first and last iteration and nothing in between.
#[derive(Debug, Clone)]
pub struct LossHistory {
    compaction: LossCompaction,
    iteration: usize,
    min_loss: Option<f64>,
    trace: Vec<Breakpoint>,
}

impl LossHistory {
    /// Empty history with the given compaction rule.
    pub fn new(compaction: LossCompaction) -> Self {
        Self {
            compaction,
            iteration: 0,
            min_loss: None,
            trace: Vec::new(),
        }
    }

    /// Number of losses ingested so far.
    pub fn iterations(&self) -> usize {
        self.iteration
    }

    /// Best loss seen so far, if any loss was ingested.
    pub fn best(&self) -> Option<f64> {
        self.min_loss
    }

    /// Ingest the loss of the next iteration.
    pub fn add_loss(&mut self, loss: f64) {
        self.iteration += 1;
        match self.compaction {
            LossCompaction::Strict => {
                if self.min_loss.is_none_or(|m| loss < m) {
                    self.min_loss = Some(loss);
                    self.trace.push(Breakpoint {
                        iteration: self.iteration,
                        loss,
                    });
                }
            }
            LossCompaction::Lenient => {
                let (best, improved) = match self.min_loss {
                    Some(m) if loss >= m => (m, false),
                    _ => (loss, true),
                };
                self.min_loss = Some(best);

                let n = self.trace.len();
                if !improved
                    && n >= 2
                    && self.trace[n - 1].loss == best
                    && self.trace[n - 2].loss == best
                {
                    self.trace[n - 1].iteration = self.iteration;
                } else {
                    self.trace.push(Breakpoint {
                        iteration: self.iteration,
                        loss: best,
                    });
                }
            }
        }
    }

    /// The recorded breakpoints in iteration order.
    pub fn trace(&self) -> &[Breakpoint] {
        &self.trace
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn breakpoints(history: &LossHistory) -> Vec<(usize, f64)> {
        history
            .trace()
            .iter()
            .map(|bp| (bp.iteration, bp.loss))
            .collect()
    }

    #[test]
    fn strict_records_only_true_improvements() {
        let mut history = LossHistory::new(LossCompaction::Strict);
        for loss in [1.0, 0.8, 0.9, 0.5, 0.5] {
            history.add_loss(loss);
        }
        assert_eq!(breakpoints(&history), vec![(1, 1.0), (2, 0.8), (4, 0.5)]);
        assert_eq!(history.iterations(), 5);
        assert_eq!(history.best(), Some(0.5));
    }

    #[test]
    fn strict_trace_is_strictly_decreasing() {
        let mut history = LossHistory::new(LossCompaction::Strict);
        for loss in [3.0, 3.0, 2.5, 2.5, 2.7, 2.0, 2.0, 1.9] {
            history.add_loss(loss);
        }
        let trace = history.trace();
        for pair in trace.windows(2) {
            assert!(pair[1].loss < pair[0].loss);
            assert!(pair[1].iteration > pair[0].iteration);
        }
    }

    #[test]
    fn strict_starts_empty() {
        let history = LossHistory::new(LossCompaction::Strict);
        assert!(history.trace().is_empty());
        assert_eq!(history.best(), None);
    }

    #[test]
    fn lenient_keeps_plateau_endpoints() {
        let mut history = LossHistory::new(LossCompaction::Lenient);
        for loss in [1.0, 0.9, 0.9, 0.9, 0.9] {
            history.add_loss(loss);
        }
        // plateau of 0.9 collapses to its first and last occurrence
        assert_eq!(breakpoints(&history), vec![(1, 1.0), (2, 0.9), (5, 0.9)]);
    }

    #[test]
    fn lenient_records_running_best_not_raw_loss() {
        let mut history = LossHistory::new(LossCompaction::Lenient);
        for loss in [1.0, 0.8, 0.9, 0.5, 0.5] {
            history.add_loss(loss);
        }
        assert_eq!(
            breakpoints(&history),
            vec![(1, 1.0), (2, 0.8), (3, 0.8), (4, 0.5), (5, 0.5)]
        );
    }

    #[test]
    fn lenient_plateau_at_trace_start() {
        let mut history = LossHistory::new(LossCompaction::Lenient);
        for loss in [1.0, 1.0, 1.0, 1.0] {
            history.add_loss(loss);
        }
        assert_eq!(breakpoints(&history), vec![(1, 1.0), (4, 1.0)]);
    }

    #[test]
    fn lenient_loss_values_never_increase() {
        let mut history = LossHistory::new(LossCompaction::Lenient);
        for loss in [2.0, 1.5, 1.8, 1.5, 1.2, 1.3, 1.2] {
            history.add_loss(loss);
        }
        for pair in history.trace().windows(2) {
            assert!(pair[1].loss <= pair[0].loss);
            assert!(pair[1].iteration > pair[0].iteration);
        }
    }
}
