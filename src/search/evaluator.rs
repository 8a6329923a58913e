//! Normalization of raw oracle measurements into ratios and a scalar loss.

use log::debug;

use crate::schema::PatternCatalog;

use super::mask::{self, CandidateMask};
use super::oracle::{Oracle, OracleError};

/// Calibration constants established once before the search loop.
///
/// `area_all` is the area of the full catalog; `sta_base` is the timing of
/// the empty selection. Both are strictly positive once calibrated.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Baselines {
    pub area_all: f64,
    pub sta_base: f64,
}

/// Normalized measurement of one candidate subset.
///
/// Both ratios are costs: smaller is better. `loss` is exactly
/// `area_ratio + timing_ratio`; the rest of the system assumes this
/// unweighted additive form.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Evaluation {
    pub area_ratio: f64,
    pub timing_ratio: f64,
    pub loss: f64,
}

/// Fatal evaluation errors.
#[derive(Debug, thiserror::Error)]
pub enum EvalError {
    #[error("Ratio requested before baselines were calibrated")]
    UninitializedBaseline,
    #[error("Baselines must be strictly positive: area_all={area_all}, sta_base={sta_base}")]
    NonPositiveBaseline { area_all: f64, sta_base: f64 },
    #[error("Oracle invocation failed: {0}")]
    Oracle(#[from] OracleError),
}

/// Turns candidate masks into normalized (area_ratio, timing_ratio, loss).
pub struct Evaluator<O> {
    oracle: O,
    catalog: PatternCatalog,
    baselines: Option<Baselines>,
}

impl<O: Oracle> Evaluator<O> {
    /// Uncalibrated evaluator. Call `calibrate` before `evaluate`.
    pub fn new(oracle: O, catalog: PatternCatalog) -> Self {
        Self {
            oracle,
            catalog,
            baselines: None,
        }
    }

    /// The two fixed startup calls: area of the full catalog and timing of
    /// the empty selection.
    pub fn calibrate(&mut self) -> Result<Baselines, EvalError> {
        let full: Vec<&str> = self.catalog.iter().collect();
        let area_all = self.oracle.area(&full)? as f64;
        let sta_base = self.oracle.timing(&[])?;
        if area_all <= 0.0 || sta_base <= 0.0 {
            return Err(EvalError::NonPositiveBaseline { area_all, sta_base });
        }
        let baselines = Baselines { area_all, sta_base };
        self.baselines = Some(baselines);
        Ok(baselines)
    }

    /// Calibration constants, if `calibrate` has run.
    pub fn baselines(&self) -> Option<Baselines> {
        self.baselines
    }

    /// The catalog this evaluator selects from.
    pub fn catalog(&self) -> &PatternCatalog {
        &self.catalog
    }

    /// Evaluate one candidate against the oracle.
    ///
    /// The canonical mask rendering goes to the log as progress output;
    /// it has no effect on the result.
    pub fn evaluate(&mut self, candidate: &CandidateMask) -> Result<Evaluation, EvalError> {
        let baselines = self.baselines.ok_or(EvalError::UninitializedBaseline)?;
        let selection = mask::encode(candidate, &self.catalog);
        debug!(
            "evaluating {} ({} patterns)",
            mask::render_hex(candidate),
            selection.count
        );

        let area = self.oracle.area(&selection.patterns)?;
        let timing = self.oracle.timing(&selection.patterns)?;

        let area_ratio = area as f64 / baselines.area_all;
        let timing_ratio = timing / baselines.sta_base;
        Ok(Evaluation {
            area_ratio,
            timing_ratio,
            loss: area_ratio + timing_ratio,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Oracle answering from fixed tables: full catalog area 100, empty
    /// selection timing 10.0, everything else 40 / 6.0.
    struct FixedOracle {
        catalog_len: usize,
    }

    impl Oracle for FixedOracle {
        fn area(&mut self, patterns: &[&str]) -> Result<u64, OracleError> {
            Ok(if patterns.len() == self.catalog_len {
                100
            } else {
                40
            })
        }

        fn timing(&mut self, patterns: &[&str]) -> Result<f64, OracleError> {
            Ok(if patterns.is_empty() { 10.0 } else { 6.0 })
        }
    }

    struct FailingOracle;

    impl Oracle for FailingOracle {
        fn area(&mut self, _patterns: &[&str]) -> Result<u64, OracleError> {
            Err(OracleError::MalformedResponse("boom".to_string()))
        }

        fn timing(&mut self, _patterns: &[&str]) -> Result<f64, OracleError> {
            Err(OracleError::MalformedResponse("boom".to_string()))
        }
    }

    fn catalog(n: usize) -> PatternCatalog {
        PatternCatalog::new((0..n).map(|i| format!("p{i}")).collect())
    }

    #[test]
    fn evaluate_before_calibration_fails() {
        let mut evaluator = Evaluator::new(FixedOracle { catalog_len: 4 }, catalog(4));
        let err = evaluator.evaluate(&CandidateMask::ones(4)).unwrap_err();
        assert!(matches!(err, EvalError::UninitializedBaseline));
    }

    #[test]
    fn calibration_establishes_baselines() {
        let mut evaluator = Evaluator::new(FixedOracle { catalog_len: 4 }, catalog(4));
        let baselines = evaluator.calibrate().unwrap();
        assert_eq!(baselines.area_all, 100.0);
        assert_eq!(baselines.sta_base, 10.0);
        assert_eq!(evaluator.baselines(), Some(baselines));
    }

    #[test]
    fn ratios_and_loss_match_measurements() {
        let mut evaluator = Evaluator::new(FixedOracle { catalog_len: 4 }, catalog(4));
        evaluator.calibrate().unwrap();

        let mask = CandidateMask::new(vec![true, false, true, false]);
        let eval = evaluator.evaluate(&mask).unwrap();
        assert_eq!(eval.area_ratio, 0.4);
        assert_eq!(eval.timing_ratio, 0.6);
        assert_eq!(eval.loss, 1.0);
        assert_eq!(eval.loss, eval.area_ratio + eval.timing_ratio);
    }

    #[test]
    fn zero_baseline_is_rejected() {
        struct ZeroOracle;
        impl Oracle for ZeroOracle {
            fn area(&mut self, _patterns: &[&str]) -> Result<u64, OracleError> {
                Ok(0)
            }
            fn timing(&mut self, _patterns: &[&str]) -> Result<f64, OracleError> {
                Ok(10.0)
            }
        }

        let mut evaluator = Evaluator::new(ZeroOracle, catalog(2));
        assert!(matches!(
            evaluator.calibrate().unwrap_err(),
            EvalError::NonPositiveBaseline { .. }
        ));
        assert_eq!(evaluator.baselines(), None);
    }

    #[test]
    fn oracle_failure_propagates() {
        let mut evaluator = Evaluator::new(FailingOracle, catalog(2));
        assert!(matches!(
            evaluator.calibrate().unwrap_err(),
            EvalError::Oracle(_)
        ));
    }
}
