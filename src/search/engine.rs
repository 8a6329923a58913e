//! Boolean genetic-algorithm engine driving the trade-off search.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use crate::schema::SearchConfig;

use super::mask::{CandidateMask, MaskRng};

/// A scored individual.
#[derive(Debug, Clone)]
pub struct Candidate {
    /// The proposed mask.
    pub mask: CandidateMask,
    /// Scalar loss returned by the objective. Smaller is better.
    pub loss: f64,
}

/// Why the search loop ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// Generation cap reached.
    MaxIterations,
    /// No improvement for the configured number of generations.
    Stagnation,
    /// The cancel handle was tripped.
    Cancelled,
}

/// Per-generation progress snapshot.
#[derive(Debug, Clone, Copy)]
pub struct SearchProgress {
    pub generation: usize,
    pub total_generations: usize,
    pub evaluations: u64,
    /// Best loss over the whole run so far.
    pub best_loss: f64,
    /// Best loss within the generation just evaluated.
    pub generation_best: f64,
    pub stagnation_count: usize,
}

/// Final search outcome.
#[derive(Debug, Clone)]
pub struct SearchResult {
    /// Best individual found, if any candidate finished evaluating.
    pub best: Option<Candidate>,
    pub generations: usize,
    pub evaluations: u64,
    pub elapsed_seconds: f64,
    pub stop_reason: StopReason,
}

/// Genetic-algorithm engine over fixed-length boolean masks.
///
/// The engine only sees the scalar objective; all trade-off bookkeeping
/// lives in the objective closure it is handed. Evaluation is strictly
/// sequential — the objective is never re-entered.
pub struct GaEngine {
    config: SearchConfig,
    dimension: usize,
    rng: MaskRng,
    cancelled: Arc<AtomicBool>,
}

impl GaEngine {
    /// Engine for masks of the given dimension. The config should be
    /// validated beforehand; see `SearchConfig::validate`.
    pub fn new(config: SearchConfig, dimension: usize) -> Self {
        let seed = config.random_seed.unwrap_or_else(rand::random);
        Self {
            config,
            dimension,
            rng: MaskRng::new(seed),
            cancelled: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Handle that stops the search cooperatively. Completed evaluations
    /// stay recorded wherever the objective put them.
    pub fn cancel_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.cancelled)
    }

    /// Run without progress reporting.
    pub fn run<F, E>(&mut self, objective: F) -> Result<SearchResult, E>
    where
        F: FnMut(&CandidateMask) -> Result<f64, E>,
    {
        self.run_with_callback(objective, |_| {})
    }

    /// Run the search, invoking `callback` after every generation.
    ///
    /// An error from the objective aborts the run immediately and
    /// propagates unchanged.
    pub fn run_with_callback<F, E, C>(
        &mut self,
        mut objective: F,
        callback: C,
    ) -> Result<SearchResult, E>
    where
        F: FnMut(&CandidateMask) -> Result<f64, E>,
        C: Fn(&SearchProgress),
    {
        let start = Instant::now();
        let size = self.config.population_size;
        let elites = ((self.config.elit_ratio * size as f64).ceil() as usize).min(size);
        let parents = ((self.config.parents_portion * size as f64).round() as usize)
            .clamp(2, size);

        let mut evaluations: u64 = 0;
        let mut generation = 0usize;
        let mut stagnation = 0usize;
        let mut best: Option<Candidate> = None;

        let mut population: Vec<CandidateMask> = (0..size)
            .map(|_| self.rng.random_mask(self.dimension))
            .collect();

        let stop_reason = 'search: loop {
            // evaluate the current generation
            let mut scored: Vec<Candidate> = Vec::with_capacity(size);
            for mask in &population {
                if self.cancelled.load(Ordering::Relaxed) {
                    break 'search StopReason::Cancelled;
                }
                let loss = objective(mask)?;
                evaluations += 1;
                scored.push(Candidate {
                    mask: mask.clone(),
                    loss,
                });
            }
            scored.sort_by(|a, b| a.loss.partial_cmp(&b.loss).unwrap());

            let generation_best = scored[0].loss;
            if best.as_ref().is_none_or(|b| generation_best < b.loss) {
                best = Some(scored[0].clone());
                stagnation = 0;
            } else {
                stagnation += 1;
            }

            generation += 1;
            callback(&SearchProgress {
                generation,
                total_generations: self.config.max_iterations,
                evaluations,
                best_loss: best.as_ref().map_or(f64::INFINITY, |b| b.loss),
                generation_best,
                stagnation_count: stagnation,
            });

            if generation >= self.config.max_iterations {
                break StopReason::MaxIterations;
            }
            if let Some(limit) = self.config.stagnation_limit
                && stagnation >= limit
            {
                break StopReason::Stagnation;
            }

            // next generation: elites carried unchanged, the rest bred
            // from the parent pool at the top of the ranking
            let mut next: Vec<CandidateMask> = scored
                .iter()
                .take(elites)
                .map(|candidate| candidate.mask.clone())
                .collect();
            while next.len() < size {
                let p1 = &scored[self.rng.pick_index(parents)].mask;
                let p2 = &scored[self.rng.pick_index(parents)].mask;
                let mut child = if self.rng.chance(self.config.crossover_probability) {
                    self.rng.crossover(p1, p2, self.config.crossover_type)
                } else {
                    p1.clone()
                };
                self.rng.mutate(&mut child, self.config.mutation_probability);
                next.push(child);
            }
            population = next;
        };

        Ok(SearchResult {
            best,
            generations: generation,
            evaluations,
            elapsed_seconds: start.elapsed().as_secs_f64(),
            stop_reason,
        })
    }
}
