//! Population search over relict hierarchies.
//!
//! Each generation every candidate is scored by a caller-supplied [`Scorer`],
//! the population is ranked, the top candidates survive unchanged and the
//! remaining slots are refilled with mutated copies of the survivors.

use super::hierarchy::Relict;
use crate::checkpoint::Checkpoint;
use crate::config::PopulationConfig;
use crate::sample::positive_count;
use crate::stats::{GenerationStats, TrainingHistory};
use rand::Rng;
use rayon::prelude::*;

/// Fitness function for relict candidates.
///
/// Writes `candidate.result` and may set `candidate.terminate`. Called once
/// per candidate per generation, concurrently on distinct candidates.
pub trait Scorer: Sync {
    fn score(&self, candidate: &mut Relict);
}

impl<F> Scorer for F
where
    F: Fn(&mut Relict) + Sync,
{
    fn score(&self, candidate: &mut Relict) {
        self(candidate)
    }
}

fn rank_key(score: f64) -> f64 {
    if score.is_nan() {
        f64::NEG_INFINITY
    } else {
        score
    }
}

/// Candidates of the current generation. Never empty.
#[derive(Clone, Debug)]
pub struct Population {
    candidates: Vec<Relict>,
    generation: u64,
}

impl Population {
    /// `size` mutated copies of `base`, each carrying `best_count`
    pub fn seed(base: &Relict, size: usize, best_count: usize) -> Self {
        Self::seed_with(base, size, best_count, &mut rand::thread_rng())
    }

    pub fn seed_with<R: Rng + ?Sized>(
        base: &Relict,
        size: usize,
        best_count: usize,
        rng: &mut R,
    ) -> Self {
        let candidates = (0..size.max(1))
            .map(|_| {
                let mut candidate = base.clone();
                candidate.mutate_with(rng);
                candidate.best_count = best_count;
                candidate
            })
            .collect();

        Self {
            candidates,
            generation: 0,
        }
    }

    /// Clear every result record and termination flag, then score all
    /// candidates in parallel
    pub fn evaluate<S: Scorer + ?Sized>(&mut self, scorer: &S) {
        self.candidates.par_iter_mut().for_each(|candidate| {
            candidate.result.clear();
            candidate.terminate = false;
            scorer.score(candidate);
        });
    }

    /// Sort by descending score; ties keep their order and NaN scores rank last
    pub fn rank(&mut self) {
        self.candidates
            .sort_by(|a, b| rank_key(b.result.score).total_cmp(&rank_key(a.result.score)));
    }

    /// Keep the first `elite` candidates (at least one)
    pub fn truncate(&mut self, elite: usize) {
        self.candidates.truncate(elite.max(1));
    }

    /// Refill to `size` with mutated copies of the current members, round-robin
    pub fn regrow(&mut self, size: usize) {
        self.regrow_with(size, &mut rand::thread_rng());
    }

    pub fn regrow_with<R: Rng + ?Sized>(&mut self, size: usize, rng: &mut R) {
        let survivors = self.candidates.len();
        let mut parent = 0;
        while self.candidates.len() < size {
            let mut child = self.candidates[parent].clone();
            child.mutate_with(rng);
            self.candidates.push(child);
            parent = (parent + 1) % survivors;
        }
    }

    /// Truncate to `elite`, regrow to `size` and count the generation
    pub fn advance(&mut self, elite: usize, size: usize) {
        self.truncate(elite);
        self.regrow(size);
        self.generation += 1;
    }

    /// Highest-ranked candidate (after [`Population::rank`])
    pub fn best(&self) -> &Relict {
        &self.candidates[0]
    }

    pub fn into_best(mut self) -> Relict {
        self.candidates.swap_remove(0)
    }

    pub fn candidates(&self) -> &[Relict] {
        &self.candidates
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Summary of the current (ranked) generation
    pub fn stats(&self) -> GenerationStats {
        let top = self.best();
        let mean_score = self.candidates.iter().map(|c| c.result.score).sum::<f64>()
            / self.candidates.len() as f64;

        GenerationStats {
            generation: self.generation,
            population: self.candidates.len(),
            best_count: top.best_count,
            best: top.result.best,
            bad: top.result.bad,
            score: top.result.score,
            mean_score,
        }
    }
}

/// Drives a [`Population`] until a candidate asks to terminate
pub struct PopulationTrainer {
    pub config: PopulationConfig,
    pub history: TrainingHistory,
}

impl PopulationTrainer {
    pub fn new(config: PopulationConfig) -> Self {
        let history = TrainingHistory::new(config.log_interval.max(1));
        Self { config, history }
    }

    /// Evolve mutated copies of `base` until the top candidate sets `terminate`.
    ///
    /// Each generation is scored and ranked, then a terminating top candidate
    /// is returned before any checkpoint of that generation is written. There
    /// is no generation limit: a scorer that never terminates keeps the loop
    /// running forever.
    pub fn train<S: Scorer + ?Sized>(&mut self, base: &Relict, scorer: &S) -> Relict {
        let size = self.config.size.max(1);
        let elite = self.config.elite.clamp(1, size);
        let best_count = positive_count(base.samples());

        log::info!(
            "Population training: size={}, elite={}, best_count={}",
            size,
            elite,
            best_count
        );

        let mut population = Population::seed(base, size, best_count);

        loop {
            population.evaluate(scorer);
            population.rank();

            let generation = population.generation();
            if generation % self.history.interval == 0 {
                let stats = population.stats();
                if self.config.log_interval > 0 {
                    log::info!("{}", stats.summary());
                }
                self.history.record(stats);
            }

            if population.best().terminate {
                log::info!("Terminated at generation {}", generation);
                return population.into_best();
            }

            if generation >= self.config.checkpoint_interval
                && generation % self.config.checkpoint_interval.max(1) == 0
            {
                self.checkpoint(population.best(), generation);
            }

            population.advance(elite, size);
        }
    }

    fn checkpoint(&self, best: &Relict, generation: u64) {
        let Some(path) = &self.config.checkpoint_path else {
            return;
        };

        match Checkpoint::from_relict(best.clone(), generation).save(path) {
            Ok(()) => log::debug!("Checkpoint saved: {}", path.display()),
            Err(e) => log::warn!("Checkpoint failed: {}", e),
        }
    }
}

impl Relict {
    /// Population-train mutated copies of this hierarchy
    pub fn train<S: Scorer + ?Sized>(&self, config: &PopulationConfig, scorer: &S) -> Relict {
        PopulationTrainer::new(config.clone()).train(self, scorer)
    }
}
