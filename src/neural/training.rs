//! Parallel stochastic hill-climbing for a single network.

use super::network::Network;
use log::{debug, info};
use rayon::prelude::*;
use std::cmp::Ordering;

/// Hill-climbing state: the best network found so far
#[derive(Clone, Debug)]
pub struct HillClimber {
    best: Network,
    trials: usize,
    generation: u64,
}

impl HillClimber {
    /// Evaluate `network` and make it the starting point.
    ///
    /// Runs one trial per rayon worker thread each generation.
    pub fn new(mut network: Network) -> Self {
        network.train_pass();
        if network.error_history.is_empty() {
            network.error_history.push(network.error);
        }

        Self {
            best: network,
            trials: rayon::current_num_threads().max(1),
            generation: 0,
        }
    }

    /// Override the number of trials per generation
    pub fn with_trials(mut self, trials: usize) -> Self {
        self.trials = trials.max(1);
        self
    }

    /// Run one generation; returns true when the best network improved.
    ///
    /// Every trial clones the current best, mutates one weight and evaluates
    /// the result. The lowest-error trial replaces the best only when it is
    /// strictly better.
    pub fn step(&mut self) -> bool {
        let parent = &self.best;

        let trials: Vec<Network> = (0..self.trials)
            .into_par_iter()
            .map(|_| {
                let mut child = parent.clone();
                child.mutate();
                child.train_pass();
                child
            })
            .collect();

        self.generation += 1;

        let winner = trials
            .into_iter()
            .min_by(|a, b| a.error.partial_cmp(&b.error).unwrap_or(Ordering::Equal));

        match winner {
            Some(mut child) if child.error < self.best.error => {
                debug!(
                    "generation {}: error {:.8} -> {:.8}",
                    self.generation, self.best.error, child.error
                );
                child.error_history.push(child.error);
                self.best = child;
                true
            }
            _ => false,
        }
    }

    pub fn best(&self) -> &Network {
        &self.best
    }

    pub fn into_best(self) -> Network {
        self.best
    }

    pub fn error(&self) -> f64 {
        self.best.error
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn trials(&self) -> usize {
        self.trials
    }
}

impl Network {
    /// Hill-climb until the mean squared error drops below `error_threshold`.
    ///
    /// There is no iteration bound: an unreachable threshold never returns.
    /// Progress is logged every `log_interval` generations (0 disables it).
    pub fn train(self, log_interval: u64, error_threshold: f64) -> Network {
        let mut climber = HillClimber::new(self);
        info!(
            "training: {} trials per generation, initial error {:.8}",
            climber.trials(),
            climber.error()
        );

        loop {
            climber.step();

            let generation = climber.generation();
            if log_interval > 0 && generation % log_interval == 0 {
                info!("generation {} | error {:.8}", generation, climber.error());
            }

            if climber.error() < error_threshold {
                info!(
                    "converged after {} generations, error {:.8}",
                    generation,
                    climber.error()
                );
                return climber.into_best();
            }
        }
    }
}
