//! # RELICT
//!
//! Small feed-forward networks trained by random single-weight mutation, and
//! hierarchical ensembles of such networks evolved by population search.
//!
//! ## Features
//!
//! - **Gradient-free**: the only search operator redraws one weight
//! - **Parallel**: hill-climbing trials and population scoring run on Rayon
//! - **Hierarchical**: layers of networks feeding the next layer's inputs
//! - **Resumable**: binary or JSON checkpoints of the top candidate
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use relict::{Network, SampleSet};
//!
//! let samples = SampleSet::new()
//!     .add(vec![0.0, 0.0, 0.0], vec![0.0])
//!     .add(vec![1.0, 0.0, 0.0], vec![1.0])
//!     .add(vec![0.0, 1.0, 0.0], vec![0.0])
//!     .add(vec![0.0, 0.0, 1.0], vec![1.0])
//!     .build();
//!
//! let net = Network::new(2, 30, samples).unwrap();
//! let mut trained = net.train(100, 1e-6);
//!
//! println!("{:?}", trained.predict(&[1.0, 0.0, 0.0]));
//! ```
//!
//! ## Population training
//!
//! ```rust,no_run
//! use relict::{Config, Relict, SampleSet};
//!
//! let config = Config::default();
//! let samples = SampleSet::new()
//!     .add(vec![0.0, 1.0], vec![1.0])
//!     .add(vec![1.0, 1.0], vec![0.0])
//!     .build();
//!
//! let base = Relict::build(&config.relict, samples).unwrap();
//! let best = base.train(&config.population, &|candidate: &mut Relict| {
//!     let samples = candidate.samples().clone();
//!     let mut hits = 0;
//!     for sample in samples.iter() {
//!         let out = candidate.predict(&sample.inputs)[0];
//!         if (out - sample.targets[0]).abs() < 0.5 {
//!             hits += 1;
//!         }
//!     }
//!     candidate.result.score = hits as f64;
//!     candidate.terminate = hits == samples.len();
//! });
//!
//! println!("score: {}", best.result.score);
//! ```

pub mod checkpoint;
pub mod config;
pub mod ensemble;
pub mod error;
pub mod neural;
pub mod sample;
pub mod stats;

// Re-export main types
pub use checkpoint::{Checkpoint, CheckpointError};
pub use config::Config;
pub use ensemble::{Population, PopulationTrainer, Relict, Scorer};
pub use error::{BuildError, TopologyError};
pub use neural::{HillClimber, Network};
pub use sample::{SampleSet, Samples, TrainingSample};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Time `generations` hill-climbing generations on a three-input problem
pub fn benchmark(
    generations: u64,
    hidden_layers: usize,
    width: usize,
) -> Result<BenchmarkResult, BuildError> {
    use std::time::Instant;

    let samples = SampleSet::new()
        .add(vec![0.0, 0.0, 0.0], vec![0.0])
        .add(vec![1.0, 0.0, 0.0], vec![1.0])
        .add(vec![0.0, 1.0, 0.0], vec![0.0])
        .add(vec![0.0, 0.0, 1.0], vec![1.0])
        .build();

    let mut climber = HillClimber::new(Network::new(hidden_layers, width, samples)?);
    let initial_error = climber.error();

    let start = Instant::now();
    for _ in 0..generations {
        climber.step();
    }
    let elapsed = start.elapsed();

    Ok(BenchmarkResult {
        generations,
        trials: climber.trials(),
        weights: climber.best().weight_count(),
        initial_error,
        final_error: climber.error(),
        elapsed_secs: elapsed.as_secs_f64(),
        generations_per_second: generations as f64 / elapsed.as_secs_f64(),
    })
}

/// Benchmark result
#[derive(Debug, Clone)]
pub struct BenchmarkResult {
    pub generations: u64,
    pub trials: usize,
    pub weights: usize,
    pub initial_error: f64,
    pub final_error: f64,
    pub elapsed_secs: f64,
    pub generations_per_second: f64,
}

impl std::fmt::Display for BenchmarkResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "=== Benchmark Results ===")?;
        writeln!(f, "Generations: {}", self.generations)?;
        writeln!(f, "Trials/generation: {}", self.trials)?;
        writeln!(f, "Weights: {}", self.weights)?;
        writeln!(f, "Error: {:.6} -> {:.6}", self.initial_error, self.final_error)?;
        writeln!(f, "Time: {:.3}s", self.elapsed_secs)?;
        writeln!(f, "Speed: {:.1} generations/s", self.generations_per_second)?;
        Ok(())
    }
}
