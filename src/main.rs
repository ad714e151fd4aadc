//! RELICT - CLI Entry Point
//!
//! Mutation-trained networks and hierarchical ensembles.

use clap::{Parser, Subcommand};
use relict::checkpoint::{Checkpoint, Model};
use relict::{benchmark, Config, Network, Relict, SampleSet};
use std::path::{Path, PathBuf};
use std::time::Instant;

#[derive(Parser)]
#[command(name = "relict")]
#[command(version)]
#[command(about = "Mutation-trained networks and hierarchical population-evolved ensembles")]
struct Cli {
    /// Configuration file (YAML)
    #[arg(short, long, global = true, default_value = "config.yaml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Hill-climb a single network on a samples file
    Train {
        /// Samples file (JSON array of {inputs, targets})
        samples: PathBuf,

        /// Write the trained network snapshot here
        #[arg(short, long)]
        save: Option<PathBuf>,

        /// Write the snapshot as JSON instead of binary
        #[arg(long)]
        json: bool,
    },

    /// Evolve a relict hierarchy with the built-in classification scorer
    Evolve {
        /// Samples file (JSON array of {inputs, targets})
        samples: PathBuf,

        /// Write the per-generation history here (JSON)
        #[arg(long)]
        history: Option<PathBuf>,
    },

    /// Predict an input vector with a saved snapshot
    Predict {
        /// Snapshot file
        checkpoint: PathBuf,

        /// Comma-separated inputs
        #[arg(short, long, value_delimiter = ',', allow_hyphen_values = true)]
        input: Vec<f64>,
    },

    /// Summarize a snapshot file
    Inspect {
        /// Snapshot file
        checkpoint: PathBuf,
    },

    /// Run hill-climbing throughput benchmark
    Benchmark {
        /// Number of generations
        #[arg(short, long, default_value = "1000")]
        generations: u64,

        /// Hidden layers
        #[arg(long, default_value = "2")]
        hidden_layers: usize,

        /// Neurons per hidden layer
        #[arg(short, long, default_value = "30")]
        width: usize,
    },

    /// Generate default configuration file
    Init {
        /// Output path
        #[arg(short, long, default_value = "config.yaml")]
        output: PathBuf,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = load_config(&cli.config)?;

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(config.logging.log_level.as_str()),
    )
    .init();

    match cli.command {
        Commands::Train {
            samples,
            save,
            json,
        } => train_network(&config, &samples, save, json),

        Commands::Evolve { samples, history } => evolve(&config, &samples, history),

        Commands::Predict { checkpoint, input } => predict(&checkpoint, &input),

        Commands::Inspect { checkpoint } => inspect(&checkpoint),

        Commands::Benchmark {
            generations,
            hidden_layers,
            width,
        } => run_benchmark(generations, hidden_layers, width),

        Commands::Init { output } => generate_config(output),
    }
}

fn load_config(path: &Path) -> Result<Config, Box<dyn std::error::Error>> {
    if path.exists() {
        Ok(Config::from_file(path)?)
    } else {
        Ok(Config::default())
    }
}

fn train_network(
    config: &Config,
    samples_path: &Path,
    save: Option<PathBuf>,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let samples = SampleSet::load_json(samples_path)?.build();
    let net = Network::new(config.network.hidden_layers, config.network.width, samples)?;

    println!("Training network");
    println!("  Samples: {}", net.samples().len());
    println!(
        "  Topology: {} -> {}x{} -> {}",
        net.input_width(),
        config.network.hidden_layers,
        config.network.width,
        net.output_width()
    );
    println!("  Target error: {:e}", config.network.error_threshold);
    println!();

    let start = Instant::now();
    let mut trained = net.train(config.network.log_interval, config.network.error_threshold);

    println!();
    println!("=== Training Complete ===");
    println!("Time: {:.2}s", start.elapsed().as_secs_f64());
    println!("Error: {:.8}", trained.error);
    println!("Improvements: {}", trained.error_history.len().saturating_sub(1));

    let samples = trained.samples().clone();
    for sample in samples.iter() {
        println!(
            "inputs: {:?} | target: {:?} | result: {:?}",
            sample.inputs,
            sample.targets,
            trained.predict(&sample.inputs)
        );
    }

    if let Some(path) = save {
        let checkpoint = Checkpoint::from_network(trained, 0);
        if json {
            checkpoint.save_json(&path)?;
        } else {
            checkpoint.save(&path)?;
        }
        println!("Snapshot saved: {:?}", path);
    }

    Ok(())
}

/// Demonstration fitness: counts correctly classified positives and misses
fn classification_score(candidate: &mut Relict) {
    let samples = candidate.samples().clone();
    let mut squared = 0.0;

    for sample in samples.iter() {
        let output = candidate.predict(&sample.inputs)[0];
        let target = sample.targets[0];
        let label = if output >= 0.5 { 1.0 } else { 0.0 };

        if label != target {
            candidate.result.bad += 1;
        } else if target == 1.0 {
            candidate.result.best += 1;
        }
        squared += (target - output).powi(2);
    }

    candidate.error = squared / samples.len().max(1) as f64;
    candidate.result.score =
        candidate.result.best as f64 - candidate.result.bad as f64 - candidate.error;
    candidate.terminate = candidate.result.bad == 0 && candidate.result.best == candidate.best_count;
}

fn evolve(
    config: &Config,
    samples_path: &Path,
    history: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    let samples = SampleSet::load_json(samples_path)?.build();

    let base = match &config.population.checkpoint_path {
        Some(path) => Relict::load_or_build(&config.relict, samples, path)?,
        None => Relict::build(&config.relict, samples)?,
    };

    println!("Evolving relict");
    println!("  Layers: {}", base.layers.len());
    println!("  Nodes: {}", base.node_count());
    println!("  Weights: {}", base.weight_count());
    println!(
        "  Population: {} (elite {})",
        config.population.size, config.population.elite
    );
    println!();

    let start = Instant::now();
    let mut trainer = relict::PopulationTrainer::new(config.population.clone());
    let mut best = trainer.train(&base, &classification_score);

    println!();
    println!("=== Evolution Complete ===");
    println!("Time: {:.2}s", start.elapsed().as_secs_f64());
    println!(
        "Best: {} / {} | Bad: {} | Score: {:.4}",
        best.result.best, best.best_count, best.result.bad, best.result.score
    );

    let samples = best.samples().clone();
    for sample in samples.iter() {
        println!(
            "inputs: {:?} | target: {:?} | result: {:?}",
            sample.inputs,
            sample.targets,
            best.predict(&sample.inputs)
        );
    }

    if let Some(path) = &config.population.checkpoint_path {
        let generation = trainer.history.latest().map_or(0, |s| s.generation);
        Checkpoint::from_relict(best, generation).save(path)?;
        println!("Final checkpoint: {:?}", path);
    }

    if let Some(path) = history {
        trainer.history.save(&path)?;
        println!("History: {:?}", path);
    }

    Ok(())
}

fn predict(checkpoint_path: &Path, input: &[f64]) -> Result<(), Box<dyn std::error::Error>> {
    let checkpoint = Checkpoint::load(checkpoint_path)?;

    let expected = match &checkpoint.model {
        Model::Network(net) => net.input_width(),
        Model::Relict(relict) => relict.input_width(),
    };
    if input.len() != expected {
        return Err(format!("expected {} inputs, got {}", expected, input.len()).into());
    }

    let output = match checkpoint.model {
        Model::Network(mut net) => net.predict(input),
        Model::Relict(mut relict) => relict.predict(input),
    };
    println!("{:?}", output);

    Ok(())
}

fn inspect(checkpoint_path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    println!("=== Snapshot Analysis ===");
    println!("File: {:?}", checkpoint_path);
    println!();

    let checkpoint = Checkpoint::load(checkpoint_path)?;

    println!("Version: {}", checkpoint.version);
    println!("Generation: {}", checkpoint.generation);
    println!("Kind: {}", checkpoint.model.kind());

    match &checkpoint.model {
        Model::Network(net) => {
            let widths: Vec<usize> = net.layers.iter().map(Vec::len).collect();
            println!("Layers: {:?}", widths);
            println!("Weights: {}", net.weight_count());
            println!("Error: {:.8}", net.error);
            println!("Improvements: {}", net.error_history.len().saturating_sub(1));
        }
        Model::Relict(relict) => {
            let widths: Vec<usize> = relict.layers.iter().map(Vec::len).collect();
            println!("Node layers: {:?}", widths);
            println!("Inputs: {}", relict.input_width());
            println!("Weights: {}", relict.weight_count());
            println!(
                "Result: best {} / {} | bad {} | score {:.4}",
                relict.result.best, relict.best_count, relict.result.bad, relict.result.score
            );
        }
    }

    println!();
    println!(
        "Snapshot size: {:.2} KB",
        checkpoint.size_bytes() as f64 / 1_000.0
    );

    Ok(())
}

fn run_benchmark(
    generations: u64,
    hidden_layers: usize,
    width: usize,
) -> Result<(), Box<dyn std::error::Error>> {
    println!("=== RELICT Benchmark ===");
    println!("Generations: {}", generations);
    println!("Hidden: {}x{}", hidden_layers, width);
    println!();

    let result = benchmark(generations, hidden_layers, width)?;
    println!("{}", result);

    Ok(())
}

fn generate_config(output: PathBuf) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::default();
    config.save(&output)?;
    println!("Configuration saved to: {:?}", output);
    Ok(())
}
