//! Configuration for training runs.
//!
//! Loaded from YAML with defaults for every section.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub network: NetworkConfig,
    #[serde(default)]
    pub relict: RelictConfig,
    #[serde(default)]
    pub population: PopulationConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Standalone network trained by hill-climbing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkConfig {
    /// Number of hidden layers
    pub hidden_layers: usize,
    /// Neurons per hidden layer
    pub width: usize,
    /// Generations between progress logs (0 = silent)
    pub log_interval: u64,
    /// Training stops once the mean squared error is below this
    pub error_threshold: f64,
}

/// Shape of a relict hierarchy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelictConfig {
    /// Number of node layers before the aggregation node
    pub depth: usize,
    /// Nodes per layer
    pub width: usize,
    /// Hidden layers inside each node network
    pub net_layers: usize,
    /// Neurons per hidden layer inside each node network
    pub net_neurons: usize,
}

/// Population search parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PopulationConfig {
    /// Candidates per generation
    pub size: usize,
    /// Survivors kept after ranking
    pub elite: usize,
    /// Generations between checkpoints of the top candidate
    pub checkpoint_interval: u64,
    /// Checkpoint file, `None` disables checkpointing
    pub checkpoint_path: Option<PathBuf>,
    /// Generations between progress logs (0 = silent)
    pub log_interval: u64,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    pub log_level: String,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            hidden_layers: 2,
            width: 30,
            log_interval: 1,
            error_threshold: 1e-6,
        }
    }
}

impl Default for RelictConfig {
    fn default() -> Self {
        Self {
            depth: 1,
            width: 5,
            net_layers: 1,
            net_neurons: 5,
        }
    }
}

impl Default for PopulationConfig {
    fn default() -> Self {
        Self {
            size: 8,
            elite: 1,
            checkpoint_interval: 100,
            checkpoint_path: Some(PathBuf::from("relict.ckpt")),
            log_interval: 1,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

/// Errors from loading, saving or validating a configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

impl Config {
    /// Load configuration from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a YAML file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let yaml = serde_yaml::to_string(self)?;
        std::fs::write(path, yaml)?;
        Ok(())
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |msg: &str| Err(ConfigError::Invalid(msg.to_string()));

        if self.network.hidden_layers > 0 && self.network.width == 0 {
            return invalid("network.width must be > 0 when hidden_layers > 0");
        }
        if self.network.error_threshold.is_nan() || self.network.error_threshold <= 0.0 {
            return invalid("network.error_threshold must be > 0");
        }
        if self.relict.depth == 0 || self.relict.width == 0 {
            return invalid("relict.depth and relict.width must be > 0");
        }
        if self.relict.net_layers > 0 && self.relict.net_neurons == 0 {
            return invalid("relict.net_neurons must be > 0 when net_layers > 0");
        }
        if self.population.size == 0 {
            return invalid("population.size must be > 0");
        }
        if self.population.elite == 0 || self.population.elite > self.population.size {
            return invalid("population.elite must be between 1 and population.size");
        }
        if self.population.checkpoint_interval == 0 {
            return invalid("population.checkpoint_interval must be > 0");
        }
        Ok(())
    }
}
