//! Per-generation statistics for population training.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Statistics snapshot for one ranked generation
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GenerationStats {
    /// Generation index, starting at 0
    pub generation: u64,
    /// Number of candidates scored
    pub population: usize,
    /// Samples whose first target is 1
    pub best_count: usize,
    /// Top candidate's "best" counter
    pub best: usize,
    /// Top candidate's "bad" counter
    pub bad: usize,
    /// Top candidate's score
    pub score: f64,
    /// Mean score across the generation
    pub mean_score: f64,
}

impl GenerationStats {
    /// Format stats as a one-line summary
    pub fn summary(&self) -> String {
        format!(
            "Gen:{:6} | Pop:{:4} | BestCount:{:4} | Best:{:4} | Bad:{:4} | Score:{:.4} | Mean:{:.4}",
            self.generation,
            self.population,
            self.best_count,
            self.best,
            self.bad,
            self.score,
            self.mean_score,
        )
    }
}

/// Historical statistics tracker
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct TrainingHistory {
    /// Recorded snapshots, oldest first
    pub snapshots: Vec<GenerationStats>,
    /// Generations between recorded snapshots
    pub interval: u64,
}

impl TrainingHistory {
    /// Create new history with recording interval
    pub fn new(interval: u64) -> Self {
        Self {
            snapshots: Vec::new(),
            interval: interval.max(1),
        }
    }

    /// Record a stats snapshot
    pub fn record(&mut self, stats: GenerationStats) {
        self.snapshots.push(stats);
    }

    /// Most recent snapshot
    pub fn latest(&self) -> Option<&GenerationStats> {
        self.snapshots.last()
    }

    /// Top score over time
    pub fn score_series(&self) -> Vec<(u64, f64)> {
        self.snapshots
            .iter()
            .map(|s| (s.generation, s.score))
            .collect()
    }

    /// Mean score over time
    pub fn mean_series(&self) -> Vec<(u64, f64)> {
        self.snapshots
            .iter()
            .map(|s| (s.generation, s.mean_score))
            .collect()
    }

    /// Save history as JSON
    pub fn save<P: AsRef<Path>>(&self, path: P) -> std::io::Result<()> {
        let json = serde_json::to_string(self)?;
        std::fs::write(path, json)
    }

    /// Load history from JSON
    pub fn load<P: AsRef<Path>>(path: P) -> std::io::Result<Self> {
        let json = std::fs::read_to_string(path)?;
        serde_json::from_str(&json)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))
    }
}
