//! Training samples shared read-only by every candidate.

use crate::error::BuildError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;

/// Shared, immutable sample sequence
pub type Samples = Arc<[TrainingSample]>;

/// One (inputs, targets) pair
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TrainingSample {
    pub inputs: Vec<f64>,
    pub targets: Vec<f64>,
}

impl TrainingSample {
    pub fn new(inputs: Vec<f64>, targets: Vec<f64>) -> Self {
        Self { inputs, targets }
    }
}

/// Builder for a sample sequence
#[derive(Clone, Debug, Default)]
pub struct SampleSet {
    samples: Vec<TrainingSample>,
}

impl SampleSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a sample
    pub fn add(mut self, inputs: Vec<f64>, targets: Vec<f64>) -> Self {
        self.samples.push(TrainingSample::new(inputs, targets));
        self
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Freeze into a shared sequence
    pub fn build(self) -> Samples {
        self.samples.into()
    }

    /// Load samples from a JSON array of `{ "inputs": [...], "targets": [...] }`
    pub fn load_json<P: AsRef<Path>>(path: P) -> std::io::Result<Self> {
        let json = std::fs::read_to_string(path)?;
        let samples: Vec<TrainingSample> = serde_json::from_str(&json)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        Ok(Self { samples })
    }

    /// Save samples as pretty JSON
    pub fn save_json<P: AsRef<Path>>(&self, path: P) -> std::io::Result<()> {
        let json = serde_json::to_string_pretty(&self.samples)?;
        std::fs::write(path, json)
    }
}

impl From<Vec<TrainingSample>> for SampleSet {
    fn from(samples: Vec<TrainingSample>) -> Self {
        Self { samples }
    }
}

/// Validate that every sample matches the first one's widths.
///
/// Returns `(input_width, target_width)`.
pub fn sample_shape(samples: &[TrainingSample]) -> Result<(usize, usize), BuildError> {
    let first = samples.first().ok_or(BuildError::EmptySamples)?;
    let (n_inputs, n_targets) = (first.inputs.len(), first.targets.len());

    if n_inputs == 0 {
        return Err(BuildError::ZeroWidth { layer: "input" });
    }
    if n_targets == 0 {
        return Err(BuildError::ZeroWidth { layer: "output" });
    }

    for (index, sample) in samples.iter().enumerate().skip(1) {
        if sample.inputs.len() != n_inputs {
            return Err(BuildError::InputWidthMismatch {
                index,
                expected: n_inputs,
                found: sample.inputs.len(),
            });
        }
        if sample.targets.len() != n_targets {
            return Err(BuildError::TargetWidthMismatch {
                index,
                expected: n_targets,
                found: sample.targets.len(),
            });
        }
    }

    Ok((n_inputs, n_targets))
}

/// Number of samples whose first target is exactly 1
pub fn positive_count(samples: &[TrainingSample]) -> usize {
    samples
        .iter()
        .filter(|s| s.targets.first().copied() == Some(1.0))
        .count()
}
