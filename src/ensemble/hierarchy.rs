//! Hierarchy of network nodes chained layer to layer.

use super::node::RelictNode;
use crate::checkpoint::{Checkpoint, CheckpointError};
use crate::config::RelictConfig;
use crate::error::{BuildError, TopologyError};
use crate::neural::WeightSite;
use crate::sample::{sample_shape, Samples};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;

fn no_samples() -> Samples {
    Arc::from(Vec::new())
}

/// Ranking record written by the caller's scorer
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RelictResult {
    pub score: f64,
    pub best: usize,
    pub bad: usize,
}

impl RelictResult {
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// Location of one weight inside a hierarchy
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct RelictSite {
    pub layer: usize,
    pub node: usize,
    pub weight: WeightSite,
}

/// Layered ensemble of small networks
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Relict {
    /// Shape used to build the hierarchy
    pub shape: RelictConfig,
    /// Node layers; the last one holds the single aggregation node
    pub layers: Vec<Vec<RelictNode>>,
    /// Running error, free for the scorer to use
    pub error: f64,
    /// Set by the scorer to stop population training
    pub terminate: bool,
    pub result: RelictResult,
    /// Number of training samples whose first target is 1
    pub best_count: usize,
    #[serde(skip, default = "no_samples")]
    samples: Samples,
}

impl Relict {
    /// Build a fresh hierarchy sized to the samples' input width
    pub fn build(shape: &RelictConfig, samples: Samples) -> Result<Self, BuildError> {
        Self::build_with_rng(shape, samples, &mut rand::thread_rng())
    }

    /// Same as [`Relict::build`] with an explicit random source
    pub fn build_with_rng<R: Rng + ?Sized>(
        shape: &RelictConfig,
        samples: Samples,
        rng: &mut R,
    ) -> Result<Self, BuildError> {
        if shape.depth == 0 || shape.width == 0 {
            return Err(BuildError::EmptyHierarchy {
                depth: shape.depth,
                width: shape.width,
            });
        }
        let (n_inputs, _) = sample_shape(&samples)?;

        let mut layers = Vec::with_capacity(shape.depth + 1);
        let mut fan_in = n_inputs;
        for _ in 0..shape.depth {
            let layer = (0..shape.width)
                .map(|_| RelictNode::new(fan_in, shape, rng))
                .collect::<Result<Vec<_>, _>>()?;
            fan_in = layer.len();
            layers.push(layer);
        }
        layers.push(vec![RelictNode::new(fan_in, shape, rng)?]);

        Ok(Self {
            shape: shape.clone(),
            layers,
            error: 0.0,
            terminate: false,
            result: RelictResult::default(),
            best_count: 0,
            samples,
        })
    }

    /// Resume from the checkpoint at `path`, or build fresh when there is none.
    ///
    /// A missing, corrupt or incompatible checkpoint is not an error.
    pub fn load_or_build<P: AsRef<Path>>(
        shape: &RelictConfig,
        samples: Samples,
        path: P,
    ) -> Result<Self, BuildError> {
        let path = path.as_ref();
        let (n_inputs, _) = sample_shape(&samples)?;

        match Checkpoint::load(path).and_then(Checkpoint::into_relict) {
            Ok(mut relict) if relict.input_width() == n_inputs => {
                log::info!(
                    "Resumed relict from {} ({} nodes)",
                    path.display(),
                    relict.node_count()
                );
                relict.attach_samples(samples);
                return Ok(relict);
            }
            Ok(relict) => log::warn!(
                "Checkpoint {} expects {} inputs, samples have {}; building fresh",
                path.display(),
                relict.input_width(),
                n_inputs
            ),
            Err(CheckpointError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                log::debug!("No checkpoint at {}", path.display())
            }
            Err(e) => log::warn!("Ignoring checkpoint {}: {}", path.display(), e),
        }

        Self::build(shape, samples)
    }

    /// Feed `inputs` through every layer; returns the aggregation layer's outputs
    pub fn predict(&mut self, inputs: &[f64]) -> Vec<f64> {
        let mut carry = inputs.to_vec();
        for layer in &mut self.layers {
            carry = layer.iter_mut().map(|node| node.predict(&carry)).collect();
        }
        carry
    }

    /// Mutate one weight of one node's network
    pub fn mutate(&mut self) -> RelictSite {
        self.mutate_with(&mut rand::thread_rng())
    }

    /// Mutate one weight using `rng`; layer and node are drawn uniformly
    pub fn mutate_with<R: Rng + ?Sized>(&mut self, rng: &mut R) -> RelictSite {
        let layer = rng.gen_range(0..self.layers.len());
        let node = rng.gen_range(0..self.layers[layer].len());
        let weight = self.layers[layer][node].net.mutate_with(rng);

        RelictSite {
            layer,
            node,
            weight,
        }
    }

    /// Verify every node network and the chaining between node layers
    pub fn check_topology(&self) -> Result<(), TopologyError> {
        if self.layers.len() < 2 {
            return Err(TopologyError::ShallowHierarchy(self.layers.len()));
        }
        if let Some(layer) = self.layers.iter().position(Vec::is_empty) {
            return Err(TopologyError::EmptyNodeLayer { layer });
        }
        let aggregation = self.layers[self.layers.len() - 1].len();
        if aggregation != 1 {
            return Err(TopologyError::Aggregation(aggregation));
        }

        // The first node fixes the external input width
        let mut fan_in = None;
        for (layer, nodes) in self.layers.iter().enumerate() {
            for (node, n) in nodes.iter().enumerate() {
                n.net.check_topology().map_err(|e| TopologyError::Node {
                    layer,
                    node,
                    source: Box::new(e),
                })?;

                let expected = *fan_in.get_or_insert(n.net.input_width());
                if n.net.input_width() != expected {
                    return Err(TopologyError::FanIn {
                        layer,
                        node,
                        expected,
                        found: n.net.input_width(),
                    });
                }
                if n.net.output_width() != 1 {
                    return Err(TopologyError::NodeOutputs {
                        layer,
                        node,
                        found: n.net.output_width(),
                    });
                }
            }
            fan_in = Some(nodes.len());
        }
        Ok(())
    }

    /// Width of the external input vector
    pub fn input_width(&self) -> usize {
        self.layers
            .first()
            .and_then(|layer| layer.first())
            .map_or(0, |node| node.net.input_width())
    }

    pub fn node_count(&self) -> usize {
        self.layers.iter().map(Vec::len).sum()
    }

    /// Every weight of every node, in layer order
    pub fn weights(&self) -> impl Iterator<Item = f64> + '_ {
        self.layers.iter().flatten().flat_map(|node| node.net.weights())
    }

    pub fn weight_count(&self) -> usize {
        self.layers
            .iter()
            .flatten()
            .map(|node| node.net.weight_count())
            .sum()
    }

    /// Training data shared with the scorer
    pub fn samples(&self) -> &Samples {
        &self.samples
    }

    pub fn attach_samples(&mut self, samples: Samples) {
        self.samples = samples;
    }
}
