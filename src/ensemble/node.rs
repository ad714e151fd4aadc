//! A single network-bearing node of the hierarchy.

use crate::config::RelictConfig;
use crate::error::BuildError;
use crate::neural::Network;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// One network plus the last input it saw and the output it produced
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RelictNode {
    pub net: Network,
    pub output: f64,
    pub inputs: Vec<f64>,
}

impl RelictNode {
    /// Node with `n_inputs` inputs and a single output
    pub fn new<R: Rng + ?Sized>(
        n_inputs: usize,
        shape: &RelictConfig,
        rng: &mut R,
    ) -> Result<Self, BuildError> {
        let net = Network::with_shape(n_inputs, shape.net_layers, shape.net_neurons, 1, rng)?;

        Ok(Self {
            net,
            output: 0.0,
            inputs: vec![0.0; n_inputs],
        })
    }

    /// Predict from `inputs`, caching both the inputs and the scalar output
    pub fn predict(&mut self, inputs: &[f64]) -> f64 {
        self.inputs.clear();
        self.inputs.extend_from_slice(inputs);
        self.output = self.net.predict(inputs)[0];
        self.output
    }
}
