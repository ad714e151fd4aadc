//! A single logistic unit.

use serde::{Deserialize, Serialize};

/// Position of a neuron's layer in the network
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    Input,
    #[default]
    Hidden,
    Output,
}

/// One computational unit
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Neuron {
    /// Accumulated input for the current pass
    pub input: f64,
    /// Last activation (raw input value for input neurons)
    pub output: f64,
    /// Signed error from the last evaluation, output neurons only
    pub error: f64,
    /// Outgoing weights, one per neuron of the next layer
    pub weights: Vec<f64>,
    pub role: Role,
}

impl Neuron {
    pub fn new(role: Role) -> Self {
        Self {
            role,
            ..Self::default()
        }
    }

    /// Squash the accumulated input through the logistic function and reset it
    #[inline]
    pub fn activate(&mut self) {
        self.output = sigmoid(self.input);
        self.input = 0.0;
    }

    #[inline]
    pub fn is_input(&self) -> bool {
        self.role == Role::Input
    }

    #[inline]
    pub fn is_output(&self) -> bool {
        self.role == Role::Output
    }
}

/// Logistic function, kept strictly inside (0, 1) for every finite input
#[inline]
pub fn sigmoid(x: f64) -> f64 {
    (1.0 / (1.0 + (-x).exp())).clamp(f64::MIN_POSITIVE, 1.0 - f64::EPSILON)
}
