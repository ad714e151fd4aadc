//! Feed-forward networks trained by single-weight mutation.
//!
//! - Logistic neurons arranged in dense layers
//! - One-weight random mutation as the only search operator
//! - Parallel hill-climbing trainer that only accepts strict improvements

mod mutations;
mod network;
mod neuron;
mod training;

pub use mutations::WeightSite;
pub use network::{random_weight, Network};
pub use neuron::{sigmoid, Neuron, Role};
pub use training::HillClimber;
