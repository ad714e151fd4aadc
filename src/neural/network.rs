//! Layered feed-forward network and forward propagation.

use super::neuron::{Neuron, Role};
use crate::error::{BuildError, TopologyError};
use crate::sample::{sample_shape, Samples, TrainingSample};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

fn no_samples() -> Samples {
    Arc::from(Vec::new())
}

/// Feed-forward network of logistic neurons
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Network {
    /// Number of hidden layers
    pub hidden_layers: usize,
    /// Neurons per hidden layer
    pub width: usize,
    /// Input layer, hidden layers, output layer
    pub layers: Vec<Vec<Neuron>>,
    /// Mean squared error from the last training pass
    pub error: f64,
    /// Best error after each accepted improvement
    pub error_history: Vec<f64>,
    /// Shared training data, never written to snapshots
    #[serde(skip, default = "no_samples")]
    samples: Samples,
}

impl Network {
    /// Build a network shaped by the first sample and randomize its weights
    pub fn new(hidden_layers: usize, width: usize, samples: Samples) -> Result<Self, BuildError> {
        Self::new_with_rng(hidden_layers, width, samples, &mut rand::thread_rng())
    }

    /// Same as [`Network::new`] with an explicit random source
    pub fn new_with_rng<R: Rng + ?Sized>(
        hidden_layers: usize,
        width: usize,
        samples: Samples,
        rng: &mut R,
    ) -> Result<Self, BuildError> {
        let (n_inputs, n_outputs) = sample_shape(&samples)?;
        let mut net = Self::with_shape(n_inputs, hidden_layers, width, n_outputs, rng)?;
        net.samples = samples;
        Ok(net)
    }

    /// Build a network of explicit shape with no training data attached
    pub fn with_shape<R: Rng + ?Sized>(
        n_inputs: usize,
        hidden_layers: usize,
        width: usize,
        n_outputs: usize,
        rng: &mut R,
    ) -> Result<Self, BuildError> {
        if n_inputs == 0 {
            return Err(BuildError::ZeroWidth { layer: "input" });
        }
        if n_outputs == 0 {
            return Err(BuildError::ZeroWidth { layer: "output" });
        }
        if hidden_layers > 0 && width == 0 {
            return Err(BuildError::ZeroWidth { layer: "hidden" });
        }

        let mut layers = Vec::with_capacity(hidden_layers + 2);
        layers.push(vec![Neuron::new(Role::Input); n_inputs]);
        for _ in 0..hidden_layers {
            layers.push(vec![Neuron::new(Role::Hidden); width]);
        }
        layers.push(vec![Neuron::new(Role::Output); n_outputs]);

        let mut net = Self {
            hidden_layers,
            width,
            layers,
            error: 0.0,
            error_history: Vec::new(),
            samples: no_samples(),
        };
        net.randomize_weights(rng);
        Ok(net)
    }

    /// Give every non-output neuron one fresh uniform[-1, 1] weight per next-layer neuron
    pub fn randomize_weights<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        for i in 0..self.layers.len() - 1 {
            let next_width = self.layers[i + 1].len();
            for neuron in &mut self.layers[i] {
                neuron.weights = (0..next_width).map(|_| random_weight(rng)).collect();
            }
        }
    }

    /// Predict outputs for one input vector.
    ///
    /// Missing trailing inputs read as 0 and extra inputs are ignored.
    pub fn predict(&mut self, inputs: &[f64]) -> Vec<f64> {
        self.load_inputs(inputs);
        self.propagate();
        self.output_layer().iter().map(|n| n.output).collect()
    }

    /// Run one sample and return its summed squared error
    pub fn evaluate(&mut self, sample: &TrainingSample) -> f64 {
        self.load_inputs(&sample.inputs);
        self.propagate();

        let output = self.output_layer_mut();
        let mut sum = 0.0;
        for (neuron, &target) in output.iter_mut().zip(&sample.targets) {
            neuron.error = target - neuron.output;
            sum += neuron.error * neuron.error;
        }
        sum
    }

    /// Evaluate every attached sample and store the mean error
    pub fn train_pass(&mut self) -> f64 {
        if self.samples.is_empty() {
            return self.error;
        }

        let samples = Arc::clone(&self.samples);
        let total: f64 = samples.iter().map(|s| self.evaluate(s)).sum();
        self.error = total / samples.len() as f64;
        self.error
    }

    fn load_inputs(&mut self, inputs: &[f64]) {
        for (i, neuron) in self.layers[0].iter_mut().enumerate() {
            neuron.output = inputs.get(i).copied().unwrap_or(0.0);
        }
    }

    fn propagate(&mut self) {
        for i in 0..self.layers.len() - 1 {
            let (done, rest) = self.layers.split_at_mut(i + 1);
            let (current, next) = (&done[i], &mut rest[0]);

            for neuron in current {
                for (target, &w) in next.iter_mut().zip(&neuron.weights) {
                    target.input += neuron.output * w;
                }
            }
            for neuron in next.iter_mut() {
                neuron.activate();
            }
        }
    }

    #[inline]
    pub fn input_width(&self) -> usize {
        self.layers[0].len()
    }

    #[inline]
    pub fn output_width(&self) -> usize {
        self.output_layer().len()
    }

    #[inline]
    fn output_layer(&self) -> &[Neuron] {
        &self.layers[self.layers.len() - 1]
    }

    #[inline]
    fn output_layer_mut(&mut self) -> &mut [Neuron] {
        let last = self.layers.len() - 1;
        &mut self.layers[last]
    }

    /// Training data attached to this network
    pub fn samples(&self) -> &Samples {
        &self.samples
    }

    /// Replace the attached training data
    pub fn attach_samples(&mut self, samples: Samples) {
        self.samples = samples;
    }

    /// Iterate over every weight in layer order
    pub fn weights(&self) -> impl Iterator<Item = f64> + '_ {
        self.layers
            .iter()
            .flatten()
            .flat_map(|n| n.weights.iter().copied())
    }

    /// Total number of weights
    pub fn weight_count(&self) -> usize {
        self.layers
            .windows(2)
            .map(|pair| pair[0].len() * pair[1].len())
            .sum()
    }

    /// Check that no weight is NaN or infinite
    pub fn is_valid(&self) -> bool {
        self.weights().all(f64::is_finite)
    }

    /// Verify layer roles, weight counts and weight values
    pub fn check_topology(&self) -> Result<(), TopologyError> {
        let last = match self.layers.len() {
            n if n < 2 => return Err(TopologyError::TooFewLayers(n)),
            n => n - 1,
        };

        if let Some(layer) = self.layers.iter().position(Vec::is_empty) {
            return Err(TopologyError::EmptyLayer { layer });
        }

        for (layer, neurons) in self.layers.iter().enumerate() {
            let role = match layer {
                0 => Role::Input,
                l if l == last => Role::Output,
                _ => Role::Hidden,
            };
            let expected = self.layers.get(layer + 1).map_or(0, Vec::len);

            for (neuron, n) in neurons.iter().enumerate() {
                if n.role != role {
                    return Err(TopologyError::WrongRole { layer, neuron });
                }
                if n.weights.len() != expected {
                    return Err(TopologyError::WeightCount {
                        layer,
                        neuron,
                        expected,
                        found: n.weights.len(),
                    });
                }
            }
        }

        if !self.is_valid() {
            return Err(TopologyError::NonFinite);
        }
        Ok(())
    }
}

/// One uniform draw from [-1, 1]
#[inline]
pub fn random_weight<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    rng.gen_range(-1.0..=1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sample::SampleSet;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn samples() -> Samples {
        SampleSet::new()
            .add(vec![0.0, 0.0, 0.0], vec![0.0])
            .add(vec![1.0, 0.0, 0.0], vec![1.0])
            .add(vec![0.0, 1.0, 0.0], vec![0.0])
            .add(vec![0.0, 0.0, 1.0], vec![1.0])
            .build()
    }

    #[test]
    fn test_topology_from_samples() {
        let net = Network::new(2, 7, samples()).unwrap();

        assert_eq!(net.layers.len(), 4);
        assert_eq!(net.input_width(), 3);
        assert_eq!(net.layers[1].len(), 7);
        assert_eq!(net.layers[2].len(), 7);
        assert_eq!(net.output_width(), 1);
        assert_eq!(net.weight_count(), 3 * 7 + 7 * 7 + 7);
    }

    #[test]
    fn test_roles_and_weight_counts() {
        let net = Network::new(1, 4, samples()).unwrap();
        let last = net.layers.len() - 1;

        for (i, layer) in net.layers.iter().enumerate() {
            for neuron in layer {
                assert_eq!(neuron.is_input(), i == 0);
                assert_eq!(neuron.is_output(), i == last);
                if i == last {
                    assert!(neuron.weights.is_empty());
                } else {
                    assert_eq!(neuron.weights.len(), net.layers[i + 1].len());
                }
            }
        }
    }

    #[test]
    fn test_weights_in_unit_range() {
        let net = Network::new(2, 30, samples()).unwrap();
        assert!(net.weights().all(|w| (-1.0..=1.0).contains(&w)));
        assert!(net.is_valid());
    }

    #[test]
    fn test_empty_samples_rejected() {
        let err = Network::new(1, 3, SampleSet::new().build()).unwrap_err();
        assert_eq!(err, BuildError::EmptySamples);
    }

    #[test]
    fn test_zero_hidden_width_rejected() {
        let err = Network::new(2, 0, samples()).unwrap_err();
        assert_eq!(err, BuildError::ZeroWidth { layer: "hidden" });
    }

    #[test]
    fn test_no_hidden_layers() {
        let mut net = Network::new(0, 0, samples()).unwrap();
        assert_eq!(net.layers.len(), 2);
        let out = net.predict(&[1.0, 0.0, 0.0]);
        assert_eq!(out.len(), 1);
    }

    #[test]
    fn test_predict_deterministic() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let mut net = Network::new_with_rng(2, 10, samples(), &mut rng).unwrap();

        let a = net.predict(&[0.3, 0.6, 0.9]);
        let _ = net.predict(&[1.0, 1.0, 1.0]);
        let b = net.predict(&[0.3, 0.6, 0.9]);

        assert_eq!(a, b);
        assert!(a.iter().all(|&x| x > 0.0 && x < 1.0));
    }

    #[test]
    fn test_same_seed_same_network() {
        let a = Network::new_with_rng(1, 5, samples(), &mut ChaCha8Rng::seed_from_u64(3)).unwrap();
        let b = Network::new_with_rng(1, 5, samples(), &mut ChaCha8Rng::seed_from_u64(3)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_hand_computed_forward() {
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let mut net = Network::with_shape(2, 0, 0, 1, &mut rng).unwrap();
        net.layers[0][0].weights = vec![0.5];
        net.layers[0][1].weights = vec![-0.25];

        let out = net.predict(&[1.0, 2.0]);
        assert_eq!(out, vec![crate::neural::sigmoid(0.0)]);

        let out = net.predict(&[1.0, 0.0]);
        assert!((out[0] - crate::neural::sigmoid(0.5)).abs() < 1e-15);
    }

    #[test]
    fn test_evaluate_records_signed_error() {
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let mut net = Network::with_shape(1, 0, 0, 1, &mut rng).unwrap();
        net.layers[0][0].weights = vec![0.0];

        let sample = TrainingSample::new(vec![1.0], vec![1.0]);
        let sse = net.evaluate(&sample);

        assert_eq!(net.layers[1][0].error, 0.5);
        assert_eq!(sse, 0.25);
    }

    #[test]
    fn test_train_pass_mean_error() {
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let mut net = Network::with_shape(1, 0, 0, 1, &mut rng).unwrap();
        net.layers[0][0].weights = vec![0.0];
        net.attach_samples(
            SampleSet::new()
                .add(vec![1.0], vec![1.0])
                .add(vec![0.0], vec![0.0])
                .build(),
        );

        // Both samples produce 0.5, so each squared error is 0.25
        assert_eq!(net.train_pass(), 0.25);
        assert_eq!(net.error, 0.25);
    }

    #[test]
    fn test_serialization_skips_samples() {
        let net = Network::new(1, 4, samples()).unwrap();
        let bytes = bincode::serialize(&net).unwrap();
        let restored: Network = bincode::deserialize(&bytes).unwrap();

        assert!(restored.samples().is_empty());
        assert_eq!(restored.layers, net.layers);
    }

    #[test]
    fn test_check_topology_accepts_built_networks() {
        for &(hidden, width) in &[(0, 0), (1, 4), (3, 2)] {
            let net = Network::new(hidden, width, samples()).unwrap();
            assert_eq!(net.check_topology(), Ok(()));
        }
    }

    #[test]
    fn test_check_topology_rejects_damage() {
        let net = Network::new(1, 4, samples()).unwrap();

        let mut truncated = net.clone();
        truncated.layers.truncate(1);
        truncated.layers[0].iter_mut().for_each(|n| n.weights.clear());
        assert_eq!(truncated.check_topology(), Err(TopologyError::TooFewLayers(1)));

        let mut short = net.clone();
        short.layers[1][2].weights.pop();
        assert_eq!(
            short.check_topology(),
            Err(TopologyError::WeightCount {
                layer: 1,
                neuron: 2,
                expected: 1,
                found: 0
            })
        );

        let mut roles = net.clone();
        roles.layers[2][0].role = Role::Hidden;
        assert_eq!(
            roles.check_topology(),
            Err(TopologyError::WrongRole { layer: 2, neuron: 0 })
        );

        let mut empty = net.clone();
        empty.layers[1].clear();
        assert_eq!(empty.check_topology(), Err(TopologyError::EmptyLayer { layer: 1 }));

        let mut nan = net;
        nan.layers[0][0].weights[0] = f64::NAN;
        assert_eq!(nan.check_topology(), Err(TopologyError::NonFinite));
    }

    #[test]
    fn test_short_input_reads_as_zero() {
        let mut net = Network::new(1, 5, samples()).unwrap();

        let padded = net.predict(&[0.7, 0.0, 0.0]);
        let _ = net.predict(&[1.0, 1.0, 1.0]);
        assert_eq!(net.predict(&[0.7]), padded);
        assert_eq!(net.predict(&[0.7, 0.0, 0.0, 5.0]), padded);
    }
}
