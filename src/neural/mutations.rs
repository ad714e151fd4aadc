//! Single-weight mutation, the only search operator.

use super::network::{random_weight, Network};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Location of one weight inside a network
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WeightSite {
    pub layer: usize,
    pub neuron: usize,
    pub weight: usize,
}

impl Network {
    /// Redraw one randomly chosen weight
    pub fn mutate(&mut self) -> WeightSite {
        self.mutate_with(&mut rand::thread_rng())
    }

    /// Redraw one randomly chosen weight using `rng`.
    ///
    /// The layer is drawn uniformly from every layer except the output layer,
    /// then a neuron within it, then one of that neuron's weights.
    pub fn mutate_with<R: Rng + ?Sized>(&mut self, rng: &mut R) -> WeightSite {
        let layer = rng.gen_range(0..self.layers.len() - 1);
        let neuron = rng.gen_range(0..self.layers[layer].len());
        let weights = &mut self.layers[layer][neuron].weights;
        let weight = rng.gen_range(0..weights.len());

        weights[weight] = random_weight(rng);

        WeightSite {
            layer,
            neuron,
            weight,
        }
    }

    /// Read the weight at `site`
    pub fn weight_at(&self, site: WeightSite) -> Option<f64> {
        self.layers
            .get(site.layer)?
            .get(site.neuron)?
            .weights
            .get(site.weight)
            .copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sample::SampleSet;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn network(rng: &mut ChaCha8Rng) -> Network {
        let samples = SampleSet::new().add(vec![0.0; 4], vec![0.0, 1.0]).build();
        Network::new_with_rng(2, 6, samples, rng).unwrap()
    }

    #[test]
    fn test_mutation_touches_exactly_one_weight() {
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let mut net = network(&mut rng);

        for _ in 0..200 {
            let old = net.clone();
            let before: Vec<u64> = net.weights().map(f64::to_bits).collect();
            let site = net.mutate_with(&mut rng);
            let after: Vec<u64> = net.weights().map(f64::to_bits).collect();

            let changed = before.iter().zip(&after).filter(|(a, b)| a != b).count();
            assert_eq!(changed, 1);
            assert_ne!(
                net.weight_at(site).map(f64::to_bits),
                old.weight_at(site).map(f64::to_bits)
            );

            let value = net.weight_at(site).unwrap();
            assert!((-1.0..=1.0).contains(&value));
            assert!(site.layer < net.layers.len() - 1);
        }
    }

    #[test]
    fn test_mutation_reaches_every_non_output_layer() {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let mut net = network(&mut rng);

        let mut seen = [false; 3];
        for _ in 0..500 {
            seen[net.mutate_with(&mut rng).layer] = true;
        }
        assert!(seen.iter().all(|&s| s));
    }

    #[test]
    fn test_mutation_preserves_topology() {
        let mut net = network(&mut ChaCha8Rng::seed_from_u64(9));
        let count = net.weight_count();

        for _ in 0..100 {
            net.mutate();
        }

        assert_eq!(net.weights().count(), count);
        assert!(net.is_valid());
    }
}
