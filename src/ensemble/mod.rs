//! Hierarchical ensembles of small networks evolved by population search.
//!
//! A [`Relict`] chains layers of [`RelictNode`]s: every node of a layer sees
//! the cached outputs of the previous layer, and a single aggregation node
//! produces the final prediction. Hierarchies are never trained by gradient
//! or hill-climbing; they are mutated and ranked by a caller-supplied
//! [`Scorer`] inside a [`Population`].

mod hierarchy;
mod node;
mod population;

pub use hierarchy::{Relict, RelictResult, RelictSite};
pub use node::RelictNode;
pub use population::{Population, PopulationTrainer, Scorer};
