//! Construction and structural errors.
//!
//! Checkpoint and configuration failures have their own types in
//! [`crate::checkpoint`] and [`crate::config`].

use thiserror::Error;

/// Invariant violations detected while building a network or a hierarchy
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuildError {
    #[error("training sample set is empty")]
    EmptySamples,

    #[error("sample {index} has {found} inputs, expected {expected}")]
    InputWidthMismatch {
        index: usize,
        expected: usize,
        found: usize,
    },

    #[error("sample {index} has {found} targets, expected {expected}")]
    TargetWidthMismatch {
        index: usize,
        expected: usize,
        found: usize,
    },

    #[error("{layer} layer must have at least one neuron")]
    ZeroWidth { layer: &'static str },

    #[error("hierarchy needs at least one layer of at least one node (got depth {depth}, width {width})")]
    EmptyHierarchy { depth: usize, width: usize },
}

/// Structural defects in a network or hierarchy, typically one read back from a snapshot
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TopologyError {
    #[error("network has {0} layers, at least 2 required")]
    TooFewLayers(usize),

    #[error("layer {layer} has no neurons")]
    EmptyLayer { layer: usize },

    #[error("layer {layer} neuron {neuron} has the wrong role")]
    WrongRole { layer: usize, neuron: usize },

    #[error("layer {layer} neuron {neuron} has {found} weights, expected {expected}")]
    WeightCount {
        layer: usize,
        neuron: usize,
        expected: usize,
        found: usize,
    },

    #[error("network holds a non-finite weight")]
    NonFinite,

    #[error("hierarchy has {0} node layers, at least 2 required")]
    ShallowHierarchy(usize),

    #[error("node layer {layer} has no nodes")]
    EmptyNodeLayer { layer: usize },

    #[error("aggregation layer has {0} nodes, expected 1")]
    Aggregation(usize),

    #[error("node {node} of layer {layer} has {found} inputs, expected {expected}")]
    FanIn {
        layer: usize,
        node: usize,
        expected: usize,
        found: usize,
    },

    #[error("node {node} of layer {layer} has {found} outputs, expected 1")]
    NodeOutputs {
        layer: usize,
        node: usize,
        found: usize,
    },

    #[error("node {node} of layer {layer}: {source}")]
    Node {
        layer: usize,
        node: usize,
        source: Box<TopologyError>,
    },
}
