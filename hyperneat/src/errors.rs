use backprop_neat_nn::networks::DecodeError;
use backprop_neat_nn::Innovation;

use thiserror::Error;

/// An error type indicating that a substrate is malformed,
/// or that a CPPN could not be decoded over it.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SubstrateError {
    /// Fewer than two node sets (inputs and outputs) were given.
    #[error("substrate needs at least 2 node sets, found {0}")]
    TooFewNodeSets(usize),
    /// A mapping references a node set that does not exist.
    #[error("node set mapping {0} -> {1} references a missing node set")]
    MappingOutOfRange(usize, usize),
    /// A mapping targets the input node set.
    #[error("node set mapping {0} -> {1} targets the input node set")]
    MappingTargetsInputs(usize, usize),
    /// No substrate node has a position to query the CPPN with.
    #[error("substrate node positions have no components")]
    ZeroDimensional,
    /// A node's position has a different number of
    /// components than the rest of the substrate.
    #[error("substrate node {id} has {found} position components, expected {expected}")]
    InconsistentDimensionality {
        id: Innovation,
        expected: usize,
        found: usize,
    },
    /// Two substrate nodes share an ID.
    #[error("duplicate substrate node with id {0}")]
    DuplicateNodeID(Innovation),
    /// A substrate node uses the ID reserved for the bias node.
    #[error("substrate node id 0 is reserved for the bias node")]
    ReservedNodeID,
    /// The weight threshold is outside of [0, 1), or the
    /// maximum weight is not finite.
    #[error("invalid weight mapping: threshold {threshold}, maximum weight {max_weight}")]
    InvalidWeightMapping { threshold: f64, max_weight: f64 },
    /// The CPPN's shape does not match the substrate's queries.
    #[error(
        "CPPN has {found_inputs} inputs and {found_outputs} outputs, \
         substrate requires {expected_inputs} inputs and at least {required_outputs} outputs"
    )]
    CppnShape {
        expected_inputs: usize,
        found_inputs: usize,
        required_outputs: usize,
        found_outputs: usize,
    },
    /// The CPPN genome or the resulting substrate
    /// network could not be decoded.
    #[error(transparent)]
    Network(#[from] DecodeError),
}
