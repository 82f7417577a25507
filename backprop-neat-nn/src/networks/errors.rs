use crate::Innovation;

use thiserror::Error;

/// An error type indicating that a network definition
/// is malformed, or cannot be compiled with the
/// requested activation scheme.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// The definition does not have exactly one bias node.
    #[error("network definition has {0} bias nodes, expected 1")]
    BiasCount(usize),
    /// The definition has no output nodes.
    #[error("network definition has no output nodes")]
    NoOutputs,
    /// Two nodes share an ID.
    #[error("duplicate node with id {0} in network definition")]
    DuplicateNodeID(Innovation),
    /// A connection references a node that does not exist.
    #[error("connection between nonexistant endpoint(s) {0} -> {1}")]
    NonexistantEndpoints(Innovation, Innovation),
    /// A connection ends at a bias or input node.
    #[error("connection into bias or input node {0}")]
    SourceOnlyEndpoint(Innovation),
    /// An acyclic network was requested for a definition
    /// whose connections contain a cycle.
    #[error("acyclic activation requested for a cyclic network definition")]
    Cyclic,
}

/// An error type indicating that a training step
/// could not be carried out.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TrainingError {
    /// The number of target values does not match
    /// the number of outputs.
    #[error("expected {expected} target values, found {found}")]
    TargetLength { expected: usize, found: usize },
    /// Backpropagation is only defined for acyclic networks.
    #[error("backpropagation is not supported by cyclic networks")]
    CyclicNetwork,
}
