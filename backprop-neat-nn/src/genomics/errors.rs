use crate::Innovation;

use thiserror::Error;

/// An error type indicating that a gene or node
/// being added to a genome is invalid, or that
/// an item being looked up is absent.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GenomeError {
    /// The gene's ID is a duplicate.
    #[error("duplicate gene insertion with id {0}")]
    DuplicateGeneID(Innovation),
    /// The gene's endpoints do not exist.
    #[error("gene insertion between nonexistant endpoint(s) {0} -> {1}")]
    NonexistantEndpoints(Innovation, Innovation),
    /// The gene has the same endpoints as another with a different ID.
    #[error("gene insertion with endpoints {1} -> {2} and id {0} shadows gene with same endpoints")]
    DuplicateGeneWithEndpoints(Innovation, Innovation, Innovation),
    /// The gene's output is a bias or input node.
    #[error("gene insertion with bias or input node {0} as output endpoint")]
    SourceOnlyEndpoint(Innovation),
    /// The node's ID is a duplicate.
    #[error("duplicate node insertion with id {0}")]
    DuplicateNodeID(Innovation),
    /// No gene with the given ID exists.
    #[error("no gene with id {0}")]
    AbsentGene(Innovation),
}
