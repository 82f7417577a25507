use crate::Innovation;

use serde::{Deserialize, Serialize};

use std::fmt;

/// An ActivationType represents the type
/// of activation function the node's network
/// equivalent will use.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActivationType {
    // 1 / (1 + exp(-4.9x))
    Sigmoid,
    // 1 / (1 + exp(-x))
    PlainSigmoid,
    // 2 / (1 + exp(-4.9x)) - 1
    BipolarSigmoid,
    // x
    Identity,
    // 0   if x < 0
    // x   if x ≥ 0
    ReLU,
    // exp(-x²)
    Gaussian,
    // sin(πx)
    Sinusoidal,
}

/// A NodeType indicates the function of
/// the node's network equivalent.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeType {
    /// The bias node, whose activation is fixed at 1.
    Bias,
    /// Input nodes.
    Input,
    /// Output nodes.
    Output,
    /// Hidden nodes.
    Hidden,
}

impl NodeType {
    /// Whether nodes of this type have externally set
    /// activations (and so may not be connection targets).
    ///
    /// # Examples
    /// ```
    /// use backprop_neat_nn::genomics::NodeType;
    ///
    /// assert!(NodeType::Bias.is_source_only());
    /// assert!(NodeType::Input.is_source_only());
    /// assert!(!NodeType::Output.is_source_only());
    /// ```
    pub fn is_source_only(self) -> bool {
        matches!(self, NodeType::Bias | NodeType::Input)
    }
}

/// Nodes are the structural elements of genomes
/// between which genes are created.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct Node {
    id: Innovation,
    node_type: NodeType,
    activation_type: ActivationType,
}

impl Node {
    /// Generate a new node with the passed parameters.
    ///
    /// # Examples
    /// ```
    /// use backprop_neat_nn::genomics::{Node, NodeType, ActivationType};
    ///
    /// let node = Node::new(5, NodeType::Hidden, ActivationType::Sigmoid);
    /// ```
    pub fn new(id: Innovation, node_type: NodeType, activation_type: ActivationType) -> Node {
        Node {
            id,
            node_type,
            activation_type,
        }
    }

    /// Returns the node's innovation number.
    ///
    /// # Examples
    /// ```
    /// use backprop_neat_nn::genomics::{Node, NodeType, ActivationType};
    ///
    /// let node = Node::new(5, NodeType::Hidden, ActivationType::Sigmoid);
    ///
    /// assert_eq!(node.innovation(), 5);
    /// ```
    pub fn innovation(&self) -> Innovation {
        self.id
    }

    /// Returns the node's node type.
    pub fn node_type(&self) -> NodeType {
        self.node_type
    }

    /// Returns the node's activation type.
    pub fn activation_type(&self) -> ActivationType {
        self.activation_type
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:?}[{:?}, {:?}]",
            self.id, self.node_type, self.activation_type,
        )
    }
}
