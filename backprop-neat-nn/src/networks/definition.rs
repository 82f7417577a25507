use super::DecodeError;
use crate::genomics::{ActivationType, Genome, NodeType};
use crate::Innovation;

use ahash::RandomState;
use serde::{Deserialize, Serialize};

use std::collections::{HashMap, VecDeque};
use std::convert::TryFrom;

/// A node of a decoded network.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeDefinition {
    pub id: Innovation,
    pub node_type: NodeType,
    pub activation_type: ActivationType,
}

impl NodeDefinition {
    pub fn new(id: Innovation, node_type: NodeType, activation_type: ActivationType) -> NodeDefinition {
        NodeDefinition {
            id,
            node_type,
            activation_type,
        }
    }
}

/// A weighted connection between two nodes of a decoded
/// network, referenced by ID.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ConnectionDefinition {
    pub source: Innovation,
    pub target: Innovation,
    pub weight: f64,
}

impl ConnectionDefinition {
    pub fn new(source: Innovation, target: Innovation, weight: f64) -> ConnectionDefinition {
        ConnectionDefinition {
            source,
            target,
            weight,
        }
    }
}

/// A validated, uncompiled network: the common output
/// of direct and HyperNEAT decoding, and the input of
/// network compilation.
///
/// Nodes are kept in a canonical order: the bias node,
/// then inputs, outputs and hidden nodes, each group in
/// the order it was given.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NetworkDefinition {
    nodes: Vec<NodeDefinition>,
    connections: Vec<ConnectionDefinition>,
    input_count: usize,
    output_count: usize,
}

impl NetworkDefinition {
    /// Validates and returns a new network definition.
    ///
    /// # Errors
    /// Returns an error if there is not exactly one bias node,
    /// if there are no output nodes, if node IDs are repeated,
    /// or if a connection references a missing node or ends
    /// at the bias or an input.
    ///
    /// # Examples
    /// ```
    /// use backprop_neat_nn::genomics::{ActivationType, NodeType};
    /// use backprop_neat_nn::networks::{ConnectionDefinition, NetworkDefinition, NodeDefinition};
    ///
    /// let nodes = vec![
    ///     NodeDefinition::new(2, NodeType::Output, ActivationType::Sigmoid),
    ///     NodeDefinition::new(1, NodeType::Input, ActivationType::Identity),
    ///     NodeDefinition::new(0, NodeType::Bias, ActivationType::Identity),
    /// ];
    /// let connections = vec![ConnectionDefinition::new(1, 2, 0.5)];
    ///
    /// let definition = NetworkDefinition::new(nodes, connections).unwrap();
    ///
    /// // Nodes are reordered: bias, inputs, outputs, hidden.
    /// let ids: Vec<_> = definition.nodes().iter().map(|n| n.id).collect();
    /// assert_eq!(ids, [0, 1, 2]);
    /// assert_eq!(definition.input_count(), 1);
    /// assert_eq!(definition.output_count(), 1);
    /// ```
    pub fn new(
        nodes: Vec<NodeDefinition>,
        connections: Vec<ConnectionDefinition>,
    ) -> Result<NetworkDefinition, DecodeError> {
        let count_of = |node_type| nodes.iter().filter(|n| n.node_type == node_type).count();
        let bias_count = count_of(NodeType::Bias);
        if bias_count != 1 {
            return Err(DecodeError::BiasCount(bias_count));
        }
        let input_count = count_of(NodeType::Input);
        let output_count = count_of(NodeType::Output);
        if output_count == 0 {
            return Err(DecodeError::NoOutputs);
        }

        let mut types: HashMap<Innovation, NodeType, RandomState> = HashMap::default();
        for node in &nodes {
            if types.insert(node.id, node.node_type).is_some() {
                return Err(DecodeError::DuplicateNodeID(node.id));
            }
        }
        for connection in &connections {
            match (types.get(&connection.source), types.get(&connection.target)) {
                (Some(_), Some(target_type)) if target_type.is_source_only() => {
                    return Err(DecodeError::SourceOnlyEndpoint(connection.target))
                }
                (Some(_), Some(_)) => {}
                _ => {
                    return Err(DecodeError::NonexistantEndpoints(
                        connection.source,
                        connection.target,
                    ))
                }
            }
        }

        let mut ordered = Vec::with_capacity(nodes.len());
        for node_type in [NodeType::Bias, NodeType::Input, NodeType::Output, NodeType::Hidden] {
            ordered.extend(nodes.iter().filter(|n| n.node_type == node_type).copied());
        }

        Ok(NetworkDefinition {
            nodes: ordered,
            connections,
            input_count,
            output_count,
        })
    }

    /// The definition's nodes, in canonical order.
    pub fn nodes(&self) -> &[NodeDefinition] {
        &self.nodes
    }

    pub fn connections(&self) -> &[ConnectionDefinition] {
        &self.connections
    }

    /// Number of input nodes (excluding the bias).
    pub fn input_count(&self) -> usize {
        self.input_count
    }

    pub fn output_count(&self) -> usize {
        self.output_count
    }

    /// Returns each node's depth: the length of the longest
    /// connection path leading to it from a node without
    /// incoming connections. Indices follow [`nodes`].
    ///
    /// # Errors
    /// Returns [`DecodeError::Cyclic`] if the connections contain
    /// a cycle (including a node connected to itself).
    ///
    /// [`nodes`]: NetworkDefinition::nodes
    pub fn node_depths(&self) -> Result<Vec<usize>, DecodeError> {
        let index_of = self.index_from_id();
        let node_count = self.nodes.len();

        let mut successors = vec![vec![]; node_count];
        let mut in_degree = vec![0usize; node_count];
        for connection in &self.connections {
            let (source, target) = (index_of[&connection.source], index_of[&connection.target]);
            successors[source].push(target);
            in_degree[target] += 1;
        }

        // Kahn's algorithm, relaxing each edge to the longest path.
        let mut depths = vec![0usize; node_count];
        let mut queue: VecDeque<usize> = (0..node_count).filter(|&i| in_degree[i] == 0).collect();
        let mut visited = 0;
        while let Some(node) = queue.pop_front() {
            visited += 1;
            for &successor in &successors[node] {
                depths[successor] = depths[successor].max(depths[node] + 1);
                in_degree[successor] -= 1;
                if in_degree[successor] == 0 {
                    queue.push_back(successor);
                }
            }
        }

        if visited == node_count {
            Ok(depths)
        } else {
            Err(DecodeError::Cyclic)
        }
    }

    /// Whether the definition can be compiled into an acyclic network.
    ///
    /// # Examples
    /// ```
    /// use backprop_neat_nn::genomics::{ActivationType, NodeType};
    /// use backprop_neat_nn::networks::{ConnectionDefinition, NetworkDefinition, NodeDefinition};
    ///
    /// let nodes = vec![
    ///     NodeDefinition::new(0, NodeType::Bias, ActivationType::Identity),
    ///     NodeDefinition::new(1, NodeType::Output, ActivationType::Sigmoid),
    /// ];
    ///
    /// let looped = NetworkDefinition::new(nodes.clone(), vec![ConnectionDefinition::new(1, 1, 0.5)]).unwrap();
    /// assert!(!looped.is_acyclic());
    ///
    /// let straight = NetworkDefinition::new(nodes, vec![ConnectionDefinition::new(0, 1, 0.5)]).unwrap();
    /// assert!(straight.is_acyclic());
    /// ```
    pub fn is_acyclic(&self) -> bool {
        self.node_depths().is_ok()
    }

    /// Maps node IDs to their position in [`nodes`].
    ///
    /// [`nodes`]: NetworkDefinition::nodes
    pub(crate) fn index_from_id(&self) -> HashMap<Innovation, usize, RandomState> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(i, node)| (node.id, i))
            .collect()
    }
}

impl TryFrom<&Genome> for NetworkDefinition {
    type Error = DecodeError;

    /// Decodes a genome directly: nodes become network nodes
    /// and unsuppressed genes become connections.
    fn try_from(genome: &Genome) -> Result<NetworkDefinition, DecodeError> {
        let mut nodes: Vec<NodeDefinition> = genome
            .nodes()
            .map(|n| NodeDefinition::new(n.innovation(), n.node_type(), n.activation_type()))
            .collect();
        // Sorting by id makes the resulting network
        // deterministic, independantly of node iteration order.
        nodes.sort_unstable_by_key(|n| n.id);

        let mut genes: Vec<_> = genome.genes().filter(|g| !g.suppressed()).collect();
        genes.sort_unstable_by_key(|g| g.innovation());
        let connections = genes
            .into_iter()
            .map(|g| ConnectionDefinition::new(g.input(), g.output(), g.weight()))
            .collect();

        NetworkDefinition::new(nodes, connections)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::genomics::GeneticConfig;
    use std::num::NonZeroUsize;

    fn node(id: Innovation, node_type: NodeType) -> NodeDefinition {
        NodeDefinition::new(id, node_type, ActivationType::Sigmoid)
    }

    fn basic_nodes() -> Vec<NodeDefinition> {
        vec![
            node(0, NodeType::Bias),
            node(1, NodeType::Input),
            node(2, NodeType::Output),
            node(3, NodeType::Hidden),
        ]
    }

    #[test]
    fn rejects_missing_bias() {
        let nodes = vec![node(1, NodeType::Input), node(2, NodeType::Output)];
        assert_eq!(
            NetworkDefinition::new(nodes, vec![]).unwrap_err(),
            DecodeError::BiasCount(0)
        );
    }

    #[test]
    fn rejects_no_outputs() {
        let nodes = vec![node(0, NodeType::Bias), node(1, NodeType::Input)];
        assert_eq!(
            NetworkDefinition::new(nodes, vec![]).unwrap_err(),
            DecodeError::NoOutputs
        );
    }

    #[test]
    fn rejects_duplicate_ids() {
        let mut nodes = basic_nodes();
        nodes.push(node(3, NodeType::Hidden));
        assert_eq!(
            NetworkDefinition::new(nodes, vec![]).unwrap_err(),
            DecodeError::DuplicateNodeID(3)
        );
    }

    #[test]
    fn rejects_bad_connections() {
        assert_eq!(
            NetworkDefinition::new(basic_nodes(), vec![ConnectionDefinition::new(1, 9, 1.0)])
                .unwrap_err(),
            DecodeError::NonexistantEndpoints(1, 9)
        );
        assert_eq!(
            NetworkDefinition::new(basic_nodes(), vec![ConnectionDefinition::new(3, 1, 1.0)])
                .unwrap_err(),
            DecodeError::SourceOnlyEndpoint(1)
        );
    }

    #[test]
    fn depths_longest_path() {
        // 1 -> 3 -> 2 and 1 -> 2: the output sits at depth 2.
        let connections = vec![
            ConnectionDefinition::new(1, 2, 1.0),
            ConnectionDefinition::new(1, 3, 1.0),
            ConnectionDefinition::new(3, 2, 1.0),
        ];
        let definition = NetworkDefinition::new(basic_nodes(), connections).unwrap();
        assert_eq!(definition.node_depths().unwrap(), [0, 0, 2, 1]);
    }

    #[test]
    fn depths_cycle() {
        let connections = vec![
            ConnectionDefinition::new(3, 2, 1.0),
            ConnectionDefinition::new(2, 3, 1.0),
        ];
        let definition = NetworkDefinition::new(basic_nodes(), connections).unwrap();
        assert_eq!(definition.node_depths().unwrap_err(), DecodeError::Cyclic);
    }

    #[test]
    fn from_genome_skips_suppressed() {
        let config = GeneticConfig {
            input_count: NonZeroUsize::new(2).unwrap(),
            ..GeneticConfig::zero()
        };
        let mut genome = Genome::new(&config);
        genome.add_gene(10, 1, 3, 1.0).unwrap();
        genome.add_gene(11, 2, 3, 2.0).unwrap().set_suppressed(true);
        genome.add_gene(9, 0, 3, -1.0).unwrap();

        let definition = NetworkDefinition::try_from(&genome).unwrap();
        assert_eq!(definition.input_count(), 2);
        assert_eq!(definition.output_count(), 1);
        assert_eq!(
            definition.connections(),
            [
                ConnectionDefinition::new(0, 3, -1.0),
                ConnectionDefinition::new(1, 3, 1.0)
            ]
        );
    }
}
