use crate::SubstrateError;

use backprop_neat::BlackBox;
use backprop_neat_nn::genomics::{ActivationType, NodeType, BIAS_ID};
use backprop_neat_nn::networks::{ConnectionDefinition, NetworkDefinition, NodeDefinition};
use backprop_neat_nn::Innovation;

use serde::{Deserialize, Serialize};

use std::collections::HashSet;

/// A node placed at a fixed position in the substrate.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SubstrateNode {
    pub id: Innovation,
    pub position: Vec<f64>,
}

impl SubstrateNode {
    pub fn new(id: Innovation, position: Vec<f64>) -> SubstrateNode {
        SubstrateNode { id, position }
    }
}

/// One geometric layer of substrate nodes.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SubstrateNodeSet {
    pub nodes: Vec<SubstrateNode>,
}

impl SubstrateNodeSet {
    pub fn new(nodes: Vec<SubstrateNode>) -> SubstrateNodeSet {
        SubstrateNodeSet { nodes }
    }
}

/// Declares that connections are queried from every node
/// of `source_set` to every node of `target_set`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct NodeSetMapping {
    pub source_set: usize,
    pub target_set: usize,
    /// If set, only node pairs at most this far
    /// apart (euclidean distance) are queried.
    pub max_distance: Option<f64>,
    /// CPPN output read as the connection weight.
    pub cppn_output: usize,
}

impl NodeSetMapping {
    /// An unrestricted mapping reading the first CPPN output.
    pub fn new(source_set: usize, target_set: usize) -> NodeSetMapping {
        NodeSetMapping {
            source_set,
            target_set,
            max_distance: None,
            cppn_output: 0,
        }
    }
}

/// Configuration of the networks produced from a substrate.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SubstrateConfig {
    /// Activation function of every non-bias substrate node.
    pub activation_type: ActivationType,
    /// CPPN outputs of magnitude at or below this value
    /// produce no connection. Must be in [0, 1).
    pub weight_threshold: f64,
    /// Magnitude of the weight produced by a CPPN output of ±1.
    pub max_weight: f64,
    /// CPPN output queried for bias connections, if any.
    pub bias_output: Option<usize>,
}

impl Default for SubstrateConfig {
    fn default() -> SubstrateConfig {
        SubstrateConfig {
            activation_type: ActivationType::Sigmoid,
            weight_threshold: 0.2,
            max_weight: 5.0,
            bias_output: None,
        }
    }
}

impl SubstrateConfig {
    /// Maps a raw CPPN output onto a connection weight.
    ///
    /// The output is clamped to [-1, 1]; magnitudes at or
    /// below the threshold (and non-finite outputs) produce
    /// no connection, and the rest are rescaled so that the
    /// threshold maps to 0 and ±1 to ±`max_weight`.
    ///
    /// # Examples
    /// ```
    /// use hyperneat::SubstrateConfig;
    ///
    /// let config = SubstrateConfig::default();
    ///
    /// assert_eq!(config.connection_weight(0.1), None);
    /// assert_eq!(config.connection_weight(3.0), Some(5.0));
    /// assert_eq!(config.connection_weight(-1.0), Some(-5.0));
    /// assert!((config.connection_weight(0.6).unwrap() - 2.5).abs() < 1e-12);
    /// assert_eq!(config.connection_weight(f64::NAN), None);
    /// ```
    pub fn connection_weight(&self, cppn_output: f64) -> Option<f64> {
        if !cppn_output.is_finite() {
            return None;
        }
        let output = cppn_output.clamp(-1.0, 1.0);
        let magnitude = output.abs();
        if magnitude <= self.weight_threshold {
            return None;
        }
        let scaled = (magnitude - self.weight_threshold) / (1.0 - self.weight_threshold);
        Some(output.signum() * scaled * self.max_weight)
    }
}

/// A fixed geometric layout of nodes and the allowed
/// connectivity between its node sets.
///
/// Node set 0 holds the input nodes and node set 1 the
/// output nodes. Any further sets are hidden layers.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Substrate {
    node_sets: Vec<SubstrateNodeSet>,
    mappings: Vec<NodeSetMapping>,
    config: SubstrateConfig,
    dimensionality: usize,
}

impl Substrate {
    /// Validates and returns a new substrate.
    ///
    /// # Errors
    /// Returns an error if fewer than two node sets are given,
    /// if a mapping references a missing set or targets the
    /// inputs, if node positions are empty or of differing
    /// lengths, if node IDs are repeated or use the bias ID,
    /// or if the weight mapping is invalid.
    ///
    /// # Examples
    /// ```
    /// use hyperneat::{
    ///     NodeSetMapping, Substrate, SubstrateConfig, SubstrateError, SubstrateNode,
    ///     SubstrateNodeSet,
    /// };
    ///
    /// let inputs = SubstrateNodeSet::new(vec![SubstrateNode::new(1, vec![0.0, -1.0])]);
    /// let outputs = SubstrateNodeSet::new(vec![SubstrateNode::new(2, vec![0.0, 1.0])]);
    ///
    /// let substrate = Substrate::new(
    ///     vec![inputs.clone(), outputs],
    ///     vec![NodeSetMapping::new(0, 1)],
    ///     SubstrateConfig::default(),
    /// )
    /// .unwrap();
    /// assert_eq!(substrate.dimensionality(), 2);
    /// assert_eq!(substrate.cppn_input_count(false), 4);
    ///
    /// assert_eq!(
    ///     Substrate::new(vec![inputs], vec![], SubstrateConfig::default()).unwrap_err(),
    ///     SubstrateError::TooFewNodeSets(1)
    /// );
    /// ```
    pub fn new(
        node_sets: Vec<SubstrateNodeSet>,
        mappings: Vec<NodeSetMapping>,
        config: SubstrateConfig,
    ) -> Result<Substrate, SubstrateError> {
        if node_sets.len() < 2 {
            return Err(SubstrateError::TooFewNodeSets(node_sets.len()));
        }
        for mapping in &mappings {
            if mapping.source_set >= node_sets.len() || mapping.target_set >= node_sets.len() {
                return Err(SubstrateError::MappingOutOfRange(
                    mapping.source_set,
                    mapping.target_set,
                ));
            }
            if mapping.target_set == 0 {
                return Err(SubstrateError::MappingTargetsInputs(
                    mapping.source_set,
                    mapping.target_set,
                ));
            }
        }
        let threshold = config.weight_threshold;
        if !(0.0..1.0).contains(&threshold) || !config.max_weight.is_finite() {
            return Err(SubstrateError::InvalidWeightMapping {
                threshold,
                max_weight: config.max_weight,
            });
        }

        let mut nodes = node_sets.iter().flat_map(|set| set.nodes.iter()).peekable();
        let dimensionality = nodes.peek().map_or(0, |node| node.position.len());
        if dimensionality == 0 {
            return Err(SubstrateError::ZeroDimensional);
        }
        let mut ids = HashSet::new();
        for node in nodes {
            if node.id == BIAS_ID {
                return Err(SubstrateError::ReservedNodeID);
            }
            if !ids.insert(node.id) {
                return Err(SubstrateError::DuplicateNodeID(node.id));
            }
            if node.position.len() != dimensionality {
                return Err(SubstrateError::InconsistentDimensionality {
                    id: node.id,
                    expected: dimensionality,
                    found: node.position.len(),
                });
            }
        }

        Ok(Substrate {
            node_sets,
            mappings,
            config,
            dimensionality,
        })
    }

    pub fn node_sets(&self) -> &[SubstrateNodeSet] {
        &self.node_sets
    }

    pub fn mappings(&self) -> &[NodeSetMapping] {
        &self.mappings
    }

    pub fn config(&self) -> &SubstrateConfig {
        &self.config
    }

    /// Number of components of every node position.
    pub fn dimensionality(&self) -> usize {
        self.dimensionality
    }

    /// Number of inputs a CPPN must have to be queried over
    /// this substrate: both endpoint positions, followed by
    /// their distance if `length_input` is set.
    pub fn cppn_input_count(&self, length_input: bool) -> usize {
        2 * self.dimensionality + usize::from(length_input)
    }

    /// Minimum number of outputs a CPPN must have to be
    /// queried over this substrate.
    pub fn cppn_output_count(&self) -> usize {
        self.mappings
            .iter()
            .map(|m| m.cppn_output)
            .chain(self.config.bias_output)
            .max()
            .map_or(1, |o| o + 1)
    }

    /// The substrate's nodes, as network nodes: the bias,
    /// then set 0 as inputs, set 1 as outputs and every
    /// other set as hidden nodes.
    fn node_definitions(&self) -> Vec<NodeDefinition> {
        let node_type_of = |set: usize| match set {
            0 => NodeType::Input,
            1 => NodeType::Output,
            _ => NodeType::Hidden,
        };
        let mut nodes = vec![NodeDefinition::new(
            BIAS_ID,
            NodeType::Bias,
            ActivationType::Identity,
        )];
        for (set_index, set) in self.node_sets.iter().enumerate() {
            nodes.extend(set.nodes.iter().map(|node| {
                NodeDefinition::new(node.id, node_type_of(set_index), self.config.activation_type)
            }));
        }
        nodes
    }

    /// Queries `cppn` for every connection allowed by the
    /// substrate's mappings and builds the resulting network.
    ///
    /// Connections whose CPPN output falls within the weight
    /// threshold are pruned. Targets left without incoming
    /// connections are kept, and simply receive no input.
    /// If a bias output is configured, every hidden and
    /// output node is also queried for a bias connection,
    /// with an all-zero source position.
    ///
    /// # Errors
    /// Returns [`SubstrateError::CppnShape`] if the CPPN's
    /// input or output count does not fit the substrate.
    pub fn create_network_definition<C>(
        &self,
        cppn: &mut C,
        length_input: bool,
    ) -> Result<NetworkDefinition, SubstrateError>
    where
        C: BlackBox + ?Sized,
    {
        let expected_inputs = self.cppn_input_count(length_input);
        let required_outputs = self.cppn_output_count();
        if cppn.input_count() != expected_inputs || cppn.output_count() < required_outputs {
            return Err(SubstrateError::CppnShape {
                expected_inputs,
                found_inputs: cppn.input_count(),
                required_outputs,
                found_outputs: cppn.output_count(),
            });
        }

        let mut connections = vec![];
        let mut queried = 0;
        for mapping in &self.mappings {
            let sources = &self.node_sets[mapping.source_set].nodes;
            let targets = &self.node_sets[mapping.target_set].nodes;
            for source in sources {
                for target in targets {
                    let distance = euclidean_distance(&source.position, &target.position);
                    if mapping.max_distance.map_or(false, |max| distance > max) {
                        continue;
                    }
                    queried += 1;
                    let output = query(cppn, &source.position, &target.position, length_input)
                        [mapping.cppn_output];
                    if let Some(weight) = self.config.connection_weight(output) {
                        connections.push(ConnectionDefinition::new(source.id, target.id, weight));
                    }
                }
            }
        }

        if let Some(bias_output) = self.config.bias_output {
            let origin = vec![0.0; self.dimensionality];
            for target in self.node_sets[1..].iter().flat_map(|set| set.nodes.iter()) {
                queried += 1;
                let output = query(cppn, &origin, &target.position, length_input)[bias_output];
                if let Some(weight) = self.config.connection_weight(output) {
                    connections.push(ConnectionDefinition::new(BIAS_ID, target.id, weight));
                }
            }
        }

        log::debug!(
            "substrate query kept {} of {} connections",
            connections.len(),
            queried
        );
        Ok(NetworkDefinition::new(self.node_definitions(), connections)?)
    }
}

/// Activates `cppn` on a fresh state for the connection
/// `source -> target`, returning all of its outputs.
fn query<'a, C>(cppn: &'a mut C, source: &[f64], target: &[f64], length_input: bool) -> &'a [f64]
where
    C: BlackBox + ?Sized,
{
    cppn.reset_state();
    let dimensionality = source.len();
    let inputs = cppn.inputs_mut();
    inputs[..dimensionality].copy_from_slice(source);
    inputs[dimensionality..2 * dimensionality].copy_from_slice(target);
    if length_input {
        inputs[2 * dimensionality] = euclidean_distance(source, target);
    }
    cppn.activate();
    cppn.outputs()
}

fn euclidean_distance(a: &[f64], b: &[f64]) -> f64 {
    a.iter()
        .zip(b)
        .map(|(a, b)| (a - b) * (a - b))
        .sum::<f64>()
        .sqrt()
}
