use super::backprop::{self, NodeState};
use super::compiler::{self, LayerInfo};
use super::{DecodeError, FastConnection, NetworkDefinition, TrainingError};
use crate::genomics::{ActivationType, Genome};
use crate::Innovation;

use ahash::RandomState;
use backprop_neat::BlackBox;

use std::collections::HashMap;
use std::fmt;

/// A layered feed-forward network.
///
/// A single activation sweeps the layers in order, and
/// [`calculate_error_against`] performs one backpropagation
/// step, refining the connection weights in place.
///
/// [`calculate_error_against`]: BlackBox::calculate_error_against
#[derive(Clone, Debug)]
pub struct AcyclicNetwork {
    /// Index of the first node that is neither the bias nor an input.
    first_computed_index: usize,
    node_ids: Box<[Innovation]>,
    input_sums: Box<[f64]>,
    activation_levels: Box<[f64]>,
    activation_functions: Box<[ActivationType]>,
    connections: Box<[FastConnection]>,
    layers: Box<[LayerInfo]>,
    output_indices: Box<[usize]>,
    output_slots: Box<[Option<usize>]>,
    outputs: Box<[f64]>,
    error_signals: Box<[f64]>,
    state_valid: bool,
}

impl AcyclicNetwork {
    /// Compiles a network from the passed definition.
    ///
    /// # Errors
    /// Returns [`DecodeError::Cyclic`] if the definition
    /// contains a cycle.
    ///
    /// # Examples
    /// ```
    /// use backprop_neat::BlackBox;
    /// use backprop_neat_nn::genomics::{ActivationType, NodeType};
    /// use backprop_neat_nn::networks::{
    ///     AcyclicNetwork, ConnectionDefinition, NetworkDefinition, NodeDefinition,
    /// };
    ///
    /// let definition = NetworkDefinition::new(
    ///     vec![
    ///         NodeDefinition::new(0, NodeType::Bias, ActivationType::Identity),
    ///         NodeDefinition::new(1, NodeType::Input, ActivationType::Identity),
    ///         NodeDefinition::new(2, NodeType::Input, ActivationType::Identity),
    ///         NodeDefinition::new(3, NodeType::Output, ActivationType::ReLU),
    ///     ],
    ///     vec![
    ///         ConnectionDefinition::new(1, 3, 2.5),
    ///         ConnectionDefinition::new(2, 3, -2.5),
    ///     ],
    /// )
    /// .unwrap();
    ///
    /// let mut network = AcyclicNetwork::new(&definition).unwrap();
    /// network.set_inputs(&[1.0, 0.5]);
    /// network.activate();
    ///
    /// assert_eq!(network.outputs(), [1.0 * 2.5 + 0.5 * -2.5]);
    /// ```
    pub fn new(definition: &NetworkDefinition) -> Result<AcyclicNetwork, DecodeError> {
        let topology = compiler::compile_acyclic(definition)?;
        let node_count = topology.node_ids.len();
        let output_slots = topology.output_slots();

        let mut activation_levels = vec![0.0; node_count];
        activation_levels[0] = 1.0;

        Ok(AcyclicNetwork {
            first_computed_index: topology.first_computed_index(),
            node_ids: topology.node_ids,
            input_sums: vec![0.0; node_count].into(),
            activation_levels: activation_levels.into(),
            activation_functions: topology.activation_functions,
            connections: topology.connections,
            layers: topology.layers,
            outputs: vec![0.0; topology.output_indices.len()].into(),
            output_indices: topology.output_indices,
            output_slots,
            error_signals: vec![0.0; node_count].into(),
            state_valid: true,
        })
    }

    /// The network's layer boundaries.
    pub fn layers(&self) -> &[LayerInfo] {
        &self.layers
    }

    /// Returns an iterator over the network's connections as
    /// `(source id, target id, weight)` triples.
    pub fn connection_weights(&self) -> impl Iterator<Item = (Innovation, Innovation, f64)> + '_ {
        self.connections
            .iter()
            .map(|c| (self.node_ids[c.source], self.node_ids[c.target], c.weight))
    }

    /// Copies the network's current (possibly trained) weights
    /// back into the genes of the genome it was decoded from.
    /// Returns the number of genes updated.
    ///
    /// Connections with no unsuppressed gene between the same
    /// endpoints are skipped.
    ///
    /// # Examples
    /// ```
    /// use backprop_neat::{BlackBox, GenomeDecoder};
    /// use backprop_neat_nn::genomics::{GeneticConfig, Genome};
    /// use backprop_neat_nn::networks::{ActivationScheme, Network, NeatDecoder};
    ///
    /// let mut genome = Genome::new(&GeneticConfig::zero());
    /// genome.add_gene(3, 1, 2, 0.5).unwrap();
    ///
    /// let mut network = NeatDecoder::new(ActivationScheme::Acyclic).decode(&genome).unwrap();
    /// network.set_inputs(&[1.0]);
    /// network.activate();
    /// network.calculate_error_against(&[0.0], 1.0).unwrap();
    ///
    /// if let Network::Acyclic(network) = &network {
    ///     assert_eq!(network.write_weights_to(&mut genome), 1);
    /// }
    /// assert!(genome.gene(3).unwrap().weight() < 0.5);
    /// ```
    pub fn write_weights_to(&self, genome: &mut Genome) -> usize {
        let gene_ids: HashMap<(Innovation, Innovation), Innovation, RandomState> = genome
            .genes()
            .filter(|g| !g.suppressed())
            .map(|g| (g.endpoints(), g.innovation()))
            .collect();
        let mut updated = 0;
        for (source, target, weight) in self.connection_weights() {
            if let Some(gene) = gene_ids.get(&(source, target)).and_then(|&id| genome.gene_mut(id)) {
                gene.set_weight(weight);
                updated += 1;
            }
        }
        updated
    }

    /// Runs one backpropagation step towards `targets`.
    fn train(&mut self, targets: Targets<'_>, learning_rate: f64) -> Result<f64, TrainingError> {
        let first_computed_index = self.first_computed_index;
        let targets = match targets {
            Targets::Given(targets) => targets,
            Targets::Inputs => &self.activation_levels[1..first_computed_index],
        };
        if targets.len() != self.output_indices.len() {
            return Err(TrainingError::TargetLength {
                expected: self.output_indices.len(),
                found: targets.len(),
            });
        }

        let nodes = NodeState {
            first_computed_index,
            activation_functions: &self.activation_functions,
            input_sums: &self.input_sums,
            activation_levels: &self.activation_levels,
            output_slots: &self.output_slots,
        };
        backprop::calculate_error_signals(&nodes, &self.connections, targets, &mut self.error_signals);
        backprop::update_weights(
            &mut self.connections,
            &self.error_signals,
            &self.activation_levels,
            learning_rate,
        );

        let error = backprop::mean_squared_error(&self.error_signals[first_computed_index..]);
        if !error.is_finite() || self.connections.iter().any(|c| !c.weight.is_finite()) {
            log::warn!("backpropagation produced a non-finite value");
            self.state_valid = false;
        }
        Ok(error)
    }
}

/// Where the targets of a training step come from.
enum Targets<'a> {
    Given(&'a [f64]),
    Inputs,
}

impl BlackBox for AcyclicNetwork {
    type TrainingError = TrainingError;

    fn input_count(&self) -> usize {
        self.first_computed_index - 1
    }

    fn output_count(&self) -> usize {
        self.outputs.len()
    }

    fn inputs(&self) -> &[f64] {
        &self.activation_levels[1..self.first_computed_index]
    }

    fn inputs_mut(&mut self) -> &mut [f64] {
        let end = self.first_computed_index;
        &mut self.activation_levels[1..end]
    }

    fn outputs(&self) -> &[f64] {
        &self.outputs
    }

    fn is_state_valid(&self) -> bool {
        self.state_valid
    }

    /// Sweeps the layers in order: each layer's outgoing
    /// connections are fired into the later layers, then
    /// the next layer's activations are computed.
    fn activate(&mut self) {
        let first_computed_index = self.first_computed_index;
        self.input_sums[first_computed_index..].fill(0.0);

        // Nodes sharing the first layer with the inputs have
        // no incoming connections: their sums stay at zero.
        let mut node_index = first_computed_index;
        let mut connection_index = 0;
        for layer in 0..self.layers.len() {
            let end_node_index = self.layers[layer].end_node_index;
            for i in node_index..end_node_index {
                self.activation_levels[i] = self.activation_functions[i].apply(self.input_sums[i]);
            }
            node_index = end_node_index;

            let end_connection_index = self.layers[layer].end_connection_index;
            for c in &self.connections[connection_index..end_connection_index] {
                self.input_sums[c.target] += self.activation_levels[c.source] * c.weight;
            }
            connection_index = end_connection_index;
        }

        for (output, &index) in self.outputs.iter_mut().zip(self.output_indices.iter()) {
            *output = self.activation_levels[index];
        }
        if self.activation_levels[first_computed_index..]
            .iter()
            .any(|a| !a.is_finite())
        {
            log::warn!("activation produced a non-finite value");
            self.state_valid = false;
        }
    }

    fn reset_state(&mut self) {
        let first_computed_index = self.first_computed_index;
        self.input_sums.fill(0.0);
        self.activation_levels[first_computed_index..].fill(0.0);
        self.error_signals.fill(0.0);
        self.outputs.fill(0.0);
        self.state_valid = true;
    }

    fn calculate_error_against(
        &mut self,
        targets: &[f64],
        learning_rate: f64,
    ) -> Result<f64, TrainingError> {
        self.train(Targets::Given(targets), learning_rate)
    }

    fn calculate_error(&mut self, learning_rate: f64) -> Result<f64, TrainingError> {
        self.train(Targets::Inputs, learning_rate)
    }
}

impl fmt::Display for AcyclicNetwork {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        (self as &dyn fmt::Debug).fmt(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::genomics::{GeneticConfig, NodeType};
    use crate::networks::{ConnectionDefinition, NodeDefinition};
    use std::convert::TryFrom;
    use std::num::NonZeroUsize;

    fn sigmoid(x: f64) -> f64 {
        1.0 / (1.0 + (-4.9 * x).exp())
    }

    fn network_from(genome: &Genome) -> AcyclicNetwork {
        AcyclicNetwork::new(&NetworkDefinition::try_from(genome).unwrap()).unwrap()
    }

    #[test]
    fn activate_empty() {
        let genome = Genome::new(&GeneticConfig::zero());
        let mut network = network_from(&genome);
        assert!((0..100).all(|_| {
            network.activate();
            network.outputs()[0] == sigmoid(0.0)
        }));
    }

    #[test]
    fn zero_weights_zero_inputs() {
        let config = GeneticConfig {
            input_count: NonZeroUsize::new(3).unwrap(),
            output_count: NonZeroUsize::new(2).unwrap(),
            hidden_count: 2,
            output_activation_types: vec![ActivationType::Identity, ActivationType::ReLU],
            initial_interconnection_proportion: 1.0,
            ..GeneticConfig::zero()
        };
        let mut network = network_from(&Genome::new(&config));
        network.reset_state();
        network.activate();
        assert_eq!(network.outputs(), [0.0, 0.0]);
    }

    #[test]
    fn activate_single() {
        let mut genome = Genome::new(&GeneticConfig::zero());
        genome.add_gene(0, 1, 2, 1.0).unwrap();
        let mut network = network_from(&genome);
        for input in -20..=20 {
            let input = input as f64 / 10.0;
            network.reset_state();
            network.set_inputs(&[input]);
            network.activate();
            assert_eq!(network.outputs()[0], sigmoid(input))
        }
    }

    #[test]
    fn activate_bias() {
        let mut genome = Genome::new(&GeneticConfig::zero());
        genome.add_gene(0, 0, 2, -0.5).unwrap();
        let mut network = network_from(&genome);
        network.set_inputs(&[3.0]);
        network.activate();
        assert_eq!(network.outputs()[0], sigmoid(-0.5));
    }

    #[test]
    fn activate_double_in_one_sweep() {
        let mut genome = Genome::new(&GeneticConfig::zero());
        genome.add_node(3, ActivationType::Sigmoid).unwrap();
        genome.add_gene(0, 1, 3, 1.0).unwrap();
        genome.add_gene(1, 3, 2, 1.0).unwrap();
        let mut network = network_from(&genome);
        for input in -20..=20 {
            let input = input as f64 / 10.0;
            network.reset_state();
            network.set_inputs(&[input]);
            network.activate();
            assert_eq!(network.outputs()[0], sigmoid(sigmoid(input)))
        }
    }

    #[test]
    fn activate_is_idempotent() {
        let config = GeneticConfig {
            input_count: NonZeroUsize::new(3).unwrap(),
            output_count: NonZeroUsize::new(3).unwrap(),
            hidden_count: 2,
            initial_interconnection_proportion: 1.0,
            weight_bound: 3.0,
            ..GeneticConfig::zero()
        };
        let mut network = network_from(&Genome::new(&config));
        network.set_inputs(&[0.2, -0.7, 1.0]);
        network.activate();
        let first = network.outputs().to_vec();
        for _ in 0..10 {
            network.activate();
            assert_eq!(network.outputs(), &first[..]);
        }
    }

    #[test]
    fn activate_multiple_inputs() {
        let config = GeneticConfig {
            input_count: NonZeroUsize::new(3).unwrap(),
            ..GeneticConfig::zero()
        };
        let mut genome = Genome::new(&config);
        genome.add_gene(0, 1, 4, -1.0).unwrap();
        genome.add_gene(1, 2, 4, 1.0).unwrap();
        genome.add_gene(2, 3, 4, 0.5).unwrap();
        let mut network = network_from(&genome);
        for ((x, y), z) in (-20..=20).zip(-20..=20).zip(-20..=20) {
            let (x, y, z) = (x as f64 / 10.0, y as f64 / 10.0, z as f64 / 10.0);
            network.reset_state();
            network.set_inputs(&[x, y, z]);
            network.activate();
            assert_eq!(network.outputs()[0], sigmoid(-x + y + 0.5 * z), "{} {} {}", x, y, z);
        }
    }

    #[test]
    fn outputs_in_output_order() {
        // Output 3 is fed through a hidden node and
        // so sits after output 4 in the compiled layout.
        let definition = NetworkDefinition::new(
            vec![
                NodeDefinition::new(0, NodeType::Bias, ActivationType::Identity),
                NodeDefinition::new(1, NodeType::Input, ActivationType::Identity),
                NodeDefinition::new(3, NodeType::Output, ActivationType::Identity),
                NodeDefinition::new(4, NodeType::Output, ActivationType::Identity),
                NodeDefinition::new(5, NodeType::Hidden, ActivationType::Identity),
            ],
            vec![
                ConnectionDefinition::new(1, 5, 2.0),
                ConnectionDefinition::new(5, 3, 3.0),
                ConnectionDefinition::new(1, 4, -1.0),
            ],
        )
        .unwrap();
        let mut network = AcyclicNetwork::new(&definition).unwrap();
        network.set_inputs(&[1.0]);
        network.activate();
        assert_eq!(network.outputs(), [6.0, -1.0]);
    }

    #[test]
    fn backprop_reduces_error() {
        let config = GeneticConfig {
            input_count: NonZeroUsize::new(2).unwrap(),
            output_count: NonZeroUsize::new(2).unwrap(),
            hidden_count: 3,
            activation_types: vec![ActivationType::PlainSigmoid],
            output_activation_types: vec![ActivationType::PlainSigmoid; 2],
            initial_interconnection_proportion: 1.0,
            weight_bound: 0.5,
        };
        let mut network = network_from(&Genome::new(&config));
        let targets = [0.9, 0.1];
        let reconstruction_error = |network: &mut AcyclicNetwork| {
            network.reset_state();
            network.set_inputs(&[1.0, 0.0]);
            network.activate();
            backprop::calculate_output_error(&targets, network.outputs())
        };

        let before = reconstruction_error(&mut network);
        for _ in 0..500 {
            reconstruction_error(&mut network);
            network.calculate_error_against(&targets, 0.5).unwrap();
        }
        let after = reconstruction_error(&mut network);
        assert!(after < before * 0.5, "{} -> {}", before, after);
        assert!(network.is_state_valid());
    }

    #[test]
    fn autoencoder_targets_are_inputs() {
        let mut genome = Genome::new(&GeneticConfig::zero());
        genome.add_gene(0, 1, 2, 0.0).unwrap();
        let mut network = network_from(&genome);
        let mut twin = network.clone();

        for network in [&mut network, &mut twin] {
            network.set_inputs(&[0.8]);
            network.activate();
        }
        let error = network.calculate_error(1.0).unwrap();
        let twin_error = twin.calculate_error_against(&[0.8], 1.0).unwrap();
        assert_eq!(error, twin_error);
        assert_eq!(network.connections[0].weight, twin.connections[0].weight);
        // Output is sigmoid(0) = 0.5 < 0.8: the weight grows.
        assert!(network.connections[0].weight > 0.0);
    }

    #[test]
    fn error_is_mean_over_computed_nodes() {
        // bias, input, identity output: δ = target - y.
        let definition = NetworkDefinition::new(
            vec![
                NodeDefinition::new(0, NodeType::Bias, ActivationType::Identity),
                NodeDefinition::new(1, NodeType::Input, ActivationType::Identity),
                NodeDefinition::new(2, NodeType::Output, ActivationType::Identity),
                NodeDefinition::new(3, NodeType::Output, ActivationType::Identity),
            ],
            vec![ConnectionDefinition::new(1, 2, 1.0)],
        )
        .unwrap();
        let mut network = AcyclicNetwork::new(&definition).unwrap();
        network.set_inputs(&[1.0]);
        network.activate();
        // Signals: 2.0 - 1.0 = 1.0 and 3.0 - 0.0 = 3.0.
        let error = network.calculate_error_against(&[2.0, 3.0], 0.0).unwrap();
        assert_eq!(error, (1.0 + 9.0) / 2.0);
    }

    #[test]
    fn target_length_mismatch() {
        let mut network = network_from(&Genome::new(&GeneticConfig::zero()));
        assert_eq!(
            network.calculate_error_against(&[1.0, 2.0], 0.1).unwrap_err(),
            TrainingError::TargetLength {
                expected: 1,
                found: 2
            }
        );
    }

    #[test]
    fn non_finite_state_is_invalid() {
        let mut genome = Genome::new(&GeneticConfig::zero());
        genome.add_gene(0, 1, 2, 1.0).unwrap();
        let mut network = network_from(&genome);
        network.set_inputs(&[f64::NAN]);
        network.activate();
        assert!(!network.is_state_valid());
        network.reset_state();
        assert!(network.is_state_valid());
    }

    #[test]
    fn reset_keeps_weights() {
        let mut genome = Genome::new(&GeneticConfig::zero());
        genome.add_gene(0, 1, 2, 1.0).unwrap();
        let mut network = network_from(&genome);
        network.set_inputs(&[1.0]);
        network.activate();
        network.calculate_error(0.5).unwrap();
        let weight = network.connections[0].weight;
        network.reset_state();
        assert_eq!(network.outputs(), [0.0]);
        assert_eq!(network.connections[0].weight, weight);
        assert_eq!(network.inputs(), [1.0]);
    }
}
