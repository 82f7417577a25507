use super::compiler;
use super::{FastConnection, NetworkDefinition, TrainingError};
use crate::genomics::ActivationType;

use backprop_neat::BlackBox;

use std::fmt;
use std::num::NonZeroUsize;

/// An arbitrarily-structured neural network, recurrent
/// connections included.
///
/// Each call to [`activate`] runs a fixed number of
/// timesteps, every one of them firing all nodes at once
/// and then recomputing every activation level. Signals
/// therefore travel one connection per timestep.
///
/// [`activate`]: BlackBox::activate
#[derive(Clone, Debug)]
pub struct CyclicNetwork {
    /// Index of the first node that is neither the bias nor an input.
    first_computed_index: usize,
    timesteps: NonZeroUsize,
    input_sums: Box<[f64]>,
    activation_levels: Box<[f64]>,
    activation_functions: Box<[ActivationType]>,
    connections: Box<[FastConnection]>,
    output_indices: Box<[usize]>,
    outputs: Box<[f64]>,
    state_valid: bool,
}

impl CyclicNetwork {
    /// Compiles a network from the passed definition,
    /// running `timesteps` timesteps per activation.
    ///
    /// # Examples
    /// ```
    /// use backprop_neat::BlackBox;
    /// use backprop_neat_nn::genomics::{ActivationType, NodeType};
    /// use backprop_neat_nn::networks::{
    ///     ConnectionDefinition, CyclicNetwork, NetworkDefinition, NodeDefinition,
    /// };
    /// use std::num::NonZeroUsize;
    ///
    /// let definition = NetworkDefinition::new(
    ///     vec![
    ///         NodeDefinition::new(0, NodeType::Bias, ActivationType::Identity),
    ///         NodeDefinition::new(1, NodeType::Input, ActivationType::Identity),
    ///         NodeDefinition::new(2, NodeType::Output, ActivationType::ReLU),
    ///         NodeDefinition::new(3, NodeType::Hidden, ActivationType::Identity),
    ///     ],
    ///     vec![
    ///         ConnectionDefinition::new(1, 3, 2.0),
    ///         ConnectionDefinition::new(3, 2, 1.5),
    ///     ],
    /// )
    /// .unwrap();
    ///
    /// let mut network = CyclicNetwork::new(&definition, NonZeroUsize::new(2).unwrap());
    /// network.set_inputs(&[1.0]);
    /// network.activate();
    ///
    /// // Two timesteps: input -> hidden, then hidden -> output.
    /// assert_eq!(network.outputs(), [3.0]);
    /// ```
    pub fn new(definition: &NetworkDefinition, timesteps: NonZeroUsize) -> CyclicNetwork {
        let topology = compiler::compile_cyclic(definition);
        let node_count = topology.node_ids.len();

        let mut activation_levels = vec![0.0; node_count];
        activation_levels[0] = 1.0;

        CyclicNetwork {
            first_computed_index: topology.first_computed_index(),
            timesteps,
            input_sums: vec![0.0; node_count].into(),
            activation_levels: activation_levels.into(),
            activation_functions: topology.activation_functions,
            connections: topology.connections,
            outputs: vec![0.0; topology.output_indices.len()].into(),
            output_indices: topology.output_indices,
            state_valid: true,
        }
    }

    /// Number of timesteps run per activation.
    pub fn timesteps(&self) -> NonZeroUsize {
        self.timesteps
    }

    /// Propagates each node's signal through all its
    /// outgoing connections.
    fn fire_nodes(&mut self) {
        for connection in self.connections.iter() {
            self.input_sums[connection.target] +=
                self.activation_levels[connection.source] * connection.weight;
        }
    }

    /// Computes each non-input node's activation level,
    /// based on input sum, and clears the sums.
    fn compute_activations(&mut self) {
        let first_computed_index = self.first_computed_index;
        for ((input_sum, activation_level), activation_function) in self.input_sums
            [first_computed_index..]
            .iter_mut()
            .zip(&mut self.activation_levels[first_computed_index..])
            .zip(&self.activation_functions[first_computed_index..])
        {
            *activation_level = activation_function.apply(*input_sum);
            *input_sum = 0.0;
        }
    }
}

impl BlackBox for CyclicNetwork {
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

    fn activate(&mut self) {
        for _ in 0..self.timesteps.get() {
            self.fire_nodes();
            self.compute_activations();
        }
        for (output, &index) in self.outputs.iter_mut().zip(self.output_indices.iter()) {
            *output = self.activation_levels[index];
        }
        if self.activation_levels[self.first_computed_index..]
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
        self.outputs.fill(0.0);
        self.state_valid = true;
    }

    /// Cyclic networks cannot be trained.
    fn calculate_error_against(&mut self, _: &[f64], _: f64) -> Result<f64, TrainingError> {
        Err(TrainingError::CyclicNetwork)
    }
}

impl fmt::Display for CyclicNetwork {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        (self as &dyn fmt::Debug).fmt(f)
    }
}
