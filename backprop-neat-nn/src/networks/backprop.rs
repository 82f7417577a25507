//! Momentum-free, fixed-learning-rate gradient descent
//! on compiled acyclic networks.

use super::FastConnection;
use crate::genomics::ActivationType;

/// Node-wise state of a compiled network, borrowed
/// for the duration of one training step.
pub(crate) struct NodeState<'a> {
    pub first_computed_index: usize,
    pub activation_functions: &'a [ActivationType],
    pub input_sums: &'a [f64],
    pub activation_levels: &'a [f64],
    pub output_slots: &'a [Option<usize>],
}

/// Computes the error signal of every non-input node, in
/// descending index order (and so descending layer order).
///
/// An output node's signal is `(target - y)·f'`; a hidden
/// node's is `Σ(w·δ_target)·f'` over its outgoing connections.
/// An output node with outgoing connections receives both terms.
/// `connections` must be sorted by source index.
pub(crate) fn calculate_error_signals(
    nodes: &NodeState<'_>,
    connections: &[FastConnection],
    targets: &[f64],
    error_signals: &mut [f64],
) {
    let mut connection_index = connections.len();
    for node in (nodes.first_computed_index..error_signals.len()).rev() {
        let mut signal = 0.0;
        while connection_index > 0 && connections[connection_index - 1].source == node {
            connection_index -= 1;
            let connection = &connections[connection_index];
            signal += connection.weight * error_signals[connection.target];
        }
        if let Some(slot) = nodes.output_slots[node] {
            signal += targets[slot] - nodes.activation_levels[node];
        }
        error_signals[node] = signal
            * nodes.activation_functions[node]
                .derivative(nodes.input_sums[node], nodes.activation_levels[node]);
    }
    error_signals[..nodes.first_computed_index].fill(0.0);
}

/// Moves every weight along its gradient:
/// `w += learning_rate·δ_target·y_source`.
pub(crate) fn update_weights(
    connections: &mut [FastConnection],
    error_signals: &[f64],
    activation_levels: &[f64],
    learning_rate: f64,
) {
    for connection in connections.iter_mut() {
        connection.weight +=
            learning_rate * error_signals[connection.target] * activation_levels[connection.source];
    }
}

/// Mean of the squared error signals.
pub(crate) fn mean_squared_error(error_signals: &[f64]) -> f64 {
    if error_signals.is_empty() {
        return 0.0;
    }
    error_signals.iter().map(|e| e * e).sum::<f64>() / error_signals.len() as f64
}

/// Sum of absolute differences between corresponding
/// inputs and outputs: the reconstruction error of an
/// autoencoder. Used only for scoring, never for training.
///
/// # Examples
/// ```
/// use backprop_neat_nn::networks::calculate_output_error;
///
/// assert_eq!(calculate_output_error(&[1.0, 0.0, 0.5], &[0.75, 0.25, 0.5]), 0.5);
/// ```
pub fn calculate_output_error(inputs: &[f64], outputs: &[f64]) -> f64 {
    inputs
        .iter()
        .zip(outputs)
        .map(|(input, output)| (input - output).abs())
        .sum()
}
