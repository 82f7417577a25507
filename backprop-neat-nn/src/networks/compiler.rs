use super::{DecodeError, FastConnection, NetworkDefinition};
use crate::genomics::{ActivationType, NodeType};
use crate::Innovation;

/// The boundary of one topological layer in a compiled
/// network: nodes `[previous.end_node_index, end_node_index)`
/// belong to the layer, and connections
/// `[previous.end_connection_index, end_connection_index)`
/// are those whose source node belongs to it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LayerInfo {
    pub end_node_index: usize,
    pub end_connection_index: usize,
}

/// Flat arrays shared by both network implementations.
///
/// The bias node is always at index 0, followed by the
/// inputs. Connections are sorted by source index, then
/// target index.
#[derive(Clone, Debug)]
pub(crate) struct CompiledTopology {
    pub input_count: usize,
    pub node_ids: Box<[Innovation]>,
    pub activation_functions: Box<[ActivationType]>,
    pub connections: Box<[FastConnection]>,
    pub layers: Box<[LayerInfo]>,
    pub output_indices: Box<[usize]>,
}

impl CompiledTopology {
    /// Index of the first node that is neither the bias nor an input.
    pub fn first_computed_index(&self) -> usize {
        1 + self.input_count
    }

    /// Maps each node index to its position among the
    /// outputs, if it is an output node.
    pub fn output_slots(&self) -> Box<[Option<usize>]> {
        let mut slots = vec![None; self.node_ids.len()];
        for (slot, &index) in self.output_indices.iter().enumerate() {
            slots[index] = Some(slot);
        }
        slots.into()
    }
}

/// Lays a definition out for single-sweep activation.
///
/// Nodes are assigned to layers by their longest path from
/// a node without incoming connections, and ordered by
/// layer (then by definition order), so every connection
/// goes from a lower layer to a strictly higher one.
///
/// # Errors
/// Returns [`DecodeError::Cyclic`] if the definition's
/// connections contain a cycle.
pub(crate) fn compile_acyclic(definition: &NetworkDefinition) -> Result<CompiledTopology, DecodeError> {
    let depths = definition.node_depths()?;

    // Stable: bias and inputs precede other depth-0 nodes.
    let mut order: Vec<usize> = (0..definition.nodes().len()).collect();
    order.sort_by_key(|&i| depths[i]);

    let mut topology = lay_out(definition, &order);

    let layer_count = depths.iter().max().map_or(0, |d| d + 1);
    let mut layers = Vec::with_capacity(layer_count);
    let (mut node_index, mut connection_index) = (0, 0);
    for depth in 0..layer_count {
        while node_index < order.len() && depths[order[node_index]] == depth {
            node_index += 1;
        }
        while connection_index < topology.connections.len()
            && topology.connections[connection_index].source < node_index
        {
            connection_index += 1;
        }
        layers.push(LayerInfo {
            end_node_index: node_index,
            end_connection_index: connection_index,
        });
    }
    topology.layers = layers.into();

    log::trace!(
        "compiled acyclic network: {} nodes, {} connections, {} layers",
        topology.node_ids.len(),
        topology.connections.len(),
        topology.layers.len()
    );
    Ok(topology)
}

/// Lays a definition out for fixed-timestep activation.
/// Nodes keep their definition order and form a single layer.
pub(crate) fn compile_cyclic(definition: &NetworkDefinition) -> CompiledTopology {
    let order: Vec<usize> = (0..definition.nodes().len()).collect();
    let mut topology = lay_out(definition, &order);
    topology.layers = vec![LayerInfo {
        end_node_index: topology.node_ids.len(),
        end_connection_index: topology.connections.len(),
    }]
    .into();
    topology
}

/// Builds the flat node and connection arrays, with node
/// `order[i]` of the definition placed at index `i`.
fn lay_out(definition: &NetworkDefinition, order: &[usize]) -> CompiledTopology {
    let nodes = definition.nodes();
    let mut position = vec![0; nodes.len()];
    for (compiled, &original) in order.iter().enumerate() {
        position[original] = compiled;
    }

    let index_of = definition.index_from_id();
    let mut connections: Vec<FastConnection> = definition
        .connections()
        .iter()
        .map(|c| {
            FastConnection::new(
                position[index_of[&c.source]],
                position[index_of[&c.target]],
                c.weight,
            )
        })
        .collect();
    connections.sort_by_key(|c| (c.source, c.target));

    let output_indices = nodes
        .iter()
        .enumerate()
        .filter(|(_, n)| n.node_type == NodeType::Output)
        .map(|(i, _)| position[i])
        .collect();

    CompiledTopology {
        input_count: definition.input_count(),
        node_ids: order.iter().map(|&i| nodes[i].id).collect(),
        activation_functions: order.iter().map(|&i| nodes[i].activation_type).collect(),
        connections: connections.into(),
        layers: Box::default(),
        output_indices,
    }
}
