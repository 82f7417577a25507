use crate::{NodeSetMapping, Substrate, SubstrateConfig, SubstrateError, SubstrateNode, SubstrateNodeSet};

use serde::{Deserialize, Serialize};

use std::num::NonZeroUsize;

/// Layer component of input node positions.
const INPUT_LAYER: f64 = -1.0;
/// Layer component of hidden node positions.
const HIDDEN_LAYER: f64 = 0.0;
/// Layer component of output node positions.
const OUTPUT_LAYER: f64 = 1.0;

/// A square visual field of `resolution`×`resolution` pixels
/// spanning [-1, 1] on both axes, laid out as a substrate
/// with one input and one output node per pixel.
///
/// Node positions are `(x, y, layer)`, with the layer
/// component -1 for inputs, 0 for hidden nodes and 1 for
/// outputs. Pixels are numbered row by row.
///
/// When `hidden_layer` is set, a hidden node is placed on
/// every pixel whose coordinates are both even or both odd,
/// and connections run inputs → hidden → outputs. Otherwise
/// inputs connect straight to outputs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisualField {
    pub resolution: NonZeroUsize,
    pub hidden_layer: bool,
}

impl VisualField {
    /// A visual field with a hidden layer.
    pub fn new(resolution: NonZeroUsize) -> VisualField {
        VisualField {
            resolution,
            hidden_layer: true,
        }
    }

    /// Number of pixels in the field, and so of
    /// input nodes and of output nodes.
    pub fn pixel_count(&self) -> usize {
        self.resolution.get() * self.resolution.get()
    }

    /// The field's node sets, ordered inputs, outputs,
    /// then the hidden set if there is one.
    ///
    /// Input IDs run from 1, output IDs from `pixel_count + 1`
    /// and hidden IDs from `2·pixel_count + 2`. Hidden IDs
    /// advance with every pixel, kept or not.
    pub fn node_sets(&self) -> Vec<SubstrateNodeSet> {
        let resolution = self.resolution.get();
        let pixel_count = self.pixel_count();
        let pixel_size = 2.0 / resolution as f64;
        let origin = -1.0 + pixel_size / 2.0;

        let mut inputs = Vec::with_capacity(pixel_count);
        let mut outputs = Vec::with_capacity(pixel_count);
        let mut hidden = vec![];
        for y in 0..resolution {
            let y_real = origin + y as f64 * pixel_size;
            for x in 0..resolution {
                let x_real = origin + x as f64 * pixel_size;
                let pixel = y * resolution + x;
                inputs.push(SubstrateNode::new(1 + pixel, vec![x_real, y_real, INPUT_LAYER]));
                outputs.push(SubstrateNode::new(
                    pixel_count + 1 + pixel,
                    vec![x_real, y_real, OUTPUT_LAYER],
                ));
                if x % 2 == y % 2 {
                    hidden.push(SubstrateNode::new(
                        2 * pixel_count + 2 + pixel,
                        vec![x_real, y_real, HIDDEN_LAYER],
                    ));
                }
            }
        }

        let mut node_sets = vec![SubstrateNodeSet::new(inputs), SubstrateNodeSet::new(outputs)];
        if self.hidden_layer {
            node_sets.push(SubstrateNodeSet::new(hidden));
        }
        node_sets
    }

    /// Mappings between the field's node sets.
    pub fn mappings(&self) -> Vec<NodeSetMapping> {
        if self.hidden_layer {
            vec![NodeSetMapping::new(0, 2), NodeSetMapping::new(2, 1)]
        } else {
            vec![NodeSetMapping::new(0, 1)]
        }
    }

    /// Builds the field's substrate.
    ///
    /// # Examples
    /// ```
    /// use hyperneat::{SubstrateConfig, VisualField};
    /// use std::num::NonZeroUsize;
    ///
    /// let field = VisualField::new(NonZeroUsize::new(4).unwrap());
    /// let substrate = field.substrate(SubstrateConfig::default()).unwrap();
    ///
    /// assert_eq!(substrate.node_sets().len(), 3);
    /// assert_eq!(substrate.node_sets()[0].nodes.len(), 16);
    /// // Positions are (x, y, layer): the CPPN reads both endpoints.
    /// assert_eq!(substrate.cppn_input_count(false), 6);
    /// ```
    pub fn substrate(&self, config: SubstrateConfig) -> Result<Substrate, SubstrateError> {
        Substrate::new(self.node_sets(), self.mappings(), config)
    }
}
