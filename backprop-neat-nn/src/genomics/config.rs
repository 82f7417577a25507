use crate::genomics::ActivationType;

use serde::{Deserialize, Serialize};

use std::num::NonZeroUsize;

/// Configuration data for initial genome generation.
///
/// # Note
/// `initial_interconnection_proportion` should be in
/// the range [0.0, 1.0]. Values outside it are clamped.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GeneticConfig {
    /// Number of inputs in a genome.
    pub input_count: NonZeroUsize,
    /// Number of outputs in a genome.
    pub output_count: NonZeroUsize,
    /// Number of hidden nodes in a newly generated genome.
    /// When zero, inputs are wired straight to outputs.
    pub hidden_count: usize,
    /// Possible activation types for hidden nodes, chosen
    /// uniformly at random. If an empty vector is given,
    /// nodes will default to [`Sigmoid`].
    ///
    /// [`Sigmoid`]: crate::genomics::ActivationType
    pub activation_types: Vec<ActivationType>,
    /// Activation types of output nodes in a genome.
    /// If fewer than [`output_count`] are specified,
    /// the default is [`Sigmoid`].
    ///
    /// [`output_count`]: GeneticConfig::output_count
    /// [`Sigmoid`]: crate::genomics::ActivationType
    pub output_activation_types: Vec<ActivationType>,
    /// Proportion of the possible initial genes in each
    /// layer-to-layer group that are created.
    pub initial_interconnection_proportion: f64,
    /// Maximum magnitude of an initial gene weight.
    pub weight_bound: f64,
}

impl GeneticConfig {
    /// Returns a "zero-valued" default configuration.
    /// All values are 0, empty, or in the case of
    /// `NonZeroUsize`s, 1.
    ///
    /// # Note
    /// This value is not suitable for use in most experiments.
    /// It is meant as a way to fill in unused values during
    /// configuration instantiation.
    ///
    /// # Examples
    /// ```
    /// use backprop_neat_nn::genomics::GeneticConfig;
    ///
    /// let cfg1 = GeneticConfig::zero();
    ///
    /// let cfg2 = GeneticConfig {
    ///     // Specify some values here...
    ///     hidden_count: 4,
    ///     weight_bound: 1.0,
    ///     // Default the rest...
    ///     ..GeneticConfig::zero()
    /// };
    /// ```
    pub const fn zero() -> GeneticConfig {
        GeneticConfig {
            input_count: NonZeroUsize::MIN,
            output_count: NonZeroUsize::MIN,
            hidden_count: 0,
            activation_types: vec![],
            output_activation_types: vec![],
            initial_interconnection_proportion: 0.0,
            weight_bound: 0.0,
        }
    }

    /// A configuration for autoencoder genomes of `width`
    /// inputs and outputs: fully connected through
    /// `hidden_count` sigmoid hidden nodes.
    ///
    /// # Examples
    /// ```
    /// use backprop_neat_nn::genomics::GeneticConfig;
    /// use std::num::NonZeroUsize;
    ///
    /// let config = GeneticConfig::autoencoder(NonZeroUsize::new(4).unwrap(), 2);
    /// assert_eq!(config.input_count, config.output_count);
    /// ```
    pub fn autoencoder(width: NonZeroUsize, hidden_count: usize) -> GeneticConfig {
        GeneticConfig {
            input_count: width,
            output_count: width,
            hidden_count,
            activation_types: vec![ActivationType::Sigmoid],
            output_activation_types: vec![ActivationType::Sigmoid; width.get()],
            initial_interconnection_proportion: 1.0,
            weight_bound: 5.0,
        }
    }

    /// A configuration for CPPN genomes. Hidden node activation
    /// functions are drawn from the usual CPPN library, and
    /// outputs are linear.
    pub fn cppn(input_count: NonZeroUsize, output_count: NonZeroUsize) -> GeneticConfig {
        GeneticConfig {
            input_count,
            output_count,
            hidden_count: 0,
            activation_types: vec![
                ActivationType::Identity,
                ActivationType::BipolarSigmoid,
                ActivationType::Gaussian,
                ActivationType::Sinusoidal,
            ],
            output_activation_types: vec![ActivationType::Identity; output_count.get()],
            initial_interconnection_proportion: 1.0,
            weight_bound: 5.0,
        }
    }
}
