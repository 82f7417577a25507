//! # backprop-neat-nn
//! A neural network-based implementation of the `backprop-neat`
//! crate's phenome and decoder interfaces.
//!
//! Provides a [`Genome`] type with an autoencoder-shaped initial
//! topology, a [`NetworkDefinition`] intermediate form, and two
//! network implementations compiled from a definition:
//! - [`AcyclicNetwork`]: a layered feed-forward network, activated
//!   in a single sweep and trainable in place by backpropagation.
//! - [`CyclicNetwork`]: an arbitrarily-structured network, activated
//!   for a fixed number of timesteps per call.
//!
//! Both are wrapped by [`Network`], selected by an [`ActivationScheme`].
//!
//! [`Genome`]: crate::genomics::Genome
//! [`NetworkDefinition`]: crate::networks::NetworkDefinition
//! [`AcyclicNetwork`]: crate::networks::AcyclicNetwork
//! [`CyclicNetwork`]: crate::networks::CyclicNetwork
//! [`Network`]: crate::networks::Network
//! [`ActivationScheme`]: crate::networks::ActivationScheme
//!
//! # Example usage: training an autoencoder in place
//! ```
//! use backprop_neat::{BlackBox, GenomeDecoder};
//! use backprop_neat_nn::{
//!     genomics::{GeneticConfig, Genome},
//!     networks::{calculate_output_error, ActivationScheme, NeatDecoder, Network},
//! };
//! use rand::{rngs::StdRng, SeedableRng};
//! use std::num::NonZeroUsize;
//!
//! let config = GeneticConfig {
//!     weight_bound: 0.5,
//!     ..GeneticConfig::autoencoder(NonZeroUsize::new(4).unwrap(), 2)
//! };
//! let genome = Genome::with_rng(&config, &mut StdRng::seed_from_u64(1));
//!
//! let decoder = NeatDecoder::new(ActivationScheme::Acyclic);
//! let mut network = decoder.decode(&genome).unwrap();
//!
//! let sample = [0.8, 0.2, 0.2, 0.8];
//! fn reconstruct(network: &mut Network, sample: &[f64]) -> f64 {
//!     network.reset_state();
//!     network.set_inputs(sample);
//!     network.activate();
//!     calculate_output_error(sample, network.outputs())
//! }
//!
//! let before = reconstruct(&mut network, &sample);
//! for _ in 0..200 {
//!     reconstruct(&mut network, &sample);
//!     network.calculate_error(0.1).unwrap();
//! }
//! let after = reconstruct(&mut network, &sample);
//!
//! // Reconstruction error shrinks as the weights are refined.
//! assert!(after < before);
//! assert!(network.is_state_valid());
//! ```

pub mod genomics;
pub mod networks;

/// Identifier type used to designate nodes and genes
/// for the purposes of genome comparison and decoding.
pub type Innovation = usize;
