//! # hyperneat
//! Indirect encoding of `backprop-neat-nn` networks: a CPPN
//! genome is queried over a geometric [`Substrate`] to produce
//! the weights (and so the topology) of the decoded network.
//!
//! - [`Substrate`] fixes node positions, grouped in node sets,
//!   and the [`NodeSetMapping`]s between them along which
//!   connections may exist.
//! - [`VisualField`] builds the square image substrate used by
//!   the autoencoder experiments.
//! - [`HyperNeatDecoder`] implements [`GenomeDecoder`] for CPPN
//!   genomes over a substrate.
//!
//! [`GenomeDecoder`]: backprop_neat::GenomeDecoder
//!
//! # Example usage: decoding a visual field autoencoder
//! ```
//! use backprop_neat::{BlackBox, GenomeDecoder};
//! use backprop_neat_nn::genomics::Genome;
//! use backprop_neat_nn::networks::calculate_output_error;
//! use hyperneat::{HyperNeatConfig, HyperNeatDecoder, SubstrateConfig, VisualField};
//! use rand::{rngs::StdRng, SeedableRng};
//! use std::num::NonZeroUsize;
//!
//! let field = VisualField::new(NonZeroUsize::new(4).unwrap());
//! let decoder = HyperNeatDecoder::new(
//!     field.substrate(SubstrateConfig::default()).unwrap(),
//!     HyperNeatConfig::default(),
//! );
//!
//! let cppn = Genome::with_rng(&decoder.cppn_genetic_config(), &mut StdRng::seed_from_u64(42));
//! let mut autoencoder = decoder.decode(&cppn).unwrap();
//!
//! let image: Vec<f64> = (0..16).map(|p| (p % 2) as f64).collect();
//! autoencoder.reset_state();
//! autoencoder.set_inputs(&image);
//! autoencoder.activate();
//! let error = calculate_output_error(&image, autoencoder.outputs());
//! assert!(error <= 16.0);
//! ```
mod decoder;
mod errors;
mod substrate;
mod visual_field;

pub use decoder::*;
pub use errors::*;
pub use substrate::*;
pub use visual_field::*;
