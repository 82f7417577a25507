//! # autoencoder
//! Scoring of evolved networks as image autoencoders.
//!
//! Samples are loaded from a raw image file (or generated as
//! binary patterns), optionally downsampled, and split into
//! training and validation sets. An [`AutoencoderEvaluator`]
//! trains each phenome in place by backpropagation on the
//! training samples and scores it by its reconstruction error
//! on the validation samples. [`evaluate_population`] does so
//! for a whole batch of genomes in parallel.
//!
//! # Example usage: scoring HyperNEAT autoencoders
//! ```
//! use autoencoder::{evaluate_population, AutoencoderConfig, AutoencoderEvaluator};
//! use backprop_neat_nn::genomics::Genome;
//! use hyperneat::{HyperNeatConfig, HyperNeatDecoder, SubstrateConfig, VisualField};
//! use rand::{rngs::StdRng, SeedableRng};
//! use std::num::NonZeroUsize;
//!
//! let config = AutoencoderConfig::from_ron(
//!     r#"(
//!         training_images_path: None,
//!         image_resolution: 9,
//!         num_image_samples: 64,
//!         learning_rate: 0.5,
//!         num_backprop_iterations: 3,
//!         training_sample_proportion: 0.75,
//!         reduce_amount_per_side: 1,
//!         pixel_intensity_range: 255.0,
//!         policy: FixedIterations,
//!         stop_fitness: Some(100.0),
//!     )"#,
//! )
//! .unwrap();
//! let evaluator = AutoencoderEvaluator::new(&config).unwrap();
//!
//! let field = VisualField::new(NonZeroUsize::new(3).unwrap());
//! let decoder = HyperNeatDecoder::new(
//!     field.substrate(SubstrateConfig::default()).unwrap(),
//!     HyperNeatConfig::default(),
//! );
//!
//! let mut rng = StdRng::seed_from_u64(0);
//! let population: Vec<Genome> = (0..10)
//!     .map(|_| Genome::with_rng(&decoder.cppn_genetic_config(), &mut rng))
//!     .collect();
//!
//! for info in evaluate_population(&population, &decoder, &evaluator) {
//!     assert!((0.0..=100.0).contains(&info.fitness));
//! }
//! ```
mod batch;
mod config;
mod errors;
mod evaluator;
pub mod samples;

pub use batch::*;
pub use config::*;
pub use errors::*;
pub use evaluator::*;
