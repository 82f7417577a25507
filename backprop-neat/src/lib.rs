//! Interfaces shared by the decoding, training and scoring stages
//! of a NEAT experiment whose phenomes are refined by backpropagation.
//!
//! A genome is turned into a phenome by a [`GenomeDecoder`]. Phenomes
//! are [`BlackBox`]es: fixed-size input and output signal arrays,
//! a forward activation, and (where the network supports it) an
//! in-place gradient step. A [`PhenomeEvaluator`] folds everything
//! it does to a phenome into a [`FitnessInfo`] for the outer
//! evolutionary loop, which lives outside this crate.
//!
//! The neural-network implementation of these interfaces is provided
//! by the `backprop-neat-nn` crate, and the HyperNEAT decoder by the
//! `hyperneat` crate.
//!
//! # Example usage: scoring a phenome
//! ```
//! use backprop_neat::{BlackBox, EvaluationProgress, FitnessInfo, PhenomeEvaluator};
//! use std::convert::Infallible;
//! use std::sync::atomic::{AtomicU64, Ordering};
//!
//! // A "network" that copies its inputs to its outputs.
//! struct Echo {
//!     inputs: [f64; 2],
//!     outputs: [f64; 2],
//! }
//!
//! impl BlackBox for Echo {
//!     type TrainingError = Infallible;
//!
//!     fn input_count(&self) -> usize { 2 }
//!     fn output_count(&self) -> usize { 2 }
//!     fn inputs(&self) -> &[f64] { &self.inputs }
//!     fn inputs_mut(&mut self) -> &mut [f64] { &mut self.inputs }
//!     fn outputs(&self) -> &[f64] { &self.outputs }
//!     fn is_state_valid(&self) -> bool { true }
//!     fn activate(&mut self) { self.outputs = self.inputs; }
//!     fn reset_state(&mut self) { self.outputs = [0.0; 2]; }
//!     fn calculate_error_against(&mut self, _: &[f64], _: f64) -> Result<f64, Infallible> {
//!         Ok(0.0)
//!     }
//! }
//!
//! struct Reconstruction(AtomicU64);
//!
//! impl<P: BlackBox> PhenomeEvaluator<P> for Reconstruction {
//!     fn evaluate(&self, phenome: &mut P) -> FitnessInfo {
//!         self.0.fetch_add(1, Ordering::Relaxed);
//!         phenome.reset_state();
//!         phenome.set_inputs(&[0.25, 0.75]);
//!         phenome.activate();
//!         let error: f64 = phenome
//!             .inputs()
//!             .iter()
//!             .zip(phenome.outputs())
//!             .map(|(i, o)| (i - o).abs())
//!             .sum();
//!         FitnessInfo::new(2.0 - error, error)
//!     }
//! }
//!
//! impl EvaluationProgress for Reconstruction {
//!     fn evaluation_count(&self) -> u64 { self.0.load(Ordering::Relaxed) }
//!     fn stop_condition_satisfied(&self) -> bool { false }
//!     fn reset(&self) {}
//! }
//!
//! let evaluator = Reconstruction(AtomicU64::new(0));
//! let mut phenome = Echo { inputs: [0.0; 2], outputs: [0.0; 2] };
//!
//! assert_eq!(evaluator.evaluate(&mut phenome), FitnessInfo::new(2.0, 0.0));
//! assert_eq!(evaluator.evaluation_count(), 1);
//! ```

mod black_box;
mod evaluation;
pub mod logging;

pub use black_box::*;
pub use evaluation::*;
