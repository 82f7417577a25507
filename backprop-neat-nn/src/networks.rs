//! A network is compiled from a [`NetworkDefinition`], which
//! is itself either built by hand, decoded from a [`Genome`]
//! (suppressed genes are ignored), or produced by querying
//! a CPPN over a substrate.
//!
//! The [`AcyclicNetwork`] type is activated in a single
//! layered sweep and supports in-place training by
//! backpropagation.
//!
//! The [`CyclicNetwork`] type allows recurrent connections,
//! and runs a fixed number of timesteps per activation.
//! It is the usual choice for CPPNs.
mod activation;
mod acyclic;
mod backprop;
mod compiler;
mod connection;
mod cyclic;
mod definition;
mod errors;

pub use acyclic::AcyclicNetwork;
pub use backprop::calculate_output_error;
pub use compiler::LayerInfo;
pub use connection::FastConnection;
pub use cyclic::CyclicNetwork;
pub use definition::{ConnectionDefinition, NetworkDefinition, NodeDefinition};
pub use errors::{DecodeError, TrainingError};

use crate::genomics::Genome;

use backprop_neat::{BlackBox, GenomeDecoder};
use serde::{Deserialize, Serialize};

use std::convert::TryFrom;
use std::fmt;
use std::num::NonZeroUsize;

/// How a network definition is compiled and activated.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActivationScheme {
    /// Single-sweep layered activation. Fails to compile
    /// on definitions with cycles.
    Acyclic,
    /// Fixed number of timesteps per activation.
    CyclicFixedTimesteps(NonZeroUsize),
}

/// Timesteps per activation of CPPNs compiled with the default scheme.
pub const CPPN_TIMESTEPS: NonZeroUsize = match NonZeroUsize::new(4) {
    Some(n) => n,
    None => unreachable!(),
};

impl ActivationScheme {
    /// Scheme used for CPPNs unless otherwise configured:
    /// [`CPPN_TIMESTEPS`] fixed timesteps per activation.
    pub const fn cppn_default() -> ActivationScheme {
        ActivationScheme::CyclicFixedTimesteps(CPPN_TIMESTEPS)
    }
}

/// A network compiled under either activation scheme.
#[derive(Clone, Debug)]
pub enum Network {
    Acyclic(AcyclicNetwork),
    Cyclic(CyclicNetwork),
}

impl Network {
    /// Compiles `definition` according to `scheme`.
    ///
    /// # Errors
    /// Returns [`DecodeError::Cyclic`] if an acyclic network
    /// is requested for a definition containing a cycle.
    ///
    /// # Examples
    /// ```
    /// use backprop_neat_nn::genomics::{ActivationType, NodeType};
    /// use backprop_neat_nn::networks::{
    ///     ActivationScheme, ConnectionDefinition, DecodeError, Network, NetworkDefinition,
    ///     NodeDefinition,
    /// };
    ///
    /// let recurrent = NetworkDefinition::new(
    ///     vec![
    ///         NodeDefinition::new(0, NodeType::Bias, ActivationType::Identity),
    ///         NodeDefinition::new(1, NodeType::Input, ActivationType::Identity),
    ///         NodeDefinition::new(2, NodeType::Output, ActivationType::Sigmoid),
    ///     ],
    ///     vec![ConnectionDefinition::new(2, 2, 1.0)],
    /// )
    /// .unwrap();
    ///
    /// assert_eq!(
    ///     Network::compile(&recurrent, ActivationScheme::Acyclic).unwrap_err(),
    ///     DecodeError::Cyclic
    /// );
    /// assert!(Network::compile(&recurrent, ActivationScheme::cppn_default()).is_ok());
    /// ```
    pub fn compile(
        definition: &NetworkDefinition,
        scheme: ActivationScheme,
    ) -> Result<Network, DecodeError> {
        Ok(match scheme {
            ActivationScheme::Acyclic => Network::Acyclic(AcyclicNetwork::new(definition)?),
            ActivationScheme::CyclicFixedTimesteps(timesteps) => {
                Network::Cyclic(CyclicNetwork::new(definition, timesteps))
            }
        })
    }

    fn as_black_box(&self) -> &dyn BlackBox<TrainingError = TrainingError> {
        match self {
            Network::Acyclic(network) => network,
            Network::Cyclic(network) => network,
        }
    }

    fn as_black_box_mut(&mut self) -> &mut dyn BlackBox<TrainingError = TrainingError> {
        match self {
            Network::Acyclic(network) => network,
            Network::Cyclic(network) => network,
        }
    }
}

impl BlackBox for Network {
    type TrainingError = TrainingError;

    fn input_count(&self) -> usize {
        self.as_black_box().input_count()
    }

    fn output_count(&self) -> usize {
        self.as_black_box().output_count()
    }

    fn inputs(&self) -> &[f64] {
        self.as_black_box().inputs()
    }

    fn inputs_mut(&mut self) -> &mut [f64] {
        self.as_black_box_mut().inputs_mut()
    }

    fn outputs(&self) -> &[f64] {
        self.as_black_box().outputs()
    }

    fn is_state_valid(&self) -> bool {
        self.as_black_box().is_state_valid()
    }

    fn activate(&mut self) {
        self.as_black_box_mut().activate()
    }

    fn reset_state(&mut self) {
        self.as_black_box_mut().reset_state()
    }

    fn calculate_error_against(
        &mut self,
        targets: &[f64],
        learning_rate: f64,
    ) -> Result<f64, TrainingError> {
        self.as_black_box_mut()
            .calculate_error_against(targets, learning_rate)
    }

    fn calculate_error(&mut self, learning_rate: f64) -> Result<f64, TrainingError> {
        self.as_black_box_mut().calculate_error(learning_rate)
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Network::Acyclic(network) => fmt::Display::fmt(network, f),
            Network::Cyclic(network) => fmt::Display::fmt(network, f),
        }
    }
}

/// Decodes NEAT genomes directly: each node becomes a
/// network node and each unsuppressed gene a connection.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NeatDecoder {
    scheme: ActivationScheme,
}

impl NeatDecoder {
    /// Creates a decoder compiling networks under `scheme`.
    pub fn new(scheme: ActivationScheme) -> NeatDecoder {
        NeatDecoder { scheme }
    }

    /// The decoder's activation scheme.
    pub fn scheme(&self) -> ActivationScheme {
        self.scheme
    }
}

impl GenomeDecoder<Genome> for NeatDecoder {
    type Phenome = Network;
    type Error = DecodeError;

    fn decode(&self, genome: &Genome) -> Result<Network, DecodeError> {
        let definition = NetworkDefinition::try_from(genome)?;
        log::debug!(
            "decoding genome with {} nodes and {} connections",
            definition.nodes().len(),
            definition.connections().len()
        );
        Network::compile(&definition, self.scheme)
    }
}
