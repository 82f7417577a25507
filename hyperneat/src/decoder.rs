use crate::{Substrate, SubstrateError};

use backprop_neat::GenomeDecoder;
use backprop_neat_nn::genomics::{GeneticConfig, Genome};
use backprop_neat_nn::networks::{ActivationScheme, NeatDecoder, Network, NetworkDefinition};

use serde::{Deserialize, Serialize};

use std::num::NonZeroUsize;

/// Configuration data for HyperNEAT decoding.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct HyperNeatConfig {
    /// Scheme the CPPN itself is compiled with.
    pub cppn_scheme: ActivationScheme,
    /// Scheme the decoded substrate network is compiled with.
    pub substrate_scheme: ActivationScheme,
    /// Whether the CPPN receives the distance between
    /// the queried endpoints as an extra input.
    pub length_input: bool,
}

impl Default for HyperNeatConfig {
    fn default() -> HyperNeatConfig {
        HyperNeatConfig {
            cppn_scheme: ActivationScheme::cppn_default(),
            substrate_scheme: ActivationScheme::Acyclic,
            length_input: false,
        }
    }
}

/// Decodes CPPN genomes into networks over a fixed substrate.
///
/// Decoding is a pure function of the genome: the CPPN
/// is compiled, queried for every connection the substrate
/// allows, and the resulting definition compiled in turn.
///
/// # Examples
/// ```
/// use backprop_neat::{BlackBox, GenomeDecoder};
/// use backprop_neat_nn::genomics::Genome;
/// use hyperneat::{HyperNeatConfig, HyperNeatDecoder, SubstrateConfig, VisualField};
/// use rand::{rngs::StdRng, SeedableRng};
/// use std::num::NonZeroUsize;
///
/// let substrate = VisualField::new(NonZeroUsize::new(3).unwrap())
///     .substrate(SubstrateConfig::default())
///     .unwrap();
/// let decoder = HyperNeatDecoder::new(substrate, HyperNeatConfig::default());
///
/// let cppn = Genome::with_rng(&decoder.cppn_genetic_config(), &mut StdRng::seed_from_u64(7));
/// let mut network = decoder.decode(&cppn).unwrap();
///
/// assert_eq!(network.input_count(), 9);
/// assert_eq!(network.output_count(), 9);
/// network.set_inputs(&[0.5; 9]);
/// network.activate();
/// assert!(network.is_state_valid());
/// ```
#[derive(Clone, Debug)]
pub struct HyperNeatDecoder {
    substrate: Substrate,
    config: HyperNeatConfig,
}

impl HyperNeatDecoder {
    pub fn new(substrate: Substrate, config: HyperNeatConfig) -> HyperNeatDecoder {
        HyperNeatDecoder { substrate, config }
    }

    pub fn substrate(&self) -> &Substrate {
        &self.substrate
    }

    pub fn config(&self) -> &HyperNeatConfig {
        &self.config
    }

    /// A genome configuration producing CPPNs shaped for
    /// this decoder's substrate.
    pub fn cppn_genetic_config(&self) -> GeneticConfig {
        let inputs = self.substrate.cppn_input_count(self.config.length_input);
        let outputs = self.substrate.cppn_output_count();
        GeneticConfig::cppn(
            NonZeroUsize::new(inputs).unwrap_or(NonZeroUsize::MIN),
            NonZeroUsize::new(outputs).unwrap_or(NonZeroUsize::MIN),
        )
    }

    /// Decodes a CPPN genome into the definition of the
    /// substrate network it describes, without compiling it.
    ///
    /// # Errors
    /// Returns an error if the CPPN genome cannot be compiled
    /// under the CPPN scheme, or does not fit the substrate.
    pub fn decode_definition(&self, genome: &Genome) -> Result<NetworkDefinition, SubstrateError> {
        let mut cppn = NeatDecoder::new(self.config.cppn_scheme).decode(genome)?;
        self.substrate
            .create_network_definition(&mut cppn, self.config.length_input)
    }
}

impl GenomeDecoder<Genome> for HyperNeatDecoder {
    type Phenome = Network;
    type Error = SubstrateError;

    fn decode(&self, genome: &Genome) -> Result<Network, SubstrateError> {
        let definition = self.decode_definition(genome)?;
        log::debug!(
            "decoded substrate network with {} nodes and {} connections",
            definition.nodes().len(),
            definition.connections().len()
        );
        Ok(Network::compile(&definition, self.config.substrate_scheme)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{SubstrateConfig, VisualField};
    use backprop_neat::BlackBox;
    use backprop_neat_nn::genomics::ActivationType;
    use backprop_neat_nn::networks::DecodeError;
    use rand::{rngs::StdRng, SeedableRng};

    fn decoder(resolution: usize, config: HyperNeatConfig) -> HyperNeatDecoder {
        let substrate = VisualField::new(NonZeroUsize::new(resolution).unwrap())
            .substrate(SubstrateConfig::default())
            .unwrap();
        HyperNeatDecoder::new(substrate, config)
    }

    #[test]
    fn decoding_is_deterministic() {
        let decoder = decoder(4, HyperNeatConfig::default());
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..5 {
            let cppn = Genome::with_rng(&decoder.cppn_genetic_config(), &mut rng);
            let first = decoder.decode_definition(&cppn).unwrap();
            let second = decoder.decode_definition(&cppn).unwrap();
            assert_eq!(first, second);
        }
    }

    #[test]
    fn fully_pruned_decode() {
        let decoder = decoder(3, HyperNeatConfig::default());
        let cppn = Genome::new(&GeneticConfig {
            initial_interconnection_proportion: 0.0,
            ..decoder.cppn_genetic_config()
        });
        assert_eq!(cppn.genes().count(), 0);

        let definition = decoder.decode_definition(&cppn).unwrap();
        assert!(definition.connections().is_empty());

        let mut network = decoder.decode(&cppn).unwrap();
        network.reset_state();
        network.set_inputs(&[1.0; 9]);
        network.activate();
        assert!(network.is_state_valid());
        let default_output = ActivationType::Sigmoid.apply(0.0);
        assert!(network.outputs().iter().all(|&o| o == default_output));
    }

    #[test]
    fn saturated_cppn_connects_everything() {
        // A bias-driven CPPN outputs 1 for every query.
        let config = HyperNeatConfig {
            cppn_scheme: ActivationScheme::Acyclic,
            ..HyperNeatConfig::default()
        };
        let decoder = decoder(2, config);
        let mut cppn = Genome::new(&GeneticConfig {
            initial_interconnection_proportion: 0.0,
            ..decoder.cppn_genetic_config()
        });
        let output_id = decoder.substrate().cppn_input_count(false) + 1;
        cppn.add_gene(100, 0, output_id, 3.0).unwrap();

        let definition = decoder.decode_definition(&cppn).unwrap();
        // 4 inputs -> 2 hidden -> 4 outputs, all at max weight.
        assert_eq!(definition.connections().len(), 4 * 2 + 2 * 4);
        assert!(definition.connections().iter().all(|c| c.weight == 5.0));
        assert!(definition.is_acyclic());
    }

    #[test]
    fn length_input_widens_cppn() {
        let config = HyperNeatConfig {
            length_input: true,
            ..HyperNeatConfig::default()
        };
        let decoder = decoder(2, config);
        assert_eq!(decoder.cppn_genetic_config().input_count.get(), 7);

        // A CPPN shaped for the plain queries is rejected.
        let plain = Genome::new(&GeneticConfig::cppn(
            NonZeroUsize::new(6).unwrap(),
            NonZeroUsize::new(1).unwrap(),
        ));
        assert!(matches!(
            decoder.decode(&plain),
            Err(SubstrateError::CppnShape { .. })
        ));
    }

    #[test]
    fn cyclic_substrate_network() {
        let config = HyperNeatConfig {
            substrate_scheme: ActivationScheme::cppn_default(),
            ..HyperNeatConfig::default()
        };
        let decoder = decoder(2, config);
        let cppn = Genome::with_rng(&decoder.cppn_genetic_config(), &mut StdRng::seed_from_u64(3));
        assert!(matches!(decoder.decode(&cppn).unwrap(), Network::Cyclic(_)));
    }

    #[test]
    fn recurrent_cppn_requires_cyclic_scheme() {
        let config = HyperNeatConfig {
            cppn_scheme: ActivationScheme::Acyclic,
            ..HyperNeatConfig::default()
        };
        let decoder = decoder(2, config);
        let mut cppn = Genome::new(&GeneticConfig {
            initial_interconnection_proportion: 0.0,
            ..decoder.cppn_genetic_config()
        });
        let output_id = decoder.substrate().cppn_input_count(false) + 1;
        cppn.add_gene(100, output_id, output_id, 1.0).unwrap();
        assert_eq!(
            decoder.decode(&cppn).unwrap_err(),
            SubstrateError::Network(DecodeError::Cyclic)
        );
    }

    #[test]
    fn config_serde() {
        let config = HyperNeatConfig {
            length_input: true,
            ..HyperNeatConfig::default()
        };
        let serialized = serde_json::to_string(&config).unwrap();
        let deserialized: HyperNeatConfig = serde_json::from_str(&serialized).unwrap();
        assert_eq!(config, deserialized);
    }
}
