use backprop_neat::logging::Stats;
use backprop_neat::{FitnessInfo, GenomeDecoder, PhenomeEvaluator};

use rayon::prelude::*;

/// Decodes and evaluates every genome in parallel, returning
/// their fitnesses in genome order.
///
/// Each genome is decoded into its own phenome, so evaluations
/// share nothing but the decoder and evaluator. A genome that
/// fails to decode is assigned [`FitnessInfo::WORST`].
///
/// # Examples
/// ```
/// use autoencoder::{evaluate_population, AutoencoderConfig, AutoencoderEvaluator};
/// use backprop_neat::EvaluationProgress;
/// use backprop_neat_nn::genomics::{GeneticConfig, Genome};
/// use backprop_neat_nn::networks::{ActivationScheme, NeatDecoder};
/// use std::num::NonZeroUsize;
///
/// let evaluator = AutoencoderEvaluator::new(&AutoencoderConfig {
///     image_resolution: 4,
///     num_image_samples: 16,
///     learning_rate: 0.5,
///     num_backprop_iterations: 2,
///     training_sample_proportion: 0.8,
///     ..AutoencoderConfig::zero()
/// })
/// .unwrap();
///
/// let config = GeneticConfig::autoencoder(NonZeroUsize::new(4).unwrap(), 2);
/// let genomes: Vec<Genome> = (0..8).map(|_| Genome::new(&config)).collect();
/// let decoder = NeatDecoder::new(ActivationScheme::Acyclic);
///
/// let fitnesses = evaluate_population(&genomes, &decoder, &evaluator);
/// assert_eq!(fitnesses.len(), 8);
/// assert!(fitnesses.iter().all(|info| info.auxiliary == 2.0));
/// assert_eq!(evaluator.evaluation_count(), 8);
/// ```
pub fn evaluate_population<G, D, E>(genomes: &[G], decoder: &D, evaluator: &E) -> Vec<FitnessInfo>
where
    G: Sync,
    D: GenomeDecoder<G> + Sync,
    E: PhenomeEvaluator<D::Phenome> + Sync,
{
    let fitnesses: Vec<FitnessInfo> = genomes
        .par_iter()
        .map(|genome| match decoder.decode(genome) {
            Ok(mut phenome) => evaluator.evaluate(&mut phenome),
            Err(e) => {
                log::debug!("genome could not be decoded: {}", e);
                FitnessInfo::WORST
            }
        })
        .collect();

    if let Some(stats) = Stats::of_fitness(&fitnesses) {
        log::info!("evaluated {} genomes: {}", fitnesses.len(), stats);
    }
    fitnesses
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{AutoencoderConfig, AutoencoderEvaluator};
    use backprop_neat::EvaluationProgress;
    use backprop_neat_nn::genomics::{GeneticConfig, Genome};
    use hyperneat::{HyperNeatConfig, HyperNeatDecoder, SubstrateConfig, SubstrateError, VisualField};
    use rand::{rngs::StdRng, SeedableRng};
    use std::num::NonZeroUsize;

    fn evaluator() -> AutoencoderEvaluator {
        AutoencoderEvaluator::new(&AutoencoderConfig {
            image_resolution: 4,
            num_image_samples: 16,
            learning_rate: 0.5,
            num_backprop_iterations: 1,
            training_sample_proportion: 0.8,
            ..AutoencoderConfig::zero()
        })
        .unwrap()
    }

    fn decoder() -> HyperNeatDecoder {
        let substrate = VisualField::new(NonZeroUsize::new(2).unwrap())
            .substrate(SubstrateConfig::default())
            .unwrap();
        HyperNeatDecoder::new(substrate, HyperNeatConfig::default())
    }

    #[test]
    fn matches_sequential_evaluation() {
        let decoder = decoder();
        let mut rng = StdRng::seed_from_u64(21);
        let genomes: Vec<Genome> = (0..12)
            .map(|_| Genome::with_rng(&decoder.cppn_genetic_config(), &mut rng))
            .collect();

        let parallel = evaluate_population(&genomes, &decoder, &evaluator());
        let sequential_evaluator = evaluator();
        let sequential: Vec<FitnessInfo> = genomes
            .iter()
            .map(|genome| sequential_evaluator.evaluate(&mut decoder.decode(genome).unwrap()))
            .collect();
        assert_eq!(parallel, sequential);
    }

    #[test]
    fn decode_failures_are_worst() {
        let decoder = decoder();
        let misshapen = Genome::new(&GeneticConfig::cppn(
            NonZeroUsize::new(2).unwrap(),
            NonZeroUsize::new(1).unwrap(),
        ));
        assert!(matches!(
            decoder.decode(&misshapen),
            Err(SubstrateError::CppnShape { .. })
        ));
        let fitting = Genome::with_rng(&decoder.cppn_genetic_config(), &mut StdRng::seed_from_u64(4));

        let evaluator = evaluator();
        let fitnesses = evaluate_population(&[misshapen, fitting], &decoder, &evaluator);
        assert_eq!(fitnesses[0], FitnessInfo::WORST);
        assert_eq!(fitnesses[1].auxiliary, 1.0);
        // Undecodable genomes are never evaluated.
        assert_eq!(evaluator.evaluation_count(), 1);
    }

    #[test]
    fn empty_population() {
        assert!(evaluate_population(&[] as &[Genome], &decoder(), &evaluator()).is_empty());
    }
}
