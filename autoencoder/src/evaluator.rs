use crate::config::validate_split;
use crate::samples::{binary_pattern, read_samples, reduce_samples, split_samples, Sample};
use crate::{AutoencoderConfig, EvaluatorError, SampleError, TrainingPolicy};

use backprop_neat::{BlackBox, EvaluationProgress, FitnessInfo, PhenomeEvaluator};
use backprop_neat_nn::networks::calculate_output_error;

use thiserror::Error;

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

/// Reasons a phenome is assigned the worst fitness.
#[derive(Debug, Error)]
enum Unfit {
    #[error("phenome has {inputs} inputs and {outputs} outputs, samples have {expected} values")]
    Shape {
        inputs: usize,
        outputs: usize,
        expected: usize,
    },
    #[error("phenome state became invalid")]
    InvalidState,
    #[error("training failed: {0}")]
    Training(String),
    #[error("training produced a non-finite error")]
    NonFinite,
}

/// Scores phenomes by how well they reconstruct unseen
/// samples after being trained on the rest.
///
/// Each evaluation trains the phenome in place on the
/// training samples, then sums its reconstruction error
/// over the validation samples. Fitness is the percentage
/// of the maximum possible error that was avoided, and the
/// auxiliary value the number of training passes performed.
///
/// # Examples
/// ```
/// use autoencoder::{AutoencoderConfig, AutoencoderEvaluator};
///
/// let config = AutoencoderConfig {
///     image_resolution: 4,
///     num_image_samples: 16,
///     learning_rate: 0.5,
///     num_backprop_iterations: 10,
///     training_sample_proportion: 0.8,
///     ..AutoencoderConfig::zero()
/// };
/// let evaluator = AutoencoderEvaluator::new(&config).unwrap();
///
/// // Binary patterns 0..=10 train, 12..=15 validate.
/// assert_eq!(evaluator.training_samples().len(), 11);
/// assert_eq!(evaluator.validation_samples().len(), 4);
/// assert_eq!(evaluator.max_error(), 16.0);
/// ```
#[derive(Debug)]
pub struct AutoencoderEvaluator {
    training: Arc<[Sample]>,
    validation: Arc<[Sample]>,
    sample_length: usize,
    learning_rate: f64,
    num_backprop_iterations: usize,
    policy: TrainingPolicy,
    stop_fitness: Option<f64>,
    max_error: f64,
    evaluation_count: AtomicU64,
    stop_condition_satisfied: AtomicBool,
}

impl AutoencoderEvaluator {
    /// Loads, reduces and splits the samples described
    /// by `config`.
    ///
    /// # Errors
    /// Returns an error if the configuration is invalid
    /// or the samples cannot be loaded.
    pub fn new(config: &AutoencoderConfig) -> Result<AutoencoderEvaluator, EvaluatorError> {
        config.validate()?;
        let samples = match &config.training_images_path {
            Some(path) => read_samples(
                path,
                config.image_resolution,
                config.num_image_samples,
                config.pixel_intensity_range,
            )?,
            None => {
                let bits = u32::try_from(config.image_resolution).unwrap_or(u32::MAX);
                let available = 1usize.checked_shl(bits).unwrap_or(usize::MAX);
                if config.num_image_samples > available {
                    return Err(SampleError::TooFewPatterns {
                        available,
                        requested: config.num_image_samples,
                    }
                    .into());
                }
                (0..config.num_image_samples)
                    .map(|pattern| binary_pattern(bits, pattern))
                    .collect()
            }
        };
        let factor = config.reduce_amount_per_side.get();
        let samples = match config.image_side() {
            Some(side) if factor > 1 => reduce_samples(&samples, factor, side)?,
            _ => samples,
        };
        AutoencoderEvaluator::from_samples(samples, config)
    }

    /// Builds an evaluator over already-loaded samples, taking
    /// every setting but the sample source from `config`.
    ///
    /// # Errors
    /// Returns an error if the training settings are invalid,
    /// the split leaves an empty set, or the samples differ
    /// in length.
    pub fn from_samples(
        samples: Vec<Sample>,
        config: &AutoencoderConfig,
    ) -> Result<AutoencoderEvaluator, EvaluatorError> {
        config.validate_training()?;
        validate_split(samples.len(), config.training_sample_proportion)?;

        let sample_length = samples.first().map_or(0, |s| s.len());
        if let Some(sample) = samples.iter().find(|s| s.len() != sample_length) {
            return Err(SampleError::SampleLength {
                expected: sample_length,
                found: sample.len(),
            }
            .into());
        }

        let (training, validation) = split_samples(samples, config.training_sample_proportion);
        log::debug!(
            "{} training and {} validation samples of length {}",
            training.len(),
            validation.len(),
            sample_length
        );
        Ok(AutoencoderEvaluator {
            max_error: (validation.len() * sample_length) as f64,
            training: training.into(),
            validation: validation.into(),
            sample_length,
            learning_rate: config.learning_rate,
            num_backprop_iterations: config.num_backprop_iterations,
            policy: config.policy,
            stop_fitness: config.stop_fitness,
            evaluation_count: AtomicU64::new(0),
            stop_condition_satisfied: AtomicBool::new(false),
        })
    }

    pub fn training_samples(&self) -> &[Sample] {
        &self.training
    }

    pub fn validation_samples(&self) -> &[Sample] {
        &self.validation
    }

    /// Number of values in every sample, and so the number
    /// of inputs and outputs an evaluated phenome must have.
    pub fn sample_length(&self) -> usize {
        self.sample_length
    }

    /// Validation error of a phenome whose every output
    /// is as far as possible from its target.
    pub fn max_error(&self) -> f64 {
        self.max_error
    }

    /// Fitness for a given total validation error.
    fn fitness(&self, validation_error: f64) -> f64 {
        self.accuracy(validation_error) * 100.0
    }

    /// Proportion of the maximum error avoided, in [0, 1].
    fn accuracy(&self, validation_error: f64) -> f64 {
        ((self.max_error - validation_error) / self.max_error).max(0.0)
    }

    fn train_and_validate<P: BlackBox + ?Sized>(&self, phenome: &mut P) -> Result<FitnessInfo, Unfit> {
        if phenome.input_count() != self.sample_length || phenome.output_count() != self.sample_length {
            return Err(Unfit::Shape {
                inputs: phenome.input_count(),
                outputs: phenome.output_count(),
                expected: self.sample_length,
            });
        }

        let mut passes = 0;
        let mut validation_error = None;
        while passes < self.num_backprop_iterations {
            let training_error = self.train_pass(phenome)?;
            passes += 1;
            log::trace!("training pass {} error {}", passes, training_error);

            if let TrainingPolicy::EarlyExit { threshold } = self.policy {
                let error = self.validate(phenome)?;
                validation_error = Some(error);
                if self.accuracy(error) > threshold {
                    break;
                }
            }
        }
        let validation_error = match validation_error {
            Some(error) => error,
            None => self.validate(phenome)?,
        };

        Ok(FitnessInfo::new(self.fitness(validation_error), passes as f64))
    }

    /// One backpropagation step per training sample.
    /// Returns the summed training error.
    fn train_pass<P: BlackBox + ?Sized>(&self, phenome: &mut P) -> Result<f64, Unfit> {
        let mut total = 0.0;
        for sample in self.training.iter() {
            phenome.reset_state();
            phenome.set_inputs(sample);
            phenome.activate();
            let error = phenome
                .calculate_error(self.learning_rate)
                .map_err(|e| Unfit::Training(e.to_string()))?;
            if !error.is_finite() {
                return Err(Unfit::NonFinite);
            }
            if !phenome.is_state_valid() {
                return Err(Unfit::InvalidState);
            }
            total += error;
        }
        Ok(total)
    }

    /// Summed reconstruction error over the validation samples.
    fn validate<P: BlackBox + ?Sized>(&self, phenome: &mut P) -> Result<f64, Unfit> {
        let mut total = 0.0;
        for sample in self.validation.iter() {
            phenome.reset_state();
            phenome.set_inputs(sample);
            phenome.activate();
            if !phenome.is_state_valid() {
                return Err(Unfit::InvalidState);
            }
            total += calculate_output_error(sample, phenome.outputs());
        }
        if total.is_finite() {
            Ok(total)
        } else {
            Err(Unfit::NonFinite)
        }
    }
}

impl<P: BlackBox + ?Sized> PhenomeEvaluator<P> for AutoencoderEvaluator {
    fn evaluate(&self, phenome: &mut P) -> FitnessInfo {
        self.evaluation_count.fetch_add(1, Ordering::Relaxed);
        let info = match self.train_and_validate(phenome) {
            Ok(info) => info,
            Err(e) => {
                log::warn!("phenome assigned worst fitness: {}", e);
                return FitnessInfo::WORST;
            }
        };
        if self.stop_fitness.map_or(false, |stop| info.fitness >= stop) {
            self.stop_condition_satisfied.store(true, Ordering::Relaxed);
        }
        info
    }
}

impl EvaluationProgress for AutoencoderEvaluator {
    fn evaluation_count(&self) -> u64 {
        self.evaluation_count.load(Ordering::Relaxed)
    }

    fn stop_condition_satisfied(&self) -> bool {
        self.stop_condition_satisfied.load(Ordering::Relaxed)
    }

    fn reset(&self) {
        self.stop_condition_satisfied.store(false, Ordering::Relaxed);
    }
}
