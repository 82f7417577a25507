use crate::samples::split_bounds;
use crate::ConfigError;

use serde::{Deserialize, Serialize};

use std::num::NonZeroUsize;
use std::path::PathBuf;

/// How long a phenome is trained before validation.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum TrainingPolicy {
    /// Always run every backpropagation pass.
    FixedIterations,
    /// Validate after every pass, and stop training as
    /// soon as the normalised accuracy (in (0, 1]) exceeds
    /// `threshold`.
    EarlyExit { threshold: f64 },
}

/// Configuration data for autoencoder evaluation.
///
/// # Examples
/// ```
/// use autoencoder::{AutoencoderConfig, TrainingPolicy};
///
/// let config = AutoencoderConfig::from_ron(
///     r#"(
///         training_images_path: Some("digits.bin"),
///         image_resolution: 784,
///         num_image_samples: 50,
///         learning_rate: 1.0,
///         num_backprop_iterations: 100,
///         training_sample_proportion: 0.8,
///         reduce_amount_per_side: 2,
///         pixel_intensity_range: 255.0,
///         policy: EarlyExit(threshold: 0.99),
///         stop_fitness: None,
///     )"#,
/// )
/// .unwrap();
///
/// assert_eq!(config.image_side(), Some(28));
/// assert_eq!(config.sample_length(), 196);
/// assert_eq!(config.policy, TrainingPolicy::EarlyExit { threshold: 0.99 });
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AutoencoderConfig {
    /// Raw sample file, one byte per pixel. When absent,
    /// samples are the binary patterns of `image_resolution`
    /// bits, in counting order.
    pub training_images_path: Option<PathBuf>,
    /// Number of pixels in a sample, before reduction.
    pub image_resolution: usize,
    /// Number of samples to load.
    pub num_image_samples: usize,
    pub learning_rate: f64,
    /// Maximum number of backpropagation passes over
    /// the training samples.
    pub num_backprop_iterations: usize,
    /// Proportion of the samples used for training.
    /// Must be in (0, 1).
    pub training_sample_proportion: f64,
    /// Factor by which each image side is downsampled.
    /// Must divide the side evenly.
    pub reduce_amount_per_side: NonZeroUsize,
    /// Divisor normalising raw pixel bytes into [0, 1].
    pub pixel_intensity_range: f64,
    pub policy: TrainingPolicy,
    /// Fitness at which the stop condition is satisfied.
    pub stop_fitness: Option<f64>,
}

impl AutoencoderConfig {
    /// Returns a "zero-valued" default configuration.
    /// All values are 0, empty, or in the case of
    /// `NonZeroUsize`s, 1. The intensity range is 255.
    ///
    /// # Note
    /// This value does not pass validation. It is meant as a
    /// way to fill in unused values during configuration
    /// instantiation.
    pub const fn zero() -> AutoencoderConfig {
        AutoencoderConfig {
            training_images_path: None,
            image_resolution: 0,
            num_image_samples: 0,
            learning_rate: 0.0,
            num_backprop_iterations: 0,
            training_sample_proportion: 0.0,
            reduce_amount_per_side: NonZeroUsize::MIN,
            pixel_intensity_range: 255.0,
            policy: TrainingPolicy::FixedIterations,
            stop_fitness: None,
        }
    }

    /// Parses and validates a RON configuration.
    ///
    /// # Errors
    /// Returns an error if the text is malformed or
    /// the configuration fails [`validate`].
    ///
    /// [`validate`]: AutoencoderConfig::validate
    pub fn from_ron(text: &str) -> Result<AutoencoderConfig, ConfigError> {
        let config: AutoencoderConfig =
            ron::from_str(text).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Side length of the (square) images, if
    /// `image_resolution` is a square number.
    pub fn image_side(&self) -> Option<usize> {
        let side = (self.image_resolution as f64).sqrt().round() as usize;
        (side * side == self.image_resolution).then(|| side)
    }

    /// Side length of the images after reduction.
    pub fn reduced_side(&self) -> Option<usize> {
        self.image_side()
            .map(|side| side / self.reduce_amount_per_side.get())
    }

    /// Number of values in a sample after reduction, and so
    /// the number of inputs and outputs of an autoencoder.
    pub fn sample_length(&self) -> usize {
        match self.reduce_amount_per_side.get() {
            1 => self.image_resolution,
            _ => self.reduced_side().map_or(0, |side| side * side),
        }
    }

    /// Checks every parameter, including that splitting
    /// `num_image_samples` leaves both sets non-empty.
    ///
    /// # Errors
    /// Returns the first problem found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_training()?;
        validate_split(self.num_image_samples, self.training_sample_proportion)
    }

    /// Checks every parameter except the sample count.
    pub(crate) fn validate_training(&self) -> Result<(), ConfigError> {
        if !(self.learning_rate > 0.0 && self.learning_rate.is_finite()) {
            return Err(ConfigError::LearningRate(self.learning_rate));
        }
        let proportion = self.training_sample_proportion;
        if !(proportion > 0.0 && proportion < 1.0) {
            return Err(ConfigError::SampleProportion(proportion));
        }
        if !(self.pixel_intensity_range > 0.0 && self.pixel_intensity_range.is_finite()) {
            return Err(ConfigError::IntensityRange(self.pixel_intensity_range));
        }
        if let TrainingPolicy::EarlyExit { threshold } = self.policy {
            if !(threshold > 0.0 && threshold <= 1.0) {
                return Err(ConfigError::ExitThreshold(threshold));
            }
        }
        let factor = self.reduce_amount_per_side.get();
        if factor > 1 {
            let side = self
                .image_side()
                .ok_or(ConfigError::NotSquare(self.image_resolution))?;
            if side % factor != 0 {
                return Err(ConfigError::IndivisibleReduction { side, factor });
            }
        }
        Ok(())
    }
}

/// Checks that splitting `count` samples at `proportion`
/// leaves both training and validation samples.
pub(crate) fn validate_split(count: usize, proportion: f64) -> Result<(), ConfigError> {
    let (training, validation) = split_bounds(count, proportion);
    if training.is_empty() || validation.is_empty() {
        return Err(ConfigError::EmptySplit { count, proportion });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> AutoencoderConfig {
        AutoencoderConfig {
            image_resolution: 16,
            num_image_samples: 16,
            learning_rate: 0.5,
            num_backprop_iterations: 10,
            training_sample_proportion: 0.8,
            ..AutoencoderConfig::zero()
        }
    }

    #[test]
    fn zero_is_invalid() {
        assert_eq!(
            AutoencoderConfig::zero().validate(),
            Err(ConfigError::LearningRate(0.0))
        );
        assert_eq!(valid().validate(), Ok(()));
    }

    #[test]
    fn rejects_bad_parameters() {
        let check = |config: AutoencoderConfig| config.validate().unwrap_err();
        assert_eq!(
            check(AutoencoderConfig {
                learning_rate: f64::INFINITY,
                ..valid()
            }),
            ConfigError::LearningRate(f64::INFINITY)
        );
        for proportion in [0.0, 1.0, -0.5, f64::NAN] {
            assert!(matches!(
                check(AutoencoderConfig {
                    training_sample_proportion: proportion,
                    ..valid()
                }),
                ConfigError::SampleProportion(_)
            ));
        }
        assert_eq!(
            check(AutoencoderConfig {
                pixel_intensity_range: 0.0,
                ..valid()
            }),
            ConfigError::IntensityRange(0.0)
        );
        assert_eq!(
            check(AutoencoderConfig {
                policy: TrainingPolicy::EarlyExit { threshold: 1.5 },
                ..valid()
            }),
            ConfigError::ExitThreshold(1.5)
        );
    }

    #[test]
    fn rejects_bad_reduction() {
        let reduce = |image_resolution, factor| {
            AutoencoderConfig {
                image_resolution,
                reduce_amount_per_side: NonZeroUsize::new(factor).unwrap(),
                ..valid()
            }
            .validate()
        };
        assert_eq!(reduce(16, 2), Ok(()));
        assert_eq!(
            reduce(16, 3),
            Err(ConfigError::IndivisibleReduction { side: 4, factor: 3 })
        );
        assert_eq!(reduce(15, 3), Err(ConfigError::NotSquare(15)));
        // Unreduced samples need not be square.
        assert_eq!(reduce(15, 1), Ok(()));
    }

    #[test]
    fn rejects_empty_split() {
        assert_eq!(
            AutoencoderConfig {
                num_image_samples: 2,
                ..valid()
            }
            .validate(),
            Err(ConfigError::EmptySplit {
                count: 2,
                proportion: 0.8
            })
        );
        assert!(AutoencoderConfig {
            num_image_samples: 16,
            training_sample_proportion: 0.1,
            ..valid()
        }
        .validate()
        .is_err());
    }

    #[test]
    fn sample_length() {
        let config = AutoencoderConfig {
            image_resolution: 784,
            reduce_amount_per_side: NonZeroUsize::new(2).unwrap(),
            ..valid()
        };
        assert_eq!(config.image_side(), Some(28));
        assert_eq!(config.reduced_side(), Some(14));
        assert_eq!(config.sample_length(), 196);
        assert_eq!(valid().sample_length(), 16);
    }

    #[test]
    fn ron_round_trip() {
        let config = AutoencoderConfig {
            training_images_path: Some("samples.bin".into()),
            policy: TrainingPolicy::EarlyExit { threshold: 0.95 },
            stop_fitness: Some(99.0),
            ..valid()
        };
        let text = ron::to_string(&config).unwrap();
        assert_eq!(AutoencoderConfig::from_ron(&text), Ok(config));
        assert!(matches!(
            AutoencoderConfig::from_ron("(learning_rate: 1.0)"),
            Err(ConfigError::Parse(_))
        ));
    }
}
