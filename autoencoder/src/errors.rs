use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// An error type indicating that an experiment
/// configuration is unusable.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    #[error("malformed configuration: {0}")]
    Parse(String),
    #[error("learning rate must be positive and finite, found {0}")]
    LearningRate(f64),
    #[error("training sample proportion must be in (0, 1), found {0}")]
    SampleProportion(f64),
    #[error("pixel intensity range must be positive and finite, found {0}")]
    IntensityRange(f64),
    #[error("early exit threshold must be in (0, 1], found {0}")]
    ExitThreshold(f64),
    #[error("image resolution {0} is not a square number of pixels")]
    NotSquare(usize),
    #[error("reduction factor {factor} does not divide the image side {side}")]
    IndivisibleReduction { side: usize, factor: usize },
    /// Splitting the samples leaves no training
    /// or no validation samples.
    #[error("splitting {count} samples at proportion {proportion} leaves an empty set")]
    EmptySplit { count: usize, proportion: f64 },
}

/// An error type indicating that sample data could
/// not be loaded or transformed.
#[derive(Debug, Error)]
pub enum SampleError {
    #[error("could not read samples from {path:?}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("sample data holds {found} bytes, expected at least {expected}")]
    ShortData { expected: usize, found: usize },
    #[error("only {available} binary patterns exist, {requested} requested")]
    TooFewPatterns { available: usize, requested: usize },
    #[error("sample has {found} values, expected {expected}")]
    SampleLength { expected: usize, found: usize },
    #[error("reduction factor {factor} does not divide the image side {side}")]
    IndivisibleReduction { side: usize, factor: usize },
}

/// An error type for evaluator construction.
#[derive(Debug, Error)]
pub enum EvaluatorError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Samples(#[from] SampleError),
}
