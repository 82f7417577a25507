use serde::{Deserialize, Serialize};

use std::fmt;

/// The result of evaluating a single phenome.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct FitnessInfo {
    /// Primary fitness, always ≥0.
    pub fitness: f64,
    /// Secondary, evaluator-defined quantity.
    pub auxiliary: f64,
}

impl FitnessInfo {
    /// Fitness assigned to phenomes that could not be
    /// decoded, trained, or validated.
    pub const WORST: FitnessInfo = FitnessInfo {
        fitness: 0.0,
        auxiliary: 0.0,
    };

    /// Returns a new fitness record.
    ///
    /// # Examples
    /// ```
    /// use backprop_neat::FitnessInfo;
    ///
    /// let info = FitnessInfo::new(87.5, 3.0);
    /// assert_eq!(info.fitness, 87.5);
    /// assert_eq!(info.auxiliary, 3.0);
    /// ```
    pub fn new(fitness: f64, auxiliary: f64) -> FitnessInfo {
        FitnessInfo { fitness, auxiliary }
    }
}

impl fmt::Display for FitnessInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.4} ({:.4})", self.fitness, self.auxiliary)
    }
}

/// Progress shared by every phenome type an evaluator scores.
pub trait EvaluationProgress {
    /// Number of completed calls to [`PhenomeEvaluator::evaluate`].
    fn evaluation_count(&self) -> u64;

    /// Whether some evaluation has reached the evaluator's
    /// stopping criterion.
    fn stop_condition_satisfied(&self) -> bool;

    /// Resets any state accumulated between evaluations.
    fn reset(&self);
}

/// An interface for scoring phenomes.
///
/// Evaluators take `&self` so that one instance can score
/// many phenomes concurrently; implementors keep their
/// counters in atomics.
pub trait PhenomeEvaluator<P: ?Sized>: EvaluationProgress {
    /// Evaluates (and possibly trains) `phenome`.
    /// Each call counts as exactly one evaluation.
    fn evaluate(&self, phenome: &mut P) -> FitnessInfo;
}
