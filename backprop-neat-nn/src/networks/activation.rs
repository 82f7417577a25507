use crate::genomics::ActivationType;

use std::f64::consts::PI;

/// Slope of the steepened sigmoid functions.
const STEEPNESS: f64 = 4.9;

impl ActivationType {
    /// Applies the activation function to a node's input sum.
    ///
    /// # Examples
    /// ```
    /// use backprop_neat_nn::genomics::ActivationType;
    ///
    /// assert_eq!(ActivationType::Sigmoid.apply(0.0), 0.5);
    /// assert_eq!(ActivationType::ReLU.apply(-3.0), 0.0);
    /// assert_eq!(ActivationType::Gaussian.apply(0.0), 1.0);
    /// ```
    pub fn apply(self, input_sum: f64) -> f64 {
        match self {
            ActivationType::Sigmoid => 1.0 / (1.0 + (-STEEPNESS * input_sum).exp()),
            ActivationType::PlainSigmoid => 1.0 / (1.0 + (-input_sum).exp()),
            ActivationType::BipolarSigmoid => 2.0 / (1.0 + (-STEEPNESS * input_sum).exp()) - 1.0,
            ActivationType::Identity => input_sum,
            ActivationType::ReLU => input_sum.max(0.0),
            ActivationType::Gaussian => (-input_sum.powi(2)).exp(),
            ActivationType::Sinusoidal => (input_sum * PI).sin(),
        }
    }

    /// Derivative of the activation function at `input_sum`,
    /// where `activation` is `self.apply(input_sum)`.
    ///
    /// The sigmoid family is differentiated through the
    /// activation value, the rest through the input sum.
    ///
    /// # Examples
    /// ```
    /// use backprop_neat_nn::genomics::ActivationType;
    ///
    /// let f = ActivationType::PlainSigmoid;
    /// assert_eq!(f.derivative(0.0, f.apply(0.0)), 0.25);
    /// ```
    pub fn derivative(self, input_sum: f64, activation: f64) -> f64 {
        match self {
            ActivationType::Sigmoid => STEEPNESS * activation * (1.0 - activation),
            ActivationType::PlainSigmoid => activation * (1.0 - activation),
            ActivationType::BipolarSigmoid => {
                STEEPNESS * (1.0 + activation) * (1.0 - activation) / 2.0
            }
            ActivationType::Identity => 1.0,
            ActivationType::ReLU => {
                if input_sum > 0.0 {
                    1.0
                } else {
                    0.0
                }
            }
            ActivationType::Gaussian => -2.0 * input_sum * activation,
            ActivationType::Sinusoidal => PI * (input_sum * PI).cos(),
        }
    }
}
