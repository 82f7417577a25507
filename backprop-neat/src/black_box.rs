use std::error::Error;

/// An interface for decoded phenomes: fixed-length input
/// and output signal arrays, and a forward activation
/// that maps the former onto the latter.
///
/// Phenomes which support it can also be trained in place
/// with [`calculate_error_against`], which performs a single
/// backpropagation step and mutates the phenome's weights.
///
/// [`calculate_error_against`]: BlackBox::calculate_error_against
pub trait BlackBox {
    /// Error returned when a training step cannot be carried out.
    type TrainingError: Error;

    /// Number of input signals (excluding any bias).
    fn input_count(&self) -> usize;

    /// Number of output signals.
    fn output_count(&self) -> usize;

    /// Current input signals.
    fn inputs(&self) -> &[f64];

    /// Mutable view of the input signals, used to load
    /// a sample before activation.
    fn inputs_mut(&mut self) -> &mut [f64];

    /// Output signals as computed by the last activation.
    fn outputs(&self) -> &[f64];

    /// Returns `false` if any activation or training step
    /// since the last reset produced a non-finite value.
    fn is_state_valid(&self) -> bool;

    /// Propagates the current inputs through the phenome,
    /// overwriting every non-input activation.
    fn activate(&mut self);

    /// Zeroes all non-input activation state. Weights and
    /// topology are left untouched.
    fn reset_state(&mut self);

    /// Performs one backpropagation step towards `targets`
    /// (one value per output), updating weights in place.
    /// Returns the mean squared error signal over all
    /// non-input nodes.
    ///
    /// # Errors
    /// Returns an error if the phenome cannot be trained,
    /// or if `targets` does not have one value per output.
    fn calculate_error_against(
        &mut self,
        targets: &[f64],
        learning_rate: f64,
    ) -> Result<f64, Self::TrainingError>;

    /// Autoencoder variant of [`calculate_error_against`]: the
    /// current inputs are used as targets.
    ///
    /// [`calculate_error_against`]: BlackBox::calculate_error_against
    fn calculate_error(&mut self, learning_rate: f64) -> Result<f64, Self::TrainingError> {
        let targets = self.inputs().to_vec();
        self.calculate_error_against(&targets, learning_rate)
    }

    /// Copies `values` into the input signal array.
    ///
    /// # Panics
    /// This function panics if the length of the passed
    /// slice is not equal to the number of inputs.
    fn set_inputs(&mut self, values: &[f64]) {
        self.inputs_mut().copy_from_slice(values);
    }
}

/// An interface for turning genomes into phenomes.
///
/// Decoding is a pure function of the genome and the
/// decoder's own (immutable) configuration, so a single
/// decoder may be shared between threads.
pub trait GenomeDecoder<G> {
    type Phenome;
    type Error: Error;

    /// Decodes `genome` into a freshly allocated phenome.
    fn decode(&self, genome: &G) -> Result<Self::Phenome, Self::Error>;
}
