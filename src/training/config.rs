use std::num::NonZeroUsize;

use crate::{
    error::Result,
    model::{validate_labels, validate_threshold},
};

/// The response above which an untrained perceptron fires.
pub const DEFAULT_THRESHOLD: f64 = 20.0;

/// The maximum amount of training cycles when none is given.
pub const DEFAULT_EPOCHS: usize = 1000;

/// Immutable parameters of a training run.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainConfig {
    label0: String,
    label1: String,
    epochs: NonZeroUsize,
    threshold: f64,
}

impl TrainConfig {
    /// Creates a new training configuration with the default epochs and threshold.
    ///
    /// # Args
    /// * `label0` - Substring naming the files the perceptron must not fire for.
    /// * `label1` - Substring naming the files the perceptron must fire for.
    ///
    /// # Errors
    /// `InvalidConfig` if a label is empty or both are equal.
    pub fn new<S: Into<String>>(label0: S, label1: S) -> Result<Self> {
        let (label0, label1) = (label0.into(), label1.into());
        validate_labels(&label0, &label1)?;

        Ok(Self {
            label0,
            label1,
            epochs: NonZeroUsize::new(DEFAULT_EPOCHS).unwrap_or(NonZeroUsize::MIN),
            threshold: DEFAULT_THRESHOLD,
        })
    }

    /// Sets the maximum amount of cycles, training may stop earlier if it converges.
    pub fn with_epochs(mut self, epochs: NonZeroUsize) -> Self {
        self.epochs = epochs;
        self
    }

    /// Sets the threshold the trained model will use.
    ///
    /// # Errors
    /// `InvalidConfig` if the threshold isn't finite.
    pub fn with_threshold(mut self, threshold: f64) -> Result<Self> {
        validate_threshold(threshold)?;
        self.threshold = threshold;
        Ok(self)
    }

    pub fn label0(&self) -> &str {
        &self.label0
    }

    pub fn label1(&self) -> &str {
        &self.label1
    }

    pub fn epochs(&self) -> usize {
        self.epochs.get()
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }
}
