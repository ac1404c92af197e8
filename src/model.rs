use ndarray::{ArrayView2, ArrayViewMut2};

use crate::{
    bounds::Bounds,
    error::{PerceptronErr, Result},
};

/// The learned state of a perceptron.
///
/// `label1` is the class the perceptron fires for, `label0` the one it doesn't. Once built,
/// the weights can only be changed through `&mut Model`, which during training is held by
/// the trainer alone.
#[derive(Debug, Clone, PartialEq)]
pub struct Model {
    threshold: f64,
    weights: Vec<f64>,
    bounds: Bounds,
    label0: String,
    label1: String,
}

impl Model {
    /// Creates an untrained `Model`, every weight set to zero.
    ///
    /// # Args
    /// * `bounds` - The bounds every image must share, usually taken from the first sample.
    /// * `threshold` - The response above which the perceptron fires.
    /// * `label0` - The class it doesn't fire for.
    /// * `label1` - The class it fires for.
    ///
    /// # Errors
    /// `InvalidConfig` if the bounds are empty, the threshold isn't finite or the labels are
    /// empty or equal.
    pub fn new<S: Into<String>>(bounds: Bounds, threshold: f64, label0: S, label1: S) -> Result<Self> {
        if bounds.is_empty() {
            return Err(PerceptronErr::InvalidConfig(format!(
                "bounds {bounds} contain no pixels"
            )));
        }

        Self::from_parts(threshold, vec![0.0; bounds.len()], bounds, label0, label1)
    }

    /// Assembles a `Model` from all of its fields, checking they are consistent.
    ///
    /// # Errors
    /// `InvalidConfig` if the labels or threshold are unusable. `CorruptModel` if the bounds
    /// are empty, a weight isn't finite or the amount of weights doesn't cover the bounds.
    pub fn from_parts<S: Into<String>>(
        threshold: f64,
        weights: Vec<f64>,
        bounds: Bounds,
        label0: S,
        label1: S,
    ) -> Result<Self> {
        let (label0, label1) = (label0.into(), label1.into());
        validate_labels(&label0, &label1)?;
        validate_threshold(threshold)?;

        if bounds.is_empty() {
            return Err(PerceptronErr::corrupt(format!(
                "bounds {bounds} contain no pixels"
            )));
        }

        if let Some(i) = weights.iter().position(|w| !w.is_finite()) {
            return Err(PerceptronErr::corrupt(format!(
                "weight {i} is {}, weights must be finite",
                weights[i]
            )));
        }

        if weights.len() != bounds.len() {
            return Err(PerceptronErr::corrupt(format!(
                "{} weights can't cover bounds {bounds}, expected {}",
                weights.len(),
                bounds.len()
            )));
        }

        Ok(Self {
            threshold,
            weights,
            bounds,
            label0,
            label1,
        })
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    pub fn label0(&self) -> &str {
        &self.label0
    }

    pub fn label1(&self) -> &str {
        &self.label1
    }

    /// Returns the label predicted for a response, `label1` only when strictly above the
    /// threshold.
    pub fn label_for(&self, response: f64) -> &str {
        if response > self.threshold {
            &self.label1
        } else {
            &self.label0
        }
    }

    /// Fails with `DimensionMismatch` unless `bounds` equals this model's bounds.
    pub fn check_bounds(&self, bounds: Bounds) -> Result<()> {
        if bounds != self.bounds {
            return Err(PerceptronErr::DimensionMismatch {
                expected: self.bounds,
                got: bounds,
            });
        }

        Ok(())
    }

    /// Gives a view of the weights laid out over the model's bounds.
    pub fn weights_view(&self) -> Result<ArrayView2<'_, f64>> {
        ArrayView2::from_shape(self.bounds.shape(), &self.weights)
            .map_err(|e| PerceptronErr::corrupt(e.to_string()))
    }

    /// Gives a mutable view of the weights laid out over the model's bounds.
    pub(crate) fn weights_view_mut(&mut self) -> Result<ArrayViewMut2<'_, f64>> {
        ArrayViewMut2::from_shape(self.bounds.shape(), &mut self.weights)
            .map_err(|e| PerceptronErr::corrupt(e.to_string()))
    }
}

/// Checks that the two class labels can be told apart.
pub(crate) fn validate_labels(label0: &str, label1: &str) -> Result<()> {
    if label0.is_empty() || label1.is_empty() {
        return Err(PerceptronErr::InvalidConfig(
            "both class labels must be non empty".to_string(),
        ));
    }

    if label0 == label1 {
        return Err(PerceptronErr::InvalidConfig(format!(
            "class labels must differ, both are {label0:?}"
        )));
    }

    Ok(())
}

pub(crate) fn validate_threshold(threshold: f64) -> Result<()> {
    if !threshold.is_finite() {
        return Err(PerceptronErr::InvalidConfig(format!(
            "threshold must be finite, got {threshold}"
        )));
    }

    Ok(())
}
