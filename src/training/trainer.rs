use std::path::Path;

use log::{debug, info, warn};
use ndarray::Zip;

use super::{CycleStats, Label, TrainConfig, TrainingReport, TrainingSet};
use crate::{classifier, error::Result, features::Features, model::Model};

/// A correction of the weights after a misclassified sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Update {
    /// The perceptron should have fired: every weight grows by its pixel's luminosity.
    Excitatory,
    /// The perceptron shouldn't have fired: every weight shrinks by its pixel's luminosity.
    Inhibitory,
}

impl Update {
    /// Returns the update a sample of class `expected` calls for after predicting
    /// `predicted`, `None` if the prediction was right.
    pub fn after(predicted: Label, expected: Label) -> Option<Self> {
        match (predicted, expected) {
            (Label::Zero, Label::One) => Some(Update::Excitatory),
            (Label::One, Label::Zero) => Some(Update::Inhibitory),
            _ => None,
        }
    }

    pub fn sign(&self) -> f64 {
        match self {
            Update::Excitatory => 1.0,
            Update::Inhibitory => -1.0,
        }
    }

    /// Nudges the model's weights by `sign * luminosity` of every pixel of `features`.
    ///
    /// # Errors
    /// `DimensionMismatch` if the image's bounds differ from the model's.
    pub fn apply(&self, model: &mut Model, features: &Features) -> Result<()> {
        model.check_bounds(features.bounds())?;

        let sign = self.sign();
        Zip::from(model.weights_view_mut()?)
            .and(features.luma())
            .for_each(|weight, &luma| *weight += sign * luma);

        Ok(())
    }
}

/// Trains perceptrons with the classic perceptron learning rule.
#[derive(Debug, Clone)]
pub struct Trainer {
    config: TrainConfig,
}

impl Trainer {
    /// Creates a new `Trainer`.
    ///
    /// # Args
    /// * `config` - The labels, epochs and threshold of the runs.
    pub fn new(config: TrainConfig) -> Self {
        Self { config }
    }

    /// Trains a model on every image found in `dir`.
    ///
    /// # Errors
    /// Any error loading the training set, see [`TrainingSet::load`].
    pub fn train<P: AsRef<Path>>(&self, dir: P) -> Result<TrainingReport> {
        let set = TrainingSet::load(dir, self.config.label0(), self.config.label1())?;
        self.fit(&set)
    }

    /// Trains a model on an already loaded training set.
    ///
    /// Starts from all zero weights over the set's bounds and runs cycles until one makes no
    /// mistakes or the configured epochs run out.
    pub fn fit(&self, set: &TrainingSet) -> Result<TrainingReport> {
        let mut model = Model::new(
            set.bounds(),
            self.config.threshold(),
            self.config.label0(),
            self.config.label1(),
        )?;

        let epochs = self.config.epochs();
        let mut history = Vec::with_capacity(epochs.min(64));

        for epoch in 0..epochs {
            let stats = cycle(&mut model, set)?;
            debug!(
                "cycle {epoch}: {}/{} correct, {} excitatory, {} inhibitory",
                stats.correct(),
                stats.samples(),
                stats.excitatory(),
                stats.inhibitory()
            );

            history.push(stats);
            if stats.converged() {
                break;
            }
        }

        let report = TrainingReport::new(model, history);
        if report.converged() {
            info!("converged after {} cycle(s)", report.cycles());
        } else {
            warn!(
                "did not converge in {epochs} cycle(s), error rate {}",
                report.error_rate()
            );
        }

        Ok(report)
    }
}

/// Runs one pass of the learning rule over every sample, in order.
///
/// Each sample is classified with the weights left by the previous one.
pub fn cycle(model: &mut Model, set: &TrainingSet) -> Result<CycleStats> {
    let (mut correct, mut excitatory, mut inhibitory) = (0, 0, 0);

    for sample in set.samples() {
        let predicted = Label::from_fires(classifier::fires(sample.features(), model)?);

        match Update::after(predicted, sample.label()) {
            None => correct += 1,
            Some(update) => {
                update.apply(model, sample.features())?;
                match update {
                    Update::Excitatory => excitatory += 1,
                    Update::Inhibitory => inhibitory += 1,
                }
            }
        }
    }

    Ok(CycleStats::new(set.len(), correct, excitatory, inhibitory))
}
