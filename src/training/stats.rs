use crate::model::Model;

/// Counters produced by a single training cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CycleStats {
    samples: usize,
    correct: usize,
    excitatory: usize,
    inhibitory: usize,
}

impl CycleStats {
    /// Creates a new `CycleStats`.
    ///
    /// # Args
    /// * `samples` - Number of samples visited.
    /// * `correct` - How many of them were already classified correctly.
    /// * `excitatory` - Updates that made the perceptron more likely to fire.
    /// * `inhibitory` - Updates that made it less likely to fire.
    pub fn new(samples: usize, correct: usize, excitatory: usize, inhibitory: usize) -> Self {
        Self {
            samples,
            correct,
            excitatory,
            inhibitory,
        }
    }

    pub fn samples(&self) -> usize {
        self.samples
    }

    pub fn correct(&self) -> usize {
        self.correct
    }

    pub fn excitatory(&self) -> usize {
        self.excitatory
    }

    pub fn inhibitory(&self) -> usize {
        self.inhibitory
    }

    /// The fraction of samples misclassified during the cycle.
    pub fn error_rate(&self) -> f64 {
        if self.samples == 0 {
            return 0.0;
        }

        (self.samples - self.correct) as f64 / self.samples as f64
    }

    /// Whether every sample was classified correctly, in which case the weights didn't move.
    pub fn converged(&self) -> bool {
        self.correct == self.samples
    }
}

/// The outcome of a training run: the trained model and how it got there.
#[derive(Debug, Clone)]
pub struct TrainingReport {
    model: Model,
    history: Vec<CycleStats>,
}

impl TrainingReport {
    pub(crate) fn new(model: Model, history: Vec<CycleStats>) -> Self {
        Self { model, history }
    }

    pub fn model(&self) -> &Model {
        &self.model
    }

    pub fn into_model(self) -> Model {
        self.model
    }

    /// The stats of every cycle run, in order.
    pub fn history(&self) -> &[CycleStats] {
        &self.history
    }

    /// Amount of cycles run, at most the configured epochs.
    pub fn cycles(&self) -> usize {
        self.history.len()
    }

    /// Whether training stopped because the last cycle made no mistakes.
    pub fn converged(&self) -> bool {
        self.history.last().is_some_and(CycleStats::converged)
    }

    /// The error rate on the training set during the last cycle.
    pub fn error_rate(&self) -> f64 {
        self.history.last().map_or(1.0, CycleStats::error_rate)
    }
}
