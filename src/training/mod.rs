mod config;
mod sample;
mod stats;
mod trainer;

pub use config::{TrainConfig, DEFAULT_EPOCHS, DEFAULT_THRESHOLD};
pub use sample::{Label, Sample, TrainingSet};
pub use stats::{CycleStats, TrainingReport};
pub use trainer::{cycle, Trainer, Update};
