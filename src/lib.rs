//! A binary image classifier built on a single layer perceptron.
//!
//! Training learns one weight per pixel from a directory of labeled images, whose file names
//! tell which of the two classes they belong to. The trained [`Model`] is persisted with
//! [`persist`], rendered with [`visualize`] and used to label new images with
//! [`classifier`].

pub mod bounds;
pub mod classifier;
pub mod cli;
pub mod error;
pub mod features;
pub mod luminosity;
pub mod model;
pub mod persist;
pub mod training;
pub mod visualize;

pub use bounds::Bounds;
pub use error::{PerceptronErr, Result};
pub use features::Features;
pub use model::Model;
pub use training::{TrainConfig, Trainer, TrainingReport};
