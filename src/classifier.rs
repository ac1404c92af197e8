use std::path::Path;

use log::debug;
use ndarray::Zip;
use rayon::prelude::*;

use crate::{error::Result, features::Features, model::Model};

/// Computes the response of the perceptron to an image, the sum of each pixel's luminosity
/// times its weight.
///
/// # Errors
/// `DimensionMismatch` if the image's bounds differ from the model's, checked before any
/// weight is read.
pub fn response(features: &Features, model: &Model) -> Result<f64> {
    model.check_bounds(features.bounds())?;
    let weights = model.weights_view()?;

    let response = Zip::from(features.luma())
        .and(weights)
        .fold(0.0, |acc, &luma, &weight| acc + luma * weight);

    Ok(response)
}

/// Returns whether the perceptron fires for an image, its response being strictly above
/// the threshold.
pub fn fires(features: &Features, model: &Model) -> Result<bool> {
    Ok(response(features, model)? > model.threshold())
}

/// Classifies an image, returning `label1` if the response is strictly above the
/// threshold and `label0` otherwise.
pub fn classify<'m>(features: &Features, model: &'m Model) -> Result<&'m str> {
    let response = response(features, model)?;
    Ok(model.label_for(response))
}

/// Decodes the image at `path` and classifies it.
pub fn classify_path<'m, P: AsRef<Path>>(path: P, model: &'m Model) -> Result<&'m str> {
    let path = path.as_ref();
    let features = Features::open(path)?;
    let label = classify(&features, model)?;
    debug!("classified {} as {label}", path.display());
    Ok(label)
}

/// Classifies every image in `paths` in parallel, returning the labels in the same order.
///
/// The model is only read, so it's shared as is by every thread.
///
/// # Errors
/// The first failure found, the whole batch fails with it.
pub fn classify_many<'m, P>(paths: &[P], model: &'m Model) -> Result<Vec<&'m str>>
where
    P: AsRef<Path> + Sync,
{
    paths
        .par_iter()
        .map(|path| classify_path(path, model))
        .collect()
}
