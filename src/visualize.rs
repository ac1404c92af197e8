use std::path::{Path, PathBuf};

use image::{ImageBuffer, ImageError, ImageFormat, Luma};
use log::info;

use crate::{
    error::{PerceptronErr, Result},
    model::Model,
};

/// A 16 bit grayscale picture of a model's weights.
pub type WeightImage = ImageBuffer<Luma<u16>, Vec<u16>>;

/// The gray level of every pixel when all weights are equal.
pub const FLAT_LEVEL: u16 = u16::MAX / 2;

/// Renders the weights of `model` as a grayscale image the size of its bounds.
///
/// Weights are remapped linearly so the smallest becomes black (`0`) and the largest white
/// (`65535`). If they are all equal every pixel is [`FLAT_LEVEL`].
pub fn render(model: &Model) -> Result<WeightImage> {
    let bounds = model.bounds();
    let weights = model.weights_view()?;
    let range = weight_range(model.weights());

    let image = ImageBuffer::from_fn(bounds.width() as u32, bounds.height() as u32, |x, y| {
        let weight = weights[(y as usize, x as usize)];
        Luma([range.map_or(FLAT_LEVEL, |(min, max)| level(weight, min, max))])
    });

    Ok(image)
}

/// Renders `model` and writes it as a PNG to `path`, replacing the file if it exists.
pub fn to_image<P: AsRef<Path>>(model: &Model, path: P) -> Result<()> {
    let path = path.as_ref();
    let image = render(model)?;

    image
        .save_with_format(path, ImageFormat::Png)
        .map_err(|e| match e {
            ImageError::IoError(e) => PerceptronErr::io(path, e),
            e => PerceptronErr::EncodeFailure(e.to_string()),
        })?;

    info!("saved model visualization to {}", path.display());
    Ok(())
}

/// Returns where the visualization of the model stored at `model_path` goes: the same path
/// with a `png` extension.
pub fn visualization_path<P: AsRef<Path>>(model_path: P) -> PathBuf {
    let model_path = model_path.as_ref();
    match model_path.extension() {
        Some(ext) if ext.eq_ignore_ascii_case("png") => model_path.with_extension("weights.png"),
        _ => model_path.with_extension("png"),
    }
}

/// Returns the smallest and largest weight, `None` if there's no spread between them.
fn weight_range(weights: &[f64]) -> Option<(f64, f64)> {
    let min = weights.iter().copied().fold(f64::INFINITY, f64::min);
    let max = weights.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    (min < max).then_some((min, max))
}

/// Maps `weight` from `[min, max]` onto the full 16 bit range.
fn level(weight: f64, min: f64, max: f64) -> u16 {
    let t = if (max - min).is_finite() {
        (weight - min) / (max - min)
    } else {
        // halved so a range wider than f64::MAX stays finite
        (weight / 2.0 - min / 2.0) / (max / 2.0 - min / 2.0)
    };

    (t.clamp(0.0, 1.0) * u16::MAX as f64).round() as u16
}
