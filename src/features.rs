use std::{fs::File, io::BufReader, path::Path};

use image::{DynamicImage, ImageReader};
use ndarray::{Array2, ArrayView2};

use crate::{
    bounds::Bounds,
    error::{PerceptronErr, Result},
    luminosity::pixel_luminosity,
};

/// The luminosity of every pixel of an image, laid out row major over its bounds.
///
/// This is the only view of an image the classifier and the trainer ever see.
#[derive(Debug, Clone, PartialEq)]
pub struct Features {
    bounds: Bounds,
    luma: Array2<f64>,
}

impl Features {
    /// Decodes the image at `path` and extracts its features.
    ///
    /// # Errors
    /// `NotFound` if the file doesn't exist, `DecodeFailure` if the codec rejects it and
    /// `EmptyImage` if it has no pixels.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let image = decode(path)?;
        let features = Self::from_image(&image)?;

        if features.bounds.is_empty() {
            return Err(PerceptronErr::EmptyImage {
                path: path.to_path_buf(),
            });
        }

        Ok(features)
    }

    /// Extracts the features of an already decoded image.
    ///
    /// Pixels are widened to 16 bits per channel first, so 8 and 16 bit encodings of the
    /// same picture produce the same features.
    ///
    /// # Errors
    /// `Oversized` if the image is too large to be addressed by [`Bounds`].
    pub fn from_image(image: &DynamicImage) -> Result<Self> {
        let rgba = image.to_rgba16();
        let bounds = Bounds::from_dimensions(rgba.width(), rgba.height())?;
        let luma = Array2::from_shape_fn(bounds.shape(), |(row, col)| {
            pixel_luminosity(rgba.get_pixel(col as u32, row as u32))
        });

        Ok(Self { bounds, luma })
    }

    /// Builds features straight from a luminosity grid of shape `(height, width)`.
    pub fn from_luma(bounds: Bounds, luma: Array2<f64>) -> Result<Self> {
        if luma.dim() != bounds.shape() {
            let (height, width) = luma.dim();
            return Err(PerceptronErr::DimensionMismatch {
                expected: bounds,
                got: Bounds::new(
                    bounds.min_x,
                    bounds.min_y,
                    offset(bounds.min_x, width),
                    offset(bounds.min_y, height),
                ),
            });
        }

        Ok(Self { bounds, luma })
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    /// Returns the luminosity grid.
    pub fn luma(&self) -> ArrayView2<'_, f64> {
        self.luma.view()
    }
}

/// `min + len`, clamped to the coordinate range.
fn offset(min: i32, len: usize) -> i32 {
    i32::try_from(len).map_or(i32::MAX, |len| min.saturating_add(len))
}

/// Decodes the image at `path`, guessing its format from the contents.
pub fn decode<P: AsRef<Path>>(path: P) -> Result<DynamicImage> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| PerceptronErr::io(path, e))?;
    let reader = ImageReader::new(BufReader::new(file))
        .with_guessed_format()
        .map_err(|e| PerceptronErr::io(path, e))?;

    reader.decode().map_err(|source| PerceptronErr::DecodeFailure {
        path: path.to_path_buf(),
        source,
    })
}
