use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{PerceptronErr, Result};

/// The pixel rectangle every training and classification image must share.
///
/// `min` is inclusive and `max` exclusive on both axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Bounds {
    pub min_x: i32,
    pub min_y: i32,
    pub max_x: i32,
    pub max_y: i32,
}

impl Bounds {
    /// Creates a new `Bounds`.
    ///
    /// # Args
    /// * `min_x`, `min_y` - The inclusive top left corner.
    /// * `max_x`, `max_y` - The exclusive bottom right corner.
    pub fn new(min_x: i32, min_y: i32, max_x: i32, max_y: i32) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    /// Bounds anchored at the origin, the only kind the image codec produces.
    ///
    /// # Errors
    /// `Oversized` if a dimension doesn't fit in the `i32` coordinates bounds are kept in.
    pub fn from_dimensions(width: u32, height: u32) -> Result<Self> {
        match (i32::try_from(width), i32::try_from(height)) {
            (Ok(max_x), Ok(max_y)) => Ok(Self::new(0, 0, max_x, max_y)),
            _ => Err(PerceptronErr::Oversized { width, height }),
        }
    }

    pub fn width(&self) -> usize {
        span(self.min_x, self.max_x)
    }

    pub fn height(&self) -> usize {
        span(self.min_y, self.max_y)
    }

    /// Returns the amount of pixels inside, which is also the length of a model's weights.
    ///
    /// Saturates at `usize::MAX` for bounds no weight vector could ever cover.
    pub fn len(&self) -> usize {
        self.width().saturating_mul(self.height())
    }

    /// Whether there are no pixels inside, which includes inverted bounds.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The weight vector length older model files were created with, `width * width`.
    ///
    /// It only agrees with [`Bounds::len`] for square images, so models trained on
    /// rectangular images can't be reproduced bit for bit.
    pub fn legacy_len(&self) -> usize {
        self.width().saturating_mul(self.width())
    }

    /// Returns the `(rows, cols)` shape of a row major grid covering these bounds.
    pub fn shape(&self) -> (usize, usize) {
        (self.height(), self.width())
    }
}

/// Distance from `min` to `max`, zero when inverted.
fn span(min: i32, max: i32) -> usize {
    let span = (i64::from(max) - i64::from(min)).max(0);
    usize::try_from(span).unwrap_or(usize::MAX)
}

impl fmt::Display for Bounds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({},{})-({},{})",
            self.min_x, self.min_y, self.max_x, self.max_y
        )
    }
}
